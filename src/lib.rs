pub mod checker;
pub mod config;
pub mod discovery;
pub mod logging;
pub mod parser;
pub mod report;
pub mod version;
