#![allow(dead_code)]

pub mod compose;
pub mod registry;

#[allow(unused_imports)]
pub use compose::*;
#[allow(unused_imports)]
pub use registry::*;
