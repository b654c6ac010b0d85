use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::debug;

use compose_update_checker::checker::UpdateChecker;
use compose_update_checker::config::CheckerConfig;
use compose_update_checker::discovery::ManifestDiscovery;
use compose_update_checker::logging::init_logging;
use compose_update_checker::report::{OutputFormat, write_report};
use compose_update_checker::version::policy::UpdatePolicy;
use compose_update_checker::version::registries::build_registry;

#[derive(Parser)]
#[command(name = "compose-update-checker")]
#[command(version, about = "Find newer image tags for docker compose manifests")]
#[command(group(
    ArgGroup::new("policy")
        .required(true)
        .multiple(true)
        .args(["major", "minor", "patch"])
))]
struct Cli {
    /// Compose files or directories to scan
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Accept major updates (implies --minor and --patch)
    #[arg(long)]
    major: bool,

    /// Accept minor updates (implies --patch)
    #[arg(long)]
    minor: bool,

    /// Accept patch updates
    #[arg(long)]
    patch: bool,

    /// Docker Hub compatible tag listing URL; uses the OCI API of each image's registry when unset
    #[arg(long, value_name = "URL")]
    registry_url: Option<String>,

    /// Maximum number of concurrent tag fetches
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also list images without an update (up to date or not fetched)
    #[arg(long)]
    all: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/compose-update-checker/config.json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Append JSON logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => CheckerConfig::load(path)?,
        None => CheckerConfig::load_default()?,
    };
    if let Some(url) = cli.registry_url {
        config.registry.url = Some(url);
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    debug!("Using configuration {:?}", config);

    let policy = UpdatePolicy::new(cli.major, cli.minor, cli.patch);
    let registry = build_registry(&config.registry).context("Failed to create registry client")?;
    let discovery = ManifestDiscovery::new(config.file_patterns.as_slice())?;

    let checker = UpdateChecker::new(registry, policy)
        .with_concurrency(config.concurrency)
        .with_discovery(discovery);
    let results = checker.check_paths(&cli.paths).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &results, cli.format, cli.all)?;

    Ok(())
}
