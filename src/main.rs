use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use release_check::command::{SystemCommandRunner, command_available};
use release_check::config::{
    DEFAULT_CONFIG_FILE, DEFAULT_FALLBACK_TOOL, DEFAULT_CONTAINER_NAME, DEFAULT_PARTIAL_NAMES,
    DEFAULT_REGISTRY_URL, DEFAULT_REPORT_FILE, ITEMS_PER_PAGE, PROJECT_PAUSE_MS, load_config,
    select_images,
};
use release_check::container::{
    ContainerEngine, ContainerError, PackageManager, resolve_engine,
};
use release_check::logging::{self, LogFormat};
use release_check::orchestrator::{Orchestrator, RunSettings, tracked_projects};
use release_check::report::Report;
use release_check::upstream::release_monitoring::ReleaseMonitoringRegistry;
use release_check::upstream::search::find_packages;

#[derive(Parser)]
#[command(name = "release-check")]
#[command(
    version,
    about = "Compare upstream releases with the packages shipped in base images"
)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the upstream vs. image version report
    Report(ReportArgs),
    /// List registry packages whose name contains one of the given names
    Packages(PackagesArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Config file listing the tracked projects
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// CSV file to write
    #[arg(long, default_value = DEFAULT_REPORT_FILE)]
    output: PathBuf,

    /// Image to query (repeatable); overrides the config file
    #[arg(long = "image")]
    images: Vec<String>,

    #[arg(long, default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// Force a container engine instead of probing podman then docker
    #[arg(long, value_enum)]
    engine: Option<ContainerEngine>,

    #[arg(long, value_enum, default_value_t = PackageManager::Zypper)]
    package_manager: PackageManager,

    /// Tool run as `<tool> <project>` when the registry has no version
    #[arg(long, default_value = DEFAULT_FALLBACK_TOOL)]
    fallback_tool: String,

    #[arg(long, default_value = DEFAULT_CONTAINER_NAME)]
    container_name: String,

    /// Pause between two projects, in milliseconds
    #[arg(long, default_value_t = PROJECT_PAUSE_MS)]
    pause_ms: u64,
}

#[derive(Args)]
struct PackagesArgs {
    /// Partial package name to look for (repeatable)
    #[arg(long = "name")]
    names: Vec<String>,

    #[arg(long, default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    #[arg(long, default_value_t = ITEMS_PER_PAGE, value_parser = clap::value_parser!(u32).range(1..))]
    items_per_page: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.log_format, cli.log_file.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::Report(args) => runtime.block_on(run_report(args)),
        Command::Packages(args) => runtime.block_on(run_packages(args)),
    }
}

async fn run_report(args: ReportArgs) -> anyhow::Result<()> {
    let Some(engine) = resolve_engine(args.engine, command_available) else {
        bail!(ContainerError::NoEngine);
    };
    info!("Using {} as container engine", engine);

    let config = load_config(&args.config)?;
    let settings = RunSettings {
        images: select_images(&args.images, &config),
        container_name: args.container_name,
        package_manager: args.package_manager,
        fallback_tool: args.fallback_tool,
        project_pause: Duration::from_millis(args.pause_ms),
    };

    let registry = ReleaseMonitoringRegistry::new(&args.registry_url)
        .context("creating registry client")?;
    let mut orchestrator = Orchestrator::new(
        engine,
        settings,
        Arc::new(registry),
        Arc::new(SystemCommandRunner),
    );

    let reports = orchestrator.run(tracked_projects(&config)).await;
    Report::build(&reports)
        .write_to_path(&args.output)
        .with_context(|| format!("writing report to {:?}", args.output))?;

    info!("Report written to {:?}", args.output);
    Ok(())
}

async fn run_packages(args: PackagesArgs) -> anyhow::Result<()> {
    let names = if args.names.is_empty() {
        DEFAULT_PARTIAL_NAMES.iter().map(|s| s.to_string()).collect()
    } else {
        args.names
    };

    let registry = ReleaseMonitoringRegistry::new(&args.registry_url)
        .context("creating registry client")?;

    for found in find_packages(&registry, &names, args.items_per_page).await {
        println!("{}", found.to_line());
    }
    Ok(())
}
