//! uptick - find the newest acceptable release of a dependency
//!
//! Fetches the release list once, then answers three questions:
//! - the latest release passing yanked, prerelease, ignore and cooldown filters
//! - the latest release that keeps every declared requirement satisfied
//! - the lowest release fixing a known vulnerability

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uptick::cli::CliArgs;
use uptick::config::ConfigFile;
use uptick::output::{create_formatter, CheckReport, OutputConfig};
use uptick::progress::Progress;
use uptick::registry::{create_fetcher, HttpClient, ReleaseFetcher, ReleaseFileFetcher};
use uptick::update::UpdateChecker;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "uptick=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let dependency = args.dependency()?;
    let options = args.check_options(&config, &dependency)?;

    let fetcher: Box<dyn ReleaseFetcher> = match &args.releases {
        Some(path) => Box::new(ReleaseFileFetcher::new(path)),
        None => create_fetcher(dependency.ecosystem, HttpClient::new()?)?,
    };

    let mut progress = Progress::new(!args.quiet && !args.json);
    progress.spinner(&format!(
        "Fetching {} releases from {}",
        dependency.name,
        fetcher.registry_name()
    ));
    let checker = UpdateChecker::fetch(dependency, fetcher.as_ref(), options).await;
    progress.finish_and_clear();

    let report = CheckReport::from_checker(&checker);

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.has_errors() {
        // Partial success - the report is incomplete
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
