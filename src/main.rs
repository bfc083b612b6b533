mod cli;

use cli::Args;
use dtrack_dojo_sync::adapters::outbound::console::StderrProgressReporter;
use dtrack_dojo_sync::adapters::outbound::network::{
    build_http_client, DefectDojoClient, DependencyTrackClient,
};
use dtrack_dojo_sync::application::dto::{RunReport, SyncRequest};
use dtrack_dojo_sync::application::use_cases::RunSyncUseCase;
use dtrack_dojo_sync::config::{discover_config, load_config_from_path, ConfigFile, SyncConfig};
use dtrack_dojo_sync::ports::outbound::Credentials;
use dtrack_dojo_sync::shared::error::ExitCode;
use dtrack_dojo_sync::shared::Result;
use std::process;
use std::time::Duration;
use tracing::debug;

#[tokio::main]
async fn main() {
    // Loads .env when present; real environment variables win
    dotenvy::dotenv().ok();

    let args = match Args::parse_args() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::Fatal.as_i32());
    }
}

fn init_tracing(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<RunReport> {
    let file = load_config_file(&args)?;
    let config = SyncConfig::resolve(file, |name| std::env::var(name).ok(), &args.overrides())?;
    debug!(?config, "configuration resolved");

    // One pooled client for both systems
    let client = build_http_client(Duration::from_secs(config.request_timeout_secs))?;
    let source = DependencyTrackClient::new(client.clone(), &config.source_url);
    let target = DefectDojoClient::new(client, &config.target_url, &config.target_token)
        .with_engagement_page_limit(config.engagement_page_limit)
        .with_import_options(config.import.clone());

    let use_case = RunSyncUseCase::new(
        source,
        Credentials::new(&config.source_username, &config.source_password),
        target,
        config.products.clone(),
        if args.no_color {
            StderrProgressReporter::without_colors()
        } else {
            StderrProgressReporter::new()
        },
        config.engagement_template.clone(),
    );

    let request = SyncRequest::new(args.reimport)
        .with_dry_run(args.dry_run)
        .with_page_size(config.page_size)
        .with_sort(args.sort())
        .with_concurrency(config.concurrency);

    use_case.execute(request).await
}

/// Explicit --config wins; otherwise the working directory is searched
fn load_config_file(args: &Args) -> Result<ConfigFile> {
    if let Some(path) = args.config.as_deref() {
        return load_config_from_path(path);
    }
    let cwd = std::env::current_dir()?;
    Ok(discover_config(&cwd)?.unwrap_or_default())
}
