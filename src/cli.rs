use clap::Parser;
use std::path::PathBuf;

use dtrack_dojo_sync::config::ConfigOverrides;
use dtrack_dojo_sync::ports::outbound::{ProjectSort, SortOrder};

/// Sync Dependency-Track projects into DefectDojo engagements and import their findings
#[derive(Parser, Debug)]
#[command(name = "dtrack-dojo-sync")]
#[command(version)]
#[command(
    about = "Sync Dependency-Track projects into DefectDojo engagements and import their findings",
    long_about = None
)]
pub struct Args {
    /// Reimport findings into tests that already exist for a project version
    /// (without this flag those projects are skipped)
    #[arg(long)]
    pub reimport: bool,

    /// Read both systems and report what would happen, without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a YAML config file (defaults to ./dtrack-dojo-sync.config.yml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maximum number of engagement creations or projects handled at the same time
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Projects requested per Dependency-Track page
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    /// Field used to sort the Dependency-Track project listing (e.g. name)
    #[arg(long, value_name = "FIELD")]
    pub sort_name: Option<String>,

    /// Sort direction for --sort-name: asc or desc
    #[arg(long, value_name = "ORDER", requires = "sort_name")]
    pub sort_order: Option<SortOrder>,

    /// Print progress without ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parses the command line; `--help` and `--version` also end up in `Err`
    pub fn parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Settings from the command line that override the config file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            page_size: self.page_size,
            concurrency: self.concurrency,
        }
    }

    /// Sort for the project listing; the order defaults to ascending
    pub fn sort(&self) -> Option<ProjectSort> {
        self.sort_name.as_ref().map(|field| ProjectSort {
            field: field.clone(),
            order: self.sort_order.unwrap_or(SortOrder::Asc),
        })
    }
}
