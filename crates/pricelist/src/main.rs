use crate::prelude::*;
use clap::Parser;
use std::process::ExitCode;

mod config;
mod error;
mod export;
mod fetch;
mod observer;
mod paginate;
mod pipeline;
mod prelude;
mod preview;
mod sink;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Export the Azure retail price catalog to CSV and Parquet"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "PRICELIST_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Fetch the whole catalog and write every output file
    Export(crate::export::ExportOptions),

    /// Fetch the first pages and print them
    Preview(crate::preview::PreviewOptions),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let app = App::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(app.global.verbose)),
    )
    .init();
    color_eyre::install()?;

    match app.command {
        SubCommands::Export(options) => crate::export::run(options, app.global).await,
        SubCommands::Preview(options) => crate::preview::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}

/// Log level used when `RUST_LOG` is not set; `--verbose` shows debug output
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}
