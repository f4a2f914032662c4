mod commands;
mod reports;

use clap::Parser;
use eyre::Result;

use crate::commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.init_logging();
    cli.run().await
}
