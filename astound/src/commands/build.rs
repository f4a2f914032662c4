use astound_builder::Builder;
use clap::Args;
use eyre::Result;

use crate::reports::{BuildReport, Report, TerminalOutput};

#[derive(Args)]
pub struct BuildCommand;

impl BuildCommand {
    /// Run the build command
    pub async fn run(&self, mut builder: Builder) -> Result<()> {
        let result = builder.build().await?;

        BuildReport::new(builder.config(), result).render(&mut TerminalOutput::new());
        Ok(())
    }
}
