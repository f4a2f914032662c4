use astound_builder::{Builder, Route};
use clap::Args;
use eyre::Result;

use crate::reports::{RemoveReport, Report, TerminalOutput};

#[derive(Args)]
pub struct RemoveCommand {
    /// Route file, relative to the app directory (e.g. blog/index.html)
    pub file: String,
}

impl RemoveCommand {
    pub fn run(&self, mut builder: Builder) -> Result<()> {
        let removed = builder.remove_page(&Route::parse(&self.file)?)?;

        RemoveReport::new(builder.config(), removed).render(&mut TerminalOutput::new());
        Ok(())
    }
}
