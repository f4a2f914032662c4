use astound_builder::{Builder, Route};
use clap::Args;
use eyre::Result;

use crate::reports::{PageAction, PageReport, Report, TerminalOutput};

#[derive(Args)]
pub struct NewCommand {
    /// Route file, relative to the app directory (e.g. blog/index.html)
    pub file: String,
}

impl NewCommand {
    pub async fn run(&self, mut builder: Builder) -> Result<()> {
        let route = Route::parse(&self.file)?;
        let entry = builder.new_page(&route).await?;

        PageReport::new(PageAction::Created, route, entry).render(&mut TerminalOutput::new());
        Ok(())
    }
}
