use astound_builder::{Builder, Route};
use clap::Args;
use eyre::Result;

use crate::reports::{PageAction, PageReport, Report, TerminalOutput};

#[derive(Args)]
pub struct UpdateCommand {
    /// Route file, relative to the app directory (e.g. blog/index.html)
    pub file: String,
}

impl UpdateCommand {
    pub async fn run(&self, mut builder: Builder) -> Result<()> {
        let route = Route::parse(&self.file)?;
        let entry = builder.update_page(&route).await?;

        PageReport::new(PageAction::Updated, route, entry).render(&mut TerminalOutput::new());
        Ok(())
    }
}
