use astound_builder::{Builder, PageCache};
use clap::Args;
use eyre::Result;

use crate::reports::{Report, RouteInfo, RoutesReport, TerminalOutput};

#[derive(Args)]
pub struct RoutesCommand;

impl RoutesCommand {
    pub fn run(&self, builder: Builder) -> Result<()> {
        let cache = PageCache::load(&builder.config().cache_file())?;

        let routes = builder
            .routes()?
            .into_iter()
            .map(|route| RouteInfo {
                url: route.url_path(),
                entry: cache.get(&route.file).cloned(),
                route,
            })
            .collect();

        RoutesReport { routes }.render(&mut TerminalOutput::new());
        Ok(())
    }
}
