//! Report data structures for commands.
//!
//! Commands collect the results of a builder operation into a report, then
//! render it to an Output target.

mod build;
mod output;
mod page;
mod routes;

use astound_builder::CacheEntry;
pub use build::BuildReport;
pub use output::{Report, TerminalOutput};
pub use page::{PageAction, PageReport, RemoveReport};
pub use routes::{RouteInfo, RoutesReport};

/// Short description of where a route's output lives.
fn describe(entry: &CacheEntry) -> String {
    match entry {
        CacheEntry::Hash(hash) => hash.clone(),
        CacheEntry::Module(module) => format!("module {}", module.module),
    }
}
