mod build;
mod new;
mod remove;
mod routes;
mod update;

use std::path::PathBuf;

use astound_builder::Builder;
use astound_config::{CONFIG_FILE, Config};
use build::BuildCommand;
use clap::{ArgAction, Parser, Subcommand};
use eyre::Result;
use log::LevelFilter;
use new::NewCommand;
use remove::RemoveCommand;
use routes::RoutesCommand;
use update::UpdateCommand;

/// Extension trait for exiting on config errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for astound_config::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "astound")]
#[command(version)]
#[command(about = "Build HTML routes into self-mounting client bundles")]
pub(crate) struct Cli {
    /// Project root (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Path to astound.toml, relative to the project root
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Initialize `env_logger`. `RUST_LOG` takes precedence over `-v`.
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp(None)
            .init();
    }

    pub async fn run(&self) -> Result<()> {
        let builder = Builder::new(self.load_config());

        match &self.command {
            Commands::Build(cmd) => cmd.run(builder).await,
            Commands::New(cmd) => cmd.run(builder).await,
            Commands::Update(cmd) => cmd.run(builder).await,
            Commands::Remove(cmd) => cmd.run(builder),
            Commands::Routes(cmd) => cmd.run(builder),
        }
    }

    fn load_config(&self) -> Config {
        Config::load(&self.root, &self.config).unwrap_or_exit()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build every route of the app directory
    Build(BuildCommand),

    /// Build a newly created route
    New(NewCommand),

    /// Rebuild a route produced by an earlier build
    Update(UpdateCommand),

    /// Remove a route and its output files
    Remove(RemoveCommand),

    /// List routes with their cache state
    Routes(RoutesCommand),
}
