use std::path::PathBuf;

mod check;
mod extract;
mod parse;
mod run;
mod terminal;

use check::Check;
use clap::ArgAction;
use extract::Extract;
use parse::Parse;
use reqgen::Settings;
use run::Run;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        env_file_loaded(dotenvy::dotenv());

        let config =
            Settings::load_config(self.config.as_deref()).map_err(|e| anyhow::anyhow!("{e}"))?;

        self.command
            .unwrap_or_else(|| Command::Run(Run::default()))
            .run(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Reports the outcome of loading a `.env` file.
///
/// Variables already set in the environment are never overridden. A missing
/// file is not an error; an unreadable one is logged and skipped.
fn env_file_loaded(result: Result<PathBuf, dotenvy::Error>) -> Option<PathBuf> {
    match result {
        Ok(path) => {
            tracing::debug!("loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("ignoring .env file: {e}");
            None
        }
    }
}

/// Loads the `.env` file at `path`.
#[cfg(test)]
fn load_env_file(path: &std::path::Path) -> Option<PathBuf> {
    env_file_loaded(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Generate test cases for a requirements document (default)
    Run(Run),

    /// List the requirements found in a document
    ///
    /// Nothing is sent to the completion API.
    Extract(Extract),

    /// Parse a saved model reply into test cases
    Parse(Parse),

    /// Check the API key in the environment
    Check(Check),
}

impl Command {
    fn run(self, config: reqgen::Config) -> anyhow::Result<()> {
        match self {
            Self::Run(command) => command.run(config)?,
            Self::Extract(command) => command.run()?,
            Self::Parse(command) => command.run()?,
            Self::Check(command) => command.run(),
        }
        Ok(())
    }
}
