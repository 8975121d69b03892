use clap::Parser;
use reqgen::{ApiKey, KeyStatus};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Check the API key in the environment")]
pub struct Check {}

impl Check {
    /// Prints the key diagnostic. A bad key is reported, never an error.
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) {
        report(ApiKey::from_env().status());
    }
}

/// Prints the diagnostic line for a key status.
pub fn report(status: KeyStatus) {
    if status.is_valid() {
        println!("{}", status.message().success());
    } else {
        println!("{}", status.message().warning());
    }
}
