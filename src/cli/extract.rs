use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use regex::Regex;
use reqgen::{Requirement, domain::DEFAULT_INPUT, extract::extract_from_document};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser)]
#[command(about = "List the requirements found in a document")]
pub struct Extract {
    /// The requirements document to read
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: OutputFormat,

    /// Only list requirements whose id or text matches this pattern
    #[arg(long, value_name = "REGEX")]
    filter: Option<Regex>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Extract {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let requirements = extract_from_document(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let requirements = self.filtered(requirements);

        match self.format {
            OutputFormat::Json => {
                let views: Vec<_> = requirements.iter().map(Requirement::view).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            }
            OutputFormat::Table => output_table(&requirements),
        }
        Ok(())
    }

    fn filtered(&self, mut requirements: Vec<Requirement>) -> Vec<Requirement> {
        if let Some(filter) = &self.filter {
            requirements.retain(|r| filter.is_match(r.id().as_str()) || filter.is_match(r.text()));
        }
        requirements
    }
}

fn output_table(requirements: &[Requirement]) {
    if requirements.is_empty() {
        println!("{}", "No requirements found.".warning());
        return;
    }

    if is_narrow() {
        for requirement in requirements {
            println!("{}", requirement.id().as_str().info());
            println!("  {}", requirement.text());
        }
    } else {
        println!("{:<10} Requirement", "ID");
        println!("{}", "─".repeat(60).dim());
        for requirement in requirements {
            println!("{:<10} {}", requirement.id().as_str(), requirement.text());
        }
    }

    println!();
    println!("Total: {}", requirements.len());
}

#[cfg(test)]
mod tests {
    use reqgen::extract::extract_requirements;

    use super::*;

    fn extract_with(args: &[&str]) -> Extract {
        let mut argv = vec!["extract"];
        argv.extend_from_slice(args);
        Extract::try_parse_from(argv).unwrap()
    }

    fn sample() -> Vec<Requirement> {
        extract_requirements([
            "TR-1: Users can log in",
            "BR-2: Logins are audited",
            "NFR-3: Login takes under a second",
        ])
    }

    #[test]
    fn no_filter_keeps_everything() {
        assert_eq!(extract_with(&[]).filtered(sample()).len(), 3);
    }

    #[test]
    fn filter_matches_ids() {
        let kept = extract_with(&["--filter", "^NFR-"]).filtered(sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id().as_str(), "NFR-3");
    }

    #[test]
    fn filter_matches_text() {
        let kept = extract_with(&["--filter", "(?i)audit"]).filtered(sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id().as_str(), "BR-2");
    }

    #[test]
    fn invalid_filter_is_rejected_by_the_parser() {
        assert!(Extract::try_parse_from(["extract", "--filter", "("]).is_err());
    }

    #[test]
    fn missing_document_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("nowhere.docx");

        let error = extract_with(&["--input", input.to_str().unwrap()])
            .run()
            .unwrap_err();

        assert!(error.to_string().contains("nowhere.docx"));
    }
}
