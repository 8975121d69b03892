use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use reqgen::{RequirementId, TestCase, domain::Field, parse::parse_test_cases};
use tracing::instrument;

use super::{
    extract::OutputFormat,
    terminal::{Colorize, is_narrow},
};

#[derive(Debug, Parser)]
#[command(about = "Parse a saved model reply into test cases")]
pub struct Parse {
    /// A file holding the raw reply text
    reply: PathBuf,

    /// The requirement the reply was generated for
    #[arg(long, short)]
    requirement: RequirementId,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    format: OutputFormat,
}

impl Parse {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let raw = std::fs::read_to_string(&self.reply)
            .with_context(|| format!("failed to read {}", self.reply.display()))?;

        let cases = parse_test_cases(&raw, &self.requirement);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cases)?),
            OutputFormat::Table => self.output_table(&cases),
        }
        Ok(())
    }

    fn output_table(&self, cases: &[TestCase]) {
        if cases.is_empty() {
            println!("{}", "⚠️  No test case rows found in reply.".warning());
            return;
        }

        if is_narrow() {
            for case in cases {
                println!("{}", case.test_case_id.info());
                for field in &Field::ALL[1..] {
                    println!("  {}: {}", field.header(), case.get(*field));
                }
            }
        } else {
            println!("{:<12} {:<10} {:<8} Description", "ID", "Req", "Priority");
            println!("{}", "─".repeat(70).dim());
            for case in cases {
                println!(
                    "{:<12} {:<10} {:<8} {}",
                    case.test_case_id, case.requirement_id, case.priority, case.description
                );
            }
        }

        let foreign = cases
            .iter()
            .filter(|case| !self.requirement.matches(&case.requirement_id))
            .count();
        if foreign > 0 {
            println!(
                "{}",
                format!("⚠️  {foreign} rows name a requirement other than {}", self.requirement)
                    .warning()
            );
        }

        println!();
        println!("Total: {}", cases.len());
    }
}
