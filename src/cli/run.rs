use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use reqgen::{
    ApiKey, Config, OpenAiClient, Pipeline, Progress, RunReport, Settings,
    domain::{DEFAULT_INPUT, DEFAULT_OUTPUT},
    pipeline,
};
use tracing::instrument;

use super::{check, terminal::Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "Generate test cases for a requirements document")]
pub struct Run {
    /// The requirements document to read [default: requirements.docx]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// The spreadsheet to write [default: testcases.xlsx]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of requirements to process (0 for no limit)
    #[arg(long, conflicts_with = "all")]
    limit: Option<usize>,

    /// Process every requirement in the document
    #[arg(long)]
    all: bool,

    /// Number of test cases to request per requirement
    #[arg(long)]
    cases: Option<usize>,

    /// Chat-completion model to use
    #[arg(long)]
    model: Option<String>,
}

impl Run {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: Config) -> anyhow::Result<()> {
        let settings = self.settings(config, ApiKey::from_env());
        check::report(settings.api_key().status());

        let client = OpenAiClient::new(settings.api_key().clone(), settings.config())
            .context("failed to set up the HTTP client")?;
        tracing::debug!(endpoint = client.endpoint(), model = %settings.config().model);
        let pipeline = Pipeline::new(client, settings.config());

        let progress = ProgressBar::hidden();
        let report = pipeline::run(
            &pipeline,
            settings.input(),
            settings.output(),
            |event| match event {
                Progress::Started { total } => {
                    progress.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                    progress.set_length(u64::try_from(total).unwrap_or(u64::MAX));
                    progress.set_style(bar_style());
                }
                Progress::Finished {
                    requirement,
                    cases,
                } => {
                    progress.set_message(format!("{}: {cases} test cases", requirement.id()));
                    progress.inc(1);
                }
            },
        );
        progress.finish_and_clear();

        let report = report.with_context(|| {
            format!(
                "failed to generate test cases from {}",
                settings.input().display()
            )
        })?;

        print_report(&report, &settings);
        Ok(())
    }

    /// Applies the command line overrides to `config`.
    fn settings(self, mut config: Config, api_key: ApiKey) -> Settings {
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(cases) = self.cases {
            config.set_cases_per_requirement(cases);
        }
        if self.all {
            config.set_requirement_limit(None);
        } else if let Some(limit) = self.limit {
            config.set_requirement_limit(Some(limit));
        }

        Settings::new(
            config,
            api_key,
            self.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        )
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

fn print_report(report: &RunReport, settings: &Settings) {
    println!(
        "Found {} requirements, processed {}",
        report.requirements_found, report.requirements_processed
    );
    if report.requirements_processed < report.requirements_found {
        println!("{}", "Use --all to process every requirement.".dim());
    }
    println!(
        "{}",
        format!(
            "✅ Wrote {} test cases to {}",
            report.export.read_back,
            settings.output().display()
        )
        .success()
    );
}
