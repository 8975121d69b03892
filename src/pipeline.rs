//! The end-to-end flow: document → requirements → test cases → spreadsheet.
//!
//! [`Pipeline`] holds the part that turns requirements into test cases. It is
//! generic over the [`Completion`] service, so it runs without a network in
//! tests. [`run`] wraps it with the document read and the spreadsheet export.

use std::path::Path;

use nonempty::NonEmpty;

use crate::{
    domain::{Config, Requirement, TestCase},
    export::{ExportError, ExportSummary, export_test_cases},
    extract::extract_from_document,
    generate::{Completion, GenerateError, generate_test_cases},
    parse::parse_test_cases,
    storage::DocumentError,
};

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input document could not be read.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The document contained no requirements.
    #[error("no requirements found in document")]
    NoRequirements,

    /// The completion service failed for a requirement.
    #[error("failed to generate test cases for {requirement}")]
    Generate {
        /// The requirement being processed.
        requirement: String,
        /// The underlying failure.
        #[source]
        source: GenerateError,
    },

    /// No reply contained a usable test case row.
    #[error("no test cases generated from requirements")]
    NoTestCases,

    /// Writing or validating the spreadsheet failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Checks that at least one requirement was found.
///
/// # Errors
///
/// Returns [`PipelineError::NoRequirements`] if `requirements` is empty.
pub fn require_requirements(
    requirements: Vec<Requirement>,
) -> Result<NonEmpty<Requirement>, PipelineError> {
    NonEmpty::from_vec(requirements).ok_or(PipelineError::NoRequirements)
}

/// Progress reported while test cases are generated.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// Generation is about to start for `total` requirements.
    Started {
        /// The number of requirements that will be sent.
        total: usize,
    },
    /// One requirement has been processed.
    Finished {
        /// The requirement just processed.
        requirement: &'a Requirement,
        /// The number of test cases parsed from its reply.
        cases: usize,
    },
}

/// Turns requirements into test cases, one requirement at a time.
#[derive(Debug)]
pub struct Pipeline<C> {
    client: C,
    cases_per_requirement: usize,
    requirement_limit: Option<usize>,
}

impl<C: Completion> Pipeline<C> {
    /// Creates a pipeline using the case count and requirement limit from
    /// `config`.
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            cases_per_requirement: config.cases_per_requirement(),
            requirement_limit: config.requirement_limit(),
        }
    }

    /// The requirements that will be processed, in document order.
    pub fn selected<'a>(
        &self,
        requirements: &'a NonEmpty<Requirement>,
    ) -> impl Iterator<Item = &'a Requirement> {
        let limit = self.requirement_limit.unwrap_or(usize::MAX);
        requirements.iter().take(limit)
    }

    /// Generates and parses test cases for one requirement.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion service fails.
    pub fn test_cases_for(&self, requirement: &Requirement) -> Result<Vec<TestCase>, PipelineError> {
        let reply = generate_test_cases(&self.client, requirement, self.cases_per_requirement)
            .map_err(|source| PipelineError::Generate {
                requirement: requirement.id().to_string(),
                source,
            })?;

        let cases = parse_test_cases(&reply, requirement.id());
        if cases.is_empty() {
            tracing::warn!(requirement = %requirement.id(), "reply contained no test case rows");
        } else {
            tracing::info!(requirement = %requirement.id(), cases = cases.len(), "parsed test cases");
        }
        Ok(cases)
    }

    /// Generates test cases for every selected requirement, in order.
    ///
    /// `on_progress` receives [`Progress::Started`] once, then
    /// [`Progress::Finished`] after each requirement.
    ///
    /// # Errors
    ///
    /// Stops at the first completion failure. Returns
    /// [`PipelineError::NoTestCases`] if no reply contained a test case.
    pub fn generate<F>(
        &self,
        requirements: &NonEmpty<Requirement>,
        mut on_progress: F,
    ) -> Result<Vec<TestCase>, PipelineError>
    where
        F: FnMut(Progress<'_>),
    {
        let selected: Vec<&Requirement> = self.selected(requirements).collect();
        on_progress(Progress::Started {
            total: selected.len(),
        });

        let mut all = Vec::new();
        for requirement in selected {
            let cases = self.test_cases_for(requirement)?;
            on_progress(Progress::Finished {
                requirement,
                cases: cases.len(),
            });
            all.extend(cases);
        }

        if all.is_empty() {
            return Err(PipelineError::NoTestCases);
        }
        Ok(all)
    }
}

/// Counts reported by [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Requirements found in the document.
    pub requirements_found: usize,
    /// Requirements sent to the completion service.
    pub requirements_processed: usize,
    /// Test cases parsed across all replies.
    pub test_cases: usize,
    /// Result of the spreadsheet export.
    pub export: ExportSummary,
}

/// Runs the whole flow: reads `input`, generates test cases and writes them
/// to `output`.
///
/// # Errors
///
/// Returns an error if the document cannot be read, holds no requirements,
/// the completion service fails, no test cases are parsed, or the export
/// fails its read-back check.
pub fn run<C, F>(
    pipeline: &Pipeline<C>,
    input: &Path,
    output: &Path,
    on_progress: F,
) -> Result<RunReport, PipelineError>
where
    C: Completion,
    F: FnMut(Progress<'_>),
{
    let requirements = require_requirements(extract_from_document(input)?)?;
    let requirements_processed = pipeline.selected(&requirements).count();

    let cases = pipeline.generate(&requirements, on_progress)?;
    let export = export_test_cases(output, &cases)?;

    Ok(RunReport {
        requirements_found: requirements.len(),
        requirements_processed,
        test_cases: cases.len(),
        export,
    })
}
