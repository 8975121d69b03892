//! Spreadsheet export of generated test cases, with a read-back check.

use std::path::Path;

use crate::{
    domain::{Field, TestCase},
    storage::{WorkbookError, workbook},
};

/// The name of the worksheet holding the test cases.
pub const SHEET_NAME: &str = "Test Cases";

/// Errors that can occur while exporting test cases.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing or reading the workbook failed.
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    /// The file was not on disk after writing.
    #[error("spreadsheet was not created at {0}")]
    Missing(String),

    /// The file was read back but had no data rows.
    #[error("exported spreadsheet at {0} is empty")]
    Empty(String),
}

/// The outcome of a successful export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of test cases written.
    pub written: usize,
    /// Number of data rows found when reading the file back.
    pub read_back: usize,
}

/// Writes `cases` to a spreadsheet at `path`, then reads it back.
///
/// The sheet has a header row with the seven column names followed by one
/// row per test case. An existing file is overwritten.
///
/// # Errors
///
/// Returns an error if writing or reading fails, if the file does not exist
/// after writing, or if reading it back finds no data rows.
pub fn export_test_cases(path: &Path, cases: &[TestCase]) -> Result<ExportSummary, ExportError> {
    let header = Field::ALL.map(Field::header);
    workbook::write(path, SHEET_NAME, &header, cases.iter().map(TestCase::row))?;
    tracing::info!(rows = cases.len(), "wrote {}", path.display());

    if !path.exists() {
        return Err(ExportError::Missing(path.display().to_string()));
    }

    let read_back = workbook::read(path)?.len().saturating_sub(1);
    if read_back == 0 {
        return Err(ExportError::Empty(path.display().to_string()));
    }

    if read_back != cases.len() {
        tracing::warn!(
            written = cases.len(),
            read_back,
            "row count changed on read-back"
        );
    }

    Ok(ExportSummary {
        written: cases.len(),
        read_back,
    })
}

/// Reads test cases back from a spreadsheet written by [`export_test_cases`].
///
/// Columns are matched by their header names, so reordered columns are
/// tolerated. Missing columns read as empty strings.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_test_cases(path: &Path) -> Result<Vec<TestCase>, ExportError> {
    let mut rows = workbook::read(path)?.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let positions = Field::ALL.map(|field| {
        header
            .iter()
            .position(|cell| Field::from_header(cell) == Some(field))
    });

    let cases = rows
        .map(|row| {
            TestCase::from_fields(positions.map(|position| {
                position
                    .and_then(|i| row.get(i))
                    .cloned()
                    .unwrap_or_default()
            }))
        })
        .collect();
    Ok(cases)
}
