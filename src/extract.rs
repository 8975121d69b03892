//! Requirement extraction.
//!
//! A paragraph is a requirement when, after stripping list bullets, it reads
//! `{ID}: {text}` with an identifier such as `TR-5`, `BR-12` or `NFR-3`:
//!
//! ```text
//! • TR-5: System shall log out after 10 minutes idle
//! ```
//!
//! Everything else is ignored.

use std::path::Path;

use crate::{
    domain::{Requirement, RequirementId},
    storage::{DocumentError, read_paragraphs},
};

/// Extracts requirements from the `.docx` document at `path`, in document order.
///
/// # Errors
///
/// Returns an error if the document cannot be opened or parsed. Paragraphs
/// that are not requirements are skipped, never reported.
pub fn extract_from_document(path: &Path) -> Result<Vec<Requirement>, DocumentError> {
    let paragraphs = read_paragraphs(path)?;
    let requirements = extract_requirements(&paragraphs);
    tracing::info!(
        paragraphs = paragraphs.len(),
        requirements = requirements.len(),
        "extracted requirements from {}",
        path.display()
    );
    Ok(requirements)
}

/// Extracts requirements from a sequence of paragraphs, keeping their order.
pub fn extract_requirements<I>(paragraphs: I) -> Vec<Requirement>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    paragraphs
        .into_iter()
        .filter_map(|paragraph| parse_requirement_line(paragraph.as_ref()))
        .collect()
}

/// Parses a single paragraph as a requirement.
///
/// Returns `None` for paragraphs without a colon, with an empty identifier or
/// statement, or whose identifier is not a requirement ID.
///
/// ```
/// use reqgen::extract::parse_requirement_line;
///
/// let requirement =
///     parse_requirement_line("- TR-5: System shall log out after 10 minutes idle").unwrap();
/// assert_eq!(requirement.id().as_str(), "TR-5");
/// assert_eq!(requirement.text(), "System shall log out after 10 minutes idle");
/// ```
#[must_use]
pub fn parse_requirement_line(paragraph: &str) -> Option<Requirement> {
    let line = strip_bullets(paragraph.trim());
    if line.is_empty() {
        return None;
    }

    let line = line.replace('：', ":");

    let Some((head, tail)) = line.split_once(':') else {
        tracing::trace!(paragraph, "skipped: no colon");
        return None;
    };

    let (head, tail) = (head.trim(), tail.trim());
    if head.is_empty() || tail.is_empty() {
        tracing::trace!(paragraph, "skipped: empty identifier or statement");
        return None;
    }

    match head.parse::<RequirementId>() {
        Ok(id) => Requirement::new(id, tail),
        Err(e) => {
            tracing::trace!(paragraph, error = %e, "skipped: not a requirement");
            None
        }
    }
}

/// Removes a leading run of bullets, dashes, asterisks and whitespace.
fn strip_bullets(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '•' | '-' | '*') || c.is_whitespace())
}
