//! Parsing model replies into test case records.
//!
//! A reply is expected to hold a markdown table:
//!
//! ```text
//! | Test Case ID | Requirement ID | Test Description | ... | Priority |
//! |--------------|----------------|------------------|-----|----------|
//! | TC-1         | TR-1           | Login works      | ... | High     |
//! ```
//!
//! Only lines starting with `|` are considered. A header row fixes which
//! column holds which field; without one, the first seven cells are taken in
//! [`Field::ALL`] order. Separator rows and rows with fewer than seven cells
//! are dropped, as is any prose around the table.

use crate::domain::{Field, RequirementId, TestCase};

/// Parses every test case row in `raw`.
///
/// `requirement_id` is the requirement the reply was generated for. Rows are
/// not filtered by it; a row naming a different requirement is kept and
/// logged as a warning.
#[must_use]
pub fn parse_test_cases(raw: &str, requirement_id: &RequirementId) -> Vec<TestCase> {
    let mut columns: Option<ColumnMap> = None;
    let mut cases = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('-') || line.starts_with(Field::TestCaseId.header())
        {
            continue;
        }

        if !line.starts_with('|') {
            tracing::trace!(line, "ignored: not a table row");
            continue;
        }

        let cells = split_row(line);

        if is_separator(&cells) {
            continue;
        }

        if let Some(map) = ColumnMap::from_header(&cells) {
            tracing::trace!(?map, "found table header");
            columns = Some(map);
            continue;
        }

        let case = match &columns {
            Some(map) => map.test_case(&cells),
            None => positional(&cells),
        };

        let Some(case) = case else {
            tracing::trace!(line, cells = cells.len(), "ignored: too few cells");
            continue;
        };

        if !requirement_id.matches(&case.requirement_id) {
            tracing::warn!(
                expected = %requirement_id,
                found = %case.requirement_id,
                "test case names a different requirement"
            );
        }

        cases.push(case);
    }

    cases
}

/// Splits a table row into trimmed cells, dropping the outer pipes.
fn split_row(line: &str) -> Vec<&str> {
    line.trim_matches('|').split('|').map(str::trim).collect()
}

/// A row made only of dashes, colons and whitespace, such as `|---|:--:|`.
///
/// Rows of empty cells count too; they carry nothing.
fn is_separator(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|cell| cell.chars().all(|c| matches!(c, '-' | ':') || c.is_whitespace()))
}

/// The number of cells a data row needs, whatever the header says.
const MIN_CELLS: usize = Field::ALL.len();

/// Maps the first seven cells to fields in column order.
fn positional(cells: &[&str]) -> Option<TestCase> {
    let values: [&str; 7] = cells.get(..7)?.try_into().ok()?;
    Some(TestCase::from_fields(values.map(String::from)))
}

/// The column index of each field, learned from a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnMap {
    positions: [Option<usize>; 7],
}

impl ColumnMap {
    /// Reads a header row.
    ///
    /// A row is a header when one of its cells names the `Test Case ID`
    /// column. Unrecognised cells are ignored; if a field is named twice, the
    /// first column wins.
    fn from_header(cells: &[&str]) -> Option<Self> {
        let mut positions = [None; 7];
        for (index, cell) in cells.iter().enumerate() {
            if let Some(field) = Field::from_header(cell) {
                positions[field.index()].get_or_insert(index);
            }
        }

        positions[Field::TestCaseId.index()].map(|_| Self { positions })
    }

    /// Builds a test case from a data row.
    ///
    /// Returns `None` if the row has fewer than seven cells or is shorter than
    /// the header's rightmost recognised column. Fields missing from the
    /// header are left empty.
    fn test_case(&self, cells: &[&str]) -> Option<TestCase> {
        let width = self.positions.iter().flatten().max().map_or(0, |max| max + 1);
        if cells.len() < MIN_CELLS.max(width) {
            return None;
        }

        let values = self
            .positions
            .map(|position| position.map_or_else(String::new, |i| cells[i].to_string()));
        Some(TestCase::from_fields(values))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn tr1() -> RequirementId {
        "TR-1".parse().unwrap()
    }

    #[test]
    fn two_rows_without_header() {
        let raw = "\
| TC-1 | TR-1 | Login with valid creds | User registered | Enter user/pass, click login | Dashboard shown | High |
| TC-2 | TR-1 | Login with invalid pw | User registered | Enter user/pass, click login | Error shown | Medium |";

        let cases = parse_test_cases(raw, &tr1());

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].priority, "High");
        assert_eq!(cases[1].priority, "Medium");
        assert!(cases.iter().all(|c| c.requirement_id == "TR-1"));
        assert_eq!(cases[0].expected_result, "Dashboard shown");
        assert_eq!(cases[1].description, "Login with invalid pw");
    }

    #[test]
    fn full_markdown_table_skips_header_and_separator() {
        let raw = "\
Here are the test cases:

| Test Case ID | Requirement ID | Test Description | Preconditions | Test Steps | Expected Result | Priority |
|--------------|----------------|------------------|---------------|------------|-----------------|----------|
| TC-1 | TR-1 | Valid login | User exists | Log in | Dashboard | High |
| TC-2 | TR-1 | Bad password | User exists | Log in badly | Error | Low |

Let me know if you need more.";

        let cases = parse_test_cases(raw, &tr1());

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].test_case_id, "TC-1");
        assert_eq!(cases[1].priority, "Low");
    }

    #[test]
    fn separator_row_alone_yields_nothing() {
        let cases = parse_test_cases("|---|---|---|---|---|---|---|", &tr1());
        assert!(cases.is_empty());
    }

    #[test_case("|---|---|---|---|---|---|---|"; "dashes")]
    #[test_case("|:--|:-:|--:|---|---|---|---|"; "alignment colons")]
    #[test_case("| --- | --- | --- | --- | --- | --- | --- |"; "padded")]
    #[test_case("|   |   |   |   |   |   |   |"; "empty cells")]
    fn separators_are_detected(line: &str) {
        assert!(is_separator(&split_row(line)));
    }

    #[test]
    fn cells_with_dashes_and_text_are_data() {
        assert!(!is_separator(&split_row("| TC-1 | - | - | - | - | - | - |")));
    }

    #[test]
    fn empty_priority_defaults_to_medium() {
        let raw = "| TC-1 | TR-1 | a | b | c | d |  |";
        let cases = parse_test_cases(raw, &tr1());
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].priority, "Medium");
    }

    #[test]
    fn short_rows_and_prose_are_ignored() {
        let raw = "\
TC-1, TR-1, Login, none, steps, works, High
| TC-1 | TR-1 | Login | none | steps | works |
- bullet point
Test Case ID: TC-9";

        assert!(parse_test_cases(raw, &tr1()).is_empty());
    }

    #[test]
    fn extra_cells_beyond_seven_are_ignored_positionally() {
        let raw = "| TC-1 | TR-1 | a | b | c | d | High | extra |";
        let cases = parse_test_cases(raw, &tr1());
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].priority, "High");
    }

    #[test]
    fn reordered_header_maps_by_name() {
        let raw = "\
| Priority | Test Case ID | Expected Result | Requirement ID | Test Description | Preconditions | Test Steps |
|---|---|---|---|---|---|---|
| High | TC-7 | Saved | TR-1 | Save profile | Logged in | Click save |";

        let cases = parse_test_cases(raw, &tr1());

        assert_eq!(cases.len(), 1);
        let case = &cases[0];
        assert_eq!(case.test_case_id, "TC-7");
        assert_eq!(case.requirement_id, "TR-1");
        assert_eq!(case.description, "Save profile");
        assert_eq!(case.preconditions, "Logged in");
        assert_eq!(case.steps, "Click save");
        assert_eq!(case.expected_result, "Saved");
        assert_eq!(case.priority, "High");
    }

    #[test]
    fn short_rows_under_a_short_header_are_dropped() {
        let raw = "\
| Test Case ID | Test Description | Expected Result |
| TC-1 | Login | Dashboard |";

        assert!(parse_test_cases(raw, &tr1()).is_empty());
    }

    #[test]
    fn header_with_missing_columns_leaves_fields_empty() {
        let raw = "\
| **Test Case ID** | **Test Description** | **Expected Result** | Notes | Owner | Sprint | Tags |
| TC-1 | Login | Dashboard | n | o | s | t |";

        let cases = parse_test_cases(raw, &tr1());

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].test_case_id, "TC-1");
        assert_eq!(cases[0].expected_result, "Dashboard");
        assert_eq!(cases[0].requirement_id, "");
        assert_eq!(cases[0].priority, "Medium");
    }

    #[test]
    fn rows_shorter_than_header_are_dropped() {
        let raw = "\
| Test Case ID | Requirement ID | Test Description | Preconditions | Test Steps | Expected Result | Priority |
| TC-1 | TR-1 | only three |";

        assert!(parse_test_cases(raw, &tr1()).is_empty());
    }

    #[test]
    fn other_requirement_ids_are_kept() {
        let raw = "| TC-1 | TR-2 | a | b | c | d | Low |";
        let cases = parse_test_cases(raw, &tr1());
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].requirement_id, "TR-2");
    }

    #[test]
    fn header_detection_needs_test_case_id() {
        assert!(ColumnMap::from_header(&["Priority", "Test Steps"]).is_none());

        let map = ColumnMap::from_header(&["Test Case ID", "Priority", "Priority"]).unwrap();
        assert_eq!(map.positions[Field::TestCaseId.index()], Some(0));
        assert_eq!(map.positions[Field::Priority.index()], Some(1));
    }
}
