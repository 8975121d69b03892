//! A single-sheet `.xlsx` writer and a reader for checking what was written.
//!
//! The writer produces the smallest package spreadsheet applications accept:
//! a workbook part, one worksheet with inline strings, and the relationship
//! parts that tie them together. Reading goes through `calamine`, so a file
//! that reads back here also opens in a spreadsheet application.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufWriter, Seek, Write},
    path::Path,
};

use calamine::{Data, Reader, open_workbook_auto};
use zip::{ZipWriter, write::SimpleFileOptions};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Errors that can occur when writing or reading a workbook.
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    /// The file could not be created or written.
    #[error("failed to write workbook: {0}")]
    Io(#[from] io::Error),

    /// The ZIP container could not be assembled.
    #[error("failed to package workbook: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The file could not be opened or parsed as a spreadsheet.
    #[error("failed to read workbook: {0}")]
    Read(#[from] calamine::Error),

    /// The workbook contains no worksheets.
    #[error("workbook has no worksheets")]
    NoSheets,
}

/// Writes a workbook with one sheet: `header` as the first row, then `rows`.
///
/// An existing file at `path` is overwritten.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write<'a, R>(
    path: &Path,
    sheet_name: &str,
    header: &[&str],
    rows: R,
) -> Result<(), WorkbookError>
where
    R: IntoIterator,
    R::Item: AsRef<[&'a str]>,
{
    let file = File::create(path)?;
    let writer = write_to(BufWriter::new(file), sheet_name, header, rows)?;
    writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    Ok(())
}

/// Writes a workbook to any seekable writer, returning the writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_to<'a, W, R>(
    writer: W,
    sheet_name: &str,
    header: &[&str],
    rows: R,
) -> Result<W, WorkbookError>
where
    W: Write + Seek,
    R: IntoIterator,
    R::Item: AsRef<[&'a str]>,
{
    let options = SimpleFileOptions::default();
    let mut zip = ZipWriter::new(writer);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml(sheet_name).as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS.as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    write_sheet(&mut zip, header, rows)?;

    Ok(zip.finish()?)
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(&sheet_name_safe(sheet_name))
    )
}

fn write_sheet<'a, W, R>(out: &mut W, header: &[&str], rows: R) -> io::Result<()>
where
    W: Write,
    R: IntoIterator,
    R::Item: AsRef<[&'a str]>,
{
    out.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    )?;

    write_row(out, 1, header)?;
    for (index, row) in rows.into_iter().enumerate() {
        write_row(out, index + 2, row.as_ref())?;
    }

    out.write_all(b"</sheetData></worksheet>")
}

fn write_row<W: Write>(out: &mut W, number: usize, cells: &[&str]) -> io::Result<()> {
    write!(out, r#"<row r="{number}">"#)?;
    for (column, value) in cells.iter().enumerate() {
        write!(
            out,
            r#"<c r="{}{number}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            column_name(column),
            escape(value)
        )?;
    }
    out.write_all(b"</row>")
}

/// Converts a zero-based column index to its letter name (`0` -> `A`, `26` -> `AA`).
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        // `index % 26` is always below 26, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Escapes text for XML, dropping control characters XML 1.0 cannot carry.
fn escape(value: &str) -> Cow<'_, str> {
    let allowed = |c: char| !c.is_control() || matches!(c, '\t' | '\n' | '\r');
    if value.chars().all(allowed) {
        quick_xml::escape::escape(value)
    } else {
        let cleaned: String = value.chars().filter(|&c| allowed(c)).collect();
        Cow::Owned(quick_xml::escape::escape(cleaned.as_str()).into_owned())
    }
}

/// Sheet names are limited to 31 characters and may not contain `[]:*?/\`.
fn sheet_name_safe(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

/// Reads every row of the first sheet of the workbook at `path`.
///
/// Cells are returned as strings; empty cells become empty strings.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed, or contains no
/// sheets.
pub fn read(path: &Path) -> Result<Vec<Vec<String>>, WorkbookError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(WorkbookError::NoSheets)?;
    let range = workbook.worksheet_range(&sheet)?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0, "A")]
    #[test_case(6, "G")]
    #[test_case(25, "Z")]
    #[test_case(26, "AA")]
    #[test_case(27, "AB")]
    #[test_case(701, "ZZ")]
    #[test_case(702, "AAA")]
    fn column_names(index: usize, expected: &str) {
        assert_eq!(column_name(index), expected);
    }

    #[test]
    fn escape_handles_markup_and_control_characters() {
        assert_eq!(escape("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape("bell\u{7}ring"), "bellring");
        assert_eq!(escape("tab\tkept"), "tab\tkept");
    }

    #[test]
    fn sheet_names_are_sanitised() {
        assert_eq!(sheet_name_safe("Test Cases"), "Test Cases");
        assert_eq!(sheet_name_safe("a/b:c"), "abc");
        assert_eq!(sheet_name_safe("[]"), "Sheet1");
        assert_eq!(sheet_name_safe(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn written_rows_read_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.xlsx");

        let rows = vec![
            vec!["1", "first <row>"],
            vec!["2", "second & \"quoted\""],
        ];
        write(&path, "Data", &["ID", "Value"], &rows).unwrap();

        let table = read(&path).unwrap();
        assert_eq!(
            table,
            vec![
                vec!["ID", "Value"],
                vec!["1", "first <row>"],
                vec!["2", "second & \"quoted\""],
            ]
        );
    }

    #[test]
    fn header_only_workbook_has_one_row() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.xlsx");

        write(&path, "Data", &["ID"], Vec::<Vec<&str>>::new()).unwrap();

        assert_eq!(read(&path).unwrap(), vec![vec!["ID"]]);
    }

    #[test]
    fn write_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.xlsx");
        std::fs::write(&path, b"stale").unwrap();

        write(&path, "Data", &["ID"], [["fresh"]]).unwrap();

        assert_eq!(read(&path).unwrap(), vec![vec!["ID"], vec!["fresh"]]);
    }

    #[test]
    fn reading_a_non_workbook_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bogus.xlsx");
        std::fs::write(&path, b"not a zip").unwrap();

        assert!(matches!(read(&path), Err(WorkbookError::Read(_))));
    }
}
