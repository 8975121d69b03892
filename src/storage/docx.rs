//! Plain-text paragraphs from a `.docx` document.
//!
//! A `.docx` file is a ZIP container. The body lives in `word/document.xml`:
//!
//! ```xml
//! <w:body>
//!   <w:p>
//!     <w:r><w:t>TR-1</w:t></w:r>
//!     <w:r><w:t xml:space="preserve">: The system shall</w:t></w:r>
//!   </w:p>
//! </w:body>
//! ```
//!
//! Each `w:p` becomes one string made of its `w:t` runs, in document order.
//! Paragraphs inside tables are included where they appear.

use std::{
    fs::File,
    io::{self, BufReader, Read, Seek},
    path::Path,
};

use quick_xml::{Reader, events::Event};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Errors that can occur when reading a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The file could not be opened or read.
    #[error("failed to read document: {0}")]
    Io(#[from] io::Error),

    /// The file is not a ZIP container, or lacks `word/document.xml`.
    #[error("not a valid .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// `word/document.xml` is not well-formed.
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Reads the paragraphs of the `.docx` file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not a `.docx` archive, or
/// its body XML is malformed.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>, DocumentError> {
    let file = File::open(path)?;
    read_paragraphs_from(BufReader::new(file))
}

/// Reads the paragraphs of a `.docx` archive from any seekable reader.
///
/// # Errors
///
/// See [`read_paragraphs`].
pub fn read_paragraphs_from<R: Read + Seek>(reader: R) -> Result<Vec<String>, DocumentError> {
    let mut archive = ZipArchive::new(reader)?;

    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let paragraphs = paragraphs_from_xml(&xml)?;
    tracing::debug!(count = paragraphs.len(), "read document paragraphs");
    Ok(paragraphs)
}

/// Collects paragraph text from the body XML.
///
/// Paragraphs nested inside other paragraphs (text boxes) are emitted when
/// they close, before the paragraph that contains them.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            // `w:tab` also appears in paragraph properties as a tab stop.
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_run => push_text(&mut open, "\t"),
                b"w:br" | b"w:cr" if in_run => push_text(&mut open, "\n"),
                _ => {}
            },
            Event::Text(text) if in_text => push_text(&mut open, &text.unescape()?),
            Event::CData(text) if in_text => {
                push_text(&mut open, &String::from_utf8_lossy(&text.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_text(open: &mut [String], text: &str) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push_str(text);
    }
}
