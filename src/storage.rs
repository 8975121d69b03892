/// Paragraph extraction from Word documents.
pub mod docx;
/// Minimal spreadsheet writing and reading.
pub mod workbook;

pub use docx::{DocumentError, read_paragraphs};
pub use workbook::WorkbookError;
