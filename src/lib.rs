//! Manual Test Case Generation
//!
//! Requirements tagged `TR-n`, `BR-n` or `NFR-n` are read from a Word
//! document, sent to a chat-completion model, and the test cases it returns
//! are written to a spreadsheet.

pub mod domain;
pub use domain::{ApiKey, Config, KeyStatus, Requirement, RequirementId, Settings, TestCase};

/// Reading documents and writing spreadsheets.
pub mod storage;

pub mod export;
pub mod extract;
pub mod generate;
pub mod parse;
pub mod pipeline;

pub use generate::{Completion, OpenAiClient};
pub use pipeline::{Pipeline, PipelineError, Progress, RunReport};
