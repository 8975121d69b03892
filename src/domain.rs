//! Domain models for test case generation.
//!
//! This module contains the core domain types: requirements and their
//! identifiers, generated test cases, the API credential and configuration.

/// Requirement domain model.
pub mod requirement;
pub use requirement::{Requirement, RequirementView};

/// Requirement identifier types and parsing.
pub mod requirement_id;
pub use requirement_id::{Error as RequirementIdError, Kind, RequirementId};

/// Test case records and their columns.
pub mod test_case;
pub use test_case::{DEFAULT_PRIORITY, Field, TestCase};

mod api_key;
pub use api_key::{API_KEY_VAR, ApiKey, EXPECTED_PREFIX, KeyStatus};

mod config;
pub use config::Config;

mod settings;
pub use settings::{DEFAULT_INPUT, DEFAULT_OUTPUT, Settings};
