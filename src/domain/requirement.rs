use non_empty_string::NonEmptyString;
use serde::Serialize;

use crate::domain::RequirementId;

/// A tagged requirement statement taken from a document.
///
/// Requirements are produced by the extractor, one per qualifying paragraph,
/// and are not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    id: RequirementId,
    text: NonEmptyString,
}

impl Requirement {
    /// Construct a new [`Requirement`].
    ///
    /// Returns `None` if `text` is empty after trimming.
    #[must_use]
    pub fn new(id: RequirementId, text: &str) -> Option<Self> {
        let text = NonEmptyString::new(text.trim().to_string()).ok()?;
        Some(Self { id, text })
    }

    /// The requirement's identifier.
    #[must_use]
    pub const fn id(&self) -> &RequirementId {
        &self.id
    }

    /// The requirement's statement, without the identifier.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// A borrowed, serializable view of this requirement.
    #[must_use]
    pub fn view(&self) -> RequirementView<'_> {
        RequirementView {
            id: self.id.as_str(),
            text: self.text.as_str(),
        }
    }
}

/// A borrowed view of a requirement, suitable for serialization.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RequirementView<'a> {
    /// The requirement identifier as written in the document.
    pub id: &'a str,
    /// The requirement statement.
    pub text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RequirementId {
        s.parse().unwrap()
    }

    #[test]
    fn text_is_trimmed() {
        let requirement = Requirement::new(id("TR-1"), "  The system shall log in.  ").unwrap();
        assert_eq!(requirement.text(), "The system shall log in.");
        assert_eq!(requirement.id().as_str(), "TR-1");
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(Requirement::new(id("BR-2"), "   ").is_none());
        assert!(Requirement::new(id("BR-2"), "").is_none());
    }

    #[test]
    fn view_serializes_as_id_and_text() {
        let requirement = Requirement::new(id("NFR-3"), "Pages load in 2s").unwrap();
        let json = serde_json::to_string(&requirement.view()).unwrap();
        assert_eq!(json, r#"{"id":"NFR-3","text":"Pages load in 2s"}"#);
    }
}
