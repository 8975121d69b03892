use std::fmt;

/// The environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// The prefix a project-scoped key is expected to start with.
pub const EXPECTED_PREFIX: &str = "sk-proj-";

/// An API credential read from the environment.
///
/// The key is kept exactly as read. Its shape is classified by
/// [`ApiKey::status`], but a badly shaped key is never rejected here: the
/// remote API is the authority and will refuse it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Option<String>);

impl ApiKey {
    /// Reads the key from [`API_KEY_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        Self(std::env::var(API_KEY_VAR).ok())
    }

    /// Wraps an explicit key value.
    #[must_use]
    pub fn new(value: Option<String>) -> Self {
        Self(value)
    }

    /// Classifies the shape of the key.
    #[must_use]
    pub fn status(&self) -> KeyStatus {
        KeyStatus::check(self.0.as_deref())
    }

    /// Returns the raw key, or an empty string when none was found.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_deref().unwrap_or_default()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shown = if self.0.is_some() { "***" } else { "<unset>" };
        f.debug_tuple("ApiKey").field(&shown).finish()
    }
}

/// The result of checking the shape of an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    /// No key, or an empty one.
    Missing,
    /// The key does not start with [`EXPECTED_PREFIX`].
    WrongPrefix,
    /// The key has leading or trailing whitespace.
    SurroundingWhitespace,
    /// Nothing obviously wrong.
    Valid,
}

impl KeyStatus {
    /// Classifies a raw key value.
    ///
    /// Checks run in order: missing, prefix, whitespace.
    #[must_use]
    pub fn check(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Missing,
            Some(key) if !key.starts_with(EXPECTED_PREFIX) => Self::WrongPrefix,
            Some(key) if key.trim() != key => Self::SurroundingWhitespace,
            Some(_) => Self::Valid,
        }
    }

    /// Whether the key looks usable.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// A human-readable description of the status.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Missing => "No API key was found",
            Self::WrongPrefix => {
                "An API key was found, but it doesn't start sk-proj-; please check you're using \
                 the right key"
            }
            Self::SurroundingWhitespace => {
                "An API key was found, but it looks like it might have space or tab characters \
                 at the start or end - please remove them to proceed"
            }
            Self::Valid => "API key found and looks good so far!",
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(None, KeyStatus::Missing; "unset")]
    #[test_case(Some(""), KeyStatus::Missing; "empty")]
    #[test_case(Some("sk-abc123"), KeyStatus::WrongPrefix; "legacy prefix")]
    #[test_case(Some(" sk-proj-abc"), KeyStatus::WrongPrefix; "leading space fails prefix first")]
    #[test_case(Some("sk-proj-abc\t"), KeyStatus::SurroundingWhitespace; "trailing tab")]
    #[test_case(Some("sk-proj-abc"), KeyStatus::Valid; "valid")]
    fn classification(raw: Option<&str>, expected: KeyStatus) {
        assert_eq!(KeyStatus::check(raw), expected);
    }

    #[test]
    fn only_valid_is_valid() {
        assert!(KeyStatus::Valid.is_valid());
        assert!(!KeyStatus::Missing.is_valid());
        assert!(!KeyStatus::WrongPrefix.is_valid());
        assert!(!KeyStatus::SurroundingWhitespace.is_valid());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = ApiKey::new(Some("sk-proj-secret".to_string()));
        let debug = format!("{key:?}");
        assert!(!debug.contains("secret"));
        assert_eq!(key.expose(), "sk-proj-secret");
    }

    #[test]
    fn missing_key_exposes_empty_string() {
        let key = ApiKey::new(None);
        assert_eq!(key.status(), KeyStatus::Missing);
        assert_eq!(key.expose(), "");
    }

    #[test]
    fn message_matches_status() {
        assert_eq!(KeyStatus::Missing.to_string(), "No API key was found");
        assert_eq!(
            KeyStatus::Valid.to_string(),
            "API key found and looks good so far!"
        );
    }
}
