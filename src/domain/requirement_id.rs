use std::{fmt, str::FromStr};

/// The category of a requirement, taken from the prefix of its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Technical requirement (`TR`).
    Technical,
    /// Business requirement (`BR`).
    Business,
    /// Non-functional requirement (`NFR`).
    NonFunctional,
}

impl Kind {
    /// Returns the canonical uppercase prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Technical => "TR",
            Self::Business => "BR",
            Self::NonFunctional => "NFR",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for Kind {
    type Err = Error;

    /// Parses a kind prefix, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TR" => Ok(Self::Technical),
            "BR" => Ok(Self::Business),
            "NFR" => Ok(Self::NonFunctional),
            _ => Err(Error::Kind(s.to_string())),
        }
    }
}

/// The identifier of a requirement, such as `TR-5` or `nfr-12`.
///
/// Format: `{KIND}-{NUMBER}`, where:
/// - `KIND` is one of `TR`, `BR` or `NFR`, in any case
/// - `NUMBER` is a non-empty run of ASCII digits
///
/// The identifier keeps the spelling it was parsed from, so `tr-1` displays
/// as `tr-1`. Equality compares that spelling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequirementId {
    raw: String,
    kind: Kind,
}

impl RequirementId {
    /// Returns the identifier as written in the source document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the kind component.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the digits following the dash.
    ///
    /// ```
    /// use reqgen::RequirementId;
    ///
    /// let id: RequirementId = "NFR-007".parse().unwrap();
    /// assert_eq!(id.number(), "007");
    /// ```
    #[must_use]
    pub fn number(&self) -> &str {
        // The first dash always follows the kind prefix.
        self.raw
            .split_once('-')
            .map_or("", |(_, digits)| digits)
    }

    /// Returns the identifier in canonical uppercase form (`tr-1` -> `TR-1`).
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}-{}", self.kind, self.number())
    }

    /// Checks whether `other` names the same requirement, ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.raw.eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for RequirementId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

/// Errors that can occur while parsing a requirement identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Malformed structure (no dash, empty parts, trailing text).
    #[error("Invalid requirement ID format: {0}")]
    Syntax(String),

    /// Unknown kind prefix.
    #[error("Invalid requirement kind '{0}': expected TR, BR or NFR")]
    Kind(String),

    /// The number part is not a run of ASCII digits.
    #[error("Invalid number in requirement ID '{0}': expected digits, got '{1}'")]
    Number(String, String),
}

impl FromStr for RequirementId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind_str, digits)) = s.split_once('-') else {
            return Err(Error::Syntax(s.to_string()));
        };

        if kind_str.is_empty() || digits.is_empty() {
            return Err(Error::Syntax(s.to_string()));
        }

        let kind = kind_str.parse::<Kind>()?;

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Number(s.to_string(), digits.to_string()));
        }

        Ok(Self {
            raw: s.to_string(),
            kind,
        })
    }
}

impl TryFrom<&str> for RequirementId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}
