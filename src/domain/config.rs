use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

/// Settings that control how test cases are generated.
///
/// These are read from an optional TOML file. Command line flags override
/// individual values after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Name of the chat-completion model.
    pub model: String,

    /// Sampling temperature sent with every request.
    ///
    /// Kept low so the model sticks to the requested table layout.
    pub temperature: f64,

    /// Base URL of an OpenAI-compatible API, without a trailing slash.
    pub api_base: String,

    /// The number of test cases requested for each requirement.
    cases_per_requirement: usize,

    /// The maximum number of requirements sent to the model.
    ///
    /// `None` processes every requirement in the document.
    requirement_limit: Option<usize>,

    /// Request timeout in seconds. `None` keeps the HTTP client default.
    timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            api_base: default_api_base(),
            cases_per_requirement: default_cases(),
            requirement_limit: Some(default_limit()),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the number of test cases requested per requirement.
    #[must_use]
    pub const fn cases_per_requirement(&self) -> usize {
        self.cases_per_requirement
    }

    /// Sets the number of test cases requested per requirement.
    ///
    /// Zero is raised to one.
    pub fn set_cases_per_requirement(&mut self, cases: usize) {
        self.cases_per_requirement = cases.max(1);
    }

    /// Returns the maximum number of requirements to process, if any.
    #[must_use]
    pub const fn requirement_limit(&self) -> Option<usize> {
        self.requirement_limit
    }

    /// Sets the maximum number of requirements to process.
    ///
    /// `None` (or `Some(0)`) removes the limit.
    pub fn set_requirement_limit(&mut self, limit: Option<usize>) {
        self.requirement_limit = limit.filter(|&n| n > 0);
    }

    /// Returns the request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Sets the request timeout in seconds.
    pub const fn set_timeout_secs(&mut self, secs: Option<u64>) {
        self.timeout_secs = secs;
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_temperature() -> f64 {
    0.2
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

const fn default_cases() -> usize {
    3
}

const fn default_limit() -> usize {
    3
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_model")]
        model: String,

        #[serde(default = "default_temperature")]
        temperature: f64,

        #[serde(default = "default_api_base")]
        api_base: String,

        #[serde(default = "default_cases")]
        cases_per_requirement: usize,

        /// Zero means no limit.
        #[serde(default = "default_limit")]
        requirement_limit: usize,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_secs: Option<u64>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                model,
                temperature,
                api_base,
                cases_per_requirement,
                requirement_limit,
                timeout_secs,
            } => Self {
                model,
                temperature,
                api_base: api_base.trim_end_matches('/').to_string(),
                cases_per_requirement: cases_per_requirement.max(1),
                requirement_limit: Some(requirement_limit).filter(|&n| n > 0),
                timeout_secs,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            model: config.model,
            temperature: config.temperature,
            api_base: config.api_base,
            cases_per_requirement: config.cases_per_requirement,
            requirement_limit: config.requirement_limit.unwrap_or(0),
            timeout_secs: config.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nmodel = \"gpt-4o\"\ntemperature = 0.0\napi_base = \"http://localhost:8080/v1/\"\ncases_per_requirement = 5\nrequirement_limit = 0\ntimeout_secs = 30\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert!(config.temperature.abs() < f64::EPSILON);
        assert_eq!(config.api_base, "http://localhost:8080/v1");
        assert_eq!(config.cases_per_requirement(), 5);
        assert_eq!(config.requirement_limit(), None);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ncases_per_requirement = \"three\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn defaults_match_batch_run() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert!((config.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.cases_per_requirement(), 3);
        assert_eq!(config.requirement_limit(), Some(3));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("reqgen.toml");

        let mut config = Config::default();
        config.set_requirement_limit(None);
        config.set_cases_per_requirement(4);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let mut config = Config::default();
        config.set_requirement_limit(Some(0));
        assert_eq!(config.requirement_limit(), None);

        config.set_cases_per_requirement(0);
        assert_eq!(config.cases_per_requirement(), 1);
    }
}
