use std::path::{Path, PathBuf};

use super::{ApiKey, Config};

/// The default document read by a run.
pub const DEFAULT_INPUT: &str = "requirements.docx";

/// The default spreadsheet written by a run.
pub const DEFAULT_OUTPUT: &str = "testcases.xlsx";

/// Everything a run needs, resolved once at startup.
///
/// Built from the config file, the environment and command line flags, then
/// passed by reference.
#[derive(Debug, Clone)]
pub struct Settings {
    config: Config,
    api_key: ApiKey,
    input: PathBuf,
    output: PathBuf,
}

impl Settings {
    /// Bundles a configuration with a credential and the two file paths.
    #[must_use]
    pub const fn new(config: Config, api_key: ApiKey, input: PathBuf, output: PathBuf) -> Self {
        Self {
            config,
            api_key,
            input,
            output,
        }
    }

    /// Loads the config file at `path` if one is given, otherwise uses the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_config(path: Option<&Path>) -> Result<Config, String> {
        path.map_or_else(|| Ok(Config::default()), Config::load)
    }

    /// The generation settings.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The API credential.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// The document to read.
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// The spreadsheet to write.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(
            Config::default(),
            ApiKey::new(None),
            PathBuf::from(DEFAULT_INPUT),
            PathBuf::from(DEFAULT_OUTPUT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_paths() {
        let settings = Settings::default();
        assert_eq!(settings.input(), Path::new("requirements.docx"));
        assert_eq!(settings.output(), Path::new("testcases.xlsx"));
        assert_eq!(settings.config(), &Config::default());
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        assert_eq!(Settings::load_config(None).unwrap(), Config::default());
    }

    #[test]
    fn config_file_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("reqgen.toml");
        let mut config = Config::default();
        config.model = "gpt-4o".to_string();
        config.save(&path).unwrap();

        assert_eq!(Settings::load_config(Some(&path)).unwrap().model, "gpt-4o");
    }

    #[test]
    fn unreadable_config_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let error = Settings::load_config(Some(&tmp.path().join("missing.toml"))).unwrap_err();
        assert!(error.starts_with("Failed to read config file"));
    }
}
