use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot access config file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} does not match the expected settings: {source}")]
    Malformed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file {path} is not valid TOML: {source}")]
    Unparsable {
        path: String,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("Setting {setting} {problem}")]
    BadSetting { setting: String, problem: String },
}

impl ConfigError {
    pub(crate) fn unreadable(path: &Path, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn bad_setting(setting: &str, problem: &str) -> Self {
        Self::BadSetting {
            setting: setting.to_string(),
            problem: problem.to_string(),
        }
    }
}
