use super::defaults::DEFAULT_CONFIG_TEMPLATE;
use super::errors::ConfigError;
use super::migration::migrate_config_if_needed;
use super::models::Config;
use std::path::Path;
use std::sync::Arc;

impl Config {
    /// Loads configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_file_with_events(path, None).await
    }

    /// Loads configuration from a file with optional event bus for notifications
    pub async fn from_file_with_events<P: AsRef<Path>>(
        path: P,
        events: Option<&Arc<mdimg_events::EventBus>>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            create_default_config(path).await?;
        }

        migrate_config_if_needed(path, events).await?;

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::unreadable(path, e))?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Malformed {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.tool.trim().is_empty() {
            return Err(ConfigError::bad_setting("upload.tool", "names no uploader"));
        }
        if self.mapping.file.trim().is_empty() {
            return Err(ConfigError::bad_setting("mapping.file", "names no file"));
        }
        if self.scan.document_extensions.is_empty() {
            return Err(ConfigError::bad_setting(
                "scan.document_extensions",
                "lists no extension",
            ));
        }
        Ok(())
    }
}

/// Writes the commented default template
async fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    tokio::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .await
        .map_err(|e| ConfigError::unreadable(path, e))
}
