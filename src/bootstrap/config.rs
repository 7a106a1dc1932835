use mdimg_events::{AppEvent, EventBus};
use mdimg_config::Config;
use mdimg_filesystem::FileSystem;
use anyhow::Result;
use std::sync::Arc;

pub async fn load(config_path: &str, events: &Arc<EventBus>) -> Result<Config> {
    let abs_config_path = FileSystem::get_absolute_path_string(config_path)?;

    events.emit(AppEvent::ConfigLoading {
        path: abs_config_path.clone(),
    });

    let config_exists = std::path::Path::new(config_path).exists();
    let mut config = Config::from_file_with_events(config_path, Some(events)).await?;

    if !config_exists {
        events.emit(AppEvent::ConfigCreated {
            path: abs_config_path.clone(),
        });
    }

    apply_env_overrides(&mut config);

    events.emit(AppEvent::ConfigLoaded {
        path: abs_config_path,
    });

    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(port) = std::env::var("PORT") {
        match port.parse::<u16>() {
            Ok(port) => {
                tracing::debug!("PORT overrides server.port: {}", port);
                config.server.port = port;
            }
            Err(_) => tracing::warn!("Ignoring invalid PORT value '{}'", port),
        }
    }
}
