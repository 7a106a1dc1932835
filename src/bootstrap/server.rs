use mdimg_config::Config;
use mdimg_events::{AppEvent, EventBus};
use mdimg_hosting::{CommandHost, ImageHost};
use mdimg_manager::ImageManager;
use anyhow::Result;
use std::sync::Arc;

/// Builds the manager with the configured upload tool and loads the mapping
pub async fn initialize_manager(config: Arc<Config>, events: &Arc<EventBus>) -> Result<Arc<ImageManager>> {
    let host: Arc<dyn ImageHost> = Arc::new(CommandHost::from_settings(&config.upload));
    tracing::info!(
        "Upload tool: {} {} <image>",
        config.upload.tool,
        config.upload.command
    );

    let manager = ImageManager::new(config, Arc::clone(events), host).await?;
    Ok(Arc::new(manager))
}

pub async fn bind(addr: &str) -> Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            let port = addr.rsplit(':').next().unwrap_or("unknown");
            tracing::error!("Port {} is already in use", port);
            tracing::error!("Stop the other application, or set a different port (server.port or PORT)");
            #[cfg(target_os = "windows")]
            tracing::error!("Find the process with: netstat -ano | findstr :{}", port);
            #[cfg(not(target_os = "windows"))]
            tracing::error!("Find the process with: lsof -i :{}", port);
        } else {
            tracing::error!("Failed to bind server on {}: {}", addr, e);
        }
        anyhow::anyhow!("Failed to bind server: {}", e)
    })
}

pub async fn shutdown_signal(events: Arc<EventBus>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        events.emit(AppEvent::Error {
            context: "Ctrl+C handler".to_string(),
            error: e.to_string(),
        });
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
