mod bootstrap;

use mdimg_api::AppState;
use mdimg_events::{AppEvent, EventBus};
use crate::bootstrap::{config, logging, router, server};
use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize();

    let events = EventBus::new(false);
    events.emit(AppEvent::Starting);

    let config_path = std::env::var("MDIMG_CONFIG").unwrap_or_else(|_| "mdimg.toml".to_string());
    let config = Arc::new(config::load(&config_path, &events).await?);

    let manager = server::initialize_manager(Arc::clone(&config), &events).await?;

    let app = router::build(&config, AppState::new(manager));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = server::bind(&addr).await?;

    events.emit(AppEvent::Ready { addr: addr.clone() });

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(server::shutdown_signal(Arc::clone(&events)))
        .await?;

    events.emit(AppEvent::Shutdown);
    Ok(())
}
