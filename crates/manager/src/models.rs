use mdimg_config::Config;
use mdimg_events::EventBus;
use mdimg_hosting::{ImageHost, RemoteFetcher};
use mdimg_mapping::MappingStore;
use mdimg_models::ScanResult;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide state behind every operation: the mapping store and the
/// report of the most recent scan.
///
/// The mapping sits behind an async lock so that a mutation and the save
/// that follows it happen under one write guard.
pub struct ImageManager {
    pub(super) config: Arc<Config>,
    pub(super) events: Arc<EventBus>,
    pub(super) host: Arc<dyn ImageHost>,
    pub(super) fetcher: RemoteFetcher,
    pub(super) mapping: RwLock<MappingStore>,
    pub(super) last_scan: parking_lot::RwLock<ScanResult>,
}
