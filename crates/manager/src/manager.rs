use super::errors::ManagerError;
use super::models::ImageManager;
use mdimg_config::Config;
use mdimg_events::{AppEvent, EventBus};
use mdimg_filesystem::FileSystem;
use mdimg_hosting::{ImageHost, RemoteFetcher};
use mdimg_mapping::MappingStore;
use mdimg_models::{ResolvedReference, ScanResult, StatusReport};
use mdimg_scanner::{scan_directory_or_empty, ReferenceScanner};
use mdimg_utils::{normalize_path, relative_path};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

pub(super) type Result<T> = std::result::Result<T, ManagerError>;

impl ImageManager {
    /// Builds the manager and loads the mapping file named in the config
    pub async fn new(
        config: Arc<Config>,
        events: Arc<EventBus>,
        host: Arc<dyn ImageHost>,
    ) -> Result<Self> {
        let fetcher = RemoteFetcher::from_settings(&config.download)?;

        let mapping_path = FileSystem::get_absolute_path(Path::new(&config.mapping.file))
            .map_err(|e| ManagerError::FileSystemError(e.to_string()))?;
        let mut mapping = MappingStore::new(mapping_path);
        let loaded = mapping.load().await;

        events.emit(AppEvent::MappingLoaded {
            path: mapping.path().display().to_string(),
            entries: loaded.entries,
        });
        if loaded.needs_migration() {
            match mapping.migrate().await {
                Ok(backup) => events.emit(AppEvent::MappingMigrated {
                    path: mapping.path().display().to_string(),
                    normalized: loaded.normalized_keys,
                    backup: backup.display().to_string(),
                }),
                Err(e) => events.emit(AppEvent::MappingSaveFailed {
                    path: mapping.path().display().to_string(),
                    error: e.to_string(),
                }),
            }
        }
        tracing::debug!("Image host: {}", host.name());

        Ok(Self {
            config,
            events,
            host,
            fetcher,
            mapping: RwLock::new(mapping),
            last_scan: parking_lot::RwLock::new(ScanResult::default()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn status(&self) -> StatusReport {
        let mapping_count = self.mapping.read().await.len();
        StatusReport {
            mapping_count,
            scan: self.last_scan(),
        }
    }

    pub fn last_scan(&self) -> ScanResult {
        self.last_scan.read().clone()
    }

    pub async fn mapping_snapshot(&self) -> BTreeMap<String, String> {
        self.mapping.read().await.snapshot()
    }

    /// Scans `directory` and replaces the cached report
    pub async fn scan(&self, directory: &str) -> Result<ScanResult> {
        let root = Self::absolute(directory)?;
        let settings = self.config.scan.clone();
        let started = Instant::now();

        let scan_root = root.clone();
        let mut result =
            tokio::task::spawn_blocking(move || ReferenceScanner::scan(&scan_root, &settings)).await?;
        result.scanned_at = Some(chrono::Utc::now().to_rfc3339());

        *self.last_scan.write() = result.clone();

        self.events.emit(AppEvent::ScanCompleted {
            directory: root.display().to_string(),
            documents: result.document_count,
            images: result.image_count,
            invalid: result.invalid_references.len(),
            unused: result.unused_images.len(),
            duration: started.elapsed(),
        });

        Ok(result)
    }

    /// Documents under `directory`, relative to it with `/` separators
    pub async fn list_documents(&self, directory: &str) -> Result<Vec<String>> {
        let root = Self::absolute(directory)?;
        let settings = self.config.scan.clone();

        let tree = tokio::task::spawn_blocking(move || scan_directory_or_empty(&root, &settings)).await?;

        Ok(tree
            .documents
            .iter()
            .map(|document| normalize_path(&relative_path(document, &tree.root)))
            .collect())
    }

    pub(super) fn absolute(directory: &str) -> Result<PathBuf> {
        FileSystem::get_absolute_path_string(directory)
            .map(PathBuf::from)
            .map_err(|e| ManagerError::FileSystemError(e.to_string()))
    }

    /// Absolute path of `md_file` inside `directory`; it must be a file
    pub(super) async fn document_path(directory: &str, md_file: &str) -> Result<PathBuf> {
        let document = FileSystem::document_path(directory, md_file)
            .map_err(|e| ManagerError::FileSystemError(e.to_string()))?;

        match tokio::fs::metadata(&document).await {
            Ok(meta) if meta.is_file() => Ok(document),
            _ => Err(ManagerError::NotFound(document.display().to_string())),
        }
    }

    /// Reads a document and resolves its references in document order
    pub(super) async fn load_document(
        document: &Path,
    ) -> Result<(String, Vec<ResolvedReference>)> {
        let content = tokio::fs::read_to_string(document).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManagerError::NotFound(document.display().to_string())
            } else {
                ManagerError::IoError(e)
            }
        })?;

        let text = content.clone();
        let path = document.to_path_buf();
        let references =
            tokio::task::spawn_blocking(move || ReferenceScanner::references_in(&text, &path)).await?;

        Ok((content, references))
    }

    /// Backs the document up to `.bak`, then writes `content`
    pub(super) async fn write_document(document: &Path, content: &str) -> Result<PathBuf> {
        let backup = FileSystem::backup_file(document)
            .await
            .map_err(|e| ManagerError::FileSystemError(e.to_string()))?;
        tokio::fs::write(document, content).await?;
        Ok(backup)
    }

    /// Saves the store; a failure is reported and the in-memory table kept
    pub(super) async fn persist(&self, store: &MappingStore) -> bool {
        match store.save().await {
            Ok(()) => true,
            Err(e) => {
                self.events.emit(AppEvent::MappingSaveFailed {
                    path: store.path().display().to_string(),
                    error: e.to_string(),
                });
                false
            }
        }
    }
}

/// Link text pointing from `base` (a directory) to `target`
pub(super) fn relative_link(target: &Path, base: &Path) -> String {
    normalize_path(&relative_path(target, base))
}
