use super::manager::Result;
use super::models::ImageManager;
use mdimg_events::AppEvent;
use mdimg_models::CleanupResult;
use mdimg_scanner::ReferenceScanner;

impl ImageManager {
    /// Deletes images under `directory` that no valid reference points at.
    /// Always works from a fresh scan, never from the cached report.
    pub async fn cleanup(&self, directory: &str) -> Result<CleanupResult> {
        let root = Self::absolute(directory)?;
        let settings = self.config.scan.clone();

        let scan_root = root.clone();
        let unused = tokio::task::spawn_blocking(move || {
            ReferenceScanner::find_unused_images(&scan_root, &settings)
        })
        .await?;

        let mut deleted = Vec::new();
        for candidate in &unused.candidates {
            match tokio::fs::remove_file(candidate).await {
                Ok(()) => {
                    tracing::debug!("Deleted unused image {}", candidate.display());
                    deleted.push(candidate.clone());
                }
                Err(e) => tracing::warn!("Could not delete {}: {}", candidate.display(), e),
            }
        }

        if !deleted.is_empty() {
            let mut store = self.mapping.write().await;
            let mut changed = false;
            for path in &deleted {
                changed |= store.remove(&path.to_string_lossy()).is_some();
            }
            if changed {
                self.persist(&store).await;
            }
        }

        {
            let mut last_scan = self.last_scan.write();
            for path in &deleted {
                last_scan.unused_images.remove(path);
            }
        }

        self.events.emit(AppEvent::CleanupCompleted {
            directory: root.display().to_string(),
            deleted: deleted.len(),
            candidates: unused.candidates.len(),
        });

        Ok(CleanupResult {
            deleted_count: deleted.len(),
            total_candidates: unused.candidates.len(),
        })
    }
}
