use super::manager::Result;
use super::models::ImageManager;
use mdimg_events::AppEvent;
use mdimg_models::{ReferenceTarget, UploadResult};

impl ImageManager {
    /// Uploads every local image referenced by one document.
    ///
    /// Images already in the mapping are not sent to the host again; each
    /// new URL is persisted as soon as it is known. Per-image failures are
    /// reported in the result list and do not stop the batch.
    pub async fn upload_document(&self, directory: &str, md_file: &str) -> Result<Vec<UploadResult>> {
        let document = Self::document_path(directory, md_file).await?;
        let (_, references) = Self::load_document(&document).await?;

        let mut results = Vec::with_capacity(references.len());
        let (mut uploaded, mut skipped, mut failed) = (0, 0, 0);

        for resolved in references {
            let (path, exists) = match resolved.target {
                ReferenceTarget::Remote { url } => {
                    skipped += 1;
                    results.push(UploadResult {
                        path: resolved.reference.raw,
                        success: true,
                        message: "remote reference, nothing to upload".to_string(),
                        url: Some(url),
                    });
                    continue;
                }
                ReferenceTarget::Local { path, exists } => (path, exists),
            };

            let key = path.to_string_lossy().to_string();

            if !exists {
                failed += 1;
                results.push(UploadResult {
                    path: key,
                    success: false,
                    message: "image not found".to_string(),
                    url: None,
                });
                continue;
            }

            let mapped = self.mapping.read().await.get(&key).map(str::to_string);
            if let Some(url) = mapped {
                skipped += 1;
                results.push(UploadResult {
                    path: key,
                    success: true,
                    message: "already uploaded".to_string(),
                    url: Some(url),
                });
                continue;
            }

            match self.host.upload(&path).await {
                Ok(url) => {
                    {
                        let mut store = self.mapping.write().await;
                        store.set(key.clone(), url.clone());
                        self.persist(&store).await;
                    }
                    uploaded += 1;
                    results.push(UploadResult {
                        path: key,
                        success: true,
                        message: "uploaded".to_string(),
                        url: Some(url),
                    });
                }
                Err(e) => {
                    tracing::warn!("Upload of {} failed: {}", key, e);
                    failed += 1;
                    results.push(UploadResult {
                        path: key,
                        success: false,
                        message: e.to_string(),
                        url: None,
                    });
                }
            }
        }

        self.events.emit(AppEvent::UploadCompleted {
            document: document.display().to_string(),
            uploaded,
            skipped,
            failed,
        });

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use crate::manager::tests::{manager_in, MockHost};
    use crate::ManagerError;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_each_image_is_uploaded_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("doc.md"),
            "![a](img.png)\n<img src=\"./img.png\">\n![r](https://cdn/x.png)",
        )
        .unwrap();
        std::fs::write(dir.path().join("img.png"), "png").unwrap();
        let host = Arc::new(MockHost::default());
        let manager = manager_in(dir.path(), host.clone()).await;
        let root = dir.path().display().to_string();

        let results = manager.upload_document(&root, "doc.md").await.unwrap();

        assert_eq!(host.calls.load(Ordering::SeqCst), 1);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(results[0].message, "uploaded");
        assert_eq!(results[1].message, "already uploaded");
        assert_eq!(results[2].url.as_deref(), Some("https://cdn/x.png"));

        let key = dir.path().join("img.png").display().to_string();
        let saved = std::fs::read_to_string(dir.path().join("image-mapping.json")).unwrap();
        assert!(saved.contains("https://host/img.png"));
        assert_eq!(
            manager.mapping_snapshot().await.get(&key).map(String::as_str),
            Some("https://host/img.png")
        );

        manager.upload_document(&root, "doc.md").await.unwrap();
        assert_eq!(host.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_image_is_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.md"), "![a](gone.png)").unwrap();
        let host = Arc::new(MockHost::default());
        let manager = manager_in(dir.path(), host.clone()).await;

        let results = manager
            .upload_document(&dir.path().display().to_string(), "doc.md")
            .await
            .unwrap();

        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
        assert!(!results[0].success);
        assert_eq!(results[0].message, "image not found");
    }

    #[tokio::test]
    async fn test_host_failure_is_reported_per_image() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.md"), "![a](a.png) ![b](b.png)").unwrap();
        std::fs::write(dir.path().join("a.png"), "").unwrap();
        std::fs::write(dir.path().join("b.png"), "").unwrap();
        let host = Arc::new(MockHost { fail: true, ..Default::default() });
        let manager = manager_in(dir.path(), host.clone()).await;

        let results = manager
            .upload_document(&dir.path().display().to_string(), "doc.md")
            .await
            .unwrap();

        assert_eq!(host.calls.load(Ordering::SeqCst), 2);
        assert!(results.iter().all(|r| !r.success));
        assert!(manager.mapping_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_in(dir.path(), Arc::new(MockHost::default())).await;

        let err = manager
            .upload_document(&dir.path().display().to_string(), "nope.md")
            .await
            .unwrap_err();

        assert!(matches!(err, ManagerError::NotFound(_)));
    }
}
