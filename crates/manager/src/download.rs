use super::manager::{relative_link, Result};
use super::models::ImageManager;
use mdimg_events::AppEvent;
use mdimg_filesystem::FileSystem;
use mdimg_hosting::{file_name_from_url, HostError};
use mdimg_models::{DownloadReport, DownloadResult, ReferenceTarget};
use mdimg_utils::{is_http_reference, short_sha1};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

enum Downloaded {
    Fetched(PathBuf),
    Existing(PathBuf),
}

impl ImageManager {
    /// Pulls every `http(s)` image of one document into the images
    /// directory next to it, then points the links at the local copies.
    pub async fn download_document(&self, directory: &str, md_file: &str) -> Result<DownloadReport> {
        let document = Self::document_path(directory, md_file).await?;
        let (content, references) = Self::load_document(&document).await?;
        let base = document.parent().unwrap_or_else(|| Path::new("/")).to_path_buf();
        let images_dir = base.join(&self.config.download.images_dir);

        let mut report = DownloadReport::default();
        let mut seen = HashSet::new();
        let mut replacements: Vec<(String, String)> = Vec::new();
        let mut recorded: Vec<(String, String)> = Vec::new();

        for resolved in &references {
            let ReferenceTarget::Remote { url } = &resolved.target else {
                continue;
            };
            if !is_http_reference(url) || !seen.insert(url.clone()) {
                continue;
            }

            let (path, message) = match self.download_one(url, &images_dir).await {
                Ok(Downloaded::Fetched(path)) => (path, "downloaded"),
                Ok(Downloaded::Existing(path)) => (path, "already downloaded"),
                Err(e) => {
                    tracing::warn!("Download of {} failed: {}", url, e);
                    report.results.push(DownloadResult {
                        url: url.clone(),
                        path: None,
                        success: false,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            replacements.push((resolved.reference.raw.clone(), relative_link(&path, &base)));
            recorded.push((path.to_string_lossy().to_string(), url.clone()));
            report.results.push(DownloadResult {
                url: url.clone(),
                path: Some(path),
                success: true,
                message: message.to_string(),
            });
        }

        if !replacements.is_empty() {
            let mut updated = content;
            for (from, to) in &replacements {
                updated = updated.replace(from.as_str(), to);
            }
            report.replaced = replacements.len();
            report.backup_path = Some(Self::write_document(&document, &updated).await?);
        }

        if !recorded.is_empty() {
            let mut store = self.mapping.write().await;
            for (path, url) in recorded {
                store.set(path, url);
            }
            self.persist(&store).await;
        }

        let downloaded = report.results.iter().filter(|r| r.success).count();
        self.events.emit(AppEvent::DownloadCompleted {
            document: document.display().to_string(),
            downloaded,
            failed: report.results.len() - downloaded,
        });

        Ok(report)
    }

    async fn download_one(&self, url: &str, images_dir: &Path) -> std::result::Result<Downloaded, HostError> {
        let named = file_name_from_url(url);
        if let Some(name) = &named {
            if let Some(existing) = self.previous_download(url, images_dir, name).await {
                return Ok(Downloaded::Existing(existing));
            }
        }

        let image = self.fetcher.fetch(url).await?;
        let name = named.unwrap_or_else(|| format!("image_{}.{}", short_sha1(url), image.extension()));
        if let Some(existing) = self.previous_download(url, images_dir, &name).await {
            return Ok(Downloaded::Existing(existing));
        }

        // a file under the plain name belongs to another URL or to the user
        let mut destination = images_dir.join(&name);
        if destination.exists() {
            destination = images_dir.join(unique_name(&name, url));
        }

        FileSystem::ensure_directory(images_dir, "downloaded images")
            .await
            .map_err(|e| HostError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;
        tokio::fs::write(&destination, &image.data).await?;
        tracing::debug!("Saved {} to {}", url, destination.display());

        Ok(Downloaded::Fetched(destination))
    }

    /// A file the mapping already records as the download of `url`
    async fn previous_download(&self, url: &str, images_dir: &Path, name: &str) -> Option<PathBuf> {
        let store = self.mapping.read().await;
        [images_dir.join(name), images_dir.join(unique_name(name, url))]
            .into_iter()
            .find(|candidate| candidate.is_file() && store.get(&candidate.to_string_lossy()) == Some(url))
    }
}

/// `name` with a hash of `url` before the extension
fn unique_name(name: &str, url: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, extension)) => format!("{}_{}.{}", stem, short_sha1(url), extension),
        None => format!("{}_{}", name, short_sha1(url)),
    }
}

#[cfg(test)]
mod tests {
    use crate::manager::tests::{manager_in, MockHost};
    use axum::http::header;
    use axum::routing::get;
    use axum::Router;
    use std::fs;
    use std::sync::Arc;

    async fn serve_images() -> String {
        let router = Router::new()
            .route("/pics/cat.png", get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![9u8; 32]) }))
            .route("/other/cat.png", get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![7u8; 16]) }))
            .route("/render", get(|| async { ([(header::CONTENT_TYPE, "image/gif")], vec![1u8; 8]) }))
            .route("/page.png", get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<p>no</p>") }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_remote_images_become_local() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve_images().await;
        let doc = dir.path().join("doc.md");
        fs::write(
            &doc,
            format!(
                "![c]({base}/pics/cat.png)\n<img src=\"{base}/render\">\n![c2]({base}/pics/cat.png)\n![bad]({base}/page.png)"
            ),
        )
        .unwrap();
        let manager = manager_in(dir.path(), Arc::new(MockHost::default())).await;

        let report = manager
            .download_document(&dir.path().display().to_string(), "doc.md")
            .await
            .unwrap();

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.replaced, 2);
        assert!(!report.results[2].success);

        let cat = dir.path().join("images/cat.png");
        assert_eq!(fs::read(&cat).unwrap(), vec![9u8; 32]);

        let rendered = report.results[1].path.clone().unwrap();
        let name = rendered.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("image_") && name.ends_with(".gif"));

        let content = fs::read_to_string(&doc).unwrap();
        assert!(content.starts_with("![c](images/cat.png)\n"));
        assert!(content.contains(&format!("<img src=\"images/{}\">", name)));
        assert!(content.contains("![c2](images/cat.png)"));
        assert!(content.contains(&format!("![bad]({}/page.png)", base)));
        assert!(report.backup_path.unwrap().exists());

        let mapping = manager.mapping_snapshot().await;
        assert_eq!(
            mapping.get(&cat.display().to_string()),
            Some(&format!("{}/pics/cat.png", base))
        );
    }

    #[tokio::test]
    async fn test_existing_file_is_not_fetched_again() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/logo.png"), "local copy").unwrap();
        fs::write(dir.path().join("doc.md"), "![l](http://127.0.0.1:9/logo.png)").unwrap();
        let logo = dir.path().join("images/logo.png").display().to_string();
        fs::write(
            dir.path().join("image-mapping.json"),
            serde_json::json!({ logo: "http://127.0.0.1:9/logo.png" }).to_string(),
        )
        .unwrap();
        let manager = manager_in(dir.path(), Arc::new(MockHost::default())).await;

        let report = manager
            .download_document(&dir.path().display().to_string(), "doc.md")
            .await
            .unwrap();

        assert!(report.results[0].success);
        assert_eq!(report.results[0].message, "already downloaded");
        assert_eq!(fs::read_to_string(dir.path().join("images/logo.png")).unwrap(), "local copy");
        assert_eq!(fs::read_to_string(dir.path().join("doc.md")).unwrap(), "![l](images/logo.png)");
    }

    #[tokio::test]
    async fn test_same_file_name_from_two_urls_is_kept_apart() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve_images().await;
        let doc = dir.path().join("doc.md");
        fs::write(&doc, format!("![a]({base}/pics/cat.png)\n![b]({base}/other/cat.png)")).unwrap();
        let manager = manager_in(dir.path(), Arc::new(MockHost::default())).await;

        let report = manager
            .download_document(&dir.path().display().to_string(), "doc.md")
            .await
            .unwrap();

        assert!(report.results.iter().all(|r| r.success && r.message == "downloaded"));
        let first = report.results[0].path.clone().unwrap();
        let second = report.results[1].path.clone().unwrap();
        assert_eq!(first, dir.path().join("images/cat.png"));
        assert_ne!(first, second);
        assert_eq!(fs::read(&first).unwrap(), vec![9u8; 32]);
        assert_eq!(fs::read(&second).unwrap(), vec![7u8; 16]);

        let second_name = second.file_name().unwrap().to_string_lossy().to_string();
        assert!(second_name.starts_with("cat_") && second_name.ends_with(".png"));
        let content = fs::read_to_string(&doc).unwrap();
        assert_eq!(content, format!("![a](images/cat.png)\n![b](images/{})", second_name));

        let mapping = manager.mapping_snapshot().await;
        assert_eq!(mapping.get(&first.display().to_string()), Some(&format!("{}/pics/cat.png", base)));
        assert_eq!(mapping.get(&second.display().to_string()), Some(&format!("{}/other/cat.png", base)));
    }

    #[tokio::test]
    async fn test_unrecorded_file_with_same_name_is_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve_images().await;
        fs::create_dir_all(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/cat.png"), "user file").unwrap();
        fs::write(dir.path().join("doc.md"), format!("![c]({base}/pics/cat.png)")).unwrap();
        let manager = manager_in(dir.path(), Arc::new(MockHost::default())).await;
        let root = dir.path().display().to_string();

        let report = manager.download_document(&root, "doc.md").await.unwrap();

        assert_eq!(report.results[0].message, "downloaded");
        let saved = report.results[0].path.clone().unwrap();
        assert_ne!(saved, dir.path().join("images/cat.png"));
        assert_eq!(fs::read_to_string(dir.path().join("images/cat.png")).unwrap(), "user file");
        assert_eq!(fs::read(&saved).unwrap(), vec![9u8; 32]);

        // the URL is now recorded, so a second run reuses the same file
        fs::write(dir.path().join("doc.md"), format!("![c]({base}/pics/cat.png)")).unwrap();
        let again = manager.download_document(&root, "doc.md").await.unwrap();
        assert_eq!(again.results[0].message, "already downloaded");
        assert_eq!(again.results[0].path, Some(saved));
    }

    #[tokio::test]
    async fn test_document_without_remote_images_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc.md"), "![a](a.png)").unwrap();
        let manager = manager_in(dir.path(), Arc::new(MockHost::default())).await;

        let report = manager
            .download_document(&dir.path().display().to_string(), "doc.md")
            .await
            .unwrap();

        assert!(report.results.is_empty());
        assert_eq!(report.backup_path, None);
        assert!(!dir.path().join("doc.md.bak").exists());
    }
}
