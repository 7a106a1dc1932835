use super::manager::Result;
use super::models::ImageManager;
use mdimg_events::AppEvent;
use mdimg_models::{BrokenLink, LinkCheckReport, ReferenceTarget};
use mdimg_scanner::{scan_directory_or_empty, ReferenceScanner};
use mdimg_utils::is_http_reference;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

impl ImageManager {
    /// Sends a HEAD request to every distinct `http(s)` image under
    /// `directory` and lists those that fail or answer with a non-2xx
    /// status after redirects. Each URL is requested once.
    pub async fn check_links(&self, directory: &str) -> Result<LinkCheckReport> {
        let root = Self::absolute(directory)?;
        let settings = self.config.scan.clone();

        let scan_root = root.clone();
        let remote: Vec<(PathBuf, BTreeSet<String>)> = tokio::task::spawn_blocking(move || {
            let tree = scan_directory_or_empty(&scan_root, &settings);
            tree.documents
                .iter()
                .filter_map(|document| {
                    let references = ReferenceScanner::document_references(document)
                        .map_err(|e| tracing::warn!("{}", e))
                        .ok()?;
                    let urls: BTreeSet<String> = references
                        .into_iter()
                        .filter_map(|resolved| match resolved.target {
                            ReferenceTarget::Remote { url } if is_http_reference(&url) => Some(url),
                            _ => None,
                        })
                        .collect();
                    (!urls.is_empty()).then(|| (document.clone(), urls))
                })
                .collect()
        })
        .await?;

        let mut outcomes: HashMap<String, std::result::Result<u16, String>> = HashMap::new();
        let mut report = LinkCheckReport::default();

        for (document, urls) in remote {
            for url in urls {
                if !outcomes.contains_key(&url) {
                    let outcome = self.fetcher.check(&url).await.map_err(|e| e.to_string());
                    report.checked += 1;
                    outcomes.insert(url.clone(), outcome);
                }

                let broken = match &outcomes[&url] {
                    Ok(status) if (200..300).contains(status) => None,
                    Ok(status) => Some((Some(*status), format!("HTTP {}", status))),
                    Err(error) => Some((None, error.clone())),
                };
                if let Some((status, error)) = broken {
                    tracing::warn!("Broken image link in {}: {} ({})", document.display(), url, error);
                    report.broken.push(BrokenLink {
                        file: document.clone(),
                        url,
                        status,
                        error,
                    });
                }
            }
        }

        self.events.emit(AppEvent::LinksChecked {
            directory: root.display().to_string(),
            checked: report.checked,
            broken: report.broken.len(),
        });

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::manager::tests::{manager_in, MockHost};
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use std::fs;
    use std::sync::Arc;

    async fn serve() -> String {
        let router = Router::new()
            .route("/ok.png", get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![1u8; 8]) }))
            .route("/forbidden.png", get(|| async { StatusCode::FORBIDDEN }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_failing_links_are_reported_per_document() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve().await;
        fs::write(
            dir.path().join("a.md"),
            format!("![ok]({base}/ok.png) ![no]({base}/forbidden.png) ![local](x.png)"),
        )
        .unwrap();
        fs::write(
            dir.path().join("b.md"),
            format!("<img src=\"{base}/forbidden.png\"> ![d](data:image/png;base64,AA==)"),
        )
        .unwrap();
        let manager = manager_in(dir.path(), Arc::new(MockHost::default())).await;

        let report = manager.check_links(&dir.path().display().to_string()).await.unwrap();

        assert_eq!(report.checked, 2);
        assert_eq!(report.broken.len(), 2);
        assert_eq!(report.broken[0].file, dir.path().join("a.md"));
        assert_eq!(report.broken[1].file, dir.path().join("b.md"));
        assert!(report.broken.iter().all(|b| b.status == Some(403)));
        assert_eq!(report.broken[0].url, format!("{}/forbidden.png", base));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_broken_without_status() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc.md"), "![x](http://127.0.0.1:9/x.png)").unwrap();
        let manager = manager_in(dir.path(), Arc::new(MockHost::default())).await;

        let report = manager.check_links(&dir.path().display().to_string()).await.unwrap();

        assert_eq!(report.checked, 1);
        assert_eq!(report.broken[0].status, None);
        assert!(!report.broken[0].error.is_empty());
    }
}
