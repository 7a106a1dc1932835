use super::manager::{relative_link, Result};
use super::models::ImageManager;
use mdimg_events::AppEvent;
use mdimg_models::{LinkType, ReferenceTarget, ReplaceResult};
use std::collections::HashSet;
use std::path::Path;

impl ImageManager {
    /// Rewrites image links of one document to hosted URLs (`remote`) or to
    /// paths relative to the document (`local`). The previous content is
    /// kept in `<document>.bak`.
    pub async fn rewrite_links(
        &self,
        directory: &str,
        md_file: &str,
        link_type: LinkType,
    ) -> Result<ReplaceResult> {
        let document = Self::document_path(directory, md_file).await?;
        let (content, references) = Self::load_document(&document).await?;
        let base = document.parent().unwrap_or_else(|| Path::new("/"));

        let mut replaced = 0;
        let mut seen = HashSet::new();
        let mut replacements: Vec<(String, String)> = Vec::new();

        {
            let store = self.mapping.read().await;

            for resolved in &references {
                let raw = &resolved.reference.raw;
                let replacement = match (link_type, &resolved.target) {
                    (LinkType::Remote, ReferenceTarget::Local { path, .. }) => {
                        let mapped = store.get(&path.to_string_lossy()).map(str::to_string);
                        if mapped.is_none() {
                            tracing::warn!("No hosted URL for {}, leaving '{}' as is", path.display(), raw);
                        }
                        mapped
                    }
                    (LinkType::Remote, ReferenceTarget::Remote { .. }) => None,
                    (LinkType::Local, ReferenceTarget::Local { path, .. }) => {
                        Some(relative_link(path, base))
                    }
                    (LinkType::Local, ReferenceTarget::Remote { url }) => store
                        .find_path_by_url(url)
                        .map(|local| relative_link(Path::new(local), base)),
                };

                if let Some(replacement) = replacement {
                    replaced += 1;
                    if seen.insert(raw.clone()) {
                        replacements.push((raw.clone(), replacement));
                    }
                }
            }
        }

        // Literal substring replacement, every occurrence of each raw text
        let mut updated = content;
        for (from, to) in &replacements {
            updated = updated.replace(from.as_str(), to);
        }

        let backup_path = Self::write_document(&document, &updated).await?;

        self.events.emit(AppEvent::LinksRewritten {
            document: document.display().to_string(),
            replaced,
            link_type: link_type.as_str().to_string(),
        });

        Ok(ReplaceResult { replaced, backup_path })
    }
}
