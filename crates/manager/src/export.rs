use super::manager::Result;
use super::models::ImageManager;
use mdimg_events::AppEvent;
use mdimg_models::{ReportExport, ResolvedReference, ScanResult};
use mdimg_scanner::{scan_directory_or_empty, ReferenceScanner};
use mdimg_utils::normalize_path;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Written at the root of the scanned directory
pub const REPORT_FILE: &str = "markdown_image_report.md";

impl ImageManager {
    /// Rescans `directory` and writes a Markdown summary of it to
    /// `<directory>/markdown_image_report.md`, replacing any earlier one.
    pub async fn export_report(&self, directory: &str) -> Result<ReportExport> {
        let root = Self::absolute(directory)?;
        let scan = self.scan(directory).await?;

        let settings = self.config.scan.clone();
        let scan_root = root.clone();
        let references = tokio::task::spawn_blocking(move || {
            let tree = scan_directory_or_empty(&scan_root, &settings);
            tree.documents
                .iter()
                .filter_map(|document| match ReferenceScanner::document_references(document) {
                    Ok(references) => Some((document.clone(), references)),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        None
                    }
                })
                .collect::<Vec<_>>()
        })
        .await?;

        let mapping = self.mapping_snapshot().await;
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let content = render_report(&root, &generated_at, &scan, &references, &mapping);

        let path = root.join(REPORT_FILE);
        tokio::fs::write(&path, content).await?;

        self.events.emit(AppEvent::ReportExported {
            path: path.display().to_string(),
        });

        Ok(ReportExport {
            path,
            document_count: scan.document_count,
            mapping_count: mapping.len(),
        })
    }
}

/// Path shown in the report: relative inside `root`, absolute outside it
fn display_path(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(inner) => normalize_path(inner),
        Err(_) => normalize_path(path),
    }
}

fn render_report(
    root: &Path,
    generated_at: &str,
    scan: &ScanResult,
    references: &[(PathBuf, Vec<ResolvedReference>)],
    mapping: &BTreeMap<String, String>,
) -> String {
    let mut out = String::new();
    if let Err(e) = write_report(&mut out, root, generated_at, scan, references, mapping) {
        tracing::warn!("Report rendering stopped early: {}", e);
    }
    out
}

fn write_report(
    out: &mut String,
    root: &Path,
    generated_at: &str,
    scan: &ScanResult,
    references: &[(PathBuf, Vec<ResolvedReference>)],
    mapping: &BTreeMap<String, String>,
) -> std::fmt::Result {
    let referenced_local = scan.image_count.saturating_sub(scan.unused_images.len());

    writeln!(out, "# Markdown image report\n")?;
    writeln!(out, "Generated: {}", generated_at)?;
    writeln!(out, "Directory: {}\n", root.display())?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- Markdown files: {}", scan.document_count)?;
    writeln!(out, "- Local images: {}", scan.image_count)?;
    writeln!(out, "- Referenced local images: {}", referenced_local)?;
    writeln!(out, "- Remote references: {}", scan.remote_reference_count)?;
    writeln!(out, "- Unused local images: {}", scan.unused_images.len())?;
    writeln!(out, "- Invalid references: {}", scan.invalid_references.len())?;
    writeln!(out, "- Mapping entries: {}\n", mapping.len())?;

    writeln!(out, "## References by document\n")?;
    for (document, resolved) in references.iter().filter(|(_, r)| !r.is_empty()) {
        writeln!(out, "### {}\n", display_path(document, root))?;
        for reference in resolved {
            match reference.local_path() {
                None => writeln!(out, "- 🌐 {}", reference.reference.raw.trim())?,
                Some(path) if reference.is_valid() => writeln!(out, "- 🖼️ {}", display_path(path, root))?,
                Some(_) => writeln!(out, "- ❌ {}", reference.reference.raw)?,
            }
        }
        out.push('\n');
    }

    if !scan.invalid_references.is_empty() {
        writeln!(out, "## Invalid references\n")?;
        let mut by_document: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for invalid in &scan.invalid_references {
            by_document
                .entry(display_path(&invalid.file, root))
                .or_default()
                .push(&invalid.reference);
        }
        for (document, refs) in by_document {
            writeln!(out, "### {}\n", document)?;
            for reference in refs {
                writeln!(out, "- ❌ {}", reference)?;
            }
            out.push('\n');
        }
    }

    if !scan.unused_images.is_empty() {
        writeln!(out, "## Unused images\n")?;
        for image in &scan.unused_images {
            writeln!(out, "- 🗑️ {}", display_path(image, root))?;
        }
        out.push('\n');
    }

    if !mapping.is_empty() {
        writeln!(out, "## Image mapping\n")?;
        for (local, url) in mapping {
            writeln!(out, "- **Local**: {}", display_path(Path::new(local), root))?;
            writeln!(out, "  **Remote**: {}\n", url)?;
        }
    }

    Ok(())
}
