use super::errors::ManagerError;
use super::manager::{relative_link, Result};
use super::models::ImageManager;
use mdimg_config::ScanSettings;
use mdimg_events::AppEvent;
use mdimg_filesystem::FileSystem;
use mdimg_models::{FixReport, FixedDocument, InvalidReference, PathFix, UndoReport};
use mdimg_scanner::{scan_directory_or_empty, ImageIndex, ReferenceScanner};
use mdimg_utils::{normalize_path, relative_path};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const BACKUP_ROOT: &str = ".backup";
const FIX_PREFIX: &str = "smart_fix_";
const UNDONE_PREFIX: &str = "undone_";
const FIX_LOG: &str = "fix_log.json";

/// Fixes planned for one document before anything is written
struct DocumentFixes {
    document: PathBuf,
    content: String,
    fixes: Vec<PathFix>,
}

impl ImageManager {
    /// Repoints invalid local references under `directory` at images found
    /// elsewhere in the tree by file name. Every changed document is copied
    /// to `.backup/smart_fix_<timestamp>/` first, next to a `fix_log.json`
    /// that [`ImageManager::undo_fix`] replays.
    pub async fn fix_paths(&self, directory: &str) -> Result<FixReport> {
        let root = Self::absolute(directory)?;
        let settings = self.config.scan.clone();

        let scan_root = root.clone();
        let (planned, unresolved) =
            tokio::task::spawn_blocking(move || plan_fixes(&scan_root, &settings)).await?;

        let mut report = FixReport {
            timestamp: chrono::Local::now().format("%Y%m%d_%H%M%S_%3f").to_string(),
            unresolved,
            ..Default::default()
        };
        report.total_fixes = planned.iter().map(|p| p.fixes.len()).sum();
        report.total_invalid = report.total_fixes + report.unresolved.len();

        if report.total_fixes > 0 {
            let backup_dir = root
                .join(BACKUP_ROOT)
                .join(format!("{}{}", FIX_PREFIX, report.timestamp));

            for plan in planned {
                let file = normalize_path(&relative_path(&plan.document, &root));
                let backup_file = backup_dir.join(format!("{}.backup", file));
                if let Some(parent) = backup_file.parent() {
                    FileSystem::ensure_directory(parent, "fix backup")
                        .await
                        .map_err(|e| ManagerError::FileSystemError(e.to_string()))?;
                }
                tokio::fs::copy(&plan.document, &backup_file).await?;

                let mut updated = plan.content;
                for fix in &plan.fixes {
                    updated = updated.replace(fix.original.as_str(), &fix.replacement);
                }
                tokio::fs::write(&plan.document, updated).await?;

                for fix in &plan.fixes {
                    tracing::debug!("{}: {} -> {} ({:?})", file, fix.original, fix.replacement, fix.kind);
                }
                report.modifications.push(FixedDocument {
                    file,
                    backup_file,
                    fixes: plan.fixes,
                });
            }

            let log = serde_json::to_string_pretty(&report).map_err(|e| ManagerError::InvalidFixLog {
                path: backup_dir.join(FIX_LOG).display().to_string(),
                reason: e.to_string(),
            })?;
            tokio::fs::write(backup_dir.join(FIX_LOG), log).await?;
            report.backup_dir = Some(backup_dir);
        }

        for left in &report.unresolved {
            tracing::info!("No image found for '{}' in {}", left.reference, left.file.display());
        }
        self.events.emit(AppEvent::PathsFixed {
            directory: root.display().to_string(),
            fixed: report.total_fixes,
            invalid: report.total_invalid,
        });

        Ok(report)
    }

    /// Restores the documents changed by the most recent [`ImageManager::fix_paths`]
    /// run under `directory`. The run's backup directory is renamed to
    /// `undone_smart_fix_<timestamp>` so the next undo goes one run further back.
    pub async fn undo_fix(&self, directory: &str) -> Result<UndoReport> {
        let root = Self::absolute(directory)?;
        let backups = root.join(BACKUP_ROOT);

        let latest = latest_fix(&backups)
            .await
            .ok_or_else(|| ManagerError::NoFixBackup(root.display().to_string()))?;

        let log_path = latest.join(FIX_LOG);
        let log: FixReport = tokio::fs::read_to_string(&log_path)
            .await
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
            .map_err(|reason| ManagerError::InvalidFixLog {
                path: log_path.display().to_string(),
                reason,
            })?;

        let mut restored = Vec::new();
        let mut missing = Vec::new();
        for modification in &log.modifications {
            let backup = latest.join(format!("{}.backup", modification.file));
            if !backup.is_file() {
                tracing::warn!("Backup of {} is gone ({})", modification.file, backup.display());
                missing.push(modification.file.clone());
                continue;
            }
            tokio::fs::copy(&backup, root.join(&modification.file)).await?;
            restored.push(modification.file.clone());
        }

        let name = latest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let undone = backups.join(format!("{}{}", UNDONE_PREFIX, name));
        tokio::fs::rename(&latest, &undone).await?;

        self.events.emit(AppEvent::FixUndone {
            directory: root.display().to_string(),
            restored: restored.len(),
        });

        Ok(UndoReport {
            backup_dir: undone,
            restored,
            missing,
        })
    }
}

/// Reads every document under `root` and matches each distinct invalid
/// local reference against the tree's images
fn plan_fixes(root: &Path, settings: &ScanSettings) -> (Vec<DocumentFixes>, Vec<InvalidReference>) {
    let tree = scan_directory_or_empty(root, settings);
    let index = ImageIndex::new(&tree.images);

    let mut planned = Vec::new();
    let mut unresolved = Vec::new();

    for document in &tree.documents {
        let content = match ReferenceScanner::read_document(document) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("{}", e);
                continue;
            }
        };
        let base = document.parent().unwrap_or_else(|| Path::new("/"));

        let mut seen = HashSet::new();
        let mut fixes = Vec::new();
        for resolved in ReferenceScanner::references_in(&content, document) {
            if resolved.is_remote() || resolved.is_valid() {
                continue;
            }
            let raw = resolved.reference.raw;
            if !seen.insert(raw.clone()) {
                continue;
            }

            match index.find(&raw) {
                Some(found) => fixes.push(PathFix {
                    kind: found.kind,
                    replacement: relative_link(&found.image, base),
                    original: raw,
                    image: found.image,
                    candidates: found.candidates,
                }),
                None => unresolved.push(InvalidReference {
                    file: document.clone(),
                    reference: raw,
                }),
            }
        }

        if !fixes.is_empty() {
            planned.push(DocumentFixes {
                document: document.clone(),
                content,
                fixes,
            });
        }
    }

    (planned, unresolved)
}

/// Newest `smart_fix_*` directory; timestamps sort by name
async fn latest_fix(backups: &Path) -> Option<PathBuf> {
    let mut entries = tokio::fs::read_dir(backups).await.ok()?;
    let mut latest: Option<(String, PathBuf)> = None;

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.starts_with(FIX_PREFIX) || !entry.path().is_dir() {
            continue;
        }
        if latest.as_ref().map_or(true, |(newest, _)| *newest < name) {
            latest = Some((name, entry.path()));
        }
    }

    latest.map(|(_, path)| path)
}
