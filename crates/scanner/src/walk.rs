use super::errors::ScanError;
use super::models::ScannedTree;
use mdimg_config::ScanSettings;
use mdimg_filesystem::FileSystem;
use std::path::Path;
use walkdir::WalkDir;

type Result<T> = std::result::Result<T, ScanError>;

/// Walks `root` and splits its files into documents and images.
///
/// Entries that cannot be read are logged and skipped. Symlinked
/// directories are only entered when `follow_links` is set; walkdir then
/// reports loops as entry errors.
pub fn scan_directory(root: &Path, settings: &ScanSettings) -> Result<ScannedTree> {
    let root = FileSystem::get_absolute_path(root)
        .map_err(|e| ScanError::InvalidRoot(root.display().to_string(), e.to_string()))?;

    if !root.exists() {
        return Err(ScanError::DirectoryNotFound(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.display().to_string()));
    }

    let mut tree = ScannedTree {
        root: root.clone(),
        ..Default::default()
    };

    let walker = WalkDir::new(&root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under '{}': {}", root.display(), e);
                continue;
            }
        };

        // Symlinked files count even when links are not followed
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let extension = match entry.path().extension().and_then(|ext| ext.to_str()) {
            Some(ext) => ext,
            None => continue,
        };

        if settings.is_document(extension) {
            tree.documents.push(entry.into_path());
        } else if settings.is_image(extension) {
            tree.images.push(entry.into_path());
        }
    }

    tracing::debug!(
        "Walked '{}': {} document(s), {} image(s)",
        root.display(),
        tree.documents.len(),
        tree.images.len()
    );

    Ok(tree)
}

/// Same as [`scan_directory`], but failures degrade to an empty tree
pub fn scan_directory_or_empty(root: &Path, settings: &ScanSettings) -> ScannedTree {
    match scan_directory(root, settings) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!("Scan of '{}' failed, treating as empty: {}", root.display(), e);
            ScannedTree {
                root: root.to_path_buf(),
                ..Default::default()
            }
        }
    }
}
