use super::models::FileSystem;
use anyhow::Result;
use mdimg_utils::lexical_normalize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

const BACKUP_SUFFIX: &str = ".bak";

impl FileSystem {
    /// Absolute, lexically normalized form of `path` (relative paths are
    /// taken against the current directory)
    pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
        let abs_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(lexical_normalize(&abs_path))
    }

    pub fn get_absolute_path_string(path: &str) -> Result<String> {
        let path_buf = PathBuf::from(path);
        let abs = Self::get_absolute_path(&path_buf)?;
        Ok(abs.to_string_lossy().to_string())
    }

    /// Location of a document named relative to a scanned directory
    pub fn document_path(directory: &str, md_file: &str) -> Result<PathBuf> {
        Self::get_absolute_path(&PathBuf::from(directory).join(md_file))
    }

    pub fn backup_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Copies `path` to `<path>.bak`, replacing any earlier backup
    pub async fn backup_file(path: &Path) -> Result<PathBuf> {
        let backup = Self::backup_path(path);
        fs::copy(path, &backup).await?;
        tracing::debug!("    Backup:  {} -> {}", path.display(), backup.display());
        Ok(backup)
    }

    pub async fn ensure_directory(path: &Path, description: &str) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
            tracing::debug!("    Created: {} ({})", path.display(), description);
        } else {
            tracing::debug!("    Exists:  {} ({})", path.display(), description);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            FileSystem::backup_path(Path::new("/notes/doc.md")),
            PathBuf::from("/notes/doc.md.bak")
        );
    }

    #[test]
    fn test_document_path_is_normalized() {
        let path = FileSystem::document_path("/notes/./posts", "../doc.md").unwrap();
        assert_eq!(path, PathBuf::from("/notes/doc.md"));
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let path = FileSystem::get_absolute_path(Path::new("notes")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("notes"));
    }

    #[tokio::test]
    async fn test_backup_file_copies_content() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.md");
        std::fs::write(&doc, "![x](img.png)").unwrap();
        std::fs::write(FileSystem::backup_path(&doc), "stale").unwrap();

        let backup = FileSystem::backup_file(&doc).await.unwrap();

        assert_eq!(backup, dir.path().join("doc.md.bak"));
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "![x](img.png)");
    }

    #[tokio::test]
    async fn test_ensure_directory_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/images");
        FileSystem::ensure_directory(&nested, "Images directory").await.unwrap();
        assert!(nested.is_dir());
        FileSystem::ensure_directory(&nested, "Images directory").await.unwrap();
    }
}
