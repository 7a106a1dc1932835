use super::errors::MappingError;
use mdimg_utils::normalize_separators;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, MappingError>;

/// Persistent table of absolute image path -> hosted URL.
///
/// Keys are stored with forward slashes and compared exactly
/// (case-sensitive). The backing file is a flat JSON object, read once with
/// [`MappingStore::load`] and rewritten in full by every
/// [`MappingStore::save`].
#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

/// What [`MappingStore::load`] found in the backing file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub entries: usize,
    /// Keys whose separators had to be rewritten on the way in
    pub normalized_keys: usize,
}

impl LoadSummary {
    pub fn needs_migration(&self) -> bool {
        self.normalized_keys > 0
    }
}

impl MappingStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Creates a store and loads whatever the backing file holds
    pub async fn open<P: Into<PathBuf>>(path: P) -> Self {
        let mut store = Self::new(path);
        store.load().await;
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory table with the file's content, normalizing
    /// key separators. When two raw keys collapse onto one, the first in
    /// key order wins. A missing or unreadable file leaves the table empty.
    pub async fn load(&mut self) -> LoadSummary {
        let mut summary = LoadSummary::default();

        match self.read_file().await {
            Ok(Some(raw)) => {
                self.entries.clear();
                for (key, url) in raw {
                    let normalized = normalize_separators(&key);
                    if normalized != key {
                        summary.normalized_keys += 1;
                    }
                    self.entries.entry(normalized).or_insert(url);
                }
                tracing::debug!("Loaded {} mapping(s) from {}", self.entries.len(), self.path.display());
            }
            Ok(None) => {
                tracing::debug!("No mapping file at {}, starting empty", self.path.display());
                self.entries.clear();
            }
            Err(e) => {
                tracing::warn!("Could not load mapping, starting empty: {}", e);
                self.entries.clear();
            }
        }

        summary.entries = self.entries.len();
        summary
    }

    /// Rewrites the backing file with the normalized keys after copying the
    /// old file to `<file>.backup_<YYYYmmdd_HHMMSS>`. Returns the copy.
    pub async fn migrate(&self) -> Result<PathBuf> {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".backup_{}", chrono::Local::now().format("%Y%m%d_%H%M%S")));
        let backup = PathBuf::from(name);

        tokio::fs::copy(&self.path, &backup)
            .await
            .map_err(|source| MappingError::IoError {
                path: backup.display().to_string(),
                source,
            })?;
        self.save().await?;

        tracing::info!("Migrated mapping keys in {}, previous file at {}", self.path.display(), backup.display());
        Ok(backup)
    }

    async fn read_file(&self) -> Result<Option<BTreeMap<String, String>>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(MappingError::IoError {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| MappingError::ParseError {
                path: self.path.display().to_string(),
                source,
            })
    }

    /// Writes the whole table. On failure the in-memory table is kept as is.
    pub async fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| MappingError::IoError {
                path: self.path.display().to_string(),
                source,
            })?;
        tracing::debug!("Saved {} mapping(s) to {}", self.entries.len(), self.path.display());
        Ok(())
    }

    pub fn get(&self, image_path: &str) -> Option<&str> {
        self.entries.get(&normalize_separators(image_path)).map(String::as_str)
    }

    pub fn set(&mut self, image_path: String, url: String) -> Option<String> {
        self.entries.insert(normalize_separators(&image_path), url)
    }

    pub fn remove(&mut self, image_path: &str) -> Option<String> {
        self.entries.remove(&normalize_separators(image_path))
    }

    pub fn contains(&self, image_path: &str) -> bool {
        self.entries.contains_key(&normalize_separators(image_path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Owned copy of the table for callers outside the lock
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }

    /// Reverse lookup: the local path a hosted URL was uploaded from
    pub fn find_path_by_url(&self, url: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, hosted)| hosted.as_str() == url)
            .map(|(path, _)| path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut store = MappingStore::new("unused.json");
        assert_eq!(store.set("/abs/img.png".into(), "https://host/x.png".into()), None);
        assert_eq!(store.get("/abs/img.png"), Some("https://host/x.png"));
        assert_eq!(store.get("/abs/IMG.png"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_and_reverse_lookup() {
        let mut store = MappingStore::new("unused.json");
        store.set("/abs/a.png".into(), "https://host/a.png".into());
        store.set("/abs/b.png".into(), "https://host/b.png".into());

        assert_eq!(store.find_path_by_url("https://host/b.png"), Some("/abs/b.png"));
        assert_eq!(store.remove("/abs/b.png"), Some("https://host/b.png".to_string()));
        assert_eq!(store.find_path_by_url("https://host/b.png"), None);
        assert!(!store.contains("/abs/b.png"));
    }

    #[tokio::test]
    async fn test_save_then_load_in_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image-mapping.json");

        let mut store = MappingStore::new(&path);
        store.set("/abs/img.png".into(), "https://host/x.png".into());
        store.save().await.unwrap();

        let reloaded = MappingStore::open(&path).await;
        assert_eq!(reloaded.get("/abs/img.png"), Some("https://host/x.png"));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"/abs/img.png\": \"https://host/x.png\""));
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MappingStore::new(dir.path().join("missing.json"));
        store.set("stale".into(), "x".into());

        assert_eq!(store.load().await, LoadSummary::default());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image-mapping.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = MappingStore::open(&path).await;
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_are_normalized_on_every_access() {
        let mut store = MappingStore::new("unused.json");
        store.set("C:\\notes\\img\\a.png".into(), "https://host/a.png".into());

        assert_eq!(store.get("C:/notes/img/a.png"), Some("https://host/a.png"));
        assert!(store.contains("C:\\notes/img//a.png"));
        assert_eq!(store.entries().keys().next().map(String::as_str), Some("C:/notes/img/a.png"));
        assert!(store.remove("C:/notes/img/a.png").is_some());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_separators_are_migrated_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image-mapping.json");
        let original = r#"{
  "C:/notes/img/a.png": "https://host/first.png",
  "C:\\notes\\img\\a.png": "https://host/second.png",
  "C:\\notes\\img/b.png": "https://host/b.png"
}"#;
        std::fs::write(&path, original).unwrap();

        let mut store = MappingStore::new(&path);
        let summary = store.load().await;

        assert_eq!(summary, LoadSummary { entries: 2, normalized_keys: 2 });
        assert!(summary.needs_migration());
        assert_eq!(store.get("C:/notes/img/a.png"), Some("https://host/first.png"));
        assert_eq!(store.get("C:/notes/img/b.png"), Some("https://host/b.png"));

        let backup = store.migrate().await.unwrap();
        let backup_name = backup.file_name().unwrap().to_string_lossy().to_string();
        assert!(backup_name.starts_with("image-mapping.json.backup_"));
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);

        let mut reloaded = MappingStore::new(&path);
        let summary = reloaded.load().await;
        assert_eq!(summary, LoadSummary { entries: 2, normalized_keys: 0 });
        assert!(!std::fs::read_to_string(&path).unwrap().contains('\\'));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MappingStore::new(dir.path().join("no-such-dir/mapping.json"));
        store.set("/abs/img.png".into(), "https://host/x.png".into());

        assert!(store.save().await.is_err());
        assert_eq!(store.get("/abs/img.png"), Some("https://host/x.png"));
    }
}
