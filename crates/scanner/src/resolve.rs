use mdimg_models::{Reference, ReferenceTarget, ResolvedReference};
use mdimg_utils::{is_remote_reference, lexical_normalize};
use std::path::{Path, PathBuf};

/// Absolute path a local reference names: absolute references are taken
/// verbatim, relative ones against the document's directory.
pub fn resolve_path(raw: &str, document: &Path) -> PathBuf {
    let reference = Path::new(raw);
    let joined = if reference.is_absolute() {
        reference.to_path_buf()
    } else {
        document
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(reference)
    };
    lexical_normalize(&joined)
}

/// Resolves and stats one reference. Remote references are never stat'ed.
pub fn resolve_reference(raw: &str, document: &Path) -> ResolvedReference {
    let reference = Reference {
        document: document.to_path_buf(),
        raw: raw.to_string(),
    };

    if is_remote_reference(raw) {
        return ResolvedReference {
            reference,
            target: ReferenceTarget::Remote {
                url: raw.trim().to_string(),
            },
        };
    }

    let path = resolve_path(raw, document);
    let exists = path.exists();

    ResolvedReference {
        reference,
        target: ReferenceTarget::Local { path, exists },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_relative_reference_uses_document_directory() {
        assert_eq!(
            resolve_path("../img/x.png", Path::new("/notes/posts/doc.md")),
            PathBuf::from("/notes/img/x.png")
        );
        assert_eq!(
            resolve_path("./x.png", Path::new("/notes/doc.md")),
            PathBuf::from("/notes/x.png")
        );
    }

    #[test]
    fn test_absolute_reference_is_verbatim() {
        assert_eq!(
            resolve_path("/srv/images/x.png", Path::new("/notes/doc.md")),
            PathBuf::from("/srv/images/x.png")
        );
    }

    #[test]
    fn test_validity_follows_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.md");
        fs::write(dir.path().join("img.png"), "png").unwrap();

        let resolved = resolve_reference("img.png", &doc);
        assert!(resolved.is_valid());
        assert_eq!(resolved.local_path(), Some(&dir.path().join("img.png")));

        fs::remove_file(dir.path().join("img.png")).unwrap();
        let resolved = resolve_reference("img.png", &doc);
        assert!(!resolved.is_valid());
        assert!(!resolved.is_remote());
    }

    #[test]
    fn test_remote_reference_is_not_resolved() {
        let resolved = resolve_reference("https://host/x.png", Path::new("/notes/doc.md"));
        assert!(resolved.is_remote());
        assert!(!resolved.is_valid());
        assert_eq!(resolved.local_path(), None);
        assert_eq!(
            resolved.target,
            ReferenceTarget::Remote { url: "https://host/x.png".to_string() }
        );
    }
}
