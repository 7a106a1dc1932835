use std::path::{Component, Path, PathBuf};

const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "//", "data:"];

pub fn normalize_path(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Forward slashes only, no repeated separators, no trailing slash except
/// on a root (`/` or `C:/`)
pub fn normalize_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }

    let is_root = out == "/" || (out.len() == 3 && out.ends_with(":/"));
    if out.ends_with('/') && !is_root {
        out.pop();
    }
    out
}

/// Folds `.` and `..` without touching the filesystem.
/// `..` above the root stays at the root.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Path of `target` as seen from the directory `base`.
/// Both are expected to be absolute and normalized; targets on another
/// drive come back unchanged.
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let same_root = match (target_parts.first(), base_parts.first()) {
        (Some(Component::Prefix(a)), Some(Component::Prefix(b))) => a == b,
        (Some(Component::Prefix(_)), _) | (_, Some(Component::Prefix(_))) => false,
        _ => true,
    };
    if !same_root {
        return target.to_path_buf();
    }

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

/// True for references that name a hosted resource rather than a file
pub fn is_remote_reference(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    REMOTE_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

pub fn is_http_reference(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_normalize() {
        assert_eq!(
            lexical_normalize(Path::new("/notes/a/../img/./x.png")),
            PathBuf::from("/notes/img/x.png")
        );
        assert_eq!(lexical_normalize(Path::new("/../x.png")), PathBuf::from("/x.png"));
        assert_eq!(lexical_normalize(Path::new("../x.png")), PathBuf::from("../x.png"));
        assert_eq!(lexical_normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/notes/img/x.png"), Path::new("/notes")),
            PathBuf::from("img/x.png")
        );
        assert_eq!(
            relative_path(Path::new("/notes/img/x.png"), Path::new("/notes/posts/2024")),
            PathBuf::from("../../img/x.png")
        );
        assert_eq!(
            relative_path(Path::new("/notes"), Path::new("/notes")),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_remote_detection() {
        assert!(is_remote_reference("https://host/x.png"));
        assert!(is_remote_reference("HTTP://host/x.png"));
        assert!(is_remote_reference("//cdn.host/x.png"));
        assert!(is_remote_reference("data:image/png;base64,AAAA"));
        assert!(!is_remote_reference("img/x.png"));
        assert!(!is_remote_reference("/abs/x.png"));
        assert!(is_http_reference("https://host/x.png"));
        assert!(!is_http_reference("//cdn.host/x.png"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("img\\x.png")), "img/x.png");
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators("C:\\notes\\img/x.png"), "C:/notes/img/x.png");
        assert_eq!(normalize_separators("/notes//img///x.png"), "/notes/img/x.png");
        assert_eq!(normalize_separators("/notes/img/"), "/notes/img");
        assert_eq!(normalize_separators("/"), "/");
        assert_eq!(normalize_separators("C:\\"), "C:/");
        assert_eq!(normalize_separators("/abs/x.png"), "/abs/x.png");
    }
}
