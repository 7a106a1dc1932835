use super::models::{ImageIndex, ImageMatch};
use mdimg_models::FixKind;
use mdimg_utils::normalize_separators;
use std::path::{Component, Path, PathBuf};

impl ImageIndex {
    pub fn new(images: &[PathBuf]) -> Self {
        let mut index = Self::default();
        for image in images {
            if let Some(name) = image.file_name() {
                index
                    .by_name
                    .entry(name.to_string_lossy().to_lowercase())
                    .or_default()
                    .push(image.clone());
            }
        }
        index
    }

    /// Finds the image `reference` should point at.
    ///
    /// A file name held by exactly one image wins outright. When several
    /// images share it, the one whose parent directories agree with the
    /// reference's over the longest tail wins, and a tie matches nothing.
    /// If the file name is unknown, the percent-decoded reference is tried
    /// the same way.
    pub fn find(&self, reference: &str) -> Option<ImageMatch> {
        if let Some(found) = self.find_named(reference, false) {
            return Some(found);
        }

        let decoded = urlencoding::decode(reference).ok()?;
        if decoded == reference || self.candidates(reference).is_some() {
            return None;
        }
        self.find_named(&decoded, true)
    }

    fn candidates(&self, reference: &str) -> Option<&Vec<PathBuf>> {
        let normalized = normalize_separators(reference);
        let name = normalized.rsplit('/').next()?.to_lowercase();
        self.by_name.get(&name)
    }

    fn find_named(&self, reference: &str, decoded: bool) -> Option<ImageMatch> {
        let candidates = self.candidates(reference)?;

        let (kind, image) = match candidates.as_slice() {
            [] => return None,
            [only] => (FixKind::ExactMatch, only.clone()),
            several => (FixKind::SmartMatch, closest(reference, several)?),
        };

        let kind = match (kind, decoded) {
            (FixKind::ExactMatch, true) => FixKind::DecodedExactMatch,
            (FixKind::SmartMatch, true) => FixKind::DecodedSmartMatch,
            (kind, _) => kind,
        };

        Some(ImageMatch {
            kind,
            image,
            candidates: candidates.len(),
        })
    }
}

/// Candidate sharing the longest run of trailing directory names with the
/// reference; `None` when nothing is shared or the best score is tied
fn closest(reference: &str, candidates: &[PathBuf]) -> Option<PathBuf> {
    let wanted = parent_names(&normalize_separators(reference));

    let mut scored: Vec<(usize, &PathBuf)> = candidates
        .iter()
        .map(|candidate| {
            let dirs: Vec<String> = candidate
                .parent()
                .map(|parent| {
                    parent
                        .components()
                        .filter_map(|c| match c {
                            Component::Normal(name) => Some(name.to_string_lossy().to_lowercase()),
                            _ => None,
                        })
                        .collect()
                })
                .unwrap_or_default();
            let shared = wanted
                .iter()
                .rev()
                .zip(dirs.iter().rev())
                .take_while(|(a, b)| a == b)
                .count();
            (shared, candidate)
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    match scored.as_slice() {
        [(best, image), rest @ ..] if *best > 0 && rest.first().map_or(true, |(next, _)| next < best) => {
            Some((*image).clone())
        }
        _ => None,
    }
}

/// Lowercase directory names of a `/` separated reference, `.` and `..` dropped
fn parent_names(reference: &str) -> Vec<String> {
    let parent = Path::new(reference).parent().unwrap_or_else(|| Path::new(""));
    parent
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().to_lowercase()),
            _ => None,
        })
        .collect()
}
