use mdimg_models::FixKind;
use std::collections::HashMap;
use std::path::PathBuf;

/// Reference analysis over a scanned tree
pub struct ReferenceScanner;

/// Files found under a root, split by kind. Both lists are absolute and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedTree {
    pub root: PathBuf,
    pub documents: Vec<PathBuf>,
    pub images: Vec<PathBuf>,
}

/// Images no valid reference points at, from a fresh scan
#[derive(Debug, Clone, Default)]
pub struct UnusedImages {
    pub tree: ScannedTree,
    pub candidates: Vec<PathBuf>,
}

/// Images of a tree keyed by lowercase file name, for repairing references
/// that point at a moved or renamed location
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    pub(crate) by_name: HashMap<String, Vec<PathBuf>>,
}

/// The image a broken reference most likely meant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMatch {
    pub kind: FixKind,
    pub image: PathBuf,
    /// Images sharing the file name, the chosen one included
    pub candidates: usize,
}
