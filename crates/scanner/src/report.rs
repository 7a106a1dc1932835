use super::errors::ScanError;
use super::extract::extract_references;
use super::models::{ReferenceScanner, ScannedTree, UnusedImages};
use super::resolve::resolve_reference;
use super::walk::scan_directory_or_empty;
use mdimg_config::ScanSettings;
use mdimg_models::{InvalidReference, ResolvedReference, ScanResult};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, ScanError>;

/// Per-tree reference totals shared by the report and cleanup
struct ReferenceAnalysis {
    reference_count: usize,
    remote_count: usize,
    invalid: Vec<InvalidReference>,
    /// Resolved targets of valid references, plus their canonical forms
    referenced: HashSet<PathBuf>,
}

impl ReferenceAnalysis {
    fn is_referenced(&self, image: &Path) -> bool {
        if self.referenced.contains(image) {
            return true;
        }
        std::fs::canonicalize(image)
            .map(|canonical| self.referenced.contains(&canonical))
            .unwrap_or(false)
    }
}

impl ReferenceScanner {
    pub fn read_document(document: &Path) -> Result<String> {
        std::fs::read_to_string(document)
            .map_err(|e| ScanError::ReadError(document.display().to_string(), e.to_string()))
    }

    /// Extracts and resolves every reference of one document
    pub fn document_references(document: &Path) -> Result<Vec<ResolvedReference>> {
        let content = Self::read_document(document)?;
        Ok(Self::references_in(&content, document))
    }

    /// Resolves references of already loaded content
    pub fn references_in(content: &str, document: &Path) -> Vec<ResolvedReference> {
        extract_references(content)
            .iter()
            .map(|raw| resolve_reference(raw, document))
            .collect()
    }

    /// Full report for `root`. An unreadable root gives an empty report.
    pub fn scan(root: &Path, settings: &ScanSettings) -> ScanResult {
        let tree = scan_directory_or_empty(root, settings);
        let analysis = Self::analyze(&tree);

        let unused_images: BTreeSet<PathBuf> = tree
            .images
            .iter()
            .filter(|image| !analysis.is_referenced(image))
            .cloned()
            .collect();

        ScanResult {
            document_count: tree.documents.len(),
            image_count: tree.images.len(),
            reference_count: analysis.reference_count,
            remote_reference_count: analysis.remote_count,
            invalid_references: analysis.invalid,
            unused_images,
            scanned_at: None,
        }
    }

    /// Rescans `root` and lists images that no valid reference points at
    pub fn find_unused_images(root: &Path, settings: &ScanSettings) -> UnusedImages {
        let tree = scan_directory_or_empty(root, settings);
        let analysis = Self::analyze(&tree);

        let candidates = tree
            .images
            .iter()
            .filter(|image| !analysis.is_referenced(image))
            .cloned()
            .collect();

        UnusedImages { tree, candidates }
    }

    fn analyze(tree: &ScannedTree) -> ReferenceAnalysis {
        let mut analysis = ReferenceAnalysis {
            reference_count: 0,
            remote_count: 0,
            invalid: Vec::new(),
            referenced: HashSet::new(),
        };

        for document in &tree.documents {
            let references = match Self::document_references(document) {
                Ok(references) => references,
                Err(e) => {
                    tracing::warn!("{}", e);
                    continue;
                }
            };

            for resolved in references {
                analysis.reference_count += 1;

                if resolved.is_remote() {
                    analysis.remote_count += 1;
                    continue;
                }

                if !resolved.is_valid() {
                    analysis.invalid.push(InvalidReference {
                        file: resolved.reference.document.clone(),
                        reference: resolved.reference.raw.clone(),
                    });
                    continue;
                }

                if let Some(path) = resolved.local_path() {
                    if let Ok(canonical) = std::fs::canonicalize(path) {
                        analysis.referenced.insert(canonical);
                    }
                    analysis.referenced.insert(path.clone());
                }
            }
        }

        analysis
    }
}
