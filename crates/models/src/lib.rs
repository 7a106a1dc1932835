use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

/// Report of one directory scan. Rebuilt from scratch on every scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(rename = "mdFiles")]
    pub document_count: usize,
    #[serde(rename = "images")]
    pub image_count: usize,
    #[serde(rename = "references")]
    pub reference_count: usize,
    #[serde(rename = "remoteRefs")]
    pub remote_reference_count: usize,
    #[serde(rename = "invalidRefs")]
    pub invalid_references: Vec<InvalidReference>,
    #[serde(rename = "unusedImages")]
    pub unused_images: BTreeSet<PathBuf>,
    #[serde(rename = "scannedAt", skip_serializing_if = "Option::is_none")]
    pub scanned_at: Option<String>,
}

/// Body of the status endpoint: mapping size next to the last scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(rename = "mappingCount")]
    pub mapping_count: usize,
    #[serde(flatten)]
    pub scan: ScanResult,
}

/// A local reference whose target did not exist at scan time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidReference {
    pub file: PathBuf,
    #[serde(rename = "ref")]
    pub reference: String,
}

/// A reference exactly as written inside a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub document: PathBuf,
    pub raw: String,
}

/// Where a reference points after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTarget {
    /// Filesystem target; `exists` is only true for the instant it was checked
    Local { path: PathBuf, exists: bool },
    /// Already hosted somewhere, never touches the disk
    Remote { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    pub reference: Reference,
    pub target: ReferenceTarget,
}

impl ResolvedReference {
    pub fn is_valid(&self) -> bool {
        matches!(self.target, ReferenceTarget::Local { exists: true, .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.target, ReferenceTarget::Remote { .. })
    }

    /// Resolved path for local targets, whether or not the file exists
    pub fn local_path(&self) -> Option<&PathBuf> {
        match &self.target {
            ReferenceTarget::Local { path, .. } => Some(path),
            ReferenceTarget::Remote { .. } => None,
        }
    }
}

/// Outcome of one image in an upload batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(rename = "imagePath")]
    pub path: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceResult {
    pub replaced: usize,
    #[serde(rename = "backupPath")]
    pub backup_path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupResult {
    #[serde(rename = "deletedCount")]
    pub deleted_count: usize,
    #[serde(rename = "total")]
    pub total_candidates: usize,
}

/// Outcome of one remote image in a download batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReport {
    pub results: Vec<DownloadResult>,
    pub replaced: usize,
    #[serde(rename = "backupPath", skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

/// How a broken reference was matched to an image on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    /// Exactly one image carries the reference's file name
    ExactMatch,
    /// Several images share the name; the closest directory path won
    SmartMatch,
    /// As `ExactMatch`, after percent-decoding the reference
    DecodedExactMatch,
    /// As `SmartMatch`, after percent-decoding the reference
    DecodedSmartMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFix {
    #[serde(rename = "type")]
    pub kind: FixKind,
    #[serde(rename = "originalPath")]
    pub original: String,
    #[serde(rename = "newPath")]
    pub replacement: String,
    #[serde(rename = "absolutePath")]
    pub image: PathBuf,
    #[serde(rename = "candidatesCount")]
    pub candidates: usize,
}

/// One document touched by a path fix, with where its old content went
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedDocument {
    /// Relative to the fixed directory, `/` separated
    pub file: String,
    #[serde(rename = "backupFile")]
    pub backup_file: PathBuf,
    pub fixes: Vec<PathFix>,
}

/// Result of a path fix run; also the `fix_log.json` kept in its backup
/// directory for undo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixReport {
    pub timestamp: String,
    #[serde(rename = "totalInvalid")]
    pub total_invalid: usize,
    #[serde(rename = "totalFixes")]
    pub total_fixes: usize,
    #[serde(rename = "backupDir", skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    pub modifications: Vec<FixedDocument>,
    /// References no image could be matched to
    pub unresolved: Vec<InvalidReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoReport {
    #[serde(rename = "backupDir")]
    pub backup_dir: PathBuf,
    pub restored: Vec<String>,
    pub missing: Vec<String>,
}

/// A remote image that did not answer with a success status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub file: PathBuf,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCheckReport {
    pub checked: usize,
    pub broken: Vec<BrokenLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportExport {
    pub path: PathBuf,
    #[serde(rename = "mdFiles")]
    pub document_count: usize,
    #[serde(rename = "mappingCount")]
    pub mapping_count: usize,
}

/// Target form for rewritten links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Remote,
    #[default]
    Local,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Remote => "remote",
            LinkType::Local => "local",
        }
    }
}

impl FromStr for LinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(LinkType::Remote),
            "local" => Ok(LinkType::Local),
            other => Err(format!("unknown link type '{}', expected 'remote' or 'local'", other)),
        }
    }
}
