use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the entire validation pipeline.
/// Every module returns `Result<T, CheckError>`.
#[derive(Debug, Error)]
pub enum CheckError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Configuration ───────────────────────────────────
    #[error("Property file error: {0}")]
    Property(String),

    #[error("Declared configuration contradicts repository layout: {0}")]
    StructureMismatch(String),

    // ── Resolution ──────────────────────────────────────
    #[error("Loader '{requested}' is not active for this project (active: {active})")]
    LoaderNotActive { requested: String, active: String },

    #[error("A loader must be requested for multi-loader projects (active: {active})")]
    LoaderRequired { active: String },

    #[error("Unrecognized loader '{0}' (recognized: forge, neoforge, fabric)")]
    UnknownLoader(String),

    // ── Artifact ────────────────────────────────────────
    #[error("Artifact not found at {0:?}")]
    ArtifactMissing(PathBuf),

    #[error("Empty artifact at {0:?}")]
    ArtifactEmpty(PathBuf),

    #[error("Artifact at {path:?} is not a valid archive: {detail}")]
    ArtifactCorrupt { path: PathBuf, detail: String },

    #[error("Artifact at {path:?} is missing required entry '{entry}'")]
    MissingEntry { path: PathBuf, entry: String },

    // ── Classification ──────────────────────────────────
    #[error("Mapping mismatch for {loader}: classified '{observed}', expected {expected}")]
    MappingMismatch {
        loader: String,
        observed: String,
        expected: String,
    },

    // ── Dependency manifest ─────────────────────────────
    #[error("Dependency manifest error: {0}")]
    Manifest(String),

    #[error("Dependency manifest contains {count} forbidden latest-version directive(s)")]
    LatestForbidden { count: usize },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Registry returned HTTP {status} for dependency '{name}'")]
    RegistryStatus { name: String, status: u16 },

    #[error("Registry response for dependency '{name}' is missing expected field '{field}'")]
    RegistryResponse { name: String, field: String },

    #[error("Dependency '{name}': pinned version '{pin}' not found on {registry}")]
    PinNotFound {
        name: String,
        pin: String,
        registry: String,
    },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Archive ─────────────────────────────────────────
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── YAML / JSON ─────────────────────────────────────
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type CheckResult<T> = Result<T, CheckError>;

impl From<std::io::Error> for CheckError {
    fn from(source: std::io::Error) -> Self {
        CheckError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
