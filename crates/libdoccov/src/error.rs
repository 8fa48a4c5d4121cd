use thiserror::Error;

/// Errors raised by the collaborators the coverage engine talks to.
///
/// The engine itself never surfaces these to callers of
/// [`DocCoverage::coverage`](crate::DocCoverage::coverage); they collapse into
/// an unrated result.
#[derive(Error, Debug)]
pub enum DocCovError {
    /// The target module could not be located or loaded.
    #[error("Module unavailable: {0}")]
    ModuleUnavailable(String),

    /// No Cargo.toml was found for a path-like target.
    #[error("Failed to find Cargo.toml in the target directory or any parent directories")]
    ManifestNotFound,

    /// Reading a file failed.
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// rustdoc JSON could not be decoded.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// rustdoc JSON generation failed.
    #[error("Failed to generate rustdoc JSON: {0}")]
    Generate(String),

    /// A cargo workspace operation failed.
    #[error("Cargo error: {0}")]
    Cargo(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DocCovError>;
