//! Error types for presentation export.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling a presentation into a package.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to create, write or move a file or directory.
    #[error("Failed to write file: {0}")]
    IoError(#[from] std::io::Error),

    /// The requested export format is not implemented.
    #[error("Export format not implemented: {0}")]
    UnsupportedFormat(String),

    /// No presentation record exists for the requested id.
    #[error("Presentation not found: {0}")]
    PresentationNotFound(String),

    /// A shape could not be derived from its source content.
    #[error("Content mapping error: {0}")]
    ContentMapping(String),

    /// An asset marker has no usable resolved source.
    #[error("Unresolved asset: {0}")]
    AssetUnresolved(String),

    /// A position could not be resolved to valid bounds.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// The typed model could not be rendered into document markup.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The package is incomplete or internally inconsistent.
    #[error("Packaging error: {0}")]
    Packaging(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (when reading a package back).
    #[error("XML parsing error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether the condition is absorbed locally (logged, never surfaced).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ContentMapping(_) | Error::AssetUnresolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::ContentMapping("x".into()).is_recoverable());
        assert!(Error::AssetUnresolved("x".into()).is_recoverable());
        assert!(!Error::Geometry("x".into()).is_recoverable());
        assert!(!Error::Packaging("x".into()).is_recoverable());
        assert!(!Error::UnsupportedFormat("pdf".into()).is_recoverable());
    }

    #[test]
    fn test_io_error_converts() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::IoError(_)));
        assert!(err.to_string().contains("gone"));
    }
}
