//! Error types for the commitlens library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using commitlens's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading logs or running analyses.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Log contents could not be decoded as text.
    #[error("Cannot decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new decode error for the given path.
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Map an I/O error on `path`, turning `NotFound` into [`Error::FileNotFound`].
    pub fn io_at(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FileNotFound {
            path: PathBuf::from("commits.txt"),
        };
        assert_eq!(err.to_string(), "File not found: commits.txt");
    }

    #[test]
    fn test_decode_error_display() {
        let err = Error::decode("log.txt", "invalid UTF-8 at byte 3");
        assert_eq!(
            err.to_string(),
            "Cannot decode log.txt: invalid UTF-8 at byte 3"
        );
    }

    #[test]
    fn test_io_at_maps_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        match Error::io_at("missing.txt", io) {
            Error::FileNotFound { path } => assert_eq!(path, PathBuf::from("missing.txt")),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(Error::io_at("locked.txt", io), Error::Io(_)));
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("bad value");
        assert_eq!(err.to_string(), "Configuration error: bad value");
    }
}
