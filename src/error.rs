// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for dsid
//!
//! Failures that stop a command from running live here. Problems found while
//! identifying a datasource are not errors; the engine reports them as
//! [`crate::engine::Diagnostic`] values next to its result.

use thiserror::Error;

/// Main error type for dsid operations
#[derive(Error, Debug)]
pub enum DsidError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Datasource name not in the catalogue
    #[error("Unknown datasource: {0}")]
    UnknownDatasource(String),
}

/// Result type alias for dsid operations
pub type Result<T> = std::result::Result<T, DsidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = DsidError::Config("bad policy".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad policy");
    }

    #[test]
    fn test_unknown_datasource_display() {
        let err = DsidError::UnknownDatasource("Ec3".to_string());
        assert_eq!(err.to_string(), "Unknown datasource: Ec3");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DsidError = io_err.into();
        assert!(matches!(err, DsidError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_yaml_error_from() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{not: [a list").unwrap_err();
        let err: DsidError = yaml_err.into();
        assert!(err.to_string().starts_with("YAML error:"));
    }
}
