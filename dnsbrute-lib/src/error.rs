//! Error handling for subdomain enumeration operations.
//!
//! This module defines the error type for everything that can fail *outside*
//! an individual lookup. Lookup failures themselves are not errors: they are
//! classified outcomes recorded in the result set.

use std::fmt;

/// Main error type for enumeration operations.
///
/// Covers setup and collaborator failures such as invalid input, resolver
/// construction problems, and configuration issues.
#[derive(Debug, Clone)]
pub enum DnsBruteError {
    /// Invalid target domain or label format
    InvalidDomain { domain: String, reason: String },

    /// The resolver client could not be constructed
    ResolverError { message: String },

    /// Configuration errors (invalid settings, unparseable config file, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading word lists or writing reports
    FileError { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl DnsBruteError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new resolver construction error.
    pub fn resolver<M: Into<String>>(message: M) -> Self {
        Self::ResolverError {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for DnsBruteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::ResolverError { message } => {
                write!(f, "Resolver error: {}", message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for DnsBruteError {}

// Implement From conversions for common error types
impl From<std::io::Error> for DnsBruteError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<toml::de::Error> for DnsBruteError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("TOML parsing failed: {}", err),
        }
    }
}
