// src/error.rs

//! Error types shared by the Guvnor client library

use thiserror::Error;

/// Errors produced by configuration, HTTP and rendering operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be loaded or holds an invalid value
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A setting required by the requested operation is absent
    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    /// The encrypted repository password could not be decrypted
    #[error("Unable to decrypt password: {0}")]
    DecryptionError(String),

    /// The HTTP client could not be constructed
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Transport-level failure (connect, timeout, body read)
    #[error("Download error: {0}")]
    DownloadError(String),

    /// The server answered with a status other than success
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Feed XML could not be scanned
    #[error("Feed scan error: {0}")]
    ScanError(#[from] crate::repository::ScanError),

    /// Change-set template could not be loaded
    #[error("Template error: {0}")]
    TemplateError(String),
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
