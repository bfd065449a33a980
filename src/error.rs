//! Error types for the parsing boundaries of the crate.
//!
//! Interactive scene operations never fail; they clamp or skip. Errors only
//! exist where external text enters the crate: imported style records,
//! JSON configuration and molecule descriptors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("invalid font weight `{0}`")]
    InvalidFontWeight(String),
    #[error("invalid border style `{0}`")]
    InvalidBorderStyle(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("empty molecule descriptor")]
    Empty,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}
