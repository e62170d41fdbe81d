//! Error types for wpmd operations.

use thiserror::Error;

/// Errors that can occur while importing, converting, or exporting posts.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Code block consistency failure: {0}")]
    Placeholder(String),
}

pub type Result<T> = std::result::Result<T, Error>;
