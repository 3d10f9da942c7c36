//! Shared error hierarchy.
//!
//! One flat `thiserror` enum covers every decoder and container parser, the same shape as
//! `retrocompressor::Error` in the original crate this one grew out of.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("magic bytes did not match the expected format")]
    MagicMismatch,
    #[error("header was truncated before all fields could be read")]
    TruncatedHeader,
    #[error("bit stream ended before decoding could complete")]
    TruncatedStream,
    #[error("tree or dictionary reference was out of range: {0}")]
    InvalidTreeOrDictionary(String),
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),
    #[error("archive structure is invalid: {0}")]
    InvalidArchive(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type DecodeResult<T> = Result<T, Error>;
