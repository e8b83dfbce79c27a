//! Parsing error types

use codereader_common::CommonError;
use thiserror::Error;

/// Errors surfaced by the Extractor or Chunker.
#[derive(Error, Debug)]
pub enum ParsingError {
    /// The tokenizer encoder failed to load.
    #[error("tokenizer initialization failed: {0}")]
    Tokenizer(String),

    /// An I/O error occurred while reading the file.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for parsing operations.
pub type ParsingResult<T> = Result<T, ParsingError>;

impl CommonError for ParsingError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    fn config_error(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }

    fn parse_error(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }

    fn other_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}
