//! Error types for Mischief `.art` operations.
//!
//! This module provides a single error type covering the whole pipeline:
//! container validation, payload decompression, and record parsing.
//! Decompression never recovers partially; every variant here is fatal to
//! the operation that raised it.

use std::io;
use thiserror::Error;

/// The main error type for Mischief `.art` operations.
#[derive(Debug, Error)]
pub enum MischiefError {
    /// I/O error from the underlying reader.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number in the file header.
    #[error("Invalid magic number: expected c5 b3 8b e9 or c5 b3 8b e7, found {found:02x?}")]
    InvalidMagic {
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Invalid or inconsistent container header.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Compressed payload shorter than its fixed 9-byte prefix.
    #[error("Truncated compressed payload: need {needed} bytes, have {available}")]
    TruncatedInput {
        /// Number of bytes required.
        needed: usize,
        /// Number of bytes present.
        available: usize,
    },

    /// A back-reference was decoded while the output buffer is still empty.
    #[error("Back-reference decoded with empty output history")]
    EmptyHistory,

    /// A distance code resolved to a value outside the representable range.
    #[error("Invalid copy distance: {distance:#010x}")]
    BadDistance {
        /// The offending distance value.
        distance: u32,
    },

    /// A copy would push the output past its announced length.
    #[error("Decompression would exceed announced length: {length} + copy > {limit}")]
    StreamOverflow {
        /// Output length at the time of the copy.
        length: usize,
        /// Announced uncompressed length.
        limit: usize,
    },

    /// The compressed stream ended before the announced length was reached.
    #[error("Compressed stream ended early: decoded {decoded} of {expected} bytes")]
    StreamUnderflow {
        /// Bytes actually decoded.
        decoded: usize,
        /// Announced uncompressed length.
        expected: usize,
    },

    /// Unexpected end of the decompressed payload while parsing records.
    #[error("Unexpected end of payload: expected {expected} more bytes at offset {offset}")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
        /// Payload offset where the shortfall occurred.
        offset: usize,
    },

    /// An action record with an id the parser does not know.
    #[error("Unknown action id {id:#x} at payload offset {offset}")]
    UnknownAction {
        /// The unrecognized action id.
        id: u32,
        /// Payload offset of the record.
        offset: usize,
    },

    /// A fixed-width string field that is not valid UTF-8.
    #[error("Invalid UTF-8 in string field at payload offset {offset}")]
    InvalidString {
        /// Payload offset of the string field.
        offset: usize,
    },
}

/// Result type alias for Mischief operations.
pub type Result<T> = std::result::Result<T, MischiefError>;

impl MischiefError {
    /// Create an invalid magic error.
    pub fn invalid_magic(found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            found: found.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a truncated input error.
    pub fn truncated_input(needed: usize, available: usize) -> Self {
        Self::TruncatedInput { needed, available }
    }

    /// Create a bad distance error.
    pub fn bad_distance(distance: u32) -> Self {
        Self::BadDistance { distance }
    }

    /// Create a stream overflow error.
    pub fn stream_overflow(length: usize, limit: usize) -> Self {
        Self::StreamOverflow { length, limit }
    }

    /// Create a stream underflow error.
    pub fn stream_underflow(decoded: usize, expected: usize) -> Self {
        Self::StreamUnderflow { decoded, expected }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize, offset: usize) -> Self {
        Self::UnexpectedEof { expected, offset }
    }

    /// Create an unknown action error.
    pub fn unknown_action(id: u32, offset: usize) -> Self {
        Self::UnknownAction { id, offset }
    }

    /// Create an invalid string error.
    pub fn invalid_string(offset: usize) -> Self {
        Self::InvalidString { offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MischiefError::invalid_magic(vec![0x50, 0x4B, 0x03, 0x04]);
        assert!(err.to_string().contains("Invalid magic"));

        let err = MischiefError::stream_overflow(500, 512);
        assert!(err.to_string().contains("announced length"));

        let err = MischiefError::unknown_action(0x99, 1234);
        assert!(err.to_string().contains("0x99"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: MischiefError = io_err.into();
        assert!(matches!(err, MischiefError::Io(_)));
    }
}
