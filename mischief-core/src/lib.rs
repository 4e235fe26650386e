//! # Mischief Core
//!
//! Core components for the Mischief `.art` reader.
//!
//! This crate provides the building blocks shared by the rest of the
//! workspace:
//!
//! - [`error`]: the `MischiefError` type and `Result` alias
//! - [`reader`]: little-endian reader for the decompressed payload
//!
//! ## Architecture
//!
//! The workspace is a layered pipeline:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ CLI                                                     │
//! │     info / unpack / svg / json commands                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ Container + document (mischief-art)                     │
//! │     .art header, payload records, SVG rendering         │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codec (mischief-pack)                                   │
//! │     range coder, probability models, LZ77 output        │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core (this crate)                                       │
//! │     ByteReader, MischiefError                           │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod reader;

// Re-exports for convenience
pub use error::{MischiefError, Result};
pub use reader::{ByteReader, MATRIX4_IDENTITY, Matrix4};
