//! # Mischief Art
//!
//! Reading of Mischief `.art` vector-drawing files.
//!
//! An `.art` file is a small container around a compressed payload:
//!
//! 1. container header: magic, version byte, optional pins block, and
//!    the compressed payload size ([`header`])
//! 2. "Mischief packing" payload, decompressed by `mischief-pack`
//! 3. document records: preamble, layers, images, and the recorded
//!    action stream ([`document`])
//!
//! [`svg`] renders the recorded strokes to a standalone SVG.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mischief_art::ArtFile;
//!
//! let art = ArtFile::open("drawing.art").unwrap();
//! println!("{} layers, {} actions", art.document.layers.len(), art.document.actions.len());
//! let svg = mischief_art::render_svg(&art.document);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod header;
pub mod svg;

// Re-exports
pub use document::{Action, ActionKind, ArtDocument, Image, LayerInfo, PenInfo, StrokePoint};
pub use header::{ART_MAGIC, ART_MAGIC_ALT, ArtHeader, ArtVersion};
pub use svg::render_svg;

use mischief_core::error::Result;
use std::path::Path;

/// A fully loaded `.art` file: container header plus parsed document.
#[derive(Debug, Clone)]
pub struct ArtFile {
    /// Container header.
    pub header: ArtHeader,
    /// Parsed document.
    pub document: ArtDocument,
}

impl ArtFile {
    /// Load and parse an `.art` file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Parse an `.art` file already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = ArtHeader::parse(data)?;
        let payload = mischief_pack::unpack(header.payload(data))?;
        let document = ArtDocument::parse(&payload)?;
        Ok(Self { header, document })
    }

    /// Decompress an `.art` file's payload without parsing the records.
    pub fn unpack_payload(data: &[u8]) -> Result<Vec<u8>> {
        let header = ArtHeader::parse(data)?;
        mischief_pack::unpack(header.payload(data))
    }
}
