//! `.art` container header parsing.
//!
//! The container is small: a fixed `0x24`-byte preamble (magic, version
//! byte, reserved fields), an optional pins block on version `0x82`, a
//! 32-bit little-endian raw-size field, and then the compressed payload.
//! Legacy files and version `0x81` share the same layout, making the full
//! pre-payload header exactly `0x28` bytes for them.

use mischief_core::error::{MischiefError, Result};
use serde::Serialize;

/// Primary `.art` file magic.
pub const ART_MAGIC: [u8; 4] = [0xC5, 0xB3, 0x8B, 0xE9];

/// Alternate `.art` file magic seen in older files.
pub const ART_MAGIC_ALT: [u8; 4] = [0xC5, 0xB3, 0x8B, 0xE7];

/// Length of the fixed preamble before the optional pins block.
pub const PREAMBLE_LEN: usize = 0x24;

/// Offset of the version byte within the preamble.
pub const VERSION_OFFSET: usize = 4;

/// Container layout selected by the version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtVersion {
    /// Pre-versioned files; same layout as `0x81`.
    Legacy,
    /// Version `0x81`.
    V81,
    /// Version `0x82`, which adds a pins block.
    V82,
}

impl ArtVersion {
    /// Classify a version byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x81 => Self::V81,
            0x82 => Self::V82,
            _ => Self::Legacy,
        }
    }

    /// Whether this layout carries a pins block.
    pub fn has_pins(self) -> bool {
        matches!(self, Self::V82)
    }
}

/// Parsed `.art` container header.
#[derive(Debug, Clone)]
pub struct ArtHeader {
    /// Container layout.
    pub version: ArtVersion,
    /// Raw version byte.
    pub version_byte: u8,
    /// Pins block bytes (version `0x82` only), kept uninterpreted.
    pub pins: Option<Vec<u8>>,
    /// Size of the compressed payload in bytes.
    pub raw_size: u32,
    /// File offset of the compressed payload.
    pub payload_offset: usize,
}

impl ArtHeader {
    /// Check whether `magic` is one of the known `.art` magics.
    pub fn is_art_magic(magic: &[u8]) -> bool {
        magic.len() >= 4 && (magic[..4] == ART_MAGIC || magic[..4] == ART_MAGIC_ALT)
    }

    /// Parse the header from the start of a file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < PREAMBLE_LEN + 4 {
            return Err(MischiefError::invalid_header(format!(
                "file too small to be an .art file ({} bytes)",
                data.len()
            )));
        }
        if !Self::is_art_magic(data) {
            return Err(MischiefError::invalid_magic(data[..4].to_vec()));
        }

        let version_byte = data[VERSION_OFFSET];
        let version = ArtVersion::from_byte(version_byte);
        let mut pos = PREAMBLE_LEN;

        let pins = if version.has_pins() {
            let len = read_u32(data, &mut pos)? as usize;
            if data.len() < pos + len {
                return Err(MischiefError::invalid_header(format!(
                    "pins block of {len} bytes exceeds file size"
                )));
            }
            let block = data[pos..pos + len].to_vec();
            pos += len;
            Some(block)
        } else {
            None
        };

        let raw_size = read_u32(data, &mut pos)?;
        if data.len() < pos + raw_size as usize {
            return Err(MischiefError::invalid_header(format!(
                "raw size {raw_size} exceeds file size"
            )));
        }

        Ok(Self {
            version,
            version_byte,
            pins,
            raw_size,
            payload_offset: pos,
        })
    }

    /// The compressed payload slice within `data`.
    ///
    /// `data` must be the same buffer the header was parsed from.
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.payload_offset..self.payload_offset + self.raw_size as usize]
    }
}

fn read_u32(data: &[u8], pos: &mut usize) -> Result<u32> {
    if data.len() < *pos + 4 {
        return Err(MischiefError::invalid_header(
            "header truncated before raw-size field".to_string(),
        ));
    }
    let value = u32::from_le_bytes([data[*pos], data[*pos + 1], data[*pos + 2], data[*pos + 3]]);
    *pos += 4;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_container(version_byte: u8, payload: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&ART_MAGIC);
        data.push(version_byte);
        data.resize(PREAMBLE_LEN, 0);
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn test_parse_legacy() {
        let data = legacy_container(0x00, b"payload bytes");
        let header = ArtHeader::parse(&data).unwrap();
        assert_eq!(header.version, ArtVersion::Legacy);
        assert_eq!(header.raw_size, 13);
        assert_eq!(header.payload_offset, 0x28);
        assert_eq!(header.payload(&data), b"payload bytes");
        assert!(header.pins.is_none());
    }

    #[test]
    fn test_parse_v81() {
        let data = legacy_container(0x81, b"x");
        let header = ArtHeader::parse(&data).unwrap();
        assert_eq!(header.version, ArtVersion::V81);
    }

    #[test]
    fn test_parse_v82_with_pins() {
        let mut data = Vec::new();
        data.extend_from_slice(&ART_MAGIC_ALT);
        data.push(0x82);
        data.resize(PREAMBLE_LEN, 0);
        data.extend_from_slice(&6u32.to_le_bytes());
        data.extend_from_slice(b"pins!!");
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(b"blob");

        let header = ArtHeader::parse(&data).unwrap();
        assert_eq!(header.version, ArtVersion::V82);
        assert_eq!(header.pins.as_deref(), Some(&b"pins!!"[..]));
        assert_eq!(header.raw_size, 4);
        assert_eq!(header.payload(&data), b"blob");
    }

    #[test]
    fn test_bad_magic_rejected() {
        let data = legacy_container(0x00, b"x");
        let mut bad = data.clone();
        bad[0] = 0x00;
        let err = ArtHeader::parse(&bad).unwrap_err();
        assert!(matches!(err, MischiefError::InvalidMagic { .. }));
    }

    #[test]
    fn test_short_file_rejected() {
        let err = ArtHeader::parse(&[0xC5, 0xB3]).unwrap_err();
        assert!(matches!(err, MischiefError::InvalidHeader { .. }));
    }

    #[test]
    fn test_raw_size_past_eof_rejected() {
        let mut data = legacy_container(0x00, b"abc");
        let len = data.len();
        data[len - 3 - 4] = 200; // inflate raw_size
        let err = ArtHeader::parse(&data).unwrap_err();
        assert!(matches!(err, MischiefError::InvalidHeader { .. }));
    }
}
