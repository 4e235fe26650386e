//! # Mischief Pack
//!
//! The "Mischief packing" codec: the LZMA-family compression wrapped
//! around the payload of Mischief `.art` files.
//!
//! The format is a range-coded, context-modelled LZ77 stream:
//!
//! - a 32-bit range coder with 11-bit adaptive binary probabilities,
//! - literal coding with an optional reference-byte context,
//! - copy lengths in three nested ranges per output-alignment subcontext,
//! - copy distances split into coarse slot / adaptive medium bits / raw
//!   middle bits with an adaptive low nibble,
//! - a four-entry history of recent distances with promote-to-front
//!   reuse, and
//! - a twelve-state control machine conditioning every token decision on
//!   recent symbol history.
//!
//! ## Usage
//!
//! ```ignore
//! use mischief_pack::unpack;
//!
//! // `payload` is the compressed blob from an .art container, length
//! // prefix included.
//! let decoded = unpack(&payload)?;
//! ```
//!
//! Decoding is a pure function of the compressed bytes; all probability
//! state is scoped to a single call. [`ArtEncoder`] is the token-level
//! mirror used to synthesize streams; it does no match-finding.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decoder;
pub mod encoder;
pub mod model;
pub mod range_coder;
pub mod state;
pub mod window;

// Re-exports
pub use decoder::{ArtDecoder, PAYLOAD_PREFIX_LEN, decompress, unpack};
pub use encoder::ArtEncoder;
pub use model::PackModels;
pub use range_coder::{RangeDecoder, RangeEncoder};
pub use state::StateGraph;
pub use window::{MruDistances, OutputWindow};
