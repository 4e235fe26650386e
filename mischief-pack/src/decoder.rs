//! Mischief payload decompression.
//!
//! The compressed payload is laid out as:
//!
//! ```text
//! offset 0..4   uncompressed length, 32-bit little-endian
//! offset 4      container byte, ignored
//! offset 5..9   initial range-coder value, 32-bit big-endian
//! offset 9..    range-coded LZ77 token stream
//! ```
//!
//! Each token is either a literal byte or a back-reference. References come
//! in three flavours: a freshly coded distance, a distance reused from the
//! four-entry history, or a trivial one-byte copy at the most recent
//! distance. The active state node conditions every token-level decision;
//! see [`crate::state`] for the graph.

use crate::model::{
    ALIGN_BITS, DistanceModel, LEN_HIGH_BITS, LEN_LOW_BITS, LEN_MID_BITS, LengthModel,
    MATCH_LEN_MIN, PackModels,
};
use crate::range_coder::RangeDecoder;
use crate::state::{
    AFTER_NEW_DISTANCE, AFTER_REUSED_DISTANCE, AFTER_TRIVIAL_COPY, BASE_STATE, StateGraph,
};
use crate::window::{MruDistances, OutputWindow};
use mischief_core::error::{MischiefError, Result};

/// Length of the fixed compressed-payload prefix.
pub const PAYLOAD_PREFIX_LEN: usize = 9;

/// Distance value the encoder emits to mark end of stream.
///
/// The reference decoder kept distances in signed arithmetic and rejected
/// "negative" values; the all-ones pattern is the encoder's terminator and
/// is honoured as such here.
const END_MARKER: u32 = u32::MAX;

/// Distances with the sign bit set (other than the end marker) cannot be
/// produced by a valid encoder.
const DISTANCE_LIMIT: u32 = 0x8000_0000;

/// Decode a literal byte, optionally guided by a reference byte.
///
/// While the decoded bits agree with the reference byte's bits (MSB
/// first), each bit uses the table picked by the corresponding reference
/// bit; after the first disagreement the plain table finishes the byte.
fn decode_literal(
    rc: &mut RangeDecoder<'_>,
    block: &mut [u16; 0x300],
    reference: Option<u8>,
) -> u8 {
    let mut symbol: usize = 1;

    if let Some(reference) = reference {
        let mut matched = u32::from(reference);
        while symbol < 0x100 {
            let ref_bit = (matched >> 7) & 1;
            matched <<= 1;
            let index = 0x100 + ((ref_bit as usize) << 8) + symbol;
            let bit = rc.decode_bit(&mut block[index]);
            symbol = (symbol << 1) | bit as usize;
            if bit != ref_bit {
                break;
            }
        }
    }

    while symbol < 0x100 {
        let bit = rc.decode_bit(&mut block[symbol]);
        symbol = (symbol << 1) | bit as usize;
    }

    (symbol & 0xFF) as u8
}

/// Decode an unbiased copy length in `0..272`.
fn decode_length(rc: &mut RangeDecoder<'_>, model: &mut LengthModel, subcontext: usize) -> u32 {
    if rc.decode_bit(&mut model.choice) == 0 {
        rc.decode_bit_tree(&mut model.low[subcontext], LEN_LOW_BITS)
    } else if rc.decode_bit(&mut model.choice2) == 0 {
        8 + rc.decode_bit_tree(&mut model.mid[subcontext], LEN_MID_BITS)
    } else {
        16 + rc.decode_bit_tree(&mut model.high, LEN_HIGH_BITS)
    }
}

/// Decode a copy distance.
///
/// Distances below 4 come straight from the coarse slot. Above that, the
/// slot fixes the two top bits and the bit count of the remainder: medium
/// remainders use an adaptive reverse tree per width, long ones spend raw
/// bits on the middle and reserve adaptation for the bottom nibble.
fn decode_distance(
    rc: &mut RangeDecoder<'_>,
    model: &mut DistanceModel,
    length_code: usize,
) -> u32 {
    let slot = rc.decode_bit_tree(&mut model.slot[length_code.min(3)], 6);
    if slot < 4 {
        return slot;
    }

    let nmsb = slot & 1;
    let extra = 1 + ((slot - 4) >> 1);
    let mut distance = (2 | nmsb) << extra;

    if extra < 6 {
        let tree = &mut model.medium[(extra - 1) as usize][nmsb as usize];
        distance | rc.decode_bit_tree_reverse(tree, extra)
    } else {
        for bit_pos in (4..extra).rev() {
            distance |= rc.decode_raw_bit() << bit_pos;
        }
        distance | rc.decode_bit_tree_reverse(&mut model.align, ALIGN_BITS)
    }
}

/// Decoder for one Mischief-packed payload.
pub struct ArtDecoder<'a> {
    rc: RangeDecoder<'a>,
    models: PackModels,
    states: StateGraph,
    mru: MruDistances,
    output: OutputWindow,
    uncompressed_len: usize,
}

impl<'a> ArtDecoder<'a> {
    /// Create a decoder over a range-coded stream (starting at the 4
    /// big-endian initial-value bytes) with a known output length.
    pub fn new(stream: &'a [u8], uncompressed_len: usize) -> Self {
        Self {
            rc: RangeDecoder::new(stream),
            models: PackModels::new(),
            states: StateGraph::new(),
            mru: MruDistances::new(),
            output: OutputWindow::with_capacity(uncompressed_len),
            uncompressed_len,
        }
    }

    /// Run the token loop to completion and return the decoded bytes.
    pub fn decompress(mut self) -> Result<Vec<u8>> {
        let mut state = BASE_STATE;
        let mut was_ref = false;
        let mut mismatch: Option<u8> = None;

        while self.output.len() < self.uncompressed_len {
            let phase = self.output.phase();
            let node = &mut self.states.nodes[state];

            if self.rc.decode_bit(&mut node.is_reference[phase]) == 0 {
                // Literal: one new byte, coder picked by the previous byte.
                let coder = (self.output.earlier(0) >> 5) as usize;
                let block = &mut self.models.literal.probs[coder];
                let byte = decode_literal(&mut self.rc, block, mismatch);
                self.output.push(byte);
                state = node.after_literal;
                mismatch = None;
                was_ref = false;
                continue;
            }

            // Back-reference: copy part of the previous output.
            if self.output.is_empty() {
                return Err(MischiefError::EmptyHistory);
            }

            let kind = self.rc.decode_unary(&mut node.reference_kind);
            let (len, distance, next_state) = if kind == 0 {
                let len = decode_length(&mut self.rc, &mut self.models.len_new, phase) as usize
                    + MATCH_LEN_MIN;
                let distance =
                    decode_distance(&mut self.rc, &mut self.models.distance, len - MATCH_LEN_MIN);
                if distance == END_MARKER {
                    break;
                }
                if distance >= DISTANCE_LIMIT {
                    return Err(MischiefError::bad_distance(distance));
                }
                self.mru.push(distance);
                (len, distance, AFTER_NEW_DISTANCE[usize::from(was_ref)])
            } else if kind == 1 && self.rc.decode_bit(&mut node.kind1_trivial[phase]) == 0 {
                (1, self.mru.head(), AFTER_TRIVIAL_COPY[usize::from(was_ref)])
            } else {
                let len = decode_length(&mut self.rc, &mut self.models.len_reused, phase) as usize
                    + MATCH_LEN_MIN;
                let distance = self.mru.promote(kind - 1);
                (len, distance, AFTER_REUSED_DISTANCE[usize::from(was_ref)])
            };

            if self.output.len() + len > self.uncompressed_len {
                return Err(MischiefError::stream_overflow(
                    self.output.len(),
                    self.uncompressed_len,
                ));
            }

            self.output.copy(distance as usize, len);
            // The byte the copy stopped short of seeds the next literal.
            mismatch = Some(self.output.earlier(distance as usize));
            state = next_state;
            was_ref = true;

            debug_assert!(self.output.len() <= self.uncompressed_len);
        }

        if self.output.len() < self.uncompressed_len {
            return Err(MischiefError::stream_underflow(
                self.output.len(),
                self.uncompressed_len,
            ));
        }

        Ok(self.output.into_bytes())
    }
}

/// Decompress a range-coded stream with a known uncompressed length.
///
/// `stream` starts at the 4 big-endian initial-value bytes (payload
/// offset 5). Returns exactly `uncompressed_len` bytes on success.
pub fn decompress(stream: &[u8], uncompressed_len: usize) -> Result<Vec<u8>> {
    ArtDecoder::new(stream, uncompressed_len).decompress()
}

/// Decompress a full Mischief-packed payload, length prefix included.
pub fn unpack(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() < PAYLOAD_PREFIX_LEN {
        return Err(MischiefError::truncated_input(
            PAYLOAD_PREFIX_LEN,
            payload.len(),
        ));
    }

    let uncompressed_len =
        u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
    decompress(&payload[5..], uncompressed_len)
}
