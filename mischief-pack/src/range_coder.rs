//! Range coder for Mischief packing.
//!
//! Mischief uses an LZMA-family range coder:
//! - 32-bit interval tracking
//! - renormalization when the interval drops below 2^24
//! - 11-bit adaptive probability thresholds (0x400 = 50%)
//!
//! The decoder reads its initial interval position from 4 big-endian bytes
//! at the front of the stream; every byte after that feeds renormalization.
//! The stream behaves as if padded with four trailing zero bytes, so reads
//! past the end yield zeros instead of failing.

/// Number of bits in the probability model.
pub const PROB_BITS: u32 = 11;

/// Neutral probability (50%).
pub const PROB_INIT: u16 = 1 << (PROB_BITS - 1);

/// Exclusive upper bound on probability values.
pub const PROB_MAX: u16 = 1 << PROB_BITS;

/// Number of bits to shift for the probability update step (1/32).
pub const MOVE_BITS: u32 = 5;

/// Interval floor triggering renormalization.
const TOP_VALUE: u32 = 1 << 24;

/// Move a threshold toward "0 is likely" after decoding a 0 bit.
///
/// The rounding bias differs from [`shift_down`]; the decoded stream depends
/// on both formulas bit-for-bit.
#[inline]
fn shift_up(prob: u16) -> u16 {
    prob - ((prob + 0x1F) >> MOVE_BITS) + 0x40
}

/// Move a threshold toward "1 is likely" after decoding a 1 bit.
#[inline]
fn shift_down(prob: u16) -> u16 {
    prob - (prob >> MOVE_BITS)
}

/// Range decoder over an in-memory compressed stream.
///
/// The stream starts with the 4 big-endian bytes of the initial interval
/// position; the rest is range-coded payload.
#[derive(Debug)]
pub struct RangeDecoder<'a> {
    input: &'a [u8],
    pos: usize,
    scale: u32,
    value: u32,
}

impl<'a> RangeDecoder<'a> {
    /// Create a decoder over `stream`.
    ///
    /// Missing initial bytes read as zero, matching the zero pad applied at
    /// end of stream; callers validate stream length before construction.
    pub fn new(stream: &'a [u8]) -> Self {
        let mut init = [0u8; 4];
        let head = stream.len().min(4);
        init[..head].copy_from_slice(&stream[..head]);

        Self {
            input: stream,
            pos: 4,
            scale: 0xFFFF_FFFF,
            value: u32::from_be_bytes(init),
        }
    }

    /// Next payload byte, or zero once the stream is exhausted.
    #[inline]
    fn next_byte(&mut self) -> u8 {
        let byte = self.input.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }

    /// Refill the interval when it gets small.
    ///
    /// A single `if` suffices: no decode step consumes more than 8 bits.
    #[inline]
    fn renormalize(&mut self) {
        if self.scale < TOP_VALUE {
            self.scale <<= 8;
            self.value = (self.value << 8) | u32::from(self.next_byte());
        }
        debug_assert!(self.scale >= TOP_VALUE);
    }

    /// Decode a single bit against an adaptive threshold, updating it.
    pub fn decode_bit(&mut self, prob: &mut u16) -> u32 {
        debug_assert!(*prob > 0 && *prob < PROB_MAX);
        self.renormalize();

        let bound = (self.scale >> PROB_BITS) * u32::from(*prob);

        if self.value < bound {
            self.scale = bound;
            *prob = shift_up(*prob);
            0
        } else {
            self.value -= bound;
            self.scale -= bound;
            *prob = shift_down(*prob);
            1
        }
    }

    /// Decode a bit with fixed 50% probability and no model update.
    pub fn decode_raw_bit(&mut self) -> u32 {
        self.renormalize();

        self.scale >>= 1;
        if self.value < self.scale {
            0
        } else {
            self.value -= self.scale;
            1
        }
    }

    /// Decode a bit tree, most significant bit first.
    ///
    /// Each bit is decoded with context = the bits decoded so far, via the
    /// usual 1-rooted tree walk.
    pub fn decode_bit_tree(&mut self, probs: &mut [u16], num_bits: u32) -> u32 {
        let mut m = 1usize;

        for _ in 0..num_bits {
            let bit = self.decode_bit(&mut probs[m]);
            m = (m << 1) | bit as usize;
        }

        (m as u32) - (1 << num_bits)
    }

    /// Decode a bit tree, least significant bit first.
    ///
    /// The bit at position `i` is decoded with context = the low `i` bits
    /// already decoded; level `i` of the table occupies indices
    /// `2^i .. 2^(i+1)`.
    pub fn decode_bit_tree_reverse(&mut self, probs: &mut [u16], num_bits: u32) -> u32 {
        let mut value = 0u32;

        for i in 0..num_bits {
            let index = (1usize << i) + value as usize;
            value |= self.decode_bit(&mut probs[index]) << i;
        }

        value
    }

    /// Decode a unary-coded integer in `0..=probs.len()`.
    pub fn decode_unary(&mut self, probs: &mut [u16]) -> usize {
        for (count, prob) in probs.iter_mut().enumerate() {
            if self.decode_bit(prob) == 0 {
                return count;
            }
        }
        probs.len()
    }
}

/// Range encoder producing streams the decoder above consumes.
///
/// Exists for stream synthesis (tests and tooling); the crate does not
/// provide match-finding, so this is not a general-purpose compressor.
#[derive(Debug)]
pub struct RangeEncoder {
    /// Output buffer.
    buffer: Vec<u8>,
    /// Current range.
    range: u32,
    /// Low value; bits 32+ carry.
    low: u64,
    /// Cache byte awaiting carry resolution.
    cache: u8,
    /// Number of pending bytes.
    cache_size: u64,
}

impl RangeEncoder {
    /// Create a new range encoder.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            range: 0xFFFF_FFFF,
            low: 0,
            cache: 0,
            cache_size: 1,
        }
    }

    /// Shift low and emit bytes, propagating carry through the cache.
    fn shift_low(&mut self) {
        if self.low < 0xFF00_0000 || self.low > 0xFFFF_FFFF {
            let mut tmp = self.cache;
            let carry = (self.low >> 32) as u8;

            loop {
                self.buffer.push(tmp.wrapping_add(carry));
                tmp = 0xFF;
                self.cache_size -= 1;
                if self.cache_size == 0 {
                    break;
                }
            }

            self.cache = (self.low >> 24) as u8;
        }

        self.cache_size += 1;
        self.low = (self.low << 8) & 0xFFFF_FFFF;
    }

    /// Refill the interval when it gets small.
    fn normalize(&mut self) {
        if self.range < TOP_VALUE {
            self.range <<= 8;
            self.shift_low();
        }
    }

    /// Encode a single bit against an adaptive threshold, updating it
    /// exactly as the decoder does.
    pub fn encode_bit(&mut self, prob: &mut u16, bit: u32) {
        let bound = (self.range >> PROB_BITS) * u32::from(*prob);

        if bit == 0 {
            self.range = bound;
            *prob = shift_up(*prob);
        } else {
            self.low += u64::from(bound);
            self.range -= bound;
            *prob = shift_down(*prob);
        }

        self.normalize();
    }

    /// Encode a bit with fixed 50% probability.
    pub fn encode_raw_bit(&mut self, bit: u32) {
        self.range >>= 1;
        if bit != 0 {
            self.low += u64::from(self.range);
        }
        self.normalize();
    }

    /// Encode a bit tree, most significant bit first.
    pub fn encode_bit_tree(&mut self, probs: &mut [u16], num_bits: u32, value: u32) {
        let mut m = 1usize;

        for i in (0..num_bits).rev() {
            let bit = (value >> i) & 1;
            self.encode_bit(&mut probs[m], bit);
            m = (m << 1) | bit as usize;
        }
    }

    /// Encode a bit tree, least significant bit first.
    pub fn encode_bit_tree_reverse(&mut self, probs: &mut [u16], num_bits: u32, value: u32) {
        let mut partial = 0u32;

        for i in 0..num_bits {
            let bit = (value >> i) & 1;
            let index = (1usize << i) + partial as usize;
            self.encode_bit(&mut probs[index], bit);
            partial |= bit << i;
        }
    }

    /// Encode a unary-coded integer in `0..=probs.len()`.
    pub fn encode_unary(&mut self, probs: &mut [u16], value: usize) {
        debug_assert!(value <= probs.len());
        for prob in probs.iter_mut().take(value) {
            self.encode_bit(prob, 1);
        }
        if let Some(prob) = probs.get_mut(value) {
            self.encode_bit(prob, 0);
        }
    }

    /// Flush pending bytes and return the stream.
    ///
    /// The first output byte is always zero; the following four are the
    /// big-endian initial value the decoder reads.
    pub fn finish(mut self) -> Vec<u8> {
        for _ in 0..5 {
            self.shift_low();
        }
        self.buffer
    }
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}
