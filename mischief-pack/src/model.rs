//! Probability models for Mischief packing.
//!
//! Every sub-model owns its own adaptive thresholds, all initialized
//! neutral; nothing is shared across decompressions. The models are:
//! - literal coding (8 coders selected by the top 3 bits of the previous
//!   byte, each with a match-byte context),
//! - copy length coding (two instances: new distances and reused
//!   distances), and
//! - copy distance coding (coarse slot, medium reverse trees, raw middle
//!   bits, aligned low nibble).

use crate::range_coder::PROB_INIT;

/// Number of literal coders (selected by the previous byte's top 3 bits).
pub const LITERAL_CODERS: usize = 8;

/// Length-coding subcontexts (output length mod 4).
///
/// The payload is predominantly arrays of 32-bit values, so lengths behave
/// differently per alignment within a word.
pub const LEN_SUBCONTEXTS: usize = 4;

/// Bits in the low length tree (values 0..8).
pub const LEN_LOW_BITS: u32 = 3;
/// Bits in the mid length tree (values 8..16).
pub const LEN_MID_BITS: u32 = 3;
/// Bits in the shared high length tree (values 16..272).
pub const LEN_HIGH_BITS: u32 = 8;

/// Minimum copy length; coded lengths are biased by this.
pub const MATCH_LEN_MIN: usize = 2;

/// Number of coarse distance slots.
pub const DIST_SLOTS: usize = 64;

/// Number of coarse slot trees (selected by length code capped at 3).
pub const DIST_LEN_CONTEXTS: usize = 4;

/// Medium-distance tree widths run 1..=5 bits.
pub const DIST_MEDIUM_TREES: usize = 5;

/// Bits in the aligned low-nibble tree for long distances.
pub const ALIGN_BITS: u32 = 4;

/// Literal byte model.
///
/// Each coder is a `0x300` block: indices `1..0x100` hold the no-context
/// tree, `0x100 + symbol` the tree used while the reference bit is 0, and
/// `0x200 + symbol` the tree used while it is 1.
#[derive(Debug, Clone)]
pub struct LiteralModel {
    /// One probability block per previous-byte class.
    pub probs: Vec<[u16; 0x300]>,
}

impl LiteralModel {
    /// Create a fresh literal model.
    pub fn new() -> Self {
        Self {
            probs: vec![[PROB_INIT; 0x300]; LITERAL_CODERS],
        }
    }
}

impl Default for LiteralModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy length model.
///
/// A two-bit unary selector splits the length space into three ranges:
/// low `0..8` and mid `8..16` get a 3-bit tree per subcontext; high
/// `16..272` gets a single 8-bit tree shared by all four subcontexts.
#[derive(Debug, Clone)]
pub struct LengthModel {
    /// First selector bit (low vs mid+high), shared across subcontexts.
    pub choice: u16,
    /// Second selector bit (mid vs high), shared across subcontexts.
    pub choice2: u16,
    /// Low-range trees, one per subcontext.
    pub low: [[u16; 1 << LEN_LOW_BITS]; LEN_SUBCONTEXTS],
    /// Mid-range trees, one per subcontext.
    pub mid: [[u16; 1 << LEN_MID_BITS]; LEN_SUBCONTEXTS],
    /// High-range tree, shared.
    pub high: [u16; 1 << LEN_HIGH_BITS],
}

impl LengthModel {
    /// Create a fresh length model.
    pub fn new() -> Self {
        Self {
            choice: PROB_INIT,
            choice2: PROB_INIT,
            low: [[PROB_INIT; 1 << LEN_LOW_BITS]; LEN_SUBCONTEXTS],
            mid: [[PROB_INIT; 1 << LEN_MID_BITS]; LEN_SUBCONTEXTS],
            high: [PROB_INIT; 1 << LEN_HIGH_BITS],
        }
    }
}

impl Default for LengthModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy distance model.
#[derive(Debug, Clone)]
pub struct DistanceModel {
    /// Coarse 6-bit slot trees, one per capped length code.
    pub slot: [[u16; DIST_SLOTS]; DIST_LEN_CONTEXTS],
    /// Medium-range reverse trees, `[extra - 1][next-to-msb bit]`.
    /// Sized for the widest (5-bit) tree; narrower trees use a prefix.
    pub medium: [[[u16; 32]; 2]; DIST_MEDIUM_TREES],
    /// Aligned low-nibble reverse tree for long distances, shared.
    pub align: [u16; 1 << ALIGN_BITS],
}

impl DistanceModel {
    /// Create a fresh distance model.
    pub fn new() -> Self {
        Self {
            slot: [[PROB_INIT; DIST_SLOTS]; DIST_LEN_CONTEXTS],
            medium: [[[PROB_INIT; 32]; 2]; DIST_MEDIUM_TREES],
            align: [PROB_INIT; 1 << ALIGN_BITS],
        }
    }
}

impl Default for DistanceModel {
    fn default() -> Self {
        Self::new()
    }
}

/// The full model set for one (de)compression.
#[derive(Debug, Clone)]
pub struct PackModels {
    /// Literal byte coders.
    pub literal: LiteralModel,
    /// Lengths of copies at freshly coded distances.
    pub len_new: LengthModel,
    /// Lengths of copies at reused distances.
    pub len_reused: LengthModel,
    /// Distance coder.
    pub distance: DistanceModel,
}

impl PackModels {
    /// Create a fresh model set with all thresholds neutral.
    pub fn new() -> Self {
        Self {
            literal: LiteralModel::new(),
            len_new: LengthModel::new(),
            len_reused: LengthModel::new(),
            distance: DistanceModel::new(),
        }
    }
}

impl Default for PackModels {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_start_neutral() {
        let models = PackModels::new();
        assert_eq!(models.literal.probs.len(), LITERAL_CODERS);
        assert!(
            models
                .literal
                .probs
                .iter()
                .all(|block| block.iter().all(|&p| p == PROB_INIT))
        );
        assert_eq!(models.len_new.choice, PROB_INIT);
        assert_eq!(models.distance.slot[3][63], PROB_INIT);
        assert_eq!(models.distance.align[15], PROB_INIT);
    }
}
