//! The control state machine for Mischief packing.
//!
//! Twelve nodes condition the token-level probability models on recent
//! symbol history. Node 0 is the stable base (only literals seen
//! recently). Nodes 7/8/9 are entered right after a reference following a
//! literal (new distance / reused distance / trivial copy respectively);
//! 10 and 11 are their counterparts when the previous token was also a
//! reference. Literal decoding walks each of them back to the base along
//! fixed chains:
//!
//! ```text
//! 7 -> 4 -> 1 -> 0      8 -> 5 -> 2 -> 0      9 -> 6 -> 3 -> 0
//! 10 -> 4 -> 1 -> 0     11 -> 5 -> 2 -> 0
//! ```
//!
//! Each node owns its own thresholds for the per-phase "is reference?"
//! decision, the unary reference-kind selector, and the per-phase "kind-1
//! trivial?" sub-decision, so those decisions adapt per history class.

use crate::model::LEN_SUBCONTEXTS;
use crate::range_coder::PROB_INIT;

/// Number of nodes in the state graph.
pub const NUM_STATES: usize = 12;

/// The stable base state.
pub const BASE_STATE: usize = 0;

/// Maximum value of the unary reference-kind code.
pub const REFERENCE_KINDS: usize = 4;

/// Target after a reference at a fresh distance, indexed by whether the
/// previous token was also a reference.
pub const AFTER_NEW_DISTANCE: [usize; 2] = [7, 10];

/// Target after a reference at a reused distance.
pub const AFTER_REUSED_DISTANCE: [usize; 2] = [8, 11];

/// Target after a trivial one-byte copy.
pub const AFTER_TRIVIAL_COPY: [usize; 2] = [9, 11];

/// Per-node literal successor, realizing the convergence chains above.
const AFTER_LITERAL: [usize; NUM_STATES] = [0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 4, 5];

/// One node of the state graph, owning its conditioned thresholds.
#[derive(Debug, Clone)]
pub struct StateNode {
    /// Successor after a literal.
    pub after_literal: usize,
    /// "Is this token a reference?", per output phase.
    pub is_reference: [u16; LEN_SUBCONTEXTS],
    /// Unary selector for the reference kind (0..=4).
    pub reference_kind: [u16; REFERENCE_KINDS],
    /// "Is this kind-1 reference a full copy?", per output phase.
    pub kind1_trivial: [u16; LEN_SUBCONTEXTS],
}

impl StateNode {
    fn new(after_literal: usize) -> Self {
        Self {
            after_literal,
            is_reference: [PROB_INIT; LEN_SUBCONTEXTS],
            reference_kind: [PROB_INIT; REFERENCE_KINDS],
            kind1_trivial: [PROB_INIT; LEN_SUBCONTEXTS],
        }
    }
}

/// The fixed twelve-node graph, indexed by small integers.
#[derive(Debug, Clone)]
pub struct StateGraph {
    /// The node arena.
    pub nodes: Vec<StateNode>,
}

impl StateGraph {
    /// Build the graph with all thresholds neutral.
    pub fn new() -> Self {
        Self {
            nodes: AFTER_LITERAL.iter().map(|&next| StateNode::new(next)).collect(),
        }
    }
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}
