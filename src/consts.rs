//! Constants shared between the range decoder and the LZMA sequence decoder.

pub(crate) const SHIFT_BITS: u32 = 8;
pub(crate) const TOP_VALUE: u32 = 0x0100_0000;

pub(crate) const BIT_MODEL_TOTAL_BITS: u32 = 11;
pub(crate) const BIT_MODEL_TOTAL: u16 = 1 << BIT_MODEL_TOTAL_BITS;
pub(crate) const PROB_INIT: u16 = BIT_MODEL_TOTAL / 2;
pub(crate) const MOVE_BITS: u32 = 5;

pub(crate) const POS_STATES_MAX: usize = 1 << 4;
pub(crate) const MATCH_LEN_MIN: usize = 2;
pub(crate) const MATCH_LEN_MAX: usize = MATCH_LEN_MIN + 271;

pub(crate) const DIST_STATES: usize = 4;
pub(crate) const DIST_SLOTS: usize = 64;
pub(crate) const DIST_MODEL_START: usize = 4;
pub(crate) const DIST_MODEL_END: usize = 14;
pub(crate) const FULL_DISTANCES: usize = 1 << (DIST_MODEL_END / 2);
/// One more than `FULL_DISTANCES - DIST_MODEL_END` so that the highest
/// `SpecPos` offset used by `decode_distance` (reached at `pos_slot == 13`)
/// stays in bounds; index 0 of each sub-range is never addressed.
pub(crate) const SPEC_POS_SIZE: usize = FULL_DISTANCES - DIST_MODEL_END + 1;

pub(crate) const ALIGN_BITS: usize = 4;
pub(crate) const ALIGN_SIZE: usize = 1 << ALIGN_BITS;

pub(crate) const STATES: usize = 12;
pub(crate) const LITERAL_CODER_SIZE: usize = 0x300;

/// Worst-case byte size of one LZMA packet (used to bound how far from the
/// chunk's declared end the decoder may still start a new symbol).
pub(crate) const LZMA_MAX_SEQUENCE_SIZE: usize = 21;
