//! Array index, slice, and retype validation, all on the native word.

use crate::diag::{Pos, TrapKind};
use crate::{trap, Word};

/// Validate `0 <= i < limit` and return `i`.
pub fn check_index(i: Word, limit: Word, pos: Pos<'_>) -> Word {
    if i < 0 || i >= limit {
        trap!(
            pos,
            TrapKind::IndexOutOfRange,
            "invalid array index {i} (should be 0 <= i < {limit})"
        );
    }
    i
}

/// Lower-bound-only variant, emitted when the upper bound is proven.
pub fn check_index_lower(i: Word, pos: Pos<'_>) -> Word {
    if i < 0 {
        trap!(
            pos,
            TrapKind::IndexOutOfRange,
            "invalid array index {i} (should be 0 <= i)"
        );
    }
    i
}

/// Upper-bound-only variant, emitted when the lower bound is proven.
pub fn check_index_upper(i: Word, limit: Word, pos: Pos<'_>) -> Word {
    if i >= limit {
        trap!(
            pos,
            TrapKind::IndexOutOfRange,
            "invalid array index {i} (should be i < {limit})"
        );
    }
    i
}

/// Validate the slice `[start, start+count)` against `limit` and return the
/// validated start offset. An empty slice is valid at any start. The end is
/// computed wrapping so the check itself cannot overflow; a wrapped end is
/// caught by the range tests.
pub fn check_slice(start: Word, count: Word, limit: Word, pos: Pos<'_>) -> Word {
    let end = start.wrapping_add(count);
    if count != 0 && (start < 0 || start >= limit || end < 0 || end > limit || count < 0) {
        trap!(
            pos,
            TrapKind::IndexOutOfRange,
            "invalid array slice from {start} to {end} (should be 0 <= i <= {limit})"
        );
    }
    start
}

/// Validate that a region of `src_size` units divides evenly into elements
/// of `dest_size` units; returns the element count after reinterpretation.
pub fn check_retype(src_size: Word, dest_size: Word, pos: Pos<'_>) -> Word {
    if dest_size == 0 {
        trap!(pos, TrapKind::SizeMismatch, "invalid size for retype (zero element size)");
    }
    if src_size % dest_size != 0 {
        trap!(
            pos,
            TrapKind::SizeMismatch,
            "invalid size for retype ({dest_size} does not divide into {src_size})"
        );
    }
    src_size / dest_size
}
