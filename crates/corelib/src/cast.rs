//! Checked numeric conversions: narrowing range checks and int/real casts.

use crate::arith::IntKind;
use crate::diag::{Pos, TrapKind};
use crate::trap;

/// Validate `lower <= n <= upper` before a narrowing conversion; returns `n`.
pub fn range_check<T: IntKind>(lower: T, upper: T, n: T, pos: Pos<'_>) -> T {
    if n < lower || n > upper {
        trap!(
            pos,
            TrapKind::Overflow,
            "invalid value in conversion {n} (should be {lower} <= i <= {upper})"
        );
    }
    n
}

// Exact integer span of i64 as a float: 2^63. Representable exactly in both
// widths; values >= this (or < its negation) cannot be cast.
const I64_SPAN: f64 = 9_223_372_036_854_775_808.0;

fn f64_to_i64(v: f64, op: &str, pos: Pos<'_>) -> i64 {
    if v.is_nan() {
        trap!(pos, TrapKind::InvalidOperand, "{op} called on NaN");
    }
    if v >= I64_SPAN || v < -I64_SPAN {
        trap!(pos, TrapKind::Overflow, "overflow in conversion of {v} to int64");
    }
    v as i64
}

/// i64 -> f32, rounding to nearest. Round and trunc variants agree for a
/// widening conversion; both spellings exist because the compiler emits both.
pub fn int64_to_real32_round(v: i64, _pos: Pos<'_>) -> f32 {
    v as f32
}

pub fn int64_to_real32_trunc(v: i64, _pos: Pos<'_>) -> f32 {
    v as f32
}

/// i64 -> f64, rounding to nearest.
pub fn int64_to_real64_round(v: i64, _pos: Pos<'_>) -> f64 {
    v as f64
}

pub fn int64_to_real64_trunc(v: i64, _pos: Pos<'_>) -> f64 {
    v as f64
}

/// f32 -> i64, rounding to nearest; traps on NaN and out-of-range values.
pub fn real32_to_int64_round(v: f32, pos: Pos<'_>) -> i64 {
    f64_to_i64(libm::roundf(v) as f64, "real32 round", pos)
}

/// f32 -> i64, truncating toward zero; traps on NaN and out-of-range values.
pub fn real32_to_int64_trunc(v: f32, pos: Pos<'_>) -> i64 {
    f64_to_i64(libm::truncf(v) as f64, "real32 trunc", pos)
}

/// f64 -> i64, rounding to nearest; traps on NaN and out-of-range values.
pub fn real64_to_int64_round(v: f64, pos: Pos<'_>) -> i64 {
    f64_to_i64(libm::round(v), "real64 round", pos)
}

/// f64 -> i64, truncating toward zero; traps on NaN and out-of-range values.
pub fn real64_to_int64_trunc(v: f64, pos: Pos<'_>) -> i64 {
    f64_to_i64(libm::trunc(v), "real64 trunc", pos)
}

/// f64 -> f32 narrowing. Out-of-range magnitudes overflow to infinity per
/// IEEE; round and trunc spellings both use the default rounding.
pub fn real64_to_real32_round(v: f64, _pos: Pos<'_>) -> f32 {
    v as f32
}

pub fn real64_to_real32_trunc(v: f64, _pos: Pos<'_>) -> f32 {
    v as f32
}
