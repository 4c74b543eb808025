//! Core library: the checked-arithmetic, bounds-checking, and IEEE-aware
//! float runtime a bounds-checked language's compiled output links against.
//!
//! Every arithmetic expression, array access, narrowing conversion, and
//! retype in a compiled program becomes a call into one of these leaf
//! functions. Violations funnel to the fatal sink in [`diag`]; only string
//! conversion ([`convert`]) reports recoverable errors.

use once_cell::sync::Lazy;
use serde::Serialize;

pub mod arith;
pub mod bounds;
pub mod cast;
pub mod convert;
pub mod diag;
pub mod float;
#[cfg(unix)]
pub mod term;

/// The native word backing the language's default integer kind. Selected at
/// build time; generated code and runtime must agree on it.
#[cfg(feature = "word32")]
pub type Word = i32;
#[cfg(not(feature = "word32"))]
pub type Word = i64;

pub const WORD_BITS: u32 = Word::BITS;

/// Public kind info for tooling (CLI probe, host introspection).
#[derive(Debug, Clone, Serialize)]
pub struct KindInfo {
    pub name: &'static str,
    pub bits: u32,
    pub signed: bool,
    pub min: i64,
    pub max: i64,
}

fn kind_info<T: arith::IntKind>() -> KindInfo {
    KindInfo {
        name: T::NAME,
        bits: T::BITS,
        signed: T::SIGNED,
        min: T::MIN.to_i64(),
        max: T::MAX.to_i64(),
    }
}

static KIND_TABLE: Lazy<Vec<KindInfo>> = Lazy::new(|| {
    vec![
        kind_info::<u8>(),
        kind_info::<i8>(),
        kind_info::<i16>(),
        kind_info::<i32>(),
        kind_info::<i64>(),
    ]
});

/// API: the supported integer kinds and their ranges.
pub fn kind_table() -> &'static [KindInfo] {
    KIND_TABLE.as_slice()
}

/// Version helper for CLI/FFI.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
