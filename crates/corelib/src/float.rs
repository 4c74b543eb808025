//! IEEE-754-aware floating intrinsics for `f32` (paired with `i32`) and
//! `f64` (paired with `i64`).
//!
//! Rounded primitives delegate to libm; nothing here tries to be more
//! correctly rounded than the platform. Domain-restricted operations trap on
//! any non-finite input, even where IEEE defines a result (`abs` of
//! infinity): the checked language wants those flushed out, not propagated.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use crate::diag::{Pos, TrapKind};
use crate::{trap, Word};

mod sealed {
    pub trait Sealed {}
}

/// Four-valued comparison outcome. `Unordered` iff either operand is NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering4 {
    Less,
    Greater,
    Equal,
    Unordered,
}

impl Ordering4 {
    /// Wire encoding used by generated code: -1 / 1 / 0 / 2.
    pub const fn code(self) -> i32 {
        match self {
            Ordering4::Less => -1,
            Ordering4::Greater => 1,
            Ordering4::Equal => 0,
            Ordering4::Unordered => 2,
        }
    }
}

/// Outcome of [`argument_reduce`]. When `reduced` is false the exponent gap
/// made quotient tracking unreliable and `quotient_low` is meaningless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reduction<F> {
    pub remainder: F,
    pub quotient_low: i32,
    pub reduced: bool,
}

/// Descriptor for a float width; sealed over `f32` and `f64`.
pub trait FloatKind:
    sealed::Sealed
    + Copy
    + PartialEq
    + PartialOrd
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    const NAME: &'static str;
    const ZERO: Self;
    const ONE: Self;
    const NAN: Self;
    const INFINITY: Self;
    const NEG_INFINITY: Self;
    /// Maximum biased exponent of the format; reported by [`unpack`] for
    /// NaN and zero, where frexp cannot recover one.
    const SENTINEL_EXP: Word;
    /// Exponent gap beyond which [`argument_reduce`] gives up on quotient
    /// tracking.
    const REDUCE_THRESHOLD: i32;
    /// Bit width of the paired integer kind.
    const PAIRED_BITS: u32;

    fn is_nan(self) -> bool;
    fn is_finite(self) -> bool;
    /// XOR the sign bit on the bit representation.
    fn flip_sign_bit(self) -> Self;
    fn from_exp(e: i32) -> Self;

    fn frexp(self) -> (Self, i32);
    fn scalbn(self, n: i32) -> Self;
    fn sqrt(self) -> Self;
    fn fabs(self) -> Self;
    fn copysign(self, y: Self) -> Self;
    fn nextafter(self, y: Self) -> Self;
    fn rint(self) -> Self;
    fn round(self) -> Self;
    fn ieee_remainder(self, y: Self) -> Self;
    fn remquo(self, y: Self) -> (Self, i32);
}

macro_rules! float_kind {
    ($t:ty, $bits:ty, $name:literal, $sentinel:literal, $threshold:literal, $paired:literal,
     $frexp:ident, $scalbn:ident, $sqrt:ident, $fabs:ident, $copysign:ident,
     $nextafter:ident, $rint:ident, $round:ident, $remainder:ident, $remquo:ident) => {
        impl sealed::Sealed for $t {}
        impl FloatKind for $t {
            const NAME: &'static str = $name;
            const ZERO: $t = 0.0;
            const ONE: $t = 1.0;
            const NAN: $t = <$t>::NAN;
            const INFINITY: $t = <$t>::INFINITY;
            const NEG_INFINITY: $t = <$t>::NEG_INFINITY;
            const SENTINEL_EXP: Word = $sentinel;
            const REDUCE_THRESHOLD: i32 = $threshold;
            const PAIRED_BITS: u32 = $paired;

            #[inline(always)]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
            #[inline(always)]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }
            #[inline(always)]
            fn flip_sign_bit(self) -> $t {
                const SIGN: $bits = 1 << (<$bits>::BITS - 1);
                <$t>::from_bits(self.to_bits() ^ SIGN)
            }
            #[inline(always)]
            fn from_exp(e: i32) -> $t {
                e as $t
            }

            #[inline(always)]
            fn frexp(self) -> ($t, i32) {
                libm::$frexp(self)
            }
            #[inline(always)]
            fn scalbn(self, n: i32) -> $t {
                libm::$scalbn(self, n)
            }
            #[inline(always)]
            fn sqrt(self) -> $t {
                libm::$sqrt(self)
            }
            #[inline(always)]
            fn fabs(self) -> $t {
                libm::$fabs(self)
            }
            #[inline(always)]
            fn copysign(self, y: $t) -> $t {
                libm::$copysign(self, y)
            }
            #[inline(always)]
            fn nextafter(self, y: $t) -> $t {
                libm::$nextafter(self, y)
            }
            #[inline(always)]
            fn rint(self) -> $t {
                libm::$rint(self)
            }
            #[inline(always)]
            fn round(self) -> $t {
                libm::$round(self)
            }
            #[inline(always)]
            fn ieee_remainder(self, y: $t) -> $t {
                libm::$remainder(self, y)
            }
            #[inline(always)]
            fn remquo(self, y: $t) -> ($t, i32) {
                libm::$remquo(self, y)
            }
        }
    };
}

float_kind!(
    f32, u32, "real32", 0xFF, 20, 32, frexpf, scalbnf, sqrtf, fabsf, copysignf, nextafterf,
    rintf, roundf, remainderf, remquof
);
float_kind!(
    f64, u64, "real64", 0x7FF, 30, 64, frexp, scalbn, sqrt, fabs, copysign, nextafter, rint,
    round, remainder, remquo
);

/// Four-valued IEEE comparison.
pub fn compare<F: FloatKind>(x: F, y: F) -> Ordering4 {
    if x.is_nan() || y.is_nan() {
        Ordering4::Unordered
    } else if x > y {
        Ordering4::Greater
    } else if x < y {
        Ordering4::Less
    } else {
        Ordering4::Equal
    }
}

/// Absolute value; traps on any non-finite input.
pub fn abs<F: FloatKind>(x: F, pos: Pos<'_>) -> F {
    if x.is_finite() {
        x.fabs()
    } else {
        trap!(pos, TrapKind::InvalidOperand, "abs called on non-finite value {x}")
    }
}

/// Exact halving; traps on any non-finite input.
pub fn div_by_2<F: FloatKind>(x: F, pos: Pos<'_>) -> F {
    if x.is_finite() {
        x.scalbn(-1)
    } else {
        trap!(pos, TrapKind::InvalidOperand, "divby2 called on non-finite value {x}")
    }
}

/// Exact doubling; traps on any non-finite input.
pub fn mul_by_2<F: FloatKind>(x: F, pos: Pos<'_>) -> F {
    if x.is_finite() {
        x.scalbn(1)
    } else {
        trap!(pos, TrapKind::InvalidOperand, "mulby2 called on non-finite value {x}")
    }
}

/// `x * 2^n`; traps on any non-finite input.
pub fn scale_b<F: FloatKind>(x: F, n: Word, pos: Pos<'_>) -> F {
    if !x.is_finite() {
        trap!(pos, TrapKind::InvalidOperand, "scaleb called on non-finite value {x}");
    }
    // scalbn saturates well before the i32 limits, so clamping is lossless.
    let n = n.clamp(i32::MIN as Word, i32::MAX as Word) as i32;
    x.scalbn(n)
}

/// Square root; traps on non-finite or negative input.
pub fn sqrt<F: FloatKind>(x: F, pos: Pos<'_>) -> F {
    if x.is_finite() && x >= F::ZERO {
        x.sqrt()
    } else {
        trap!(pos, TrapKind::InvalidOperand, "sqrt called on invalid input {x}")
    }
}

/// Decompose into (unbiased exponent, mantissa in `[1, 2)`).
///
/// NaN and zero both report the format's maximum exponent with a NaN
/// mantissa; frexp leaves the exponent unset for them, and exponent
/// extraction alone cannot recover a NaN payload.
pub fn unpack<F: FloatKind>(x: F) -> (Word, F) {
    if x.is_nan() || x == F::ZERO {
        (F::SENTINEL_EXP, F::NAN)
    } else {
        // frexp yields [0.5, 1); double the mantissa and drop the exponent
        // by one to land in [1, 2).
        let (m, e) = x.frexp();
        (Word::from(e - 1), m.scalbn(1))
    }
}

/// Unbiased exponent as a float: NaN -> NaN, infinities -> +inf, 0 -> -inf.
pub fn logb<F: FloatKind>(x: F) -> F {
    if x.is_nan() {
        x
    } else if !x.is_finite() {
        F::INFINITY
    } else if x == F::ZERO {
        F::NEG_INFINITY
    } else {
        let (_, e) = x.frexp();
        F::from_exp(e - 1)
    }
}

/// Negate by flipping the sign bit on the representation: handles signed
/// zero and keeps NaN payloads, unlike arithmetic negation of a trap path.
pub fn sign_flip<F: FloatKind>(x: F) -> F {
    x.flip_sign_bit()
}

/// Round to integer under the active rounding mode, except values already
/// past the paired integer's exactly-representable range pass through
/// unchanged (rounding could otherwise push them over a mode-dependent
/// edge).
pub fn round_to_int<F: FloatKind>(x: F) -> F {
    if x.fabs() >= F::ONE.scalbn(F::PAIRED_BITS as i32) {
        x
    } else {
        x.rint()
    }
}

/// Reduce `x` modulo `y` for periodic-function support, tracking the low
/// bits of the integer quotient for quadrant correction. When `x`'s exponent
/// exceeds `y`'s by more than the width's threshold the quotient bits are
/// unreliable, so only the plain IEEE remainder is returned, flagged
/// not-reduced. `y_err` is accepted for ABI compatibility but unused: the
/// reference value's error bound does not change which path is taken.
pub fn argument_reduce<F: FloatKind>(x: F, y: F, _y_err: F) -> Reduction<F> {
    let (_, ex) = x.frexp();
    let (_, ey) = y.frexp();
    if ex > ey + F::REDUCE_THRESHOLD {
        Reduction {
            remainder: x.ieee_remainder(y),
            quotient_low: 0,
            reduced: false,
        }
    } else {
        let (r, q) = x.remquo(y);
        Reduction {
            remainder: r,
            quotient_low: q,
            reduced: true,
        }
    }
}

/// Never traps.
pub fn is_nan<F: FloatKind>(x: F) -> bool {
    x.is_nan()
}

/// Never traps.
pub fn not_finite<F: FloatKind>(x: F) -> bool {
    !x.is_finite()
}

/// Never traps.
pub fn ordered<F: FloatKind>(x: F, y: F) -> bool {
    !(x.is_nan() || y.is_nan())
}

/// `x` with `y`'s sign; IEEE copySign, never traps.
pub fn copy_sign<F: FloatKind>(x: F, y: F) -> F {
    x.copysign(y)
}

/// Next representable value from `x` toward `y`; never traps.
pub fn next_after<F: FloatKind>(x: F, y: F) -> F {
    x.nextafter(y)
}

/// Floating remainder in the language's `\` style: `a - round(a/b) * b`.
/// Traps ModuloByZero on a zero divisor.
pub fn rem<F: FloatKind>(a: F, b: F, pos: Pos<'_>) -> F {
    if b == F::ZERO {
        trap!(pos, TrapKind::ModuloByZero, "modulo by zero");
    }
    let i = (a / b).round();
    a - i * b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{panic_on_trap, Pos};

    const P: Pos<'static> = Pos("float.rs:test");

    #[test]
    fn compare_classifies_nan_unordered() {
        assert_eq!(compare(f64::NAN, 1.0), Ordering4::Unordered);
        assert_eq!(compare(1.0f64, f64::NAN), Ordering4::Unordered);
        assert_eq!(compare(f32::NAN, f32::NAN), Ordering4::Unordered);
        assert_eq!(compare(1.0f32, 2.0), Ordering4::Less);
        assert_eq!(compare(2.0f64, 1.0), Ordering4::Greater);
        assert_eq!(compare(-0.0f64, 0.0), Ordering4::Equal);
    }

    #[test]
    fn unpack_normalizes_to_one_two() {
        let (e, m) = unpack(1.0f64);
        assert_eq!((e, m), (0, 1.0));
        let (e, m) = unpack(6.0f32);
        assert_eq!((e, m), (2, 1.5));
        let (e, m) = unpack(0.0f64);
        assert_eq!(e, 0x7FF);
        assert!(m.is_nan());
        let (e, m) = unpack(f32::NAN);
        assert_eq!(e, 0xFF);
        assert!(m.is_nan());
    }

    #[test]
    fn sign_flip_is_bitwise() {
        assert!(sign_flip(0.0f64).is_sign_negative());
        assert!(sign_flip(f32::NAN).is_nan());
        assert_eq!(sign_flip(-2.5f64), 2.5);
    }

    #[test]
    fn logb_special_cases() {
        assert!(logb(f64::NAN).is_nan());
        assert_eq!(logb(f64::INFINITY), f64::INFINITY);
        assert_eq!(logb(f64::NEG_INFINITY), f64::INFINITY);
        assert_eq!(logb(0.0f32), f32::NEG_INFINITY);
        assert_eq!(logb(8.0f64), 3.0);
        assert_eq!(logb(0.25f64), -2.0);
    }

    #[test]
    #[should_panic(expected = "abs called on non-finite value inf")]
    fn abs_of_infinity_traps() {
        panic_on_trap();
        abs(f64::INFINITY, P);
    }

    #[test]
    #[should_panic(expected = "sqrt called on invalid input -4")]
    fn sqrt_of_negative_traps() {
        panic_on_trap();
        sqrt(-4.0f64, P);
    }

    #[test]
    fn round_to_int_leaves_huge_values() {
        let big = 1.0e20f64; // above 2^64
        assert_eq!(round_to_int(big), big);
        assert_eq!(round_to_int(2.5f64), 2.0); // ties to even
        assert_eq!(round_to_int(3.7f32), 4.0);
    }

    #[test]
    fn argument_reduce_small_gap_tracks_quotient() {
        let r = argument_reduce(7.0f64, 2.0, 0.0);
        assert!(r.reduced);
        assert_eq!(r.remainder, -1.0); // remquo rounds 3.5 to even 4
        assert_eq!(r.quotient_low, 4);
    }

    #[test]
    fn argument_reduce_large_gap_gives_up() {
        let r = argument_reduce(1.0e30f64, 1.0e-30, 0.0);
        assert!(!r.reduced);
        assert_eq!(r.quotient_low, 0);
    }

    #[test]
    fn float_rem_rounds_quotient() {
        assert_eq!(rem(7.0f64, 2.0, P), -1.0); // round(3.5) away from zero
        assert_eq!(rem(1.0f32, 0.25, P), 0.0);
    }
}
