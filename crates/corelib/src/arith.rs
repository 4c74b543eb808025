//! Checked integer arithmetic, one monomorphic entry point per numeric kind.
//!
//! Generated code picks the kind statically; here the per-kind bodies come
//! from generic functions over [`IntKind`] rather than textual duplication.
//! Every bound check runs before the arithmetic it guards, on expressions
//! that cannot themselves overflow.

use std::fmt;
use std::str::FromStr;

use crate::diag::{Pos, TrapKind};
use crate::{trap, Word, WORD_BITS};

mod sealed {
    pub trait Sealed {}
}

/// Descriptor for a (width, signedness) numeric kind. Sealed: the closed set
/// is `u8`, `i8`, `i16`, `i32`, `i64`, with the native word as a type alias.
pub trait IntKind:
    sealed::Sealed
    + Copy
    + PartialEq
    + PartialOrd
    + fmt::Display
    + fmt::LowerHex
    + FromStr<Err = std::num::ParseIntError>
{
    const MIN: Self;
    const MAX: Self;
    const BITS: u32;
    const SIGNED: bool;
    const NAME: &'static str;
    const ZERO: Self;
    const ONE: Self;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn wrapping_div(self, rhs: Self) -> Self;
    fn wrapping_rem(self, rhs: Self) -> Self;
    fn wrapping_neg(self) -> Self;

    /// Exact multiply: `None` iff the mathematical product does not fit.
    fn checked_mul_exact(self, rhs: Self) -> Option<Self>;

    /// Plain left shift; caller has established `n < BITS`.
    fn shl_by(self, n: u32) -> Self;
    /// Zero-fill right shift on the bit pattern; caller has established
    /// `n < BITS`. Never sign-extends.
    fn lshr_by(self, n: u32) -> Self;

    fn from_word_wrapping(w: Word) -> Self;
    fn to_word_wrapping(self) -> Word;
    /// Widen losslessly; every supported kind fits in i64.
    fn to_i64(self) -> i64;
    /// Reinterpret the low `BITS` bits of `v` as this kind.
    fn from_bits_u64(v: u64) -> Self;
}

/// Marker for kinds where negation exists (all but `u8`).
pub trait SignedKind: IntKind {}

macro_rules! int_kind {
    ($t:ty, $ut:ty, $signed:expr, $name:literal) => {
        impl sealed::Sealed for $t {}
        impl IntKind for $t {
            const MIN: $t = <$t>::MIN;
            const MAX: $t = <$t>::MAX;
            const BITS: u32 = <$t>::BITS;
            const SIGNED: bool = $signed;
            const NAME: &'static str = $name;
            const ZERO: $t = 0;
            const ONE: $t = 1;

            #[inline(always)]
            fn wrapping_add(self, rhs: $t) -> $t {
                <$t>::wrapping_add(self, rhs)
            }
            #[inline(always)]
            fn wrapping_sub(self, rhs: $t) -> $t {
                <$t>::wrapping_sub(self, rhs)
            }
            #[inline(always)]
            fn wrapping_mul(self, rhs: $t) -> $t {
                <$t>::wrapping_mul(self, rhs)
            }
            #[inline(always)]
            fn wrapping_div(self, rhs: $t) -> $t {
                <$t>::wrapping_div(self, rhs)
            }
            #[inline(always)]
            fn wrapping_rem(self, rhs: $t) -> $t {
                <$t>::wrapping_rem(self, rhs)
            }
            #[inline(always)]
            fn wrapping_neg(self) -> $t {
                <$t>::wrapping_neg(self)
            }

            #[inline(always)]
            fn checked_mul_exact(self, rhs: $t) -> Option<$t> {
                // The branch condition is constant per kind.
                if <$t>::BITS < WORD_BITS {
                    let r = (self as Word) * (rhs as Word);
                    if r < (<$t>::MIN as Word) || r > (<$t>::MAX as Word) {
                        None
                    } else {
                        Some(r as $t)
                    }
                } else {
                    // MIN * -1 wraps back to MIN and the division check
                    // wraps the same way, so it must be rejected up front.
                    if $signed && self == <$t>::MIN && rhs == (0 as $t).wrapping_sub(1) {
                        return None;
                    }
                    let r = self.wrapping_mul(rhs);
                    if rhs != 0 && r.wrapping_div(rhs) != self {
                        None
                    } else {
                        Some(r)
                    }
                }
            }

            #[inline(always)]
            fn shl_by(self, n: u32) -> $t {
                self << n
            }
            #[inline(always)]
            fn lshr_by(self, n: u32) -> $t {
                ((self as $ut) >> n) as $t
            }

            #[inline(always)]
            fn from_word_wrapping(w: Word) -> $t {
                w as $t
            }
            #[inline(always)]
            fn to_word_wrapping(self) -> Word {
                self as Word
            }
            #[inline(always)]
            fn to_i64(self) -> i64 {
                self as i64
            }
            #[inline(always)]
            fn from_bits_u64(v: u64) -> $t {
                v as $t
            }
        }
    };
}

int_kind!(u8, u8, false, "uint8");
int_kind!(i8, u8, true, "int8");
int_kind!(i16, u16, true, "int16");
int_kind!(i32, u32, true, "int32");
int_kind!(i64, u64, true, "int64");

impl SignedKind for i8 {}
impl SignedKind for i16 {}
impl SignedKind for i32 {}
impl SignedKind for i64 {}

/// Most negative representable value of the kind (language-level MOSTNEG).
pub fn most_neg<T: IntKind>() -> T {
    T::MIN
}

/// Most positive representable value of the kind (language-level MOSTPOS).
pub fn most_pos<T: IntKind>() -> T {
    T::MAX
}

/// `a + b`, trapping on overflow. The guard tests against MIN/MAX shifted by
/// `b`, so it never evaluates an out-of-range sum.
pub fn add<T: IntKind>(a: T, b: T, pos: Pos<'_>) -> T {
    let fits = if b < T::ONE {
        T::MIN.wrapping_sub(b) <= a
    } else {
        T::MAX.wrapping_sub(b) >= a
    };
    if fits {
        a.wrapping_add(b)
    } else {
        trap!(pos, TrapKind::Overflow, "integer overflow when doing {a} + {b}")
    }
}

/// `a - b`, trapping on overflow.
pub fn sub<T: IntKind>(a: T, b: T, pos: Pos<'_>) -> T {
    let fits = if b < T::ONE {
        T::MAX.wrapping_add(b) >= a
    } else {
        T::MIN.wrapping_add(b) <= a
    };
    if fits {
        a.wrapping_sub(b)
    } else {
        trap!(pos, TrapKind::Overflow, "integer overflow when doing {a} - {b}")
    }
}

/// `a * b`, trapping on overflow. Kinds narrower than the native word
/// compute in the word and range-check; word-width kinds verify by division.
pub fn mul<T: IntKind>(a: T, b: T, pos: Pos<'_>) -> T {
    match a.checked_mul_exact(b) {
        Some(r) => r,
        None => trap!(pos, TrapKind::Overflow, "integer overflow when doing {a} * {b}"),
    }
}

/// `a / b` (truncating), trapping on zero divisor and on the single signed
/// overflow case `MIN / -1`.
pub fn div<T: IntKind>(a: T, b: T, pos: Pos<'_>) -> T {
    if b == T::ZERO {
        trap!(pos, TrapKind::DivideByZero, "divide by zero");
    }
    if T::SIGNED && a == T::MIN && b == T::ZERO.wrapping_sub(T::ONE) {
        trap!(pos, TrapKind::Overflow, "overflow in division");
    }
    a.wrapping_div(b)
}

/// `a \ b`: remainder whose sign follows the dividend, magnitude `< |b|`.
/// `MIN \ -1` is 0, not an overflow; only a zero divisor traps.
pub fn rem<T: IntKind>(a: T, b: T, pos: Pos<'_>) -> T {
    if b == T::ZERO {
        trap!(pos, TrapKind::ModuloByZero, "modulo by zero");
    }
    a.wrapping_rem(b)
}

/// `-a`, trapping on `MIN`. Absent for the unsigned kind.
pub fn neg<T: SignedKind>(a: T, pos: Pos<'_>) -> T {
    if a == T::MIN {
        trap!(pos, TrapKind::Overflow, "overflow in negation");
    }
    a.wrapping_neg()
}

/// `a << n`. Counts outside `[0, BITS]` trap; `n == BITS` yields 0.
pub fn shl<T: IntKind>(a: T, n: Word, pos: Pos<'_>) -> T {
    if n < 0 || n > T::BITS as Word {
        trap!(
            pos,
            TrapKind::InvalidOperand,
            "left shift by negative value or value greater than number of bits in type"
        );
    }
    if n == T::BITS as Word {
        T::ZERO
    } else {
        a.shl_by(n as u32)
    }
}

/// `a >> n`, always a zero-fill shift on the bit pattern. Counts outside
/// `[0, BITS]` trap; `n == BITS` yields 0.
pub fn shr<T: IntKind>(a: T, n: Word, pos: Pos<'_>) -> T {
    if n < 0 || n > T::BITS as Word {
        trap!(
            pos,
            TrapKind::InvalidOperand,
            "right shift by negative value or value greater than number of bits in type"
        );
    }
    if n == T::BITS as Word {
        T::ZERO
    } else {
        a.lshr_by(n as u32)
    }
}

/// Modulo addition: wraps. Exists to pin the result kind where the caller
/// has already proven the operation safe.
pub fn plus<T: IntKind>(a: T, b: T) -> T {
    a.wrapping_add(b)
}

/// Modulo subtraction: wraps.
pub fn minus<T: IntKind>(a: T, b: T) -> T {
    a.wrapping_sub(b)
}

/// Modulo multiplication: wraps.
pub fn times<T: IntKind>(a: T, b: T) -> T {
    a.wrapping_mul(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{panic_on_trap, Pos};

    const P: Pos<'static> = Pos("arith.rs:test");

    #[test]
    fn add_near_bounds() {
        assert_eq!(add(i8::MAX - 1, 1, P), i8::MAX);
        assert_eq!(add(i8::MIN, 0, P), i8::MIN);
        assert_eq!(add(-1i64, i64::MIN + 1, P), i64::MIN);
        assert_eq!(add(250u8, 5, P), 255);
    }

    #[test]
    #[should_panic(expected = "integer overflow when doing 127 + 1")]
    fn add_overflow_traps() {
        panic_on_trap();
        add(i8::MAX, 1, P);
    }

    #[test]
    fn rem_sign_follows_dividend() {
        assert_eq!(rem(-7i32, 3, P), -1);
        assert_eq!(rem(7i32, -3, P), 1);
        assert_eq!(rem(i32::MIN, -1, P), 0);
        assert_eq!(rem(i64::MIN, 3, P), i64::MIN % 3);
    }

    #[test]
    fn shift_by_width_is_zero() {
        assert_eq!(shl(0x55i8, 8, P), 0);
        assert_eq!(shr(-1i32, 32, P), 0);
    }

    #[test]
    fn shr_is_logical() {
        // -1 >> 1 reinterprets as the unsigned pattern, so the top bit clears.
        assert_eq!(shr(-1i8, 1, P), 0x7f);
        assert_eq!(shr(i64::MIN, 63, P), 1);
    }

    #[test]
    fn kind_extremes() {
        assert_eq!(most_neg::<i16>(), i16::MIN);
        assert_eq!(most_pos::<u8>(), 255);
        assert_eq!(most_neg::<u8>(), 0);
    }

    #[test]
    fn wrapping_pin_ops() {
        assert_eq!(plus(u8::MAX, 1), 0);
        assert_eq!(minus(i8::MIN, 1), i8::MAX);
        assert_eq!(times(i32::MAX, 2), -2);
    }
}
