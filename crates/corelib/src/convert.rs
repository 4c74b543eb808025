//! Numeric <-> string conversion: the runtime's only recoverable channel.
//!
//! Formatting writes into a caller-provided fixed buffer and reports the
//! exact character count (no terminator). Parsing is a strict whole-string
//! scan; kinds narrower than the native word scan into a word temporary and
//! demand a round-tripping narrow cast, which catches malformed text and
//! out-of-range values alike.

use std::fmt::{self, Write as _};

use thiserror::Error;

use crate::arith::IntKind;
use crate::{Word, WORD_BITS};

/// Fixed formatting capacity, sized for the widest kind's longest decimal
/// rendering (`int64` MIN is 20 characters) with room to spare.
pub const FMT_BUF_LEN: usize = 32;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConvertError {
    #[error("malformed numeric literal")]
    Malformed,
    #[error("value out of range for {0}")]
    OutOfRange(&'static str),
    #[error("invalid boolean literal")]
    BadBool,
}

struct SliceWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if self.len + bytes.len() > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }
}

/// Decimal rendering of `n`; returns the character count.
pub fn format_int<T: IntKind>(buf: &mut [u8; FMT_BUF_LEN], n: T) -> usize {
    let mut w = SliceWriter { buf, len: 0 };
    write!(w, "{n}").expect("FMT_BUF_LEN holds the widest kind");
    w.len
}

/// Two's-complement hex rendering of `n` (no sign, no prefix); returns the
/// character count.
pub fn format_hex<T: IntKind>(buf: &mut [u8; FMT_BUF_LEN], n: T) -> usize {
    let mut w = SliceWriter { buf, len: 0 };
    write!(w, "{n:x}").expect("FMT_BUF_LEN holds the widest kind");
    w.len
}

/// Strict decimal parse of the whole string.
pub fn parse_int<T: IntKind>(s: &str) -> Result<T, ConvertError> {
    if T::BITS >= WORD_BITS {
        s.parse::<T>().map_err(|_| ConvertError::Malformed)
    } else {
        let w: Word = s.parse().map_err(|_| ConvertError::Malformed)?;
        let narrowed = T::from_word_wrapping(w);
        if narrowed.to_word_wrapping() == w {
            Ok(narrowed)
        } else {
            Err(ConvertError::OutOfRange(T::NAME))
        }
    }
}

/// Strict hex parse: the digits are the kind's two's-complement bit pattern,
/// so `"ff"` parses as -1 for `int8`. Digits beyond the kind's width are out
/// of range.
pub fn parse_hex<T: IntKind>(s: &str) -> Result<T, ConvertError> {
    if s.is_empty() || s.starts_with('+') || s.starts_with('-') {
        return Err(ConvertError::Malformed);
    }
    let v = u64::from_str_radix(s, 16).map_err(|_| ConvertError::Malformed)?;
    if T::BITS < 64 && (v >> T::BITS) != 0 {
        return Err(ConvertError::OutOfRange(T::NAME));
    }
    Ok(T::from_bits_u64(v))
}

/// Fixed literal encodings: 4 or 5 characters, count returned.
pub fn format_bool(buf: &mut [u8; FMT_BUF_LEN], b: bool) -> usize {
    let lit: &[u8] = if b { b"TRUE" } else { b"FALSE" };
    buf[..lit.len()].copy_from_slice(lit);
    lit.len()
}

/// Case-sensitive exact match on `"TRUE"` / `"FALSE"`.
pub fn parse_bool(s: &str) -> Result<bool, ConvertError> {
    match s {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => Err(ConvertError::BadBool),
    }
}
