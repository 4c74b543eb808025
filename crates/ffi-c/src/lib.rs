//! C ABI for compiler-generated code: one `hs_` entry point per
//! (operation, numeric kind), macro-expanded over the closed kind set.
//!
//! Position tokens arrive as C strings; a null or non-UTF-8 token degrades
//! to an unknown-position marker rather than undefined behavior. Out-param
//! pointers must be valid for a single write; the string-conversion entry
//! points follow the (error flag, out value) convention of the source
//! language's recoverable channel.

mod error;
mod ffi_json;

pub use error::{StatusCode, HS_ERR_CONVERT, HS_ERR_INTERNAL, HS_ERR_INVALID_ARG, HS_OK};
pub use ffi_json::{err, ok, status, with_field, Envelope};

use std::ffi::{c_char, CStr, CString};

use hardstop_corelib::diag::{Pos, UNKNOWN_POS};
use hardstop_corelib::{arith, bounds, cast, convert, float, Word};

fn with_pos<R>(pos: *const c_char, f: impl FnOnce(Pos<'_>) -> R) -> R {
    if pos.is_null() {
        return f(UNKNOWN_POS);
    }
    let cstr = unsafe { CStr::from_ptr(pos) };
    match cstr.to_str() {
        Ok(s) => f(Pos(s)),
        Err(_) => f(UNKNOWN_POS),
    }
}

#[no_mangle]
pub extern "C" fn hs_runtime_init() {}

/// Heap-allocated JSON status string for host probing; release with
/// [`hs_string_free`].
#[no_mangle]
pub extern "C" fn hs_status_json() -> *mut c_char {
    status().into_cstring().into_raw()
}

/// # Safety
/// `s` must have come from [`hs_status_json`] and not been freed before.
#[no_mangle]
pub unsafe extern "C" fn hs_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ---- checked integer arithmetic -------------------------------------------

macro_rules! checked_binop {
    ($name:ident, $t:ty, $f:path) => {
        #[no_mangle]
        pub extern "C-unwind" fn $name(a: $t, b: $t, pos: *const c_char) -> $t {
            with_pos(pos, |p| $f(a, b, p))
        }
    };
}

macro_rules! checked_unop {
    ($name:ident, $t:ty, $f:path) => {
        #[no_mangle]
        pub extern "C-unwind" fn $name(a: $t, pos: *const c_char) -> $t {
            with_pos(pos, |p| $f(a, p))
        }
    };
}

macro_rules! checked_shift {
    ($name:ident, $t:ty, $f:path) => {
        #[no_mangle]
        pub extern "C-unwind" fn $name(a: $t, n: Word, pos: *const c_char) -> $t {
            with_pos(pos, |p| $f(a, n, p))
        }
    };
}

macro_rules! wrap_binop {
    ($name:ident, $t:ty, $f:path) => {
        #[no_mangle]
        pub extern "C" fn $name(a: $t, b: $t) -> $t {
            $f(a, b)
        }
    };
}

macro_rules! int_kind_ops {
    ($t:ty, $add:ident, $sub:ident, $mul:ident, $div:ident, $rem:ident,
     $shl:ident, $shr:ident, $plus:ident, $minus:ident, $times:ident) => {
        checked_binop!($add, $t, arith::add::<$t>);
        checked_binop!($sub, $t, arith::sub::<$t>);
        checked_binop!($mul, $t, arith::mul::<$t>);
        checked_binop!($div, $t, arith::div::<$t>);
        checked_binop!($rem, $t, arith::rem::<$t>);
        checked_shift!($shl, $t, arith::shl::<$t>);
        checked_shift!($shr, $t, arith::shr::<$t>);
        wrap_binop!($plus, $t, arith::plus::<$t>);
        wrap_binop!($minus, $t, arith::minus::<$t>);
        wrap_binop!($times, $t, arith::times::<$t>);
    };
}

int_kind_ops!(u8, hs_add_uint8, hs_sub_uint8, hs_mul_uint8, hs_div_uint8, hs_rem_uint8,
    hs_shl_uint8, hs_shr_uint8, hs_plus_uint8, hs_minus_uint8, hs_times_uint8);
int_kind_ops!(i8, hs_add_int8, hs_sub_int8, hs_mul_int8, hs_div_int8, hs_rem_int8,
    hs_shl_int8, hs_shr_int8, hs_plus_int8, hs_minus_int8, hs_times_int8);
int_kind_ops!(i16, hs_add_int16, hs_sub_int16, hs_mul_int16, hs_div_int16, hs_rem_int16,
    hs_shl_int16, hs_shr_int16, hs_plus_int16, hs_minus_int16, hs_times_int16);
int_kind_ops!(i32, hs_add_int32, hs_sub_int32, hs_mul_int32, hs_div_int32, hs_rem_int32,
    hs_shl_int32, hs_shr_int32, hs_plus_int32, hs_minus_int32, hs_times_int32);
int_kind_ops!(i64, hs_add_int64, hs_sub_int64, hs_mul_int64, hs_div_int64, hs_rem_int64,
    hs_shl_int64, hs_shr_int64, hs_plus_int64, hs_minus_int64, hs_times_int64);

checked_unop!(hs_neg_int8, i8, arith::neg::<i8>);
checked_unop!(hs_neg_int16, i16, arith::neg::<i16>);
checked_unop!(hs_neg_int32, i32, arith::neg::<i32>);
checked_unop!(hs_neg_int64, i64, arith::neg::<i64>);

// ---- bounds and retype -----------------------------------------------------

#[no_mangle]
pub extern "C-unwind" fn hs_check_index(i: Word, limit: Word, pos: *const c_char) -> Word {
    with_pos(pos, |p| bounds::check_index(i, limit, p))
}

#[no_mangle]
pub extern "C-unwind" fn hs_check_index_lower(i: Word, pos: *const c_char) -> Word {
    with_pos(pos, |p| bounds::check_index_lower(i, p))
}

#[no_mangle]
pub extern "C-unwind" fn hs_check_index_upper(i: Word, limit: Word, pos: *const c_char) -> Word {
    with_pos(pos, |p| bounds::check_index_upper(i, limit, p))
}

#[no_mangle]
pub extern "C-unwind" fn hs_check_slice(start: Word, count: Word, limit: Word, pos: *const c_char) -> Word {
    with_pos(pos, |p| bounds::check_slice(start, count, limit, p))
}

#[no_mangle]
pub extern "C-unwind" fn hs_check_retype(src_size: Word, dest_size: Word, pos: *const c_char) -> Word {
    with_pos(pos, |p| bounds::check_retype(src_size, dest_size, p))
}

// ---- conversions -----------------------------------------------------------

macro_rules! range_check_fn {
    ($name:ident, $t:ty) => {
        #[no_mangle]
        pub extern "C-unwind" fn $name(lower: $t, upper: $t, n: $t, pos: *const c_char) -> $t {
            with_pos(pos, |p| cast::range_check(lower, upper, n, p))
        }
    };
}

range_check_fn!(hs_range_check_uint8, u8);
range_check_fn!(hs_range_check_int8, i8);
range_check_fn!(hs_range_check_int16, i16);
range_check_fn!(hs_range_check_int32, i32);
range_check_fn!(hs_range_check_int64, i64);

macro_rules! cast_fn {
    ($name:ident, $from:ty, $to:ty, $f:path) => {
        #[no_mangle]
        pub extern "C-unwind" fn $name(v: $from, pos: *const c_char) -> $to {
            with_pos(pos, |p| $f(v, p))
        }
    };
}

cast_fn!(hs_int64_to_real32_round, i64, f32, cast::int64_to_real32_round);
cast_fn!(hs_int64_to_real32_trunc, i64, f32, cast::int64_to_real32_trunc);
cast_fn!(hs_int64_to_real64_round, i64, f64, cast::int64_to_real64_round);
cast_fn!(hs_int64_to_real64_trunc, i64, f64, cast::int64_to_real64_trunc);
cast_fn!(hs_real32_to_int64_round, f32, i64, cast::real32_to_int64_round);
cast_fn!(hs_real32_to_int64_trunc, f32, i64, cast::real32_to_int64_trunc);
cast_fn!(hs_real64_to_int64_round, f64, i64, cast::real64_to_int64_round);
cast_fn!(hs_real64_to_int64_trunc, f64, i64, cast::real64_to_int64_trunc);
cast_fn!(hs_real64_to_real32_round, f64, f32, cast::real64_to_real32_round);
cast_fn!(hs_real64_to_real32_trunc, f64, f32, cast::real64_to_real32_trunc);

// ---- floating-point intrinsics --------------------------------------------

macro_rules! float_pure_unop {
    ($name:ident, $t:ty, $ret:ty, $f:path) => {
        #[no_mangle]
        pub extern "C" fn $name(x: $t) -> $ret {
            $f(x)
        }
    };
}

macro_rules! float_pure_binop {
    ($name:ident, $t:ty, $ret:ty, $f:path) => {
        #[no_mangle]
        pub extern "C" fn $name(x: $t, y: $t) -> $ret {
            $f(x, y)
        }
    };
}

macro_rules! float_checked_unop {
    ($name:ident, $t:ty, $f:path) => {
        #[no_mangle]
        pub extern "C-unwind" fn $name(x: $t, pos: *const c_char) -> $t {
            with_pos(pos, |p| $f(x, p))
        }
    };
}

macro_rules! float_kind_ops {
    ($t:ty, $compare:ident, $abs:ident, $divby2:ident, $mulby2:ident, $scaleb:ident,
     $sqrt:ident, $unpack:ident, $logb:ident, $signflip:ident, $fpint:ident,
     $argreduce:ident, $isnan:ident, $notfinite:ident, $ordered:ident,
     $copysign:ident, $nextafter:ident, $rem:ident) => {
        #[no_mangle]
        pub extern "C" fn $compare(x: $t, y: $t) -> i32 {
            float::compare(x, y).code()
        }

        float_checked_unop!($abs, $t, float::abs::<$t>);
        float_checked_unop!($divby2, $t, float::div_by_2::<$t>);
        float_checked_unop!($mulby2, $t, float::mul_by_2::<$t>);
        float_checked_unop!($sqrt, $t, float::sqrt::<$t>);

        #[no_mangle]
        pub extern "C-unwind" fn $scaleb(x: $t, n: Word, pos: *const c_char) -> $t {
            with_pos(pos, |p| float::scale_b(x, n, p))
        }

        /// # Safety
        /// `mantissa` must be valid for a single write.
        #[no_mangle]
        pub unsafe extern "C" fn $unpack(x: $t, mantissa: *mut $t) -> Word {
            let (e, m) = float::unpack(x);
            *mantissa = m;
            e
        }

        float_pure_unop!($logb, $t, $t, float::logb::<$t>);
        float_pure_unop!($signflip, $t, $t, float::sign_flip::<$t>);
        float_pure_unop!($fpint, $t, $t, float::round_to_int::<$t>);
        float_pure_unop!($isnan, $t, bool, float::is_nan::<$t>);
        float_pure_unop!($notfinite, $t, bool, float::not_finite::<$t>);
        float_pure_binop!($ordered, $t, bool, float::ordered::<$t>);
        float_pure_binop!($copysign, $t, $t, float::copy_sign::<$t>);
        float_pure_binop!($nextafter, $t, $t, float::next_after::<$t>);

        /// # Safety
        /// `quotient_low` and `remainder` must be valid for a single write.
        #[no_mangle]
        pub unsafe extern "C" fn $argreduce(
            x: $t,
            y: $t,
            y_err: $t,
            quotient_low: *mut i32,
            remainder: *mut $t,
        ) -> bool {
            let r = float::argument_reduce(x, y, y_err);
            *quotient_low = r.quotient_low;
            *remainder = r.remainder;
            r.reduced
        }

        #[no_mangle]
        pub extern "C-unwind" fn $rem(a: $t, b: $t, pos: *const c_char) -> $t {
            with_pos(pos, |p| float::rem(a, b, p))
        }
    };
}

float_kind_ops!(f32, hs_compare_real32, hs_abs_real32, hs_divby2_real32, hs_mulby2_real32,
    hs_scaleb_real32, hs_sqrt_real32, hs_unpack_real32, hs_logb_real32, hs_sign_flip_real32,
    hs_round_to_int_real32, hs_argument_reduce_real32, hs_is_nan_real32,
    hs_not_finite_real32, hs_ordered_real32, hs_copy_sign_real32, hs_next_after_real32,
    hs_rem_real32);
float_kind_ops!(f64, hs_compare_real64, hs_abs_real64, hs_divby2_real64, hs_mulby2_real64,
    hs_scaleb_real64, hs_sqrt_real64, hs_unpack_real64, hs_logb_real64, hs_sign_flip_real64,
    hs_round_to_int_real64, hs_argument_reduce_real64, hs_is_nan_real64,
    hs_not_finite_real64, hs_ordered_real64, hs_copy_sign_real64, hs_next_after_real64,
    hs_rem_real64);

// ---- numeric <-> string ----------------------------------------------------

macro_rules! to_string_fn {
    ($name:ident, $t:ty, $f:path) => {
        /// # Safety
        /// `buf` must be valid for `FMT_BUF_LEN` writes; `len` for one write.
        #[no_mangle]
        pub unsafe extern "C" fn $name(len: *mut Word, buf: *mut u8, n: $t) {
            let mut tmp = [0u8; convert::FMT_BUF_LEN];
            let count = $f(&mut tmp, n);
            std::ptr::copy_nonoverlapping(tmp.as_ptr(), buf, count);
            *len = count as Word;
        }
    };
}

macro_rules! from_string_fn {
    ($name:ident, $t:ty, $f:path) => {
        /// # Safety
        /// `s` must be valid for `len` reads; `error` and `out` for one write.
        #[no_mangle]
        pub unsafe extern "C" fn $name(error: *mut bool, out: *mut $t, s: *const u8, len: usize) {
            let bytes = std::slice::from_raw_parts(s, len);
            match std::str::from_utf8(bytes).ok().and_then(|text| $f(text).ok()) {
                Some(v) => {
                    *out = v;
                    *error = false;
                }
                None => *error = true,
            }
        }
    };
}

macro_rules! string_kind_ops {
    ($t:ty, $to_dec:ident, $to_hex:ident, $from_dec:ident, $from_hex:ident) => {
        to_string_fn!($to_dec, $t, convert::format_int::<$t>);
        to_string_fn!($to_hex, $t, convert::format_hex::<$t>);
        from_string_fn!($from_dec, $t, convert::parse_int::<$t>);
        from_string_fn!($from_hex, $t, convert::parse_hex::<$t>);
    };
}

string_kind_ops!(u8, hs_uint8_to_string, hs_uint8_to_hex_string,
    hs_string_to_uint8, hs_hex_string_to_uint8);
string_kind_ops!(i8, hs_int8_to_string, hs_int8_to_hex_string,
    hs_string_to_int8, hs_hex_string_to_int8);
string_kind_ops!(i16, hs_int16_to_string, hs_int16_to_hex_string,
    hs_string_to_int16, hs_hex_string_to_int16);
string_kind_ops!(i32, hs_int32_to_string, hs_int32_to_hex_string,
    hs_string_to_int32, hs_hex_string_to_int32);
string_kind_ops!(i64, hs_int64_to_string, hs_int64_to_hex_string,
    hs_string_to_int64, hs_hex_string_to_int64);

/// # Safety
/// `buf` must be valid for 5 writes; `len` for one write.
#[no_mangle]
pub unsafe extern "C" fn hs_bool_to_string(len: *mut Word, buf: *mut u8, b: bool) {
    let mut tmp = [0u8; convert::FMT_BUF_LEN];
    let count = convert::format_bool(&mut tmp, b);
    std::ptr::copy_nonoverlapping(tmp.as_ptr(), buf, count);
    *len = count as Word;
}

/// # Safety
/// `s` must be valid for `len` reads; `error` and `out` for one write.
#[no_mangle]
pub unsafe extern "C" fn hs_string_to_bool(error: *mut bool, out: *mut bool, s: *const u8, len: usize) {
    let bytes = std::slice::from_raw_parts(s, len);
    match std::str::from_utf8(bytes).ok().and_then(|text| convert::parse_bool(text).ok()) {
        Some(v) => {
            *out = v;
            *error = false;
        }
        None => *error = true,
    }
}

// ---- terminal --------------------------------------------------------------

#[cfg(unix)]
mod terminal {
    use std::sync::Mutex;

    use hardstop_corelib::term::RawModeGuard;
    use once_cell::sync::Lazy;

    static GUARD: Lazy<Mutex<Option<RawModeGuard>>> = Lazy::new(|| Mutex::new(None));

    /// C-side spelling of the scoped guard; configure/restore must be paired
    /// by the single owner of interactive input.
    #[no_mangle]
    pub extern "C" fn hs_configure_terminal(uses_stdin: bool) {
        let mut slot = GUARD.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(RawModeGuard::acquire(uses_stdin));
        }
    }

    #[no_mangle]
    pub extern "C" fn hs_restore_terminal() {
        let mut slot = GUARD.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardstop_corelib::diag::panic_on_trap;
    use std::ptr;

    #[test]
    fn int_ops_roundtrip_through_the_abi() {
        assert_eq!(hs_add_int32(40, 2, ptr::null()), 42);
        assert_eq!(hs_rem_int64(-7, 3, ptr::null()), -1);
        assert_eq!(hs_plus_uint8(255, 1), 0);
        assert_eq!(hs_shr_int32(-1, 32, ptr::null()), 0);
    }

    #[test]
    #[should_panic(expected = "<unknown>: integer overflow")]
    fn null_pos_degrades_to_unknown() {
        panic_on_trap();
        hs_add_int8(127, 1, ptr::null());
    }

    #[test]
    #[should_panic(expected = "abi.rs:9:1: divide by zero")]
    fn pos_token_is_reported() {
        panic_on_trap();
        let pos = std::ffi::CString::new("abi.rs:9:1").unwrap();
        hs_div_int32(1, 0, pos.as_ptr());
    }

    #[test]
    fn float_compare_codes_match_wire_encoding() {
        assert_eq!(hs_compare_real64(1.0, 2.0), -1);
        assert_eq!(hs_compare_real64(2.0, 1.0), 1);
        assert_eq!(hs_compare_real64(1.0, 1.0), 0);
        assert_eq!(hs_compare_real64(f64::NAN, 1.0), 2);
    }

    #[test]
    fn unpack_via_out_param() {
        let mut mantissa = 0.0f64;
        let e = unsafe { hs_unpack_real64(6.0, &mut mantissa) };
        assert_eq!(e, 2);
        assert_eq!(mantissa, 1.5);
    }

    #[test]
    fn string_conversion_error_flag() {
        let mut err_flag = false;
        let mut out = 0i8;
        let s = b"200";
        unsafe { hs_string_to_int8(&mut err_flag, &mut out, s.as_ptr(), s.len()) };
        assert!(err_flag);

        let s = b"-128";
        unsafe { hs_string_to_int8(&mut err_flag, &mut out, s.as_ptr(), s.len()) };
        assert!(!err_flag);
        assert_eq!(out, -128);
    }

    #[test]
    fn format_into_caller_buffer() {
        let mut buf = [0u8; convert::FMT_BUF_LEN];
        let mut len: Word = 0;
        unsafe { hs_int64_to_string(&mut len, buf.as_mut_ptr(), i64::MIN) };
        assert_eq!(&buf[..len as usize], b"-9223372036854775808");

        unsafe { hs_bool_to_string(&mut len, buf.as_mut_ptr(), false) };
        assert_eq!(&buf[..len as usize], b"FALSE");
    }

    #[test]
    fn status_json_is_freeable() {
        let raw = hs_status_json();
        assert!(!raw.is_null());
        let text = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_owned();
        assert!(text.contains("word_bits"));
        unsafe { hs_string_free(raw) };
    }
}
