//! Index/slice/retype validation against the documented windows.

use std::panic;

use hardstop_corelib::bounds;
use hardstop_corelib::diag::{panic_on_trap, Pos};

const P: Pos<'static> = Pos("bounds_checks:test");

fn traps(f: impl FnOnce() + panic::UnwindSafe) -> bool {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let trapped = panic::catch_unwind(f).is_err();
    panic::set_hook(hook);
    trapped
}

#[test]
fn index_window_is_half_open() {
    panic_on_trap();
    assert_eq!(bounds::check_index(0, 5, P), 0);
    assert_eq!(bounds::check_index(4, 5, P), 4);
    assert!(traps(|| {
        bounds::check_index(5, 5, P);
    }));
    assert!(traps(|| {
        bounds::check_index(-1, 5, P);
    }));
    assert!(traps(|| {
        bounds::check_index(0, 0, P);
    }));
}

#[test]
fn one_sided_checks() {
    panic_on_trap();
    assert_eq!(bounds::check_index_lower(0, P), 0);
    assert_eq!(bounds::check_index_upper(4, 5, P), 4);
    // The one-sided variants trust the compiler for the other bound.
    assert_eq!(bounds::check_index_upper(-3, 5, P), -3);
    assert!(traps(|| {
        bounds::check_index_lower(-1, P);
    }));
    assert!(traps(|| {
        bounds::check_index_upper(5, 5, P);
    }));
}

#[test]
fn slice_validation_matrix() {
    panic_on_trap();
    // (start, count, limit, valid)
    let cases: [(i64, i64, i64, bool); 10] = [
        (0, 0, 5, true),
        (5, 0, 5, true),
        (-7, 0, 5, true),
        (0, 5, 5, true),
        (2, 3, 5, true),
        (3, 3, 5, false),
        (-1, 1, 5, false),
        (5, 1, 5, false),
        (0, -1, 5, false),
        (0, 6, 5, false),
    ];
    for (start, count, limit, valid) in cases {
        let start = start as hardstop_corelib::Word;
        let count = count as hardstop_corelib::Word;
        let limit = limit as hardstop_corelib::Word;
        if valid {
            assert_eq!(bounds::check_slice(start, count, limit, P), start);
        } else {
            assert!(
                traps(|| {
                    bounds::check_slice(start, count, limit, P);
                }),
                "slice [{start}; {count}) limit {limit} should trap"
            );
        }
    }
}

#[test]
fn retype_element_counts() {
    panic_on_trap();
    assert_eq!(bounds::check_retype(12, 4, P), 3);
    assert_eq!(bounds::check_retype(12, 12, P), 1);
    assert_eq!(bounds::check_retype(0, 4, P), 0);
    assert!(traps(|| {
        bounds::check_retype(10, 4, P);
    }));
    assert!(traps(|| {
        bounds::check_retype(10, 0, P);
    }));
}
