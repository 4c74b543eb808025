//! Fatal-diagnostic sink: every runtime check funnels its failure here.
//!
//! Traps are programming-bug-level failures the source language's type system
//! was supposed to rule out; there is no recovery path. The default sink
//! prints one line to stderr and aborts. Hosts embedding the runtime (and our
//! own tests) may install a different sink once, before any generated code
//! runs.

use std::fmt;
use std::process;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use thiserror::Error;

/// Classification carried by every trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrapKind {
    #[error("integer overflow")]
    Overflow,
    #[error("divide by zero")]
    DivideByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("index out of range")]
    IndexOutOfRange,
    #[error("size mismatch")]
    SizeMismatch,
    #[error("invalid operand")]
    InvalidOperand,
}

/// Source-position token emitted by the compiler at the call site,
/// e.g. `"main.src:14:7"`. Displayed verbatim in trap output.
#[derive(Debug, Clone, Copy)]
pub struct Pos<'a>(pub &'a str);

impl fmt::Display for Pos<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Position used when the caller supplied none (null or invalid token).
pub const UNKNOWN_POS: Pos<'static> = Pos("<unknown>");

/// The one external collaborator of the runtime checks. Must not return.
pub trait TrapSink: Send + Sync {
    fn trap(&self, pos: Pos<'_>, kind: TrapKind, msg: &str) -> !;
}

/// Default sink: one structured stderr line, then abort.
struct AbortSink;

impl TrapSink for AbortSink {
    fn trap(&self, pos: Pos<'_>, kind: TrapKind, msg: &str) -> ! {
        eprintln!("hardstop: {pos}: {kind}: {msg}");
        process::abort();
    }
}

/// Sink that panics with the formatted diagnostic instead of aborting.
/// Lets tests observe trap behavior with `#[should_panic]`.
pub struct PanicSink;

impl TrapSink for PanicSink {
    fn trap(&self, pos: Pos<'_>, kind: TrapKind, msg: &str) -> ! {
        panic!("{pos}: {kind}: {msg}");
    }
}

static SINK: Lazy<RwLock<&'static (dyn TrapSink)>> =
    Lazy::new(|| RwLock::new(&AbortSink));

/// Replace the process-wide sink. Intended for host embedding and tests;
/// call before any generated code runs.
pub fn install_sink(sink: &'static dyn TrapSink) {
    let mut guard = SINK.write().unwrap_or_else(|e| e.into_inner());
    *guard = sink;
}

/// Route traps into panics for the current process. Idempotent.
pub fn panic_on_trap() {
    install_sink(&PanicSink);
}

/// The single trap funnel. Formats the message and hands it to the sink.
pub fn trap(pos: Pos<'_>, kind: TrapKind, args: fmt::Arguments<'_>) -> ! {
    let msg = args.to_string();
    let sink: &'static dyn TrapSink = *SINK.read().unwrap_or_else(|e| e.into_inner());
    sink.trap(pos, kind, &msg)
}

/// Shorthand used by every runtime check.
#[macro_export]
macro_rules! trap {
    ($pos:expr, $kind:expr, $($arg:tt)*) => {
        $crate::diag::trap($pos, $kind, ::core::format_args!($($arg)*))
    };
}
