//! Scoped raw-mode control for interactive programs.
//!
//! The original runtime flipped process-wide terminal state with free
//! functions; here the saved attributes live in a guard that restores them
//! on every exit path, including unwinding. Failure to apply or restore is
//! fatal: the program cannot continue with unknown terminal state. Only one
//! logical owner of interactive input may hold a guard at a time.

use std::io;
use std::mem::MaybeUninit;
use std::process;

/// Raw-mode handle for stdin. Dropping it restores the saved attributes.
#[derive(Debug)]
pub struct RawModeGuard {
    saved: Option<libc::termios>,
}

fn fatal(what: &str) -> ! {
    eprintln!("hardstop: {what}: {}", io::Error::last_os_error());
    process::exit(1);
}

impl RawModeGuard {
    /// Put stdin into raw mode when the program reads from it and it is a
    /// TTY; otherwise the guard is inert. Disables canonical input and echo,
    /// and satisfies reads as soon as one character is available.
    pub fn acquire(uses_stdin: bool) -> Self {
        let fd = libc::STDIN_FILENO;
        if !uses_stdin || unsafe { libc::isatty(fd) } == 0 {
            return Self { saved: None };
        }

        let mut term = MaybeUninit::<libc::termios>::uninit();
        if unsafe { libc::tcgetattr(fd, term.as_mut_ptr()) } != 0 {
            fatal("tcgetattr failed");
        }
        let saved = unsafe { term.assume_init() };

        let mut raw = saved;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            fatal("tcsetattr failed");
        }

        Self { saved: Some(saved) }
    }

    /// Whether the guard actually changed terminal state.
    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &saved) } != 0 {
                fatal("tcsetattr failed on restore");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inert_without_stdin_use() {
        let guard = RawModeGuard::acquire(false);
        assert!(!guard.is_active());
    }
}
