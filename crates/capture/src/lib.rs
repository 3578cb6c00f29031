// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! OS-level stdout/stderr capture and restore for test harnesses.
//!
//! Redirects the standard descriptors to anonymous backing files, keeps
//! higher-level stream handles consistent with the redirection, and restores
//! everything on every exit path. Capture is buffer-and-replay: bytes are
//! collected while a session is active and returned as text when it
//! finishes. Output of child processes is not captured.
//!
//! ```no_run
//! # fn main() -> Result<(), fdcap::CaptureError> {
//! let (answer, output) = fdcap::call_captured(|| {
//!     let _ = fdcap::StreamTable::global().write(fdcap::STDOUT, "hello\n");
//!     2 + 2
//! })?;
//! assert_eq!(answer, 4);
//! assert_eq!(output.out, "hello\n");
//! # Ok(())
//! # }
//! ```

mod error;
mod fd;
mod invoke;
mod session;
mod streams;

pub use error::{CaptureError, Channel};
pub use fd::FdCapture;
pub use invoke::call_captured;
pub use session::{CaptureOptions, CapturedOutput, StdioCapture};
pub use streams::{StreamHandle, StreamTable, STDERR, STDOUT};

#[cfg(test)]
pub(crate) mod testsupport {
    use parking_lot::Mutex;
    use std::os::fd::{BorrowedFd, RawFd};

    /// Serializes tests that redirect the process's real stdout/stderr.
    pub(crate) static STDIO_LOCK: Mutex<()> = Mutex::new(());

    /// Write straight to a raw descriptor, bypassing std's buffering.
    pub(crate) fn write_fd(fd: RawFd, text: &str) {
        // SAFETY: tests only pass descriptors that stay open for the whole call.
        let fd = unsafe { BorrowedFd::borrow_raw(fd) };
        nix::unistd::write(fd, text.as_bytes()).unwrap();
    }
}
