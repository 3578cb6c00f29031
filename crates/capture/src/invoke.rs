// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture wrapped around a single call.

use std::panic::{self, UnwindSafe};

use crate::error::CaptureError;
use crate::session::{CapturedOutput, StdioCapture};

/// Run `func` with both standard streams captured.
///
/// Restoration runs exactly once whether `func` returns or panics. A panic
/// is resumed unchanged after restoration; the text captured up to the
/// panic is discarded.
pub fn call_captured<F, R>(func: F) -> Result<(R, CapturedOutput), CaptureError>
where
    F: FnOnce() -> R + UnwindSafe,
{
    let session = StdioCapture::start()?;
    let result = panic::catch_unwind(func);
    let finished = session.finish();
    match result {
        Ok(value) => Ok((value, finished?)),
        Err(payload) => panic::resume_unwind(payload),
    }
}

#[cfg(test)]
#[path = "invoke_tests.rs"]
mod tests;
