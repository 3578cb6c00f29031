// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinated capture of stdout and stderr.

use std::io::Read;

use nix::libc::{STDERR_FILENO, STDOUT_FILENO};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Channel};
use crate::fd::FdCapture;
use crate::streams::{StreamTable, STDERR, STDOUT};

/// Channel selection and patching policy for a capture session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Capture fd 1.
    pub out: bool,
    /// Capture fd 2.
    pub err: bool,
    /// Also patch the stream table's stdout/stderr slots.
    pub patch_streams: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            out: true,
            err: true,
            patch_streams: true,
        }
    }
}

/// Text collected by a finished session. Absent channels are empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedOutput {
    pub out: String,
    pub err: String,
}

/// One capture lifecycle over stdout and/or stderr.
///
/// [`StdioCapture::finish`] is the single point of restoration for both
/// channels. Dropping an unfinished session restores best-effort.
pub struct StdioCapture {
    out: Option<FdCapture>,
    err: Option<FdCapture>,
}

impl StdioCapture {
    /// Capture both channels with stream patching, against the global
    /// stream table.
    pub fn start() -> Result<Self, CaptureError> {
        Self::with_options(&CaptureOptions::default(), StreamTable::global())
    }

    /// Capture the channels selected in `options`, patching slots of
    /// `streams` when requested.
    ///
    /// A mid-setup failure unwinds any channel already begun before the
    /// error is returned.
    pub fn with_options(
        options: &CaptureOptions,
        streams: &StreamTable,
    ) -> Result<Self, CaptureError> {
        let mut session = Self {
            out: None,
            err: None,
        };
        if options.out {
            let mut capture = FdCapture::begin(STDOUT_FILENO, None)?;
            if options.patch_streams {
                capture.patch_stream(streams, STDOUT)?;
            }
            session.out = Some(capture);
        }
        if options.err {
            let mut capture = FdCapture::begin(STDERR_FILENO, None)?;
            if options.patch_streams {
                capture.patch_stream(streams, STDERR)?;
            }
            session.err = Some(capture);
        }
        Ok(session)
    }

    /// Restore both channels and return the collected text.
    pub fn finish(mut self) -> Result<CapturedOutput, CaptureError> {
        let mut output = CapturedOutput::default();
        if let Some(capture) = self.out.take() {
            capture.end()?.read_to_string(&mut output.out)?;
        }
        if let Some(capture) = self.err.take() {
            capture.end()?.read_to_string(&mut output.err)?;
        }
        Ok(output)
    }

    /// Write to the original stdout, bypassing capture.
    pub fn write_original_out(&self, text: &str) -> Result<(), CaptureError> {
        match self.out {
            Some(ref capture) => capture.write_original(text),
            None => Err(CaptureError::ChannelUnavailable(Channel::Out)),
        }
    }

    /// Write to the original stderr, bypassing capture.
    pub fn write_original_err(&self, text: &str) -> Result<(), CaptureError> {
        match self.err {
            Some(ref capture) => capture.write_original(text),
            None => Err(CaptureError::ChannelUnavailable(Channel::Err)),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
