// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture of a single OS-level file descriptor.
//!
//! Redirects a descriptor into an anonymous backing file, optionally patches
//! named handles in a [`StreamTable`] to the same backing file, and restores
//! everything on [`FdCapture::end`]. Dropping an un-ended capture restores
//! the descriptor best-effort.

use std::fs::File;
use std::io::{Seek, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use nix::unistd;

use crate::error::CaptureError;
use crate::streams::{StreamHandle, StreamTable};

/// A patched stream-table slot and the handle it held before patching.
#[derive(Debug)]
struct PatchRecord {
    streams: StreamTable,
    name: String,
    prev: StreamHandle,
}

/// Capture of everything written to one file descriptor.
///
/// Construction redirects the descriptor; [`FdCapture::end`] restores it and
/// returns the backing file, after which the capture cannot be reused.
///
/// Beginning a second capture on a descriptor already under capture is a
/// caller error: the second capture saves the first one's redirection as its
/// "original" target and both restores end up wrong. Captures of the same
/// descriptor must be serialized.
#[derive(Debug)]
pub struct FdCapture {
    targetfd: RawFd,
    tmpfile: Option<File>,
    saved: Option<OwnedFd>,
    patches: Vec<PatchRecord>,
}

impl FdCapture {
    /// Redirect `targetfd` into a backing file.
    ///
    /// Uses `tmpfile` as the backing store when given, otherwise creates an
    /// anonymous unlinked temp file. On error the descriptor is untouched
    /// and nothing is leaked.
    pub fn begin(targetfd: RawFd, tmpfile: Option<File>) -> Result<Self, CaptureError> {
        let tmpfile = match tmpfile {
            Some(file) => file,
            None => tempfile::tempfile()?,
        };
        let raw = unistd::dup(targetfd).map_err(|source| CaptureError::Setup {
            fd: targetfd,
            source,
        })?;
        // SAFETY: dup returned a fresh descriptor owned by nobody else.
        let saved = unsafe { OwnedFd::from_raw_fd(raw) };
        unistd::dup2(tmpfile.as_raw_fd(), targetfd).map_err(|source| CaptureError::Setup {
            fd: targetfd,
            source,
        })?;
        Ok(Self {
            targetfd,
            tmpfile: Some(tmpfile),
            saved: Some(saved),
            patches: Vec::new(),
        })
    }

    /// The descriptor under capture.
    pub fn target_fd(&self) -> RawFd {
        self.targetfd
    }

    /// Patch the named slot of `streams` to write into the backing file.
    ///
    /// The previous handle is recorded and put back by
    /// [`Self::unpatch_all`] or [`Self::end`], last patched first. The
    /// patched handle shares the backing file's offset, so handle-level and
    /// descriptor-level writes stay in write order.
    pub fn patch_stream(&mut self, streams: &StreamTable, name: &str) -> Result<(), CaptureError> {
        let tmpfile = self.tmpfile.as_ref().ok_or(CaptureError::Finished)?;
        let handle = StreamHandle::from_file(tmpfile.try_clone()?);
        let prev = streams.replace(name, handle)?;
        self.patches.push(PatchRecord {
            streams: streams.clone(),
            name: name.to_string(),
            prev,
        });
        Ok(())
    }

    /// Restore every patched slot, most recent first. No-op when nothing is
    /// patched.
    pub fn unpatch_all(&mut self) {
        while let Some(record) = self.patches.pop() {
            record.streams.insert(&record.name, record.prev);
        }
    }

    /// Write `text` to the original (pre-capture) destination, bypassing the
    /// backing file.
    pub fn write_original(&self, text: &str) -> Result<(), CaptureError> {
        let saved = self.saved.as_ref().ok_or(CaptureError::Finished)?;
        let raw = unistd::dup(saved.as_raw_fd()).map_err(std::io::Error::from)?;
        // SAFETY: dup returned a fresh descriptor; the transient File closes
        // it on drop.
        let mut original = File::from(unsafe { OwnedFd::from_raw_fd(raw) });
        original.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Restore the descriptor, unpatch all slots, and return the backing
    /// file rewound to the start.
    ///
    /// The returned file holds exactly the bytes written to the descriptor
    /// and to patched handles between [`Self::begin`] and here, in write
    /// order. A restore failure propagates as [`CaptureError::Restore`];
    /// the process's descriptor state is unreliable after that.
    pub fn end(mut self) -> Result<File, CaptureError> {
        let saved = self.saved.take().ok_or(CaptureError::Finished)?;
        unistd::dup2(saved.as_raw_fd(), self.targetfd).map_err(|source| {
            CaptureError::Restore {
                fd: self.targetfd,
                source,
            }
        })?;
        self.unpatch_all();
        drop(saved);
        let mut tmpfile = self.tmpfile.take().ok_or(CaptureError::Finished)?;
        tmpfile.rewind()?;
        Ok(tmpfile)
    }
}

impl Drop for FdCapture {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            let _ = unistd::dup2(saved.as_raw_fd(), self.targetfd);
        }
        self.unpatch_all();
    }
}

#[cfg(test)]
#[path = "fd_tests.rs"]
mod tests;
