// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Named writable stream handles and the table that holds them.
//!
//! The table models the process-wide "current stdout/stderr" attributes as
//! an explicit value, so captures can patch it and tests can inject their
//! own. Production code binds to [`StreamTable::global`].

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::error::CaptureError;

/// Slot name for the current output stream.
pub const STDOUT: &str = "stdout";

/// Slot name for the current error stream.
pub const STDERR: &str = "stderr";

/// A cloneable writable handle with identity.
///
/// Clones share the underlying writer; [`StreamHandle::same_handle`] tells
/// whether two handles are the same writer.
#[derive(Clone)]
pub struct StreamHandle {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl StreamHandle {
    /// Wrap a writer in a handle.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Handle over an open file.
    pub fn from_file(file: File) -> Self {
        Self::new(file)
    }

    /// Write `text` and flush.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }

    /// Whether `self` and `other` share the same underlying writer.
    pub fn same_handle(&self, other: &StreamHandle) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }
}

impl Write for StreamHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Named stream slots. Clones share the same slots.
#[derive(Clone, Default, Debug)]
pub struct StreamTable {
    slots: Arc<Mutex<HashMap<String, StreamHandle>>>,
}

impl StreamTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with [`STDOUT`] and [`STDERR`] bound to the real process
    /// streams.
    pub fn with_process_streams() -> Self {
        let table = Self::new();
        table.insert(STDOUT, StreamHandle::new(io::stdout()));
        table.insert(STDERR, StreamHandle::new(io::stderr()));
        table
    }

    /// The process-global table, initialized on first use with the real
    /// process streams.
    pub fn global() -> &'static StreamTable {
        static GLOBAL: OnceLock<StreamTable> = OnceLock::new();
        GLOBAL.get_or_init(StreamTable::with_process_streams)
    }

    /// Create or overwrite a slot.
    pub fn insert(&self, name: &str, handle: StreamHandle) {
        self.slots.lock().insert(name.to_string(), handle);
    }

    /// The handle currently in a slot.
    pub fn get(&self, name: &str) -> Option<StreamHandle> {
        self.slots.lock().get(name).cloned()
    }

    /// Replace an existing slot, returning the previous handle.
    pub fn replace(&self, name: &str, handle: StreamHandle) -> Result<StreamHandle, CaptureError> {
        let mut slots = self.slots.lock();
        let slot = slots
            .get_mut(name)
            .ok_or_else(|| CaptureError::UnknownStream(name.to_string()))?;
        Ok(std::mem::replace(slot, handle))
    }

    /// Write `text` through the named slot.
    pub fn write(&self, name: &str, text: &str) -> Result<(), CaptureError> {
        let handle = self
            .get(name)
            .ok_or_else(|| CaptureError::UnknownStream(name.to_string()))?;
        handle.write_str(text)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "streams_tests.rs"]
mod tests;
