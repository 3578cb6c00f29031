// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for capture setup, restore, and write-through.

use std::fmt;
use std::os::fd::RawFd;

use thiserror::Error;

/// A standard stream channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Out,
    Err,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Out => f.write_str("stdout"),
            Channel::Err => f.write_str("stderr"),
        }
    }
}

/// Errors that can occur while capturing or restoring streams
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Duplicating or redirecting the descriptor failed. The descriptor is
    /// untouched and nothing was leaked.
    #[error("Failed to redirect fd {fd}: {source}")]
    Setup {
        fd: RawFd,
        #[source]
        source: nix::Error,
    },

    /// Restoring the descriptor failed. The process's descriptor state is no
    /// longer reliable; this is never swallowed.
    #[error("Failed to restore fd {fd}: {source}")]
    Restore {
        fd: RawFd,
        #[source]
        source: nix::Error,
    },

    /// Write-through was requested on a channel that was never started.
    #[error("{0} not captured")]
    ChannelUnavailable(Channel),

    /// The stream table has no slot with the given name.
    #[error("No stream named '{0}'")]
    UnknownStream(String),

    /// Operation on a capture that already restored its descriptor.
    #[error("Capture already finished")]
    Finished,

    /// Backing-store I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
