// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! End-to-end capture tests against the real process streams.

use std::os::fd::{BorrowedFd, RawFd};

use parking_lot::Mutex;

use fdcap::{call_captured, CaptureError, CaptureOptions, StdioCapture, StreamTable};

/// Tests in this file redirect the process's fds 1 and 2; run one at a time.
static STDIO_LOCK: Mutex<()> = Mutex::new(());

fn write_fd(fd: RawFd, text: &str) {
    // SAFETY: 1 and 2 stay open for the life of the process.
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };
    nix::unistd::write(fd, text.as_bytes()).unwrap();
}

#[test]
fn capture_scenario_out_and_err() {
    let _guard = STDIO_LOCK.lock();
    let session = StdioCapture::start().unwrap();

    write_fd(1, "hello");
    write_fd(2, "oops");

    let output = session.finish().unwrap();
    assert!(output.out.contains("hello"));
    assert_eq!(output.err, "oops");
}

#[test]
fn global_stream_table_writes_are_captured() {
    let _guard = STDIO_LOCK.lock();
    let (_, output) = call_captured(|| {
        StreamTable::global()
            .write(fdcap::STDOUT, "through the table")
            .unwrap();
    })
    .unwrap();

    assert!(output.out.contains("through the table"));
}

#[test]
fn write_through_is_absent_from_captured_text() {
    let _guard = STDIO_LOCK.lock();
    let session = StdioCapture::start().unwrap();

    write_fd(2, "captured part");
    session.write_original_err("progress: still running\n").unwrap();

    let output = session.finish().unwrap();
    assert_eq!(output.err, "captured part");
}

#[test]
fn absent_channel_errors_and_session_still_finishes() {
    let _guard = STDIO_LOCK.lock();
    let options = CaptureOptions {
        out: true,
        err: false,
        patch_streams: true,
    };
    let session = StdioCapture::with_options(&options, StreamTable::global()).unwrap();

    let err = session.write_original_err("x").unwrap_err();
    assert!(matches!(err, CaptureError::ChannelUnavailable(_)));

    let output = session.finish().unwrap();
    assert_eq!(output.err, "");
}

#[test]
fn capture_cycles_repeat_cleanly() {
    let _guard = STDIO_LOCK.lock();
    for round in 0..3 {
        let session = StdioCapture::start().unwrap();
        write_fd(1, &format!("round {round}"));
        let output = session.finish().unwrap();
        assert!(output.out.contains(&format!("round {round}")));
    }
}
