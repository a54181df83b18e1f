// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Non-blocking stdin poll — one read attempt per animation tick.
//
// The render loop is a single cooperative thread: it paints a frame, sleeps
// for the frame period, and in between asks stdin "anything for me?". The
// answer must come back immediately. A `poll()` with a zero timeout tells us
// whether bytes are waiting; only then do we `read()`, so the read itself
// never blocks regardless of the termios VMIN/VTIME settings.
//
// Absence of data is the common case and is not an error: it yields
// [`Poll::Idle`]. End of file (stdin closed) is reported separately so the
// loop can stop waiting for a command that can never arrive.

use std::io;

/// Upper bound on bytes taken per tick.
///
/// A keypress is 1-6 bytes; a paste can be kilobytes. Anything beyond this
/// stays in the kernel buffer and is picked up on the next tick.
const READ_BUF_SIZE: usize = 4096;

/// Result of one poll attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<'a> {
    /// No input waiting.
    Idle,
    /// Bytes read this tick (never empty).
    Bytes(&'a [u8]),
    /// Stdin reached end of file.
    Closed,
}

/// Single-attempt, non-blocking stdin reader.
///
/// ```no_run
/// use artloop_term::reader::{Poll, StdinPoller};
///
/// let mut poller = StdinPoller::new();
/// match poller.poll()? {
///     Poll::Bytes(bytes) => println!("got {} bytes", bytes.len()),
///     Poll::Idle => {}
///     Poll::Closed => println!("stdin closed"),
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct StdinPoller {
    buf: Box<[u8; READ_BUF_SIZE]>,
}

impl StdinPoller {
    /// Create a poller with its read buffer allocated up front.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Box::new([0u8; READ_BUF_SIZE]),
        }
    }

    /// Try once to read from stdin without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if `poll()` or `read()` fails for a reason other
    /// than an interrupted system call.
    #[cfg(unix)]
    pub fn poll(&mut self) -> io::Result<Poll<'_>> {
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            let rc = libc::poll(&raw mut pfd, 1, 0);
            if rc > 0 && pfd.revents & (libc::POLLIN | libc::POLLHUP) == 0 {
                0
            } else {
                rc
            }
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(Poll::Idle)
            } else {
                Err(err)
            };
        }
        if ready == 0 {
            return Ok(Poll::Idle);
        }

        let n = unsafe { libc::read(fd, self.buf.as_mut_ptr().cast(), self.buf.len()) };

        if n < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(Poll::Idle),
                _ => Err(err),
            };
        }
        if n == 0 {
            return Ok(Poll::Closed);
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 guaranteed above.
        Ok(Poll::Bytes(&self.buf[..n as usize]))
    }

    /// Non-unix fallback: there is no portable zero-timeout read on stdin,
    /// so the prompt never receives input and the animation runs until
    /// the process is interrupted.
    ///
    /// # Errors
    ///
    /// Never fails.
    #[cfg(not(unix))]
    pub fn poll(&mut self) -> io::Result<Poll<'_>> {
        Ok(Poll::Idle)
    }
}

impl Default for StdinPoller {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
