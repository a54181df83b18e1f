// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal resize notification.
//
// SIGWINCH arrives asynchronously, in signal context, at any point of the
// render loop. The handler does exactly one thing: an atomic store into a
// process-wide flag. No allocation, no locks, no syscalls. The render loop
// takes (reads and clears) the flag once per tick and does all the real
// work (re-querying the size, invalidating the frame cache) on its own
// thread.
//
// The flag is wrapped in `ResizeSignal`, a zero-sized handle, so callers
// never touch the static directly and the install/poll/clear protocol is
// spelled out in one place.

use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the SIGWINCH handler, cleared by [`ResizeSignal::take`].
static RESIZED: AtomicBool = AtomicBool::new(false);

/// Guards handler installation — once per process.
static INSTALL: Once = Once::new();

/// Handle to the process-wide resize flag.
///
/// ```no_run
/// use artloop_term::resize::ResizeSignal;
///
/// let resize = ResizeSignal::install();
/// loop {
///     if resize.take() {
///         // re-query the terminal size, invalidate caches...
///     }
///     # break;
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResizeSignal {
    _private: (),
}

impl ResizeSignal {
    /// Install the SIGWINCH handler (idempotent) and return a handle.
    ///
    /// On non-unix platforms no handler is installed; the flag can still
    /// be raised manually with [`notify`](Self::notify).
    #[must_use]
    pub fn install() -> Self {
        INSTALL.call_once(install_handler);
        Self { _private: () }
    }

    /// Whether a resize is pending, without clearing it.
    #[inline]
    #[must_use]
    pub fn poll(self) -> bool {
        RESIZED.load(Ordering::Acquire)
    }

    /// Whether a resize is pending; clears the flag.
    #[inline]
    #[must_use]
    pub fn take(self) -> bool {
        RESIZED.swap(false, Ordering::AcqRel)
    }

    /// Drop any pending resize.
    #[inline]
    pub fn clear(self) {
        RESIZED.store(false, Ordering::Release);
    }

    /// Raise the flag as if SIGWINCH had arrived.
    #[inline]
    pub fn notify(self) {
        RESIZED.store(true, Ordering::Release);
    }
}

#[cfg(unix)]
fn install_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        if libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut()) != 0 {
            tracing::warn!(
                error = %std::io::Error::last_os_error(),
                "failed to install SIGWINCH handler; resizes will not be noticed"
            );
        }
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZED.store(true, Ordering::Release);
}

#[cfg(not(unix))]
fn install_handler() {}

// ─── Tests ───────────────────────────────────────────────────────────────────
