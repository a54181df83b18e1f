// SPDX-License-Identifier: MIT
//
// Terminal ownership for the lifetime of one animation.
//
// `Terminal::enter` puts stdin in raw mode, switches to the alternate
// screen and hides the cursor; `leave` undoes all of it. Restoration is
// guaranteed on three paths: `leave()` (the normal path, which runs before
// a submitted command reaches the shell), `Drop` (early returns and `?`),
// and a panic hook.
//
// The panic hook cannot reach the `Terminal` value, so the saved termios
// is also parked in a process-wide slot. The hook writes the pre-built
// `RESTORE` bytes straight to fd 1 instead of going through `io::stdout()`,
// whose lock may be held by the frame write that panicked.
#![allow(unsafe_code)]

use std::io::{self, Write};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use crate::ansi;

/// Size assumed when the output is not a terminal or the size query fails.
pub const FALLBACK_SIZE: Size = Size { cols: 120, rows: 40 };

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

/// Ask the kernel for the size of the terminal on stdout (`TIOCGWINSZ`).
///
/// `None` when stdout is not a terminal or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } != 0 {
        return None;
    }
    (ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// The current terminal size, or [`FALLBACK_SIZE`].
#[must_use]
pub fn size_or_fallback() -> Size {
    get_size().unwrap_or(FALLBACK_SIZE)
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// Termios saved by the live [`RawMode`], for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Stdin in raw mode; the original settings come back on [`restore`](Self::restore).
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `None` when stdin is not a terminal.
    fn enable() -> io::Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }
        let fd = libc::STDIN_FILENO;
        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut saved) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut settings = saved;
        unsafe { libc::cfmakeraw(&raw mut settings) };
        // Reads only follow a successful poll(), so VMIN=1 never stalls a tick.
        settings.c_cc[libc::VMIN] = 1;
        settings.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const settings) } != 0 {
            return Err(io::Error::last_os_error());
        }

        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }
        Ok(Some(Self { saved }))
    }

    fn restore(&self) -> io::Result<()> {
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.saved) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// Stand-in on platforms without termios: nothing to switch.
#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    const fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps)]
    const fn restore(&self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Restore sequence ───────────────────────────────────────────────────────

/// Everything `enter()` changed on screen, undone: sync off, SGR reset,
/// cursor on, and the alternate screen left last so the shell's own
/// content reappears clean.
const RESTORE: &[u8] = b"\x1b[?2026l\x1b[0m\x1b[?25h\x1b[?1049l";

/// Write [`RESTORE`] through the escape writers.
fn write_restore(w: &mut impl Write) -> io::Result<()> {
    ansi::end_sync(w)?;
    ansi::reset(w)?;
    ansi::cursor_show(w)?;
    ansi::exit_alt_screen(w)
}

static PANIC_HOOK: Once = Once::new();

/// Chain a hook that restores the terminal ahead of the panic message.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_from_panic();
            previous(info);
        }));
    });
}

#[cfg(unix)]
fn restore_from_panic() {
    unsafe {
        let _ = libc::write(libc::STDOUT_FILENO, RESTORE.as_ptr().cast::<libc::c_void>(), RESTORE.len());
    }
    if let Ok(slot) = SAVED_TERMIOS.lock() {
        if let Some(saved) = slot.as_ref() {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, saved);
            }
        }
    }
}

#[cfg(not(unix))]
fn restore_from_panic() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(RESTORE);
    let _ = stdout.flush();
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The terminal, owned for the duration of the animation.
///
/// ```no_run
/// use artloop_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... paint frames, poll the prompt ...
/// term.leave()?; // dropping works too
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    size: Size,
    raw: Option<RawMode>,
    active: bool,
}

impl Terminal {
    /// A handle with the current size. Nothing changes until [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: size_or_fallback(),
            raw: None,
            active: false,
        }
    }

    /// Last known size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again; a failed query keeps the last known one.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode, alternate screen, hidden cursor, blank screen. Idempotent.
    ///
    /// # Errors
    ///
    /// Fails if termios can't be changed or stdout can't be written.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;
        self.active = true;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        out.flush()?;

        tracing::debug!(cols = self.size.cols, rows = self.size.rows, raw = self.raw.is_some(), "terminal entered");
        Ok(())
    }

    /// Put everything back. Idempotent.
    ///
    /// Termios is restored even when writing the screen sequence fails;
    /// the write error is reported first.
    ///
    /// # Errors
    ///
    /// Fails if stdout can't be written or termios can't be restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let written = {
            let mut out = io::stdout().lock();
            write_restore(&mut out).and_then(|()| out.flush())
        };
        let restored = self.raw.take().map_or(Ok(()), |raw| raw.restore());
        tracing::debug!("terminal restored");

        written.and(restored)
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
