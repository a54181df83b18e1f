// SPDX-License-Identifier: MIT
//
// Render loop — one frame, one write, one sleep, forever.
//
// Each tick:
//
//   1. poll stdin once (never blocks) and feed keys to the prompt
//   2. take the current frame from the cache, paste the info panel beside
//      it and the prompt under it, and send it all in one write
//   3. stop here if Enter (or a quit key) arrived this tick
//   4. sleep one frame period
//   5. if a resize was signalled: new layout, cache invalidation (no
//      re-rendering), restyled panel, animation back to frame 0;
//      otherwise advance to the next frame, wrapping at the end
//
// Input and resize are only looked at on tick boundaries, so the worst
// case latency for either is one frame period.
//
// Layout:
//
//   ┌───────────────────────────┬──┬────────────┐
//   │ art (scaled frame)        │  │ info panel │  ← rows - 1
//   ├───────────────────────────┴──┴────────────┤
//   │ ❯ prompt                                   │  ← 1 row
//   └────────────────────────────────────────────┘

use std::io;
use std::time::Duration;

use artloop_art::width::truncate_to_width;
use artloop_art::{ColorPreferences, LazyFrameCache, fps_to_delay};
use artloop_term::ansi;
use artloop_term::input::Parser;
use artloop_term::output::OutputBuffer;
use artloop_term::reader::{Poll, StdinPoller};
use artloop_term::resize::ResizeSignal;
use artloop_term::terminal::{Size, Terminal};
use tracing::{debug, info};

use crate::panel::{self, InfoLine};
use crate::prompt::{Prompt, PromptAction};

/// Columns between the art and the panel.
pub const GAP: usize = 2;

// ─── Console ─────────────────────────────────────────────────────────────────

/// One non-blocking look at the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Nothing typed since the last tick.
    Idle,
    /// Raw bytes, not yet parsed into keys.
    Bytes(Vec<u8>),
    /// The input stream ended.
    Closed,
}

/// Everything the loop needs from the outside world.
pub trait Console {
    /// Current terminal size, queried fresh.
    fn size(&mut self) -> Size;

    /// Read whatever input is waiting, without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    fn poll_input(&mut self) -> io::Result<Input>;

    /// Send one composed frame and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write_frame(&mut self, out: &mut OutputBuffer) -> io::Result<()>;

    /// Wait one frame period.
    fn sleep(&mut self, delay: Duration);

    /// Whether a resize happened since the last call (clears the flag).
    fn take_resize(&mut self) -> bool;
}

/// The real terminal: raw mode for as long as this value lives.
pub struct TtyConsole {
    terminal: Terminal,
    poller: StdinPoller,
    resize: ResizeSignal,
}

impl TtyConsole {
    /// Install the resize handler and enter raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal can't be put in raw mode.
    pub fn open() -> io::Result<Self> {
        let resize = ResizeSignal::install();
        let mut terminal = Terminal::new();
        terminal.enter()?;
        Ok(Self {
            terminal,
            poller: StdinPoller::new(),
            resize,
        })
    }

    /// Restore the terminal. Dropping does the same, ignoring errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the restore sequence or termios reset fails.
    pub fn close(mut self) -> io::Result<()> {
        self.terminal.leave()
    }
}

impl Console for TtyConsole {
    fn size(&mut self) -> Size {
        self.terminal.refresh_size()
    }

    fn poll_input(&mut self) -> io::Result<Input> {
        Ok(match self.poller.poll()? {
            Poll::Idle => Input::Idle,
            Poll::Bytes(bytes) => Input::Bytes(bytes.to_vec()),
            Poll::Closed => Input::Closed,
        })
    }

    fn write_frame(&mut self, out: &mut OutputBuffer) -> io::Result<()> {
        out.flush_stdout()
    }

    fn sleep(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }

    fn take_resize(&mut self) -> bool {
        self.resize.take()
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Screen split derived from the terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cols: usize,
    /// Rows above the prompt line.
    pub rows: usize,
    pub art_width: usize,
    pub art_height: usize,
    /// Zero when the panel is hidden.
    pub panel_width: usize,
}

impl Layout {
    /// Split `size` for a panel `panel_width` columns wide.
    #[must_use]
    pub fn compute(size: Size, panel_width: usize) -> Self {
        let cols = usize::from(size.cols).max(1);
        let rows = usize::from(size.rows).saturating_sub(1).max(1);
        let gap = if panel_width > 0 { GAP } else { 0 };
        Self {
            cols,
            rows,
            art_width: cols.saturating_sub(panel_width + gap).max(1),
            art_height: rows,
            panel_width,
        }
    }
}

// ─── Loop ────────────────────────────────────────────────────────────────────

/// How the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Enter was pressed on this line.
    Command(String),
    /// The user quit, or input closed.
    Quit,
}

/// Loop-wide settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub fps: i32,
    pub colors: ColorPreferences,
    pub prompt_symbol: String,
    pub panel_enabled: bool,
    pub panel_title: String,
}

/// The animation loop and everything it owns between ticks.
pub struct RenderLoop<'a, C: Console> {
    console: C,
    cache: LazyFrameCache<'a>,
    settings: LoopSettings,
    info: Vec<InfoLine>,
    panel: Vec<String>,
    layout: Layout,
    prompt: Prompt,
    parser: Parser,
    out: OutputBuffer,
    frame: usize,
    clear_screen: bool,
}

impl<'a, C: Console> RenderLoop<'a, C> {
    /// Build the loop for `frames` (non-empty) at the console's current size.
    pub fn new(mut console: C, frames: &'a [String], info: Vec<InfoLine>, settings: LoopSettings) -> Self {
        let size = console.size();
        let (layout, panel) = arrange(size, &info, &settings);
        let cache = LazyFrameCache::new(frames, layout.art_width, layout.art_height, settings.colors.clone());
        debug!(?layout, frames = frames.len(), "render loop ready");
        Self {
            console,
            cache,
            settings,
            info,
            panel,
            layout,
            prompt: Prompt::new(),
            parser: Parser::new(),
            out: OutputBuffer::new(),
            frame: 0,
            clear_screen: true,
        }
    }

    /// Give the console back (to restore the terminal).
    pub fn into_console(self) -> C {
        self.console
    }

    /// Animate until a line is submitted or the user quits.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from the console.
    pub fn run(&mut self) -> io::Result<Outcome> {
        if self.cache.is_empty() {
            return Ok(Outcome::Quit);
        }
        let delay = fps_to_delay(self.settings.fps);

        loop {
            let outcome = self.read_input()?;

            self.paint()?;
            if let Some(outcome) = outcome {
                info!(?outcome, "render loop finished");
                return Ok(outcome);
            }

            self.console.sleep(delay);

            if self.console.take_resize() {
                self.handle_resize();
            } else {
                self.frame = (self.frame + 1) % self.cache.len();
            }
        }
    }

    /// Feed this tick's input to the prompt; `Some` ends the loop.
    fn read_input(&mut self) -> io::Result<Option<Outcome>> {
        let keys = match self.console.poll_input()? {
            Input::Bytes(bytes) => self.parser.advance(&bytes),
            // A lone ESC held over from the last read is the Escape key.
            Input::Idle if self.parser.has_pending() => self.parser.flush(),
            Input::Idle => return Ok(None),
            Input::Closed => {
                debug!("input closed");
                return Ok(Some(Outcome::Quit));
            }
        };

        for key in keys {
            match self.prompt.handle_key(key) {
                PromptAction::Continue => {}
                PromptAction::Submit(line) => return Ok(Some(Outcome::Command(line))),
                PromptAction::Quit => return Ok(Some(Outcome::Quit)),
            }
        }
        Ok(None)
    }

    fn handle_resize(&mut self) {
        let size = self.console.size();
        panel::update_size(&mut self.info, size);
        let (layout, panel) = arrange(size, &self.info, &self.settings);
        debug!(?layout, "resize");
        self.cache.resize(layout.art_width, layout.art_height);
        self.layout = layout;
        self.panel = panel;
        self.frame = 0;
        self.clear_screen = true;
    }

    /// Compose and write the current frame.
    fn paint(&mut self) -> io::Result<()> {
        let layout = self.layout;
        let out = &mut self.out;
        out.clear();
        ansi::begin_sync(out)?;
        if std::mem::take(&mut self.clear_screen) {
            ansi::clear_screen(out)?;
        }

        let art = self.cache.get(self.frame);
        let mut art_lines = art.split('\n');
        let panel_top = layout.rows.saturating_sub(self.panel.len()) / 2;

        for y in 0..layout.rows {
            ansi::cursor_to(out, 0, to_u16(y))?;
            match art_lines.next() {
                Some(line) => out.push_str(line),
                None => out.push_spaces(layout.art_width),
            }
            if layout.panel_width > 0 {
                out.push_spaces(GAP);
                match y.checked_sub(panel_top).and_then(|i| self.panel.get(i)) {
                    Some(line) => out.push_str(line),
                    None => out.push_spaces(layout.panel_width),
                }
            }
            ansi::clear_to_eol(out)?;
        }

        let symbol = &self.settings.prompt_symbol;
        let prompt_row = to_u16(layout.rows);
        ansi::cursor_to(out, 0, prompt_row)?;
        out.push_str(&truncate_to_width(&self.prompt.render(symbol), layout.cols));
        ansi::clear_to_eol(out)?;
        let col = self.prompt.cursor_column(symbol).min(layout.cols - 1);
        ansi::cursor_to(out, to_u16(col), prompt_row)?;
        ansi::cursor_show(out)?;
        ansi::end_sync(out)?;

        self.console.write_frame(out)
    }
}

/// Layout and styled panel lines for a terminal size.
fn arrange(size: Size, info: &[InfoLine], settings: &LoopSettings) -> (Layout, Vec<String>) {
    let title = &settings.panel_title;
    let width = if settings.panel_enabled {
        panel::panel_width(info, title, size.cols)
    } else {
        0
    };
    let layout = Layout::compute(size, width);
    let accent = settings.colors.brand.as_deref().filter(|_| settings.colors.enabled);
    let mut lines = panel::style(info, title, width, accent);
    lines.truncate(layout.rows);
    // A panel too narrow to draw takes no space.
    if lines.is_empty() && width > 0 {
        return (Layout::compute(size, 0), lines);
    }
    (layout, lines)
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
