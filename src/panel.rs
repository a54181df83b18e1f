// SPDX-License-Identifier: MIT
//
// Info panel — the box of `label: value` lines beside the animation.
//
// Collection runs once at startup (and the size line again after a
// resize); styling runs on every resize because the box is drawn to the
// current panel width. Both are plain strings in, plain strings out: the
// render loop only pastes styled lines next to art rows.
//
// Info values are plain text from the environment, never markup, so
// widths are display columns: a CJK hostname takes two per character.

use std::env;

use artloop_term::ansi::{BOLD, RESET};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use artloop_term::terminal::Size;

/// Terminals narrower than this get no panel.
pub const MIN_COLUMNS: u16 = 40;

/// Border plus one column of padding on each side.
const CHROME: usize = 4;

/// One `label: value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine {
    pub label: String,
    pub value: String,
}

impl InfoLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// `label: value`, unstyled.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

// ─── Collection ──────────────────────────────────────────────────────────────

/// Describe the environment the animation is running in.
#[must_use]
pub fn collect(size: Size, frame_count: usize, fps: i32) -> Vec<InfoLine> {
    let user = env::var("USER").or_else(|_| env::var("LOGNAME")).unwrap_or_else(|_| "?".into());
    let uts = uname();
    let host = uts.as_ref().map_or("localhost", |u| u.nodename.as_str());

    let mut lines = vec![InfoLine::new("user", format!("{user}@{host}"))];
    if let Some(u) = &uts {
        lines.push(InfoLine::new("os", format!("{} {}", u.sysname, u.machine)));
        lines.push(InfoLine::new("kernel", u.release.clone()));
    } else {
        lines.push(InfoLine::new("os", env::consts::OS));
    }
    if let Ok(shell) = env::var("SHELL") {
        let name = shell.rsplit('/').next().unwrap_or(&shell).to_owned();
        lines.push(InfoLine::new("shell", name));
    }
    if let Ok(term) = env::var("TERM") {
        lines.push(InfoLine::new("term", term));
    }
    lines.push(size_line(size));
    lines.push(InfoLine::new("frames", format!("{frame_count} @ {fps} fps")));
    lines
}

/// The terminal size line (refreshed after a resize).
#[must_use]
pub fn size_line(size: Size) -> InfoLine {
    InfoLine::new("size", format!("{}x{}", size.cols, size.rows))
}

/// Replace the size line in place.
pub fn update_size(lines: &mut [InfoLine], size: Size) {
    if let Some(line) = lines.iter_mut().find(|l| l.label == "size") {
        *line = size_line(size);
    }
}

struct Uname {
    sysname: String,
    nodename: String,
    release: String,
    machine: String,
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn uname() -> Option<Uname> {
    use std::ffi::CStr;

    let mut buf: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&raw mut buf) } != 0 {
        return None;
    }
    let field = |f: &[libc::c_char]| {
        // uname() NUL-terminates every field.
        unsafe { CStr::from_ptr(f.as_ptr()) }.to_string_lossy().into_owned()
    };
    Some(Uname {
        sysname: field(&buf.sysname),
        nodename: field(&buf.nodename),
        release: field(&buf.release),
        machine: field(&buf.machine),
    })
}

#[cfg(not(unix))]
fn uname() -> Option<Uname> {
    None
}

// ─── Styling ─────────────────────────────────────────────────────────────────

/// Columns the panel occupies for `lines` on a `cols`-wide terminal.
///
/// Zero means no panel.
#[must_use]
pub fn panel_width(lines: &[InfoLine], title: &str, cols: u16) -> usize {
    if cols < MIN_COLUMNS || lines.is_empty() {
        return 0;
    }
    let longest = lines
        .iter()
        .map(|l| l.text().width())
        .chain(std::iter::once(title.width()))
        .max()
        .unwrap_or(0);
    (longest + CHROME).min(usize::from(cols) / 2)
}

/// Box `lines` into exactly `width` columns.
///
/// Labels are bold and colored with `accent` (an SGR string) when given.
/// Returns no lines for widths too small to hold a border.
#[must_use]
pub fn style(lines: &[InfoLine], title: &str, width: usize, accent: Option<&str>) -> Vec<String> {
    if width < CHROME {
        return Vec::new();
    }
    let inner = width - 2;
    let body = width - CHROME;

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(top_border(title, inner));
    for line in lines {
        let plain = fit(&line.text(), body);
        let text = match accent {
            Some(color) => highlight_label(&plain, &line.label, color),
            None => plain,
        };
        out.push(format!("│ {text} │"));
    }
    out.push(format!("╰{}╯", "─".repeat(inner)));
    out
}

/// `╭─ title ───╮`, title cut to fit.
fn top_border(title: &str, inner: usize) -> String {
    if title.is_empty() || inner < 4 {
        return format!("╭{}╮", "─".repeat(inner));
    }
    let (title, used) = truncate(title, inner - 4);
    let fill = inner - 3 - used;
    format!("╭─ {title} {}╮", "─".repeat(fill))
}

/// Cut `text` to at most `width` display columns; also returns the columns
/// used. A wide character that would straddle the edge is dropped.
fn truncate(text: &str, width: usize) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    (out, used)
}

/// Cut or right-pad `text` with spaces to exactly `width` display columns.
fn fit(text: &str, width: usize) -> String {
    let (mut out, used) = truncate(text, width);
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

/// Color the `label:` prefix of an already-truncated line.
fn highlight_label(text: &str, label: &str, color: &str) -> String {
    let prefix = format!("{label}:");
    match text.strip_prefix(prefix.as_str()) {
        Some(rest) => format!("{BOLD}{color}{prefix}{RESET}{rest}"),
        None => text.to_owned(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use artloop_art::width::visible_width;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<InfoLine> {
        vec![InfoLine::new("os", "Linux"), InfoLine::new("shell", "zsh")]
    }

    #[test]
    fn width_fits_longest_line() {
        // "shell: zsh" is 10 wide.
        assert_eq!(panel_width(&sample(), "", 100), 14);
    }

    #[test]
    fn width_capped_at_half_terminal() {
        let lines = vec![InfoLine::new("x", "y".repeat(80))];
        assert_eq!(panel_width(&lines, "", 60), 30);
    }

    #[test]
    fn narrow_terminal_has_no_panel() {
        assert_eq!(panel_width(&sample(), "t", 39), 0);
        assert_eq!(panel_width(&[], "t", 100), 0);
    }

    #[test]
    fn title_counts_toward_width() {
        assert_eq!(panel_width(&sample(), "a long panel title", 100), 22);
    }

    #[test]
    fn boxed_lines_are_exact_width() {
        let styled = style(&sample(), "info", 14, None);
        assert_eq!(styled.len(), 4);
        for line in &styled {
            assert_eq!(visible_width(line), 14, "{line:?}");
        }
        assert_eq!(styled[0], "╭─ info ─────╮");
        assert_eq!(styled[1], "│ os: Linux  │");
        assert_eq!(styled[3], "╰────────────╯");
    }

    #[test]
    fn long_lines_are_truncated() {
        let styled = style(&sample(), "", 8, None);
        assert_eq!(styled[1], "│ os:  │");
        assert_eq!(styled[2], "│ shel │");
    }

    #[test]
    fn accent_colors_labels_without_changing_width() {
        let styled = style(&sample(), "t", 16, Some("\x1b[36m"));
        assert!(styled[1].contains("\x1b[1m\x1b[36mos:\x1b[0m Linux"));
        assert!(styled.iter().all(|l| visible_width(l) == 16));
    }

    #[test]
    fn wide_values_measure_display_columns() {
        let lines = vec![InfoLine::new("host", "日本語"), InfoLine::new("os", "x")];
        // "host: 日本語" is 12 columns.
        let width = panel_width(&lines, "", 100);
        assert_eq!(width, 16);
        let styled = style(&lines, "", width, None);
        assert_eq!(styled[1], "│ host: 日本語 │");
        assert!(styled.iter().all(|l| l.width() == 16), "{styled:?}");
    }

    #[test]
    fn wide_character_at_the_edge_is_dropped() {
        let lines = vec![InfoLine::new("host", "日本")];
        let styled = style(&lines, "", 11, None);
        assert_eq!(styled[1], "│ host:  │");
        assert!(styled.iter().all(|l| l.width() == 11), "{styled:?}");
    }

    #[test]
    fn tag_shaped_values_are_measured_as_text() {
        let lines = vec![InfoLine::new("term", "<b>x")];
        assert_eq!(panel_width(&lines, "", 100), 14);
        let styled = style(&lines, "", 14, None);
        assert_eq!(styled[1], "│ term: <b>x │");
    }

    #[test]
    fn wide_title_is_cut_by_columns() {
        let styled = style(&sample(), "日本語", 10, None);
        assert_eq!(styled[0], "╭─ 日本 ─╮");
        assert_eq!(styled[0].width(), 10);
    }

    #[test]
    fn too_narrow_to_draw() {
        assert!(style(&sample(), "t", 3, None).is_empty());
    }

    #[test]
    fn size_line_updates_in_place() {
        let mut lines = vec![InfoLine::new("os", "x"), size_line(Size { cols: 80, rows: 24 })];
        update_size(&mut lines, Size { cols: 100, rows: 30 });
        assert_eq!(lines[1].value, "100x30");
    }

    #[test]
    fn collect_reports_frames_and_size() {
        let lines = collect(Size { cols: 90, rows: 20 }, 4, 20);
        assert!(lines.iter().any(|l| l.text() == "size: 90x20"));
        assert!(lines.iter().any(|l| l.text() == "frames: 4 @ 20 fps"));
        assert_eq!(lines[0].label, "user");
    }
}
