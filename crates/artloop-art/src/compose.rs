// SPDX-License-Identifier: MIT
//
// Color compositing.
//
// Turns a scaled glyph grid into terminal text: brand flags become color
// escapes. Each line has a base color (a gradient step if the line is
// inside the art range, otherwise the static brand color when no glyph in
// the frame is branded) and branded glyphs switch to the brand color. A
// line never leaves a color open: the last run is followed by a reset
// whenever a color is active.

use crate::glyph::{Glyph, GlyphRow};
use crate::prefs::{ColorPreferences, GradientPreferences};
use crate::scale::frame_lines;

/// SGR reset.
pub const RESET: &str = "\x1b[0m";

// ─── Art Range ───────────────────────────────────────────────────────────────

/// Vertical extent of a frame's visible content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtRange {
    /// First line with content.
    pub start: usize,
    /// Last line with content (inclusive).
    pub end: usize,
    pub has_content: bool,
}

impl ArtRange {
    /// Range of the rows holding any visible glyph (whitespace and blank
    /// padding don't count).
    #[must_use]
    pub fn of(rows: &[GlyphRow]) -> Self {
        let mut range = Self::default();
        for (y, row) in rows.iter().enumerate() {
            if !row.0.iter().any(Glyph::is_visible) {
                continue;
            }
            if !range.has_content {
                range.start = y;
                range.has_content = true;
            }
            range.end = y;
        }
        range
    }

    /// Number of lines in the range (0 without content).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        if self.has_content {
            self.end - self.start + 1
        } else {
            0
        }
    }

    /// Whether line `y` falls inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, y: usize) -> bool {
        self.has_content && y >= self.start && y <= self.end
    }
}

// ─── Gradient Math ───────────────────────────────────────────────────────────

/// How many lines the gradient has scrolled by `frame_index`, wrapped to
/// the range height.
///
/// `⌊frame_index / fps · speed⌋ mod range_height`; zero unless scrolling is
/// on with a positive speed and frame rate.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn scroll_offset(frame_index: usize, gradient: &GradientPreferences, range_height: usize) -> usize {
    if range_height == 0 || !gradient.is_scrolling() {
        return 0;
    }
    // Multiply first: 7 * 20 / 20 is exactly 7, 7 / 20 * 20 is not.
    let steps = (frame_index as f64 * gradient.scroll_speed / f64::from(gradient.fps)).floor();
    (steps as usize) % range_height
}

/// Gradient color for relative line `pos` of a range `range_height` tall.
///
/// Single-color gradients and single-line ranges collapse to color 0.
#[inline]
#[must_use]
pub fn gradient_index(pos: usize, range_height: usize, num_colors: usize) -> usize {
    if num_colors <= 1 || range_height <= 1 {
        return 0;
    }
    (pos * (num_colors - 1) / (range_height - 1)).min(num_colors - 1)
}

/// Position `pos` rotated back by `offset` within `0..height`.
#[inline]
const fn rotate_back(pos: usize, offset: usize, height: usize) -> usize {
    (pos + height - offset % height) % height
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Color a tagged frame.
///
/// With colors disabled the markup is stripped and nothing else changes.
#[must_use]
pub fn render_frame(text: &str, prefs: &ColorPreferences, frame_index: usize) -> String {
    let rows: Vec<GlyphRow> = frame_lines(text).map(GlyphRow::parse).collect();
    render_rows(&rows, prefs, frame_index)
}

/// Color a glyph grid, one output line per row.
///
/// With colors disabled the rows' characters are joined unchanged.
#[must_use]
pub fn render_rows(rows: &[GlyphRow], prefs: &ColorPreferences, frame_index: usize) -> String {
    let cells: usize = rows.iter().map(GlyphRow::width).sum();
    let mut out = String::with_capacity(cells * 2 + rows.len());

    if !prefs.enabled {
        for (y, row) in rows.iter().enumerate() {
            if y > 0 {
                out.push('\n');
            }
            out.extend(row.0.iter().map(Glyph::as_str));
        }
        return out;
    }

    let brand = prefs.brand.as_deref();
    // A frame with its own spans is only colored where it asks to be.
    let has_span = rows.iter().any(GlyphRow::any_branded);
    let static_base = if has_span { None } else { brand };

    let gradient = &prefs.gradient;
    let range = if gradient.is_enabled() {
        ArtRange::of(rows)
    } else {
        ArtRange::default()
    };
    let height = range.height();
    let offset = scroll_offset(frame_index, gradient, height);

    for (y, row) in rows.iter().enumerate() {
        if y > 0 {
            out.push('\n');
        }
        let base = if range.contains(y) {
            let pos = rotate_back(y - range.start, offset, height);
            let idx = gradient_index(pos, height, gradient.colors.len());
            Some(gradient.colors[idx].as_str())
        } else {
            static_base
        };
        push_colored_row(&mut out, row, base, brand);
    }
    out
}

/// Append one row, switching color only where the wanted color changes.
fn push_colored_row(out: &mut String, row: &GlyphRow, base: Option<&str>, brand: Option<&str>) {
    let mut active: Option<&str> = None;
    for glyph in &row.0 {
        let want = if glyph.branded { brand.or(base) } else { base };
        if want != active {
            out.push_str(want.unwrap_or(RESET));
            active = want;
        }
        out.push_str(glyph.as_str());
    }
    if active.is_some() {
        out.push_str(RESET);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
