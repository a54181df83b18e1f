// SPDX-License-Identifier: MIT
//
// Frame scaling — fit tagged ASCII art to any width × height.
//
// Horizontal first: every line is resampled to exactly `width` glyphs
// (character-aware, brand flag carried on each glyph). Vertical second: the
// equal-width glyph rows are resampled to exactly `height` rows. Both axes
// use the shared resampler, so shrinking always votes and growing always
// picks the nearest source element.
//
// The grid stays in glyph form until it is composited. Tagged text is only
// produced at the edges (`scale_line`, `scale_frame`), never parsed back.

use crate::glyph::{self, Glyph, GlyphRow};
use crate::resample::resample;

/// Lines of a frame: split on `\n`, trailing `\r` removed.
pub fn frame_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

/// Resample one tagged line to exactly `width` glyphs.
///
/// A zero width gives no glyphs. A line with no characters becomes `width`
/// unbranded spaces.
#[must_use]
pub fn scale_glyphs(line: &str, width: usize) -> Vec<Glyph> {
    if width == 0 {
        return Vec::new();
    }
    let glyphs = glyph::glyphs(line);
    if glyphs.is_empty() {
        return vec![Glyph::new(' ', false); width];
    }
    resample(&glyphs, width)
}

/// Resample one tagged line to exactly `width` visible characters.
///
/// Markup is re-emitted around the resampled branded runs; a line without
/// markup never gains a span, even when its characters happen to spell a
/// tag after shrinking.
#[must_use]
pub fn scale_line(line: &str, width: usize) -> String {
    glyph::to_tagged(&scale_glyphs(line, width))
}

/// Scale a whole frame to a `width` × `height` glyph grid.
///
/// Either dimension being zero gives no rows.
#[must_use]
pub fn scale_grid(text: &str, width: usize, height: usize) -> Vec<GlyphRow> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let rows: Vec<GlyphRow> = frame_lines(text)
        .map(|l| GlyphRow(scale_glyphs(l, width)))
        .collect();
    resample(&rows, height)
}

/// Scale a whole frame to `width` × `height` tagged text.
///
/// The result has exactly `height` lines joined by `\n`, each with exactly
/// `width` visible characters. Either dimension being zero gives an empty
/// string.
#[must_use]
pub fn scale_frame(text: &str, width: usize, height: usize) -> String {
    scale_grid(text, width, height)
        .iter()
        .map(GlyphRow::to_tagged)
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
