// SPDX-License-Identifier: MIT
//
// Glyphs and glyph rows — the units the scalers resample.
//
// A glyph is one display column: the UTF-8 bytes of one character stored
// inline (no heap), plus the brand flag from markup. Resampling a frame
// touches every character several times, so keeping glyphs `Copy` and
// allocation-free matters more than anything else in this crate.

use std::fmt;

use crate::markup::{self, push_tagged};
use crate::resample::{Blend, majority, majority_flag};

// ─── Glyph ───────────────────────────────────────────────────────────────────

/// One character cell: up to 4 UTF-8 bytes, a length, and a brand flag.
///
/// Equality compares the character only; the brand flag is voted on
/// separately when glyphs are blended.
#[derive(Clone, Copy)]
pub struct Glyph {
    bytes: [u8; 4],
    len: u8,
    pub branded: bool,
}

impl Glyph {
    /// A glyph with no character. Renders as one blank column.
    pub const BLANK: Self = Self {
        bytes: [0; 4],
        len: 0,
        branded: false,
    };

    /// Glyph for one character.
    #[must_use]
    pub fn new(ch: char, branded: bool) -> Self {
        let mut bytes = [0u8; 4];
        // A char encodes to at most 4 bytes.
        let len = u8::try_from(ch.encode_utf8(&mut bytes).len()).unwrap_or(4);
        Self {
            bytes,
            len,
            branded,
        }
    }

    /// The glyph's text; a blank glyph is a single space.
    #[must_use]
    pub fn as_str(&self) -> &str {
        if self.len == 0 {
            return " ";
        }
        std::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or(" ")
    }

    /// Number of UTF-8 bytes stored (0 for a blank glyph).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether this glyph holds no character.
    #[inline]
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.len == 0
    }

    /// Whether the glyph shows ink: not blank and not whitespace.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.is_blank() && !self.as_str().chars().all(char::is_whitespace)
    }

    /// Same glyph with a different brand flag.
    #[inline]
    #[must_use]
    pub const fn with_brand(mut self, branded: bool) -> Self {
        self.branded = branded;
        self
    }
}

impl PartialEq for Glyph {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bytes[..self.len()] == other.bytes[..other.len()]
    }
}

impl Eq for Glyph {}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.branded {
            write!(f, "{:?}*", self.as_str())
        } else {
            write!(f, "{:?}", self.as_str())
        }
    }
}

impl Blend for Glyph {
    /// Majority character, majority brand flag (ties branded).
    fn blend(bucket: &[Self]) -> Self {
        let winner = majority(bucket, Self::eq).map_or(Self::BLANK, |i| bucket[i]);
        let votes = bucket.iter().filter(|g| g.branded).count();
        winner.with_brand(majority_flag(votes, bucket.len()))
    }
}

/// Glyphs for every character of a tagged line, brand flags from markup.
#[must_use]
pub fn glyphs(line: &str) -> Vec<Glyph> {
    markup::parse(line)
        .chars()
        .map(|(c, branded)| Glyph::new(c, branded))
        .collect()
}

/// Serialize glyphs back into a tagged line.
#[must_use]
pub fn to_tagged(glyphs: &[Glyph]) -> String {
    let mut out = String::with_capacity(glyphs.len() + 8);
    push_tagged(&mut out, glyphs.iter().map(|g| (g.as_str(), g.branded)));
    out
}

// ─── GlyphRow ────────────────────────────────────────────────────────────────

/// A fixed-width row of glyphs — one line of a frame on the vertical axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRow(pub Vec<Glyph>);

impl GlyphRow {
    /// A row holding every character of a tagged line.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        Self(glyphs(line))
    }

    /// Number of glyphs.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Whether any glyph is branded.
    #[must_use]
    pub fn any_branded(&self) -> bool {
        self.0.iter().any(|g| g.branded)
    }

    /// The row's characters without markup.
    #[must_use]
    pub fn text(&self) -> String {
        self.0.iter().map(Glyph::as_str).collect()
    }

    /// The row as a tagged line.
    #[must_use]
    pub fn to_tagged(&self) -> String {
        to_tagged(&self.0)
    }
}

impl Blend for GlyphRow {
    /// Column-wise vote across every row in the bucket.
    fn blend(bucket: &[Self]) -> Self {
        let width = bucket.iter().map(Self::width).max().unwrap_or(0);
        let mut column = Vec::with_capacity(bucket.len());
        let row = (0..width)
            .map(|x| {
                column.clear();
                column.extend(bucket.iter().map(|r| r.0.get(x).copied().unwrap_or(Glyph::BLANK)));
                Glyph::blend(&column)
            })
            .collect();
        Self(row)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
