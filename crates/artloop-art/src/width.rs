// SPDX-License-Identifier: MIT
//
// Visible width of decorated text.
//
// Rendered frames and info-panel lines carry two kinds of invisible bytes:
// ANSI escape sequences and brand markup tags. Layout needs to know how
// many columns a string actually occupies, and how to cut or pad it to a
// column budget without slicing an escape in half. Width here means
// characters (Unicode scalars), the same unit the scalers produce.

use crate::markup::tag_at;

/// A lexical piece of decorated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// An ANSI escape sequence (zero width).
    Escape(&'a str),
    /// A markup tag (zero width).
    Tag(&'a str),
    /// One visible character.
    Char(&'a str),
}

/// Iterator over the [`Token`]s of a string.
pub struct Tokens<'a> {
    rest: &'a str,
}

/// Split `text` into escapes, tags, and visible characters.
#[must_use]
pub const fn tokens(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = self.rest;
        let first = rest.chars().next()?;

        let (token, len) = if first == '\x1b' {
            let len = escape_len(rest);
            (Token::Escape(&rest[..len]), len)
        } else if let Some((_, len)) = tag_at(rest) {
            (Token::Tag(&rest[..len]), len)
        } else {
            let len = first.len_utf8();
            (Token::Char(&rest[..len]), len)
        };

        self.rest = &rest[len..];
        Some(token)
    }
}

/// Byte length of the escape sequence at the start of `s` (which begins
/// with ESC).
///
/// CSI sequences run to their final byte (0x40–0x7E); any other escape is
/// ESC plus one character. An unterminated CSI swallows the rest.
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        None => 1,
        Some(b'[') => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7E).contains(b))
            .map_or(bytes.len(), |p| p + 3),
        Some(_) => 1 + s[1..].chars().next().map_or(0, char::len_utf8),
    }
}

/// Number of visible characters, skipping ANSI escapes and markup tags.
#[must_use]
pub fn visible_width(text: &str) -> usize {
    tokens(text).filter(|t| matches!(t, Token::Char(_))).count()
}

/// Cut `text` to at most `width` visible characters.
///
/// Escapes and tags are kept (they cost nothing), so colors opened before
/// the cut still close if the close comes later in the string.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut seen = 0;
    for token in tokens(text) {
        match token {
            Token::Char(c) => {
                if seen < width {
                    out.push_str(c);
                    seen += 1;
                }
            }
            Token::Escape(s) | Token::Tag(s) => out.push_str(s),
        }
    }
    out
}

// ─── Tests ───────────────────────────────────────────────────────────────────
