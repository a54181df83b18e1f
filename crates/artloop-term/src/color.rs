// SPDX-License-Identifier: MIT
//
// Terminal colors and the strings users write them as.
//
// Configuration speaks in strings ("#ff8800", "208", "bright-cyan");
// the art compositor speaks in ready-made SGR escape strings it can splice
// between characters. `CellColor` sits in between: parse once at startup,
// encode once into a color code, and the per-frame path never touches a
// color again.

use std::fmt;
use std::str::FromStr;

use crate::ansi;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// A foreground color a terminal can display.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index (0–15 are the standard named colors).
    Ansi256(u8),

    /// Terminal default color.
    #[default]
    Default,
}

/// The 16 standard color names, indexed by their ANSI palette number.
const NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright-black",
    "bright-red",
    "bright-green",
    "bright-yellow",
    "bright-blue",
    "bright-magenta",
    "bright-cyan",
    "bright-white",
];

impl CellColor {
    /// Parse a user-facing color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, a palette index `0`–`255`, `default`, or
    /// one of the 16 standard names. Names are case-insensitive and `_` or
    /// a space may stand in for `-` (`bright_red`, `Bright Red`). `grey`
    /// and `gray` are aliases for `bright-black`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return parse_hex(s);
        }
        if let Ok(idx) = s.parse::<u8>() {
            return Some(Self::Ansi256(idx));
        }

        let name: String = s
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match name.as_str() {
            "default" => Some(Self::Default),
            "grey" | "gray" => Some(Self::Ansi256(8)),
            other => NAMES
                .iter()
                .position(|&n| n == other)
                .and_then(|i| u8::try_from(i).ok())
                .map(Self::Ansi256),
        }
    }

    /// The SGR foreground escape for this color, as a string.
    ///
    /// This is the "color code" format the art compositor splices into
    /// frame text.
    #[must_use]
    pub fn fg_code(self) -> String {
        let mut buf = Vec::with_capacity(20);
        // Writing into a Vec cannot fail.
        let _ = ansi::fg(&mut buf, self);
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl FromStr for CellColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseColorError(s.to_owned()))
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A color string that [`CellColor::parse`] could not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized color {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

fn parse_hex(s: &str) -> Option<CellColor> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let b = s.as_bytes();

    match b.len() {
        // #RGB
        3 => {
            let r = parse_hex_digit(b[0])?;
            let g = parse_hex_digit(b[1])?;
            let bl = parse_hex_digit(b[2])?;
            Some(CellColor::Rgb(r << 4 | r, g << 4 | g, bl << 4 | bl))
        }
        // #RRGGBB
        6 => {
            let r = parse_hex_byte(&b[0..2])?;
            let g = parse_hex_byte(&b[2..4])?;
            let bl = parse_hex_byte(&b[4..6])?;
            Some(CellColor::Rgb(r, g, bl))
        }
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
