// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events for the prompt line. The prompt is
// a single-line editor, so only the keys a line editor cares about are
// recognized:
//
// - Printable UTF-8 characters (multi-byte sequences may span reads)
// - Enter, Tab, Backspace, Escape
// - Legacy CSI sequences: Left/Right, Home/End, Delete, with xterm
//   modifier parameters (`CSI 1;5C` = Ctrl+Right)
// - SS3 sequences (`ESC O A` etc., sent by terminals in application mode)
// - Ctrl+letter (C0 control bytes) and Alt+key (ESC prefix)
//
// Everything else (Up/Down, Insert, PageUp/PageDown, function keys) is
// consumed and dropped.
//
// # Design
//
// Escape sequences and UTF-8 characters can be split across two polls, so
// the parser keeps unconsumed bytes in a small buffer. Feed bytes with
// [`Parser::advance`]. A lone ESC is ambiguous (Escape key or the start of
// a sequence); the parser holds it until the next poll that brings no new
// bytes, when the caller invokes [`Parser::flush`] to resolve it as Escape.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A Ctrl+`ch` key press.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Bit layout matches the xterm CSI modifier encoding, where the
    /// transmitted parameter is `1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Outcome of trying to parse one event at a buffer position.
enum Parsed {
    /// An event and the number of bytes it consumed.
    Event(KeyEvent, usize),
    /// Bytes recognized but not meaningful to us; skip them.
    Skip(usize),
    /// The sequence continues past the end of the buffer.
    Incomplete,
}

/// Stateful byte-stream → key-event parser.
pub struct Parser {
    /// Bytes waiting for the rest of their sequence.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed raw bytes and return every event that can be parsed so far.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Skip(n) => pos += n,
                Parsed::Incomplete => break,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes after a quiet poll.
    ///
    /// A lone ESC becomes Escape; `ESC [` or `ESC O` with nothing after it
    /// becomes Alt+`[` / Alt+`O`; a truncated UTF-8 sequence is dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        match self.buf.as_slice() {
            [] => {}
            [0x1B] => events.push(KeyEvent::plain(KeyCode::Escape)),
            [0x1B, b, ..] if b.is_ascii() => events.push(KeyEvent {
                code: KeyCode::Char(char::from(*b)),
                modifiers: Modifiers::ALT,
            }),
            _ => {}
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        b'\r' | b'\n' => Parsed::Event(KeyEvent::plain(KeyCode::Enter), 1),
        b'\t' => Parsed::Event(KeyEvent::plain(KeyCode::Tab), 1),
        0x7F | 0x08 => Parsed::Event(KeyEvent::plain(KeyCode::Backspace), 1),
        b @ 0x01..=0x1A => Parsed::Event(KeyEvent::ctrl(char::from(b - 1 + b'a')), 1),
        0x00 | 0x1C..=0x1F => Parsed::Skip(1),
        _ => parse_utf8(buf),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };
    match next {
        b'[' => parse_csi(buf),
        b'O' => match buf.get(2) {
            None => Parsed::Incomplete,
            Some(&b) => match final_to_key(b) {
                Some(code) => Parsed::Event(KeyEvent::plain(code), 3),
                None => Parsed::Skip(3),
            },
        },
        0x1B => Parsed::Event(KeyEvent::plain(KeyCode::Escape), 1),
        _ => match parse_utf8(&buf[1..]) {
            Parsed::Event(mut key, n) => {
                key.modifiers |= Modifiers::ALT;
                Parsed::Event(key, n + 1)
            }
            Parsed::Skip(n) => Parsed::Skip(n + 1),
            Parsed::Incomplete => Parsed::Incomplete,
        },
    }
}

/// Parse `ESC [ params final`.
fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter and intermediate bytes are 0x20..=0x3F; the final byte is
    // 0x40..=0x7E.
    let Some(end) = buf[2..].iter().position(|b| (0x40..=0x7E).contains(b)) else {
        return if buf[2..].iter().all(|b| (0x20..=0x3F).contains(b)) {
            Parsed::Incomplete
        } else {
            Parsed::Skip(2)
        };
    };
    let params = &buf[2..2 + end];
    let final_byte = buf[2 + end];
    let consumed = 3 + end;

    let mut fields = params.split(|&b| b == b';');
    let first = fields.next().and_then(parse_number);
    let modifiers = fields
        .next()
        .and_then(parse_number)
        .and_then(|m| u8::try_from(m.saturating_sub(1)).ok())
        .map_or(Modifiers::empty(), Modifiers::from_bits_truncate);

    let code = if final_byte == b'~' {
        match first {
            Some(1 | 7) => Some(KeyCode::Home),
            Some(3) => Some(KeyCode::Delete),
            Some(4 | 8) => Some(KeyCode::End),
            _ => None,
        }
    } else {
        final_to_key(final_byte)
    };

    match code {
        Some(code) => Parsed::Event(KeyEvent { code, modifiers }, consumed),
        None => Parsed::Skip(consumed),
    }
}

/// Final byte of a CSI / SS3 cursor-key sequence.
const fn final_to_key(b: u8) -> Option<KeyCode> {
    match b {
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        _ => None,
    }
}

fn parse_number(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    bytes
        .iter()
        .try_fold(0u32, |acc, &b| acc.checked_mul(10)?.checked_add(u32::from(b - b'0')))
}

/// Decode one UTF-8 character at the start of `buf`.
fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = match buf[0] {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Parsed::Skip(1),
    };
    if buf.len() < len {
        return Parsed::Incomplete;
    }
    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Parsed::Event(KeyEvent::plain(KeyCode::Char(ch)), len),
        None => Parsed::Skip(1),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(bytes: &[u8]) -> Vec<KeyEvent> {
        Parser::new().advance(bytes)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    // ── Plain bytes ─────────────────────────────────────────────

    #[test]
    fn ascii_chars() {
        assert_eq!(
            parse(b"ls"),
            vec![key(KeyCode::Char('l')), key(KeyCode::Char('s'))]
        );
    }

    #[test]
    fn enter_from_cr_and_lf() {
        assert_eq!(parse(b"\r"), vec![key(KeyCode::Enter)]);
        assert_eq!(parse(b"\n"), vec![key(KeyCode::Enter)]);
    }

    #[test]
    fn backspace_variants() {
        assert_eq!(parse(b"\x7f"), vec![key(KeyCode::Backspace)]);
        assert_eq!(parse(b"\x08"), vec![key(KeyCode::Backspace)]);
    }

    #[test]
    fn ctrl_letters() {
        assert_eq!(parse(b"\x03"), vec![KeyEvent::ctrl('c')]);
        assert_eq!(parse(b"\x15"), vec![KeyEvent::ctrl('u')]);
        assert_eq!(parse(b"\x17"), vec![KeyEvent::ctrl('w')]);
    }

    #[test]
    fn tab() {
        assert_eq!(parse(b"\t"), vec![key(KeyCode::Tab)]);
    }

    // ── UTF-8 ───────────────────────────────────────────────────

    #[test]
    fn multibyte_char() {
        assert_eq!(parse("é→🦀".as_bytes()), vec![
            key(KeyCode::Char('é')),
            key(KeyCode::Char('→')),
            key(KeyCode::Char('🦀')),
        ]);
    }

    #[test]
    fn utf8_split_across_reads() {
        let mut p = Parser::new();
        let bytes = "→".as_bytes();
        assert!(p.advance(&bytes[..1]).is_empty());
        assert!(p.has_pending());
        assert_eq!(p.advance(&bytes[1..]), vec![key(KeyCode::Char('→'))]);
        assert!(!p.has_pending());
    }

    #[test]
    fn invalid_utf8_is_skipped() {
        assert_eq!(parse(b"\xffa"), vec![key(KeyCode::Char('a'))]);
    }

    // ── Escape sequences ────────────────────────────────────────

    #[test]
    fn arrows_csi_and_ss3() {
        assert_eq!(parse(b"\x1b[D"), vec![key(KeyCode::Left)]);
        assert_eq!(parse(b"\x1bOC"), vec![key(KeyCode::Right)]);
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(parse(b"\x1b[3~"), vec![key(KeyCode::Delete)]);
        assert_eq!(parse(b"\x1b[1~"), vec![key(KeyCode::Home)]);
        assert_eq!(parse(b"\x1b[4~"), vec![key(KeyCode::End)]);
    }

    #[test]
    fn keys_a_line_editor_ignores_are_dropped() {
        for seq in [&b"\x1b[Ax"[..], b"\x1bOBx", b"\x1b[2~x", b"\x1b[5~x", b"\x1b[6;5~x"] {
            assert_eq!(parse(seq), vec![key(KeyCode::Char('x'))], "{seq:?}");
        }
    }

    #[test]
    fn modified_arrow() {
        assert_eq!(parse(b"\x1b[1;5C"), vec![KeyEvent {
            code: KeyCode::Right,
            modifiers: Modifiers::CTRL,
        }]);
    }

    #[test]
    fn unknown_csi_is_dropped() {
        assert_eq!(parse(b"\x1b[200~x"), vec![key(KeyCode::Char('x'))]);
        assert_eq!(parse(b"\x1b[?1;2cx"), vec![key(KeyCode::Char('x'))]);
    }

    #[test]
    fn alt_char() {
        assert_eq!(parse(b"\x1bb"), vec![KeyEvent {
            code: KeyCode::Char('b'),
            modifiers: Modifiers::ALT,
        }]);
    }

    #[test]
    fn csi_split_across_reads() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert!(p.advance(b"1;").is_empty());
        assert_eq!(p.advance(b"2D"), vec![KeyEvent {
            code: KeyCode::Left,
            modifiers: Modifiers::SHIFT,
        }]);
    }

    // ── Flush ───────────────────────────────────────────────────

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b").is_empty());
        assert!(p.has_pending());
        assert_eq!(p.flush(), vec![key(KeyCode::Escape)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn flush_partial_csi_is_alt_bracket() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert_eq!(p.flush(), vec![KeyEvent {
            code: KeyCode::Char('['),
            modifiers: Modifiers::ALT,
        }]);
    }

    #[test]
    fn flush_empty_is_empty() {
        assert!(Parser::new().flush().is_empty());
    }

    #[test]
    fn double_escape() {
        let mut p = Parser::new();
        assert_eq!(p.advance(b"\x1b\x1b"), vec![key(KeyCode::Escape)]);
        assert_eq!(p.flush(), vec![key(KeyCode::Escape)]);
    }
}
