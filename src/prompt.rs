// SPDX-License-Identifier: MIT
//
// Prompt line — single-line editor under the animation.
//
// Keys arrive already parsed from the raw byte stream. The editor keeps a
// char-indexed cursor (like a shell's readline, minus history) and answers
// each key with what the render loop should do next: keep animating,
// submit the line, or quit.

use artloop_term::input::{KeyCode, KeyEvent, Modifiers};
use unicode_width::UnicodeWidthStr;

/// What the loop does after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    /// Keep going; the line may have changed.
    Continue,
    /// Enter was pressed with this text.
    Submit(String),
    /// Ctrl-C, or Ctrl-D on an empty line.
    Quit,
}

/// The editable input line.
#[derive(Debug, Clone, Default)]
pub struct Prompt {
    input: String,
    /// Cursor position within `input` (char offset).
    cursor: usize,
}

impl Prompt {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cursor position (char offset).
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Apply one key.
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptAction {
        if key.modifiers.contains(Modifiers::CTRL) {
            return self.handle_ctrl(key.code);
        }
        match key.code {
            KeyCode::Enter => {
                self.cursor = 0;
                return PromptAction::Submit(std::mem::take(&mut self.input));
            }
            KeyCode::Char(ch) if !key.modifiers.contains(Modifiers::ALT) => self.insert_char(ch),
            KeyCode::Tab => self.insert_char(' '),
            KeyCode::Backspace => {
                self.backspace();
            }
            KeyCode::Delete => {
                self.delete();
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_len(),
            KeyCode::Escape => self.clear(),
            // Alt+char has no binding.
            KeyCode::Char(_) => {}
        }
        if self.is_empty() {
            self.cursor = 0;
        }
        PromptAction::Continue
    }

    fn handle_ctrl(&mut self, code: KeyCode) -> PromptAction {
        let KeyCode::Char(ch) = code else {
            // Ctrl+arrows and friends behave like their plain keys.
            return self.handle_key(KeyEvent::plain(code));
        };
        match ch {
            'c' => return PromptAction::Quit,
            'd' if self.input.is_empty() => return PromptAction::Quit,
            'd' => {
                self.delete();
            }
            'a' => self.cursor = 0,
            'e' => self.cursor = self.char_len(),
            'b' => self.cursor = self.cursor.saturating_sub(1),
            'f' => self.cursor = (self.cursor + 1).min(self.char_len()),
            'u' => self.kill_to_start(),
            'k' => {
                let at = self.char_to_byte(self.cursor);
                self.input.truncate(at);
            }
            'w' => self.kill_word(),
            _ => {}
        }
        PromptAction::Continue
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, ch: char) {
        let at = self.char_to_byte(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.char_to_byte(self.cursor);
        self.input.remove(at);
        true
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.char_to_byte(self.cursor);
        self.input.remove(at);
        true
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    fn kill_to_start(&mut self) {
        let at = self.char_to_byte(self.cursor);
        self.input.drain(..at);
        self.cursor = 0;
    }

    /// Delete the word before the cursor, and the blanks after it.
    fn kill_word(&mut self) {
        let chars: Vec<char> = self.input.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let (from, to) = (self.char_to_byte(start), self.char_to_byte(self.cursor));
        self.input.drain(from..to);
        self.cursor = start;
    }

    /// The prompt as displayed: symbol, space, input.
    #[must_use]
    pub fn render(&self, symbol: &str) -> String {
        format!("{symbol} {}", self.input())
    }

    /// Display column of the cursor when rendered after `symbol`.
    #[must_use]
    pub fn cursor_column(&self, symbol: &str) -> usize {
        let before = &self.input[..self.char_to_byte(self.cursor())];
        symbol.width() + 1 + before.width()
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(byte_idx, _)| byte_idx)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
