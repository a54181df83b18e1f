// SPDX-License-Identifier: MIT
//
// artloop-term — Terminal plumbing for artloop.
//
// Everything artloop needs to own a terminal for the lifetime of an
// animation: raw mode with guaranteed restore, a signal-safe resize flag,
// a non-blocking keyboard poll, a small key parser, and an output buffer
// that turns one frame into one write() syscall.
//
// Like the rest of artloop this crate talks to the terminal directly via
// ANSI escape sequences and raw termios. It knows nothing about ASCII art;
// the art engine lives in `artloop-art`.

pub mod ansi;
pub mod color;
pub mod input;
pub mod output;
pub mod reader;
pub mod resize;
pub mod terminal;
