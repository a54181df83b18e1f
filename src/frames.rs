// SPDX-License-Identifier: MIT
//
// Animation frame loading.
//
// A frames file is plain UTF-8: frames one after another, separated by a
// line holding only `%%`. Lines keep their markup untouched; the scaler
// deals with it later. Blank frames at either end (a trailing separator,
// an empty file tail) are dropped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Line that separates two frames.
pub const SEPARATOR: &str = "%%";

/// The animation shipped inside the binary.
pub const DEFAULT_FRAMES: &str = include_str!("../assets/default.frames");

/// Split a frames document into frame texts.
#[must_use]
pub fn parse(text: &str) -> Vec<String> {
    let mut frames = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line == SEPARATOR {
            frames.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    frames.push(current.join("\n"));

    for frame in &mut frames {
        // A final newline before a separator or EOF is not part of the art.
        if frame.ends_with('\n') {
            frame.pop();
        }
    }

    let is_blank = |f: &String| f.trim().is_empty();
    let first = frames.iter().position(|f| !is_blank(f)).unwrap_or(frames.len());
    let last = frames.iter().rposition(|f| !is_blank(f)).map_or(first, |i| i + 1);
    frames.drain(last..);
    frames.drain(..first);
    frames
}

/// Load frames from `path`, or the built-in animation when `None`.
///
/// # Errors
///
/// Fails if the file can't be read or holds no frames.
pub fn load(path: Option<&Path>) -> Result<Vec<String>> {
    let frames = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read frames from {}", path.display()))?;
            parse(&text)
        }
        None => parse(DEFAULT_FRAMES),
    };

    if frames.is_empty() {
        match path {
            Some(path) => bail!("no frames found in {}", path.display()),
            None => bail!("built-in animation has no frames"),
        }
    }
    tracing::info!(count = frames.len(), "frames loaded");
    Ok(frames)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn splits_on_separator_lines() {
        assert_eq!(parse("a\nb\n%%\nc\n"), vec!["a\nb", "c"]);
    }

    #[test]
    fn separator_must_be_whole_line() {
        assert_eq!(parse("a %%\n%% b"), vec!["a %%\n%% b"]);
    }

    #[test]
    fn strips_carriage_returns() {
        assert_eq!(parse("a\r\n%%\r\nb\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn drops_blank_frames_at_ends() {
        assert_eq!(parse("%%\n\n%%\nx\n%%\n   \n%%\n"), vec!["x"]);
    }

    #[test]
    fn keeps_blank_frames_in_the_middle() {
        assert_eq!(parse("x\n%%\n\n%%\ny"), vec!["x", "", "y"]);
    }

    #[test]
    fn keeps_markup_and_leading_blank_lines() {
        assert_eq!(parse("\n <b>o</b>\n"), vec!["\n <b>o</b>"]);
    }

    #[test]
    fn empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("%%\n%%").is_empty());
    }

    #[test]
    fn built_in_animation_parses() {
        let frames = load(None).unwrap();
        assert!(frames.len() > 1);
        assert!(frames.iter().all(|f| !f.contains(SEPARATOR)));
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join(format!("artloop-frames-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("anim.frames");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"one\n%%\ntwo\n").unwrap();

        assert_eq!(load(Some(&path)).unwrap(), vec!["one", "two"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("artloop-empty-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.frames");
        fs::write(&path, "\n%%\n").unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("no frames"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load(Some(Path::new("/nonexistent/artloop.frames"))).unwrap_err();
        assert!(err.to_string().contains("failed to read frames"));
    }
}
