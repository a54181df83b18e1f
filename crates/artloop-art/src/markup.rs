// SPDX-License-Identifier: MIT
//
// Brand-span markup.
//
// Frame lines mark highlighted ("branded") runs with a literal open/close
// tag pair: `<b>logo</b>`. Spans never nest; there is one bit of state,
// inside or outside. The parser is deliberately forgiving — a stray close
// tag just turns off a state that was already off, and an open tag with
// no close runs to the end of the line. Nothing here can fail.
//
// The other direction, rebuilding tagged text from a character sequence
// and its brand mask, lives here too so every scaler emits tags the same
// way: open on a false→true transition, close on true→false, close any
// still-open span at the end.

/// Opens a branded span.
pub const OPEN_TAG: &str = "<b>";
/// Closes a branded span.
pub const CLOSE_TAG: &str = "</b>";

// ─── Parsed Line ─────────────────────────────────────────────────────────────

/// One run of text with uniform brand state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The run's text, markup removed (borrowed from the source line).
    pub text: &'a str,
    /// Whether the run was inside an open…close pair.
    pub branded: bool,
}

/// A line split into alternating plain / branded runs.
///
/// Concatenating the segment texts in order reproduces the line with all
/// markup removed. Empty runs are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub segments: Vec<Segment<'a>>,
    /// Whether the source contained any tag at all, balanced or not.
    pub has_markup: bool,
}

impl ParsedLine<'_> {
    /// The line's text without markup.
    #[must_use]
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text).collect()
    }

    /// One brand flag per character (Unicode scalar) of [`plain`](Self::plain).
    #[must_use]
    pub fn brand_mask(&self) -> Vec<bool> {
        self.segments
            .iter()
            .flat_map(|s| s.text.chars().map(move |_| s.branded))
            .collect()
    }

    /// Characters of the plain text paired with their brand flag.
    pub fn chars(&self) -> impl Iterator<Item = (char, bool)> + '_ {
        self.segments
            .iter()
            .flat_map(|s| s.text.chars().map(move |c| (c, s.branded)))
    }

    /// Whether any run is branded.
    #[must_use]
    pub fn any_branded(&self) -> bool {
        self.segments.iter().any(|s| s.branded)
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Which tag starts at the front of `s`, if any.
#[inline]
#[must_use]
pub fn tag_at(s: &str) -> Option<(bool, usize)> {
    if s.starts_with(OPEN_TAG) {
        Some((true, OPEN_TAG.len()))
    } else if s.starts_with(CLOSE_TAG) {
        Some((false, CLOSE_TAG.len()))
    } else {
        None
    }
}

/// Byte offset and kind (`true` = open) of the next tag in `s`.
fn next_tag(s: &str) -> Option<(usize, bool, usize)> {
    let mut from = 0;
    while let Some(rel) = s[from..].find('<') {
        let at = from + rel;
        if let Some((open, len)) = tag_at(&s[at..]) {
            return Some((at, open, len));
        }
        from = at + 1;
    }
    None
}

/// Split a line into plain / branded runs.
#[must_use]
pub fn parse(line: &str) -> ParsedLine<'_> {
    let mut parsed = ParsedLine::default();
    let mut rest = line;
    let mut in_span = false;

    while let Some((at, open, len)) = next_tag(rest) {
        if at > 0 {
            parsed.segments.push(Segment {
                text: &rest[..at],
                branded: in_span,
            });
        }
        parsed.has_markup = true;
        in_span = open;
        rest = &rest[at + len..];
    }

    // Pending text flushes with whatever state is active; an unterminated
    // open tag therefore closes implicitly here.
    if !rest.is_empty() {
        parsed.segments.push(Segment {
            text: rest,
            branded: in_span,
        });
    }
    parsed
}

/// `line` with every open/close tag removed.
#[must_use]
pub fn strip_markup(line: &str) -> String {
    parse(line).plain()
}

// ─── Reconstruction ──────────────────────────────────────────────────────────

/// Append `(text, branded)` pieces to `out`, inserting tags at brand
/// transitions and closing a trailing open span.
///
/// Characters that happen to spell a tag (`<`, `b`, `>` in a row) are kept
/// as text: a tag that leaves the state unchanged is spliced in after the
/// `<`, so parsing the result gives back exactly the pieces.
pub fn push_tagged<'s>(out: &mut String, pieces: impl IntoIterator<Item = (&'s str, bool)>) {
    let mut open = false;
    // Start of the text since the last tag written.
    let mut run_start = out.len();
    for (text, branded) in pieces {
        if branded != open {
            out.push_str(if branded { OPEN_TAG } else { CLOSE_TAG });
            open = branded;
            run_start = out.len();
        }
        for ch in text.chars() {
            out.push(ch);
            if ch != '>' {
                continue;
            }
            if let Some(at) = spelled_tag(&out[run_start..]) {
                let split = run_start + at + 1;
                let keep = if open { OPEN_TAG } else { CLOSE_TAG };
                out.insert_str(split, keep);
                run_start = split + keep.len();
            }
        }
    }
    if open {
        out.push_str(CLOSE_TAG);
    }
}

/// Offset of a tag spelled by the last characters of `run`.
fn spelled_tag(run: &str) -> Option<usize> {
    [OPEN_TAG, CLOSE_TAG]
        .into_iter()
        .find(|tag| run.ends_with(tag))
        .map(|tag| run.len() - tag.len())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seg(text: &str, branded: bool) -> Segment<'_> {
        Segment { text, branded }
    }

    // ── parse ───────────────────────────────────────────────────

    #[test]
    fn plain_line_is_one_segment() {
        let p = parse("hello");
        assert_eq!(p.segments, vec![seg("hello", false)]);
        assert!(!p.has_markup);
    }

    #[test]
    fn branded_run_in_middle() {
        let p = parse("ab<b>cd</b>ef");
        assert_eq!(p.segments, vec![seg("ab", false), seg("cd", true), seg("ef", false)]);
        assert!(p.has_markup);
        assert_eq!(p.plain(), "abcdef");
    }

    #[test]
    fn unterminated_open_runs_to_end() {
        let p = parse("ab<b>cd");
        assert_eq!(p.segments, vec![seg("ab", false), seg("cd", true)]);
    }

    #[test]
    fn stray_close_is_tolerated() {
        let p = parse("ab</b>cd");
        assert_eq!(p.segments, vec![seg("ab", false), seg("cd", false)]);
        assert_eq!(p.plain(), "abcd");
    }

    #[test]
    fn double_open_stays_open() {
        let p = parse("<b>a<b>b</b>c");
        assert_eq!(p.segments, vec![seg("a", true), seg("b", true), seg("c", false)]);
    }

    #[test]
    fn empty_span_produces_no_segment() {
        let p = parse("a<b></b>b");
        assert_eq!(p.segments, vec![seg("a", false), seg("b", false)]);
        assert!(p.has_markup);
    }

    #[test]
    fn lone_angle_brackets_are_text() {
        let p = parse("a<c>b<");
        assert_eq!(p.segments, vec![seg("a<c>b<", false)]);
        assert!(!p.has_markup);
    }

    #[test]
    fn empty_line() {
        let p = parse("");
        assert!(p.segments.is_empty());
        assert_eq!(p.plain(), "");
    }

    // ── mask ────────────────────────────────────────────────────

    #[test]
    fn mask_is_per_character_not_per_byte() {
        let p = parse("é<b>→x</b>");
        assert_eq!(p.brand_mask(), vec![false, true, true]);
        assert!(p.any_branded());
        let chars: Vec<_> = p.chars().collect();
        assert_eq!(chars, vec![('é', false), ('→', true), ('x', true)]);
    }

    #[test]
    fn strip() {
        assert_eq!(strip_markup("<b>ab</b> c"), "ab c");
    }

    // ── push_tagged ─────────────────────────────────────────────

    #[test]
    fn tags_inserted_at_transitions() {
        let mut out = String::new();
        push_tagged(&mut out, [("a", false), ("b", true), ("c", true), ("d", false)]);
        assert_eq!(out, "a<b>bc</b>d");
    }

    #[test]
    fn trailing_span_is_closed() {
        let mut out = String::new();
        push_tagged(&mut out, [("a", true)]);
        assert_eq!(out, "<b>a</b>");
    }

    #[test]
    fn unbranded_pieces_have_no_tags() {
        let mut out = String::new();
        push_tagged(&mut out, [("a", false), ("b", false)]);
        assert_eq!(out, "ab");
    }

    fn round_trip(pieces: &[(&str, bool)]) -> (String, Vec<(char, bool)>) {
        let mut out = String::new();
        push_tagged(&mut out, pieces.iter().copied());
        let chars = parse(&out).chars().collect();
        (out, chars)
    }

    fn expected(pieces: &[(&str, bool)]) -> Vec<(char, bool)> {
        pieces.iter().flat_map(|(t, b)| t.chars().map(move |c| (c, *b))).collect()
    }

    #[test]
    fn spelled_open_tag_stays_text() {
        let pieces = [("<", false), ("b", false), (">", false)];
        let (out, chars) = round_trip(&pieces);
        assert_eq!(out, "<</b>b>");
        assert_eq!(chars, expected(&pieces));
    }

    #[test]
    fn spelled_close_tag_stays_text() {
        let pieces = [("x</b>y", false)];
        let (out, chars) = round_trip(&pieces);
        assert_eq!(out, "x<</b>/b>y");
        assert_eq!(chars, expected(&pieces));
    }

    #[test]
    fn spelled_tag_inside_span_stays_branded() {
        let pieces = [("a", false), ("<b>", true), ("</b>", true), ("c", false)];
        let (out, chars) = round_trip(&pieces);
        assert_eq!(out, "a<b><<b>b><<b>/b></b>c");
        assert_eq!(chars, expected(&pieces));
    }

    #[test]
    fn tag_across_transition_is_already_split() {
        let pieces = [("<", false), ("b>", true)];
        let (out, chars) = round_trip(&pieces);
        assert_eq!(out, "<<b>b></b>");
        assert_eq!(chars, expected(&pieces));
    }

    #[test]
    fn parse_then_tag_preserves_meaning() {
        let p = parse("x<b>yz</b>w<b>v");
        let mut out = String::new();
        push_tagged(&mut out, p.segments.iter().map(|s| (s.text, s.branded)));
        assert_eq!(out, "x<b>yz</b>w<b>v</b>");
    }
}
