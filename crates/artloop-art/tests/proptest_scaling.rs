// SPDX-License-Identifier: MIT

//! Property tests for the scalers and the compositor.
//!
//! 1. A scaled line is exactly the requested width.
//! 2. A scaled frame is exactly the requested height, every line the width.
//! 3. Lines without markup never gain a branded span, even when shrinking
//!    lines up `<`, `b`, `/` and `>` into something that reads as a tag.
//! 4. Scaling to the native width preserves the plain text.
//! 5. The tagged form of a scaled frame parses back to the same grid.
//! 6. Compositing never changes visible width and never leaves a color open.

use artloop_art::compose::RESET;
use artloop_art::glyph::GlyphRow;
use artloop_art::markup::{self, strip_markup};
use artloop_art::{
    ColorPreferences, GradientPreferences, render_frame, render_rows, scale_frame, scale_grid, scale_line,
    visible_width,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// One tag character, weighted up so tag-shaped runs are common.
fn tag_char() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<".to_owned()),
        Just(">".to_owned()),
        Just("/".to_owned()),
        Just("b".to_owned()),
    ]
}

/// One art line: printable ASCII, a few multibyte glyphs, and tags.
fn art_line() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            6 => "[ -~]",
            3 => tag_char(),
            1 => Just("é".to_owned()),
            1 => Just("█".to_owned()),
            1 => Just("<b>".to_owned()),
            1 => Just("</b>".to_owned()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

/// A line with no markup, rich in the characters tags are made of.
fn plain_line() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![3 => "[ -~]", 2 => tag_char()], 0..40)
        .prop_map(|parts| parts.concat())
        .prop_filter("line holds a tag", |line| !markup::parse(line).has_markup)
}

/// Characters and brand flags of one row, for comparisons that care
/// about the flag.
fn cells(row: &GlyphRow) -> Vec<(String, bool)> {
    row.0.iter().map(|g| (g.as_str().to_owned(), g.branded)).collect()
}

fn art_frame() -> impl Strategy<Value = String> {
    prop::collection::vec(art_line(), 0..12).prop_map(|lines| lines.join("\n"))
}

fn dims() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=60, 1usize..=30)
}

fn colorful() -> ColorPreferences {
    ColorPreferences {
        enabled: true,
        brand: Some("\x1b[38;5;208m".to_owned()),
        gradient: GradientPreferences {
            colors: vec!["\x1b[31m".to_owned(), "\x1b[32m".to_owned(), "\x1b[34m".to_owned()],
            scroll: true,
            scroll_speed: 7.5,
            fps: 20,
        },
    }
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn scaled_line_has_exact_width(line in art_line(), width in 1usize..=80) {
        prop_assert_eq!(visible_width(&scale_line(&line, width)), width);
    }

    #[test]
    fn scaled_frame_has_exact_dimensions(frame in art_frame(), (w, h) in dims()) {
        let out = scale_frame(&frame, w, h);
        let lines: Vec<&str> = out.split('\n').collect();
        prop_assert_eq!(lines.len(), h);
        for line in lines {
            prop_assert_eq!(visible_width(line), w);
        }
    }

    #[test]
    fn plain_lines_stay_plain(line in plain_line(), width in 1usize..=80) {
        let out = scale_line(&line, width);
        let parsed = markup::parse(&out);
        prop_assert!(!parsed.any_branded(), "{:?}", out);
        prop_assert_eq!(parsed.plain().chars().count(), width);
    }

    #[test]
    fn tagged_frame_parses_back_to_grid(frame in art_frame(), (w, h) in dims()) {
        let grid = scale_grid(&frame, w, h);
        let out = scale_frame(&frame, w, h);
        let reparsed: Vec<GlyphRow> = out.split('\n').map(GlyphRow::parse).collect();
        prop_assert_eq!(reparsed.len(), grid.len());
        for (back, row) in reparsed.iter().zip(&grid) {
            prop_assert_eq!(cells(back), cells(row));
        }
    }

    #[test]
    fn native_width_preserves_text(line in art_line()) {
        let plain = strip_markup(&line);
        let n = plain.chars().count();
        prop_assume!(n > 0);
        prop_assert_eq!(strip_markup(&scale_line(&line, n)), plain);
    }

    #[test]
    fn compositing_keeps_width_and_closes_colors(
        frame in art_frame(),
        (w, h) in dims(),
        index in 0usize..500,
    ) {
        let out = render_rows(&scale_grid(&frame, w, h), &colorful(), index);
        prop_assert_eq!(&out, &render_frame(&scale_frame(&frame, w, h), &colorful(), index));
        for line in out.split('\n') {
            prop_assert_eq!(visible_width(line), w);
            if line.contains('\x1b') {
                prop_assert!(line.ends_with(RESET), "{:?}", line);
            }
        }
    }

    #[test]
    fn scaling_is_deterministic(frame in art_frame(), (w, h) in dims()) {
        prop_assert_eq!(scale_frame(&frame, w, h), scale_frame(&frame, w, h));
    }
}
