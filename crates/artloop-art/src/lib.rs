// SPDX-License-Identifier: MIT

//! # artloop-art — The ASCII-art engine behind artloop
//!
//! Pure, deterministic text transforms; no terminal I/O lives here.
//!
//! - **[`markup`]** — `<b>…</b>` brand spans: parsing and re-emitting
//! - **[`glyph`]** — `Glyph` (one inline character + brand flag) and glyph rows
//! - **[`resample`]** — generic 1-D resampler: nearest-neighbor up, majority vote down
//! - **[`scale`]** — fit a frame to a width × height glyph grid
//! - **[`width`]** — visible width of text carrying escapes and markup
//! - **[`prefs`]** — resolved color preferences and frame pacing
//! - **[`compose`]** — gradient / brand color compositing
//! - **[`cache`]** — `LazyFrameCache`, per-frame memoization with free invalidation

pub mod cache;
pub mod compose;
pub mod glyph;
pub mod markup;
pub mod prefs;
pub mod resample;
pub mod scale;
pub mod width;

pub use cache::LazyFrameCache;
pub use compose::{ArtRange, render_frame, render_rows};
pub use prefs::{ColorPreferences, GradientPreferences, fps_to_delay};
pub use scale::{scale_frame, scale_grid, scale_line};
pub use width::visible_width;
