// SPDX-License-Identifier: MIT
//
// Resolved color preferences and frame pacing.
//
// Colors here are already escape strings (e.g. "\x1b[38;5;208m"): the
// configuration layer turns names and hex values into codes once, and the
// compositor only ever copies them into output.

use std::time::Duration;

/// Delay used when the frame rate is zero or negative.
pub const FALLBACK_DELAY: Duration = Duration::from_millis(50);

/// Vertical gradient settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradientPreferences {
    /// Color codes, top to bottom. Empty disables the gradient.
    pub colors: Vec<String>,
    /// Whether the gradient scrolls through the art over time.
    pub scroll: bool,
    /// Scroll speed in lines per second.
    pub scroll_speed: f64,
    /// Active frame rate, used to turn a frame index into elapsed time.
    pub fps: i32,
}

impl GradientPreferences {
    /// Whether any gradient color is configured.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Whether the gradient moves between frames.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.is_enabled() && self.scroll && self.scroll_speed > 0.0 && self.fps > 0
    }
}

/// Everything the compositor needs to color a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPreferences {
    pub enabled: bool,
    /// Static brand color code.
    pub brand: Option<String>,
    pub gradient: GradientPreferences,
}

impl ColorPreferences {
    /// Preferences that emit no color at all.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            brand: None,
            gradient: GradientPreferences::default(),
        }
    }
}

impl Default for ColorPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            brand: None,
            gradient: GradientPreferences::default(),
        }
    }
}

/// Per-frame sleep for a frame rate.
///
/// `1e9 / fps` nanoseconds; [`FALLBACK_DELAY`] when `fps ≤ 0`.
#[must_use]
pub fn fps_to_delay(fps: i32) -> Duration {
    match u64::try_from(fps) {
        Ok(fps) if fps > 0 => Duration::from_nanos(1_000_000_000 / fps),
        _ => FALLBACK_DELAY,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
