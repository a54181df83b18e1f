// SPDX-License-Identifier: MIT
//
// Lazy per-frame render cache.
//
// Holds borrowed raw frames and one optional rendered slot per frame. A
// slot is filled the first time its frame is requested at the current
// size and reused until the size changes, at which point every slot is
// dropped at once. Color preferences are fixed for the cache's lifetime. Nothing is recomputed on a
// resize; the cost moves to the next `get` of each frame, one frame per
// tick.

use tracing::{debug, trace};

use crate::compose::render_rows;
use crate::prefs::ColorPreferences;
use crate::scale::scale_grid;

/// Rendered frames memoized for one target size.
#[derive(Debug)]
pub struct LazyFrameCache<'a> {
    frames: &'a [String],
    slots: Vec<Option<String>>,
    width: usize,
    height: usize,
    prefs: ColorPreferences,
}

impl<'a> LazyFrameCache<'a> {
    /// Empty cache over `frames` for a `width` × `height` target.
    #[must_use]
    pub fn new(frames: &'a [String], width: usize, height: usize, prefs: ColorPreferences) -> Self {
        Self {
            frames,
            slots: vec![None; frames.len()],
            width,
            height,
            prefs,
        }
    }

    /// The rendered text of frame `index`, computing it on a miss.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`len`](Self::len).
    pub fn get(&mut self, index: usize) -> &str {
        assert!(
            index < self.frames.len(),
            "frame index {index} out of range for {} frames",
            self.frames.len()
        );

        let (frames, width, height, prefs) = (self.frames, self.width, self.height, &self.prefs);
        self.slots[index].get_or_insert_with(|| {
            trace!(index, width, height, "frame cache miss");
            render_rows(&scale_grid(&frames[index], width, height), prefs, index)
        })
    }

    /// Change the target size.
    ///
    /// Same size is a no-op (returns `false`). Otherwise every slot is
    /// dropped without rendering anything.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }
        debug!(
            from_w = self.width,
            from_h = self.height,
            width,
            height,
            "frame cache invalidated by resize"
        );
        self.width = width;
        self.height = height;
        self.invalidate();
        true
    }

    /// Drop every rendered slot.
    pub fn invalidate(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Whether frame `index` is rendered at the current size.
    #[must_use]
    pub fn is_cached(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(Option::is_some)
    }

    /// Number of rendered slots.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of frames.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Current target `(width, height)`.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
