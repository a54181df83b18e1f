// SPDX-License-Identifier: MIT
//
// One-dimensional resampling.
//
// Both scalers do the same thing at different granularities: the
// horizontal scaler resamples a line's characters, the vertical scaler
// resamples a frame's rows. Growing uses nearest-neighbor; shrinking
// partitions the source into one bucket per output element and lets each
// bucket vote. Only the vote differs between the two, so it is the one
// thing an element type supplies (via [`Blend`]); the bucket boundaries and
// the index mapping are shared here.

use std::ops::Range;

/// Distinct variants tracked per bucket during a majority vote.
///
/// Values first seen after the table is full are ignored and cannot win.
/// Art buckets with more than 16 truly distinct glyphs are rare enough that
/// the output difference is invisible, and the fixed table keeps voting
/// allocation-free.
pub const MAX_VARIANTS: usize = 16;

/// An element that can stand in for a bucket of its peers when shrinking.
pub trait Blend: Clone {
    /// Collapse a non-empty bucket into one representative element.
    fn blend(bucket: &[Self]) -> Self;
}

/// Source range feeding output element `i` when shrinking `src_len`
/// elements to `target_len`.
///
/// `start = i·src/target`, `end = ⌈(i+1)·src/target⌉`, clamped to the
/// source. Every bucket has at least one member.
#[inline]
#[must_use]
pub fn bucket(i: usize, src_len: usize, target_len: usize) -> Range<usize> {
    let start = i * src_len / target_len;
    let end = ((i + 1) * src_len).div_ceil(target_len).min(src_len);
    start..end.max(start + 1).min(src_len)
}

/// Source index for output element `i` when growing `src_len` elements to
/// `target_len` (`src_len ≤ target_len`).
#[inline]
#[must_use]
pub fn nearest(i: usize, src_len: usize, target_len: usize) -> usize {
    if src_len <= 1 || target_len <= 1 {
        return 0;
    }
    (i * (src_len - 1) / (target_len - 1)).min(src_len - 1)
}

/// Resample `src` to exactly `target_len` elements.
///
/// An empty source or a zero target yields an empty result; callers that
/// need padding (blank lines, blank rows) supply it themselves.
#[must_use]
pub fn resample<T: Blend>(src: &[T], target_len: usize) -> Vec<T> {
    if src.is_empty() || target_len == 0 {
        return Vec::new();
    }

    if src.len() > target_len {
        (0..target_len)
            .map(|i| T::blend(&src[bucket(i, src.len(), target_len)]))
            .collect()
    } else if src.len() == 1 {
        vec![src[0].clone(); target_len]
    } else {
        (0..target_len)
            .map(|i| src[nearest(i, src.len(), target_len)].clone())
            .collect()
    }
}

/// Index of the most frequent value among `items` under `same`.
///
/// Only the first [`MAX_VARIANTS`] distinct values are tallied. Ties go to
/// the value seen first. Returns `None` for an empty input.
pub fn majority<T>(items: &[T], same: impl Fn(&T, &T) -> bool) -> Option<usize> {
    // (index of first occurrence, count)
    let mut table: [(usize, usize); MAX_VARIANTS] = [(0, 0); MAX_VARIANTS];
    let mut used = 0;

    for (i, item) in items.iter().enumerate() {
        if let Some(entry) = table[..used].iter_mut().find(|(first, _)| same(&items[*first], item)) {
            entry.1 += 1;
        } else if used < MAX_VARIANTS {
            table[used] = (i, 1);
            used += 1;
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for &(first, count) in &table[..used] {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((first, count));
        }
    }
    best.map(|(first, _)| first)
}

/// Whether `votes` of `total` is a majority, ties counting as yes.
#[inline]
#[must_use]
pub const fn majority_flag(votes: usize, total: usize) -> bool {
    votes * 2 >= total
}

// ─── Tests ───────────────────────────────────────────────────────────────────
