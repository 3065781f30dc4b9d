//! Scroll-scrubbed progress: animation progress driven directly by where an
//! element sits in the viewport rather than by time.

#[cfg(test)]
#[path = "scrub_test.rs"]
mod scrub_test;

use crate::coords::Rect;

/// Fraction of the element's journey across the canvas viewport, in
/// `[0, 1]`.
///
/// 0 while the element's top edge is still below the canvas bottom, 1 once
/// its bottom edge has scrolled past the canvas top, linear in between.
/// Degenerate (zero-height) geometry yields 0 rather than an error.
#[must_use]
pub fn progress(dom: Rect, canvas: Rect) -> f64 {
    let total = canvas.height + dom.height;
    if total <= 0.0 {
        return 0.0;
    }
    let traveled = (canvas.top + canvas.height) - dom.top;
    (traveled / total).clamp(0.0, 1.0)
}
