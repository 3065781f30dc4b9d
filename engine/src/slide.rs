//! Slide navigation state machine.
//!
//! Navigation commands update the logical index instantly; only the visual
//! rotation catches up. The pending rotation composes across commands rather
//! than cancelling, decays by a fixed rate each frame, and snaps to exactly
//! zero at the end so the machine has a real idle state. A separate smoothed
//! "visually active index" tracks the logical index for shaders, and its own
//! settling is what releases video playback: once the smoothed value reaches
//! the target, [`SlideState::step`] reports the slide to start, at most once
//! per surviving command. Rapid navigation is latest-wins: each command
//! replaces the single pending request, so a superseded one never fires.

#[cfg(test)]
#[path = "slide_test.rs"]
mod slide_test;

use std::f64::consts::TAU;

use crate::consts::{LERP_LIMIT, ROTATION_EPSILON, ROTATION_RATE, VISUAL_INDEX_RATE};
use crate::math::lerp;

/// A playback request waiting for the visual index to settle on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPlay {
    /// Wrapped slide index to start once settled.
    slide: usize,
}

/// What one frame of slide animation did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideStep {
    /// Rotation delta applied to the mesh this frame, in radians.
    pub rotation_applied: f64,
    /// Slide whose playback should start now, if one settled this frame.
    pub play: Option<usize>,
}

/// Navigation state for one slide effect instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideState {
    /// Logical index, updated instantly on command. Unbounded; wraps only
    /// for playback lookup.
    active_index: i64,
    /// Fixed slide count for this instance.
    total: usize,
    /// Signed rotation still owed to the mesh, in radians.
    rotation_remaining: f64,
    /// Smoothed index read by shaders to blend slide content.
    visual_index: f64,
    /// Accumulated rotation actually applied, i.e. the mesh's current spin.
    spin: f64,
    /// At most one outstanding playback request; each command replaces it,
    /// which is what makes rapid navigation latest-wins.
    pending: Option<PendingPlay>,
}

impl SlideState {
    /// A machine for `total` slides, starting at index 0, idle.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            active_index: 0,
            total,
            rotation_remaining: 0.0,
            visual_index: 0.0,
            spin: 0.0,
            pending: None,
        }
    }

    /// Wrap an unbounded index into `[0, total)` with floored modulo, so
    /// negative commands resolve correctly (`-1` on 5 slides is slide 4).
    #[must_use]
    pub fn wrap(&self, index: i64) -> usize {
        let total = i64::try_from(self.total).unwrap_or(i64::MAX);
        usize::try_from(index.rem_euclid(total)).unwrap_or(0)
    }

    /// Command: rotate so slide `target` faces front.
    ///
    /// The owed rotation composes with any still in flight. The logical
    /// index updates immediately; the returned value is the wrapped slide
    /// whose media the host should prepare (after pausing whatever plays).
    pub fn go_to(&mut self, target: i64) -> usize {
        #[allow(clippy::cast_precision_loss)]
        let diff_rate = (target - self.active_index) as f64 / self.total as f64;
        self.rotation_remaining -= diff_rate * TAU;
        self.active_index = target;
        let slide = self.wrap(target);
        self.pending = Some(PendingPlay { slide });
        slide
    }

    /// Advance one frame: decay the owed rotation, smooth the visual index,
    /// and release a settled playback request if one is due.
    pub fn step(&mut self) -> SlideStep {
        let mut rotation_applied = 0.0;
        if self.rotation_remaining != 0.0 {
            let decayed = lerp(self.rotation_remaining, 0.0, ROTATION_RATE, ROTATION_EPSILON);
            // The terminal snap applies the whole remainder in one step so
            // the machine lands on exactly zero.
            rotation_applied = if decayed == 0.0 { self.rotation_remaining } else { decayed };
            self.rotation_remaining -= rotation_applied;
            self.spin += rotation_applied;
        }

        #[allow(clippy::cast_precision_loss)]
        let target = self.active_index as f64;
        if self.visual_index != target {
            self.visual_index = lerp(self.visual_index, target, VISUAL_INDEX_RATE, LERP_LIMIT);
        }

        let play = self.take_settled(target);
        SlideStep { rotation_applied, play }
    }

    /// Release the pending playback request once the visual index has
    /// settled on the current target.
    fn take_settled(&mut self, target: f64) -> Option<usize> {
        let pending = self.pending?;
        if self.visual_index == target {
            self.pending = None;
            return Some(pending.slide);
        }
        None
    }

    #[must_use]
    pub fn active_index(&self) -> i64 {
        self.active_index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// The smoothed index shaders blend by.
    #[must_use]
    pub fn visual_index(&self) -> f64 {
        self.visual_index
    }

    #[must_use]
    pub fn rotation_remaining(&self) -> f64 {
        self.rotation_remaining
    }

    /// Accumulated rotation applied so far, i.e. the mesh's current yaw.
    #[must_use]
    pub fn spin(&self) -> f64 {
        self.spin
    }

    /// Whether a rotation is still catching up to the logical index.
    #[must_use]
    pub fn is_rotating(&self) -> bool {
        self.rotation_remaining != 0.0
    }
}
