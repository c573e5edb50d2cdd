//! Mapping from the discrete countdown to the animated progress arc.

use crate::animation::{TimingFunction, Transition};

/// Duration of the sweep back to full on a reset, in milliseconds.
const RESET_SWEEP_MS: f32 = 1000.0;

/// Duration of a per-second step, in milliseconds.
const TICK_STEP_MS: f32 = 100.0;

/// One update for the renderer to animate toward.
#[derive(Clone, Debug)]
pub struct ProgressTarget {
    /// Progress in `[0, 100]`
    pub fraction: u32,
    /// How to animate from the previously displayed value
    pub transition: Transition,
}

/// Pure projection of `remaining` seconds onto a 0–100 progress fraction.
///
/// The mapper holds only the immutable total duration: replaying the same
/// sequence of `remaining` values always produces the same sequence of
/// targets.
#[derive(Clone, Copy, Debug)]
pub struct ProgressMapper {
    total: u32,
}

impl ProgressMapper {
    pub fn new(total: u32) -> Self {
        assert!(total > 0, "countdown duration must be at least one second");
        Self { total }
    }

    /// `remaining * 100 / total`, truncating toward zero.
    ///
    /// Truncation is deliberate: 1 of 90 seconds is fraction 1, not a
    /// rounded 1.11.
    pub fn fraction(&self, remaining: u32) -> u32 {
        remaining * 100 / self.total
    }

    /// Animation policy for a new fraction.
    ///
    /// A fraction of 100 means the countdown was reset to full, and the
    /// arc sweeps back slowly; every per-second step stays crisp.
    pub fn transition_for(fraction: u32) -> Transition {
        let duration_ms = if fraction == 100 {
            RESET_SWEEP_MS
        } else {
            TICK_STEP_MS
        };
        Transition::new(duration_ms, TimingFunction::Linear)
    }

    /// Bundle the fraction and its transition for one `remaining` value.
    pub fn target(&self, remaining: u32) -> ProgressTarget {
        let fraction = self.fraction(remaining);
        ProgressTarget {
            fraction,
            transition: Self::transition_for(fraction),
        }
    }
}
