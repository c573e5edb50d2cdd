//! Interpolation layer turning discrete progress targets into smooth motion.
//!
//! The countdown produces one new progress fraction per second; the
//! renderer hands each fraction to an [`AnimationState`] and advances it
//! once per frame. The [`Transition`] attached to a retarget decides how
//! long the sweep takes (see [`crate::progress::ProgressMapper`] for the
//! countdown's duration policy).

mod animatable;
mod timing;

pub use animatable::Animatable;
pub use timing::TimingFunction;

use std::time::Instant;

/// Configuration for how a value should animate when it changes
#[derive(Clone, Debug)]
pub struct Transition {
    /// Duration of the animation in milliseconds
    pub duration_ms: f32,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
    /// Delay before animation starts in milliseconds
    pub delay_ms: f32,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration_ms: f32, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
            delay_ms: 0.0,
        }
    }

    /// Set the delay before the animation starts
    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the duration of the animation
    pub fn duration(mut self, duration_ms: f32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the timing function
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(100.0, TimingFunction::Linear)
    }
}

/// Result of advancing an animation, indicating whether the value changed
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult<T> {
    /// Value did not change (animation not running or same value)
    NoChange,
    /// Value changed to a new value
    Changed(T),
}

impl<T> AdvanceResult<T> {
    /// Returns true if the value changed
    pub fn is_changed(&self) -> bool {
        matches!(self, AdvanceResult::Changed(_))
    }
}

/// Animation state for a single animated value.
///
/// Holds the currently displayed value and interpolates it toward a target
/// against wall-clock time. Retargeting mid-flight starts the new sweep
/// from the currently displayed value, which is what keeps a pause/resume
/// or an early stop from visually jumping.
pub struct AnimationState<T: Animatable> {
    /// Current interpolated value
    current: T,
    /// Value the animation is heading toward
    target: T,
    /// Value when the current sweep started
    start: T,
    /// Progress from 0.0 to 1.0
    progress: f32,
    /// Time when the current sweep started
    start_time: Instant,
    /// Transition configuration
    transition: Transition,
}

impl<T: Animatable> AnimationState<T> {
    pub fn new(initial_value: T, transition: Transition) -> Self {
        Self {
            current: initial_value.clone(),
            target: initial_value.clone(),
            start: initial_value,
            progress: 1.0, // Start completed
            start_time: Instant::now(),
            transition,
        }
    }

    /// Start animating to a new target value.
    pub fn animate_to(&mut self, new_target: T) {
        // Don't restart if we're already animating to this target
        if new_target == self.target {
            return;
        }

        self.start = self.current.clone();
        self.target = new_target;
        self.progress = 0.0;
        self.start_time = Instant::now();
    }

    /// Retarget with a per-step transition.
    ///
    /// The countdown swaps the transition on every step (a reset to full
    /// sweeps slower than a tick), so the new configuration is applied
    /// before the retarget.
    pub fn animate_with(&mut self, new_target: T, transition: Transition) {
        self.transition = transition;
        self.animate_to(new_target);
    }

    /// Advance the animation and return whether the displayed value changed
    pub fn advance(&mut self) -> AdvanceResult<T> {
        if self.progress >= 1.0 {
            return AdvanceResult::NoChange;
        }

        let elapsed = self.start_time.elapsed().as_secs_f32() * 1000.0;
        let adjusted_elapsed = elapsed - self.transition.delay_ms;

        if adjusted_elapsed < 0.0 {
            // Still in delay period
            return AdvanceResult::NoChange;
        }

        // A zero-length transition divides to NaN here; `min` resolves
        // that to 1.0, completing the sweep in a single advance.
        let t = (adjusted_elapsed / self.transition.duration_ms).min(1.0);
        let eased_t = self.transition.timing.evaluate(t);
        let new_value = T::lerp(&self.start, &self.target, eased_t);
        self.progress = t;

        if new_value != self.current {
            self.current = new_value.clone();
            AdvanceResult::Changed(new_value)
        } else {
            AdvanceResult::NoChange
        }
    }

    /// Check if animation is still running
    pub fn is_animating(&self) -> bool {
        self.progress < 1.0
    }

    /// Get current displayed value
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Get target value
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Set value immediately without animation
    pub fn set_immediate(&mut self, value: T) {
        self.current = value.clone();
        self.target = value.clone();
        self.start = value;
        self.progress = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_state_new() {
        let state = AnimationState::new(100.0f32, Transition::default());

        assert_eq!(*state.current(), 100.0);
        assert_eq!(*state.target(), 100.0);
        assert!(!state.is_animating()); // Starts completed
    }

    #[test]
    fn test_animate_to_starts_sweep() {
        let mut state = AnimationState::new(100.0f32, Transition::default());

        state.animate_to(98.0);

        assert_eq!(*state.target(), 98.0);
        assert!(state.is_animating());
    }

    #[test]
    fn test_animate_to_same_target_is_noop() {
        let mut state = AnimationState::new(100.0f32, Transition::default());

        state.animate_to(98.0);
        let anchor = state.start_time;

        state.animate_to(98.0);
        assert_eq!(state.start_time, anchor);
    }

    #[test]
    fn test_animate_with_swaps_transition() {
        let mut state = AnimationState::new(0.0f32, Transition::default());

        state.animate_with(100.0, Transition::new(1000.0, TimingFunction::Linear));
        assert_eq!(state.transition.duration_ms, 1000.0);
        assert!(state.is_animating());
    }

    #[test]
    fn test_zero_duration_completes_in_one_advance() {
        let mut state = AnimationState::new(0.0f32, Transition::new(0.0, TimingFunction::Linear));

        state.animate_to(100.0);
        assert_eq!(state.advance(), AdvanceResult::Changed(100.0));
        assert!(!state.is_animating());
        assert_eq!(state.advance(), AdvanceResult::NoChange);
    }

    #[test]
    fn test_set_immediate() {
        let mut state = AnimationState::new(0.0f32, Transition::default());

        state.animate_to(100.0);
        state.set_immediate(50.0);

        assert_eq!(*state.current(), 50.0);
        assert_eq!(*state.target(), 50.0);
        assert!(!state.is_animating());
    }
}
