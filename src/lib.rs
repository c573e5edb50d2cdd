//! Reactive countdown timer core.
//!
//! A fixed duration counts down once per second, drives an animated
//! circular-progress fraction, and exposes Play/Pause/Stop controls. The
//! crate is the *core* of such a screen: the presentation layer is an
//! external consumer that reads reactive state and dispatches commands.
//!
//! - [`timer::TimerEngine`] owns the countdown state machine and the tick
//!   schedule (a [`timer::Scheduler`], backed by a `calloop` timer source
//!   in event-loop hosts).
//! - [`reactive`] is the observable-state primitive: signals, effects and
//!   memos, plus a coalesced event-loop wakeup.
//! - [`progress::ProgressMapper`] projects remaining seconds onto a 0–100
//!   fraction with the per-update animation policy, and [`animation`]
//!   turns those targets into smooth motion.
//!
//! ```
//! use clessidra::prelude::*;
//!
//! let driver = ManualScheduler::new();
//! let mut engine = TimerEngine::new(driver.clone());
//! let mapper = ProgressMapper::new(engine.total());
//!
//! engine.start();
//! for _ in 0..5 {
//!     driver.fire();
//! }
//!
//! let snapshot = engine.snapshot();
//! assert_eq!(snapshot.remaining, 85);
//! assert_eq!(mapper.target(snapshot.remaining).fraction, 94);
//! ```

pub mod animation;
pub mod progress;
pub mod reactive;
pub mod timer;

pub mod prelude {
    pub use crate::animation::{AdvanceResult, Animatable, AnimationState, TimingFunction, Transition};
    pub use crate::progress::{ProgressMapper, ProgressTarget};
    pub use crate::reactive::{
        batch, create_effect, create_memo, create_signal, init_wakeup, take_redraw_request, Effect,
        Memo, ReadSignal, Signal, WriteSignal,
    };
    pub use crate::timer::{
        CalloopScheduler, ManualScheduler, Scheduler, TickAction, TimerEngine, TimerSnapshot,
        DEFAULT_DURATION, TICK_PERIOD,
    };
}
