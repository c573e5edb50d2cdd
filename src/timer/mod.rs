pub mod engine;
pub mod scheduler;

pub use engine::{TimerEngine, TimerSnapshot, DEFAULT_DURATION, TICK_PERIOD};
pub use scheduler::{CalloopScheduler, ManualScheduler, Scheduler, TickAction, TickCallback};
