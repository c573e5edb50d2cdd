use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::reactive::{batch, create_memo, create_signal, Memo, ReadSignal, Signal};

use super::scheduler::{Scheduler, TickAction};

/// Default countdown duration in seconds.
pub const DEFAULT_DURATION: u32 = 90;

/// Period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Point-in-time view of the countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerSnapshot {
    /// Seconds left in the countdown
    pub remaining: u32,
    /// True when no tick schedule is active
    pub paused: bool,
}

impl TimerSnapshot {
    /// Whole minutes left, for display.
    pub fn minutes(&self) -> u32 {
        self.remaining / 60
    }

    /// Seconds within the current minute, for display.
    pub fn seconds(&self) -> u32 {
        self.remaining % 60
    }
}

/// The countdown state machine.
///
/// Owns the authoritative `(remaining, paused)` state as a pair of
/// signals, schedules the per-second decrement through its [`Scheduler`],
/// and accepts the three control commands. All commands are total: calling
/// one in a state where it does not apply is a no-op, never an error.
///
/// Created at `remaining == total`, paused. `start` counts down from
/// whatever `remaining` holds, which is how pause/resume works — "paused
/// mid-countdown" and "idle" have the same shape and differ only in the
/// `remaining` value. Reaching zero performs the same transition as
/// [`TimerEngine::stop`]: reset to full, paused.
pub struct TimerEngine<S: Scheduler> {
    total: u32,
    remaining: Signal<u32>,
    paused: Signal<bool>,
    minutes: Memo<u32>,
    seconds: Memo<u32>,
    /// Bumped on every control operation; ticks scheduled under an older
    /// epoch refuse to mutate state.
    epoch: Rc<Cell<u64>>,
    scheduler: S,
    tick: Option<S::Handle>,
}

impl<S: Scheduler> TimerEngine<S> {
    /// Engine with the default 90-second duration.
    pub fn new(scheduler: S) -> Self {
        Self::with_total(DEFAULT_DURATION, scheduler)
    }

    /// Engine counting down from `total` seconds.
    pub fn with_total(total: u32, scheduler: S) -> Self {
        assert!(total > 0, "countdown duration must be at least one second");

        let remaining = create_signal(total);
        let paused = create_signal(true);

        let r = remaining.clone();
        let minutes = create_memo(move || r.get() / 60);
        let r = remaining.clone();
        let seconds = create_memo(move || r.get() % 60);

        log::info!("timer engine created, total {total}s");

        Self {
            total,
            remaining,
            paused,
            minutes,
            seconds,
            epoch: Rc::new(Cell::new(0)),
            scheduler,
            tick: None,
        }
    }

    /// Begin (or resume) counting down.
    ///
    /// No-op while already running. The tick schedule is re-anchored at
    /// this call: the first decrement lands one period from now, never on
    /// the cadence of an earlier run.
    pub fn start(&mut self) {
        if !self.paused.get_untracked() {
            return;
        }

        self.bump_epoch();
        // While paused there is no live schedule; whatever handle is still
        // stored belongs to one that already stopped itself.
        self.tick = None;

        let remaining = self.remaining.clone();
        let paused = self.paused.clone();
        let total = self.total;
        let epoch = self.epoch.clone();
        let tick_epoch = epoch.get();

        log::debug!(
            "start: counting down from {}s",
            remaining.get_untracked()
        );
        self.paused.set(false);

        let handle = self.scheduler.schedule(
            TICK_PERIOD,
            Box::new(move || {
                if epoch.get() != tick_epoch || paused.get_untracked() {
                    log::trace!("dropping stale tick");
                    return TickAction::Stop;
                }

                let value = remaining.get_untracked();
                if value == 0 {
                    // Completion folds into the stop transition.
                    log::info!("countdown finished, resetting to {total}s");
                    batch(|| {
                        paused.set(true);
                        remaining.set(total);
                    });
                    return TickAction::Stop;
                }

                remaining.set(value - 1);
                TickAction::Continue
            }),
        );
        self.tick = Some(handle);
    }

    /// Suspend the countdown, preserving `remaining`.
    ///
    /// No-op while already paused (including after a stop or completion).
    pub fn pause(&mut self) {
        if self.paused.get_untracked() {
            return;
        }

        self.bump_epoch();
        if let Some(handle) = self.tick.take() {
            self.scheduler.cancel(handle);
        }

        log::debug!("pause: holding at {}s", self.remaining.get_untracked());
        self.paused.set(true);
    }

    /// Cancel the countdown and reset to the full duration.
    pub fn stop(&mut self) {
        self.bump_epoch();
        if !self.paused.get_untracked() {
            if let Some(handle) = self.tick.take() {
                self.scheduler.cancel(handle);
            }
        }

        log::debug!("stop: resetting to {}s", self.total);
        batch(|| {
            self.paused.set(true);
            self.remaining.set(self.total);
        });
    }

    /// The play/pause button: start if paused, pause otherwise.
    pub fn play_pause(&mut self) {
        if self.paused.get_untracked() {
            self.start();
        } else {
            self.pause();
        }
    }

    /// Configured total duration in seconds.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Current `(remaining, paused)` view.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining: self.remaining.get_untracked(),
            paused: self.paused.get_untracked(),
        }
    }

    /// Reactive handle to the seconds left.
    pub fn remaining(&self) -> ReadSignal<u32> {
        self.remaining.clone().split().0
    }

    /// Reactive handle to the paused flag.
    pub fn paused(&self) -> ReadSignal<bool> {
        self.paused.clone().split().0
    }

    /// Whole minutes left, derived for display.
    pub fn minutes(&self) -> Memo<u32> {
        self.minutes.clone()
    }

    /// Seconds within the current minute, derived for display.
    pub fn seconds(&self) -> Memo<u32> {
        self.seconds.clone()
    }

    fn bump_epoch(&self) {
        self.epoch.set(self.epoch.get() + 1);
    }
}
