use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

/// What a tick callback tells its scheduler to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickAction {
    /// Re-arm one period from now
    Continue,
    /// Drop the schedule
    Stop,
}

/// Tick callback installed by the engine.
pub type TickCallback = Box<dyn FnMut() -> TickAction>;

/// A cancelable periodic-callback source.
///
/// This is the only capability the engine consumes from its environment:
/// fire a callback once per fixed period, first fire one period after
/// scheduling, cancelable through a handle. [`CalloopScheduler`] is the
/// event-loop implementation; [`ManualScheduler`] drives ticks by hand.
pub trait Scheduler {
    /// Handle used to cancel a schedule.
    type Handle;

    /// Schedule `tick` to fire every `period`, starting one period from now.
    fn schedule(&mut self, period: Duration, tick: TickCallback) -> Self::Handle;

    /// Cancel a schedule. Canceling one that already stopped is a no-op.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Scheduler backed by a `calloop` timer source.
///
/// Re-arming uses `TimeoutAction::ToDuration`, so each tick is scheduled
/// one period after the previous callback ran. A tick the loop delivers
/// late therefore produces exactly one callback and re-anchors the
/// schedule at the late fire; missed time is never made up by extra ticks.
pub struct CalloopScheduler<'l, Data> {
    handle: LoopHandle<'l, Data>,
}

impl<'l, Data> CalloopScheduler<'l, Data> {
    pub fn new(handle: LoopHandle<'l, Data>) -> Self {
        Self { handle }
    }
}

impl<'l, Data> Scheduler for CalloopScheduler<'l, Data> {
    type Handle = RegistrationToken;

    fn schedule(&mut self, period: Duration, mut tick: TickCallback) -> Self::Handle {
        self.handle
            .insert_source(Timer::from_duration(period), move |_deadline, _, _| {
                match tick() {
                    TickAction::Continue => TimeoutAction::ToDuration(period),
                    TickAction::Stop => TimeoutAction::Drop,
                }
            })
            .expect("failed to register timer source")
    }

    fn cancel(&mut self, handle: Self::Handle) {
        self.handle.remove(handle);
    }
}

/// Scheduler whose ticks are fired by the caller.
///
/// Clones share the same schedule table, so a host (or a test) can keep
/// one clone to drive ticks while the engine owns another. Timing is up to
/// the driver; `fire` runs every active callback exactly once regardless
/// of the requested period.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    slots: Rc<RefCell<Vec<Option<TickCallback>>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every active schedule once.
    pub fn fire(&self) {
        let len = self.slots.borrow().len();
        for index in 0..len {
            // The callback is taken out of the table while it runs so it
            // can cancel or reschedule without re-entering the borrow.
            let callback = self.slots.borrow_mut()[index].take();
            if let Some(mut callback) = callback {
                if callback() == TickAction::Continue {
                    let mut slots = self.slots.borrow_mut();
                    if slots[index].is_none() {
                        slots[index] = Some(callback);
                    }
                }
            }
        }
    }

    /// Number of currently active schedules.
    pub fn active(&self) -> usize {
        self.slots.borrow().iter().filter(|s| s.is_some()).count()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = usize;

    fn schedule(&mut self, _period: Duration, tick: TickCallback) -> Self::Handle {
        let mut slots = self.slots.borrow_mut();
        match slots.iter().position(|s| s.is_none()) {
            Some(index) => {
                slots[index] = Some(tick);
                index
            }
            None => {
                slots.push(Some(tick));
                slots.len() - 1
            }
        }
    }

    fn cancel(&mut self, handle: usize) {
        self.slots.borrow_mut()[handle] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_manual_scheduler_fires_until_stopped() {
        let mut scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(0));

        let count = fired.clone();
        scheduler.schedule(
            Duration::from_secs(1),
            Box::new(move || {
                count.set(count.get() + 1);
                if count.get() < 3 {
                    TickAction::Continue
                } else {
                    TickAction::Stop
                }
            }),
        );

        for _ in 0..5 {
            scheduler.fire();
        }
        assert_eq!(fired.get(), 3);
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_manual_scheduler_cancel() {
        let mut scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(0));

        let count = fired.clone();
        let handle = scheduler.schedule(
            Duration::from_secs(1),
            Box::new(move || {
                count.set(count.get() + 1);
                TickAction::Continue
            }),
        );

        scheduler.fire();
        scheduler.cancel(handle);
        scheduler.fire();

        assert_eq!(fired.get(), 1);
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_manual_scheduler_slot_reuse() {
        let mut scheduler = ManualScheduler::new();

        let first = scheduler.schedule(Duration::from_secs(1), Box::new(|| TickAction::Continue));
        scheduler.cancel(first);
        let second = scheduler.schedule(Duration::from_secs(1), Box::new(|| TickAction::Continue));

        assert_eq!(first, second);
        assert_eq!(scheduler.active(), 1);
    }
}
