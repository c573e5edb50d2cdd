use std::sync::{Arc, RwLock};

use super::runtime::{notify, try_with_runtime, with_runtime, SignalId};
use super::wakeup::request_redraw;

struct SignalInner<T> {
    id: SignalId,
    value: RwLock<T>,
}

/// A reactive, observable value.
///
/// Signals carry the countdown's observable state (`remaining` seconds and
/// the `paused` flag). When a signal's value changes, every effect that
/// read it is re-run, and a redraw of the host event loop is requested.
///
/// Writes are change-detected: setting a signal to the value it already
/// holds notifies nobody. That is what makes the control operations of the
/// timer idempotent from a subscriber's point of view.
///
/// # Thread safety
/// The value itself can be read and written from any thread. Effects
/// belong to the thread that created them; a write from another thread
/// updates the value but only wakes the event loop, which re-reads signal
/// values when it redraws.
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = with_runtime(|rt| rt.allocate_signal());
        Self {
            inner: Arc::new(SignalInner {
                id,
                value: RwLock::new(value),
            }),
        }
    }

    /// Split into a read-only and a write-only handle.
    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (
            ReadSignal {
                inner: self.inner.clone(),
            },
            WriteSignal { inner: self.inner },
        )
    }
}

impl<T: Clone> Signal<T> {
    /// Get the current value, tracked as a dependency of the running effect.
    pub fn get(&self) -> T {
        try_with_runtime(|rt| rt.track_read(self.inner.id));
        self.inner
            .value
            .read()
            .expect("signal lock poisoned")
            .clone()
    }

    /// Get the current value without dependency tracking.
    pub fn get_untracked(&self) -> T {
        self.inner
            .value
            .read()
            .expect("signal lock poisoned")
            .clone()
    }
}

impl<T: PartialEq> Signal<T> {
    /// Set the value, notifying subscribers only if it actually changed.
    pub fn set(&self, value: T) {
        let Ok(mut guard) = self.inner.value.write() else {
            return; // Lock poisoned, skip update silently
        };
        if *guard != value {
            *guard = value;
            drop(guard);
            notify(self.inner.id);
            request_redraw();
        }
    }
}

impl<T: PartialEq + Clone> Signal<T> {
    /// Update the value in place, notifying subscribers only on real change.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let Ok(mut guard) = self.inner.value.write() else {
            return; // Lock poisoned, skip update silently
        };
        let old_value = guard.clone();
        f(&mut guard);
        if *guard != old_value {
            drop(guard);
            notify(self.inner.id);
            request_redraw();
        }
    }
}

impl<T> Signal<T> {
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        try_with_runtime(|rt| rt.track_read(self.inner.id));
        f(&self.inner.value.read().expect("signal lock poisoned"))
    }

    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.read().expect("signal lock poisoned"))
    }
}

/// Read-only handle to a signal, the shape handed to the renderer.
pub struct ReadSignal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> ReadSignal<T> {
    pub fn get(&self) -> T {
        try_with_runtime(|rt| rt.track_read(self.inner.id));
        self.inner
            .value
            .read()
            .expect("signal lock poisoned")
            .clone()
    }

    pub fn get_untracked(&self) -> T {
        self.inner
            .value
            .read()
            .expect("signal lock poisoned")
            .clone()
    }
}

impl<T> ReadSignal<T> {
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        try_with_runtime(|rt| rt.track_read(self.inner.id));
        f(&self.inner.value.read().expect("signal lock poisoned"))
    }
}

/// Write-only handle to a signal.
pub struct WriteSignal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: PartialEq> WriteSignal<T> {
    /// Set the value, notifying subscribers only if it actually changed.
    pub fn set(&self, value: T) {
        let Ok(mut guard) = self.inner.value.write() else {
            return;
        };
        if *guard != value {
            *guard = value;
            drop(guard);
            notify(self.inner.id);
            request_redraw();
        }
    }
}

pub fn create_signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_signal_and_get() {
        let signal = create_signal(90u32);
        assert_eq!(signal.get(), 90);
    }

    #[test]
    fn test_set_updates_value() {
        let signal = create_signal(10);
        signal.set(20);
        assert_eq!(signal.get(), 20);
    }

    #[test]
    fn test_update_with_closure() {
        let signal = create_signal(5);
        signal.update(|v| *v -= 1);
        assert_eq!(signal.get(), 4);
    }

    #[test]
    fn test_with_for_borrowing() {
        let signal = create_signal(String::from("01:30"));
        let length = signal.with(|s| s.len());
        assert_eq!(length, 5);
    }

    #[test]
    fn test_split_into_read_write_handles() {
        let signal = create_signal(7);
        let (read, write) = signal.split();

        assert_eq!(read.get(), 7);
        write.set(14);
        assert_eq!(read.get(), 14);
    }

    #[test]
    fn test_clone_shares_underlying_value() {
        let a = create_signal(50);
        let b = a.clone();

        a.set(75);
        assert_eq!(b.get(), 75);

        b.set(100);
        assert_eq!(a.get(), 100);
    }

    #[test]
    fn test_get_untracked() {
        let signal = create_signal(true);
        assert!(signal.get_untracked());
    }
}
