use std::rc::Rc;

use super::effect::create_effect;
use super::effect::Effect;
use super::signal::{create_signal, Signal};

/// Eager derived value that recomputes when its dependencies change.
///
/// A `Memo<T>` re-evaluates whenever any signal it reads changes, but only
/// notifies its own subscribers when the computed result actually differs
/// (`PartialEq`). The timer uses memos for display values: `minutes` and
/// `seconds` derived from `remaining`, and the progress fraction — a
/// subscriber watching `minutes` is not re-run sixty times a minute.
pub struct Memo<T: Clone + PartialEq + 'static> {
    signal: Signal<T>,
    // Keeps the recomputing effect subscribed for as long as any clone of
    // the memo is alive.
    _effect: Rc<Effect>,
}

impl<T: Clone + PartialEq + 'static> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
            _effect: self._effect.clone(),
        }
    }
}

/// Create an eagerly-evaluated memo.
///
/// # Example
///
/// ```
/// use clessidra::reactive::{create_memo, create_signal};
///
/// let remaining = create_signal(75u32);
/// let r = remaining.clone();
/// let minutes = create_memo(move || r.get() / 60);
///
/// assert_eq!(minutes.get(), 1);
/// remaining.set(59);
/// assert_eq!(minutes.get(), 0);
/// ```
pub fn create_memo<T, F>(f: F) -> Memo<T>
where
    T: Clone + PartialEq + 'static,
    F: Fn() -> T + 'static,
{
    let signal = create_signal(f());
    // The effect establishes dependencies on its first run and re-runs on
    // every dependency change; Signal::set's PartialEq gate is what turns
    // this into change-only notification downstream.
    let sink = signal.clone();
    let effect = create_effect(move || {
        sink.set(f());
    });
    Memo {
        signal,
        _effect: Rc::new(effect),
    }
}

impl<T: Clone + PartialEq + 'static> Memo<T> {
    /// Get the current value (tracked as a dependency).
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Get the current value without dependency tracking.
    pub fn get_untracked(&self) -> T {
        self.signal.get_untracked()
    }

    /// Borrow the current value (tracked as a dependency).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.signal.with(f)
    }
}
