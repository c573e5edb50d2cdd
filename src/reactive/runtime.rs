use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

pub type SignalId = usize;
pub type EffectId = usize;

struct EffectSlot {
    /// Taken out while the callback runs, None forever once disposed.
    callback: Option<Box<dyn FnMut()>>,
    /// Signals this effect read during its last run.
    dependencies: HashSet<SignalId>,
    disposed: bool,
}

/// Thread-local dependency graph connecting signals to the effects that
/// read them.
///
/// Reads performed while an effect is running are recorded as dependencies;
/// a write to a signal queues every dependent effect, and the queue is
/// flushed as soon as no batch is open. Effect callbacks always run with
/// the runtime borrow released, so they are free to read and write signals
/// themselves.
#[derive(Default)]
pub struct Runtime {
    current_effect: Option<EffectId>,
    pending_effects: HashSet<EffectId>,
    effects: Vec<EffectSlot>,
    signal_subscribers: Vec<HashSet<EffectId>>,
    batch_depth: usize,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_signal(&mut self) -> SignalId {
        self.signal_subscribers.push(HashSet::new());
        self.signal_subscribers.len() - 1
    }

    pub fn allocate_effect(&mut self, callback: Box<dyn FnMut()>) -> EffectId {
        self.effects.push(EffectSlot {
            callback: Some(callback),
            dependencies: HashSet::new(),
            disposed: false,
        });
        self.effects.len() - 1
    }

    pub fn track_read(&mut self, signal_id: SignalId) {
        // The signal may have been created on another thread; ignore ids
        // this runtime never allocated.
        if signal_id >= self.signal_subscribers.len() {
            return;
        }

        if let Some(effect_id) = self.current_effect {
            self.signal_subscribers[signal_id].insert(effect_id);
            self.effects[effect_id].dependencies.insert(signal_id);
        }
    }

    fn queue_write(&mut self, signal_id: SignalId) {
        if signal_id >= self.signal_subscribers.len() {
            return;
        }
        self.pending_effects
            .extend(self.signal_subscribers[signal_id].iter().copied());
    }

    pub fn dispose_effect(&mut self, effect_id: EffectId) {
        let deps = std::mem::take(&mut self.effects[effect_id].dependencies);
        for signal_id in deps {
            if signal_id < self.signal_subscribers.len() {
                self.signal_subscribers[signal_id].remove(&effect_id);
            }
        }
        self.effects[effect_id].callback = None;
        self.effects[effect_id].disposed = true;
        self.pending_effects.remove(&effect_id);
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Try to access the runtime without panicking on re-entrancy.
///
/// Signal reads and writes can land while the runtime is already borrowed
/// (for bookkeeping between effect runs); in that case the call is skipped
/// and the write still lands in the signal's own storage.
pub fn try_with_runtime<F>(f: F)
where
    F: FnOnce(&mut Runtime),
{
    RUNTIME.with(|rt| {
        if let Ok(mut runtime) = rt.try_borrow_mut() {
            f(&mut runtime);
        }
    });
}

/// Run a single effect, re-tracking its dependencies.
pub fn run_effect(effect_id: EffectId) {
    let callback = with_runtime(|rt| {
        // Re-tracking starts from a clean slate so dependencies that are
        // no longer read stop retriggering the effect.
        let old_deps = std::mem::take(&mut rt.effects[effect_id].dependencies);
        for signal_id in old_deps {
            rt.signal_subscribers[signal_id].remove(&effect_id);
        }
        rt.effects[effect_id].callback.take()
    });

    let Some(mut callback) = callback else {
        return;
    };

    let prev = with_runtime(|rt| std::mem::replace(&mut rt.current_effect, Some(effect_id)));
    callback();
    with_runtime(|rt| {
        rt.current_effect = prev;
        // The effect may have been disposed while its callback ran.
        if !rt.effects[effect_id].disposed {
            rt.effects[effect_id].callback = Some(callback);
        }
    });
}

/// Queue the dependents of a signal and flush unless a batch is open.
pub fn notify(signal_id: SignalId) {
    try_with_runtime(|rt| rt.queue_write(signal_id));
    flush();
}

/// Run queued effects until the queue is empty.
pub fn flush() {
    loop {
        let pending: Vec<EffectId> = with_runtime(|rt| {
            if rt.batch_depth > 0 {
                return Vec::new();
            }
            rt.pending_effects.drain().collect()
        });
        if pending.is_empty() {
            break;
        }
        for effect_id in pending {
            run_effect(effect_id);
        }
    }
}

/// Run `f` with effect flushing deferred until it returns.
///
/// Used for transitions that touch several signals at once (stopping the
/// countdown writes both `remaining` and `paused`); subscribers observe a
/// single combined update instead of two intermediate ones.
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_runtime(|rt| rt.batch_depth += 1);
    let result = f();
    with_runtime(|rt| rt.batch_depth -= 1);
    flush();
    result
}
