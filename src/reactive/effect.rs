use super::runtime::{run_effect, with_runtime, EffectId};

/// A subscription to reactive state.
///
/// The closure runs once immediately when the effect is created, which is
/// how a late subscriber observes the current `(remaining, paused)`
/// snapshot without waiting for the next tick. After that it re-runs
/// whenever any signal it read changes, in write order.
///
/// Dropping the effect unsubscribes it; a tick that lands afterwards
/// notifies nobody.
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let id = with_runtime(|rt| rt.allocate_effect(Box::new(f)));
        run_effect(id);
        Self { id }
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        with_runtime(|rt| rt.dispose_effect(self.id));
    }
}

pub fn create_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    Effect::new(f)
}
