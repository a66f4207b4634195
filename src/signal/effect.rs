use crate::runtime::{ReactiveRuntime, RuntimeInner};
use std::sync::{Arc, RwLock, Weak};

/// A side effect that runs when its dependencies change.
///
/// Effects automatically track signal and memo reads and re-run when those
/// change. The effect runs immediately on creation to establish its initial
/// dependencies. Dropping the `Effect` unsubscribes it.
///
/// # Examples
///
/// ```
/// use marquee::{Effect, Signal};
/// use std::sync::{Arc, atomic::{AtomicI32, Ordering}};
///
/// let signal = Signal::new(5);
/// let last_value = Arc::new(AtomicI32::new(0));
///
/// let _effect = Effect::new({
///     let signal = signal.clone();
///     let last_value = last_value.clone();
///     move || last_value.store(signal.get(), Ordering::SeqCst)
/// });
///
/// assert_eq!(last_value.load(Ordering::SeqCst), 5);
///
/// signal.set(10);
/// assert_eq!(last_value.load(Ordering::SeqCst), 10);
/// ```
#[must_use = "dropping an Effect unsubscribes it"]
pub struct Effect {
    run: Arc<dyn Fn() + Send + Sync>,
    id: usize,
    runtime: Weak<RwLock<RuntimeInner>>,
}

impl Effect {
    /// Create a new effect in the current runtime.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new_in(&ReactiveRuntime::current(), effect)
    }

    /// Create a new effect owned by `runtime`.
    pub fn new_in<F>(runtime: &Arc<ReactiveRuntime>, effect: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = runtime.next_id();
        let effect: Arc<dyn Fn() + Send + Sync> = Arc::new(effect);
        let effect_clone = Arc::clone(&effect);

        runtime.create_observer(id, move || {
            effect_clone();
        });

        // Run immediately within the observer context to track dependencies
        runtime.with_observer(id, || {
            effect();
        });

        Self {
            run: effect,
            id,
            runtime: Arc::downgrade(&runtime.inner()),
        }
    }

    /// Manually trigger the effect. Reads made here are not tracked.
    pub fn run(&self) {
        (self.run)();
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.upgrade() {
            if let Ok(mut runtime) = runtime.write() {
                runtime.remove_observer(self.id);
            }
        }
    }
}

/// Create a new effect that runs when dependencies change.
///
/// The effect runs immediately and then again whenever any signal
/// it reads changes.
pub fn create_effect<F>(effect: F) -> Effect
where
    F: Fn() + Send + Sync + 'static,
{
    Effect::new(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{create_memo, create_signal};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn effect_runs_immediately() {
        ReactiveRuntime::scope(|| {
            let counter = Arc::new(AtomicUsize::new(0));
            let counter_clone = counter.clone();

            let _effect = create_effect(move || {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            });

            assert_eq!(counter.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn effect_follows_memo_chain() {
        ReactiveRuntime::scope(|| {
            let seen = Arc::new(AtomicUsize::new(0));
            let input = create_signal(1usize);
            let doubled = create_memo({
                let input = input.clone();
                move || input.get() * 2
            });

            let _effect = create_effect({
                let seen = seen.clone();
                move || seen.store(doubled.get(), Ordering::SeqCst)
            });
            assert_eq!(seen.load(Ordering::SeqCst), 2);

            input.set(21);
            assert_eq!(seen.load(Ordering::SeqCst), 42);
        });
    }

    #[test]
    fn dropped_effect_stops_running() {
        ReactiveRuntime::scope(|| {
            let counter = Arc::new(AtomicUsize::new(0));
            let signal = create_signal(0);

            let effect = create_effect({
                let counter = counter.clone();
                let signal = signal.clone();
                move || {
                    let _ = signal.get();
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            });
            signal.set(1);
            assert_eq!(counter.load(Ordering::SeqCst), 2);

            drop(effect);
            signal.set(2);
            assert_eq!(counter.load(Ordering::SeqCst), 2);
        });
    }
}
