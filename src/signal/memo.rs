use crate::runtime::ReactiveRuntime;
use std::sync::{Arc, RwLock};

/// A memoized computed value that automatically tracks dependencies.
///
/// Memos only recompute when their dependencies change, and only when read.
#[derive(Clone)]
pub struct Memo<T> {
    compute: Arc<dyn Fn() -> T + Send + Sync>,
    cached: Arc<RwLock<Option<T>>>,
    id: usize,
    runtime: Arc<ReactiveRuntime>,
}

impl<T: Clone + 'static> Memo<T> {
    /// Create a new memo in the current runtime.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new_in(&ReactiveRuntime::current(), compute)
    }

    /// Create a new memo owned by `runtime`.
    pub fn new_in<F>(runtime: &Arc<ReactiveRuntime>, compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = runtime.next_id();
        runtime.register_memo(id);

        Self {
            compute: Arc::new(compute),
            cached: Arc::new(RwLock::new(None)),
            id,
            runtime: Arc::clone(runtime),
        }
    }

    /// Get the current value, recomputing if necessary.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Read the memoized value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let runtime = &self.runtime;
        runtime.track_read(self.id);

        {
            let cached = self.cached.read().unwrap();
            if let (false, Some(value)) = (runtime.is_memo_dirty(self.id), cached.as_ref()) {
                return f(value);
            }
        }

        // Recompute within observer context; reads from the last run are dropped
        let value = runtime.run_observer(self.id, || (self.compute)());
        let result = f(&value);
        *self.cached.write().unwrap() = Some(value);
        runtime.mark_memo_clean(self.id);
        result
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

/// Create a new memoized computation.
///
/// # Example
///
/// ```
/// use marquee::{create_memo, Signal};
///
/// let count = Signal::new(5);
/// let doubled = create_memo({
///     let count = count.clone();
///     move || count.get() * 2
/// });
/// assert_eq!(doubled.get(), 10);
/// ```
pub fn create_memo<T, F>(compute: F) -> Memo<T>
where
    T: Clone + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Memo::new(compute)
}
