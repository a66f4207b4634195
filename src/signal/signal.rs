use crate::runtime::ReactiveRuntime;
use std::sync::{Arc, RwLock};

/// A reactive signal that holds a value and notifies subscribers when changed.
///
/// Clones share the same cell, so a write through one clone is seen by all.
/// A signal belongs to the runtime it was created in: its reads and writes are
/// tracked there no matter which runtime is current at the call site.
#[derive(Clone)]
pub struct Signal<T> {
    value: Arc<RwLock<T>>,
    id: usize,
    runtime: Arc<ReactiveRuntime>,
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    /// Create a new signal in the current runtime.
    pub fn new(initial: T) -> Self {
        Self::new_in(&ReactiveRuntime::current(), initial)
    }

    /// Create a new signal owned by `runtime`.
    pub fn new_in(runtime: &Arc<ReactiveRuntime>, initial: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(initial)),
            id: runtime.next_id(),
            runtime: Arc::clone(runtime),
        }
    }

    /// Get the current value of the signal.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Set a new value for the signal.
    pub fn set(&self, new_value: T) {
        *self.value.write().unwrap() = new_value;
        self.runtime.notify_observers(self.id);
    }

    /// Update the value using a function.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut value = self.value.write().unwrap();
        let result = f(&mut *value);
        drop(value); // Release the write lock before notifying
        self.runtime.notify_observers(self.id);
        result
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.runtime.track_read(self.id);
        let value = self.value.read().unwrap();
        f(&*value)
    }

    /// Read the value without registering a dependency.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.value.read().unwrap();
        f(&*value)
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// A read-only handle onto the same value.
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            inner: self.clone(),
        }
    }

    /// Whether both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

/// Read-only view of a [`Signal`].
///
/// Reads are tracked exactly like reads on the signal itself; there is no way
/// to write through this handle.
#[derive(Clone)]
pub struct ReadSignal<T> {
    inner: Signal<T>,
}

impl<T: Clone + Send + Sync + 'static> ReadSignal<T> {
    pub fn get(&self) -> T {
        self.inner.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    pub fn id(&self) -> usize {
        self.inner.id()
    }

    /// Whether this handle views the given signal.
    pub fn is(&self, signal: &Signal<T>) -> bool {
        self.inner.ptr_eq(signal)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &*self.value.read().unwrap())
            .finish()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ReadSignal").field(&self.inner).finish()
    }
}

/// Create a new signal.
pub fn create_signal<T>(initial: T) -> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    Signal::new(initial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_update() {
        ReactiveRuntime::scope(|| {
            let signal = create_signal(0);
            assert_eq!(signal.get(), 0);
            signal.set(42);
            assert_eq!(signal.get(), 42);
            let old = signal.update(|n| std::mem::replace(n, 52));
            assert_eq!(old, 42);
            assert_eq!(signal.get(), 52);
        });
    }

    #[test]
    fn read_only_sees_writes() {
        ReactiveRuntime::scope(|| {
            let signal = Signal::new(String::from("a"));
            let reader = signal.read_only();
            signal.set("b".to_string());
            assert_eq!(reader.get(), "b");
            assert!(reader.is(&signal));
            assert!(!reader.is(&Signal::new(String::from("b"))));
        });
    }

    #[test]
    fn writes_notify_the_owning_runtime() {
        let home = ReactiveRuntime::new();
        let (source, doubled) = ReactiveRuntime::with_runtime(home.clone(), || {
            let source = Signal::new(1);
            let doubled = crate::signal::create_memo({
                let source = source.clone();
                move || source.get() * 2
            });
            (source, doubled)
        });
        assert_eq!(doubled.get(), 2);

        ReactiveRuntime::scope(|| source.set(5));
        assert_eq!(doubled.get(), 10);
    }
}
