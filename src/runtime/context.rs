use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Reactive context for tracking dependencies.
struct ReactiveContext {
    current_observer: Option<usize>,
    // Map from source ID (signal or memo) to the observers that read it
    dependencies: HashMap<usize, HashSet<usize>>,
    // Map from observer ID to the sources it read
    observer_deps: HashMap<usize, HashSet<usize>>,
    // Map from effect ID to the effect function
    observers: HashMap<usize, Arc<dyn Fn() + Send + Sync>>,
    // Map from memo ID to dirty state
    memo_dirty: HashMap<usize, bool>,
}

impl ReactiveContext {
    fn new() -> Self {
        Self {
            current_observer: None,
            dependencies: HashMap::new(),
            observer_deps: HashMap::new(),
            observers: HashMap::new(),
            memo_dirty: HashMap::new(),
        }
    }

    fn clear(&mut self) {
        self.current_observer = None;
        self.dependencies.clear();
        self.observer_deps.clear();
        self.observers.clear();
        self.memo_dirty.clear();
    }

    fn forget_dependencies(&mut self, observer_id: usize) {
        if let Some(old_deps) = self.observer_deps.remove(&observer_id) {
            for source_id in old_deps {
                if let Some(deps) = self.dependencies.get_mut(&source_id) {
                    deps.remove(&observer_id);
                    if deps.is_empty() {
                        self.dependencies.remove(&source_id);
                    }
                }
            }
        }
    }
}

/// Inner runtime state that can be shared.
pub struct RuntimeInner {
    context: Mutex<ReactiveContext>,
}

impl RuntimeInner {
    fn new() -> Self {
        Self {
            context: Mutex::new(ReactiveContext::new()),
        }
    }

    pub(crate) fn remove_observer(&mut self, observer_id: usize) {
        let mut ctx = self.context.lock().unwrap();
        ctx.observers.remove(&observer_id);
        ctx.memo_dirty.remove(&observer_id);
        ctx.forget_dependencies(observer_id);
    }

    fn clear(&mut self) {
        let mut ctx = self.context.lock().unwrap();
        ctx.clear();
    }
}

/// Hybrid reactive runtime for managing reactive primitives.
///
/// Supports both a global runtime (default) and scoped runtimes for isolation.
/// The runtime tracks dependencies between signals, effects, and memos,
/// and manages the reactive graph.
///
/// # Examples
///
/// Using scoped runtimes for isolation:
///
/// ```
/// use marquee::runtime::ReactiveRuntime;
/// use marquee::Signal;
///
/// ReactiveRuntime::scope(|| {
///     let signal = Signal::new(0);
///     assert_eq!(signal.get(), 0);
/// });
/// // Runtime and all its state is dropped here
/// ```
pub struct ReactiveRuntime {
    next_id: AtomicUsize,
    inner: Arc<RwLock<RuntimeInner>>,
}

// Thread-local stack for scoped runtimes
thread_local! {
    static RUNTIME_STACK: RefCell<Vec<Arc<ReactiveRuntime>>> = RefCell::new(vec![]);
}

impl ReactiveRuntime {
    /// Create a new isolated runtime with its own dependency graph.
    pub fn new() -> Arc<Self> {
        Arc::new(ReactiveRuntime {
            next_id: AtomicUsize::new(0),
            inner: Arc::new(RwLock::new(RuntimeInner::new())),
        })
    }

    /// Run a function with a fresh isolated runtime.
    ///
    /// The runtime and all its state is cleaned up when the function returns.
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let runtime = Self::new();
        Self::with_runtime(runtime, f)
    }

    /// Get or create the global runtime (fallback).
    pub fn global() -> Arc<Self> {
        use std::sync::OnceLock;
        static RUNTIME: OnceLock<Arc<ReactiveRuntime>> = OnceLock::new();
        Arc::clone(RUNTIME.get_or_init(Self::new))
    }

    /// Get the current reactive runtime (scoped or global fallback).
    pub fn current() -> Arc<Self> {
        RUNTIME_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .cloned()
                .unwrap_or_else(Self::global)
        })
    }

    /// Run a function with a specific runtime as the current context.
    ///
    /// The runtime is popped again even if `f` panics.
    ///
    /// ```
    /// use marquee::runtime::ReactiveRuntime;
    /// use marquee::Signal;
    ///
    /// let runtime = ReactiveRuntime::new();
    /// ReactiveRuntime::with_runtime(runtime, || {
    ///     let signal = Signal::new(42);
    ///     assert_eq!(signal.get(), 42);
    /// });
    /// ```
    pub fn with_runtime<F, R>(runtime: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().push(runtime);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Clear all observers, dependencies, and state from this runtime.
    ///
    /// The id counter keeps counting, so primitives created afterwards never
    /// share an id with ones that are still alive.
    ///
    /// ```
    /// use marquee::runtime::ReactiveRuntime;
    /// use marquee::Signal;
    ///
    /// let runtime = ReactiveRuntime::new();
    /// ReactiveRuntime::with_runtime(runtime.clone(), || {
    ///     let _signal = Signal::new(42);
    /// });
    ///
    /// runtime.clear();
    /// ```
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.clear();
    }

    /// Get a reference to the inner runtime state.
    pub(crate) fn inner(&self) -> Arc<RwLock<RuntimeInner>> {
        Arc::clone(&self.inner)
    }

    /// Number of tracked sources and of observers with at least one dependency.
    pub fn graph_size(&self) -> (usize, usize) {
        let inner = self.inner.read().unwrap();
        let ctx = inner.context.lock().unwrap();
        (ctx.dependencies.len(), ctx.observer_deps.len())
    }

    /// Generate the next unique ID for a reactive primitive.
    pub fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Track a read of a signal or memo by the current observer.
    pub fn track_read(&self, source_id: usize) {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        if let Some(current_observer) = ctx.current_observer {
            ctx.dependencies
                .entry(source_id)
                .or_default()
                .insert(current_observer);
            ctx.observer_deps
                .entry(current_observer)
                .or_default()
                .insert(source_id);
        }
    }

    /// Notify all observers that depend on a signal.
    pub fn notify_observers(&self, source_id: usize) {
        let observers = {
            let inner = self.inner.read().unwrap();
            let ctx = inner.context.lock().unwrap();
            ctx.dependencies
                .get(&source_id)
                .map(|obs| obs.iter().copied().collect::<Vec<_>>())
        };

        if let Some(observers) = observers {
            for observer_id in observers {
                self.mark_observer_dirty(observer_id);
            }
        }
    }

    /// Mark an observer (memo or effect) as dirty and propagate to dependents.
    fn mark_observer_dirty(&self, observer_id: usize) {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();

        if let Some(dirty) = ctx.memo_dirty.get(&observer_id).copied() {
            if dirty {
                return;
            }
            ctx.memo_dirty.insert(observer_id, true);

            let dependents = ctx
                .dependencies
                .get(&observer_id)
                .map(|deps| deps.iter().copied().collect::<Vec<_>>());

            drop(ctx);
            drop(inner);

            for dependent_id in dependents.into_iter().flatten() {
                self.mark_observer_dirty(dependent_id);
            }
            return;
        }

        let effect = ctx.observers.get(&observer_id).cloned();
        drop(ctx);
        drop(inner);

        if let Some(effect) = effect {
            self.run_observer(observer_id, || effect());
        }
    }

    /// Register an effect function under the given observer id.
    pub fn create_observer<F>(&self, observer_id: usize, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.forget_dependencies(observer_id);
        ctx.observers.insert(observer_id, Arc::new(f));
    }

    /// Run `f` as `observer_id`, replacing whatever it tracked on its last run.
    pub fn run_observer<F, R>(&self, observer_id: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        {
            let inner = self.inner.read().unwrap();
            let mut ctx = inner.context.lock().unwrap();
            ctx.forget_dependencies(observer_id);
        }
        self.with_observer(observer_id, f)
    }

    /// Run a function with a specific observer as the current context.
    pub fn with_observer<F, R>(&self, observer_id: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let prev = {
            let inner = self.inner.read().unwrap();
            let mut ctx = inner.context.lock().unwrap();
            ctx.current_observer.replace(observer_id)
        };

        let result = f();

        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.current_observer = prev;

        result
    }

    /// Register a memo and mark it as dirty initially.
    pub fn register_memo(&self, memo_id: usize) {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.memo_dirty.insert(memo_id, true);
    }

    /// Check if a memo is dirty (needs recomputation).
    pub fn is_memo_dirty(&self, memo_id: usize) -> bool {
        let inner = self.inner.read().unwrap();
        let ctx = inner.context.lock().unwrap();
        ctx.memo_dirty.get(&memo_id).copied().unwrap_or(true)
    }

    /// Mark a memo as clean (after recomputation).
    pub fn mark_memo_clean(&self, memo_id: usize) {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.memo_dirty.insert(memo_id, false);
    }
}
