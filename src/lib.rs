//! # Marquee
//!
//! A reactive, in-memory movie catalogue store.
//!
//! Marquee is built in two layers:
//!
//! ## Signals (Low-level primitives)
//!
//! Fine-grained reactive primitives the store is made of:
//! - `Signal<T>` - Reactive values that notify dependents when changed
//! - `Memo<T>` - Computed values that automatically track dependencies
//! - `Effect` - Side effects that run when dependencies change
//!
//! ## Store (The movie collection)
//!
//! - `MovieStore` - owns the movie records: lookup, create, update, delete,
//!   rating reset, and an average rating that is always current
//! - `Catalogue` - the seed document a store is loaded from
//!
//! ```
//! use marquee::runtime::ReactiveRuntime;
//! use marquee::{Movie, MovieStore};
//!
//! ReactiveRuntime::scope(|| {
//!     let store = MovieStore::empty();
//!     let id = store.create(Movie::new("Alien").with_rating(4.5));
//!     assert!(id < 10_000);
//!     assert_eq!(store.average_rating_formatted(), "4.5");
//! });
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod movie;
pub mod runtime;
pub mod seed;
pub mod signal;
pub mod store;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use movie::{Movie, MovieId, MoviePatch};
pub use seed::Catalogue;
pub use signal::{create_effect, create_memo, create_signal, Effect, Memo, ReadSignal, Signal};
pub use store::{IdSource, MovieStore, RandomIds};
