//! The movie collection store.
//!
//! [`MovieStore`] owns every movie record for the lifetime of a session and
//! keeps its derived statistics current through memos.

mod id;
mod movie_store;

pub use id::{generate_id, IdSource, RandomIds};
pub use movie_store::MovieStore;
