//! The movie record and partial updates to it.

mod model;
mod patch;

pub use model::{Movie, MovieId};
pub use patch::MoviePatch;
