use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use log::{debug, trace, warn};

use super::id::{generate_id, IdSource, RandomIds};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::format::format_decimal;
use crate::movie::{Movie, MovieId, MoviePatch};
use crate::runtime::ReactiveRuntime;
use crate::signal::{Effect, Memo, ReadSignal, Signal};

type Records = Signal<Vec<Signal<Movie>>>;

/// Owns the movie collection and the movie currently open for editing.
///
/// Every record lives in its own signal, so updating a movie keeps the record
/// (and every handle returned by [`get`](Self::get)) while notifying readers.
/// The average rating is a memo over the collection and each record's rating;
/// reading it after any mutation yields the new value.
///
/// The store stays bound to the runtime that was current when it was built;
/// calls made while another runtime is current still notify its own memos.
///
/// Lookups that miss are not errors: `get` returns `None`, and `update`,
/// `patch` and `delete` do nothing.
///
/// ```
/// use marquee::runtime::ReactiveRuntime;
/// use marquee::{Movie, MovieStore};
///
/// ReactiveRuntime::scope(|| {
///     let store = MovieStore::new(vec![
///         Movie::new("Alien").with_id(1).with_rating(4.0),
///         Movie::new("Heat").with_id(2).with_rating(2.0),
///     ])
///     .unwrap();
///     assert_eq!(store.average_rating(), 3.0);
///
///     store.reset_ratings();
///     assert_eq!(store.average_rating(), 0.0);
/// });
/// ```
pub struct MovieStore {
    runtime: Arc<ReactiveRuntime>,
    movies: Records,
    movie_to_edit: Signal<Option<ReadSignal<Movie>>>,
    average_rating: Memo<f64>,
    average_rating_formatted: Memo<String>,
    config: StoreConfig,
    id_source: Mutex<Box<dyn IdSource>>,
}

impl MovieStore {
    /// Create a store holding `movies` with the default configuration.
    ///
    /// Fails if two seed records share an id.
    pub fn new(movies: Vec<Movie>) -> Result<Self> {
        Self::with_config(movies, StoreConfig::default())
    }

    pub fn empty() -> Self {
        Self::build(Vec::new(), StoreConfig::default())
    }

    pub fn with_config(movies: Vec<Movie>, config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::with_capacity(movies.len());
        if let Some(movie) = movies.iter().find(|movie| !seen.insert(movie.id)) {
            return Err(Error::DuplicateId(movie.id));
        }

        Ok(Self::build(movies, config))
    }

    fn build(movies: Vec<Movie>, config: StoreConfig) -> Self {
        let runtime = ReactiveRuntime::current();
        let records = movies
            .into_iter()
            .map(|movie| Signal::new_in(&runtime, movie))
            .collect();
        let movies: Records = Signal::new_in(&runtime, records);

        let average_rating = Memo::new_in(&runtime, {
            let movies = movies.clone();
            move || {
                movies.with(|records| {
                    // NaN counts as no rating
                    let sum: f64 = records
                        .iter()
                        .map(|record| record.with(|m| m.rating))
                        .filter(|rating| !rating.is_nan())
                        .sum();
                    sum / records.len().max(1) as f64
                })
            }
        });

        let average_rating_formatted = Memo::new_in(&runtime, {
            let average_rating = average_rating.clone();
            let digits = config.max_fraction_digits;
            move || format_decimal(average_rating.get(), digits)
        });

        Self {
            movie_to_edit: Signal::new_in(&runtime, None),
            runtime,
            movies,
            average_rating,
            average_rating_formatted,
            config,
            id_source: Mutex::new(Box::new(RandomIds)),
        }
    }

    /// Replace the source new ids are drawn from.
    pub fn with_id_source(self, source: impl IdSource + 'static) -> Self {
        *self.id_source.lock().unwrap() = Box::new(source);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The runtime this store's signals and memos live in.
    pub fn runtime(&self) -> &Arc<ReactiveRuntime> {
        &self.runtime
    }

    /// Snapshot of every record in insertion order.
    pub fn list(&self) -> Vec<Movie> {
        snapshot(&self.movies)
    }

    /// Read-only handles to every record in insertion order.
    pub fn records(&self) -> Vec<ReadSignal<Movie>> {
        self.movies
            .with(|records| records.iter().map(Signal::read_only).collect())
    }

    /// Handle to the record with `id`.
    ///
    /// The handle shares the stored record: later updates through the store are
    /// visible through it. After the record is deleted the handle keeps its last
    /// value.
    pub fn get(&self, id: MovieId) -> Option<ReadSignal<Movie>> {
        self.movies.with(|records| {
            records
                .iter()
                .find(|record| record.with(|m| m.id == id))
                .map(Signal::read_only)
        })
    }

    /// Append `movie` under a freshly drawn id and return that id.
    ///
    /// Whatever id `movie` carries is ignored.
    pub fn create(&self, mut movie: Movie) -> MovieId {
        let existing: HashSet<MovieId> = self.movies.with_untracked(|records| {
            records
                .iter()
                .map(|record| record.with_untracked(|m| m.id))
                .collect()
        });

        let space = self.config.id_space;
        if existing.len() as u64 * 2 >= u64::from(space) {
            warn!(
                "{} of {space} movie ids in use; id generation slows down as the space fills",
                existing.len()
            );
        }

        let id = {
            let mut source = self.id_source.lock().unwrap();
            generate_id(&existing, source.as_mut(), space)
        };
        movie.id = id;
        debug!("creating movie {id} ({:?})", movie.title);
        let record = Signal::new_in(&self.runtime, movie);
        self.movies.update(|records| records.push(record));
        id
    }

    /// Overwrite every field of the stored record with the same id as `movie`.
    pub fn update(&self, movie: &Movie) {
        match self.record(movie.id) {
            Some(record) => {
                debug!("updating movie {}", movie.id);
                record.update(|stored| stored.clone_from(movie));
            }
            None => trace!("update skipped, no movie with id {}", movie.id),
        }
    }

    /// Merge only the fields `patch` carries into the record with `id`.
    pub fn patch(&self, id: MovieId, patch: &MoviePatch) {
        match self.record(id) {
            Some(record) => {
                debug!("patching movie {id}");
                record.update(|stored| patch.apply_to(stored));
            }
            None => trace!("patch skipped, no movie with id {id}"),
        }
    }

    /// Remove the record with the same id as `movie`.
    pub fn delete(&self, movie: &Movie) {
        self.delete_by_id(movie.id);
    }

    pub fn delete_by_id(&self, id: MovieId) {
        let position = self.movies.with_untracked(|records| {
            records
                .iter()
                .position(|record| record.with_untracked(|m| m.id == id))
        });

        match position {
            Some(index) => {
                debug!("deleting movie {id}");
                self.movies.update(|records| {
                    records.remove(index);
                });
            }
            None => trace!("delete skipped, no movie with id {id}"),
        }
    }

    pub fn exists(&self, movie: &Movie) -> bool {
        self.contains(movie.id)
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.movies
            .with(|records| records.iter().any(|record| record.with(|m| m.id == id)))
    }

    pub fn len(&self) -> usize {
        self.movies.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set every record's rating to zero.
    pub fn reset_ratings(&self) {
        let records = self.movies.with_untracked(Vec::clone);
        debug!("resetting ratings of {} movies", records.len());
        for record in records {
            record.update(|m| m.rating = 0.0);
        }
    }

    /// Mean rating over all records, 0 for an empty collection.
    pub fn average_rating(&self) -> f64 {
        self.average_rating.get()
    }

    /// The average rating rounded to the configured number of fraction digits.
    pub fn average_rating_formatted(&self) -> String {
        self.average_rating_formatted.get()
    }

    /// Handle to the movie currently open for editing, if any.
    ///
    /// This slot belongs to the editing UI: no CRUD operation sets or clears it.
    /// A handle whose record was deleted stays in the slot with its last value.
    pub fn movie_to_edit(&self) -> Option<ReadSignal<Movie>> {
        self.movie_to_edit.get()
    }

    pub fn set_movie_to_edit(&self, movie: Option<ReadSignal<Movie>>) {
        self.movie_to_edit.set(movie);
    }

    /// Put the record with `id` in the edit slot. Returns false, leaving the
    /// slot alone, when there is no such record.
    pub fn edit(&self, id: MovieId) -> bool {
        match self.get(id) {
            Some(record) => {
                self.movie_to_edit.set(Some(record));
                true
            }
            None => false,
        }
    }

    /// Run `callback` with the current collection now and after every change to it.
    pub fn on_change<F>(&self, callback: F) -> Effect
    where
        F: Fn(&[Movie]) + Send + Sync + 'static,
    {
        let movies = self.movies.clone();
        Effect::new_in(&self.runtime, move || callback(&snapshot(&movies)))
    }

    fn record(&self, id: MovieId) -> Option<Signal<Movie>> {
        self.movies.with_untracked(|records| {
            records
                .iter()
                .find(|record| record.with_untracked(|m| m.id == id))
                .cloned()
        })
    }
}

fn snapshot(movies: &Records) -> Vec<Movie> {
    movies.with(|records| records.iter().map(Signal::get).collect())
}
