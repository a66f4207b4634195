//! Loading the initial collection from a catalogue document.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::movie::Movie;
use crate::store::MovieStore;

/// The static seed document: `{ "items": [ ...movies ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    pub items: Vec<Movie>,
}

impl Catalogue {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl MovieStore {
    /// Build a store from a catalogue document.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_catalogue(Catalogue::from_json(json)?)
    }

    /// Build a store from a catalogue file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_catalogue(Catalogue::from_path(path)?)
    }

    pub fn from_catalogue(catalogue: Catalogue) -> Result<Self> {
        let count = catalogue.items.len();
        let store = Self::new(catalogue.items)?;
        info!("loaded {count} movies into the catalogue");
        Ok(store)
    }
}
