//! Store configuration.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Size of the id space new records draw from: ids fall in `[0, ID_SPACE)`.
pub const ID_SPACE: u32 = 10_000;

/// Fraction digits shown by the formatted average rating.
pub const MAX_FRACTION_DIGITS: usize = 2;

// f64 carries at most 17 significant digits; more fraction digits are noise.
const FRACTION_DIGITS_LIMIT: usize = 20;

/// Tunables for a [`MovieStore`](crate::MovieStore).
///
/// Every field is optional in JSON and falls back to its default.
///
/// ```
/// use marquee::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{ "maxFractionDigits": 1 }"#).unwrap();
/// assert_eq!(config.id_space, 10_000);
/// assert_eq!(config.max_fraction_digits, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Upper bound (exclusive) for generated ids.
    ///
    /// Id generation redraws on every collision and never gives up, so it slows
    /// down as the collection grows towards this size and stalls once it is full.
    pub id_space: u32,
    pub max_fraction_digits: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id_space: ID_SPACE,
            max_fraction_digits: MAX_FRACTION_DIGITS,
        }
    }
}

impl StoreConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id_space == 0 {
            return Err(Error::Config("idSpace must be at least 1".into()));
        }
        if self.max_fraction_digits > FRACTION_DIGITS_LIMIT {
            return Err(Error::Config(format!(
                "maxFractionDigits must be at most {FRACTION_DIGITS_LIMIT}, got {}",
                self.max_fraction_digits
            )));
        }
        Ok(())
    }
}
