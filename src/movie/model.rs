use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type MovieId = u32;

/// A catalogued film.
///
/// The store only interprets `id` and `rating`; everything else is carried
/// as-is. Keys the struct does not know about are kept in `extra` and written
/// back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(default)]
    pub id: MovieId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u16>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub in_theaters: bool,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub rating: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl Movie {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: None,
            image: None,
            release_year: None,
            genres: Vec::new(),
            in_theaters: false,
            rating: 0.0,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: MovieId) -> Self {
        self.id = id;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_release_year(mut self, year: u16) -> Self {
        self.release_year = Some(year);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_theaters(mut self, in_theaters: bool) -> Self {
        self.in_theaters = in_theaters;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_and_keeps_unknown_keys() {
        let movie: Movie = serde_json::from_value(json!({
            "id": 3,
            "title": "Alien",
            "releaseYear": 1979,
            "genres": ["Horror", "Sci-Fi"],
            "inTheaters": true,
            "rating": 4.5,
            "director": "Ridley Scott"
        }))
        .unwrap();

        assert_eq!(movie.id, 3);
        assert_eq!(movie.release_year, Some(1979));
        assert!(movie.in_theaters);
        assert_eq!(movie.extra.get("director"), Some(&json!("Ridley Scott")));

        let back = serde_json::to_value(&movie).unwrap();
        assert_eq!(back["director"], json!("Ridley Scott"));
        assert_eq!(back["inTheaters"], json!(true));
    }

    #[test]
    fn missing_or_null_rating_is_zero() {
        let missing: Movie = serde_json::from_value(json!({ "title": "A" })).unwrap();
        let null: Movie = serde_json::from_value(json!({ "title": "B", "rating": null })).unwrap();
        assert_eq!(missing.rating, 0.0);
        assert_eq!(null.rating, 0.0);
        assert_eq!(missing.id, 0);
    }

    #[test]
    fn builder_sets_fields() {
        let movie = Movie::new("Heat")
            .with_id(9)
            .with_rating(4.0)
            .with_genres(["Crime"])
            .with_release_year(1995)
            .in_theaters(false);
        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.id, 9);
        assert_eq!(movie.genres, vec!["Crime".to_string()]);
    }
}
