use serde::Deserialize;
use serde_json::{Map, Value};

use super::Movie;

/// A partial update: only the fields that are `Some` are written.
///
/// ```
/// use marquee::{Movie, MoviePatch};
///
/// let mut movie = Movie::new("Old Title").with_rating(3.0);
/// MoviePatch::new().title("New Title").apply_to(&mut movie);
/// assert_eq!(movie.title, "New Title");
/// assert_eq!(movie.rating, 3.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub release_year: Option<u16>,
    pub genres: Option<Vec<String>>,
    pub in_theaters: Option<bool>,
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MoviePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = Some(genres.into_iter().map(Into::into).collect());
        self
    }

    pub fn in_theaters(mut self, in_theaters: bool) -> Self {
        self.in_theaters = Some(in_theaters);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn release_year(mut self, year: u16) -> Self {
        self.release_year = Some(year);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the carried fields onto `movie`. The id is never touched.
    pub fn apply_to(&self, movie: &mut Movie) {
        if let Some(title) = &self.title {
            movie.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            movie.description = Some(description.clone());
        }
        if let Some(image) = &self.image {
            movie.image = Some(image.clone());
        }
        if let Some(year) = self.release_year {
            movie.release_year = Some(year);
        }
        if let Some(genres) = &self.genres {
            movie.genres.clone_from(genres);
        }
        if let Some(in_theaters) = self.in_theaters {
            movie.in_theaters = in_theaters;
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
        for (key, value) in self.extra.iter().filter(|(key, _)| key.as_str() != "id") {
            movie.extra.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_patch_changes_nothing() {
        let original = Movie::new("Jaws").with_id(2).with_rating(4.0);
        let mut movie = original.clone();
        let patch = MoviePatch::new();
        assert!(patch.is_empty());
        patch.apply_to(&mut movie);
        assert_eq!(movie, original);
    }

    #[test]
    fn builder_covers_every_field() {
        let mut movie = Movie::new("Jaws").with_id(2);
        MoviePatch::new()
            .title("Jaws 2")
            .description("Sequel")
            .image("jaws2.jpg")
            .release_year(1978)
            .genres(["Thriller"])
            .in_theaters(true)
            .rating(3.5)
            .apply_to(&mut movie);

        assert_eq!(
            movie,
            Movie::new("Jaws 2")
                .with_id(2)
                .with_description("Sequel")
                .with_image("jaws2.jpg")
                .with_release_year(1978)
                .with_genres(["Thriller"])
                .in_theaters(true)
                .with_rating(3.5)
        );
    }

    #[test]
    fn json_patch_merges_known_and_extra_keys() {
        let patch: MoviePatch =
            serde_json::from_value(json!({ "id": 7, "rating": 2.5, "studio": "Universal" }))
                .unwrap();
        let mut movie = Movie::new("Jaws").with_id(2).with_genres(["Thriller"]);
        patch.apply_to(&mut movie);

        assert_eq!(movie.rating, 2.5);
        assert_eq!(movie.title, "Jaws");
        assert_eq!(movie.genres, vec!["Thriller".to_string()]);
        assert_eq!(movie.extra["studio"], json!("Universal"));
        assert_eq!(movie.id, 2);
        assert!(!movie.extra.contains_key("id"));
    }
}
