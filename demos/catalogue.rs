//! Load a small catalogue and walk through the store's operations.
//!
//! Run with `RUST_LOG=debug cargo run --example catalogue` to see the store's logging.

use marquee::{Movie, MoviePatch, MovieStore};

const SEED: &str = r#"{
    "items": [
        { "id": 1, "title": "Alien", "releaseYear": 1979, "genres": ["Horror"], "rating": 4 },
        { "id": 2, "title": "Heat", "releaseYear": 1995, "genres": ["Crime"], "rating": 5 },
        { "id": 3, "title": "Up", "releaseYear": 2009, "genres": ["Animation"], "rating": 3 }
    ]
}"#;

fn main() -> marquee::Result<()> {
    env_logger::init();

    println!("=== Movie Catalogue ===\n");

    let store = MovieStore::from_json(SEED)?;

    let _watch = store.on_change(|movies| {
        println!("Catalogue now holds {} movies", movies.len());
    });

    println!("Average rating: {}", store.average_rating_formatted());

    let id = store.create(
        Movie::new("Jaws")
            .with_release_year(1975)
            .with_genres(["Thriller"])
            .with_rating(4.0),
    );
    println!("Created Jaws with id {id}");
    println!("Average rating: {}", store.average_rating_formatted());

    store.patch(2, &MoviePatch::new().title("Heat (Director's Cut)"));
    if let Some(heat) = store.get(2) {
        println!("Renamed: {}", heat.get().title);
    }

    store.delete_by_id(3);
    store.delete_by_id(3);
    println!("Average rating: {}", store.average_rating_formatted());

    store.reset_ratings();
    println!("After reset: {}", store.average_rating_formatted());

    for movie in store.list() {
        println!("{:>5}  {}", movie.id, movie.title);
    }

    Ok(())
}
