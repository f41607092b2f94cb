//! Movie database walkthrough
//!
//! Run: RUST_LOG=debug cargo run --example movie_db --features logging

use relalg_core::{EngineConfig, Table, TableStore, Value, tuple};

fn main() -> relalg_core::RelResult<()> {
    relalg_core::logging::init_with_level("debug");

    let config = EngineConfig::from_env()?;

    let mut movie = Table::with_config(
        "movie",
        "title year length genre studioName producerNo",
        "String Integer Integer String String Integer",
        "title year",
        &config,
    )?;
    movie.insert(tuple!["Star_Wars", 1977, 124, "sciFi", "Fox", 12345])?;
    movie.insert(tuple!["Star_Wars_2", 1980, 124, "sciFi", "Fox", 12345])?;
    movie.insert(tuple!["Rocky", 1985, 200, "action", "Universal", 12125])?;
    movie.insert(tuple!["Rambo", 1978, 100, "action", "Universal", 32355])?;

    let mut cinema = Table::with_config(
        "cinema",
        "title year length genre studioName producerNo",
        "String Integer Integer String String Integer",
        "title year",
        &config,
    )?;
    cinema.insert(tuple!["Rocky", 1985, 200, "action", "Universal", 12125])?;
    cinema.insert(tuple!["Rambo", 1978, 100, "action", "Universal", 32355])?;
    cinema.insert(tuple!["Galaxy_Quest", 1999, 104, "comedy", "DreamWorks", 67890])?;

    let mut studio = Table::with_config("studio", "name address presNo", "String String Integer", "name", &config)?;
    studio.insert(tuple!["Fox", "Los_Angeles", 7777])?;
    studio.insert(tuple!["Universal", "Universal_City", 8888])?;
    studio.insert(tuple!["DreamWorks", "Universal_City", 9999])?;

    movie.print()?;
    cinema.print()?;
    studio.print()?;
    movie.print_index();

    println!("\n--- project title year");
    movie.project("title year")?.print()?;

    println!("\n--- select year == 1977");
    let year = movie.col("year").unwrap_or(1);
    movie.select(|t| t[year] == Value::Integer(1977)).print()?;

    println!("\n--- union");
    movie.union(&cinema)?.print()?;

    println!("\n--- minus");
    movie.minus(&cinema)?.print()?;

    println!("\n--- join studioName = name");
    movie.join("studioName", "name", &studio)?.print()?;

    println!("\n--- natural join");
    movie.natural_join(&cinema)?.print()?;

    let store = TableStore::new(config.store.clone());
    let path = movie.save(&store)?;
    println!("\nsaved movie to {}", path.display());
    Table::load(&store, "movie")?.print()?;

    Ok(())
}
