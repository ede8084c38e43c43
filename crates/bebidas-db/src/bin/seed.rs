//! # Seed Loader
//!
//! Populates the drink catalog from a JSON seed file.
//!
//! ## Usage
//! ```bash
//! # Seed the bundled catalog into ./bebidas.db (only if empty)
//! cargo run -p bebidas-db --bin seed
//!
//! # Use a custom seed file and database path
//! cargo run -p bebidas-db --bin seed -- --file ./my_drinks.json --db ./data/bebidas.db
//!
//! # Add seed drinks that are missing, even if the catalog has rows
//! cargo run -p bebidas-db --bin seed -- --force
//! ```

use std::path::PathBuf;
use std::time::Instant;

use bebidas_db::seed::{default_seed, load_seed, seed_if_empty, seed_missing};
use bebidas_db::{Database, DbConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Bebidas seed loader.
#[derive(Debug, Parser)]
#[command(name = "seed", version, about = "Populate the Bebidas drink catalog")]
struct Args {
    /// Database file path.
    #[arg(short, long, default_value = "./bebidas.db")]
    db: PathBuf,

    /// JSON seed file (defaults to the bundled catalog).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Insert missing seed drinks even when the catalog is not empty.
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("🌱 Bebidas Seed Loader");
    println!("======================");
    println!("Database: {}", args.db.display());

    let drinks = match &args.file {
        Some(path) => {
            println!("Seed file: {}", path.display());
            load_seed(&std::fs::read_to_string(path)?)?
        }
        None => {
            println!("Seed file: (bundled)");
            default_seed()?
        }
    };
    println!("Drinks in seed: {}", drinks.len());
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let start = Instant::now();
    let inserted = if args.force {
        seed_missing(&db, &drinks).await?
    } else {
        let existing = db.drinks().count().await?;
        if existing > 0 {
            println!("⚠ Database already has {} drinks", existing);
            println!("  Skipping seed. Use --force to add missing seed drinks.");
            db.close().await;
            return Ok(());
        }
        seed_if_empty(&db, &drinks).await?
    };

    println!("✓ Inserted {} drinks in {:?}", inserted, start.elapsed());
    println!("  Catalog size: {}", db.drinks().count().await?);

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
