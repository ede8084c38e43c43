//! # Bebidas Entry Point
//!
//! ## Usage
//! ```bash
//! bebidas today                                  # drink of the day
//! bebidas list --q argentina --abv-max 0         # filtered listing
//! bebidas show mate                              # detail view
//! bebidas add --name "Café con Leche" --country Colombia \
//!     --category coffee --serve-temp caliente    # create (id is generated)
//! bebidas delete mate                            # remove
//! bebidas --json list --category alcohol         # JSON output
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::error;

use bebidas_cli::commands::drink;
use bebidas_cli::config::AppConfig;
use bebidas_cli::error::ApiError;
use bebidas_cli::{init_tracing, open_database, render};
use bebidas_core::validation::{DrinkForm, ListParams};

#[derive(Debug, Parser)]
#[command(name = "bebidas", version, about = "Catálogo de bebidas latinoamericanas")]
struct Cli {
    /// Database file (overrides BEBIDAS_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Don't seed an empty catalog on startup.
    #[arg(long, global = true)]
    no_seed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a random drink.
    Today,
    /// List drinks, optionally filtered.
    List(ListArgs),
    /// Show one drink.
    Show { id: String },
    /// Add a drink; its id is derived from the name.
    Add(AddArgs),
    /// Delete a drink.
    Delete { id: String },
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Text searched in name, country and fun fact.
    #[arg(long)]
    q: Option<String>,
    /// Text searched in the country only.
    #[arg(long)]
    country: Option<String>,
    /// tradition, alcohol, coffee or soft.
    #[arg(long)]
    category: Option<String>,
    /// Minimum abv; 0 also includes drinks without abv.
    #[arg(long)]
    abv_min: Option<String>,
    /// Maximum abv; 0 means only drinks without abv.
    #[arg(long)]
    abv_max: Option<String>,
}

impl From<ListArgs> for ListParams {
    fn from(args: ListArgs) -> Self {
        ListParams {
            q: args.q,
            country: args.country,
            category: args.category,
            abv_min: args.abv_min,
            abv_max: args.abv_max,
        }
    }
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long = "name")]
    name_es: Option<String>,
    #[arg(long = "country")]
    origin_country: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// cold/hot (fría/caliente also accepted).
    #[arg(long)]
    serve_temp: Option<String>,
    #[arg(long)]
    abv: Option<String>,
    #[arg(long = "fun-fact")]
    fun_fact_es: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
}

impl From<AddArgs> for DrinkForm {
    fn from(args: AddArgs) -> Self {
        DrinkForm {
            name_es: args.name_es,
            origin_country: args.origin_country,
            category: args.category,
            serve_temp: args.serve_temp,
            abv: args.abv,
            fun_fact_es: args.fun_fact_es,
            image_url: args.image_url,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ApiError>() {
            Some(api) => {
                if json {
                    if let Ok(body) = serde_json::to_string_pretty(api) {
                        println!("{body}");
                    }
                } else {
                    eprintln!("error [{:?}]: {}", api.code, api.message);
                }
                ExitCode::from(api.code.exit_code() as u8)
            }
            None => {
                error!("{err:#}");
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()
        .map_err(ApiError::from)?
        .with_overrides(cli.db, cli.no_seed);
    let db = open_database(&config).await?;

    let result = dispatch(&db, cli.command, cli.json).await;
    db.close().await;
    result
}

async fn dispatch(db: &bebidas_db::Database, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Today => {
            let drink = drink::drink_of_the_day(db, &mut rand::thread_rng()).await?;
            match (drink, json) {
                (drink, true) => print_json(&drink)?,
                (Some(drink), false) => print!("{}", render::drink_card(&drink)),
                (None, false) => println!("{}", render::EMPTY_CATALOG),
            }
        }
        Command::List(args) => {
            let list = drink::list_drinks(db, &args.into()).await?;
            if json {
                print_json(&list)?;
            } else {
                print!("{}", render::drink_list(&list));
            }
        }
        Command::Show { id } => {
            let drink = drink::get_drink(db, &id).await?;
            if json {
                print_json(&drink)?;
            } else {
                print!("{}", render::drink_card(&drink));
            }
        }
        Command::Add(args) => {
            let drink = drink::add_drink(db, &args.into()).await?;
            if json {
                print_json(&drink)?;
            } else {
                println!("Agregada: {}", drink.id);
                print!("{}", render::drink_card(&drink));
            }
        }
        Command::Delete { id } => {
            let outcome = drink::delete_drink(db, &id).await?;
            if json {
                print_json(&serde_json::json!({ "id": id, "outcome": outcome }))?;
            } else {
                println!("{}", render::delete_outcome(&id, outcome));
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{body}");
    Ok(())
}
