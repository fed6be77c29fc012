//! saucier: recipe lookup CLI
//!
//! Command-line front end over the recipe client. Output is JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use saucier::progress::{SimulationRecord, UserProgress};
use saucier::{Config, IngredientSelection};
use serde::Serialize;

/// Saucier CLI
#[derive(Parser)]
#[command(name = "saucier")]
#[command(version = saucier::PKG_VERSION)]
#[command(about = "Recipe search, caching and ingredient matching")]
struct Args {
    /// Config file (default: ~/.saucier/config.toml)
    #[arg(short, long, env = "SAUCIER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List recipes page by page
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Search recipes by title
    Title {
        title: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
        /// Drop recipes whose details are broken
        #[arg(long)]
        valid_only: bool,
    },

    /// Find importable ingredients by name
    Ingredient { query: String },

    /// Show one recipe in full
    Detail { id: String },

    /// Rank recipes against a set of ingredients
    Matches {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Best-guess recipe for a set of ingredients
    Identify {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Today's recipe
    Daily,

    /// Average taste profile of a set of ingredients
    Flavor {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// XP and rank for a simulation history
    Progress {
        /// Number of simulation runs
        #[arg(long, default_value_t = 0)]
        experiments: usize,
        /// How many of the runs identified a dish
        #[arg(long, default_value_t = 0)]
        identified: usize,
        /// Ingredients in the vault
        #[arg(long, default_value_t = 0)]
        vault: usize,
    },

    /// Show cache usage
    CacheStats,

    /// Remove every cached entry
    CacheClear,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    // Commands that don't need the recipe API
    match &args.command {
        Command::Progress {
            experiments,
            identified,
            vault,
        } => {
            let history: Vec<SimulationRecord> = (0..*experiments)
                .map(|i| {
                    if i < *identified {
                        SimulationRecord::identified(format!("dish {}", i + 1))
                    } else {
                        SimulationRecord::default()
                    }
                })
                .collect();
            return print_json(&UserProgress::compute(&history, *vault));
        }
        Command::CacheStats | Command::CacheClear => {
            let cache = saucier::CacheStore::new(
                config.storage()?,
                Arc::new(saucier::clock::SystemClock),
                config.cache_config(),
            );
            if matches!(args.command, Command::CacheClear) {
                println!("removed {} entries", cache.clear());
            } else {
                let stats = cache.stats();
                println!("entries: {}", stats.entries);
                println!("size: {:.1} KiB", stats.size_kb());
            }
            return Ok(());
        }
        _ => {}
    }

    let client = config.client_builder()?.build()?;

    match args.command {
        Command::List { page, limit } => match client.list_recipes(page, limit).await {
            Some(page) => print_json(&page.recipes)?,
            None => println!("no data"),
        },

        Command::Title {
            title,
            page,
            limit,
            valid_only,
        } => {
            let found = client.search_by_title(&title, limit, page).await;
            let has_more = found.has_more();
            let recipes = if valid_only {
                client.filter_valid(found.recipes).await
            } else {
                found.recipes
            };
            print_json(&recipes)?;
            if has_more {
                eprintln!("more results on page {}", page + 1);
            }
        }

        Command::Ingredient { query } => {
            print_json(&client.search_by_ingredient(&query).await)?;
        }

        Command::Detail { id } => match client.fetch_detail(&id).await {
            Some(detail) => print_json(&detail)?,
            None => println!("recipe {id} not found"),
        },

        Command::Matches { ingredients } => {
            print_json(&client.get_top_matches(&ingredients).await)?;
        }

        Command::Identify { ingredients } => match client.identify_recipe(&ingredients).await {
            Some(recipe) => print_json(&recipe)?,
            None => println!("no match"),
        },

        Command::Daily => print_json(&client.recipe_of_the_day().await)?,

        Command::Flavor { ingredients } => {
            let flavor = config.flavor_client(client.cache().clone())?;
            let selection: Vec<IngredientSelection> =
                ingredients.into_iter().map(IngredientSelection::new).collect();
            print_json(&flavor.enhanced_profile(&selection).await)?;
        }

        Command::Progress { .. } | Command::CacheStats | Command::CacheClear => {}
    }

    Ok(())
}
