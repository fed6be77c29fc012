//! Saucier - recipe lookup, caching and ingredient matching
//!
//! This crate is the data layer of a gamified cooking simulator. It wraps
//! a remote recipe API behind a namespaced, TTL'd cache, normalizes the
//! API's inconsistently shaped JSON, and ranks recipes by how well they
//! match the ingredients in the user's vessel.
//!
//! Every public [`RecipeClient`] operation is infallible: network and
//! parse failures are logged and collapse into an empty value, so callers
//! only ever see "no results" or "fewer results".
//!
//! # Matching Example
//!
//! ```rust,no_run
//! use saucier::RecipeClient;
//!
//! #[tokio::main]
//! async fn main() -> saucier::Result<()> {
//!     let client = RecipeClient::builder()
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     for candidate in client.get_top_matches(&["tomato", "basil", "garlic"]).await {
//!         println!(
//!             "{} ({} of {} ingredients)",
//!             candidate.summary.title, candidate.match_count, candidate.recipe_total
//!         );
//!     }
//!
//!     let daily = client.recipe_of_the_day().await;
//!     println!("Recipe of the day: {}", daily.title);
//!     Ok(())
//! }
//! ```
//!
//! # Persistent Cache Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use saucier::{CacheConfig, RecipeClient};
//! use saucier::cache::FileStorage;
//!
//! # fn main() -> saucier::Result<()> {
//! let storage = FileStorage::open(FileStorage::default_path())?.with_quota(5 * 1024 * 1024);
//! let client = RecipeClient::builder()
//!     .api_key("your-api-key")
//!     .storage(Arc::new(storage))
//!     .cache_config(CacheConfig::new().no_expiry())
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod flavor;
pub mod normalize;
pub mod progress;
pub mod retry;
pub mod scoring;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheStats, CacheStore};
pub use client::{RecipeClient, RecipeClientBuilder};
pub use config::Config;
pub use error::{Result, SaucierError};
pub use flavor::{FlavorClient, FlavorProfile};
pub use progress::UserProgress;
pub use retry::RetryConfig;

// Re-export all types
pub use types::{
    IdentifiedRecipe, ImportedIngredient, Ingredient, IngredientSelection, Nutrition,
    RecipeDetail, RecipePage, RecipeSummary, ScoredCandidate,
};

/// Crate version, for user agents and CLI output.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
