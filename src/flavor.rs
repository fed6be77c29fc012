//! FlavorDB integration for taste profiles.
//!
//! Ingredients known to FlavorDB are resolved to an entity id, their
//! flavor molecules fetched, and the molecules' `@`-delimited flavor tags
//! mapped onto the five tastes of the radar chart. Lookups share the
//! recipe client's [`CacheStore`] under `flavordb_<name>` keys.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::telemetry;
use crate::types::IngredientSelection;
use crate::{Result, SaucierError};

/// Default base URL of FlavorDB.
pub const DEFAULT_FLAVORDB_URL: &str = "https://cosylab.iiitd.edu.in/flavordb";

/// Ingredient name to FlavorDB entity id.
const ENTITY_MAP: &[(&str, u32)] = &[
    ("chicken", 200),
    ("beef", 201),
    ("pork", 202),
    ("lamb", 203),
    ("rice", 391),
    ("wheat", 421),
    ("corn", 105),
    ("potato", 378),
    ("tomato", 413),
    ("onion", 343),
    ("garlic", 178),
    ("ginger", 182),
    ("lemon", 266),
    ("lime", 271),
    ("apple", 18),
    ("banana", 35),
    ("strawberry", 403),
    ("orange", 346),
    ("milk", 301),
    ("cheese", 80),
    ("butter", 67),
    ("egg", 147),
    ("coffee", 96),
    ("chocolate", 84),
    ("vanilla", 424),
    ("cinnamon", 90),
    ("pepper", 360),
    ("salt", 395),
    ("sugar", 405),
    ("honey", 226),
    ("basil", 38),
    ("mint", 304),
    ("thyme", 410),
    ("rosemary", 388),
    ("carrot", 74),
    ("celery", 77),
    ("mushroom", 310),
    ("peanut", 355),
    ("almond", 11),
    ("walnut", 429),
    ("soy sauce", 399),
    ("fish", 165),
    ("shrimp", 398),
    ("salmon", 393),
    ("tuna", 418),
    ("wine", 433),
    ("beer", 44),
    ("tea", 408),
    ("oil", 340),
    ("vinegar", 427),
    ("yogurt", 438),
];

/// Tag keywords per taste.
const TASTE_KEYWORDS: [(Taste, &[&str]); 5] = [
    (
        Taste::Sweet,
        &["sweet", "sugar", "honey", "caramel", "vanilla", "fruity", "berry", "candy", "syrup"],
    ),
    (
        Taste::Sour,
        &["sour", "acid", "acidic", "tart", "tangy", "citrus", "lemon", "vinegar", "fermented"],
    ),
    (
        Taste::Spicy,
        &["spicy", "hot", "pungent", "pepper", "chili", "ginger", "heat", "sharp", "warm"],
    ),
    (
        Taste::Bitter,
        &[
            "bitter",
            "astringent",
            "burnt",
            "charred",
            "roasted",
            "tobacco",
            "coffee",
            "dark chocolate",
        ],
    ),
    (
        Taste::Savory,
        &[
            "savory", "umami", "meaty", "meat", "beef", "broth", "roast", "chicken", "fish",
            "cheese", "soy", "mushroom", "earthy", "rich", "nutty", "toasted",
        ],
    ),
];

#[derive(Debug, Clone, Copy)]
enum Taste {
    Sweet,
    Sour,
    Spicy,
    Bitter,
    Savory,
}

/// Scores (0–100) on the five tastes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorProfile {
    pub sweet: u32,
    pub sour: u32,
    pub spicy: u32,
    pub bitter: u32,
    pub savory: u32,
}

impl FlavorProfile {
    fn slot(&mut self, taste: Taste) -> &mut u32 {
        match taste {
            Taste::Sweet => &mut self.sweet,
            Taste::Sour => &mut self.sour,
            Taste::Spicy => &mut self.spicy,
            Taste::Bitter => &mut self.bitter,
            Taste::Savory => &mut self.savory,
        }
    }
}

/// Compound data for one ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorCompounds {
    pub entity_id: u32,
    #[serde(default)]
    pub category: Option<String>,
    pub compound_count: usize,
    /// Unique flavor tags, in first-seen order.
    pub flavor_tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EntityResponse {
    #[serde(default)]
    category_readable: Option<String>,
    #[serde(default)]
    molecules: Vec<Molecule>,
}

#[derive(Debug, Deserialize)]
struct Molecule {
    #[serde(default)]
    flavor_profile: Option<String>,
}

/// Entity id for a normalized ingredient name.
pub fn entity_id(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    ENTITY_MAP
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, id)| *id)
}

/// Map flavor tags onto taste scores.
///
/// Each taste scores 10 per (tag, keyword) containment hit, capped at 100.
pub fn map_tags_to_profile<S: AsRef<str>>(tags: &[S]) -> FlavorProfile {
    let tags: Vec<String> = tags.iter().map(|t| t.as_ref().to_lowercase()).collect();
    let mut profile = FlavorProfile::default();
    for (taste, keywords) in TASTE_KEYWORDS {
        let hits: usize = keywords
            .iter()
            .map(|keyword| tags.iter().filter(|tag| tag.contains(keyword)).count())
            .sum();
        *profile.slot(taste) = (hits * 10).min(100) as u32;
    }
    profile
}

/// Client for FlavorDB.
#[derive(Clone)]
pub struct FlavorClient {
    http: Client,
    base_url: String,
    cache: Arc<CacheStore>,
}

impl FlavorClient {
    /// Create a client against the public FlavorDB.
    pub fn new(cache: Arc<CacheStore>) -> Result<Self> {
        Self::with_base_url(cache, DEFAULT_FLAVORDB_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(cache: Arc<CacheStore>, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SaucierError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Flavor compounds for an ingredient, or `None` when the name is not
    /// mapped or the lookup fails.
    pub async fn fetch_compounds(&self, name: &str) -> Option<FlavorCompounds> {
        let name = name.trim().to_lowercase();
        let key = format!("flavordb_{name}");
        if let Some(cached) = self.cache.get_as::<FlavorCompounds>(&key) {
            return Some(cached);
        }

        let Some(entity) = entity_id(&name) else {
            debug!(name = %name, "no FlavorDB mapping");
            return None;
        };

        match self.fetch_entity(entity).await {
            Ok(compounds) => {
                debug!(name = %name, compounds = compounds.compound_count, "fetched flavor compounds");
                self.cache.set(&key, &compounds);
                Some(compounds)
            }
            Err(e) => {
                warn!(name = %name, entity, error = %e, "FlavorDB lookup failed");
                None
            }
        }
    }

    async fn fetch_entity(&self, entity: u32) -> Result<FlavorCompounds> {
        let url = format!("{}/entities_json", self.base_url);
        let start = Instant::now();
        let result = self.send(&url, entity).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "endpoint" => "flavordb", "status" => status)
            .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "endpoint" => "flavordb")
            .record(start.elapsed().as_secs_f64());
        result
    }

    async fn send(&self, url: &str, entity: u32) -> Result<FlavorCompounds> {
        let response = self
            .http
            .get(url)
            .query(&[("id", entity)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SaucierError::Api {
                status: status.as_u16(),
                message: format!("FlavorDB error: {status}"),
            });
        }

        let body: EntityResponse = response.json().await?;
        let mut tags: Vec<String> = Vec::new();
        for tag in body
            .molecules
            .iter()
            .filter_map(|m| m.flavor_profile.as_deref())
            .flat_map(|profile| profile.split('@'))
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            if !tags.iter().any(|seen| seen == tag) {
                tags.push(tag.to_string());
            }
        }

        Ok(FlavorCompounds {
            entity_id: entity,
            category: body.category_readable,
            compound_count: body.molecules.len(),
            flavor_tags: tags,
        })
    }

    /// Average taste profile of a vessel.
    ///
    /// Each ingredient uses its FlavorDB profile when tags are available,
    /// else its static profile, else all zeros. Lookups run in parallel.
    pub async fn enhanced_profile(&self, ingredients: &[IngredientSelection]) -> FlavorProfile {
        let profiles = join_all(ingredients.iter().map(|ing| async move {
            match self.fetch_compounds(&ing.name).await {
                Some(compounds) if !compounds.flavor_tags.is_empty() => {
                    map_tags_to_profile(&compounds.flavor_tags)
                }
                _ => ing.flavor.unwrap_or_default(),
            }
        }))
        .await;

        average(&profiles)
    }
}

impl std::fmt::Debug for FlavorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlavorClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Rounded per-taste mean; all zeros for no profiles.
fn average(profiles: &[FlavorProfile]) -> FlavorProfile {
    let count = profiles.len().max(1) as f64;
    let mean = |pick: fn(&FlavorProfile) -> u32| {
        let sum: u64 = profiles.iter().map(|p| u64::from(pick(p))).sum();
        (sum as f64 / count).round() as u32
    };
    FlavorProfile {
        sweet: mean(|p| p.sweet),
        sour: mean(|p| p.sour),
        spicy: mean(|p| p.spicy),
        bitter: mean(|p| p.bitter),
        savory: mean(|p| p.savory),
    }
}
