//! Recipe of the day.
//!
//! The cache key carries the UTC date, so the pick rotates daily.
//! Concurrent callers with a cold cache share one lookup through the
//! client's in-flight map; the entry is invalidated once it settles and
//! later callers read the cache instead.

use tracing::{debug, warn};

use super::{RecipeClient, fallback};
use crate::telemetry;
use crate::types::RecipeSummary;

/// Listing page size the daily pick is drawn from.
pub const DAILY_LIST_LIMIT: u32 = 10;

impl RecipeClient {
    /// Today's recipe. Never empty: falls back to a static recipe, which
    /// is then cached for the rest of the day.
    pub async fn recipe_of_the_day(&self) -> RecipeSummary {
        let key = format!("recipe_of_the_day_{}", self.clock.today().format("%Y-%m-%d"));
        if let Some(cached) = self.cache.get_as::<RecipeSummary>(&key) {
            return cached;
        }

        let entry = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(self.resolve_daily(&key))
            .await;
        if entry.is_fresh() {
            self.in_flight.invalidate(&key).await;
        } else {
            debug!(key = %key, "joined in-flight recipe of the day");
            metrics::counter!(telemetry::COALESCED_TOTAL, "operation" => "recipe_of_the_day")
                .increment(1);
        }
        entry.into_value()
    }

    async fn resolve_daily(&self, key: &str) -> RecipeSummary {
        // A previous lookup may have settled between the cache check and
        // joining the in-flight map.
        if let Some(cached) = self.cache.get_as::<RecipeSummary>(key) {
            return cached;
        }

        let live = self
            .list_recipes(1, DAILY_LIST_LIMIT)
            .await
            .and_then(|page| fallback::pick_random(&page.recipes).cloned());

        let pick = match live {
            Some(pick) => pick,
            None => {
                warn!(key, "recipe of the day unavailable, using fallback");
                metrics::counter!(telemetry::FALLBACKS_TOTAL, "operation" => "recipe_of_the_day")
                    .increment(1);
                fallback::daily_pick()
            }
        };
        self.cache.set(key, &pick);
        pick
    }
}
