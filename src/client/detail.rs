//! Recipe detail fetch with content-based cache invalidation.

use tracing::{debug, warn};

use super::{RecipeClient, fallback};
use crate::Result;
use crate::normalize::detail_from_value;
use crate::telemetry;
use crate::types::RecipeDetail;

impl RecipeClient {
    /// Full detail for one recipe.
    ///
    /// Ids in the reserved fallback range are answered from static data
    /// without I/O. A cached detail that [looks stale](RecipeDetail::looks_stale)
    /// is discarded and fetched again. Not retried; failure yields `None`.
    pub async fn fetch_detail(&self, id: &str) -> Option<RecipeDetail> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        if fallback::is_fallback_id(id) {
            metrics::counter!(telemetry::FALLBACKS_TOTAL, "operation" => "fetch_detail")
                .increment(1);
            return fallback::recipe_detail(id);
        }

        let key = format!("recipe_detail_{id}");
        if let Some(cached) = self.cache.get_as::<RecipeDetail>(&key) {
            if !cached.looks_stale() {
                return Some(cached);
            }
            debug!(id, "cached detail looks stale, refetching");
            self.cache.remove(&key);
        }

        match self.load_detail(id).await {
            Ok(detail) => {
                self.cache.set(&key, &detail);
                Some(detail)
            }
            Err(e) => {
                warn!(id, error = %e, "recipe detail fetch failed");
                None
            }
        }
    }

    async fn load_detail(&self, id: &str) -> Result<RecipeDetail> {
        let body = self.fetch_detail_body(id).await?;
        detail_from_value(id, &body)
    }
}
