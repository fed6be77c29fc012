//! Ingredient matching: top matches and the validity filter.

use futures_util::future::join_all;
use tracing::{debug, warn};

use super::{RecipeClient, SearchQuery};
use crate::retry::with_retry;
use crate::scoring::{self, build_match_query, is_valid_detail, merge_detail};
use crate::telemetry;
use crate::types::{RecipeSummary, ScoredCandidate};

/// Candidates requested from the search endpoint.
pub const MATCH_SEARCH_LIMIT: u32 = 8;

/// Candidates whose details are fetched and scored.
pub const MATCH_DETAIL_LIMIT: usize = 6;

impl RecipeClient {
    /// Recipes ranked by overlap with the user's ingredients.
    ///
    /// The search query carries at most five names, but every unique name
    /// counts when scoring. Up to [`MATCH_DETAIL_LIMIT`] candidates are
    /// scored, sorted by match count then purity, both descending. With no usable names, or when
    /// the search fails outright, candidates come from the first page of
    /// the listing instead.
    pub async fn get_top_matches<S: AsRef<str>>(&self, names: &[S]) -> Vec<ScoredCandidate> {
        let names = scoring::unique_names(names);
        let candidates = match self.match_candidates(&names).await {
            Some(candidates) => candidates,
            None => {
                metrics::counter!(telemetry::FALLBACKS_TOTAL, "operation" => "get_top_matches")
                    .increment(1);
                self.list_recipes(1, MATCH_SEARCH_LIMIT)
                    .await
                    .map(|page| page.recipes)
                    .unwrap_or_default()
            }
        };

        let candidates: Vec<RecipeSummary> =
            candidates.into_iter().take(MATCH_DETAIL_LIMIT).collect();
        let details = join_all(candidates.iter().map(|c| self.fetch_detail(&c.id))).await;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .zip(details)
            .map(|(summary, detail)| scoring::score(summary, detail, &names))
            .collect();
        scoring::rank(&mut scored);
        debug!(count = scored.len(), "scored match candidates");
        scored
    }

    /// Search candidates, or `None` when the listing should be used.
    async fn match_candidates(&self, names: &[String]) -> Option<Vec<RecipeSummary>> {
        let query = build_match_query(names)?;
        let search = SearchQuery::ingredients(&query, MATCH_SEARCH_LIMIT);
        match with_retry(&self.retry, "get_top_matches", || self.fetch_search_page(&search)).await {
            Ok(found) => Some(found.recipes),
            Err(e) => {
                warn!(query = %query, error = %e, "match search failed, using listing");
                None
            }
        }
    }

    /// Keep candidates whose detail resolves to a usable recipe.
    ///
    /// A candidate is dropped when its detail cannot be fetched, has no
    /// ingredients, or has more unresolved ingredient names than resolved
    /// ones. Survivors take title, calories and category from the detail.
    pub async fn filter_valid(&self, candidates: Vec<RecipeSummary>) -> Vec<RecipeSummary> {
        let details = join_all(candidates.iter().map(|c| self.fetch_detail(&c.id))).await;
        candidates
            .into_iter()
            .zip(details)
            .filter_map(|(summary, detail)| match detail {
                Some(detail) if is_valid_detail(&detail) => Some(merge_detail(summary, &detail)),
                _ => {
                    debug!(id = %summary.id, "dropping invalid candidate");
                    None
                }
            })
            .collect()
    }
}
