//! Listing and search operations.

use std::collections::HashSet;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::{RecipeClient, SearchQuery};
use crate::retry::with_retry;
use crate::scoring::build_match_query;
use crate::types::{IdentifiedRecipe, ImportedIngredient, RecipePage};

/// Candidate recipes requested per ingredient search.
pub const INGREDIENT_SEARCH_LIMIT: u32 = 5;

/// Candidates whose details are mined for matching ingredients.
pub const INGREDIENT_DETAIL_LIMIT: usize = 3;

impl RecipeClient {
    /// One page of the recipe listing.
    ///
    /// Returns `None` when the API cannot be reached or answers with an
    /// error; callers treat that as "no data".
    pub async fn list_recipes(&self, page: u32, limit: u32) -> Option<RecipePage> {
        let key = format!("recipes_list_p{page}_l{limit}");
        if let Some(cached) = self.cache.get_as::<RecipePage>(&key) {
            return Some(cached);
        }

        match with_retry(&self.retry, "list_recipes", || self.fetch_list_page(page, limit)).await {
            Ok(result) => {
                self.cache.set(&key, &result);
                Some(result)
            }
            Err(e) => {
                warn!(page, limit, error = %e, "recipe listing failed");
                None
            }
        }
    }

    /// Search recipes by title.
    ///
    /// Failure yields [`RecipePage::empty`]. On success the raw items are
    /// also cached under a secondary `title_search_raw_` key.
    pub async fn search_by_title(&self, title: &str, limit: u32, page: u32) -> RecipePage {
        let title = title.trim();
        if title.is_empty() {
            return RecipePage::empty(page, limit);
        }
        let suffix = format!("{}_p{page}_l{limit}", title.to_lowercase());
        let key = format!("title_search_{suffix}");
        if let Some(cached) = self.cache.get_as::<RecipePage>(&key) {
            return cached;
        }

        let query = SearchQuery::title(title, page, limit);
        match with_retry(&self.retry, "search_by_title", || self.fetch_search_page(&query)).await {
            Ok(result) => {
                self.cache.set(&key, &result);
                self.cache.set(&format!("title_search_raw_{suffix}"), &result.raw);
                result
            }
            Err(e) => {
                warn!(title, page, limit, error = %e, "title search failed");
                RecipePage::empty(page, limit)
            }
        }
    }

    /// Ingredients named like `query`, mined from recipes that use it.
    ///
    /// Searches up to [`INGREDIENT_SEARCH_LIMIT`] recipes containing the
    /// ingredient, fetches the first [`INGREDIENT_DETAIL_LIMIT`] details in
    /// parallel, and keeps every ingredient whose name or phrase contains
    /// the query (case-insensitive). Results are unique by lowercase name,
    /// first occurrence wins.
    pub async fn search_by_ingredient(&self, query: &str) -> Vec<ImportedIngredient> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        let key = format!("ingredient_search_{needle}");
        if let Some(cached) = self.cache.get_as::<Vec<ImportedIngredient>>(&key) {
            return cached;
        }

        let search = SearchQuery::ingredients(query, INGREDIENT_SEARCH_LIMIT);
        let found = match with_retry(&self.retry, "search_by_ingredient", || {
            self.fetch_search_page(&search)
        })
        .await
        {
            Ok(found) => found,
            Err(e) => {
                warn!(query, error = %e, "ingredient search failed");
                return Vec::new();
            }
        };
        if found.is_empty() {
            debug!(query, "no recipes contain ingredient");
            return Vec::new();
        }

        let details = join_all(
            found
                .recipes
                .iter()
                .take(INGREDIENT_DETAIL_LIMIT)
                .map(|recipe| self.fetch_detail(&recipe.id)),
        )
        .await;

        let mut seen = HashSet::new();
        let imported: Vec<ImportedIngredient> = details
            .iter()
            .flatten()
            .flat_map(|detail| &detail.ingredients)
            .filter(|ing| {
                ing.name.to_lowercase().contains(&needle)
                    || ing
                        .phrase
                        .as_deref()
                        .is_some_and(|p| p.to_lowercase().contains(&needle))
            })
            .filter(|ing| seen.insert(ing.name.to_lowercase()))
            .map(ImportedIngredient::from_ingredient)
            .collect();

        info!(query, count = imported.len(), "ingredient search complete");
        if !imported.is_empty() {
            self.cache.set(&key, &imported);
        }
        imported
    }

    /// Best-guess recipe for a set of ingredient names.
    ///
    /// Sends up to five unique names and asks for a single result.
    pub async fn identify_recipe<S: AsRef<str>>(&self, names: &[S]) -> Option<IdentifiedRecipe> {
        let query = build_match_query(names)?;
        let search = SearchQuery::ingredients(&query, 1);
        match with_retry(&self.retry, "identify_recipe", || self.fetch_search_page(&search)).await {
            Ok(found) => found.recipes.into_iter().next().map(|best| IdentifiedRecipe {
                id: best.id,
                title: best.title,
            }),
            Err(e) => {
                warn!(query = %query, error = %e, "recipe identification failed");
                None
            }
        }
    }
}
