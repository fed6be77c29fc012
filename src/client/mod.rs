//! HTTP client for the recipe API.
//!
//! [`RecipeClient`] wraps the remote recipe service: paged listing, the
//! combined ingredient/title search, and per-recipe detail. Every call
//! consults the [`CacheStore`] first.
//!
//! # Failure semantics
//!
//! Public operations never return errors. Internally everything is a
//! [`Result`]; at the boundary failures are logged and collapsed into an
//! empty value (`None`, `[]`, or [`RecipePage::empty`]). List and search
//! calls are retried once on transient errors; detail fetches are not.

mod builder;
mod daily;
mod detail;
pub mod fallback;
mod matching;
mod search;

pub use builder::RecipeClientBuilder;
pub use daily::DAILY_LIST_LIMIT;
pub use matching::{MATCH_DETAIL_LIMIT, MATCH_SEARCH_LIMIT};
pub use search::{INGREDIENT_DETAIL_LIMIT, INGREDIENT_SEARCH_LIMIT};

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::cache::CacheStore;
use crate::clock::Clock;
use crate::normalize::summaries_from_response;
use crate::retry::RetryConfig;
use crate::telemetry;
use crate::types::{RecipePage, RecipeSummary};
use crate::{Result, SaucierError};

/// Default base URL of the recipe API.
pub const DEFAULT_BASE_URL: &str = "https://api.foodoscope.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const LIST_PATH: &[&str] = &["recipe2-api", "recipe", "recipesinfo"];
const SEARCH_PATH: &[&str] = &[
    "recipe2-api",
    "recipebyingredient",
    "by-ingredients-categories-title",
];
const DETAIL_PATH: &[&str] = &["recipe2-api", "search-recipe"];

/// Client for the recipe API.
///
/// Cheap to clone; clones share the HTTP pool, the cache and the
/// recipe-of-the-day coalescing map.
///
/// ```rust,no_run
/// # async fn example() -> saucier::Result<()> {
/// let client = saucier::RecipeClient::builder()
///     .api_key("secret")
///     .build()?;
/// let matches = client.get_top_matches(&["tomato", "basil"]).await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RecipeClient {
    http: Client,
    base_url: Url,
    api_key: String,
    cache: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
    retry: RetryConfig,
    /// In-flight recipe-of-the-day lookups, keyed by cache key.
    in_flight: moka::future::Cache<String, RecipeSummary>,
}

impl RecipeClient {
    /// Create a builder.
    pub fn builder() -> RecipeClientBuilder {
        RecipeClientBuilder::new()
    }

    /// The cache store shared by all operations.
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// The clock used for cache keys that depend on the date.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // The builder rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a JSON document, recording request metrics.
    async fn get_json(&self, endpoint: &'static str, url: Url, query: &[(&str, String)]) -> Result<Value> {
        let start = Instant::now();
        let result = self.send(url, query).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "endpoint" => endpoint, "status" => status)
            .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "endpoint" => endpoint)
            .record(start.elapsed().as_secs_f64());
        result
    }

    async fn send(&self, url: Url, query: &[(&str, String)]) -> Result<Value> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        handle_response_errors(&response, url.path())?;
        Ok(response.json::<Value>().await?)
    }

    /// Fetch one page from the list endpoint.
    async fn fetch_list_page(&self, page: u32, limit: u32) -> Result<RecipePage> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        let body = self.get_json("list", self.endpoint(LIST_PATH), &query).await?;
        Ok(page_from_body(&body, page, limit))
    }

    /// Fetch one page from the search endpoint.
    async fn fetch_search_page(&self, search: &SearchQuery<'_>) -> Result<RecipePage> {
        let mut query = Vec::with_capacity(4);
        if let Some(ingredients) = search.ingredients {
            query.push(("includeIngredients", ingredients.to_string()));
        }
        if let Some(title) = search.title {
            query.push(("title", title.to_string()));
        }
        query.push(("page", search.page.to_string()));
        query.push(("limit", search.limit.to_string()));

        let body = self.get_json("search", self.endpoint(SEARCH_PATH), &query).await?;
        Ok(page_from_body(&body, search.page, search.limit))
    }

    /// Fetch the raw detail document for `id`.
    async fn fetch_detail_body(&self, id: &str) -> Result<Value> {
        let mut url = self.endpoint(DETAIL_PATH);
        if let Ok(mut path) = url.path_segments_mut() {
            path.push(id);
        }
        self.get_json("detail", url, &[]).await
    }
}

impl std::fmt::Debug for RecipeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeClient")
            .field("base_url", &self.base_url.as_str())
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Parameters of one search request.
#[derive(Debug, Clone, Copy)]
struct SearchQuery<'a> {
    ingredients: Option<&'a str>,
    title: Option<&'a str>,
    page: u32,
    limit: u32,
}

impl<'a> SearchQuery<'a> {
    fn ingredients(ingredients: &'a str, limit: u32) -> Self {
        Self {
            ingredients: Some(ingredients),
            title: None,
            page: 1,
            limit,
        }
    }

    fn title(title: &'a str, page: u32, limit: u32) -> Self {
        Self {
            ingredients: None,
            title: Some(title),
            page,
            limit,
        }
    }
}

fn page_from_body(body: &Value, page: u32, limit: u32) -> RecipePage {
    let (recipes, raw) = summaries_from_response(body);
    RecipePage {
        recipes,
        page,
        limit,
        raw,
    }
}

/// Map non-success statuses onto [`SaucierError`].
fn handle_response_errors(response: &reqwest::Response, resource: &str) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        401 | 403 => Err(SaucierError::AuthenticationFailed),
        404 => Err(SaucierError::NotFound(resource.to_string())),
        code => Err(SaucierError::Api {
            status: code,
            message: format!("recipe API error: {status}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RecipeClient {
        RecipeClient::builder()
            .api_key("k")
            .base_url(base)
            .build()
            .unwrap()
    }

    #[test]
    fn endpoint_joins_segments() {
        let c = client("http://localhost:9000");
        assert_eq!(
            c.endpoint(LIST_PATH).as_str(),
            "http://localhost:9000/recipe2-api/recipe/recipesinfo"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = client("http://localhost:9000/proxy/");
        assert_eq!(
            c.endpoint(DETAIL_PATH).as_str(),
            "http://localhost:9000/proxy/recipe2-api/search-recipe"
        );
    }
}
