//! Recipe records returned by the client.
//!
//! Summaries come from the list and search endpoints, details from the
//! per-recipe endpoint after normalization. Both are plain data and
//! round-trip through the cache as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Ingredient;

/// Placeholder title for recipes whose title could not be discovered.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Minimal recipe identity from a list or search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Upstream recipe id (numeric ids are stringified).
    pub id: String,
    /// Recipe title, [`UNTITLED_RECIPE`] when unknown.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Calorie hint (kcal) if the page carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
}

impl RecipeSummary {
    /// Create a summary with only id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            region: None,
            sub_region: None,
            category: None,
            calories: None,
        }
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the calorie hint.
    pub fn with_calories(mut self, kcal: f64) -> Self {
        self.calories = Some(kcal);
        self
    }
}

/// One page of list or search results.
///
/// `raw` keeps the upstream items as received so callers can reuse fields
/// the normalizer does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePage {
    pub recipes: Vec<RecipeSummary>,
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub raw: Vec<Value>,
}

impl RecipePage {
    /// The sentinel "no data" page.
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            recipes: Vec::new(),
            page,
            limit,
            raw: Vec::new(),
        }
    }

    /// Whether the page holds no recipes.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Whether another page is likely available.
    ///
    /// True when upstream returned a full page, regardless of how many
    /// recipes a later validity filter removes.
    pub fn has_more(&self) -> bool {
        self.limit > 0 && self.raw.len() >= self.limit as usize
    }
}

/// Nutrition facts. Only calories are reliably present upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
}

/// Normalized full recipe record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: String,
    /// Never empty: falls back to [`UNTITLED_RECIPE`].
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub category: Option<String>,
}

impl RecipeDetail {
    /// Whether the title is missing or the placeholder.
    pub fn has_placeholder_title(&self) -> bool {
        let title = self.title.trim();
        title.is_empty() || title.eq_ignore_ascii_case(UNTITLED_RECIPE)
    }

    /// Number of ingredients whose name could not be resolved.
    pub fn unresolved_count(&self) -> usize {
        self.ingredients.iter().filter(|i| i.is_unresolved()).count()
    }

    /// Content-based staleness check for cached details.
    ///
    /// A cached detail is stale when it carries any sign of an earlier,
    /// incomplete normalization: placeholder title, an ingredient quantity
    /// of exactly zero, an `Unknown` ingredient, or no calories.
    pub fn looks_stale(&self) -> bool {
        self.has_placeholder_title()
            || self.ingredients.iter().any(|i| i.quantity == 0.0)
            || self.ingredients.iter().any(|i| i.is_unresolved())
            || self.nutrition.calories.is_none()
    }

    /// Summary view of this detail.
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            region: None,
            sub_region: None,
            category: self.category.clone(),
            calories: self.nutrition.calories,
        }
    }
}

/// A candidate recipe scored against the user's selected ingredients.
///
/// Computed fresh on every call; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub summary: RecipeSummary,
    /// Recipe ingredients overlapping the user's selection.
    pub match_count: usize,
    /// `match_count` as a percentage of the user's selection (0–100).
    pub match_percentage: f64,
    /// Total ingredients in the recipe.
    pub recipe_total: usize,
    /// `match_count / recipe_total`; 0 when the recipe has no ingredients.
    pub purity: f64,
    /// Full detail, when it could be fetched.
    pub detail: Option<RecipeDetail>,
}

/// Best-guess recipe for a set of ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedRecipe {
    pub id: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> RecipeDetail {
        RecipeDetail {
            id: "1".into(),
            title: "Shakshuka".into(),
            ingredients: vec![
                Ingredient::new("egg").with_quantity(4.0),
                Ingredient::new("tomato").with_quantity(3.0),
            ],
            instructions: None,
            image: None,
            nutrition: Nutrition {
                calories: Some(320.0),
                ..Nutrition::default()
            },
            category: None,
        }
    }

    #[test]
    fn complete_detail_is_fresh() {
        assert!(!detail().looks_stale());
    }

    #[test]
    fn placeholder_title_is_stale() {
        let mut d = detail();
        d.title = "untitled recipe".into();
        assert!(d.looks_stale());
    }

    #[test]
    fn zero_quantity_is_stale() {
        let mut d = detail();
        d.ingredients[0].quantity = 0.0;
        assert!(d.looks_stale());
    }

    #[test]
    fn unknown_ingredient_is_stale() {
        let mut d = detail();
        d.ingredients.push(Ingredient::new("Unknown").with_quantity(1.0));
        assert!(d.looks_stale());
    }

    #[test]
    fn missing_calories_is_stale() {
        let mut d = detail();
        d.nutrition.calories = None;
        assert!(d.looks_stale());
    }

    #[test]
    fn has_more_needs_full_raw_page() {
        let mut page = RecipePage::empty(1, 2);
        assert!(!page.has_more());
        page.raw = vec![Value::Null, Value::Null];
        assert!(page.has_more());
    }
}
