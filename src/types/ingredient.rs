//! Ingredient types: recipe ingredients, imported pantry records, and the
//! user's vessel selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Nutrition;
use crate::flavor::FlavorProfile;

/// Name given to ingredients whose name could not be recovered.
pub const UNKNOWN_INGREDIENT: &str = "Unknown";

/// Unit used when upstream omits one (usually meaning one whole item).
pub const DEFAULT_UNIT: &str = "piece";

/// Units counted in whole items; a missing quantity defaults to 1 for
/// these and to 10 for everything else.
pub const COUNT_UNITS: &[&str] = &["cup", "oz", "tbsp", "tsp", "piece", "slice"];

/// An ingredient line of a normalized recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Upstream ingredient id, or a slug of the name.
    pub id: String,
    /// Ingredient name, [`UNKNOWN_INGREDIENT`] when unresolved.
    pub name: String,
    /// Free-text phrase from the recipe ("2 cloves garlic, minced").
    #[serde(default)]
    pub phrase: Option<String>,
    /// Parsed quantity; 0 when upstream gave nothing parsable.
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    /// Create an ingredient with the slug id, zero quantity and default unit.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: slug(&name),
            name,
            phrase: None,
            quantity: 0.0,
            unit: DEFAULT_UNIT.to_string(),
        }
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set the descriptive phrase.
    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = Some(phrase.into());
        self
    }

    /// Whether the name is empty or the `Unknown` placeholder.
    pub fn is_unresolved(&self) -> bool {
        let name = self.name.trim();
        name.is_empty() || name.eq_ignore_ascii_case(UNKNOWN_INGREDIENT)
    }
}

/// Lowercase, alphanumeric-and-underscore form of a name.
pub(crate) fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// A pantry record synthesized from a recipe ingredient.
///
/// Flavor and nutrition are placeholders; the ingredient search only
/// recovers names, phrases and units from upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedIngredient {
    /// `api_<upstream id or slug>`.
    pub id: String,
    pub name: String,
    /// Descriptive phrase, or the name when there is none.
    pub scientific: String,
    pub category: String,
    pub tags: Vec<String>,
    pub unit: String,
    pub flavor_profile: BTreeMap<String, u32>,
    pub nutrition: Nutrition,
    pub chemicals: Vec<String>,
}

impl ImportedIngredient {
    /// Category assigned to every imported record.
    pub const CATEGORY: &'static str = "IMPORTED";

    /// Build the imported record for a recipe ingredient.
    pub fn from_ingredient(ingredient: &Ingredient) -> Self {
        let unit = if ingredient.unit.trim().is_empty() {
            DEFAULT_UNIT.to_string()
        } else {
            ingredient.unit.clone()
        };
        Self {
            id: format!("api_{}", ingredient.id),
            name: ingredient.name.clone(),
            scientific: ingredient
                .phrase
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| ingredient.name.clone()),
            category: Self::CATEGORY.to_string(),
            tags: vec!["API_SOURCED".to_string(), "LIVE_DATA".to_string()],
            unit,
            flavor_profile: BTreeMap::from([("neutral".to_string(), 50), ("savory".to_string(), 50)]),
            nutrition: Nutrition {
                calories: Some(50.0),
                protein: Some(0.0),
                fat: Some(0.0),
                carbs: Some(0.0),
            },
            chemicals: vec!["Unknown Compound".to_string()],
        }
    }
}

/// One ingredient in the user's vessel.
///
/// Owned by the UI; matching only ever reads [`name`](Self::name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSelection {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Static flavor profile, used when no compound data is available.
    #[serde(default)]
    pub flavor: Option<FlavorProfile>,
}

impl IngredientSelection {
    /// Select an ingredient by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            flavor: None,
        }
    }

    /// Set quantity and unit.
    pub fn with_amount(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.quantity = Some(quantity);
        self.unit = Some(unit.into());
        self
    }

    /// Set the static flavor profile.
    pub fn with_flavor(mut self, flavor: FlavorProfile) -> Self {
        self.flavor = Some(flavor);
        self
    }

    /// Quantity to use when importing into the vessel.
    ///
    /// A missing or zero quantity becomes 1 for count-like units and 10
    /// otherwise (grams, millilitres and the like).
    pub fn resolved_quantity(&self) -> f64 {
        match self.quantity {
            Some(q) if q != 0.0 => q,
            _ => {
                let unit = self
                    .unit
                    .as_deref()
                    .unwrap_or(DEFAULT_UNIT)
                    .to_lowercase();
                if COUNT_UNITS.iter().any(|u| unit.contains(u)) {
                    1.0
                } else {
                    10.0
                }
            }
        }
    }

    /// Copy with [`resolved_quantity()`](Self::resolved_quantity) applied.
    pub fn with_default_quantity(mut self) -> Self {
        self.quantity = Some(self.resolved_quantity());
        self
    }
}
