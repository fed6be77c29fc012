//! Static fallback recipes.
//!
//! Ids in [`FALLBACK_IDS`] never reach the network: [`recipe_detail()`]
//! serves them from the table below. The same recipes back the
//! recipe-of-the-day when the API is unreachable.

use std::ops::RangeInclusive;

use rand::seq::IndexedRandom;

use crate::types::{Ingredient, Nutrition, RecipeDetail, RecipeSummary};

/// Reserved id range for static recipes.
pub const FALLBACK_IDS: RangeInclusive<u32> = 900_001..=900_099;

struct StaticRecipe {
    id: u32,
    title: &'static str,
    region: &'static str,
    category: &'static str,
    calories: f64,
    protein: f64,
    fat: f64,
    carbs: f64,
    ingredients: &'static [(&'static str, f64, &'static str)],
    instructions: &'static str,
}

const RECIPES: &[StaticRecipe] = &[
    StaticRecipe {
        id: 900_001,
        title: "Margherita Pizza",
        region: "Italian",
        category: "Main Course",
        calories: 850.0,
        protein: 36.0,
        fat: 30.0,
        carbs: 105.0,
        ingredients: &[
            ("pizza dough", 250.0, "g"),
            ("tomato", 3.0, "piece"),
            ("mozzarella", 125.0, "g"),
            ("basil", 6.0, "leaf"),
            ("olive oil", 1.0, "tbsp"),
        ],
        instructions: "Stretch the dough.\nTop with crushed tomato and torn mozzarella.\nBake at 250C for 8 minutes.\nFinish with basil and olive oil.",
    },
    StaticRecipe {
        id: 900_002,
        title: "Chicken Tikka Masala",
        region: "Indian Subcontinent",
        category: "Main Course",
        calories: 620.0,
        protein: 48.0,
        fat: 32.0,
        carbs: 28.0,
        ingredients: &[
            ("chicken", 500.0, "g"),
            ("yogurt", 150.0, "g"),
            ("garam masala", 2.0, "tsp"),
            ("tomato", 400.0, "g"),
            ("cream", 100.0, "ml"),
            ("onion", 1.0, "piece"),
            ("garlic", 3.0, "clove"),
        ],
        instructions: "Marinate the chicken in yogurt and spices.\nGrill until charred.\nSimmer onion, garlic and tomato, then stir in cream.\nAdd the chicken and simmer 10 minutes.",
    },
    StaticRecipe {
        id: 900_003,
        title: "Caesar Salad",
        region: "North American",
        category: "Salad",
        calories: 410.0,
        protein: 14.0,
        fat: 31.0,
        carbs: 18.0,
        ingredients: &[
            ("romaine lettuce", 1.0, "piece"),
            ("parmesan", 40.0, "g"),
            ("bread", 2.0, "slice"),
            ("egg", 1.0, "piece"),
            ("anchovy", 4.0, "piece"),
            ("lemon", 0.5, "piece"),
        ],
        instructions: "Toast cubed bread into croutons.\nWhisk egg yolk, anchovy and lemon into a dressing.\nToss with lettuce and shaved parmesan.",
    },
    StaticRecipe {
        id: 900_004,
        title: "Vegetable Stir Fry",
        region: "Chinese and Mongolian",
        category: "Main Course",
        calories: 320.0,
        protein: 9.0,
        fat: 14.0,
        carbs: 40.0,
        ingredients: &[
            ("broccoli", 200.0, "g"),
            ("bell pepper", 1.0, "piece"),
            ("carrot", 1.0, "piece"),
            ("soy sauce", 2.0, "tbsp"),
            ("ginger", 1.0, "tsp"),
            ("garlic", 2.0, "clove"),
        ],
        instructions: "Slice the vegetables thinly.\nStir fry garlic and ginger in a hot wok.\nAdd vegetables, toss 4 minutes, season with soy sauce.",
    },
    StaticRecipe {
        id: 900_005,
        title: "Spaghetti Aglio e Olio",
        region: "Italian",
        category: "Main Course",
        calories: 540.0,
        protein: 15.0,
        fat: 20.0,
        carbs: 75.0,
        ingredients: &[
            ("spaghetti", 200.0, "g"),
            ("garlic", 4.0, "clove"),
            ("olive oil", 4.0, "tbsp"),
            ("chili flakes", 1.0, "tsp"),
            ("parsley", 2.0, "tbsp"),
        ],
        instructions: "Boil the spaghetti.\nGently fry sliced garlic and chili in olive oil.\nToss with pasta, a splash of cooking water and parsley.",
    },
];

impl StaticRecipe {
    fn summary(&self) -> RecipeSummary {
        RecipeSummary::new(self.id.to_string(), self.title)
            .with_region(self.region)
            .with_category(self.category)
            .with_calories(self.calories)
    }

    fn detail(&self) -> RecipeDetail {
        RecipeDetail {
            id: self.id.to_string(),
            title: self.title.to_string(),
            ingredients: self
                .ingredients
                .iter()
                .map(|(name, qty, unit)| Ingredient::new(*name).with_quantity(*qty).with_unit(*unit))
                .collect(),
            instructions: Some(self.instructions.to_string()),
            image: None,
            nutrition: Nutrition {
                calories: Some(self.calories),
                protein: Some(self.protein),
                fat: Some(self.fat),
                carbs: Some(self.carbs),
            },
            category: Some(self.category.to_string()),
        }
    }
}

/// Whether `id` lies in the reserved static range.
pub fn is_fallback_id(id: &str) -> bool {
    id.trim()
        .parse::<u32>()
        .is_ok_and(|n| FALLBACK_IDS.contains(&n))
}

/// Static detail for a reserved id, if one is defined.
pub fn recipe_detail(id: &str) -> Option<RecipeDetail> {
    let id = id.trim().parse::<u32>().ok()?;
    RECIPES.iter().find(|r| r.id == id).map(StaticRecipe::detail)
}

/// Summaries of every static recipe.
pub fn daily_candidates() -> Vec<RecipeSummary> {
    RECIPES.iter().map(StaticRecipe::summary).collect()
}

/// A random static recipe.
pub fn daily_pick() -> RecipeSummary {
    let candidates = daily_candidates();
    match pick_random(&candidates) {
        Some(summary) => summary.clone(),
        None => RecipeSummary::new(FALLBACK_IDS.start().to_string(), crate::types::UNTITLED_RECIPE),
    }
}

/// Uniform random element; the rng never outlives the call.
pub(crate) fn pick_random<T>(items: &[T]) -> Option<&T> {
    items.choose(&mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_range() {
        assert!(is_fallback_id("900001"));
        assert!(is_fallback_id(" 900099 "));
        assert!(!is_fallback_id("900100"));
        assert!(!is_fallback_id("42"));
        assert!(!is_fallback_id("abc"));
    }

    #[test]
    fn static_details_are_complete() {
        for summary in daily_candidates() {
            let detail = recipe_detail(&summary.id).unwrap();
            assert!(!detail.looks_stale(), "{} looks stale", detail.title);
            assert_eq!(detail.summary().calories, summary.calories);
        }
    }

    #[test]
    fn undefined_reserved_id_has_no_detail() {
        assert!(is_fallback_id("900050"));
        assert!(recipe_detail("900050").is_none());
    }

    #[test]
    fn daily_pick_is_a_static_recipe() {
        let pick = daily_pick();
        assert!(is_fallback_id(&pick.id));
    }
}
