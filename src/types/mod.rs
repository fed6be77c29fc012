//! Public types for the Saucier API.

mod ingredient;
mod recipe;

pub use ingredient::{
    COUNT_UNITS, DEFAULT_UNIT, ImportedIngredient, Ingredient, IngredientSelection,
    UNKNOWN_INGREDIENT,
};
pub use recipe::{
    IdentifiedRecipe, Nutrition, RecipeDetail, RecipePage, RecipeSummary, ScoredCandidate,
    UNTITLED_RECIPE,
};
