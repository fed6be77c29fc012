//! Normalization of upstream recipe payloads.
//!
//! The recipe API is inconsistent: responses arrive wrapped as
//! `{payload: {data: [...]}}`, as `{payload: {...}}`, or bare; ids show up
//! as `Recipe_id`, `recipe_id` or `_id`; titles and calories hide at
//! varying depths. Everything shape-related is isolated here:
//!
//! - [`Envelope`]: explicit decoding of the response wrapper.
//! - Alias tables + [`lookup()`]: prioritized field names per logical field.
//! - [`discover`]: recursive title/calorie discovery.
//! - [`summary_from_value()`] / [`detail_from_value()`]: typed records.

pub mod discover;

pub use discover::{FieldQuery, discover_calories, discover_title};

use serde_json::{Map, Value};

use crate::types::{
    DEFAULT_UNIT, Ingredient, Nutrition, RecipeDetail, RecipeSummary, UNKNOWN_INGREDIENT,
    UNTITLED_RECIPE,
};
use crate::{Result, SaucierError};

// ============================================================================
// Alias tables (highest priority first)
// ============================================================================

pub const ID_ALIASES: &[&str] = &[
    "Recipe_id",
    "recipe_id",
    "RecipeID",
    "RecipeId",
    "recipeId",
    "_id",
    "id",
];
pub const TITLE_ALIASES: &[&str] = &["Recipe_title", "recipe_title", "title", "name"];
pub const REGION_ALIASES: &[&str] = &["Region", "region"];
pub const SUB_REGION_ALIASES: &[&str] = &["Sub_region", "sub_region"];
pub const CATEGORY_ALIASES: &[&str] = &["Category", "category", "Sub_category", "course"];
pub const CALORIE_ALIASES: &[&str] = &["Energy (kcal)", "Calories", "calories", "energy"];
pub const INGREDIENT_LIST_ALIASES: &[&str] = &["ingredients", "Ingredients"];
pub const INGREDIENT_NAME_ALIASES: &[&str] = &["ingredient", "Ingredient", "ingredient_name", "name"];
pub const INGREDIENT_PHRASE_ALIASES: &[&str] = &["ingredient_Phrase", "ingredient_phrase", "phrase"];
pub const INGREDIENT_ID_ALIASES: &[&str] = &["ing_id", "Ing_id", "ingredient_id", "id"];
pub const QUANTITY_ALIASES: &[&str] = &["quantity", "Quantity", "qty"];
pub const UNIT_ALIASES: &[&str] = &["unit", "Unit"];
pub const INSTRUCTION_KEYS: &[&str] = &["instructions", "steps", "method", "directions"];
pub const IMAGE_KEYS: &[&str] = &["image", "img_url", "image_url", "imageurl"];

// ============================================================================
// Envelope
// ============================================================================

/// The decoded response wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope<'a> {
    /// A list of items (search and list endpoints).
    List(&'a [Value]),
    /// A single record (detail endpoint).
    Record(&'a Map<String, Value>),
    /// Nothing usable.
    Empty,
}

impl<'a> Envelope<'a> {
    /// Decode any of the accepted response shapes.
    ///
    /// `payload` is unwrapped first if present, then `data`.
    pub fn decode(value: &'a Value) -> Self {
        let payload = value.get("payload").unwrap_or(value);
        match payload {
            Value::Array(items) => Envelope::List(items),
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(items)) => Envelope::List(items),
                Some(Value::Object(record)) => Envelope::Record(record),
                _ => Envelope::Record(map),
            },
            _ => Envelope::Empty,
        }
    }

    /// Items of a list envelope; empty for records.
    pub fn items(&self) -> Vec<&'a Value> {
        match self {
            Envelope::List(items) => items.iter().collect(),
            Envelope::Record(_) | Envelope::Empty => Vec::new(),
        }
    }

    /// The single record, or the first object of a list.
    pub fn record(&self) -> Option<&'a Map<String, Value>> {
        match self {
            Envelope::Record(map) => Some(map),
            Envelope::List(items) => items.iter().find_map(Value::as_object),
            Envelope::Empty => None,
        }
    }
}

// ============================================================================
// Scalar helpers
// ============================================================================

/// First non-null value among `aliases`.
pub fn lookup<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| map.get(*alias))
        .find(|v| !v.is_null())
}

/// Non-empty trimmed text; numbers are stringified.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric value, parsing leading numbers out of strings ("320 kcal").
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_number(s),
        _ => None,
    }
}

/// Parse the longest numeric prefix of `s`, like a lenient float parser.
fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    // "1." and "1.2.3" style prefixes: back off until it parses.
    (1..=end)
        .rev()
        .find_map(|n| s[..n].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn text_field(map: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    lookup(map, aliases).and_then(as_text)
}

/// Text found under any of `keys` (case-insensitive), anywhere outside
/// ingredient subtrees. Arrays of strings are joined by newlines.
fn find_text(value: &Value, keys: &'static [&'static str]) -> Option<String> {
    FieldQuery::new(
        move |k| keys.iter().any(|key| k.eq_ignore_ascii_case(key)),
        |v| match v {
            Value::Array(parts) => {
                let lines: Vec<String> = parts.iter().filter_map(as_text).collect();
                (!lines.is_empty()).then(|| lines.join("\n"))
            }
            other => as_text(other),
        },
    )
    .find(value)
}

fn find_number(value: &Value, fragment: &'static str) -> Option<f64> {
    FieldQuery::new(
        move |k| k.to_lowercase().contains(fragment),
        |v| as_number(v).or_else(|| v.get("quantity").and_then(as_number)),
    )
    .find(value)
}

// ============================================================================
// Records
// ============================================================================

/// Build a summary from one list/search item.
///
/// Returns `None` when the item is not an object or has no id.
pub fn summary_from_value(item: &Value) -> Option<RecipeSummary> {
    let map = item.as_object()?;
    let id = text_field(map, ID_ALIASES)?;
    let title = text_field(map, TITLE_ALIASES)
        .filter(|t| !t.eq_ignore_ascii_case(UNTITLED_RECIPE))
        .or_else(|| discover_title(item))
        .unwrap_or_else(|| UNTITLED_RECIPE.to_string());
    let calories = lookup(map, CALORIE_ALIASES)
        .and_then(as_number)
        .or_else(|| discover_calories(item));

    Some(RecipeSummary {
        id,
        title,
        region: text_field(map, REGION_ALIASES),
        sub_region: text_field(map, SUB_REGION_ALIASES),
        category: text_field(map, CATEGORY_ALIASES),
        calories,
    })
}

/// Summaries plus raw items of a list/search response.
///
/// Items without an id are dropped from `recipes` but kept in the raw list.
pub fn summaries_from_response(body: &Value) -> (Vec<RecipeSummary>, Vec<Value>) {
    let items = Envelope::decode(body).items();
    let summaries = items.iter().filter_map(|item| summary_from_value(item)).collect();
    let raw = items.into_iter().cloned().collect();
    (summaries, raw)
}

/// Normalize one ingredient line.
pub fn ingredient_from_value(value: &Value) -> Ingredient {
    let Some(map) = value.as_object() else {
        // Bare strings occasionally stand in for ingredient objects.
        return Ingredient::new(as_text(value).unwrap_or_else(|| UNKNOWN_INGREDIENT.to_string()));
    };
    let name = text_field(map, INGREDIENT_NAME_ALIASES)
        .unwrap_or_else(|| UNKNOWN_INGREDIENT.to_string());
    let mut ingredient = Ingredient::new(name);
    if let Some(id) = text_field(map, INGREDIENT_ID_ALIASES) {
        ingredient.id = id;
    }
    ingredient.phrase = text_field(map, INGREDIENT_PHRASE_ALIASES);
    ingredient.quantity = lookup(map, QUANTITY_ALIASES)
        .and_then(as_number)
        .unwrap_or(0.0);
    ingredient.unit = text_field(map, UNIT_ALIASES).unwrap_or_else(|| DEFAULT_UNIT.to_string());
    ingredient
}

/// The ingredient array of a record, at top level or one object down.
fn ingredient_list(record: &Map<String, Value>) -> &[Value] {
    let nested = || {
        record
            .values()
            .filter_map(Value::as_object)
            .find_map(|child| lookup(child, INGREDIENT_LIST_ALIASES))
    };
    lookup(record, INGREDIENT_LIST_ALIASES)
        .or_else(nested)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Build a [`RecipeDetail`] from a detail response body.
///
/// `id` is the requested id; it is used when the payload carries none.
pub fn detail_from_value(id: &str, body: &Value) -> Result<RecipeDetail> {
    let record = Envelope::decode(body)
        .record()
        .ok_or(SaucierError::EmptyResponse)?;
    let record_value = Value::Object(record.clone());

    let ingredients = ingredient_list(record)
        .iter()
        .map(ingredient_from_value)
        .collect();

    Ok(RecipeDetail {
        id: text_field(record, ID_ALIASES).unwrap_or_else(|| id.to_string()),
        title: discover_title(&record_value).unwrap_or_else(|| UNTITLED_RECIPE.to_string()),
        ingredients,
        instructions: find_text(&record_value, INSTRUCTION_KEYS),
        image: find_text(&record_value, IMAGE_KEYS),
        nutrition: Nutrition {
            calories: discover_calories(&record_value),
            protein: find_number(&record_value, "protein"),
            fat: find_number(&record_value, "fat"),
            carbs: find_number(&record_value, "carbohydrate"),
        },
        category: find_text(&record_value, CATEGORY_ALIASES),
    })
}
