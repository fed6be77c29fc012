//! Recursive "find this kind of field anywhere" lookups.
//!
//! Upstream payloads disagree on casing and nesting, so titles and
//! calories are discovered by walking the JSON tree. [`FieldQuery`] is the
//! generic walker: a key predicate, a value extractor, and a list of
//! subtree keys never descended into.
//!
//! Traversal is depth-first in source key order (serde_json is built with
//! `preserve_order`), and the first accepted value wins.

use serde_json::Value;

use super::as_number;
use crate::types::UNTITLED_RECIPE;

/// Subtrees skipped by default: ingredient arrays are full of `name`-like
/// keys that would otherwise be mistaken for the recipe's own fields.
pub const INGREDIENT_SUBTREES: &[&str] = &["ingredients", "Ingredients"];

/// Keys (case-insensitive) that may hold a recipe title.
pub const TITLE_KEYS: &[&str] = &[
    "title",
    "name",
    "label",
    "header",
    "recipe_title",
    "recipe_name",
];

/// Key fragments (case-insensitive) that mark a calorie field.
pub const CALORIE_KEY_FRAGMENTS: &[&str] = &[
    "energy",
    "calories",
    "kcal",
    "enerc_kcal",
    "energy (kcal)",
    "recipe_calories",
];

type KeyPredicate<'q> = Box<dyn Fn(&str) -> bool + Send + Sync + 'q>;
type Extractor<'q, T> = Box<dyn Fn(&Value) -> Option<T> + Send + Sync + 'q>;

/// A parameterized tree walk.
///
/// ```rust
/// # use saucier::normalize::FieldQuery;
/// # use serde_json::json;
/// let query = FieldQuery::new(|k| k == "servings", |v| v.as_u64());
/// let doc = json!({"meta": {"servings": 4}});
/// assert_eq!(query.find(&doc), Some(4));
/// ```
pub struct FieldQuery<'q, T> {
    key_matches: KeyPredicate<'q>,
    extract: Extractor<'q, T>,
    skip: Vec<&'q str>,
}

impl<'q, T> FieldQuery<'q, T> {
    /// Create a query skipping [`INGREDIENT_SUBTREES`].
    pub fn new(
        key_matches: impl Fn(&str) -> bool + Send + Sync + 'q,
        extract: impl Fn(&Value) -> Option<T> + Send + Sync + 'q,
    ) -> Self {
        Self {
            key_matches: Box::new(key_matches),
            extract: Box::new(extract),
            skip: INGREDIENT_SUBTREES.to_vec(),
        }
    }

    /// Replace the skip list. Keys are compared exactly (case-sensitive).
    pub fn skip(mut self, keys: &[&'q str]) -> Self {
        self.skip = keys.to_vec();
        self
    }

    /// First accepted value, depth-first in key order.
    pub fn find(&self, value: &Value) -> Option<T> {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if (self.key_matches)(key) {
                        if let Some(found) = (self.extract)(child) {
                            return Some(found);
                        }
                    }
                    if self.skip.iter().any(|s| *s == key.as_str()) {
                        continue;
                    }
                    if child.is_object() || child.is_array() {
                        if let Some(found) = self.find(child) {
                            return Some(found);
                        }
                    }
                }
                None
            }
            Value::Array(items) => items.iter().find_map(|item| self.find(item)),
            _ => None,
        }
    }
}

fn is_title_key(key: &str) -> bool {
    let key = key.to_lowercase();
    TITLE_KEYS.contains(&key.as_str()) || (key.contains("recipe") && key.contains("title"))
}

fn usable_title(value: &Value) -> Option<String> {
    let title = value.as_str()?.trim();
    if title.is_empty() || title.eq_ignore_ascii_case(UNTITLED_RECIPE) {
        return None;
    }
    Some(title.to_string())
}

fn is_calorie_key(key: &str) -> bool {
    let key = key.to_lowercase();
    CALORIE_KEY_FRAGMENTS.iter().any(|f| key.contains(f))
}

fn calorie_value(value: &Value) -> Option<f64> {
    as_number(value).or_else(|| value.get("quantity").and_then(as_number))
}

/// Title query: title-like keys, non-placeholder string values.
pub fn title_query() -> FieldQuery<'static, String> {
    FieldQuery::new(is_title_key, usable_title)
}

/// Calorie query: energy/kcal-like keys, numeric or `{quantity}` values.
pub fn calorie_query() -> FieldQuery<'static, f64> {
    FieldQuery::new(is_calorie_key, calorie_value)
}

/// Discover a recipe title anywhere in `value`.
pub fn discover_title(value: &Value) -> Option<String> {
    title_query().find(value)
}

/// Discover a calorie figure anywhere in `value`.
pub fn discover_calories(value: &Value) -> Option<f64> {
    calorie_query().find(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_key_rules() {
        assert!(is_title_key("Recipe_title"));
        assert!(is_title_key("LABEL"));
        assert!(is_title_key("myRecipeTitleText"));
        assert!(!is_title_key("recipe_id"));
        assert!(!is_title_key("description"));
    }

    #[test]
    fn placeholder_title_rejected() {
        assert!(usable_title(&json!("Untitled recipe")).is_none());
        assert!(usable_title(&json!("  ")).is_none());
        assert!(usable_title(&json!(12)).is_none());
        assert_eq!(usable_title(&json!(" Dal ")).as_deref(), Some("Dal"));
    }

    #[test]
    fn calorie_value_forms() {
        assert_eq!(calorie_value(&json!(410.5)), Some(410.5));
        assert_eq!(calorie_value(&json!("320 kcal")), Some(320.0));
        assert_eq!(calorie_value(&json!({"quantity": "88", "unit": "kcal"})), Some(88.0));
        assert_eq!(calorie_value(&json!({"unit": "kcal"})), None);
    }

    #[test]
    fn custom_skip_list() {
        let doc = json!({"hidden": {"title": "Nope"}, "shown": {"title": "Yes"}});
        let query = title_query().skip(&["hidden"]);
        assert_eq!(query.find(&doc).as_deref(), Some("Yes"));
    }
}
