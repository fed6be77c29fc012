//! Ingredient-overlap scoring and the validity rule.
//!
//! Pure functions: the client fetches summaries and details, this module
//! decides how well each candidate matches the user's vessel.

use std::cmp::Ordering;

use crate::types::{RecipeDetail, RecipeSummary, ScoredCandidate};

/// Upper bound on ingredient names sent in a match query.
pub const MAX_QUERY_INGREDIENTS: usize = 5;

/// Lowercased, trimmed, non-empty names in first-seen order, without
/// duplicates.
pub fn unique_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref().trim().to_lowercase();
        if name.is_empty() || out.contains(&name) {
            continue;
        }
        out.push(name);
    }
    out
}

/// Comma-joined `includeIngredients` query of the first
/// [`MAX_QUERY_INGREDIENTS`] unique names, `None` when no usable names.
pub fn build_match_query<S: AsRef<str>>(names: &[S]) -> Option<String> {
    let mut names = unique_names(names);
    names.truncate(MAX_QUERY_INGREDIENTS);
    (!names.is_empty()).then(|| names.join(","))
}

/// Whether a recipe ingredient matches any user name.
///
/// Containment in either direction, so "red onion" matches "onion" and
/// "onion" matches "onions".
pub fn ingredient_matches(ingredient: &str, names: &[String]) -> bool {
    let ingredient = ingredient.trim().to_lowercase();
    if ingredient.is_empty() {
        return false;
    }
    names
        .iter()
        .any(|name| ingredient.contains(name.as_str()) || name.contains(ingredient.as_str()))
}

/// Score a candidate against the whole vessel, as lowercased names.
///
/// Without a detail the candidate scores zero matches out of zero.
pub fn score(
    summary: RecipeSummary,
    detail: Option<RecipeDetail>,
    names: &[String],
) -> ScoredCandidate {
    let (match_count, recipe_total) = match &detail {
        Some(detail) => (
            detail
                .ingredients
                .iter()
                .filter(|i| ingredient_matches(&i.name, names))
                .count(),
            detail.ingredients.len(),
        ),
        None => (0, 0),
    };
    let match_percentage = if names.is_empty() {
        0.0
    } else {
        match_count as f64 / names.len() as f64 * 100.0
    };
    let purity = if recipe_total == 0 {
        0.0
    } else {
        match_count as f64 / recipe_total as f64
    };
    ScoredCandidate {
        summary,
        match_count,
        match_percentage,
        recipe_total,
        purity,
        detail,
    }
}

/// Sort by match count, then purity, both descending. Stable.
pub fn rank(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| {
        b.match_count.cmp(&a.match_count).then_with(|| {
            b.purity
                .partial_cmp(&a.purity)
                .unwrap_or(Ordering::Equal)
        })
    });
}

/// A detail is usable when it has ingredients and at most half of them
/// are unresolved.
pub fn is_valid_detail(detail: &RecipeDetail) -> bool {
    let total = detail.ingredients.len();
    total > 0 && detail.unresolved_count() * 2 <= total
}

/// Overlay detail fields onto a summary; summary values are fallbacks.
pub fn merge_detail(mut summary: RecipeSummary, detail: &RecipeDetail) -> RecipeSummary {
    if !detail.has_placeholder_title() {
        summary.title = detail.title.clone();
    }
    if let Some(calories) = detail.nutrition.calories {
        summary.calories = Some(calories);
    }
    if let Some(category) = &detail.category {
        summary.category = Some(category.clone());
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ingredient, Nutrition};

    fn detail(names: &[&str]) -> RecipeDetail {
        RecipeDetail {
            id: "1".into(),
            title: "Test".into(),
            ingredients: names
                .iter()
                .map(|n| Ingredient::new(*n).with_quantity(1.0))
                .collect(),
            instructions: None,
            image: None,
            nutrition: Nutrition::default(),
            category: None,
        }
    }

    #[test]
    fn unique_names_dedups_without_cap() {
        let names = unique_names(&[" Egg", "egg", "", "Milk", "a", "b", "c", "d"]);
        assert_eq!(names, vec!["egg", "milk", "a", "b", "c", "d"]);
    }

    #[test]
    fn match_query_is_capped() {
        let query = build_match_query(&["Egg", "egg", "milk", "a", "b", "c", "d"]);
        assert_eq!(query.as_deref(), Some("egg,milk,a,b,c"));
    }

    #[test]
    fn empty_query_is_none() {
        assert_eq!(build_match_query(&["  ", ""]), None);
        assert_eq!(build_match_query(&["Tomato", "basil"]).as_deref(), Some("tomato,basil"));
    }

    #[test]
    fn containment_both_ways() {
        let names = vec!["onion".to_string()];
        assert!(ingredient_matches("Red Onion", &names));
        assert!(ingredient_matches("onio", &names));
        assert!(!ingredient_matches("garlic", &names));
        assert!(!ingredient_matches("", &names));
    }

    #[test]
    fn score_computes_purity_and_percentage() {
        let names = vec!["egg".to_string(), "tomato".to_string()];
        let scored = score(
            RecipeSummary::new("1", "Shakshuka"),
            Some(detail(&["egg", "tomato", "pepper", "cumin"])),
            &names,
        );
        assert_eq!(scored.match_count, 2);
        assert_eq!(scored.recipe_total, 4);
        assert_eq!(scored.purity, 0.5);
        assert_eq!(scored.match_percentage, 100.0);
    }

    #[test]
    fn score_without_detail_is_zero() {
        let scored = score(RecipeSummary::new("1", "X"), None, &["egg".to_string()]);
        assert_eq!(scored.match_count, 0);
        assert_eq!(scored.purity, 0.0);
    }

    #[test]
    fn validity_rule() {
        assert!(!is_valid_detail(&detail(&[])));
        assert!(is_valid_detail(&detail(&["egg", "Unknown"])));
        assert!(!is_valid_detail(&detail(&["egg", "Unknown", ""])));
    }

    #[test]
    fn merge_prefers_detail() {
        let mut d = detail(&["egg"]);
        d.title = "Omelette".into();
        d.nutrition.calories = Some(210.0);
        let merged = merge_detail(RecipeSummary::new("1", "Untitled Recipe").with_category("Breakfast"), &d);
        assert_eq!(merged.title, "Omelette");
        assert_eq!(merged.calories, Some(210.0));
        assert_eq!(merged.category.as_deref(), Some("Breakfast"));
    }
}
