//! Ranking behaviour of the match scorer.

use saucier::scoring::{rank, score, unique_names};
use saucier::{Ingredient, Nutrition, RecipeDetail, RecipeSummary, ScoredCandidate};

fn detail(id: &str, names: &[&str]) -> RecipeDetail {
    RecipeDetail {
        id: id.to_string(),
        title: format!("Recipe {id}"),
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

fn scored(id: &str, recipe: &[&str], query: &[&str]) -> ScoredCandidate {
    let names = unique_names(query);
    score(
        RecipeSummary::new(id, format!("Recipe {id}")),
        Some(detail(id, recipe)),
        &names,
    )
}

#[test]
fn purer_recipe_wins_a_tie_on_matches() {
    let query = ["egg", "tomato", "onion"];
    let b = scored(
        "b",
        &[
            "egg", "tomato", "onion", "flour", "sugar", "butter", "milk", "yeast", "salt", "vanilla",
        ],
        &query,
    );
    let a = scored("a", &["egg", "tomato", "onion", "cumin"], &query);

    let mut candidates = vec![b, a];
    rank(&mut candidates);

    assert_eq!(candidates[0].summary.id, "a");
    assert_eq!(candidates[0].match_count, 3);
    assert_eq!(candidates[0].purity, 0.75);
    assert_eq!(candidates[1].summary.id, "b");
    assert!((candidates[1].purity - 0.3).abs() < 1e-9);
}

#[test]
fn more_matches_beat_purity() {
    let query = ["egg", "tomato", "onion"];
    let pure = scored("pure", &["egg"], &query);
    let broad = scored(
        "broad",
        &["egg", "tomato", "flour", "sugar", "salt", "milk"],
        &query,
    );

    let mut candidates = vec![pure, broad];
    rank(&mut candidates);

    assert_eq!(candidates[0].summary.id, "broad");
    assert_eq!(candidates[1].summary.id, "pure");
}

#[test]
fn ranking_is_sorted_and_stable() {
    let query = ["garlic", "basil", "tomato", "oil"];
    let mut candidates = vec![
        scored("1", &["garlic", "oil", "pasta"], &query),
        scored("2", &["basil"], &query),
        scored("3", &["flour", "water"], &query),
        scored("4", &["garlic", "olive oil", "pasta"], &query),
        scored("5", &["tomato", "basil", "garlic", "oil"], &query),
        scored("6", &["sugar"], &query),
    ];
    candidates.push(score(RecipeSummary::new("7", "No detail"), None, &unique_names(&query)));
    rank(&mut candidates);

    for pair in candidates.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.match_count > b.match_count
                || (a.match_count == b.match_count && a.purity >= b.purity),
            "{} ranked before {}",
            a.summary.id,
            b.summary.id
        );
    }

    let ids: Vec<&str> = candidates.iter().map(|c| c.summary.id.as_str()).collect();
    assert_eq!(ids[0], "5");
    // Equal score keeps input order.
    assert_eq!(&ids[1..3], &["1", "4"]);
    assert_eq!(&ids[5..], &["6", "7"]);
}

#[test]
fn query_names_are_normalized_before_matching() {
    let names = unique_names(&["  GARLIC ", "garlic", "Basil"]);
    assert_eq!(names, vec!["garlic", "basil"]);

    let hit = score(
        RecipeSummary::new("1", "Pesto"),
        Some(detail("1", &["Fresh Basil Leaves", "Garlic"])),
        &names,
    );
    assert_eq!(hit.match_count, 2);
    assert_eq!(hit.match_percentage, 100.0);
}
