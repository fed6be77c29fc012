//! Experience, levels and kitchen ranks.
//!
//! Computed from the simulation history and the size of the ingredient
//! vault. Pure and synchronous.

use serde::{Deserialize, Serialize};

/// XP for every simulation run.
pub const XP_PER_EXPERIMENT: u64 = 50;
/// Bonus XP when the run identified a dish.
pub const XP_PER_DISCOVERY: u64 = 200;
/// XP per ingredient in the vault.
pub const XP_PER_VAULT_INGREDIENT: u64 = 5;
/// XP needed to go from level 1 to 2.
pub const FIRST_LEVEL_GAP: u64 = 20_000;
/// Growth of the gap for every further level.
pub const LEVEL_GAP_INCREMENT: u64 = 40_000;
pub const MAX_LEVEL: u32 = 10;
/// Identified dishes needed for full mastery.
pub const MASTERY_GOAL: u64 = 10_000;

/// One kitchen rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub level: u32,
    pub title: &'static str,
    /// Display color as `#rrggbb`.
    pub color: &'static str,
}

impl Rank {
    const fn new(level: u32, title: &'static str, color: &'static str) -> Self {
        Self {
            level,
            title,
            color,
        }
    }
}

pub const RANKS: [Rank; 10] = [
    Rank::new(1, "Kitchen Porter", "#95a5a6"),
    Rank::new(2, "Scullery Apprentice", "#7f8c8d"),
    Rank::new(3, "Commis Chef", "#2ecc71"),
    Rank::new(4, "Chef de Partie", "#27ae60"),
    Rank::new(5, "Tournant", "#3498db"),
    Rank::new(6, "Sous Chef", "#2980b9"),
    Rank::new(7, "Executive Chef", "#9b59b6"),
    Rank::new(8, "Chef de Cuisine", "#8e44ad"),
    Rank::new(9, "Gastronomic Alchemist", "#e67e22"),
    Rank::new(10, "Culinary Legend", "#f1c40f"),
];

/// One finished simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Title of the dish the run was identified as, if any.
    #[serde(default)]
    pub identified_dish: Option<String>,
}

impl SimulationRecord {
    pub fn identified(dish: impl Into<String>) -> Self {
        Self {
            identified_dish: Some(dish.into()),
        }
    }
}

/// Derived player progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProgress {
    pub total_xp: u64,
    pub level: u32,
    pub rank: Rank,
    /// Progress toward the next level, 0–100; 100 at the max level.
    pub progress_percent: f64,
    pub xp_in_current_level: u64,
    /// Size of the current level's gap; 0 at the max level.
    pub xp_needed_for_next_level: u64,
    pub mastery_goal: u64,
    pub mastery_percentage: f64,
    pub total_experiments: u64,
    pub recipes_mastered: u64,
    pub ingredients_collected: u64,
}

impl UserProgress {
    pub fn compute(history: &[SimulationRecord], vault_size: usize) -> Self {
        let total_experiments = history.len() as u64;
        let recipes_mastered = history
            .iter()
            .filter(|run| run.identified_dish.is_some())
            .count() as u64;
        let ingredients_collected = vault_size as u64;

        let total_xp = total_experiments * XP_PER_EXPERIMENT
            + recipes_mastered * XP_PER_DISCOVERY
            + ingredients_collected * XP_PER_VAULT_INGREDIENT;

        let mut level = 1;
        let mut threshold = 0;
        let mut gap = FIRST_LEVEL_GAP;
        while level < MAX_LEVEL && total_xp >= threshold + gap {
            threshold += gap;
            level += 1;
            gap += LEVEL_GAP_INCREMENT;
        }

        let xp_in_current_level = total_xp - threshold;
        let (xp_needed_for_next_level, progress_percent) = if level >= MAX_LEVEL {
            (0, 100.0)
        } else {
            let pct = xp_in_current_level as f64 / gap as f64 * 100.0;
            (gap, pct.clamp(0.0, 100.0))
        };

        let mastery_percentage =
            (recipes_mastered as f64 / MASTERY_GOAL as f64 * 100.0).min(100.0);

        Self {
            total_xp,
            level,
            rank: rank_for_level(level),
            progress_percent,
            xp_in_current_level,
            xp_needed_for_next_level,
            mastery_goal: MASTERY_GOAL,
            mastery_percentage,
            total_experiments,
            recipes_mastered,
            ingredients_collected,
        }
    }
}

/// Highest rank whose level does not exceed `level`.
pub fn rank_for_level(level: u32) -> Rank {
    RANKS
        .iter()
        .rev()
        .find(|rank| level >= rank.level)
        .copied()
        .unwrap_or(RANKS[0])
}
