use serde::Serialize;

use crate::character::FeatSource;
use crate::rules::abilities::Ability;
use crate::rules::skills::SkillBreakdown;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    pub class_id: String,
    pub name: Option<String>,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub name: String,
    pub race_id: String,
    pub race_name: Option<String>,
    pub size: Option<String>,
    pub speed: Option<i32>,
    pub classes: Vec<ClassSummary>,
    pub level: i32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityEntry {
    pub ability: Ability,
    pub base: i32,
    pub racial: i32,
    pub total: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillEntry {
    pub skill_id: String,
    pub name: String,
    pub ability: Ability,
    pub ranks: i32,
    pub is_class_skill: bool,
    pub trained_only: bool,
    pub total: i32,
    pub breakdown: SkillBreakdown,
}

impl SkillEntry {
    /// Trained-only skills need at least one rank to be attempted.
    pub fn usable(&self) -> bool {
        !self.trained_only || self.ranks > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatEntry {
    pub feat_id: String,
    pub name: Option<String>,
    pub source_type: FeatSource,
    pub source_level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatOption {
    pub feat_id: String,
    pub name: String,
    pub selected: bool,
    pub selectable: bool,
    pub unmet: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedInventoryEntry {
    pub item_id: String,
    pub quantity: u32,
    pub equipped: bool,
    pub name: Option<String>,
    pub kind: Option<ItemKind>,
    pub unit_cost: Option<f64>,
    pub unit_weight: Option<f64>,
    /// Advisory only; `None` for items missing from the catalog.
    pub proficient: Option<bool>,
}

/// Remaining budgets for every allocation step. Any figure may be negative
/// for a character loaded in an over-allocated state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub point_buy_budget: i32,
    pub point_buy_remaining: i32,
    pub skill_points_budget: i32,
    pub skill_points_remaining: i32,
    pub feat_slots: i32,
    pub feat_slots_remaining: i32,
    pub starting_gold: f64,
    pub gold_spent: f64,
    pub gold_remaining: f64,
    pub total_weight: f64,
}
