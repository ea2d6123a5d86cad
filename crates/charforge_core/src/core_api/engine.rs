use std::sync::Arc;

use crate::catalog::{Catalog, ClassDef, ItemRef};
use crate::character::{Character, CharacterDraft, CharacterStore};
use crate::config::RulesConfig;
use crate::rules::abilities::{self, Ability, PointBuy};
use crate::rules::combat::{self, ArmorClassInputs, DerivedStatsSnapshot};
use crate::rules::equipment::{EquipmentLedger, Money};
use crate::rules::feats::{self, CharacterState, FeatSelection, FeatToggle};
use crate::rules::skills::{self, SkillAllocation};

use super::error::CoreError;
use super::types::{
    AbilityEntry, AllocationSummary, ClassSummary, FeatEntry, FeatOption, ItemKind,
    ResolvedInventoryEntry, SkillEntry, Snapshot,
};

/// Holds the read-only catalog and rules config shared by every session.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
    config: Arc<RulesConfig>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_builtin_catalog()
    }
}

impl Engine {
    pub fn new(catalog: Catalog, config: RulesConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }

    pub fn with_builtin_catalog() -> Self {
        Self::new(Catalog::builtin(), RulesConfig::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Parses and validates a persisted character.
    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let character = Character::from_json_bytes(bytes.as_ref())?;
        self.open_character(character)
    }

    pub fn open_character(&self, character: Character) -> Result<Session, CoreError> {
        self.open_draft(CharacterDraft::from(character))
    }

    pub fn open_draft(&self, draft: CharacterDraft) -> Result<Session, CoreError> {
        let character = draft.build(&self.catalog)?;
        let starting_gold = starting_gold(&character, &self.catalog, &self.config);
        tracing::debug!(
            name = %character.name,
            level = character.level(),
            starting_gold = %starting_gold,
            "session opened"
        );
        Ok(Session {
            catalog: Arc::clone(&self.catalog),
            config: Arc::clone(&self.config),
            character,
            starting_gold,
        })
    }
}

/// The first class entry's starting wealth, else the configured default.
fn starting_gold(character: &Character, catalog: &Catalog, config: &RulesConfig) -> Money {
    let gp = character
        .classes
        .first()
        .and_then(|entry| catalog.class(&entry.class_id))
        .and_then(|class| class.starting_wealth)
        .unwrap_or(config.default_starting_gold);
    Money::from_gp(gp)
}

/// A validated character bound to a catalog. Read accessors recompute from
/// the character on every call; edit methods route through the allocation
/// ledgers and leave the character untouched when they fail.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    config: Arc<RulesConfig>,
    character: Character,
    starting_gold: Money,
}

impl Session {
    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn into_character(self) -> Character {
        self.character
    }

    pub fn snapshot(&self) -> Snapshot {
        let race = self.catalog.race(&self.character.race_id);
        Snapshot {
            name: self.character.name.clone(),
            race_id: self.character.race_id.clone(),
            race_name: race.map(|r| r.name.clone()),
            size: race.map(|r| r.size.as_str().to_string()),
            speed: race.map(|r| r.speed),
            classes: self
                .character
                .classes
                .iter()
                .map(|entry| ClassSummary {
                    class_id: entry.class_id.clone(),
                    name: self.catalog.class(&entry.class_id).map(|c| c.name.clone()),
                    level: entry.level,
                })
                .collect(),
            level: self.character.level(),
            created_at: self.character.created_at.clone(),
            updated_at: self.character.updated_at.clone(),
        }
    }

    pub fn derived_stats(&self) -> DerivedStatsSnapshot {
        self.derived_stats_with_armor(ArmorClassInputs::default())
    }

    pub fn derived_stats_with_armor(&self, armor: ArmorClassInputs) -> DerivedStatsSnapshot {
        combat::derive_stats(&self.character, &self.catalog, armor)
    }

    pub fn ability_entries(&self) -> Vec<AbilityEntry> {
        let racial = self
            .catalog
            .race(&self.character.race_id)
            .map(|race| self.character.racial_adjustments(race))
            .unwrap_or_default();
        Ability::ALL
            .into_iter()
            .map(|ability| {
                let base = self.character.ability_scores.get(ability);
                let racial = racial.get(&ability).copied().unwrap_or(0);
                let total = abilities::final_score(base, racial);
                AbilityEntry {
                    ability,
                    base,
                    racial,
                    total,
                    modifier: abilities::ability_modifier(total),
                }
            })
            .collect()
    }

    /// Every catalog skill, untrained ones included with zero ranks.
    pub fn skill_entries(&self) -> Vec<SkillEntry> {
        let mods = self.character.final_scores(&self.catalog).modifiers();
        self.catalog
            .skills()
            .map(|skill| {
                let stored = self
                    .character
                    .skills
                    .iter()
                    .find(|entry| entry.skill_id == skill.id);
                let ranks = stored.map_or(0, |entry| entry.ranks);
                let is_class_skill = stored.map_or_else(
                    || self.character.is_class_skill(&self.catalog, &skill.id),
                    |entry| entry.is_class_skill,
                );
                let modifier =
                    skills::skill_modifier(mods.get(skill.ability), ranks, is_class_skill);
                SkillEntry {
                    skill_id: skill.id.clone(),
                    name: skill.name.clone(),
                    ability: skill.ability,
                    ranks,
                    is_class_skill,
                    trained_only: skill.trained_only,
                    total: modifier.total,
                    breakdown: modifier.breakdown,
                }
            })
            .collect()
    }

    pub fn feat_entries(&self) -> Vec<FeatEntry> {
        self.character
            .feats
            .iter()
            .map(|entry| FeatEntry {
                feat_id: entry.feat_id.clone(),
                name: self.catalog.feat(&entry.feat_id).map(|f| f.name.clone()),
                source_type: entry.source_type,
                source_level: entry.source_level,
            })
            .collect()
    }

    /// Every catalog feat with its current selectability.
    pub fn feat_options(&self) -> Vec<FeatOption> {
        let selection = FeatSelection::for_character(&self.character, &self.config);
        let state = CharacterState::of(&self.character, &self.catalog);
        self.catalog
            .feats()
            .map(|feat| FeatOption {
                feat_id: feat.id.clone(),
                name: feat.name.clone(),
                selected: selection.is_selected(&feat.id),
                selectable: selection.is_selectable(feat, state.scores, state.skills),
                unmet: feats::unmet_prerequisites(feat, &state)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect()
    }

    pub fn inventory(&self) -> Vec<ResolvedInventoryEntry> {
        let classes = self.class_defs();
        self.character
            .equipment
            .iter()
            .map(|entry| {
                let item = self.catalog.item(&entry.item_id);
                ResolvedInventoryEntry {
                    item_id: entry.item_id.clone(),
                    quantity: entry.quantity,
                    equipped: entry.equipped,
                    name: item.map(|i| i.name().to_string()),
                    kind: item.map(|i| match i {
                        ItemRef::Weapon(_) => ItemKind::Weapon,
                        ItemRef::Armor(_) => ItemKind::Armor,
                    }),
                    unit_cost: item.map(|i| i.cost()),
                    unit_weight: item.map(|i| i.weight()),
                    proficient: EquipmentLedger::is_proficient(
                        &entry.item_id,
                        &self.catalog,
                        &classes,
                    ),
                }
            })
            .collect()
    }

    pub fn allocation(&self) -> AllocationSummary {
        let budget = self.config.point_buy_budget;
        let point_buy_remaining = abilities::remaining(&self.character.ability_scores, budget)
            .unwrap_or(budget);
        let skills = SkillAllocation::for_character(&self.character, &self.catalog);
        let feats = FeatSelection::for_character(&self.character, &self.config);
        let ledger = self.ledger();
        AllocationSummary {
            point_buy_budget: budget,
            point_buy_remaining,
            skill_points_budget: skills.budget(),
            skill_points_remaining: skills.remaining(),
            feat_slots: feats.slots(),
            feat_slots_remaining: feats.remaining(),
            starting_gold: self.starting_gold.as_gp(),
            gold_spent: ledger.total_cost(&self.catalog).as_gp(),
            gold_remaining: ledger.remaining_gold(&self.catalog),
            total_weight: ledger.total_weight(&self.catalog),
        }
    }

    pub fn increase_ability(&mut self, ability: Ability) -> Result<i32, CoreError> {
        let mut buy = self.point_buy()?;
        let value = buy.increase(ability)?;
        self.character.ability_scores = buy.into_scores();
        Ok(value)
    }

    pub fn decrease_ability(&mut self, ability: Ability) -> Result<i32, CoreError> {
        let mut buy = self.point_buy()?;
        let value = buy.decrease(ability)?;
        self.character.ability_scores = buy.into_scores();
        Ok(value)
    }

    pub fn train_skill(&mut self, skill_id: &str) -> Result<i32, CoreError> {
        let mut alloc = SkillAllocation::for_character(&self.character, &self.catalog);
        let ranks = alloc.increase(skill_id, &self.catalog, &self.class_defs())?;
        self.character.skills = alloc.into_entries();
        Ok(ranks)
    }

    pub fn untrain_skill(&mut self, skill_id: &str) -> Result<i32, CoreError> {
        let mut alloc = SkillAllocation::for_character(&self.character, &self.catalog);
        let ranks = alloc.decrease(skill_id, &self.catalog)?;
        self.character.skills = alloc.into_entries();
        Ok(ranks)
    }

    pub fn toggle_feat(&mut self, feat_id: &str) -> Result<FeatToggle, CoreError> {
        let mut selection = FeatSelection::for_character(&self.character, &self.config);
        let scores = self.character.final_scores(&self.catalog);
        let outcome = selection.toggle(feat_id, &self.catalog, scores, &self.character.skills)?;
        self.character.feats = selection.into_feats();
        Ok(outcome)
    }

    /// Returns `false` when the item is unaffordable; the cart is unchanged.
    pub fn buy_item(&mut self, item_id: &str) -> Result<bool, CoreError> {
        let mut ledger = self.ledger();
        let bought = ledger.add_item(item_id, &self.catalog)?;
        self.commit_ledger(ledger);
        Ok(bought)
    }

    /// Returns `false` when the item is not in the inventory.
    pub fn sell_item(&mut self, item_id: &str) -> Result<bool, CoreError> {
        if self.catalog.item(item_id).is_none() {
            return Err(CoreError::unknown_id("item", item_id));
        }
        let mut ledger = self.ledger();
        let sold = ledger.remove_item(item_id);
        self.commit_ledger(ledger);
        Ok(sold)
    }

    pub fn set_equipped(&mut self, item_id: &str, equipped: bool) -> Result<(), CoreError> {
        let mut ledger = self.ledger();
        ledger.set_equipped(item_id, equipped)?;
        self.commit_ledger(ledger);
        Ok(())
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.character.to_json_bytes()
    }

    pub fn persist(&self, store: &mut dyn CharacterStore) -> Result<(), CoreError> {
        store.persist(&self.character)
    }

    fn class_defs(&self) -> Vec<&ClassDef> {
        self.character
            .classes
            .iter()
            .filter_map(|entry| self.catalog.class(&entry.class_id))
            .collect()
    }

    fn point_buy(&self) -> Result<PointBuy, CoreError> {
        PointBuy::from_scores(self.character.ability_scores, self.config.point_buy_budget)
    }

    fn ledger(&self) -> EquipmentLedger {
        EquipmentLedger::new(self.starting_gold, self.character.equipment.clone())
    }

    /// Writes the cart back and mirrors the remaining gold into `currency.gp`.
    /// An overspent cart leaves `gp` at zero; the deficit still shows in
    /// [`Session::allocation`].
    fn commit_ledger(&mut self, ledger: EquipmentLedger) {
        let remaining = ledger.remaining(&self.catalog);
        if remaining.is_negative() {
            tracing::warn!(remaining = %remaining, "equipment exceeds starting gold");
        }
        self.character.currency.gp = remaining.as_gp().max(0.0);
        self.character.equipment = ledger.into_entries();
    }
}
