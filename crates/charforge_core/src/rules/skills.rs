//! Skill modifiers and the per-level skill point budget.

use serde::Serialize;

use crate::catalog::{Catalog, ClassDef};
use crate::character::{Character, CharacterSkillEntry, FavoredClassBonus};
use crate::core_api::CoreError;
use crate::rules::abilities::{AbilityScores, ability_modifier};

pub const CLASS_SKILL_BONUS: i32 = 3;

/// Applies only once at least one rank is invested.
pub fn class_skill_bonus(ranks: i32, is_class_skill: bool) -> i32 {
    if ranks > 0 && is_class_skill {
        CLASS_SKILL_BONUS
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillBreakdown {
    pub ranks: i32,
    pub ability_modifier: i32,
    pub class_skill_bonus: i32,
    /// Reserved for racial and feat bonuses; always zero here.
    pub misc: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillModifier {
    pub total: i32,
    pub breakdown: SkillBreakdown,
}

pub fn skill_modifier(ability_mod: i32, ranks: i32, is_class_skill: bool) -> SkillModifier {
    let breakdown = SkillBreakdown {
        ranks,
        ability_modifier: ability_mod,
        class_skill_bonus: class_skill_bonus(ranks, is_class_skill),
        misc: 0,
    };
    SkillModifier {
        total: breakdown.ranks
            + breakdown.ability_modifier
            + breakdown.class_skill_bonus
            + breakdown.misc,
        breakdown,
    }
}

/// Per level, never less than one.
pub fn skill_points_available(class_skill_points_per_level: i32, int_mod: i32) -> i32 {
    (class_skill_points_per_level + int_mod).max(1)
}

pub fn max_ranks_per_skill(character_level: i32) -> i32 {
    character_level
}

/// Points available across every class entry, plus favored-class skill tokens.
/// Unresolvable classes contribute nothing.
pub fn skill_point_budget(
    character: &Character,
    catalog: &Catalog,
    final_scores: &AbilityScores,
) -> i32 {
    let int_mod = ability_modifier(final_scores.int);
    character
        .classes
        .iter()
        .map(|entry| {
            let per_level = match catalog.class(&entry.class_id) {
                Some(class) => skill_points_available(class.skill_points_per_level, int_mod),
                None => {
                    tracing::warn!(class_id = %entry.class_id, "unknown class, no skill points");
                    return 0;
                }
            };
            per_level * entry.level + entry.favored_count(FavoredClassBonus::Skill)
        })
        .sum()
}

pub fn can_increase_skill(current_ranks: i32, character_level: i32, remaining_points: i32) -> bool {
    current_ranks < max_ranks_per_skill(character_level) && remaining_points > 0
}

pub fn can_decrease_skill(current_ranks: i32) -> bool {
    current_ranks > 0
}

/// Write-side ledger over a character's skill ranks. Zero-rank skills are
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillAllocation {
    entries: Vec<CharacterSkillEntry>,
    budget: i32,
    level: i32,
}

impl SkillAllocation {
    pub fn new(entries: Vec<CharacterSkillEntry>, budget: i32, level: i32) -> Self {
        Self {
            entries,
            budget,
            level,
        }
    }

    pub fn for_character(character: &Character, catalog: &Catalog) -> Self {
        let scores = character.final_scores(catalog);
        Self::new(
            character.skills.clone(),
            skill_point_budget(character, catalog, &scores),
            character.level(),
        )
    }

    pub fn entries(&self) -> &[CharacterSkillEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CharacterSkillEntry> {
        self.entries
    }

    pub fn budget(&self) -> i32 {
        self.budget
    }

    pub fn spent(&self) -> i32 {
        self.entries.iter().map(|entry| entry.ranks).sum()
    }

    /// May be negative for characters loaded with more ranks than points.
    pub fn remaining(&self) -> i32 {
        self.budget - self.spent()
    }

    pub fn ranks(&self, skill_id: &str) -> i32 {
        self.entries
            .iter()
            .find(|entry| entry.skill_id == skill_id)
            .map_or(0, |entry| entry.ranks)
    }

    /// Adds one rank; `is_class_skill` is cached from `classes` when the entry
    /// is first created.
    pub fn increase(
        &mut self,
        skill_id: &str,
        catalog: &Catalog,
        classes: &[&ClassDef],
    ) -> Result<i32, CoreError> {
        let skill = catalog
            .skill(skill_id)
            .ok_or_else(|| CoreError::unknown_id("skill", skill_id))?;
        let current = self.ranks(&skill.id);
        if !can_increase_skill(current, self.level, self.remaining()) {
            tracing::debug!(skill_id, current, remaining = self.remaining(), "skill rank rejected");
            let reason = if current >= max_ranks_per_skill(self.level) {
                format!("already at the {}-rank cap", max_ranks_per_skill(self.level))
            } else {
                "no skill points remaining".to_string()
            };
            return Err(CoreError::rejected(format!(
                "cannot add a rank to {}: {reason}",
                skill.name
            )));
        }

        match self.entries.iter_mut().find(|entry| entry.skill_id == skill.id) {
            Some(entry) => entry.ranks += 1,
            None => self.entries.push(CharacterSkillEntry {
                skill_id: skill.id.clone(),
                ranks: 1,
                is_class_skill: classes.iter().any(|class| class.is_class_skill(&skill.id)),
            }),
        }
        Ok(current + 1)
    }

    /// Removes one rank, pruning the entry when it reaches zero.
    pub fn decrease(&mut self, skill_id: &str, catalog: &Catalog) -> Result<i32, CoreError> {
        let skill = catalog
            .skill(skill_id)
            .ok_or_else(|| CoreError::unknown_id("skill", skill_id))?;
        let Some(pos) = self.entries.iter().position(|entry| entry.skill_id == skill.id) else {
            return Err(CoreError::rejected(format!(
                "{} has no ranks to remove",
                skill.name
            )));
        };
        let entry = &mut self.entries[pos];
        entry.ranks -= 1;
        let left = entry.ranks;
        if !can_decrease_skill(left) {
            self.entries.remove(pos);
        }
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterDraft;
    use crate::core_api::CoreErrorCode;
    use crate::rules::abilities::Ability;

    #[test]
    fn class_skill_bonus_needs_a_rank() {
        assert_eq!(class_skill_bonus(0, true), 0);
        assert_eq!(class_skill_bonus(1, true), 3);
        assert_eq!(class_skill_bonus(1, false), 0);
    }

    #[test]
    fn skill_modifier_sums_addends() {
        let trained = skill_modifier(3, 1, true);
        assert_eq!(trained.total, 7);
        assert_eq!(trained.breakdown.class_skill_bonus, 3);
        assert_eq!(trained.breakdown.misc, 0);
        assert_eq!(skill_modifier(3, 1, false).total, 4);
        assert_eq!(skill_modifier(-1, 0, true).total, -1);
    }

    #[test]
    fn skill_points_floor_at_one() {
        assert_eq!(skill_points_available(2, -4), 1);
        assert_eq!(skill_points_available(2, -1), 1);
        assert_eq!(skill_points_available(8, 2), 10);
        assert_eq!(max_ranks_per_skill(1), 1);
    }

    #[test]
    fn allocation_caps_ranks_at_level_and_spends_budget() {
        let catalog = Catalog::builtin();
        let rogue = catalog.class("rogue").expect("rogue");
        let mut alloc = SkillAllocation::new(Vec::new(), 2, 1);

        assert_eq!(alloc.increase("stealth", &catalog, &[rogue]).expect("stealth"), 1);
        assert!(alloc.entries()[0].is_class_skill);
        let err = alloc
            .increase("stealth", &catalog, &[rogue])
            .expect_err("rank cap");
        assert_eq!(err.code, CoreErrorCode::Rejected);

        alloc.increase("fly", &catalog, &[rogue]).expect("fly");
        assert!(!alloc.entries()[1].is_class_skill);
        assert_eq!(alloc.remaining(), 0);
        let err = alloc
            .increase("climb", &catalog, &[rogue])
            .expect_err("budget spent");
        assert_eq!(err.code, CoreErrorCode::Rejected);
    }

    #[test]
    fn decreasing_last_rank_prunes_entry() {
        let catalog = Catalog::builtin();
        let mut alloc = SkillAllocation::new(Vec::new(), 4, 1);
        alloc.increase("swim", &catalog, &[]).expect("swim");
        assert_eq!(alloc.decrease("swim", &catalog).expect("swim"), 0);
        assert!(alloc.entries().is_empty());
        let err = alloc.decrease("swim", &catalog).expect_err("nothing left");
        assert_eq!(err.code, CoreErrorCode::Rejected);
    }

    #[test]
    fn unknown_skills_are_hard_failures() {
        let catalog = Catalog::builtin();
        let mut alloc = SkillAllocation::new(Vec::new(), 4, 1);
        let err = alloc
            .increase("basket-weaving", &catalog, &[])
            .expect_err("unknown skill");
        assert_eq!(err.code, CoreErrorCode::UnknownCatalogId);
    }

    #[test]
    fn budget_counts_favored_class_skill_tokens() {
        let catalog = Catalog::builtin();
        let mut character = CharacterDraft::new()
            .name("Merisiel")
            .race("elf")
            .class("rogue", 1)
            .ability_scores(AbilityScores::default().with(Ability::Int, 12))
            .build(&catalog)
            .expect("rogue");
        let scores = character.final_scores(&catalog);
        // INT 12 + 2 racial = 14, so +2 over 8 per level.
        assert_eq!(skill_point_budget(&character, &catalog, &scores), 10);

        character.classes[0]
            .favored_class_bonus
            .push(FavoredClassBonus::Skill);
        assert_eq!(skill_point_budget(&character, &catalog, &scores), 11);
    }
}
