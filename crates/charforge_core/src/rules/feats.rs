//! Feat prerequisite resolution and the first-level feat slot budget.

use std::fmt;

use crate::catalog::{Catalog, FeatDef};
use crate::character::{Character, CharacterFeatEntry, CharacterSkillEntry, FeatSource};
use crate::config::RulesConfig;
use crate::core_api::CoreError;
use crate::rules::abilities::{Ability, AbilityScores};

/// Highest base attack bonus a first-level character can have. Any feat
/// demanding more is treated as unmet without consulting class progressions.
pub const LEVEL_ONE_MAX_BAB: i32 = 1;

/// The parts of a character a prerequisite can look at.
#[derive(Debug, Clone, Copy)]
pub struct CharacterState<'a> {
    /// Final (post-racial) scores.
    pub scores: AbilityScores,
    pub feats: &'a [CharacterFeatEntry],
    pub skills: &'a [CharacterSkillEntry],
}

impl<'a> CharacterState<'a> {
    pub fn of(character: &'a Character, catalog: &Catalog) -> Self {
        Self {
            scores: character.final_scores(catalog),
            feats: &character.feats,
            skills: &character.skills,
        }
    }

    pub fn has_feat(&self, feat_id: &str) -> bool {
        self.feats.iter().any(|entry| entry.feat_id == feat_id)
    }

    pub fn ranks(&self, skill_id: &str) -> i32 {
        self.skills
            .iter()
            .find(|entry| entry.skill_id == skill_id)
            .map_or(0, |entry| entry.ranks)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmetPrerequisite {
    Ability {
        ability: Ability,
        required: i32,
        actual: i32,
    },
    BaseAttackBonus {
        required: i32,
    },
    Feat {
        feat_id: String,
    },
    SkillRanks {
        skill_id: String,
        required: i32,
        actual: i32,
    },
}

impl fmt::Display for UnmetPrerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ability {
                ability,
                required,
                actual,
            } => write!(f, "requires {ability} {required} (have {actual})"),
            Self::BaseAttackBonus { required } => {
                write!(f, "requires base attack bonus +{required}")
            }
            Self::Feat { feat_id } => write!(f, "requires feat '{feat_id}'"),
            Self::SkillRanks {
                skill_id,
                required,
                actual,
            } => write!(f, "requires {required} rank(s) in '{skill_id}' (have {actual})"),
        }
    }
}

/// Every failed clause, in declaration order. Absent clauses always pass.
pub fn unmet_prerequisites(feat: &FeatDef, state: &CharacterState<'_>) -> Vec<UnmetPrerequisite> {
    let prereqs = &feat.prerequisites;
    let mut out = Vec::new();

    for (&ability, &required) in &prereqs.abilities {
        let actual = state.scores.get(ability);
        if actual < required {
            out.push(UnmetPrerequisite::Ability {
                ability,
                required,
                actual,
            });
        }
    }

    if let Some(required) = prereqs.base_attack_bonus
        && required > LEVEL_ONE_MAX_BAB
    {
        out.push(UnmetPrerequisite::BaseAttackBonus { required });
    }

    for feat_id in &prereqs.feats {
        if !state.has_feat(feat_id) {
            out.push(UnmetPrerequisite::Feat {
                feat_id: feat_id.clone(),
            });
        }
    }

    for requirement in &prereqs.skills {
        let actual = state.ranks(&requirement.skill_id);
        if actual < requirement.ranks {
            out.push(UnmetPrerequisite::SkillRanks {
                skill_id: requirement.skill_id.clone(),
                required: requirement.ranks,
                actual,
            });
        }
    }

    out
}

pub fn meets_prerequisites(feat: &FeatDef, state: &CharacterState<'_>) -> bool {
    unmet_prerequisites(feat, state).is_empty()
}

/// Two for races granted a bonus feat, one otherwise.
pub fn available_feat_slots(race_id: &str, config: &RulesConfig) -> i32 {
    if config.grants_bonus_feat(race_id) { 2 } else { 1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatToggle {
    Added,
    Removed,
}

/// Write-side ledger over the selected feats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatSelection {
    feats: Vec<CharacterFeatEntry>,
    slots: i32,
    level: i32,
}

impl FeatSelection {
    pub fn new(feats: Vec<CharacterFeatEntry>, slots: i32, level: i32) -> Self {
        Self {
            feats,
            slots,
            level,
        }
    }

    pub fn for_character(character: &Character, config: &RulesConfig) -> Self {
        Self::new(
            character.feats.clone(),
            available_feat_slots(&character.race_id, config),
            character.level(),
        )
    }

    pub fn feats(&self) -> &[CharacterFeatEntry] {
        &self.feats
    }

    pub fn into_feats(self) -> Vec<CharacterFeatEntry> {
        self.feats
    }

    pub fn slots(&self) -> i32 {
        self.slots
    }

    pub fn remaining(&self) -> i32 {
        self.slots - self.feats.len() as i32
    }

    pub fn is_selected(&self, feat_id: &str) -> bool {
        self.feats.iter().any(|entry| entry.feat_id == feat_id)
    }

    /// A selected feat is always togglable; an unselected one needs a free
    /// slot and every prerequisite.
    pub fn is_selectable(
        &self,
        feat: &FeatDef,
        scores: AbilityScores,
        skills: &[CharacterSkillEntry],
    ) -> bool {
        if self.is_selected(&feat.id) {
            return true;
        }
        self.remaining() > 0 && meets_prerequisites(feat, &self.state(scores, skills))
    }

    pub fn toggle(
        &mut self,
        feat_id: &str,
        catalog: &Catalog,
        scores: AbilityScores,
        skills: &[CharacterSkillEntry],
    ) -> Result<FeatToggle, CoreError> {
        let feat = catalog
            .feat(feat_id)
            .ok_or_else(|| CoreError::unknown_id("feat", feat_id))?;

        if let Some(pos) = self.feats.iter().position(|entry| entry.feat_id == feat.id) {
            self.feats.remove(pos);
            return Ok(FeatToggle::Removed);
        }

        if self.remaining() <= 0 {
            tracing::debug!(feat_id, slots = self.slots, "feat rejected: no slots left");
            return Err(CoreError::rejected(format!(
                "no feat slots remaining for '{}'",
                feat.name
            )));
        }

        let unmet = unmet_prerequisites(feat, &self.state(scores, skills));
        if !unmet.is_empty() {
            tracing::debug!(feat_id, unmet = unmet.len(), "feat rejected: prerequisites");
            let reasons: Vec<String> = unmet.iter().map(ToString::to_string).collect();
            return Err(CoreError::rejected(format!(
                "{} {}",
                feat.name,
                reasons.join("; ")
            )));
        }

        self.feats.push(CharacterFeatEntry {
            feat_id: feat.id.clone(),
            source_type: FeatSource::Level,
            source_level: self.level,
        });
        Ok(FeatToggle::Added)
    }

    fn state<'a>(
        &'a self,
        scores: AbilityScores,
        skills: &'a [CharacterSkillEntry],
    ) -> CharacterState<'a> {
        CharacterState {
            scores,
            feats: &self.feats,
            skills,
        }
    }
}
