//! The persisted character aggregate and the draft that builds it.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::catalog::{Catalog, CatalogKind, RaceDef};
use crate::core_api::{CoreError, CoreErrorCode};
use crate::rules::abilities::{self, Ability, AbilityAdjustments, AbilityScores};

/// Size of the floating racial bonus granted by flexible races.
pub const FLEXIBLE_RACIAL_BONUS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoredClassBonus {
    Hp,
    Skill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterClassEntry {
    pub class_id: String,
    pub level: i32,
    /// One value per level taken in this class.
    #[serde(default)]
    pub hit_points: Vec<i32>,
    #[serde(default)]
    pub favored_class_bonus: Vec<FavoredClassBonus>,
}

impl CharacterClassEntry {
    pub fn new(class_id: impl Into<String>, level: i32) -> Self {
        Self {
            class_id: class_id.into(),
            level,
            hit_points: Vec::new(),
            favored_class_bonus: Vec::new(),
        }
    }

    pub fn favored_count(&self, kind: FavoredClassBonus) -> i32 {
        self.favored_class_bonus
            .iter()
            .filter(|&&token| token == kind)
            .count() as i32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterSkillEntry {
    pub skill_id: String,
    pub ranks: i32,
    #[serde(default)]
    pub is_class_skill: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatSource {
    Level,
    Racial,
    Class,
    Bonus,
}

impl FeatSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::Racial => "racial",
            Self::Class => "class",
            Self::Bonus => "bonus",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterFeatEntry {
    pub feat_id: String,
    pub source_type: FeatSource,
    pub source_level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterEquipmentEntry {
    pub item_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Currency {
    pub cp: u64,
    pub sp: u64,
    pub gp: f64,
    pub pp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Character {
    pub name: String,
    pub race_id: String,
    /// Target of the floating +2 for races with a flexible bonus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub racial_bonus_choice: Option<Ability>,
    pub classes: Vec<CharacterClassEntry>,
    pub ability_scores: AbilityScores,
    pub skills: Vec<CharacterSkillEntry>,
    pub feats: Vec<CharacterFeatEntry>,
    pub equipment: Vec<CharacterEquipmentEntry>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Character {
    /// Parses a persisted character. Structural problems (missing arrays,
    /// wrong types) are `Validation` errors; malformed JSON is `Parse`.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(bytes).map_err(|e| {
            let code = match e.classify() {
                Category::Data => CoreErrorCode::Validation,
                Category::Io | Category::Syntax | Category::Eof => CoreErrorCode::Parse,
            };
            CoreError::new(code, format!("invalid character data: {e}"))
        })
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let mut bytes = serde_json::to_vec_pretty(self).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Storage,
                format!("failed to serialize character: {e}"),
            )
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn level(&self) -> i32 {
        self.classes.iter().map(|entry| entry.level).sum()
    }

    pub fn skill_ranks(&self, skill_id: &str) -> i32 {
        self.skills
            .iter()
            .find(|entry| entry.skill_id == skill_id)
            .map_or(0, |entry| entry.ranks)
    }

    pub fn has_feat(&self, feat_id: &str) -> bool {
        self.feats.iter().any(|entry| entry.feat_id == feat_id)
    }

    pub fn racial_adjustments(&self, race: &RaceDef) -> AbilityAdjustments {
        let mut out = race.ability_modifiers.clone();
        if race.flexible_bonus
            && let Some(choice) = self.racial_bonus_choice
        {
            *out.entry(choice).or_insert(0) += FLEXIBLE_RACIAL_BONUS;
        }
        out
    }

    /// Base scores plus racial adjustments. An unresolvable race contributes
    /// no adjustments.
    pub fn final_scores(&self, catalog: &Catalog) -> AbilityScores {
        match catalog.race(&self.race_id) {
            Some(race) => {
                abilities::final_scores(&self.ability_scores, &self.racial_adjustments(race))
            }
            None => {
                tracing::warn!(race_id = %self.race_id, "unknown race, no racial adjustments");
                self.ability_scores
            }
        }
    }

    pub fn is_class_skill(&self, catalog: &Catalog, skill_id: &str) -> bool {
        self.classes.iter().any(|entry| {
            catalog
                .class(&entry.class_id)
                .is_some_and(|class| class.is_class_skill(skill_id))
        })
    }

    pub fn validate(&self, catalog: &Catalog) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("character name must not be empty"));
        }

        let race = catalog
            .race(&self.race_id)
            .ok_or_else(|| CoreError::unknown_id(CatalogKind::Race.as_str(), &self.race_id))?;
        if self.racial_bonus_choice.is_some() && !race.flexible_bonus {
            return Err(CoreError::validation(format!(
                "race '{}' has no flexible ability bonus to assign",
                race.id
            )));
        }

        abilities::total_spent(&self.ability_scores)?;

        if self.classes.is_empty() {
            return Err(CoreError::validation("character needs at least one class entry"));
        }
        let mut seen_classes = BTreeSet::new();
        for entry in &self.classes {
            let class = catalog
                .class(&entry.class_id)
                .ok_or_else(|| CoreError::unknown_id("class", &entry.class_id))?;
            if !seen_classes.insert(entry.class_id.as_str()) {
                return Err(CoreError::validation(format!(
                    "class '{}' is listed more than once",
                    entry.class_id
                )));
            }
            if entry.level < 1 {
                return Err(CoreError::validation(format!(
                    "class '{}' has level {}, expected at least 1",
                    entry.class_id, entry.level
                )));
            }
            if entry.hit_points.len() != entry.level as usize {
                return Err(CoreError::validation(format!(
                    "class '{}' records {} hit point roll(s) for level {}",
                    entry.class_id,
                    entry.hit_points.len(),
                    entry.level
                )));
            }
            if let Some(roll) = entry
                .hit_points
                .iter()
                .find(|&&hp| hp < 1 || hp > class.hit_die)
            {
                return Err(CoreError::validation(format!(
                    "class '{}' hit point roll {roll} is outside 1-{}",
                    entry.class_id, class.hit_die
                )));
            }
            if entry.favored_class_bonus.len() > entry.level as usize {
                return Err(CoreError::validation(format!(
                    "class '{}' has more favored class bonuses than levels",
                    entry.class_id
                )));
            }
        }

        let level = self.level();
        let mut seen_skills = BTreeSet::new();
        for entry in &self.skills {
            catalog.lookup(CatalogKind::Skill, &entry.skill_id)?;
            if !seen_skills.insert(entry.skill_id.as_str()) {
                return Err(CoreError::validation(format!(
                    "skill '{}' is listed more than once",
                    entry.skill_id
                )));
            }
            if !(1..=level).contains(&entry.ranks) {
                return Err(CoreError::validation(format!(
                    "skill '{}' has {} rank(s), expected 1-{level}",
                    entry.skill_id, entry.ranks
                )));
            }
        }

        let mut seen_feats = BTreeSet::new();
        for entry in &self.feats {
            catalog.lookup(CatalogKind::Feat, &entry.feat_id)?;
            if !seen_feats.insert(entry.feat_id.as_str()) {
                return Err(CoreError::validation(format!(
                    "feat '{}' is selected more than once",
                    entry.feat_id
                )));
            }
        }

        for entry in &self.equipment {
            if catalog.item(&entry.item_id).is_none() {
                return Err(CoreError::unknown_id("item", &entry.item_id));
            }
            if entry.quantity == 0 {
                return Err(CoreError::validation(format!(
                    "item '{}' has zero quantity",
                    entry.item_id
                )));
            }
        }

        if !self.currency.gp.is_finite() || self.currency.gp < 0.0 {
            return Err(CoreError::validation(format!(
                "gold must be a non-negative amount, got {}",
                self.currency.gp
            )));
        }

        Ok(())
    }
}

/// In-progress character. Every field may be missing until [`build`] checks
/// them all and promotes the draft to a [`Character`].
///
/// [`build`]: CharacterDraft::build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterDraft {
    pub name: Option<String>,
    pub race_id: Option<String>,
    pub racial_bonus_choice: Option<Ability>,
    pub classes: Vec<CharacterClassEntry>,
    pub ability_scores: Option<AbilityScores>,
    pub skills: Vec<CharacterSkillEntry>,
    pub feats: Vec<CharacterFeatEntry>,
    pub equipment: Vec<CharacterEquipmentEntry>,
    pub currency: Currency,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl CharacterDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn race(mut self, race_id: impl Into<String>) -> Self {
        self.race_id = Some(race_id.into());
        self
    }

    pub fn racial_bonus(mut self, ability: Ability) -> Self {
        self.racial_bonus_choice = Some(ability);
        self
    }

    pub fn class(mut self, class_id: impl Into<String>, level: i32) -> Self {
        self.classes.push(CharacterClassEntry::new(class_id, level));
        self
    }

    pub fn class_entry(mut self, entry: CharacterClassEntry) -> Self {
        self.classes.push(entry);
        self
    }

    pub fn ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self
    }

    pub fn skill(mut self, skill_id: impl Into<String>, ranks: i32) -> Self {
        self.skills.push(CharacterSkillEntry {
            skill_id: skill_id.into(),
            ranks,
            is_class_skill: false,
        });
        self
    }

    pub fn feat(mut self, feat_id: impl Into<String>, source: FeatSource, level: i32) -> Self {
        self.feats.push(CharacterFeatEntry {
            feat_id: feat_id.into(),
            source_type: source,
            source_level: level,
        });
        self
    }

    pub fn item(mut self, item_id: impl Into<String>, quantity: u32) -> Self {
        self.equipment.push(CharacterEquipmentEntry {
            item_id: item_id.into(),
            quantity,
            equipped: false,
        });
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Checks every required field and reference, then promotes the draft.
    ///
    /// Normalization applied before validation: a level-1 class entry with no
    /// recorded hit points gets the full hit die, zero-quantity equipment is
    /// dropped, and each skill's `is_class_skill` flag is recomputed.
    pub fn build(self, catalog: &Catalog) -> Result<Character, CoreError> {
        let name = self
            .name
            .ok_or_else(|| CoreError::validation("character draft is missing a name"))?;
        let race_id = self
            .race_id
            .ok_or_else(|| CoreError::validation("character draft is missing a race"))?;
        let ability_scores = self
            .ability_scores
            .ok_or_else(|| CoreError::validation("character draft is missing ability scores"))?;

        let mut classes = self.classes;
        for entry in &mut classes {
            if entry.level == 1 && entry.hit_points.is_empty() {
                let class = catalog
                    .class(&entry.class_id)
                    .ok_or_else(|| CoreError::unknown_id("class", &entry.class_id))?;
                entry.hit_points.push(class.hit_die);
            }
        }

        let mut equipment = self.equipment;
        equipment.retain(|entry| entry.quantity > 0);

        let mut character = Character {
            name,
            race_id,
            racial_bonus_choice: self.racial_bonus_choice,
            classes,
            ability_scores,
            skills: self.skills,
            feats: self.feats,
            equipment,
            currency: self.currency,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        let class_skills: Vec<bool> = character
            .skills
            .iter()
            .map(|entry| character.is_class_skill(catalog, &entry.skill_id))
            .collect();
        for (entry, is_class_skill) in character.skills.iter_mut().zip(class_skills) {
            entry.is_class_skill = is_class_skill;
        }

        character.validate(catalog)?;
        Ok(character)
    }
}

impl From<Character> for CharacterDraft {
    fn from(character: Character) -> Self {
        Self {
            name: Some(character.name),
            race_id: Some(character.race_id),
            racial_bonus_choice: character.racial_bonus_choice,
            classes: character.classes,
            ability_scores: Some(character.ability_scores),
            skills: character.skills,
            feats: character.feats,
            equipment: character.equipment,
            currency: character.currency,
            created_at: character.created_at,
            updated_at: character.updated_at,
        }
    }
}

/// Destination for completed characters.
pub trait CharacterStore {
    fn persist(&mut self, character: &Character) -> Result<(), CoreError>;
}

/// Writes each persisted character as pretty JSON to a single path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CharacterStore for JsonFileStore {
    fn persist(&mut self, character: &Character) -> Result<(), CoreError> {
        let bytes = character.to_json_bytes()?;
        fs::write(&self.path, bytes).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Storage,
                format!("failed to write {}: {e}", self.path.display()),
            )
        })?;
        tracing::debug!(path = %self.path.display(), name = %character.name, "character persisted");
        Ok(())
    }
}
