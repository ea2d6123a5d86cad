//! Read-only reference data: races, classes, skills, feats, weapons and armor.
//!
//! Every list is indexed by id once, when the [`Catalog`] is built. Nothing in
//! the rules engine mutates a catalog after that.

mod builtin;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::rules::abilities::{Ability, AbilityAdjustments};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BabProgression {
    Full,
    Medium,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveProgression {
    Good,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponCategory {
    Simple,
    Martial,
    Exotic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasterTradition {
    Arcane,
    Divine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RaceDef {
    pub id: String,
    pub name: String,
    pub size: Size,
    pub speed: i32,
    #[serde(default)]
    pub ability_modifiers: AbilityAdjustments,
    /// The race grants +2 to one ability of the player's choosing.
    #[serde(default)]
    pub flexible_bonus: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveProgressions {
    pub fortitude: SaveProgression,
    pub reflex: SaveProgression,
    pub will: SaveProgression,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proficiencies {
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub armor: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Spellcasting {
    pub tradition: CasterTradition,
    pub ability: Ability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDef {
    pub id: String,
    pub name: String,
    pub hit_die: i32,
    pub bab: BabProgression,
    pub saves: SaveProgressions,
    pub skill_points_per_level: i32,
    #[serde(default)]
    pub proficiencies: Proficiencies,
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,
    #[serde(default)]
    pub class_skills: BTreeSet<String>,
    /// Starting gold in gp; the rules config supplies a default when absent.
    #[serde(default)]
    pub starting_wealth: Option<f64>,
}

impl ClassDef {
    pub fn is_class_skill(&self, skill_id: &str) -> bool {
        self.class_skills.contains(skill_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    pub ability: Ability,
    #[serde(default)]
    pub trained_only: bool,
    #[serde(default)]
    pub armor_check_penalty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillRankRequirement {
    pub skill_id: String,
    pub ranks: i32,
}

/// Every clause is optional; an absent clause is met.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatPrerequisites {
    #[serde(default)]
    pub abilities: BTreeMap<Ability, i32>,
    #[serde(default)]
    pub base_attack_bonus: Option<i32>,
    #[serde(default)]
    pub feats: Vec<String>,
    #[serde(default)]
    pub skills: Vec<SkillRankRequirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: FeatPrerequisites,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponDef {
    pub id: String,
    pub name: String,
    pub category: WeaponCategory,
    pub cost: f64,
    pub weight: f64,
    #[serde(default)]
    pub damage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmorDef {
    pub id: String,
    pub name: String,
    pub category: ArmorCategory,
    pub cost: f64,
    pub weight: f64,
    pub armor_bonus: i32,
    #[serde(default)]
    pub max_dex: Option<i32>,
    #[serde(default)]
    pub check_penalty: i32,
}

/// Purchasable item resolved from either the weapon or the armor list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemRef<'a> {
    Weapon(&'a WeaponDef),
    Armor(&'a ArmorDef),
}

impl<'a> ItemRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Self::Weapon(w) => &w.id,
            Self::Armor(a) => &a.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::Weapon(w) => &w.name,
            Self::Armor(a) => &a.name,
        }
    }

    pub fn cost(&self) -> f64 {
        match self {
            Self::Weapon(w) => w.cost,
            Self::Armor(a) => a.cost,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Self::Weapon(w) => w.weight,
            Self::Armor(a) => a.weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Race,
    Class,
    Skill,
    Feat,
    Weapon,
    Armor,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Race => "race",
            Self::Class => "class",
            Self::Skill => "skill",
            Self::Feat => "feat",
            Self::Weapon => "weapon",
            Self::Armor => "armor",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogEntry<'a> {
    Race(&'a RaceDef),
    Class(&'a ClassDef),
    Skill(&'a SkillDef),
    Feat(&'a FeatDef),
    Weapon(&'a WeaponDef),
    Armor(&'a ArmorDef),
}

/// On-disk shape of a catalog file. Every list may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    #[serde(default)]
    pub races: Vec<RaceDef>,
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub skills: Vec<SkillDef>,
    #[serde(default)]
    pub feats: Vec<FeatDef>,
    #[serde(default)]
    pub weapons: Vec<WeaponDef>,
    #[serde(default)]
    pub armor: Vec<ArmorDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    races: BTreeMap<String, RaceDef>,
    classes: BTreeMap<String, ClassDef>,
    skills: BTreeMap<String, SkillDef>,
    feats: BTreeMap<String, FeatDef>,
    weapons: BTreeMap<String, WeaponDef>,
    armor: BTreeMap<String, ArmorDef>,
}

impl Catalog {
    pub fn from_document(document: CatalogDocument) -> Result<Self, CoreError> {
        Ok(Self {
            races: index(CatalogKind::Race, document.races, |r| &r.id)?,
            classes: index(CatalogKind::Class, document.classes, |c| &c.id)?,
            skills: index(CatalogKind::Skill, document.skills, |s| &s.id)?,
            feats: index(CatalogKind::Feat, document.feats, |f| &f.id)?,
            weapons: index(CatalogKind::Weapon, document.weapons, |w| &w.id)?,
            armor: index(CatalogKind::Armor, document.armor, |a| &a.id)?,
        })
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let document: CatalogDocument = serde_json::from_slice(bytes).map_err(|e| {
            CoreError::new(CoreErrorCode::Parse, format!("failed to parse catalog: {e}"))
        })?;
        Self::from_document(document)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_json_bytes(&bytes)
    }

    /// Compact core reference set, usable without any catalog file.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    pub fn lookup(&self, kind: CatalogKind, id: &str) -> Result<CatalogEntry<'_>, CoreError> {
        let entry = match kind {
            CatalogKind::Race => self.races.get(id).map(CatalogEntry::Race),
            CatalogKind::Class => self.classes.get(id).map(CatalogEntry::Class),
            CatalogKind::Skill => self.skills.get(id).map(CatalogEntry::Skill),
            CatalogKind::Feat => self.feats.get(id).map(CatalogEntry::Feat),
            CatalogKind::Weapon => self.weapons.get(id).map(CatalogEntry::Weapon),
            CatalogKind::Armor => self.armor.get(id).map(CatalogEntry::Armor),
        };
        entry.ok_or_else(|| CoreError::unknown_id(kind.as_str(), id))
    }

    pub fn race(&self, id: &str) -> Option<&RaceDef> {
        self.races.get(id)
    }

    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    pub fn skill(&self, id: &str) -> Option<&SkillDef> {
        self.skills.get(id)
    }

    pub fn feat(&self, id: &str) -> Option<&FeatDef> {
        self.feats.get(id)
    }

    pub fn weapon(&self, id: &str) -> Option<&WeaponDef> {
        self.weapons.get(id)
    }

    pub fn armor(&self, id: &str) -> Option<&ArmorDef> {
        self.armor.get(id)
    }

    /// Weapons are checked first; ids are assumed disjoint across the two lists.
    pub fn item(&self, id: &str) -> Option<ItemRef<'_>> {
        self.weapons
            .get(id)
            .map(ItemRef::Weapon)
            .or_else(|| self.armor.get(id).map(ItemRef::Armor))
    }

    pub fn races(&self) -> impl Iterator<Item = &RaceDef> {
        self.races.values()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    pub fn skills(&self) -> impl Iterator<Item = &SkillDef> {
        self.skills.values()
    }

    pub fn feats(&self) -> impl Iterator<Item = &FeatDef> {
        self.feats.values()
    }

    pub fn weapons(&self) -> impl Iterator<Item = &WeaponDef> {
        self.weapons.values()
    }

    pub fn armors(&self) -> impl Iterator<Item = &ArmorDef> {
        self.armor.values()
    }
}

fn index<T>(
    kind: CatalogKind,
    entries: Vec<T>,
    id_of: impl Fn(&T) -> &String,
) -> Result<BTreeMap<String, T>, CoreError> {
    let mut out = BTreeMap::new();
    for entry in entries {
        let id = id_of(&entry).clone();
        if id.is_empty() {
            return Err(CoreError::validation(format!("{kind} entry with empty id")));
        }
        if out.contains_key(&id) {
            return Err(CoreError::validation(format!("duplicate {kind} id '{id}'")));
        }
        out.insert(id, entry);
    }
    Ok(out)
}
