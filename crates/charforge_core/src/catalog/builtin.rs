//! Built-in reference catalog covering the core races, base classes, skills,
//! a starter feat list, and common weapons and armor.
//!
//! Costs are in gold pieces and weights in pounds. Class starting wealth is
//! the average of the class's starting gold roll.

use std::collections::{BTreeMap, BTreeSet};

use crate::rules::abilities::Ability::{self, Cha, Con, Dex, Int, Str, Wis};

use super::SaveProgression::{Good, Poor};
use super::{
    ArmorCategory, ArmorDef, BabProgression, CasterTradition, Catalog, CatalogDocument, ClassDef,
    FeatDef, FeatPrerequisites, Proficiencies, RaceDef, SaveProgression, SaveProgressions, Size,
    SkillDef, SkillRankRequirement, Spellcasting, WeaponCategory, WeaponDef,
};

struct RaceRow {
    id: &'static str,
    name: &'static str,
    size: Size,
    speed: i32,
    mods: &'static [(Ability, i32)],
    flexible: bool,
}

#[rustfmt::skip]
const RACES: &[RaceRow] = &[
    RaceRow { id: "dwarf",    name: "Dwarf",    size: Size::Medium, speed: 20, mods: &[(Con, 2), (Wis, 2), (Cha, -2)], flexible: false },
    RaceRow { id: "elf",      name: "Elf",      size: Size::Medium, speed: 30, mods: &[(Dex, 2), (Int, 2), (Con, -2)], flexible: false },
    RaceRow { id: "gnome",    name: "Gnome",    size: Size::Small,  speed: 20, mods: &[(Con, 2), (Cha, 2), (Str, -2)], flexible: false },
    RaceRow { id: "half-elf", name: "Half-Elf", size: Size::Medium, speed: 30, mods: &[],                             flexible: true  },
    RaceRow { id: "half-orc", name: "Half-Orc", size: Size::Medium, speed: 30, mods: &[],                             flexible: true  },
    RaceRow { id: "halfling", name: "Halfling", size: Size::Small,  speed: 20, mods: &[(Dex, 2), (Cha, 2), (Str, -2)], flexible: false },
    RaceRow { id: "human",    name: "Human",    size: Size::Medium, speed: 30, mods: &[],                             flexible: true  },
];

struct SkillRow {
    id: &'static str,
    name: &'static str,
    ability: Ability,
    trained_only: bool,
    armor_check_penalty: bool,
}

#[rustfmt::skip]
const SKILLS: &[SkillRow] = &[
    SkillRow { id: "acrobatics",              name: "Acrobatics",               ability: Dex, trained_only: false, armor_check_penalty: true  },
    SkillRow { id: "appraise",                name: "Appraise",                 ability: Int, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "bluff",                   name: "Bluff",                    ability: Cha, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "climb",                   name: "Climb",                    ability: Str, trained_only: false, armor_check_penalty: true  },
    SkillRow { id: "craft",                   name: "Craft",                    ability: Int, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "diplomacy",               name: "Diplomacy",                ability: Cha, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "disable-device",          name: "Disable Device",           ability: Dex, trained_only: true,  armor_check_penalty: true  },
    SkillRow { id: "disguise",                name: "Disguise",                 ability: Cha, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "escape-artist",           name: "Escape Artist",            ability: Dex, trained_only: false, armor_check_penalty: true  },
    SkillRow { id: "fly",                     name: "Fly",                      ability: Dex, trained_only: false, armor_check_penalty: true  },
    SkillRow { id: "handle-animal",           name: "Handle Animal",            ability: Cha, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "heal",                    name: "Heal",                     ability: Wis, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "intimidate",              name: "Intimidate",               ability: Cha, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "knowledge-arcana",        name: "Knowledge (Arcana)",       ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-dungeoneering", name: "Knowledge (Dungeoneering)",ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-engineering",   name: "Knowledge (Engineering)",  ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-geography",     name: "Knowledge (Geography)",    ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-history",       name: "Knowledge (History)",      ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-local",         name: "Knowledge (Local)",        ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-nature",        name: "Knowledge (Nature)",       ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-nobility",      name: "Knowledge (Nobility)",     ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-planes",        name: "Knowledge (Planes)",       ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "knowledge-religion",      name: "Knowledge (Religion)",     ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "linguistics",             name: "Linguistics",              ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "perception",              name: "Perception",               ability: Wis, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "perform",                 name: "Perform",                  ability: Cha, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "profession",              name: "Profession",               ability: Wis, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "ride",                    name: "Ride",                     ability: Dex, trained_only: false, armor_check_penalty: true  },
    SkillRow { id: "sense-motive",            name: "Sense Motive",             ability: Wis, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "sleight-of-hand",         name: "Sleight of Hand",          ability: Dex, trained_only: true,  armor_check_penalty: true  },
    SkillRow { id: "spellcraft",              name: "Spellcraft",               ability: Int, trained_only: true,  armor_check_penalty: false },
    SkillRow { id: "stealth",                 name: "Stealth",                  ability: Dex, trained_only: false, armor_check_penalty: true  },
    SkillRow { id: "survival",                name: "Survival",                 ability: Wis, trained_only: false, armor_check_penalty: false },
    SkillRow { id: "swim",                    name: "Swim",                     ability: Str, trained_only: false, armor_check_penalty: true  },
    SkillRow { id: "use-magic-device",        name: "Use Magic Device",         ability: Cha, trained_only: true,  armor_check_penalty: false },
];

const ALL_KNOWLEDGE: &[&str] = &[
    "knowledge-arcana",
    "knowledge-dungeoneering",
    "knowledge-engineering",
    "knowledge-geography",
    "knowledge-history",
    "knowledge-local",
    "knowledge-nature",
    "knowledge-nobility",
    "knowledge-planes",
    "knowledge-religion",
];

struct ClassRow {
    id: &'static str,
    name: &'static str,
    hit_die: i32,
    bab: BabProgression,
    saves: (SaveProgression, SaveProgression, SaveProgression),
    skill_points: i32,
    weapons: &'static [&'static str],
    armor: &'static [&'static str],
    casting: Option<(CasterTradition, Ability)>,
    skills: &'static [&'static str],
    all_knowledge: bool,
    wealth: f64,
}

const ARCANE: CasterTradition = CasterTradition::Arcane;
const DIVINE: CasterTradition = CasterTradition::Divine;

#[rustfmt::skip]
const CLASSES: &[ClassRow] = &[
    ClassRow {
        id: "barbarian", name: "Barbarian", hit_die: 12, bab: BabProgression::Full,
        saves: (Good, Poor, Poor), skill_points: 4,
        weapons: &["Simple", "Martial"], armor: &["Light", "Medium", "Shields"], casting: None,
        skills: &["acrobatics", "climb", "craft", "handle-animal", "intimidate", "knowledge-nature",
                  "perception", "ride", "survival", "swim"],
        all_knowledge: false, wealth: 105.0,
    },
    ClassRow {
        id: "bard", name: "Bard", hit_die: 8, bab: BabProgression::Medium,
        saves: (Poor, Good, Good), skill_points: 6,
        weapons: &["Simple", "longsword", "rapier", "sap", "short-sword", "shortbow", "whip"],
        armor: &["Light", "Shields"], casting: Some((ARCANE, Cha)),
        skills: &["acrobatics", "appraise", "bluff", "climb", "craft", "diplomacy", "disguise",
                  "escape-artist", "intimidate", "linguistics", "perception", "perform", "profession",
                  "sense-motive", "sleight-of-hand", "spellcraft", "stealth", "use-magic-device"],
        all_knowledge: true, wealth: 105.0,
    },
    ClassRow {
        id: "cleric", name: "Cleric", hit_die: 8, bab: BabProgression::Medium,
        saves: (Good, Poor, Good), skill_points: 2,
        weapons: &["Simple"], armor: &["Light", "Medium", "Shields"], casting: Some((DIVINE, Wis)),
        skills: &["appraise", "craft", "diplomacy", "heal", "knowledge-arcana", "knowledge-history",
                  "knowledge-nobility", "knowledge-planes", "knowledge-religion", "linguistics",
                  "profession", "sense-motive", "spellcraft"],
        all_knowledge: false, wealth: 140.0,
    },
    ClassRow {
        id: "druid", name: "Druid", hit_die: 8, bab: BabProgression::Medium,
        saves: (Good, Poor, Good), skill_points: 4,
        weapons: &["club", "dagger", "dart", "quarterstaff", "scimitar", "scythe", "sickle",
                   "shortspear", "sling", "spear"],
        armor: &["Light", "Medium", "Shields"], casting: Some((DIVINE, Wis)),
        skills: &["climb", "craft", "fly", "handle-animal", "heal", "knowledge-geography",
                  "knowledge-nature", "perception", "profession", "ride", "spellcraft", "survival",
                  "swim"],
        all_knowledge: false, wealth: 70.0,
    },
    ClassRow {
        id: "fighter", name: "Fighter", hit_die: 10, bab: BabProgression::Full,
        saves: (Good, Poor, Poor), skill_points: 2,
        weapons: &["Simple", "Martial"], armor: &["Heavy", "Shields"], casting: None,
        skills: &["climb", "craft", "handle-animal", "intimidate", "knowledge-dungeoneering",
                  "knowledge-engineering", "profession", "ride", "survival", "swim"],
        all_knowledge: false, wealth: 175.0,
    },
    ClassRow {
        id: "monk", name: "Monk", hit_die: 8, bab: BabProgression::Medium,
        saves: (Good, Good, Good), skill_points: 4,
        weapons: &["club", "light-crossbow", "heavy-crossbow", "dagger", "handaxe", "javelin",
                   "kama", "nunchaku", "quarterstaff", "sai", "shortspear", "short-sword",
                   "shuriken", "siangham", "sling", "spear"],
        armor: &[], casting: None,
        skills: &["acrobatics", "climb", "craft", "escape-artist", "intimidate", "knowledge-history",
                  "knowledge-religion", "perception", "perform", "profession", "ride",
                  "sense-motive", "stealth", "swim"],
        all_knowledge: false, wealth: 35.0,
    },
    ClassRow {
        id: "paladin", name: "Paladin", hit_die: 10, bab: BabProgression::Full,
        saves: (Good, Poor, Good), skill_points: 2,
        weapons: &["Simple", "Martial"], armor: &["Heavy", "Shields"], casting: Some((DIVINE, Cha)),
        skills: &["craft", "diplomacy", "handle-animal", "heal", "knowledge-nobility",
                  "knowledge-religion", "profession", "ride", "sense-motive", "spellcraft"],
        all_knowledge: false, wealth: 175.0,
    },
    ClassRow {
        id: "ranger", name: "Ranger", hit_die: 10, bab: BabProgression::Full,
        saves: (Good, Good, Poor), skill_points: 6,
        weapons: &["Simple", "Martial"], armor: &["Medium", "Shields"], casting: Some((DIVINE, Wis)),
        skills: &["climb", "craft", "handle-animal", "heal", "intimidate", "knowledge-dungeoneering",
                  "knowledge-geography", "knowledge-nature", "perception", "profession", "ride",
                  "spellcraft", "stealth", "survival", "swim"],
        all_knowledge: false, wealth: 175.0,
    },
    ClassRow {
        id: "rogue", name: "Rogue", hit_die: 8, bab: BabProgression::Medium,
        saves: (Poor, Good, Poor), skill_points: 8,
        weapons: &["Simple", "hand-crossbow", "rapier", "sap", "shortbow", "short-sword"],
        armor: &["Light"], casting: None,
        skills: &["acrobatics", "appraise", "bluff", "climb", "craft", "diplomacy", "disable-device",
                  "disguise", "escape-artist", "intimidate", "knowledge-dungeoneering",
                  "knowledge-local", "linguistics", "perception", "perform", "profession",
                  "sense-motive", "sleight-of-hand", "stealth", "swim", "use-magic-device"],
        all_knowledge: false, wealth: 140.0,
    },
    ClassRow {
        id: "sorcerer", name: "Sorcerer", hit_die: 6, bab: BabProgression::Poor,
        saves: (Poor, Poor, Good), skill_points: 2,
        weapons: &["Simple"], armor: &[], casting: Some((ARCANE, Cha)),
        skills: &["appraise", "bluff", "craft", "fly", "intimidate", "knowledge-arcana", "profession",
                  "spellcraft", "use-magic-device"],
        all_knowledge: false, wealth: 70.0,
    },
    ClassRow {
        id: "wizard", name: "Wizard", hit_die: 6, bab: BabProgression::Poor,
        saves: (Poor, Poor, Good), skill_points: 2,
        weapons: &["club", "dagger", "heavy-crossbow", "light-crossbow", "quarterstaff"],
        armor: &[], casting: Some((ARCANE, Int)),
        skills: &["appraise", "craft", "fly", "linguistics", "profession", "spellcraft"],
        all_knowledge: true, wealth: 70.0,
    },
];

struct FeatRow {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    abilities: &'static [(Ability, i32)],
    bab: Option<i32>,
    feats: &'static [&'static str],
    skills: &'static [(&'static str, i32)],
}

#[rustfmt::skip]
const FEATS: &[FeatRow] = &[
    FeatRow { id: "acrobatic",           name: "Acrobatic",           description: "+2 on Acrobatics and Fly checks.",               abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "alertness",           name: "Alertness",           description: "+2 on Perception and Sense Motive checks.",      abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "cleave",              name: "Cleave",              description: "Make an additional attack if the first hits.",  abilities: &[(Str, 13)],            bab: Some(1), feats: &["power-attack"],                    skills: &[] },
    FeatRow { id: "combat-casting",      name: "Combat Casting",      description: "+4 on concentration checks when casting defensively.", abilities: &[],               bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "combat-expertise",    name: "Combat Expertise",    description: "Trade attack bonus for AC bonus.",               abilities: &[(Int, 13)],            bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "deadly-aim",          name: "Deadly Aim",          description: "Trade ranged attack bonus for damage.",          abilities: &[(Dex, 13)],            bab: Some(1), feats: &[],                                  skills: &[] },
    FeatRow { id: "dodge",               name: "Dodge",               description: "+1 dodge bonus to AC.",                          abilities: &[(Dex, 13)],            bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "great-cleave",        name: "Great Cleave",        description: "Keep cleaving while attacks hit.",               abilities: &[(Str, 13)],            bab: Some(4), feats: &["cleave", "power-attack"],          skills: &[] },
    FeatRow { id: "great-fortitude",     name: "Great Fortitude",     description: "+2 on Fortitude saves.",                         abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "improved-initiative", name: "Improved Initiative", description: "+4 on initiative checks.",                       abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "improved-trip",       name: "Improved Trip",       description: "+2 on trip attempts; no attack of opportunity.", abilities: &[(Int, 13)],            bab: None,    feats: &["combat-expertise"],                skills: &[] },
    FeatRow { id: "iron-will",           name: "Iron Will",           description: "+2 on Will saves.",                              abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "lightning-reflexes",  name: "Lightning Reflexes",  description: "+2 on Reflex saves.",                            abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "mobility",            name: "Mobility",            description: "+4 AC against attacks of opportunity from movement.", abilities: &[(Dex, 13)],       bab: None,    feats: &["dodge"],                           skills: &[] },
    FeatRow { id: "mounted-combat",      name: "Mounted Combat",      description: "Negate a hit on your mount with a Ride check.",  abilities: &[],                     bab: None,    feats: &[],                                  skills: &[("ride", 1)] },
    FeatRow { id: "point-blank-shot",    name: "Point-Blank Shot",    description: "+1 on ranged attack and damage within 30 feet.", abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "power-attack",        name: "Power Attack",        description: "Trade melee attack bonus for damage.",           abilities: &[(Str, 13)],            bab: Some(1), feats: &[],                                  skills: &[] },
    FeatRow { id: "precise-shot",        name: "Precise Shot",        description: "No penalty for shooting into melee.",            abilities: &[],                     bab: None,    feats: &["point-blank-shot"],                skills: &[] },
    FeatRow { id: "rapid-shot",          name: "Rapid Shot",          description: "Make one extra ranged attack.",                  abilities: &[(Dex, 13)],            bab: None,    feats: &["point-blank-shot"],                skills: &[] },
    FeatRow { id: "ride-by-attack",      name: "Ride-By Attack",      description: "Move before and after a mounted charge.",        abilities: &[],                     bab: None,    feats: &["mounted-combat"],                  skills: &[("ride", 1)] },
    FeatRow { id: "skill-focus",         name: "Skill Focus",         description: "+3 on one skill.",                               abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "spring-attack",       name: "Spring Attack",       description: "Move before and after a melee attack.",          abilities: &[(Dex, 13)],            bab: Some(4), feats: &["dodge", "mobility"],               skills: &[] },
    FeatRow { id: "toughness",           name: "Toughness",           description: "+3 hit points.",                                 abilities: &[],                     bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "two-weapon-fighting", name: "Two-Weapon Fighting", description: "Reduce two-weapon fighting penalties.",          abilities: &[(Dex, 15)],            bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "weapon-finesse",      name: "Weapon Finesse",      description: "Use Dexterity on attack rolls with light weapons.", abilities: &[],                  bab: None,    feats: &[],                                  skills: &[] },
    FeatRow { id: "weapon-focus",        name: "Weapon Focus",        description: "+1 on attack rolls with one weapon.",            abilities: &[],                     bab: Some(1), feats: &[],                                  skills: &[] },
];

struct WeaponRow {
    id: &'static str,
    name: &'static str,
    category: WeaponCategory,
    cost: f64,
    weight: f64,
    damage: &'static str,
}

const SIMPLE: WeaponCategory = WeaponCategory::Simple;
const MARTIAL: WeaponCategory = WeaponCategory::Martial;
const EXOTIC: WeaponCategory = WeaponCategory::Exotic;

#[rustfmt::skip]
const WEAPONS: &[WeaponRow] = &[
    WeaponRow { id: "club",           name: "Club",           category: SIMPLE,  cost: 0.0,   weight: 3.0,  damage: "1d6"  },
    WeaponRow { id: "dagger",         name: "Dagger",         category: SIMPLE,  cost: 2.0,   weight: 1.0,  damage: "1d4"  },
    WeaponRow { id: "dart",           name: "Dart",           category: SIMPLE,  cost: 0.5,   weight: 0.5,  damage: "1d4"  },
    WeaponRow { id: "heavy-crossbow", name: "Heavy Crossbow", category: SIMPLE,  cost: 50.0,  weight: 8.0,  damage: "1d10" },
    WeaponRow { id: "javelin",        name: "Javelin",        category: SIMPLE,  cost: 1.0,   weight: 2.0,  damage: "1d6"  },
    WeaponRow { id: "light-crossbow", name: "Light Crossbow", category: SIMPLE,  cost: 35.0,  weight: 4.0,  damage: "1d8"  },
    WeaponRow { id: "light-mace",     name: "Light Mace",     category: SIMPLE,  cost: 5.0,   weight: 4.0,  damage: "1d6"  },
    WeaponRow { id: "quarterstaff",   name: "Quarterstaff",   category: SIMPLE,  cost: 0.0,   weight: 4.0,  damage: "1d6"  },
    WeaponRow { id: "shortspear",     name: "Shortspear",     category: SIMPLE,  cost: 1.0,   weight: 3.0,  damage: "1d6"  },
    WeaponRow { id: "sickle",         name: "Sickle",         category: SIMPLE,  cost: 6.0,   weight: 2.0,  damage: "1d6"  },
    WeaponRow { id: "sling",          name: "Sling",          category: SIMPLE,  cost: 0.0,   weight: 0.0,  damage: "1d4"  },
    WeaponRow { id: "spear",          name: "Spear",          category: SIMPLE,  cost: 2.0,   weight: 6.0,  damage: "1d8"  },
    WeaponRow { id: "battleaxe",      name: "Battleaxe",      category: MARTIAL, cost: 10.0,  weight: 6.0,  damage: "1d8"  },
    WeaponRow { id: "greataxe",       name: "Greataxe",       category: MARTIAL, cost: 20.0,  weight: 12.0, damage: "1d12" },
    WeaponRow { id: "greatsword",     name: "Greatsword",     category: MARTIAL, cost: 50.0,  weight: 8.0,  damage: "2d6"  },
    WeaponRow { id: "handaxe",        name: "Handaxe",        category: MARTIAL, cost: 6.0,   weight: 3.0,  damage: "1d6"  },
    WeaponRow { id: "longbow",        name: "Longbow",        category: MARTIAL, cost: 75.0,  weight: 3.0,  damage: "1d8"  },
    WeaponRow { id: "longsword",      name: "Longsword",      category: MARTIAL, cost: 15.0,  weight: 4.0,  damage: "1d8"  },
    WeaponRow { id: "rapier",         name: "Rapier",         category: MARTIAL, cost: 20.0,  weight: 2.0,  damage: "1d6"  },
    WeaponRow { id: "sap",            name: "Sap",            category: MARTIAL, cost: 1.0,   weight: 2.0,  damage: "1d6"  },
    WeaponRow { id: "scimitar",       name: "Scimitar",       category: MARTIAL, cost: 15.0,  weight: 4.0,  damage: "1d6"  },
    WeaponRow { id: "scythe",         name: "Scythe",         category: MARTIAL, cost: 18.0,  weight: 10.0, damage: "2d4"  },
    WeaponRow { id: "short-sword",    name: "Short Sword",    category: MARTIAL, cost: 10.0,  weight: 2.0,  damage: "1d6"  },
    WeaponRow { id: "shortbow",       name: "Shortbow",       category: MARTIAL, cost: 30.0,  weight: 2.0,  damage: "1d6"  },
    WeaponRow { id: "hand-crossbow",  name: "Hand Crossbow",  category: EXOTIC,  cost: 100.0, weight: 2.0,  damage: "1d4"  },
    WeaponRow { id: "kama",           name: "Kama",           category: EXOTIC,  cost: 2.0,   weight: 2.0,  damage: "1d6"  },
    WeaponRow { id: "nunchaku",       name: "Nunchaku",       category: EXOTIC,  cost: 2.0,   weight: 2.0,  damage: "1d6"  },
    WeaponRow { id: "sai",            name: "Sai",            category: EXOTIC,  cost: 1.0,   weight: 1.0,  damage: "1d4"  },
    WeaponRow { id: "shuriken",       name: "Shuriken (5)",   category: EXOTIC,  cost: 1.0,   weight: 0.5,  damage: "1d2"  },
    WeaponRow { id: "siangham",       name: "Siangham",       category: EXOTIC,  cost: 3.0,   weight: 1.0,  damage: "1d6"  },
    WeaponRow { id: "whip",           name: "Whip",           category: EXOTIC,  cost: 1.0,   weight: 2.0,  damage: "1d3"  },
];

struct ArmorRow {
    id: &'static str,
    name: &'static str,
    category: ArmorCategory,
    cost: f64,
    weight: f64,
    bonus: i32,
    max_dex: Option<i32>,
    penalty: i32,
}

const LIGHT: ArmorCategory = ArmorCategory::Light;
const MEDIUM: ArmorCategory = ArmorCategory::Medium;
const HEAVY: ArmorCategory = ArmorCategory::Heavy;
const SHIELD: ArmorCategory = ArmorCategory::Shield;

#[rustfmt::skip]
const ARMOR: &[ArmorRow] = &[
    ArmorRow { id: "padded",              name: "Padded",              category: LIGHT,  cost: 5.0,    weight: 10.0, bonus: 1, max_dex: Some(8), penalty: 0   },
    ArmorRow { id: "leather",             name: "Leather",             category: LIGHT,  cost: 10.0,   weight: 15.0, bonus: 2, max_dex: Some(6), penalty: 0   },
    ArmorRow { id: "studded-leather",     name: "Studded Leather",     category: LIGHT,  cost: 25.0,   weight: 20.0, bonus: 3, max_dex: Some(5), penalty: -1  },
    ArmorRow { id: "chain-shirt",         name: "Chain Shirt",         category: LIGHT,  cost: 100.0,  weight: 25.0, bonus: 4, max_dex: Some(4), penalty: -2  },
    ArmorRow { id: "hide",                name: "Hide",                category: MEDIUM, cost: 15.0,   weight: 25.0, bonus: 4, max_dex: Some(4), penalty: -3  },
    ArmorRow { id: "scale-mail",          name: "Scale Mail",          category: MEDIUM, cost: 50.0,   weight: 30.0, bonus: 5, max_dex: Some(3), penalty: -4  },
    ArmorRow { id: "chainmail",           name: "Chainmail",           category: MEDIUM, cost: 150.0,  weight: 40.0, bonus: 6, max_dex: Some(2), penalty: -5  },
    ArmorRow { id: "breastplate",         name: "Breastplate",         category: MEDIUM, cost: 200.0,  weight: 30.0, bonus: 6, max_dex: Some(3), penalty: -4  },
    ArmorRow { id: "splint-mail",         name: "Splint Mail",         category: HEAVY,  cost: 200.0,  weight: 45.0, bonus: 7, max_dex: Some(0), penalty: -7  },
    ArmorRow { id: "banded-mail",         name: "Banded Mail",         category: HEAVY,  cost: 250.0,  weight: 35.0, bonus: 7, max_dex: Some(1), penalty: -6  },
    ArmorRow { id: "half-plate",          name: "Half-Plate",          category: HEAVY,  cost: 600.0,  weight: 50.0, bonus: 8, max_dex: Some(0), penalty: -7  },
    ArmorRow { id: "full-plate",          name: "Full Plate",          category: HEAVY,  cost: 1500.0, weight: 50.0, bonus: 9, max_dex: Some(1), penalty: -6  },
    ArmorRow { id: "buckler",             name: "Buckler",             category: SHIELD, cost: 5.0,    weight: 5.0,  bonus: 1, max_dex: None,    penalty: -1  },
    ArmorRow { id: "light-wooden-shield", name: "Light Wooden Shield", category: SHIELD, cost: 3.0,    weight: 5.0,  bonus: 1, max_dex: None,    penalty: -1  },
    ArmorRow { id: "heavy-wooden-shield", name: "Heavy Wooden Shield", category: SHIELD, cost: 7.0,    weight: 10.0, bonus: 2, max_dex: None,    penalty: -2  },
    ArmorRow { id: "heavy-steel-shield",  name: "Heavy Steel Shield",  category: SHIELD, cost: 20.0,   weight: 15.0, bonus: 2, max_dex: None,    penalty: -2  },
    ArmorRow { id: "tower-shield",        name: "Tower Shield",        category: SHIELD, cost: 30.0,   weight: 45.0, bonus: 4, max_dex: Some(2), penalty: -10 },
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

pub(super) fn document() -> CatalogDocument {
    let races = RACES
        .iter()
        .map(|row| RaceDef {
            id: row.id.to_string(),
            name: row.name.to_string(),
            size: row.size,
            speed: row.speed,
            ability_modifiers: row.mods.iter().copied().collect(),
            flexible_bonus: row.flexible,
        })
        .collect();

    let skills = SKILLS
        .iter()
        .map(|row| SkillDef {
            id: row.id.to_string(),
            name: row.name.to_string(),
            ability: row.ability,
            trained_only: row.trained_only,
            armor_check_penalty: row.armor_check_penalty,
        })
        .collect();

    let classes = CLASSES
        .iter()
        .map(|row| {
            let mut class_skills: BTreeSet<String> =
                row.skills.iter().map(|s| (*s).to_string()).collect();
            if row.all_knowledge {
                class_skills.extend(ALL_KNOWLEDGE.iter().map(|s| (*s).to_string()));
            }
            ClassDef {
                id: row.id.to_string(),
                name: row.name.to_string(),
                hit_die: row.hit_die,
                bab: row.bab,
                saves: SaveProgressions {
                    fortitude: row.saves.0,
                    reflex: row.saves.1,
                    will: row.saves.2,
                },
                skill_points_per_level: row.skill_points,
                proficiencies: Proficiencies {
                    weapons: owned(row.weapons),
                    armor: owned(row.armor),
                },
                spellcasting: row
                    .casting
                    .map(|(tradition, ability)| Spellcasting { tradition, ability }),
                class_skills,
                starting_wealth: Some(row.wealth),
            }
        })
        .collect();

    let feats = FEATS
        .iter()
        .map(|row| FeatDef {
            id: row.id.to_string(),
            name: row.name.to_string(),
            description: row.description.to_string(),
            prerequisites: FeatPrerequisites {
                abilities: row.abilities.iter().copied().collect::<BTreeMap<_, _>>(),
                base_attack_bonus: row.bab,
                feats: owned(row.feats),
                skills: row
                    .skills
                    .iter()
                    .map(|(skill_id, ranks)| SkillRankRequirement {
                        skill_id: (*skill_id).to_string(),
                        ranks: *ranks,
                    })
                    .collect(),
            },
        })
        .collect();

    let weapons = WEAPONS
        .iter()
        .map(|row| WeaponDef {
            id: row.id.to_string(),
            name: row.name.to_string(),
            category: row.category,
            cost: row.cost,
            weight: row.weight,
            damage: row.damage.to_string(),
        })
        .collect();

    let armor = ARMOR
        .iter()
        .map(|row| ArmorDef {
            id: row.id.to_string(),
            name: row.name.to_string(),
            category: row.category,
            cost: row.cost,
            weight: row.weight,
            armor_bonus: row.bonus,
            max_dex: row.max_dex,
            check_penalty: row.penalty,
        })
        .collect();

    CatalogDocument {
        races,
        classes,
        skills,
        feats,
        weapons,
        armor,
    }
}

pub(super) fn catalog() -> Catalog {
    // The tables above hold unique, non-empty ids, so indexing cannot fail.
    Catalog::from_document(document()).unwrap_or_default()
}
