//! Derived combat statistics.
//!
//! Every class-dependent figure is summed over all class entries, so the
//! order of entries never changes a result. An entry whose class id does not
//! resolve contributes zero and logs a warning.

use serde::Serialize;

use crate::catalog::{BabProgression, Catalog, ClassDef, SaveProgression};
use crate::character::{Character, CharacterClassEntry, FavoredClassBonus};
use crate::rules::abilities::{Ability, AbilityScores, ability_modifier};

pub const BASE_ARMOR_CLASS: i32 = 10;
pub const BASE_COMBAT_MANEUVER_DEFENSE: i32 = 10;
/// Only Medium creatures are modeled.
pub const SIZE_MODIFIER_MEDIUM: i32 = 0;

pub fn class_base_attack_bonus(progression: BabProgression, level: i32) -> i32 {
    match progression {
        BabProgression::Full => level,
        BabProgression::Medium => (level * 3).div_euclid(4),
        BabProgression::Poor => level.div_euclid(2),
    }
}

pub fn class_save_bonus(progression: SaveProgression, level: i32) -> i32 {
    match progression {
        SaveProgression::Good => 2 + level.div_euclid(2),
        SaveProgression::Poor => level.div_euclid(3),
    }
}

fn resolved<'a>(
    entries: &'a [CharacterClassEntry],
    catalog: &'a Catalog,
) -> impl Iterator<Item = (&'a CharacterClassEntry, &'a ClassDef)> + 'a {
    entries.iter().filter_map(|entry| match catalog.class(&entry.class_id) {
        Some(class) => Some((entry, class)),
        None => {
            tracing::warn!(class_id = %entry.class_id, "unknown class contributes nothing");
            None
        }
    })
}

pub fn base_attack_bonus(entries: &[CharacterClassEntry], catalog: &Catalog) -> i32 {
    resolved(entries, catalog)
        .map(|(entry, class)| class_base_attack_bonus(class.bab, entry.level))
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Fortitude,
    Reflex,
    Will,
}

impl SaveKind {
    pub const ALL: [SaveKind; 3] = [Self::Fortitude, Self::Reflex, Self::Will];

    pub fn ability(self) -> Ability {
        match self {
            Self::Fortitude => Ability::Con,
            Self::Reflex => Ability::Dex,
            Self::Will => Ability::Wis,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fortitude => "Fortitude",
            Self::Reflex => "Reflex",
            Self::Will => "Will",
        }
    }

    fn progression(self, class: &ClassDef) -> SaveProgression {
        match self {
            Self::Fortitude => class.saves.fortitude,
            Self::Reflex => class.saves.reflex,
            Self::Will => class.saves.will,
        }
    }
}

/// Class contributions plus the save's key ability modifier.
pub fn saving_throw(
    kind: SaveKind,
    entries: &[CharacterClassEntry],
    catalog: &Catalog,
    modifiers: &AbilityScores,
) -> i32 {
    let class_total: i32 = resolved(entries, catalog)
        .map(|(entry, class)| class_save_bonus(kind.progression(class), entry.level))
        .sum();
    class_total + modifiers.get(kind.ability())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SavingThrows {
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

impl SavingThrows {
    pub fn get(&self, kind: SaveKind) -> i32 {
        match kind {
            SaveKind::Fortitude => self.fortitude,
            SaveKind::Reflex => self.reflex,
            SaveKind::Will => self.will,
        }
    }
}

/// Caller-supplied AC contributions. Nothing derives these from equipped
/// items; they default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmorClassInputs {
    pub armor: i32,
    pub shield: i32,
    pub natural: i32,
    pub deflection: i32,
    pub misc: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArmorClassBreakdown {
    pub base: i32,
    pub armor: i32,
    pub shield: i32,
    pub dex: i32,
    pub natural: i32,
    pub deflection: i32,
    pub misc: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArmorClass {
    pub total: i32,
    pub touch: i32,
    pub flat_footed: i32,
    pub breakdown: ArmorClassBreakdown,
}

pub fn armor_class(dex_mod: i32, inputs: ArmorClassInputs) -> ArmorClass {
    let breakdown = ArmorClassBreakdown {
        base: BASE_ARMOR_CLASS,
        armor: inputs.armor,
        shield: inputs.shield,
        dex: dex_mod,
        natural: inputs.natural,
        deflection: inputs.deflection,
        misc: inputs.misc,
    };
    let total = breakdown.base
        + breakdown.armor
        + breakdown.shield
        + breakdown.dex
        + breakdown.natural
        + breakdown.deflection
        + breakdown.misc;
    ArmorClass {
        total,
        touch: breakdown.base + breakdown.dex + breakdown.deflection + breakdown.misc,
        flat_footed: total - breakdown.dex,
        breakdown,
    }
}

pub fn initiative(dex_mod: i32) -> i32 {
    dex_mod
}

pub fn melee_attack(bab: i32, str_mod: i32) -> i32 {
    bab + str_mod
}

pub fn ranged_attack(bab: i32, dex_mod: i32) -> i32 {
    bab + dex_mod
}

pub fn combat_maneuver_bonus(bab: i32, str_mod: i32) -> i32 {
    bab + str_mod + SIZE_MODIFIER_MEDIUM
}

pub fn combat_maneuver_defense(bab: i32, str_mod: i32, dex_mod: i32) -> i32 {
    BASE_COMBAT_MANEUVER_DEFENSE + bab + str_mod + dex_mod + SIZE_MODIFIER_MEDIUM
}

/// Average hit points for one class entry: the full die at its first level,
/// `die / 2 + 1` after that, CON at every level, plus favored-class HP tokens.
pub fn class_hit_points(hit_die: i32, entry: &CharacterClassEntry, con_mod: i32) -> i32 {
    if entry.level < 1 {
        return 0;
    }
    let first = hit_die + con_mod;
    let later = (entry.level - 1) * (hit_die.div_euclid(2) + 1 + con_mod);
    first + later + entry.favored_count(FavoredClassBonus::Hp)
}

/// Never less than 1.
pub fn max_hit_points(entries: &[CharacterClassEntry], catalog: &Catalog, con_mod: i32) -> i32 {
    let total: i32 = resolved(entries, catalog)
        .map(|(entry, class)| class_hit_points(class.hit_die, entry, con_mod))
        .sum();
    total.max(1)
}

/// Pounds, Medium creatures only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarryingCapacity {
    pub light: i32,
    pub medium: i32,
    pub heavy: i32,
    pub lift: i32,
    pub drag: i32,
}

pub fn carrying_capacity(strength: i32) -> CarryingCapacity {
    let heavy = strength * 30;
    let lift = heavy * 2;
    CarryingCapacity {
        light: strength * 10,
        medium: strength * 20,
        heavy,
        lift,
        drag: lift * 5,
    }
}

/// `+3`, `+0`, `-1`.
pub fn format_modifier(n: i32) -> String {
    if n >= 0 { format!("+{n}") } else { n.to_string() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedStatsSnapshot {
    pub ability_scores: AbilityScores,
    pub ability_modifiers: AbilityScores,
    pub base_attack_bonus: i32,
    pub saves: SavingThrows,
    pub armor_class: ArmorClass,
    pub initiative: i32,
    pub melee_attack: i32,
    pub ranged_attack: i32,
    pub cmb: i32,
    pub cmd: i32,
    pub max_hit_points: i32,
    pub carrying_capacity: CarryingCapacity,
}

/// Computes the full snapshot from final (post-racial) ability scores.
pub fn derive_stats_from_scores(
    final_scores: AbilityScores,
    entries: &[CharacterClassEntry],
    catalog: &Catalog,
    armor: ArmorClassInputs,
) -> DerivedStatsSnapshot {
    let mods = final_scores.modifiers();
    let bab = base_attack_bonus(entries, catalog);
    let saves = SavingThrows {
        fortitude: saving_throw(SaveKind::Fortitude, entries, catalog, &mods),
        reflex: saving_throw(SaveKind::Reflex, entries, catalog, &mods),
        will: saving_throw(SaveKind::Will, entries, catalog, &mods),
    };

    DerivedStatsSnapshot {
        ability_scores: final_scores,
        ability_modifiers: mods,
        base_attack_bonus: bab,
        saves,
        armor_class: armor_class(mods.dex, armor),
        initiative: initiative(mods.dex),
        melee_attack: melee_attack(bab, mods.str),
        ranged_attack: ranged_attack(bab, mods.dex),
        cmb: combat_maneuver_bonus(bab, mods.str),
        cmd: combat_maneuver_defense(bab, mods.str, mods.dex),
        max_hit_points: max_hit_points(entries, catalog, ability_modifier(final_scores.con)),
        carrying_capacity: carrying_capacity(final_scores.str),
    }
}

pub fn derive_stats(
    character: &Character,
    catalog: &Catalog,
    armor: ArmorClassInputs,
) -> DerivedStatsSnapshot {
    derive_stats_from_scores(
        character.final_scores(catalog),
        &character.classes,
        catalog,
        armor,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(class_id: &str, level: i32) -> CharacterClassEntry {
        CharacterClassEntry::new(class_id, level)
    }

    #[test]
    fn bab_progressions() {
        assert_eq!(class_base_attack_bonus(BabProgression::Full, 1), 1);
        assert_eq!(class_base_attack_bonus(BabProgression::Medium, 1), 0);
        assert_eq!(class_base_attack_bonus(BabProgression::Medium, 4), 3);
        assert_eq!(class_base_attack_bonus(BabProgression::Medium, 7), 5);
        assert_eq!(class_base_attack_bonus(BabProgression::Poor, 1), 0);
        assert_eq!(class_base_attack_bonus(BabProgression::Poor, 5), 2);
    }

    #[test]
    fn multiclass_bab_sums_in_any_order() {
        let catalog = Catalog::builtin();
        let forward = [entry("fighter", 3), entry("wizard", 5)];
        let reverse = [entry("wizard", 5), entry("fighter", 3)];
        assert_eq!(base_attack_bonus(&forward, &catalog), 3 + 2);
        assert_eq!(base_attack_bonus(&reverse, &catalog), 3 + 2);
    }

    #[test]
    fn good_fortitude_at_first_level() {
        let catalog = Catalog::builtin();
        let mods = AbilityScores::uniform(0).with(Ability::Con, 2);
        let fort = saving_throw(SaveKind::Fortitude, &[entry("fighter", 1)], &catalog, &mods);
        assert_eq!(fort, 4);
        let will = saving_throw(SaveKind::Will, &[entry("fighter", 1)], &catalog, &mods);
        assert_eq!(will, 0);
        assert_eq!(class_save_bonus(SaveProgression::Poor, 6), 2);
    }

    #[test]
    fn armor_class_variants() {
        let ac = armor_class(
            3,
            ArmorClassInputs {
                armor: 4,
                shield: 2,
                ..ArmorClassInputs::default()
            },
        );
        assert_eq!(ac.total, 19);
        assert_eq!(ac.touch, 13);
        assert_eq!(ac.flat_footed, 16);

        let bare = armor_class(-1, ArmorClassInputs::default());
        assert_eq!((bare.total, bare.touch, bare.flat_footed), (9, 9, 10));
    }

    #[test]
    fn hit_points_use_max_then_average() {
        let catalog = Catalog::builtin();
        assert_eq!(max_hit_points(&[entry("fighter", 1)], &catalog, 2), 12);
        // 10 + 2, then (5 + 1 + 2) twice.
        assert_eq!(max_hit_points(&[entry("fighter", 3)], &catalog, 2), 28);

        let mut favored = entry("fighter", 1);
        favored.favored_class_bonus.push(FavoredClassBonus::Hp);
        favored.favored_class_bonus.push(FavoredClassBonus::Skill);
        assert_eq!(max_hit_points(&[favored], &catalog, 0), 11);
    }

    #[test]
    fn stored_rolls_do_not_change_max_hit_points() {
        let catalog = Catalog::builtin();
        let mut rolled = entry("fighter", 3);
        rolled.hit_points = vec![10, 1, 1];
        assert_eq!(max_hit_points(&[rolled], &catalog, 2), 28);
    }

    #[test]
    fn hit_points_floor_at_one() {
        let catalog = Catalog::builtin();
        assert_eq!(max_hit_points(&[entry("wizard", 1)], &catalog, -6), 1);
        assert_eq!(max_hit_points(&[], &catalog, 0), 1);
    }

    #[test]
    fn unknown_class_contributes_zero() {
        let catalog = Catalog::builtin();
        let entries = [entry("fighter", 1), entry("gunslinger", 1)];
        assert_eq!(base_attack_bonus(&entries, &catalog), 1);
        assert_eq!(max_hit_points(&entries, &catalog, 0), 10);
    }

    #[test]
    fn carrying_capacity_for_strength_sixteen() {
        let carry = carrying_capacity(16);
        assert_eq!(
            (carry.light, carry.medium, carry.heavy, carry.lift, carry.drag),
            (160, 320, 480, 960, 4800)
        );
    }

    #[test]
    fn combat_maneuvers_and_attacks() {
        assert_eq!(melee_attack(1, 3), 4);
        assert_eq!(ranged_attack(1, -1), 0);
        assert_eq!(combat_maneuver_bonus(1, 3), 4);
        assert_eq!(combat_maneuver_defense(1, 3, 2), 16);
        assert_eq!(initiative(2), 2);
    }

    #[test]
    fn format_modifier_signs() {
        assert_eq!(format_modifier(3), "+3");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-2), "-2");
    }

    #[test]
    fn derive_stats_for_first_level_fighter() {
        let catalog = Catalog::builtin();
        let scores = AbilityScores {
            str: 17,
            dex: 14,
            con: 14,
            int: 10,
            wis: 12,
            cha: 8,
        };
        let stats = derive_stats_from_scores(
            scores,
            &[entry("fighter", 1)],
            &catalog,
            ArmorClassInputs::default(),
        );
        assert_eq!(stats.base_attack_bonus, 1);
        assert_eq!(stats.saves, SavingThrows { fortitude: 4, reflex: 2, will: 1 });
        assert_eq!(stats.armor_class.total, 12);
        assert_eq!(stats.melee_attack, 4);
        assert_eq!(stats.ranged_attack, 3);
        assert_eq!(stats.cmd, 16);
        assert_eq!(stats.max_hit_points, 12);
        assert_eq!(stats.carrying_capacity.heavy, 510);
        assert_eq!(stats.ability_modifiers.cha, -1);
    }
}
