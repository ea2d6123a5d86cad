//! Advisory weapon and armor proficiency checks. A `false` result never
//! blocks a purchase.

use crate::catalog::{ArmorCategory, ArmorDef, ClassDef, ItemRef, WeaponCategory, WeaponDef};

const SIMPLE_TOKEN: &str = "Simple";
const MARTIAL_TOKEN: &str = "Martial";
const LIGHT_TOKEN: &str = "Light";
const MEDIUM_TOKEN: &str = "Medium";
const HEAVY_TOKEN: &str = "Heavy";
const SHIELDS_TOKEN: &str = "Shields";

fn weapon_token_covers(token: &str, weapon: &WeaponDef) -> bool {
    if token == SIMPLE_TOKEN {
        return weapon.category == WeaponCategory::Simple;
    }
    if token == MARTIAL_TOKEN {
        return matches!(
            weapon.category,
            WeaponCategory::Simple | WeaponCategory::Martial
        );
    }
    token.eq_ignore_ascii_case(&weapon.id)
}

fn armor_token_covers(token: &str, armor: &ArmorDef) -> bool {
    let covered: &[ArmorCategory] = match token {
        LIGHT_TOKEN => &[ArmorCategory::Light],
        MEDIUM_TOKEN => &[ArmorCategory::Light, ArmorCategory::Medium],
        HEAVY_TOKEN => &[
            ArmorCategory::Light,
            ArmorCategory::Medium,
            ArmorCategory::Heavy,
        ],
        SHIELDS_TOKEN => &[ArmorCategory::Shield],
        _ => return token == armor.id,
    };
    covered.contains(&armor.category)
}

pub fn is_weapon_proficient(class: &ClassDef, weapon: &WeaponDef) -> bool {
    class
        .proficiencies
        .weapons
        .iter()
        .any(|token| weapon_token_covers(token, weapon))
}

pub fn is_armor_proficient(class: &ClassDef, armor: &ArmorDef) -> bool {
    class
        .proficiencies
        .armor
        .iter()
        .any(|token| armor_token_covers(token, armor))
}

pub fn is_proficient(class: &ClassDef, item: ItemRef<'_>) -> bool {
    match item {
        ItemRef::Weapon(weapon) => is_weapon_proficient(class, weapon),
        ItemRef::Armor(armor) => is_armor_proficient(class, armor),
    }
}

/// Proficient through any of the given classes.
pub fn is_proficient_any<'a>(
    classes: impl IntoIterator<Item = &'a ClassDef>,
    item: ItemRef<'_>,
) -> bool {
    classes.into_iter().any(|class| is_proficient(class, item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn class(catalog: &Catalog, id: &str) -> ClassDef {
        catalog.class(id).cloned().expect("builtin class")
    }

    #[test]
    fn simple_and_martial_tokens_cascade() {
        let catalog = Catalog::builtin();
        let fighter = class(&catalog, "fighter");
        let cleric = class(&catalog, "cleric");
        let longsword = catalog.weapon("longsword").expect("longsword");
        let dagger = catalog.weapon("dagger").expect("dagger");
        let whip = catalog.weapon("whip").expect("whip");

        assert!(is_weapon_proficient(&fighter, longsword));
        assert!(is_weapon_proficient(&fighter, dagger));
        assert!(!is_weapon_proficient(&fighter, whip));
        assert!(is_weapon_proficient(&cleric, dagger));
        assert!(!is_weapon_proficient(&cleric, longsword));
    }

    #[test]
    fn weapon_ids_match_case_insensitively() {
        let catalog = Catalog::builtin();
        let mut wizard = class(&catalog, "wizard");
        let rapier = catalog.weapon("rapier").expect("rapier");
        assert!(!is_weapon_proficient(&wizard, rapier));
        wizard.proficiencies.weapons.push("Rapier".to_string());
        assert!(is_weapon_proficient(&wizard, rapier));
    }

    #[test]
    fn armor_tokens_cascade_by_weight() {
        let catalog = Catalog::builtin();
        let rogue = class(&catalog, "rogue");
        let ranger = class(&catalog, "ranger");
        let fighter = class(&catalog, "fighter");
        let wizard = class(&catalog, "wizard");
        let chain_shirt = catalog.armor("chain-shirt").expect("chain shirt");
        let breastplate = catalog.armor("breastplate").expect("breastplate");
        let full_plate = catalog.armor("full-plate").expect("full plate");
        let buckler = catalog.armor("buckler").expect("buckler");

        assert!(is_armor_proficient(&rogue, chain_shirt));
        assert!(!is_armor_proficient(&rogue, breastplate));
        assert!(is_armor_proficient(&ranger, breastplate));
        assert!(!is_armor_proficient(&ranger, full_plate));
        assert!(is_armor_proficient(&fighter, full_plate));
        assert!(is_armor_proficient(&fighter, buckler));
        assert!(!is_armor_proficient(&rogue, buckler));
        assert!(!is_armor_proficient(&wizard, chain_shirt));
    }

    #[test]
    fn item_dispatch_uses_the_right_list() {
        let catalog = Catalog::builtin();
        let wizard = class(&catalog, "wizard");
        let quarterstaff = catalog.item("quarterstaff").expect("quarterstaff");
        let padded = catalog.item("padded").expect("padded");
        assert!(is_proficient(&wizard, quarterstaff));
        assert!(!is_proficient(&wizard, padded));

        let fighter = class(&catalog, "fighter");
        assert!(is_proficient_any([&wizard, &fighter], padded));
    }
}
