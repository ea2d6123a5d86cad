//! Shopping-cart ledger against a starting gold budget.
//!
//! Prices are held in copper pieces so that repeated purchases and refunds
//! never drift.

use std::fmt;

use crate::catalog::{Catalog, ClassDef, ItemRef};
use crate::character::CharacterEquipmentEntry;
use crate::core_api::CoreError;
use crate::rules::proficiency;

const COPPER_PER_GOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cp: i64,
}

impl Money {
    pub const ZERO: Money = Money { cp: 0 };

    pub const fn from_cp(cp: i64) -> Self {
        Self { cp }
    }

    /// Rounds to the nearest copper piece.
    pub fn from_gp(gp: f64) -> Self {
        Self {
            cp: (gp * COPPER_PER_GOLD).round() as i64,
        }
    }

    pub fn cp(self) -> i64 {
        self.cp
    }

    pub fn as_gp(self) -> f64 {
        self.cp as f64 / COPPER_PER_GOLD
    }

    pub fn is_negative(self) -> bool {
        self.cp < 0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::from_cp(self.cp + rhs.cp)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::from_cp(self.cp - rhs.cp)
    }
}

impl std::ops::Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money::from_cp(self.cp * i64::from(rhs))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    /// Gold with up to two decimals: `150`, `112.5`, `0.05`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cp < 0 { "-" } else { "" };
        let abs = self.cp.unsigned_abs();
        let (gold, rest) = (abs / 100, abs % 100);
        match rest {
            0 => write!(f, "{sign}{gold}"),
            r if r % 10 == 0 => write!(f, "{sign}{gold}.{}", r / 10),
            r => write!(f, "{sign}{gold}.{r:02}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentLedger {
    starting_gold: Money,
    entries: Vec<CharacterEquipmentEntry>,
}

impl EquipmentLedger {
    pub fn new(starting_gold: Money, entries: Vec<CharacterEquipmentEntry>) -> Self {
        Self {
            starting_gold,
            entries,
        }
    }

    pub fn starting_gold(&self) -> Money {
        self.starting_gold
    }

    pub fn entries(&self) -> &[CharacterEquipmentEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CharacterEquipmentEntry> {
        self.entries
    }

    pub fn quantity(&self, item_id: &str) -> u32 {
        self.entries
            .iter()
            .find(|entry| entry.item_id == item_id)
            .map_or(0, |entry| entry.quantity)
    }

    pub fn unit_cost(item: ItemRef<'_>) -> Money {
        Money::from_gp(item.cost())
    }

    /// Unresolvable entries count as free.
    pub fn total_cost(&self, catalog: &Catalog) -> Money {
        self.entries
            .iter()
            .map(|entry| match catalog.item(&entry.item_id) {
                Some(item) => Self::unit_cost(item) * entry.quantity,
                None => {
                    tracing::warn!(item_id = %entry.item_id, "unknown item priced at zero");
                    Money::ZERO
                }
            })
            .sum()
    }

    /// Same weight unit as the catalog.
    pub fn total_weight(&self, catalog: &Catalog) -> f64 {
        self.entries
            .iter()
            .filter_map(|entry| {
                catalog
                    .item(&entry.item_id)
                    .map(|item| item.weight() * f64::from(entry.quantity))
            })
            .sum()
    }

    /// Negative only if entries were added without an affordability check.
    pub fn remaining(&self, catalog: &Catalog) -> Money {
        self.starting_gold - self.total_cost(catalog)
    }

    pub fn remaining_gold(&self, catalog: &Catalog) -> f64 {
        self.remaining(catalog).as_gp()
    }

    pub fn can_afford(&self, item_id: &str, catalog: &Catalog) -> Result<bool, CoreError> {
        let item = catalog
            .item(item_id)
            .ok_or_else(|| CoreError::unknown_id("item", item_id))?;
        Ok(Self::unit_cost(item) <= self.remaining(catalog))
    }

    /// Buys one more. An unaffordable item leaves the cart unchanged and
    /// returns `Ok(false)`.
    pub fn add_item(&mut self, item_id: &str, catalog: &Catalog) -> Result<bool, CoreError> {
        if !self.can_afford(item_id, catalog)? {
            tracing::debug!(item_id, remaining = %self.remaining(catalog), "purchase skipped");
            return Ok(false);
        }
        match self.entries.iter_mut().find(|entry| entry.item_id == item_id) {
            Some(entry) => entry.quantity += 1,
            None => self.entries.push(CharacterEquipmentEntry {
                item_id: item_id.to_string(),
                quantity: 1,
                equipped: false,
            }),
        }
        Ok(true)
    }

    /// Returns one. Returns `false` if the item is not in the cart.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let Some(pos) = self.entries.iter().position(|entry| entry.item_id == item_id) else {
            return false;
        };
        let entry = &mut self.entries[pos];
        entry.quantity = entry.quantity.saturating_sub(1);
        if entry.quantity == 0 {
            self.entries.remove(pos);
        }
        true
    }

    pub fn set_equipped(&mut self, item_id: &str, equipped: bool) -> Result<(), CoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.item_id == item_id)
            .ok_or_else(|| CoreError::rejected(format!("'{item_id}' is not in the inventory")))?;
        entry.equipped = equipped;
        Ok(())
    }

    /// `None` when the item is not in the catalog.
    pub fn is_proficient(
        item_id: &str,
        catalog: &Catalog,
        classes: &[&ClassDef],
    ) -> Option<bool> {
        let item = catalog.item(item_id)?;
        Some(proficiency::is_proficient_any(classes.iter().copied(), item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogDocument, WeaponCategory, WeaponDef};
    use crate::core_api::CoreErrorCode;

    fn catalog_with_price(cost: f64) -> Catalog {
        Catalog::from_document(CatalogDocument {
            weapons: vec![WeaponDef {
                id: "masterwork-dagger".to_string(),
                name: "Masterwork Dagger".to_string(),
                category: WeaponCategory::Simple,
                cost,
                weight: 1.0,
                damage: "1d4".to_string(),
            }],
            ..CatalogDocument::default()
        })
        .expect("catalog")
    }

    #[test]
    fn ledger_tracks_cost_and_remaining_gold() {
        let catalog = catalog_with_price(12.5);
        let mut ledger = EquipmentLedger::new(Money::from_gp(150.0), Vec::new());
        for _ in 0..3 {
            assert!(ledger.add_item("masterwork-dagger", &catalog).expect("known item"));
        }
        assert_eq!(ledger.total_cost(&catalog).as_gp(), 37.5);
        assert_eq!(ledger.remaining_gold(&catalog), 112.5);
        assert_eq!(ledger.total_weight(&catalog), 3.0);

        assert!(ledger.remove_item("masterwork-dagger"));
        assert_eq!(ledger.remaining_gold(&catalog), 125.0);
        assert_eq!(ledger.quantity("masterwork-dagger"), 2);
    }

    #[test]
    fn unaffordable_purchase_is_a_no_op() {
        let catalog = Catalog::builtin();
        let mut ledger = EquipmentLedger::new(Money::from_gp(20.0), Vec::new());
        assert!(ledger.add_item("longsword", &catalog).expect("15 gp"));
        assert!(!ledger.can_afford("longsword", &catalog).expect("known"));
        assert!(!ledger.add_item("longsword", &catalog).expect("known"));
        assert_eq!(ledger.quantity("longsword"), 1);
        assert_eq!(ledger.remaining_gold(&catalog), 5.0);
    }

    #[test]
    fn unknown_items_fail_on_purchase() {
        let catalog = Catalog::builtin();
        let mut ledger = EquipmentLedger::new(Money::from_gp(150.0), Vec::new());
        let err = ledger
            .add_item("bag-of-holding", &catalog)
            .expect_err("unknown item");
        assert_eq!(err.code, CoreErrorCode::UnknownCatalogId);
    }

    #[test]
    fn removal_prunes_and_ignores_absent_items() {
        let catalog = Catalog::builtin();
        let mut ledger = EquipmentLedger::new(Money::from_gp(10.0), Vec::new());
        ledger.add_item("dagger", &catalog).expect("dagger");
        assert!(ledger.remove_item("dagger"));
        assert!(ledger.entries().is_empty());
        assert!(!ledger.remove_item("dagger"));
    }

    #[test]
    fn remaining_may_go_negative_through_unchecked_entries() {
        let catalog = Catalog::builtin();
        let ledger = EquipmentLedger::new(
            Money::from_gp(50.0),
            vec![CharacterEquipmentEntry {
                item_id: "chain-shirt".to_string(),
                quantity: 1,
                equipped: true,
            }],
        );
        assert!(ledger.remaining(&catalog).is_negative());
        assert_eq!(ledger.remaining_gold(&catalog), -50.0);
    }

    #[test]
    fn equipped_flag_requires_owned_item() {
        let catalog = Catalog::builtin();
        let mut ledger = EquipmentLedger::new(Money::from_gp(150.0), Vec::new());
        ledger.add_item("leather", &catalog).expect("leather");
        ledger.set_equipped("leather", true).expect("owned");
        assert!(ledger.entries()[0].equipped);
        let err = ledger.set_equipped("padded", true).expect_err("not owned");
        assert_eq!(err.code, CoreErrorCode::Rejected);
    }

    #[test]
    fn proficiency_is_advisory() {
        let catalog = Catalog::builtin();
        let wizard = catalog.class("wizard").expect("wizard");
        assert_eq!(
            EquipmentLedger::is_proficient("longsword", &catalog, &[wizard]),
            Some(false)
        );
        assert_eq!(
            EquipmentLedger::is_proficient("dagger", &catalog, &[wizard]),
            Some(true)
        );
        assert_eq!(EquipmentLedger::is_proficient("nope", &catalog, &[wizard]), None);

        let mut ledger = EquipmentLedger::new(Money::from_gp(150.0), Vec::new());
        assert!(ledger.add_item("longsword", &catalog).expect("buying is never blocked"));
    }

    #[test]
    fn money_display_trims_trailing_zeros() {
        assert_eq!(Money::from_gp(150.0).to_string(), "150");
        assert_eq!(Money::from_gp(112.5).to_string(), "112.5");
        assert_eq!(Money::from_gp(0.05).to_string(), "0.05");
        assert_eq!(Money::from_gp(-50.0).to_string(), "-50");
    }
}
