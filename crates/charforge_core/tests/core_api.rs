use std::fs;
use std::path::PathBuf;

use charforge_core::catalog::Catalog;
use charforge_core::character::{Character, CharacterDraft, CharacterStore, FeatSource};
use charforge_core::config::RulesConfig;
use charforge_core::core_api::{CoreErrorCode, Engine, ItemKind};
use charforge_core::rules::abilities::{Ability, AbilityScores};
use charforge_core::rules::combat::ArmorClassInputs;
use charforge_core::rules::feats::FeatToggle;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture(name: &str) -> PathBuf {
    workspace_root().join("tests/fixtures").join(name)
}

fn read_fixture(name: &str) -> Vec<u8> {
    let path = fixture(name);
    fs::read(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e))
}

fn frontier_engine(config: RulesConfig) -> Engine {
    let catalog = Catalog::load(&fixture("frontier_catalog.json")).expect("frontier catalog");
    Engine::new(catalog, config)
}

#[test]
fn opens_first_level_fighter_fixture() {
    let engine = Engine::with_builtin_catalog();
    let session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");

    let snapshot = session.snapshot();
    assert_eq!(snapshot.name, "Valeros");
    assert_eq!(snapshot.race_name.as_deref(), Some("Human"));
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.classes[0].name.as_deref(), Some("Fighter"));
    assert_eq!(snapshot.created_at.as_deref(), Some("2024-03-02T18:40:00Z"));

    let stats = session.derived_stats();
    assert_eq!(stats.ability_scores.str, 18);
    assert_eq!(stats.ability_modifiers.str, 4);
    assert_eq!(stats.base_attack_bonus, 1);
    assert_eq!(
        (stats.saves.fortitude, stats.saves.reflex, stats.saves.will),
        (4, 2, 1)
    );
    assert_eq!(stats.armor_class.total, 12);
    assert_eq!(stats.armor_class.flat_footed, 10);
    assert_eq!(stats.initiative, 2);
    assert_eq!(stats.melee_attack, 5);
    assert_eq!(stats.ranged_attack, 3);
    assert_eq!(stats.cmb, 5);
    assert_eq!(stats.cmd, 17);
    assert_eq!(stats.max_hit_points, 12);
    assert_eq!(stats.carrying_capacity.heavy, 540);
}

#[test]
fn armor_inputs_are_caller_supplied() {
    let engine = Engine::with_builtin_catalog();
    let session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");

    // Equipped chain shirt is not folded in automatically.
    assert_eq!(session.derived_stats().armor_class.breakdown.armor, 0);

    let stats = session.derived_stats_with_armor(ArmorClassInputs {
        armor: 4,
        shield: 2,
        ..ArmorClassInputs::default()
    });
    assert_eq!(stats.armor_class.total, 18);
    assert_eq!(stats.armor_class.touch, 12);
    assert_eq!(stats.armor_class.flat_footed, 16);
}

#[test]
fn allocation_summary_reports_every_budget() {
    let engine = Engine::with_builtin_catalog();
    let session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");

    let alloc = session.allocation();
    assert_eq!(alloc.point_buy_budget, 25);
    assert_eq!(alloc.point_buy_remaining, 5);
    assert_eq!(alloc.skill_points_budget, 2);
    assert_eq!(alloc.skill_points_remaining, 0);
    assert_eq!(alloc.feat_slots, 2);
    assert_eq!(alloc.feat_slots_remaining, 0);
    assert_eq!(alloc.starting_gold, 175.0);
    assert_eq!(alloc.gold_spent, 122.0);
    assert_eq!(alloc.gold_remaining, 53.0);
    assert_eq!(alloc.total_weight, 39.0);
}

#[test]
fn skill_entries_cover_whole_catalog() {
    let engine = Engine::with_builtin_catalog();
    let session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");

    let skills = session.skill_entries();
    assert_eq!(skills.len(), engine.catalog().skills().count());

    let climb = skills.iter().find(|s| s.skill_id == "climb").expect("climb");
    assert_eq!((climb.ranks, climb.total), (1, 8));
    assert_eq!(climb.breakdown.class_skill_bonus, 3);

    let intimidate = skills
        .iter()
        .find(|s| s.skill_id == "intimidate")
        .expect("intimidate");
    assert_eq!(intimidate.total, 3);

    // Class skill with no ranks: no +3.
    let swim = skills.iter().find(|s| s.skill_id == "swim").expect("swim");
    assert!(swim.is_class_skill);
    assert_eq!(swim.total, 4);

    let arcana = skills
        .iter()
        .find(|s| s.skill_id == "knowledge-arcana")
        .expect("arcana");
    assert!(!arcana.usable());
}

#[test]
fn inventory_resolves_names_and_proficiency() {
    let engine = Engine::with_builtin_catalog();
    let session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");

    let inventory = session.inventory();
    assert_eq!(inventory.len(), 3);
    assert_eq!(inventory[0].name.as_deref(), Some("Longsword"));
    assert_eq!(inventory[0].kind, Some(ItemKind::Weapon));
    assert!(inventory[0].equipped);
    assert_eq!(inventory[1].kind, Some(ItemKind::Armor));
    assert!(inventory.iter().all(|entry| entry.proficient == Some(true)));
}

#[test]
fn rejected_edits_leave_character_unchanged() {
    let engine = Engine::with_builtin_catalog();
    let mut session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");
    let before = session.character().clone();

    let err = session.train_skill("swim").expect_err("no skill points left");
    assert_eq!(err.code, CoreErrorCode::Rejected);
    let err = session.toggle_feat("toughness").expect_err("no feat slots left");
    assert_eq!(err.code, CoreErrorCode::Rejected);
    let err = session.sell_item("bag-of-holding").expect_err("unknown item");
    assert_eq!(err.code, CoreErrorCode::UnknownCatalogId);
    let err = session
        .train_skill("underwater-basket-weaving")
        .expect_err("unknown skill");
    assert_eq!(err.code, CoreErrorCode::UnknownCatalogId);

    assert_eq!(session.decrease_ability(Ability::Cha).expect("8 -> 7"), 7);
    assert_eq!(session.increase_ability(Ability::Cha).expect("7 -> 8"), 8);

    assert_eq!(session.character(), &before);
}

#[test]
fn point_buy_edits_respect_marginal_cost() {
    let engine = Engine::with_builtin_catalog();
    let mut session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");

    // 5 points left: 16 -> 17 costs 3, 17 -> 18 would cost 4 more.
    assert_eq!(session.increase_ability(Ability::Str).expect("to 17"), 17);
    assert_eq!(session.allocation().point_buy_remaining, 2);
    let err = session
        .increase_ability(Ability::Str)
        .expect_err("17 -> 18 needs 4");
    assert_eq!(err.code, CoreErrorCode::Rejected);
    assert_eq!(session.character().ability_scores.str, 17);
    assert_eq!(session.derived_stats().ability_scores.str, 19);
}

#[test]
fn feat_toggle_removes_then_reselects() {
    let engine = Engine::with_builtin_catalog();
    let mut session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");

    assert_eq!(session.toggle_feat("cleave").expect("remove"), FeatToggle::Removed);
    assert_eq!(session.allocation().feat_slots_remaining, 1);

    let options = session.feat_options();
    let great_cleave = options
        .iter()
        .find(|o| o.feat_id == "great-cleave")
        .expect("great cleave");
    assert!(!great_cleave.selectable);
    assert!(great_cleave.unmet.iter().any(|u| u.contains("base attack bonus")));
    let toughness = options
        .iter()
        .find(|o| o.feat_id == "toughness")
        .expect("toughness");
    assert!(toughness.selectable);

    assert_eq!(session.toggle_feat("toughness").expect("add"), FeatToggle::Added);
    let added = session
        .character()
        .feats
        .iter()
        .find(|f| f.feat_id == "toughness")
        .expect("toughness selected");
    assert_eq!(added.source_type, FeatSource::Level);
    assert_eq!(session.feat_entries().len(), 2);
}

#[test]
fn buying_and_selling_tracks_gold() {
    let engine = Engine::with_builtin_catalog();
    let mut session = engine
        .open_bytes(read_fixture("valeros.json"))
        .expect("failed to open valeros");

    assert!(session.buy_item("dagger").expect("2 gp"));
    assert_eq!(session.character().currency.gp, 51.0);
    assert!(!session.buy_item("full-plate").expect("1500 gp is unaffordable"));
    assert_eq!(session.allocation().gold_remaining, 51.0);

    assert!(session.sell_item("heavy-wooden-shield").expect("owned"));
    assert!(!session.sell_item("heavy-wooden-shield").expect("no longer owned"));
    assert_eq!(session.character().currency.gp, 58.0);
    assert_eq!(session.inventory().len(), 3);

    session.set_equipped("dagger", true).expect("owned dagger");
    let err = session
        .set_equipped("heavy-wooden-shield", true)
        .expect_err("sold");
    assert_eq!(err.code, CoreErrorCode::Rejected);
}

#[test]
fn untrained_rogue_has_points_to_spend() {
    let engine = Engine::with_builtin_catalog();
    let mut session = engine
        .open_bytes(read_fixture("merisiel.json"))
        .expect("failed to open merisiel");

    let stats = session.derived_stats();
    assert_eq!(stats.base_attack_bonus, 0);
    assert_eq!(
        (stats.saves.fortitude, stats.saves.reflex, stats.saves.will),
        (-1, 6, 0)
    );
    assert_eq!(stats.max_hit_points, 7);
    assert_eq!(session.character().classes[0].hit_points, vec![8]);

    let alloc = session.allocation();
    assert_eq!(alloc.skill_points_budget, 10);
    assert_eq!(alloc.feat_slots, 1);
    assert_eq!(alloc.starting_gold, 140.0);

    assert_eq!(session.train_skill("stealth").expect("stealth"), 1);
    let err = session.train_skill("stealth").expect_err("level-1 rank cap");
    assert_eq!(err.code, CoreErrorCode::Rejected);
    assert!(session.character().skills[0].is_class_skill);
    assert_eq!(session.untrain_skill("stealth").expect("back to zero"), 0);
    assert!(session.character().skills.is_empty());
}

#[test]
fn missing_arrays_are_validation_errors() {
    let engine = Engine::with_builtin_catalog();
    let err = engine
        .open_bytes(read_fixture("missing_feats.json"))
        .expect_err("feats array is required");
    assert_eq!(err.code, CoreErrorCode::Validation);
    assert!(err.message.contains("feats"));
}

#[test]
fn custom_catalog_and_config_fixtures() {
    let config = RulesConfig::load(&fixture("rules.toml")).expect("rules.toml");
    assert_eq!(config.point_buy_budget, 20);

    let engine = frontier_engine(config);
    let session = engine
        .open_bytes(read_fixture("frontier_warden.json"))
        .expect("failed to open warden");

    let stats = session.derived_stats();
    assert_eq!(stats.ability_scores.con, 16);
    assert_eq!(stats.max_hit_points, 13);
    assert_eq!(stats.saves.reflex, 3);

    let alloc = session.allocation();
    assert_eq!(alloc.point_buy_remaining, 6);
    assert_eq!(alloc.starting_gold, 100.0);
    assert_eq!(alloc.gold_remaining, 88.0);
    assert_eq!(alloc.skill_points_remaining, 3);

    let trailblazer = session
        .feat_options()
        .into_iter()
        .find(|o| o.feat_id == "trailblazer")
        .expect("trailblazer");
    assert!(trailblazer.unmet.is_empty());
    assert!(!trailblazer.selectable, "the only slot is taken");
}

#[test]
fn catalog_tokens_match_ids_case_insensitively() {
    let engine = frontier_engine(RulesConfig::default());
    let draft = CharacterDraft::new()
        .name("Old Moss")
        .race("human")
        .racial_bonus(Ability::Int)
        .class("hedge-mage", 1)
        .ability_scores(AbilityScores::default().with(Ability::Int, 15))
        .item("dagger", 1)
        .item("hand-axe", 1);
    let session = engine.open_draft(draft).expect("hedge mage");

    let inventory = session.inventory();
    assert_eq!(inventory[0].proficient, Some(true));
    assert_eq!(inventory[1].proficient, Some(false));
    assert_eq!(session.allocation().starting_gold, 40.0);
}

#[test]
fn session_persists_through_store() {
    struct MemoryStore(Vec<Character>);

    impl CharacterStore for MemoryStore {
        fn persist(
            &mut self,
            character: &Character,
        ) -> Result<(), charforge_core::core_api::CoreError> {
            self.0.push(character.clone());
            Ok(())
        }
    }

    let engine = Engine::with_builtin_catalog();
    let mut session = engine
        .open_bytes(read_fixture("merisiel.json"))
        .expect("failed to open merisiel");
    session.toggle_feat("weapon-finesse").expect("finesse");

    let mut store = MemoryStore(Vec::new());
    session.persist(&mut store).expect("persist");
    assert_eq!(store.0.len(), 1);
    assert!(store.0[0].has_feat("weapon-finesse"));

    let bytes = session.to_json_bytes().expect("serialize");
    let reopened = engine.open_bytes(bytes).expect("reopen");
    assert_eq!(reopened.character(), session.character());
}
