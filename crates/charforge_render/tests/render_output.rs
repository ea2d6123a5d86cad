use std::path::PathBuf;

use charforge_core::core_api::{Engine, Session};
use charforge_core::rules::equipment::Money;
use charforge_render::{
    FieldSelection, JsonStyle, TextRenderOptions, TextStyle, render_classic_sheet,
    render_json_full, render_json_selected, render_text_with_options,
};
use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_path(name: &str) -> PathBuf {
    workspace_root().join("tests/fixtures").join(name)
}

fn session_from_fixture(name: &str) -> Session {
    let bytes = std::fs::read(fixture_path(name)).expect("fixture should be readable");
    Engine::with_builtin_catalog()
        .open_bytes(bytes)
        .expect("fixture should open")
}

fn object_keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn full_json_uses_canonical_top_level_order() {
    let session = session_from_fixture("valeros.json");
    let value = render_json_full(&session, JsonStyle::CanonicalV1);

    assert_eq!(
        object_keys(&value),
        vec![
            "name",
            "race",
            "classes",
            "level",
            "created_at",
            "updated_at",
            "abilities",
            "max_hp",
            "base_attack_bonus",
            "saves",
            "armor_class",
            "initiative",
            "attacks",
            "cmb",
            "cmd",
            "carrying_capacity",
            "skills",
            "feats",
            "inventory",
            "allocation",
        ]
    );
}

#[test]
fn full_json_carries_derived_figures() {
    let session = session_from_fixture("valeros.json");
    let value = render_json_full(&session, JsonStyle::CanonicalV1);

    assert_eq!(value["name"], "Valeros");
    assert_eq!(value["race"]["name"], "Human");
    assert_eq!(value["race"]["speed"], 30);
    assert_eq!(value["classes"][0]["id"], "fighter");
    assert_eq!(value["created_at"], "2024-03-02T18:40:00Z");
    assert_eq!(value["updated_at"], Value::Null);
    assert_eq!(value["abilities"][0]["ability"], "str");
    assert_eq!(value["abilities"][0]["racial"], 2);
    assert_eq!(value["abilities"][0]["total"], 18);
    assert_eq!(value["max_hp"], 12);
    assert_eq!(value["saves"]["fortitude"], 4);
    assert_eq!(value["armor_class"]["flat_footed"], 10);
    assert_eq!(value["attacks"]["melee"], 5);
    assert_eq!(value["cmd"], 17);
    assert_eq!(value["carrying_capacity"]["heavy"], 540);
    assert_eq!(value["allocation"]["gold_remaining"].as_f64(), Some(53.0));
    assert_eq!(value["allocation"]["feat_slots_remaining"], 0);
}

#[test]
fn json_exposes_full_carrying_capacity_and_ac_breakdown() {
    let session = session_from_fixture("valeros.json");
    let fields = FieldSelection {
        ac: true,
        carry: true,
        ..FieldSelection::default()
    };
    let value = render_json_selected(&session, &fields, JsonStyle::CanonicalV1);

    let carry = &value["carrying_capacity"];
    assert_eq!(
        object_keys(carry),
        vec!["light", "medium", "heavy", "lift", "drag"]
    );
    assert_eq!(carry["lift"], 1080);
    assert_eq!(carry["drag"], 5400);

    let breakdown = &value["armor_class"]["breakdown"];
    assert_eq!(
        object_keys(breakdown),
        vec!["base", "armor", "shield", "dex", "natural", "deflection", "misc"]
    );
    assert_eq!(breakdown["base"], 10);
    assert_eq!(breakdown["dex"], 2);
    for key in ["armor", "shield", "natural", "deflection", "misc"] {
        assert_eq!(breakdown[key], 0, "{key}");
    }
    assert_eq!(value["armor_class"]["total"], 12);
}

#[test]
fn selected_json_uses_canonical_subset_order() {
    let session = session_from_fixture("valeros.json");
    let fields = FieldSelection {
        allocation: true,
        saves: true,
        name: true,
        cmd: true,
        ..FieldSelection::default()
    };
    let value = render_json_selected(&session, &fields, JsonStyle::CanonicalV1);

    assert_eq!(object_keys(&value), vec!["name", "saves", "cmd", "allocation"]);
}

#[test]
fn inventory_json_includes_resolved_details() {
    let session = session_from_fixture("valeros.json");
    let fields = FieldSelection {
        inventory: true,
        ..FieldSelection::default()
    };
    let value = render_json_selected(&session, &fields, JsonStyle::CanonicalV1);
    let items = value["inventory"].as_array().expect("inventory array");

    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["id"], "longsword");
    assert_eq!(items[0]["name"], "Longsword");
    assert_eq!(items[0]["kind"], "weapon");
    assert_eq!(items[0]["equipped"], true);
    assert_eq!(items[0]["unit_cost"].as_f64(), Some(15.0));
    assert_eq!(items[0]["proficient"], true);
    assert_eq!(items[2]["kind"], "armor");
    assert_eq!(items[2]["equipped"], false);
}

#[test]
fn feats_json_reports_source() {
    let session = session_from_fixture("valeros.json");
    let fields = FieldSelection {
        feats: true,
        ..FieldSelection::default()
    };
    let value = render_json_selected(&session, &fields, JsonStyle::CanonicalV1);

    assert_eq!(value["feats"][0]["id"], "power-attack");
    assert_eq!(value["feats"][0]["source"], "level");
    assert_eq!(value["feats"][1]["name"], "Cleave");
    assert_eq!(value["feats"][1]["source"], "bonus");
}

#[test]
fn classic_sheet_shows_core_blocks() {
    let session = session_from_fixture("valeros.json");
    let sheet = render_classic_sheet(&session);

    assert!(sheet.contains("CHARACTER RECORD"));
    assert!(sheet.contains("Name: Valeros"));
    assert!(sheet.contains("Race: Human"));
    assert!(sheet.contains("Class: Fighter 1"));
    assert!(sheet.contains("Level: 01"));
    assert!(sheet.contains("Strength: 18 (+4)"));
    assert!(sheet.contains("Charisma: 08 (-1)"));
    assert!(sheet.contains("Hit Points: 012"));
    assert!(sheet.contains("Base Attack: +1"));
    assert!(sheet.contains("CMB/CMD: +5/17"));
    assert!(sheet.contains("Carrying Capacity: 180/360/540 lbs.  Lift: 1080  Drag: 5400"));
    assert!(sheet.contains("Climb: +8 *"));
    assert!(sheet.contains("Intimidate: +3 *"));
    assert!(sheet.contains("Power Attack (level)"));
    assert!(sheet.contains("Cleave (bonus)"));
    assert!(sheet.contains("Gold: 53/175 gp"));
    assert!(sheet.contains("Total Weight: 39 lbs."));
    assert!(sheet.contains("1x Longsword [E]"));
    assert!(sheet.contains("1x Heavy Wooden Shield"));
    assert!(!sheet.contains("Heavy Wooden Shield [E]"));
}

#[test]
fn classic_sheet_prints_fractional_gold_as_money() {
    let mut session = session_from_fixture("valeros.json");
    assert!(session.buy_item("dart").expect("dart is in the catalog"));
    let sheet = render_classic_sheet(&session);

    assert_eq!(Money::from_gp(52.5).to_string(), "52.5");
    assert!(sheet.contains(&format!(
        "Gold: {}/{} gp",
        Money::from_gp(52.5),
        Money::from_gp(175.0)
    )));
    assert!(sheet.contains("Total Weight: 39.5 lbs."));
}

#[test]
fn classic_sheet_hides_untrained_cross_class_skills_unless_verbose() {
    let session = session_from_fixture("valeros.json");
    let brief = render_classic_sheet(&session);
    let verbose = render_text_with_options(
        &session,
        TextStyle::ClassicSheet,
        TextRenderOptions { verbose: true },
    );

    assert!(!brief.contains("Appraise:"));
    assert!(verbose.contains("Appraise: +0"));
    assert!(verbose.contains("Disable Device: --"));
}

#[test]
fn classic_sheet_lines_have_no_trailing_whitespace() {
    let session = session_from_fixture("merisiel.json");
    let sheet = render_classic_sheet(&session);

    assert!(sheet.contains("Race: Elf"));
    assert!(sheet.contains("none"));
    for line in sheet.lines() {
        assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
    }
}
