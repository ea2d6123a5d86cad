use std::fmt::Write as _;

use charforge_core::core_api::{
    AbilityEntry, AllocationSummary, FeatEntry, ItemKind, ResolvedInventoryEntry, Session,
    SkillEntry, Snapshot,
};
use charforge_core::rules::combat::{DerivedStatsSnapshot, format_modifier};
use charforge_core::rules::equipment::Money;
use serde_json::{Map as JsonMap, Value as JsonValue};

const SHEET_WIDTH: usize = 76;
const TWO_COL_WIDTH_LEFT: usize = 38;
const TWO_COL_WIDTH_RIGHT: usize = 36;
const INVENTORY_COL_WIDTH_A: usize = 37;
const INVENTORY_COL_WIDTH_B: usize = 37;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    ClassicSheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// List every catalog skill instead of trained and class skills only.
    pub verbose: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: bool,
    pub race: bool,
    pub classes: bool,
    pub level: bool,
    pub abilities: bool,
    pub hp: bool,
    pub bab: bool,
    pub saves: bool,
    pub ac: bool,
    pub initiative: bool,
    pub attacks: bool,
    pub cmb: bool,
    pub cmd: bool,
    pub carry: bool,
    pub skills: bool,
    pub feats: bool,
    pub inventory: bool,
    pub allocation: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.name
            || self.race
            || self.classes
            || self.level
            || self.abilities
            || self.hp
            || self.bab
            || self.saves
            || self.ac
            || self.initiative
            || self.attacks
            || self.cmb
            || self.cmd
            || self.carry
            || self.skills
            || self.feats
            || self.inventory
            || self.allocation
    }
}

pub fn render_json_full(session: &Session, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(session)),
    }
}

pub fn render_json_selected(
    session: &Session,
    fields: &FieldSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(selected_json(fields, session)),
    }
}

pub fn render_classic_sheet(session: &Session) -> String {
    render_classic_sheet_impl(session, TextRenderOptions::default())
}

pub fn render_text(session: &Session, style: TextStyle) -> String {
    render_text_with_options(session, style, TextRenderOptions::default())
}

pub fn render_text_with_options(
    session: &Session,
    style: TextStyle,
    options: TextRenderOptions,
) -> String {
    match style {
        TextStyle::ClassicSheet => render_classic_sheet_impl(session, options),
    }
}

fn selected_json(fields: &FieldSelection, session: &Session) -> JsonMap<String, JsonValue> {
    let snapshot = session.snapshot();
    let stats = session.derived_stats();
    let mut out = JsonMap::new();

    if fields.name {
        out.insert("name".to_string(), JsonValue::String(snapshot.name.clone()));
    }
    if fields.race {
        out.insert("race".to_string(), race_to_json(&snapshot));
    }
    if fields.classes {
        out.insert("classes".to_string(), classes_to_json(&snapshot));
    }
    if fields.level {
        out.insert("level".to_string(), JsonValue::from(snapshot.level));
    }
    if fields.abilities {
        out.insert(
            "abilities".to_string(),
            abilities_to_json(&session.ability_entries()),
        );
    }
    if fields.hp {
        out.insert("max_hp".to_string(), JsonValue::from(stats.max_hit_points));
    }
    if fields.bab {
        out.insert(
            "base_attack_bonus".to_string(),
            JsonValue::from(stats.base_attack_bonus),
        );
    }
    if fields.saves {
        out.insert("saves".to_string(), saves_to_json(&stats));
    }
    if fields.ac {
        out.insert("armor_class".to_string(), armor_class_to_json(&stats));
    }
    if fields.initiative {
        out.insert("initiative".to_string(), JsonValue::from(stats.initiative));
    }
    if fields.attacks {
        out.insert("attacks".to_string(), attacks_to_json(&stats));
    }
    if fields.cmb {
        out.insert("cmb".to_string(), JsonValue::from(stats.cmb));
    }
    if fields.cmd {
        out.insert("cmd".to_string(), JsonValue::from(stats.cmd));
    }
    if fields.carry {
        out.insert("carrying_capacity".to_string(), carry_to_json(&stats));
    }
    if fields.skills {
        out.insert("skills".to_string(), skills_to_json(&session.skill_entries()));
    }
    if fields.feats {
        out.insert("feats".to_string(), feats_to_json(&session.feat_entries()));
    }
    if fields.inventory {
        out.insert("inventory".to_string(), inventory_to_json(&session.inventory()));
    }
    if fields.allocation {
        out.insert(
            "allocation".to_string(),
            allocation_to_json(&session.allocation()),
        );
    }

    out
}

fn default_json(session: &Session) -> JsonMap<String, JsonValue> {
    let snapshot = session.snapshot();
    let stats = session.derived_stats();
    let mut out = JsonMap::new();

    out.insert("name".to_string(), JsonValue::String(snapshot.name.clone()));
    out.insert("race".to_string(), race_to_json(&snapshot));
    out.insert("classes".to_string(), classes_to_json(&snapshot));
    out.insert("level".to_string(), JsonValue::from(snapshot.level));
    out.insert(
        "created_at".to_string(),
        optional_string(snapshot.created_at.as_deref()),
    );
    out.insert(
        "updated_at".to_string(),
        optional_string(snapshot.updated_at.as_deref()),
    );
    out.insert(
        "abilities".to_string(),
        abilities_to_json(&session.ability_entries()),
    );
    out.insert("max_hp".to_string(), JsonValue::from(stats.max_hit_points));
    out.insert(
        "base_attack_bonus".to_string(),
        JsonValue::from(stats.base_attack_bonus),
    );
    out.insert("saves".to_string(), saves_to_json(&stats));
    out.insert("armor_class".to_string(), armor_class_to_json(&stats));
    out.insert("initiative".to_string(), JsonValue::from(stats.initiative));
    out.insert("attacks".to_string(), attacks_to_json(&stats));
    out.insert("cmb".to_string(), JsonValue::from(stats.cmb));
    out.insert("cmd".to_string(), JsonValue::from(stats.cmd));
    out.insert("carrying_capacity".to_string(), carry_to_json(&stats));
    out.insert("skills".to_string(), skills_to_json(&session.skill_entries()));
    out.insert("feats".to_string(), feats_to_json(&session.feat_entries()));
    out.insert("inventory".to_string(), inventory_to_json(&session.inventory()));
    out.insert(
        "allocation".to_string(),
        allocation_to_json(&session.allocation()),
    );

    out
}

fn optional_string(value: Option<&str>) -> JsonValue {
    match value {
        Some(v) => JsonValue::String(v.to_string()),
        None => JsonValue::Null,
    }
}

fn race_to_json(snapshot: &Snapshot) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("id".to_string(), JsonValue::String(snapshot.race_id.clone()));
    m.insert("name".to_string(), optional_string(snapshot.race_name.as_deref()));
    m.insert("size".to_string(), optional_string(snapshot.size.as_deref()));
    m.insert(
        "speed".to_string(),
        snapshot.speed.map_or(JsonValue::Null, JsonValue::from),
    );
    JsonValue::Object(m)
}

fn classes_to_json(snapshot: &Snapshot) -> JsonValue {
    JsonValue::Array(
        snapshot
            .classes
            .iter()
            .map(|c| {
                let mut m = JsonMap::new();
                m.insert("id".to_string(), JsonValue::String(c.class_id.clone()));
                m.insert("name".to_string(), optional_string(c.name.as_deref()));
                m.insert("level".to_string(), JsonValue::from(c.level));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn abilities_to_json(entries: &[AbilityEntry]) -> JsonValue {
    JsonValue::Array(
        entries
            .iter()
            .map(|a| {
                let mut m = JsonMap::new();
                m.insert(
                    "ability".to_string(),
                    JsonValue::String(a.ability.abbreviation().to_ascii_lowercase()),
                );
                m.insert("base".to_string(), JsonValue::from(a.base));
                m.insert("racial".to_string(), JsonValue::from(a.racial));
                m.insert("total".to_string(), JsonValue::from(a.total));
                m.insert("modifier".to_string(), JsonValue::from(a.modifier));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn saves_to_json(stats: &DerivedStatsSnapshot) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("fortitude".to_string(), JsonValue::from(stats.saves.fortitude));
    m.insert("reflex".to_string(), JsonValue::from(stats.saves.reflex));
    m.insert("will".to_string(), JsonValue::from(stats.saves.will));
    JsonValue::Object(m)
}

fn armor_class_to_json(stats: &DerivedStatsSnapshot) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("total".to_string(), JsonValue::from(stats.armor_class.total));
    m.insert("touch".to_string(), JsonValue::from(stats.armor_class.touch));
    m.insert(
        "flat_footed".to_string(),
        JsonValue::from(stats.armor_class.flat_footed),
    );

    let parts = stats.armor_class.breakdown;
    let mut breakdown = JsonMap::new();
    breakdown.insert("base".to_string(), JsonValue::from(parts.base));
    breakdown.insert("armor".to_string(), JsonValue::from(parts.armor));
    breakdown.insert("shield".to_string(), JsonValue::from(parts.shield));
    breakdown.insert("dex".to_string(), JsonValue::from(parts.dex));
    breakdown.insert("natural".to_string(), JsonValue::from(parts.natural));
    breakdown.insert("deflection".to_string(), JsonValue::from(parts.deflection));
    breakdown.insert("misc".to_string(), JsonValue::from(parts.misc));
    m.insert("breakdown".to_string(), JsonValue::Object(breakdown));
    JsonValue::Object(m)
}

fn attacks_to_json(stats: &DerivedStatsSnapshot) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("melee".to_string(), JsonValue::from(stats.melee_attack));
    m.insert("ranged".to_string(), JsonValue::from(stats.ranged_attack));
    JsonValue::Object(m)
}

fn carry_to_json(stats: &DerivedStatsSnapshot) -> JsonValue {
    let carry = stats.carrying_capacity;
    let mut m = JsonMap::new();
    m.insert("light".to_string(), JsonValue::from(carry.light));
    m.insert("medium".to_string(), JsonValue::from(carry.medium));
    m.insert("heavy".to_string(), JsonValue::from(carry.heavy));
    m.insert("lift".to_string(), JsonValue::from(carry.lift));
    m.insert("drag".to_string(), JsonValue::from(carry.drag));
    JsonValue::Object(m)
}

fn skills_to_json(skills: &[SkillEntry]) -> JsonValue {
    JsonValue::Array(
        skills
            .iter()
            .map(|s| {
                let mut m = JsonMap::new();
                m.insert("id".to_string(), JsonValue::String(s.skill_id.clone()));
                m.insert("name".to_string(), JsonValue::String(s.name.clone()));
                m.insert("ranks".to_string(), JsonValue::from(s.ranks));
                m.insert("class_skill".to_string(), JsonValue::Bool(s.is_class_skill));
                m.insert("total".to_string(), JsonValue::from(s.total));
                m.insert("usable".to_string(), JsonValue::Bool(s.usable()));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn feats_to_json(feats: &[FeatEntry]) -> JsonValue {
    JsonValue::Array(
        feats
            .iter()
            .map(|f| {
                let mut m = JsonMap::new();
                m.insert("id".to_string(), JsonValue::String(f.feat_id.clone()));
                m.insert("name".to_string(), optional_string(f.name.as_deref()));
                m.insert(
                    "source".to_string(),
                    JsonValue::String(f.source_type.as_str().to_string()),
                );
                m.insert("source_level".to_string(), JsonValue::from(f.source_level));
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn inventory_to_json(items: &[ResolvedInventoryEntry]) -> JsonValue {
    JsonValue::Array(
        items
            .iter()
            .map(|item| {
                let mut m = JsonMap::new();
                m.insert("id".to_string(), JsonValue::String(item.item_id.clone()));
                m.insert("quantity".to_string(), JsonValue::from(item.quantity));
                m.insert("equipped".to_string(), JsonValue::Bool(item.equipped));
                if let Some(name) = &item.name {
                    m.insert("name".to_string(), JsonValue::String(name.clone()));
                }
                if let Some(kind) = item.kind {
                    m.insert(
                        "kind".to_string(),
                        JsonValue::String(item_kind_label(kind).to_string()),
                    );
                }
                if let Some(cost) = item.unit_cost {
                    m.insert("unit_cost".to_string(), JsonValue::from(cost));
                }
                if let Some(weight) = item.unit_weight {
                    m.insert("unit_weight".to_string(), JsonValue::from(weight));
                }
                if let Some(proficient) = item.proficient {
                    m.insert("proficient".to_string(), JsonValue::Bool(proficient));
                }
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn allocation_to_json(summary: &AllocationSummary) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "point_buy_budget".to_string(),
        JsonValue::from(summary.point_buy_budget),
    );
    m.insert(
        "point_buy_remaining".to_string(),
        JsonValue::from(summary.point_buy_remaining),
    );
    m.insert(
        "skill_points_budget".to_string(),
        JsonValue::from(summary.skill_points_budget),
    );
    m.insert(
        "skill_points_remaining".to_string(),
        JsonValue::from(summary.skill_points_remaining),
    );
    m.insert("feat_slots".to_string(), JsonValue::from(summary.feat_slots));
    m.insert(
        "feat_slots_remaining".to_string(),
        JsonValue::from(summary.feat_slots_remaining),
    );
    m.insert(
        "starting_gold".to_string(),
        JsonValue::from(summary.starting_gold),
    );
    m.insert("gold_spent".to_string(), JsonValue::from(summary.gold_spent));
    m.insert(
        "gold_remaining".to_string(),
        JsonValue::from(summary.gold_remaining),
    );
    m.insert(
        "total_weight".to_string(),
        JsonValue::from(summary.total_weight),
    );
    JsonValue::Object(m)
}

fn item_kind_label(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Weapon => "weapon",
        ItemKind::Armor => "armor",
    }
}

fn render_classic_sheet_impl(session: &Session, options: TextRenderOptions) -> String {
    let snapshot = session.snapshot();
    let stats = session.derived_stats();
    let abilities = session.ability_entries();

    let mut out = String::new();
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out, "{}", centered_no_trailing("CHARFORGE", SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{}",
        centered_no_trailing("CHARACTER RECORD", SHEET_WIDTH)
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let race_name = snapshot
        .race_name
        .clone()
        .unwrap_or_else(|| snapshot.race_id.clone());
    let name_section = format!("  Name: {:<24}", fit_column(&snapshot.name, 24));
    let race_section = format!("Race: {:<18}", fit_column(&race_name, 18));
    let speed = snapshot
        .speed
        .map_or_else(|| "?".to_string(), |v| v.to_string());
    writeln!(
        &mut out,
        "{}{}Speed: {} ft.",
        name_section, race_section, speed
    )
    .expect("writing to String cannot fail");

    let class_line = snapshot
        .classes
        .iter()
        .map(|c| format!("{} {}", c.name.as_deref().unwrap_or(&c.class_id), c.level))
        .collect::<Vec<_>>()
        .join(" / ");
    let class_section = format!(" Class: {:<24}", fit_column(&class_line, 24));
    let size = snapshot.size.as_deref().unwrap_or("?");
    writeln!(
        &mut out,
        " {}Size: {:<18}Level: {:02}",
        class_section, size, snapshot.level
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let middle: [(&str, String); 6] = [
        ("Hit Points", format!("{:03}", stats.max_hit_points)),
        ("Armor Class", format!("{:02}", stats.armor_class.total)),
        ("Touch AC", format!("{:02}", stats.armor_class.touch)),
        ("Flat-Footed", format!("{:02}", stats.armor_class.flat_footed)),
        ("Initiative", format_modifier(stats.initiative)),
        (
            "CMB/CMD",
            format!("{}/{:02}", format_modifier(stats.cmb), stats.cmd),
        ),
    ];
    let right: [(&str, String); 6] = [
        ("Base Attack", format_modifier(stats.base_attack_bonus)),
        ("Melee", format_modifier(stats.melee_attack)),
        ("Ranged", format_modifier(stats.ranged_attack)),
        ("Fortitude", format_modifier(stats.saves.fortitude)),
        ("Reflex", format_modifier(stats.saves.reflex)),
        ("Will", format_modifier(stats.saves.will)),
    ];

    for (row, entry) in abilities.iter().enumerate() {
        let label = entry.ability.name();
        let mut line = String::with_capacity(80);
        line.push_str(&" ".repeat(15usize.saturating_sub(label.len())));
        line.push_str(label);
        line.push_str(": ");
        line.push_str(&format!(
            "{:02} ({})",
            entry.total,
            format_modifier(entry.modifier)
        ));

        if let Some((mid_label, mid_val)) = middle.get(row) {
            let mid_start = 42 - mid_label.len();
            while line.len() < mid_start {
                line.push(' ');
            }
            line.push_str(mid_label);
            line.push_str(": ");
            line.push_str(mid_val);
        }
        if let Some((right_label, right_val)) = right.get(row) {
            let right_start = 66 - right_label.len();
            while line.len() < right_start {
                line.push(' ');
            }
            line.push_str(right_label);
            line.push_str(": ");
            line.push_str(right_val);
        }

        writeln!(&mut out, "{line}").expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");
    let carry = stats.carrying_capacity;
    writeln!(
        &mut out,
        "{:>66}",
        format!(
            "Carrying Capacity: {}/{}/{} lbs.  Lift: {}  Drag: {}",
            carry.light, carry.medium, carry.heavy, carry.lift, carry.drag
        )
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let skills: Vec<SkillEntry> = session
        .skill_entries()
        .into_iter()
        .filter(|s| options.verbose || s.ranks > 0 || s.is_class_skill)
        .collect();
    write_skills_feats_grid(&mut out, &skills, &session.feat_entries());
    writeln!(&mut out).expect("writing to String cannot fail");
    write_inventory_section(&mut out, &session.inventory(), &session.allocation());
    writeln!(&mut out).expect("writing to String cannot fail");

    out
}

fn write_skills_feats_grid(out: &mut String, skills: &[SkillEntry], feats: &[FeatEntry]) {
    writeln!(
        out,
        " ::: Skills :::                        ::: Feats :::"
    )
    .expect("writing to String cannot fail");

    let skill_lines: Vec<String> = if skills.is_empty() {
        vec!["none".to_string()]
    } else {
        skills
            .iter()
            .map(|entry| {
                let total = if entry.usable() {
                    format_modifier(entry.total)
                } else {
                    "--".to_string()
                };
                if entry.is_class_skill {
                    format!("{}: {} *", entry.name, total)
                } else {
                    format!("{}: {}", entry.name, total)
                }
            })
            .collect()
    };
    let feat_lines: Vec<String> = if feats.is_empty() {
        vec!["none".to_string()]
    } else {
        feats
            .iter()
            .map(|entry| {
                let name = entry.name.as_deref().unwrap_or(&entry.feat_id);
                format!("{} ({})", name, entry.source_type.as_str())
            })
            .collect()
    };

    let row_count = skill_lines.len().max(feat_lines.len());
    for row in 0..row_count {
        let left = skill_lines.get(row).map(String::as_str).unwrap_or("");
        let right = feat_lines.get(row).map(String::as_str).unwrap_or("");
        let line = format!(
            " {:<a$}{:<b$}",
            fit_column(left, TWO_COL_WIDTH_LEFT),
            fit_column(right, TWO_COL_WIDTH_RIGHT),
            a = TWO_COL_WIDTH_LEFT,
            b = TWO_COL_WIDTH_RIGHT
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
}

fn write_inventory_section(
    out: &mut String,
    inventory: &[ResolvedInventoryEntry],
    allocation: &AllocationSummary,
) {
    writeln!(out, " ::: Inventory :::").expect("writing to String cannot fail");
    writeln!(out).expect("writing to String cannot fail");

    writeln!(
        out,
        "{:>52}",
        format!(
            "Gold: {}/{} gp",
            Money::from_gp(allocation.gold_remaining),
            Money::from_gp(allocation.starting_gold)
        )
    )
    .expect("writing to String cannot fail");
    writeln!(
        out,
        "{:>52}",
        format!("Total Weight: {} lbs.", allocation.total_weight)
    )
    .expect("writing to String cannot fail");
    writeln!(out).expect("writing to String cannot fail");

    let rows: Vec<String> = inventory
        .iter()
        .map(|entry| {
            let name = entry.name.as_deref().unwrap_or(&entry.item_id);
            let mut row = format!("{}x {}", entry.quantity, name);
            if entry.equipped {
                row.push_str(" [E]");
            }
            if entry.proficient == Some(false) {
                row.push_str(" (!)");
            }
            row
        })
        .collect();
    if rows.is_empty() {
        writeln!(out, "  none").expect("writing to String cannot fail");
        return;
    }

    for chunk in rows.chunks(2) {
        let col1 = chunk.first().map(String::as_str).unwrap_or("");
        let col2 = chunk.get(1).map(String::as_str).unwrap_or("");
        let line = format!(
            "  {:<a$}{:<b$}",
            fit_column(col1, INVENTORY_COL_WIDTH_A),
            fit_column(col2, INVENTORY_COL_WIDTH_B),
            a = INVENTORY_COL_WIDTH_A,
            b = INVENTORY_COL_WIDTH_B
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn centered_no_trailing(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }

    let left_padding = (width - len) / 2;
    format!("{}{}", " ".repeat(left_padding), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_column_truncates_with_ellipsis() {
        assert_eq!(fit_column("Knowledge (Engineering)", 12), "Knowledge...");
        assert_eq!(fit_column("Climb", 12), "Climb");
        assert_eq!(fit_column("Climb", 2), "Cl");
    }

    #[test]
    fn centered_no_trailing_pads_left_only() {
        assert_eq!(centered_no_trailing("ab", 6), "  ab");
        assert_eq!(centered_no_trailing("abcdef", 4), "abcdef");
    }

    #[test]
    fn empty_selection_selects_nothing() {
        assert!(!FieldSelection::default().is_any_selected());
        let fields = FieldSelection {
            cmd: true,
            ..FieldSelection::default()
        };
        assert!(fields.is_any_selected());
    }
}
