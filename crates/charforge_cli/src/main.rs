use std::fs;
use std::path::PathBuf;
use std::process;

use charforge_core::catalog::Catalog;
use charforge_core::character::JsonFileStore;
use charforge_core::config::{RulesConfig, parse_point_buy_budget};
use charforge_core::core_api::{Engine, Session};
use charforge_core::rules::abilities::Ability;
use charforge_core::rules::combat::format_modifier;
use charforge_core::rules::equipment::Money;
use charforge_render::{
    FieldSelection, JsonStyle, TextRenderOptions, TextStyle, render_json_full,
    render_json_selected, render_text_with_options,
};
use clap::Parser;
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "CHARACTER.json")]
    path: PathBuf,
    /// JSON catalog to use instead of the built-in reference catalog.
    #[arg(long, value_name = "CATALOG.json")]
    catalog: Option<PathBuf>,
    /// TOML rules config.
    #[arg(long, value_name = "RULES.toml")]
    config: Option<PathBuf>,
    /// Point-buy budget: a number or low|standard|high|epic.
    #[arg(long = "point-buy", value_name = "BUDGET", value_parser = parse_budget_arg)]
    point_buy: Option<i32>,
    #[arg(long)]
    name: bool,
    #[arg(long)]
    race: bool,
    #[arg(long)]
    classes: bool,
    #[arg(long)]
    level: bool,
    #[arg(long)]
    abilities: bool,
    #[arg(long)]
    hp: bool,
    #[arg(long)]
    bab: bool,
    #[arg(long)]
    saves: bool,
    #[arg(long)]
    ac: bool,
    #[arg(long)]
    initiative: bool,
    #[arg(long)]
    attacks: bool,
    #[arg(long)]
    cmb: bool,
    #[arg(long)]
    cmd: bool,
    #[arg(long)]
    carry: bool,
    #[arg(long)]
    skills: bool,
    #[arg(long)]
    feats: bool,
    #[arg(long)]
    inventory: bool,
    #[arg(long)]
    allocation: bool,
    /// List every catalog feat with its prerequisite status.
    #[arg(long = "feat-options")]
    feat_options: bool,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    verbose: bool,
    #[arg(long, value_name = "ABILITY", value_parser = parse_ability_arg)]
    increase: Vec<Ability>,
    #[arg(long, value_name = "ABILITY", value_parser = parse_ability_arg)]
    decrease: Vec<Ability>,
    #[arg(long, value_name = "SKILL")]
    train: Vec<String>,
    #[arg(long, value_name = "SKILL")]
    untrain: Vec<String>,
    #[arg(long = "toggle-feat", value_name = "FEAT")]
    toggle_feat: Vec<String>,
    #[arg(long, value_name = "ITEM")]
    buy: Vec<String>,
    #[arg(long, value_name = "ITEM")]
    sell: Vec<String>,
    #[arg(long, value_name = "ITEM")]
    equip: Vec<String>,
    #[arg(long, value_name = "ITEM")]
    unequip: Vec<String>,
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn field_selection(&self) -> FieldSelection {
        FieldSelection {
            name: self.name,
            race: self.race,
            classes: self.classes,
            level: self.level,
            abilities: self.abilities,
            hp: self.hp,
            bab: self.bab,
            saves: self.saves,
            ac: self.ac,
            initiative: self.initiative,
            attacks: self.attacks,
            cmb: self.cmb,
            cmd: self.cmd,
            carry: self.carry,
            skills: self.skills,
            feats: self.feats,
            inventory: self.inventory,
            allocation: self.allocation,
        }
    }

    fn has_edits(&self) -> bool {
        !self.increase.is_empty()
            || !self.decrease.is_empty()
            || !self.train.is_empty()
            || !self.untrain.is_empty()
            || !self.toggle_feat.is_empty()
            || !self.buy.is_empty()
            || !self.sell.is_empty()
            || !self.equip.is_empty()
            || !self.unequip.is_empty()
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let fields = cli.field_selection();
    let has_edits = cli.has_edits();
    if has_edits && cli.output.is_none() {
        eprintln!("edit flags require --output <PATH>");
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one edit flag");
        process::exit(2);
    }

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading catalog {}: {e}", path.display());
            process::exit(1);
        }),
        None => Catalog::builtin(),
    };
    let mut config = match &cli.config {
        Some(path) => RulesConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {e}", path.display());
            process::exit(1);
        }),
        None => RulesConfig::default(),
    };
    if let Some(budget) = cli.point_buy {
        config.point_buy_budget = budget;
    }

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let engine = Engine::new(catalog, config);
    let mut session = engine.open_bytes(bytes).unwrap_or_else(|e| {
        eprintln!("Error loading character: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    apply_edits(&cli, &mut session);

    if let Some(out_path) = &cli.output {
        let mut store = JsonFileStore::new(out_path);
        session.persist(&mut store).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        tracing::debug!(path = %out_path.display(), "character written");
    }

    if cli.feat_options {
        print_feat_options(&session, cli.json);
        return;
    }

    if cli.json {
        let json = if fields.is_any_selected() {
            render_json_selected(&session, &fields, JsonStyle::CanonicalV1)
        } else {
            render_json_full(&session, JsonStyle::CanonicalV1)
        };
        print_json(&json);
        return;
    }

    if fields.is_any_selected() {
        for (key, value) in selected_pairs(&fields, &session) {
            println!("{key}={value}");
        }
        return;
    }

    if let Some(out_path) = &cli.output {
        println!("Wrote edited character to {}", out_path.display());
        return;
    }

    let options = TextRenderOptions {
        verbose: cli.verbose,
    };
    print!(
        "{}",
        render_text_with_options(&session, TextStyle::ClassicSheet, options)
    );
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Applies edits in wizard order: abilities, skills, feats, then equipment.
fn apply_edits(cli: &Cli, session: &mut Session) {
    for &ability in &cli.increase {
        session.increase_ability(ability).unwrap_or_else(|e| {
            eprintln!("Error raising {ability}: {e}");
            process::exit(1);
        });
        tracing::debug!(%ability, "ability raised");
    }
    for &ability in &cli.decrease {
        session.decrease_ability(ability).unwrap_or_else(|e| {
            eprintln!("Error lowering {ability}: {e}");
            process::exit(1);
        });
        tracing::debug!(%ability, "ability lowered");
    }
    for skill_id in &cli.train {
        session.train_skill(skill_id).unwrap_or_else(|e| {
            eprintln!("Error training {skill_id}: {e}");
            process::exit(1);
        });
        tracing::debug!(skill = %skill_id, "skill trained");
    }
    for skill_id in &cli.untrain {
        session.untrain_skill(skill_id).unwrap_or_else(|e| {
            eprintln!("Error untraining {skill_id}: {e}");
            process::exit(1);
        });
        tracing::debug!(skill = %skill_id, "skill untrained");
    }
    for feat_id in &cli.toggle_feat {
        session.toggle_feat(feat_id).unwrap_or_else(|e| {
            eprintln!("Error toggling {feat_id}: {e}");
            process::exit(1);
        });
        tracing::debug!(feat = %feat_id, "feat toggled");
    }
    for item_id in &cli.sell {
        let sold = session.sell_item(item_id).unwrap_or_else(|e| {
            eprintln!("Error selling {item_id}: {e}");
            process::exit(1);
        });
        if !sold {
            eprintln!("Error selling {item_id}: not in inventory");
            process::exit(1);
        }
        tracing::debug!(item = %item_id, "item sold");
    }
    for item_id in &cli.buy {
        let bought = session.buy_item(item_id).unwrap_or_else(|e| {
            eprintln!("Error buying {item_id}: {e}");
            process::exit(1);
        });
        if !bought {
            eprintln!("Error buying {item_id}: not enough gold");
            process::exit(1);
        }
        tracing::debug!(item = %item_id, "item bought");
    }
    for (items, equipped) in [(&cli.equip, true), (&cli.unequip, false)] {
        for item_id in items {
            session.set_equipped(item_id, equipped).unwrap_or_else(|e| {
                eprintln!("Error equipping {item_id}: {e}");
                process::exit(1);
            });
            tracing::debug!(item = %item_id, equipped, "equipped state set");
        }
    }
}

fn selected_pairs(fields: &FieldSelection, session: &Session) -> Vec<(&'static str, String)> {
    let snapshot = session.snapshot();
    let stats = session.derived_stats();
    let mut out = Vec::new();

    if fields.name {
        out.push(("name", snapshot.name.clone()));
    }
    if fields.race {
        out.push((
            "race",
            snapshot
                .race_name
                .clone()
                .unwrap_or_else(|| snapshot.race_id.clone()),
        ));
    }
    if fields.classes {
        let classes = snapshot
            .classes
            .iter()
            .map(|c| format!("{} {}", c.name.as_deref().unwrap_or(&c.class_id), c.level))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(("classes", classes));
    }
    if fields.level {
        out.push(("level", snapshot.level.to_string()));
    }
    if fields.abilities {
        let abilities = session
            .ability_entries()
            .iter()
            .map(|a| format!("{} {} ({})", a.ability, a.total, format_modifier(a.modifier)))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(("abilities", abilities));
    }
    if fields.hp {
        out.push(("hp", stats.max_hit_points.to_string()));
    }
    if fields.bab {
        out.push(("bab", format_modifier(stats.base_attack_bonus)));
    }
    if fields.saves {
        out.push((
            "saves",
            format!(
                "fort {}, ref {}, will {}",
                format_modifier(stats.saves.fortitude),
                format_modifier(stats.saves.reflex),
                format_modifier(stats.saves.will)
            ),
        ));
    }
    if fields.ac {
        let ac = stats.armor_class;
        out.push((
            "ac",
            format!(
                "{} (touch {}, flat-footed {})",
                ac.total, ac.touch, ac.flat_footed
            ),
        ));
    }
    if fields.initiative {
        out.push(("initiative", format_modifier(stats.initiative)));
    }
    if fields.attacks {
        out.push((
            "attacks",
            format!(
                "melee {}, ranged {}",
                format_modifier(stats.melee_attack),
                format_modifier(stats.ranged_attack)
            ),
        ));
    }
    if fields.cmb {
        out.push(("cmb", format_modifier(stats.cmb)));
    }
    if fields.cmd {
        out.push(("cmd", stats.cmd.to_string()));
    }
    if fields.carry {
        let carry = stats.carrying_capacity;
        out.push((
            "carry",
            format!(
                "{}/{}/{} (lift {}, drag {})",
                carry.light, carry.medium, carry.heavy, carry.lift, carry.drag
            ),
        ));
    }
    if fields.skills {
        let skills = session
            .skill_entries()
            .iter()
            .filter(|s| s.ranks > 0)
            .map(|s| format!("{} {}", s.name, format_modifier(s.total)))
            .collect::<Vec<_>>();
        out.push(("skills", join_or_none(&skills)));
    }
    if fields.feats {
        let feats = session
            .feat_entries()
            .iter()
            .map(|f| f.name.clone().unwrap_or_else(|| f.feat_id.clone()))
            .collect::<Vec<_>>();
        out.push(("feats", join_or_none(&feats)));
    }
    if fields.inventory {
        let items = session
            .inventory()
            .iter()
            .map(|i| format!("{}x {}", i.quantity, i.name.as_deref().unwrap_or(&i.item_id)))
            .collect::<Vec<_>>();
        out.push(("inventory", join_or_none(&items)));
    }
    if fields.allocation {
        let a = session.allocation();
        out.push((
            "allocation",
            format!(
                "points {}/{}, skills {}/{}, feats {}/{}, gold {}/{}",
                a.point_buy_remaining,
                a.point_buy_budget,
                a.skill_points_remaining,
                a.skill_points_budget,
                a.feat_slots_remaining,
                a.feat_slots,
                Money::from_gp(a.gold_remaining),
                Money::from_gp(a.starting_gold)
            ),
        ));
    }

    out
}

fn print_feat_options(session: &Session, json: bool) {
    let options = session.feat_options();
    if json {
        let rows = options
            .iter()
            .map(|option| {
                let mut m = JsonMap::new();
                m.insert("id".to_string(), JsonValue::String(option.feat_id.clone()));
                m.insert("name".to_string(), JsonValue::String(option.name.clone()));
                m.insert("selected".to_string(), JsonValue::Bool(option.selected));
                m.insert("selectable".to_string(), JsonValue::Bool(option.selectable));
                m.insert(
                    "unmet".to_string(),
                    JsonValue::Array(
                        option
                            .unmet
                            .iter()
                            .map(|u| JsonValue::String(u.clone()))
                            .collect(),
                    ),
                );
                JsonValue::Object(m)
            })
            .collect();
        print_json(&JsonValue::Array(rows));
        return;
    }

    for option in options {
        let status = if option.selected {
            "selected".to_string()
        } else if !option.unmet.is_empty() {
            format!("unavailable: {}", option.unmet.join("; "))
        } else if option.selectable {
            "available".to_string()
        } else {
            "no slots".to_string()
        };
        println!("{}={status}", option.feat_id);
    }
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

fn parse_ability_arg(value: &str) -> Result<Ability, String> {
    Ability::parse(value).ok_or_else(|| format!("unknown ability '{value}'"))
}

fn parse_budget_arg(value: &str) -> Result<i32, String> {
    parse_point_buy_budget(value).map_err(|e| e.message)
}
