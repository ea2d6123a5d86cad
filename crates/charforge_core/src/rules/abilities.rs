use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};

pub const MIN_BASE_SCORE: i32 = 7;
pub const MAX_BASE_SCORE: i32 = 18;
pub const DEFAULT_SCORE: i32 = 10;
pub const DEFAULT_POINT_BUY_BUDGET: i32 = 25;

// Indexed by score - MIN_BASE_SCORE. Not a formula; the table is authoritative.
const POINT_COST_TABLE: [i32; 12] = [-4, -2, -1, 0, 1, 2, 3, 5, 7, 10, 13, 17];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Str => "Strength",
            Self::Dex => "Dexterity",
            Self::Con => "Constitution",
            Self::Int => "Intelligence",
            Self::Wis => "Wisdom",
            Self::Cha => "Charisma",
        }
    }

    /// Accepts either the three-letter abbreviation or the full name, in any case.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ability| {
            value.eq_ignore_ascii_case(ability.abbreviation())
                || value.eq_ignore_ascii_case(ability.name())
        })
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Racial (or other flat) adjustments keyed by ability. Absent keys are zero.
pub type AbilityAdjustments = BTreeMap<Ability, i32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbilityScores {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(DEFAULT_SCORE)
    }
}

impl AbilityScores {
    pub const fn uniform(value: i32) -> Self {
        Self {
            str: value,
            dex: value,
            con: value,
            int: value,
            wis: value,
            cha: value,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        let slot = match ability {
            Ability::Str => &mut self.str,
            Ability::Dex => &mut self.dex,
            Ability::Con => &mut self.con,
            Ability::Int => &mut self.int,
            Ability::Wis => &mut self.wis,
            Ability::Cha => &mut self.cha,
        };
        *slot = value;
    }

    pub fn with(mut self, ability: Ability, value: i32) -> Self {
        self.set(ability, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL
            .into_iter()
            .map(move |ability| (ability, self.get(ability)))
    }

    /// Applies [`ability_modifier`] to every score.
    pub fn modifiers(&self) -> AbilityScores {
        let mut out = *self;
        for ability in Ability::ALL {
            out.set(ability, ability_modifier(self.get(ability)));
        }
        out
    }
}

fn table_cost(score: i32) -> Option<i32> {
    if !(MIN_BASE_SCORE..=MAX_BASE_SCORE).contains(&score) {
        return None;
    }
    Some(POINT_COST_TABLE[(score - MIN_BASE_SCORE) as usize])
}

pub fn point_cost(score: i32) -> Result<i32, CoreError> {
    table_cost(score).ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::OutOfRange,
            format!(
                "ability score {score} is outside the point-buy range {MIN_BASE_SCORE}-{MAX_BASE_SCORE}"
            ),
        )
    })
}

pub fn total_spent(scores: &AbilityScores) -> Result<i32, CoreError> {
    scores.iter().map(|(_, score)| point_cost(score)).sum()
}

/// May be negative; callers decide whether that blocks anything.
pub fn remaining(scores: &AbilityScores, budget: i32) -> Result<i32, CoreError> {
    Ok(budget - total_spent(scores)?)
}

pub fn can_increase(scores: &AbilityScores, ability: Ability, budget: i32) -> bool {
    let current = scores.get(ability);
    if current >= MAX_BASE_SCORE {
        return false;
    }
    let (Some(now), Some(next)) = (table_cost(current), table_cost(current + 1)) else {
        return false;
    };
    match remaining(scores, budget) {
        Ok(left) => next - now <= left,
        Err(_) => false,
    }
}

pub fn can_decrease(scores: &AbilityScores, ability: Ability) -> bool {
    scores.get(ability) > MIN_BASE_SCORE
}

/// `floor((score - 10) / 2)`, rounding toward negative infinity.
pub fn ability_modifier(final_score: i32) -> i32 {
    (final_score - 10).div_euclid(2)
}

/// No bounds are re-applied; racial bonuses may take a score past 18.
pub fn final_score(base: i32, racial_mod: i32) -> i32 {
    base + racial_mod
}

pub fn final_scores(base: &AbilityScores, adjustments: &AbilityAdjustments) -> AbilityScores {
    let mut out = *base;
    for ability in Ability::ALL {
        let racial = adjustments.get(&ability).copied().unwrap_or(0);
        out.set(ability, final_score(base.get(ability), racial));
    }
    out
}

/// Point-buy ledger over a set of base scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointBuy {
    scores: AbilityScores,
    budget: i32,
}

impl PointBuy {
    pub fn new(budget: i32) -> Self {
        Self {
            scores: AbilityScores::default(),
            budget,
        }
    }

    /// Fails with `OutOfRange` if any base score is outside 7-18. An
    /// overspent set is accepted and reports a negative remainder.
    pub fn from_scores(scores: AbilityScores, budget: i32) -> Result<Self, CoreError> {
        total_spent(&scores)?;
        Ok(Self { scores, budget })
    }

    pub fn scores(&self) -> &AbilityScores {
        &self.scores
    }

    pub fn budget(&self) -> i32 {
        self.budget
    }

    pub fn spent(&self) -> i32 {
        self.scores
            .iter()
            .filter_map(|(_, score)| table_cost(score))
            .sum()
    }

    pub fn remaining(&self) -> i32 {
        self.budget - self.spent()
    }

    pub fn can_increase(&self, ability: Ability) -> bool {
        can_increase(&self.scores, ability, self.budget)
    }

    pub fn can_decrease(&self, ability: Ability) -> bool {
        can_decrease(&self.scores, ability)
    }

    pub fn increase(&mut self, ability: Ability) -> Result<i32, CoreError> {
        if !self.can_increase(ability) {
            tracing::debug!(%ability, remaining = self.remaining(), "point-buy increase rejected");
            return Err(CoreError::rejected(format!(
                "cannot raise {} above {} with {} point(s) remaining",
                ability.name(),
                self.scores.get(ability),
                self.remaining()
            )));
        }
        let next = self.scores.get(ability) + 1;
        self.scores.set(ability, next);
        Ok(next)
    }

    pub fn decrease(&mut self, ability: Ability) -> Result<i32, CoreError> {
        if !self.can_decrease(ability) {
            return Err(CoreError::rejected(format!(
                "cannot lower {} below {MIN_BASE_SCORE}",
                ability.name()
            )));
        }
        let next = self.scores.get(ability) - 1;
        self.scores.set(ability, next);
        Ok(next)
    }

    pub fn into_scores(self) -> AbilityScores {
        self.scores
    }
}
