//! Attribute duel resolution.
//!
//! A formula gives a raw score X, the event's sigmoid turns X into `prob`, and
//! one uniform roll decides the outcome. `prob` is one minus the sigmoid, i.e.
//! the probability the event FAILS: success means `roll > prob`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::formulas::{EventType, Opposition};
use crate::error::Result;
use crate::models::{Attribute, Player};

pub const DEFAULT_CRIT_MULT_1: f64 = 0.3;
pub const DEFAULT_CRIT_MULT_2: f64 = 0.7;

/// Quality tier of a roll, independent of pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum CritLevel {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "crit_1")]
    Crit1,
    #[serde(rename = "crit_2")]
    Crit2,
}

impl CritLevel {
    pub fn is_crit2(self) -> bool {
        self == CritLevel::Crit2
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalOptions {
    pub x_bonus: f64,
    pub crit_mult_1: f64,
    pub crit_mult_2: f64,
    /// Overrides the stamina term computed from the two players.
    pub stamina_modifier: Option<f64>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            x_bonus: 0.0,
            crit_mult_1: DEFAULT_CRIT_MULT_1,
            crit_mult_2: DEFAULT_CRIT_MULT_2,
            stamina_modifier: None,
        }
    }
}

impl EvalOptions {
    pub fn with_bonus(mut self, x_bonus: f64) -> Self {
        self.x_bonus = x_bonus;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub event: EventType,
    pub success: bool,
    /// Fail probability; see the module docs.
    pub prob: f64,
    /// X after bonus and stamina modifier.
    pub raw_score: f64,
    pub crit: CritLevel,
    pub skills_used: Vec<Attribute>,
}

fn weighted_sum(player: &Player, terms: &[(Attribute, f64)]) -> f64 {
    terms.iter().map(|(attr, w)| w * f64::from(player.attr(*attr))).sum()
}

/// Formula score before bonus and stamina.
pub fn formula_score(event: EventType, initiator: &Player, defender: &Player) -> f64 {
    let formula = event.formula();
    let attack = weighted_sum(initiator, formula.initiator);
    match formula.opposition {
        Opposition::Player(terms) => attack - weighted_sum(defender, terms),
        Opposition::Flat(bar) => attack - bar,
    }
}

/// `0.001 * (stamina_i * minutes_i - stamina_d * minutes_d)`.
pub fn stamina_modifier(initiator: &Player, defender: &Player) -> f64 {
    let load = |p: &Player| f64::from(p.attr(Attribute::Stamina)) * f64::from(p.minutes_played);
    0.001 * (load(initiator) - load(defender))
}

pub fn crit_level(prob: f64, roll: f64, crit_mult_1: f64, crit_mult_2: f64) -> CritLevel {
    let crit1 = prob + crit_mult_1 * (1.0 - prob);
    let crit2 = prob + crit_mult_2 * (1.0 - prob);
    if roll > crit2 {
        CritLevel::Crit2
    } else if roll > crit1 {
        CritLevel::Crit1
    } else {
        CritLevel::None
    }
}

pub fn evaluate<R: Rng + ?Sized>(
    rng: &mut R,
    event: EventType,
    initiator: &Player,
    defender: &Player,
    opts: EvalOptions,
) -> Evaluation {
    let stamina = opts.stamina_modifier.unwrap_or_else(|| stamina_modifier(initiator, defender));
    let raw_score = formula_score(event, initiator, defender) + opts.x_bonus + stamina;
    let prob = 1.0 - event.sigmoid().eval(raw_score);

    let roll: f64 = rng.gen();
    Evaluation {
        event,
        success: roll > prob,
        prob,
        raw_score,
        crit: crit_level(prob, roll, opts.crit_mult_1, opts.crit_mult_2),
        skills_used: event.skills_used(),
    }
}

/// String-keyed entry point for callers holding legacy event names.
pub fn evaluate_named<R: Rng + ?Sized>(
    rng: &mut R,
    event: &str,
    initiator: &Player,
    defender: &Player,
    opts: EvalOptions,
) -> Result<Evaluation> {
    Ok(evaluate(rng, event.parse()?, initiator, defender, opts))
}
