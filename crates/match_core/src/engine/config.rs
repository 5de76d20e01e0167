//! Simulation tunables.
//!
//! Defaults reproduce the stock match engine. Partial YAML/JSON files are
//! accepted; omitted keys keep their default.

use serde::{Deserialize, Serialize};

use super::evaluation::{CritLevel, EvalOptions, DEFAULT_CRIT_MULT_1, DEFAULT_CRIT_MULT_2};
use super::formulas::ChanceType;
use crate::error::{MatchError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Minute flow ===
    /// Chance that a minute produces an attack (default: 0.5)
    pub event_chance: f64,
    /// Chance that the home side is the attacker (default: 0.5)
    pub home_attack_chance: f64,

    // === Counters ===
    /// Counter after a failed creation (default: 0.15)
    pub counter_after_creation_fail: f64,
    /// Counter after a failed finish (default: 0.20)
    pub counter_after_finish_fail: f64,
    /// Chance types a counter may use, drawn uniformly
    pub counter_chance_types: Vec<ChanceType>,

    // === Set pieces ===
    /// Penalty awarded after a successful creation (default: 0.01)
    pub penalty_during_creation: f64,
    /// Free kick awarded after a successful creation (default: 0.02)
    pub free_kick_during_creation: f64,
    /// Penalty awarded once the finisher is picked (default: 0.005)
    pub penalty_during_finish: f64,
    /// Free kick awarded once the finisher is picked (default: 0.015)
    pub free_kick_during_finish: f64,
    /// Corner after a saved shot (default: 0.3)
    pub corner_after_save: f64,
    /// Aerial pool size on each side of a corner (default: 5)
    pub corner_pool_size: usize,

    // === Criticals ===
    pub crit_mult_1: f64,
    pub crit_mult_2: f64,
    /// Finish bonus after a Crit2 creation or delivery (default: 1.0)
    pub creation_crit_bonus: f64,
    /// Shot bonus after a Crit2 finish (default: 1.0)
    pub shot_bonus_crit2: f64,
    /// Shot bonus after a Crit1 finish (default: 0.5)
    pub shot_bonus_crit1: f64,

    // === Selection ===
    /// Redraws before a finisher or finish-defender fallback (default: 10)
    pub selection_retries: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            event_chance: 0.5,
            home_attack_chance: 0.5,

            counter_after_creation_fail: 0.15,
            counter_after_finish_fail: 0.20,
            counter_chance_types: vec![ChanceType::Through, ChanceType::Long, ChanceType::Solo],

            penalty_during_creation: 0.01,
            free_kick_during_creation: 0.02,
            penalty_during_finish: 0.005,
            free_kick_during_finish: 0.015,
            corner_after_save: 0.3,
            corner_pool_size: 5,

            crit_mult_1: DEFAULT_CRIT_MULT_1,
            crit_mult_2: DEFAULT_CRIT_MULT_2,
            creation_crit_bonus: 1.0,
            shot_bonus_crit2: 1.0,
            shot_bonus_crit1: 0.5,

            selection_retries: 10,
        }
    }
}

impl SimConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("event_chance", self.event_chance),
            ("home_attack_chance", self.home_attack_chance),
            ("counter_after_creation_fail", self.counter_after_creation_fail),
            ("counter_after_finish_fail", self.counter_after_finish_fail),
            ("penalty_during_creation", self.penalty_during_creation),
            ("free_kick_during_creation", self.free_kick_during_creation),
            ("penalty_during_finish", self.penalty_during_finish),
            ("free_kick_during_finish", self.free_kick_during_finish),
            ("corner_after_save", self.corner_after_save),
            ("crit_mult_1", self.crit_mult_1),
            ("crit_mult_2", self.crit_mult_2),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(MatchError::InvalidConfig(format!("{name} = {value} is outside [0, 1]")));
            }
        }
        if self.crit_mult_1 > self.crit_mult_2 {
            return Err(MatchError::InvalidConfig(format!(
                "crit_mult_1 ({}) must not exceed crit_mult_2 ({})",
                self.crit_mult_1, self.crit_mult_2
            )));
        }
        if self.counter_chance_types.is_empty() {
            return Err(MatchError::InvalidConfig("counter_chance_types is empty".into()));
        }
        if self.corner_pool_size == 0 {
            return Err(MatchError::InvalidConfig("corner_pool_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Evaluation options carrying this config's crit multipliers.
    pub fn eval(&self) -> EvalOptions {
        EvalOptions { crit_mult_1: self.crit_mult_1, crit_mult_2: self.crit_mult_2, ..EvalOptions::default() }
    }

    /// Bonus a Crit2 creation hands to the following finish.
    pub fn creation_bonus(&self, crit: CritLevel) -> f64 {
        if crit.is_crit2() {
            self.creation_crit_bonus
        } else {
            0.0
        }
    }

    /// Bonus the finish duel hands to the shot.
    pub fn shot_bonus(&self, crit: CritLevel) -> f64 {
        match crit {
            CritLevel::Crit2 => self.shot_bonus_crit2,
            CritLevel::Crit1 => self.shot_bonus_crit1,
            CritLevel::None => 0.0,
        }
    }
}
