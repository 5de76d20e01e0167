//! Match event log.
//!
//! One variant per `(section, tag)` pair of the log grammar. `side` is always
//! the attacking side of the move the record belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::evaluation::Evaluation;
use super::formulas::{ChanceType, FinishType};
use crate::models::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterTrigger {
    AfterCreationFail,
    AfterFinisherFail,
}

/// Checkpoint at which a set piece was awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPiecePhase {
    DuringCreation,
    DuringFinish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub minute: u16,
    #[serde(flatten)]
    pub event: MatchEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchEvent {
    // === result ===
    Creation {
        side: Side,
        creator: String,
        defender: String,
        chance: ChanceType,
        /// The creation reached Crit2.
        critical: bool,
        /// Part of a counter-attack.
        counter: bool,
        eval: Evaluation,
    },
    /// `eval.success` means the keeper intercepted.
    GoalkeeperIntercept {
        side: Side,
        finisher: String,
        goalkeeper: String,
        chance: ChanceType,
        eval: Evaluation,
    },
    Finish {
        side: Side,
        finisher: String,
        defender: String,
        finish: FinishType,
        eval: Evaluation,
    },
    /// `eval.success` means on target.
    ShotQuality {
        side: Side,
        finisher: String,
        defender: String,
        finish: FinishType,
        eval: Evaluation,
    },
    /// `eval.success` means saved.
    Save {
        side: Side,
        finisher: String,
        goalkeeper: String,
        finish: FinishType,
        eval: Evaluation,
    },
    /// Shot off target. Repeats the shot-quality roll; skills were credited there.
    FinishOutcome {
        side: Side,
        finisher: String,
        defender: String,
        finish: FinishType,
        prob: f64,
        skills_used: Vec<Attribute>,
    },

    // === special ===
    CounterAttack {
        side: Side,
        player: String,
        trigger: CounterTrigger,
    },
    PenaltyAwarded {
        side: Side,
        phase: SetPiecePhase,
    },
    FreeKickAwarded {
        side: Side,
        phase: SetPiecePhase,
    },
    CornerKick {
        side: Side,
    },

    // === special_result ===
    /// `eval.success` means on target.
    Penalty {
        side: Side,
        taker: String,
        goalkeeper: String,
        eval: Evaluation,
    },
    FreeKick {
        side: Side,
        taker: String,
        goalkeeper: String,
        eval: Evaluation,
    },
    /// `eval.success` means saved.
    PenaltySave {
        side: Side,
        taker: String,
        goalkeeper: String,
        eval: Evaluation,
    },
    FreeKickSave {
        side: Side,
        taker: String,
        goalkeeper: String,
        eval: Evaluation,
    },

    // === corner ===
    /// Taker against the keeper; the keeper claims when `eval.success` is false.
    CornerGkIntercept {
        side: Side,
        creator: String,
        goalkeeper: String,
        eval: Evaluation,
    },
    CornerDelivery {
        side: Side,
        creator: String,
        defender: String,
        critical: bool,
        eval: Evaluation,
    },
    CornerFinish {
        side: Side,
        finisher: String,
        defender: String,
        eval: Evaluation,
    },
    CornerShotQuality {
        side: Side,
        finisher: String,
        defender: String,
        finish: FinishType,
        eval: Evaluation,
    },
    CornerSave {
        side: Side,
        finisher: String,
        goalkeeper: String,
        finish: FinishType,
        eval: Evaluation,
    },
    CornerFinishOutcome {
        side: Side,
        finisher: String,
        defender: String,
        finish: FinishType,
        prob: f64,
        skills_used: Vec<Attribute>,
    },
}

/// A player taking part in an evaluated event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant<'a> {
    pub side: Side,
    pub name: &'a str,
}

fn pair<'a>(
    side: Side,
    initiator: &'a str,
    opponent: &'a str,
    attacker_initiates: bool,
) -> Option<(Participant<'a>, Participant<'a>)> {
    let (init_side, opp_side) = if attacker_initiates { (side, side.opponent()) } else { (side.opponent(), side) };
    Some((Participant { side: init_side, name: initiator }, Participant { side: opp_side, name: opponent }))
}

impl MatchEvent {
    pub fn section(&self) -> &'static str {
        use MatchEvent::*;
        match self {
            Creation { .. }
            | GoalkeeperIntercept { .. }
            | Finish { .. }
            | ShotQuality { .. }
            | Save { .. }
            | FinishOutcome { .. } => "result",
            CounterAttack { .. } | PenaltyAwarded { .. } | FreeKickAwarded { .. } | CornerKick { .. } => "special",
            Penalty { .. } | FreeKick { .. } | PenaltySave { .. } | FreeKickSave { .. } => "special_result",
            CornerGkIntercept { .. }
            | CornerDelivery { .. }
            | CornerFinish { .. }
            | CornerShotQuality { .. }
            | CornerSave { .. }
            | CornerFinishOutcome { .. } => "corner",
        }
    }

    pub fn tag(&self) -> &'static str {
        use MatchEvent::*;
        match self {
            Creation { .. } => "creation",
            GoalkeeperIntercept { .. } => "goalkeeper_intercept",
            Finish { .. } | CornerFinish { .. } => "finish",
            ShotQuality { .. } | CornerShotQuality { .. } => "shot_quality",
            Save { .. } | CornerSave { .. } => "save",
            FinishOutcome { .. } | CornerFinishOutcome { .. } => "finish_outcome",
            CounterAttack { .. } => "counter_attack",
            PenaltyAwarded { .. } | Penalty { .. } => "penalty",
            FreeKickAwarded { .. } | FreeKick { .. } => "free_kick",
            CornerKick { .. } => "corner_kick",
            PenaltySave { .. } => "penalty_save",
            FreeKickSave { .. } => "free_kick_save",
            CornerGkIntercept { .. } => "gk_intercept",
            CornerDelivery { .. } => "delivery",
        }
    }

    pub fn side(&self) -> Side {
        use MatchEvent::*;
        match self {
            Creation { side, .. }
            | GoalkeeperIntercept { side, .. }
            | Finish { side, .. }
            | ShotQuality { side, .. }
            | Save { side, .. }
            | FinishOutcome { side, .. }
            | CounterAttack { side, .. }
            | PenaltyAwarded { side, .. }
            | FreeKickAwarded { side, .. }
            | CornerKick { side }
            | Penalty { side, .. }
            | FreeKick { side, .. }
            | PenaltySave { side, .. }
            | FreeKickSave { side, .. }
            | CornerGkIntercept { side, .. }
            | CornerDelivery { side, .. }
            | CornerFinish { side, .. }
            | CornerShotQuality { side, .. }
            | CornerSave { side, .. }
            | CornerFinishOutcome { side, .. } => *side,
        }
    }

    /// The evaluation this record carries, if it resolved one.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        use MatchEvent::*;
        match self {
            Creation { eval, .. }
            | GoalkeeperIntercept { eval, .. }
            | Finish { eval, .. }
            | ShotQuality { eval, .. }
            | Save { eval, .. }
            | Penalty { eval, .. }
            | FreeKick { eval, .. }
            | PenaltySave { eval, .. }
            | FreeKickSave { eval, .. }
            | CornerGkIntercept { eval, .. }
            | CornerDelivery { eval, .. }
            | CornerFinish { eval, .. }
            | CornerShotQuality { eval, .. }
            | CornerSave { eval, .. } => Some(eval),
            FinishOutcome { .. }
            | CounterAttack { .. }
            | PenaltyAwarded { .. }
            | FreeKickAwarded { .. }
            | CornerKick { .. }
            | CornerFinishOutcome { .. } => None,
        }
    }

    /// Initiator and opponent of the evaluation, in that order.
    pub fn participants(&self) -> Option<(Participant<'_>, Participant<'_>)> {
        use MatchEvent::*;
        match self {
            Creation { side, creator, defender, .. } => pair(*side, creator, defender, true),
            GoalkeeperIntercept { side, finisher, goalkeeper, .. } => pair(*side, goalkeeper, finisher, false),
            Finish { side, finisher, defender, .. }
            | ShotQuality { side, finisher, defender, .. }
            | CornerFinish { side, finisher, defender, .. }
            | CornerShotQuality { side, finisher, defender, .. } => pair(*side, finisher, defender, true),
            Save { side, finisher, goalkeeper, .. } | CornerSave { side, finisher, goalkeeper, .. } => {
                pair(*side, goalkeeper, finisher, false)
            }
            Penalty { side, taker, goalkeeper, .. } | FreeKick { side, taker, goalkeeper, .. } => {
                pair(*side, taker, goalkeeper, true)
            }
            PenaltySave { side, taker, goalkeeper, .. } | FreeKickSave { side, taker, goalkeeper, .. } => {
                pair(*side, goalkeeper, taker, false)
            }
            CornerGkIntercept { side, creator, goalkeeper, .. } => pair(*side, creator, goalkeeper, true),
            CornerDelivery { side, creator, defender, .. } => pair(*side, creator, defender, true),
            FinishOutcome { .. }
            | CounterAttack { .. }
            | PenaltyAwarded { .. }
            | FreeKickAwarded { .. }
            | CornerKick { .. }
            | CornerFinishOutcome { .. } => None,
        }
    }

    /// True for a save record that ended in a goal.
    pub fn is_goal(&self) -> bool {
        use MatchEvent::*;
        match self {
            Save { eval, .. } | CornerSave { eval, .. } | PenaltySave { eval, .. } | FreeKickSave { eval, .. } => {
                !eval.success
            }
            _ => false,
        }
    }
}
