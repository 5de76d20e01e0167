//! Per-event scoring tables.
//!
//! Three tables per [`EventType`]: the scoring formula, the sigmoid that turns
//! a score into a fail probability, and the skill-weight ledger used for usage
//! statistics. The ledger is not derived from the formula. Several entries
//! disagree with it: `Header_save`, `Finesse_save` and `Crossing_intercept`
//! sum past 1.0, and the `Corner_from_*`, `Penalty*` and `Freekick*` ledgers
//! list other skills. Existing usage numbers depend on these values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MatchError;
use crate::models::Attribute;
use crate::models::Attribute::*;

/// How a chance was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChanceType {
    Short,
    Long,
    Crossing,
    Through,
    Solo,
}

impl ChanceType {
    pub const ALL: [ChanceType; 5] = [
        ChanceType::Short,
        ChanceType::Long,
        ChanceType::Crossing,
        ChanceType::Through,
        ChanceType::Solo,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ChanceType::Short => "Short",
            ChanceType::Long => "Long",
            ChanceType::Crossing => "Crossing",
            ChanceType::Through => "Through",
            ChanceType::Solo => "Solo",
        }
    }

    /// Whether the keeper gets a chance to cut the ball out before the finish.
    pub fn allows_goalkeeper_intercept(self) -> bool {
        matches!(self, ChanceType::Long | ChanceType::Through | ChanceType::Crossing)
    }
}

impl fmt::Display for ChanceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shot technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FinishType {
    FirstTime,
    Controlled,
    Header,
    Chip,
    Finesse,
    Power,
}

impl FinishType {
    pub const ALL: [FinishType; 6] = [
        FinishType::FirstTime,
        FinishType::Controlled,
        FinishType::Header,
        FinishType::Chip,
        FinishType::Finesse,
        FinishType::Power,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FinishType::FirstTime => "FirstTime",
            FinishType::Controlled => "Controlled",
            FinishType::Header => "Header",
            FinishType::Chip => "Chip",
            FinishType::Finesse => "Finesse",
            FinishType::Power => "Power",
        }
    }
}

impl fmt::Display for FinishType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every evaluable event. Serialized under the legacy event names
/// (`"Short_finisher"`, `"Header_save"`, `"Gk_Corner"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    // chance creation
    Short,
    Long,
    Crossing,
    Through,
    Solo,
    // finisher duels
    #[serde(rename = "Short_finisher")]
    ShortFinisher,
    #[serde(rename = "Long_finisher")]
    LongFinisher,
    #[serde(rename = "Crossing_finisher")]
    CrossingFinisher,
    #[serde(rename = "Through_finisher")]
    ThroughFinisher,
    #[serde(rename = "Solo_finisher")]
    SoloFinisher,
    // shot quality
    FirstTime,
    Controlled,
    Header,
    Chip,
    Finesse,
    Power,
    // keeper saves
    #[serde(rename = "FirstTime_save")]
    FirstTimeSave,
    #[serde(rename = "Controlled_save")]
    ControlledSave,
    #[serde(rename = "Header_save")]
    HeaderSave,
    #[serde(rename = "Chip_save")]
    ChipSave,
    #[serde(rename = "Finesse_save")]
    FinesseSave,
    #[serde(rename = "Power_save")]
    PowerSave,
    // keeper intercepts
    #[serde(rename = "Long_intercept")]
    LongIntercept,
    #[serde(rename = "Crossing_intercept")]
    CrossingIntercept,
    #[serde(rename = "Through_intercept")]
    ThroughIntercept,
    // set pieces
    Penalty,
    Freekick,
    #[serde(rename = "Penalty_save")]
    PenaltySave,
    #[serde(rename = "Freekick_save")]
    FreekickSave,
    Corner,
    #[serde(rename = "Gk_Corner")]
    GkCorner,
    #[serde(rename = "Header_duel")]
    HeaderDuel,
    #[serde(rename = "Corner_finisher")]
    CornerFinisher,
    Counter,
    #[serde(rename = "Corner_from_save")]
    CornerFromSave,
    #[serde(rename = "Corner_from_finisher_fail")]
    CornerFromFinisherFail,
    #[serde(rename = "Corner_from_creation_fail")]
    CornerFromCreationFail,
}

impl EventType {
    pub const ALL: [EventType; 37] = [
        EventType::Short,
        EventType::Long,
        EventType::Crossing,
        EventType::Through,
        EventType::Solo,
        EventType::ShortFinisher,
        EventType::LongFinisher,
        EventType::CrossingFinisher,
        EventType::ThroughFinisher,
        EventType::SoloFinisher,
        EventType::FirstTime,
        EventType::Controlled,
        EventType::Header,
        EventType::Chip,
        EventType::Finesse,
        EventType::Power,
        EventType::FirstTimeSave,
        EventType::ControlledSave,
        EventType::HeaderSave,
        EventType::ChipSave,
        EventType::FinesseSave,
        EventType::PowerSave,
        EventType::LongIntercept,
        EventType::CrossingIntercept,
        EventType::ThroughIntercept,
        EventType::Penalty,
        EventType::Freekick,
        EventType::PenaltySave,
        EventType::FreekickSave,
        EventType::Corner,
        EventType::GkCorner,
        EventType::HeaderDuel,
        EventType::CornerFinisher,
        EventType::Counter,
        EventType::CornerFromSave,
        EventType::CornerFromFinisherFail,
        EventType::CornerFromCreationFail,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            EventType::Short => "Short",
            EventType::Long => "Long",
            EventType::Crossing => "Crossing",
            EventType::Through => "Through",
            EventType::Solo => "Solo",
            EventType::ShortFinisher => "Short_finisher",
            EventType::LongFinisher => "Long_finisher",
            EventType::CrossingFinisher => "Crossing_finisher",
            EventType::ThroughFinisher => "Through_finisher",
            EventType::SoloFinisher => "Solo_finisher",
            EventType::FirstTime => "FirstTime",
            EventType::Controlled => "Controlled",
            EventType::Header => "Header",
            EventType::Chip => "Chip",
            EventType::Finesse => "Finesse",
            EventType::Power => "Power",
            EventType::FirstTimeSave => "FirstTime_save",
            EventType::ControlledSave => "Controlled_save",
            EventType::HeaderSave => "Header_save",
            EventType::ChipSave => "Chip_save",
            EventType::FinesseSave => "Finesse_save",
            EventType::PowerSave => "Power_save",
            EventType::LongIntercept => "Long_intercept",
            EventType::CrossingIntercept => "Crossing_intercept",
            EventType::ThroughIntercept => "Through_intercept",
            EventType::Penalty => "Penalty",
            EventType::Freekick => "Freekick",
            EventType::PenaltySave => "Penalty_save",
            EventType::FreekickSave => "Freekick_save",
            EventType::Corner => "Corner",
            EventType::GkCorner => "Gk_Corner",
            EventType::HeaderDuel => "Header_duel",
            EventType::CornerFinisher => "Corner_finisher",
            EventType::Counter => "Counter",
            EventType::CornerFromSave => "Corner_from_save",
            EventType::CornerFromFinisherFail => "Corner_from_finisher_fail",
            EventType::CornerFromCreationFail => "Corner_from_creation_fail",
        }
    }

    pub const fn creation(chance: ChanceType) -> Self {
        match chance {
            ChanceType::Short => EventType::Short,
            ChanceType::Long => EventType::Long,
            ChanceType::Crossing => EventType::Crossing,
            ChanceType::Through => EventType::Through,
            ChanceType::Solo => EventType::Solo,
        }
    }

    pub const fn finisher(chance: ChanceType) -> Self {
        match chance {
            ChanceType::Short => EventType::ShortFinisher,
            ChanceType::Long => EventType::LongFinisher,
            ChanceType::Crossing => EventType::CrossingFinisher,
            ChanceType::Through => EventType::ThroughFinisher,
            ChanceType::Solo => EventType::SoloFinisher,
        }
    }

    /// Keeper intercept for the chance, if the chance type has one.
    pub const fn intercept(chance: ChanceType) -> Option<Self> {
        match chance {
            ChanceType::Long => Some(EventType::LongIntercept),
            ChanceType::Crossing => Some(EventType::CrossingIntercept),
            ChanceType::Through => Some(EventType::ThroughIntercept),
            ChanceType::Short | ChanceType::Solo => None,
        }
    }

    pub const fn shot(finish: FinishType) -> Self {
        match finish {
            FinishType::FirstTime => EventType::FirstTime,
            FinishType::Controlled => EventType::Controlled,
            FinishType::Header => EventType::Header,
            FinishType::Chip => EventType::Chip,
            FinishType::Finesse => EventType::Finesse,
            FinishType::Power => EventType::Power,
        }
    }

    pub const fn save(finish: FinishType) -> Self {
        match finish {
            FinishType::FirstTime => EventType::FirstTimeSave,
            FinishType::Controlled => EventType::ControlledSave,
            FinishType::Header => EventType::HeaderSave,
            FinishType::Chip => EventType::ChipSave,
            FinishType::Finesse => EventType::FinesseSave,
            FinishType::Power => EventType::PowerSave,
        }
    }

    pub fn formula(self) -> Formula {
        match self {
            EventType::Short => duel(
                &[(Passing, 0.4), (Vision, 0.3), (BallControl, 0.1), (Composure, 0.1), (Positioning, 0.1)],
                &[(Marking, 0.4), (Tackling, 0.3), (WorkRate, 0.1), (Positioning, 0.1), (Strength, 0.1)],
            ),
            EventType::Long => duel(
                &[(Crossing, 0.4), (Passing, 0.3), (BallControl, 0.1), (Composure, 0.1), (Vision, 0.1)],
                &[(WorkRate, 0.4), (Tackling, 0.3), (Marking, 0.1), (Positioning, 0.1), (Strength, 0.1)],
            ),
            EventType::Crossing => duel(
                &[(Crossing, 0.4), (Acceleration, 0.3), (Agility, 0.1), (Vision, 0.1), (BallControl, 0.1)],
                &[(Marking, 0.4), (Positioning, 0.3), (Tackling, 0.1), (Acceleration, 0.1), (Agility, 0.1)],
            ),
            EventType::Through => duel(
                &[(Vision, 0.4), (Passing, 0.3), (BallControl, 0.1), (Crossing, 0.1), (Composure, 0.1)],
                &[(Tackling, 0.4), (Acceleration, 0.3), (Positioning, 0.1), (Marking, 0.1), (Strength, 0.1)],
            ),
            EventType::Solo | EventType::SoloFinisher => duel(
                &[(BallControl, 0.4), (Agility, 0.3), (Vision, 0.1), (Composure, 0.1), (Acceleration, 0.1)],
                &[(Tackling, 0.4), (Agility, 0.3), (Positioning, 0.1), (Marking, 0.1), (Strength, 0.1)],
            ),
            EventType::ShortFinisher => duel(
                &[(BallControl, 0.4), (Positioning, 0.3), (WorkRate, 0.1), (Agility, 0.1), (Strength, 0.1)],
                &[(Tackling, 0.4), (Marking, 0.3), (WorkRate, 0.1), (Positioning, 0.1), (Agility, 0.1)],
            ),
            EventType::LongFinisher => duel(
                &[(JumpReach, 0.4), (Strength, 0.3), (Agility, 0.1), (Positioning, 0.1), (Acceleration, 0.1)],
                &[(Heading, 0.4), (JumpReach, 0.3), (Strength, 0.1), (Positioning, 0.1), (Agility, 0.1)],
            ),
            EventType::CrossingFinisher => duel(
                &[(JumpReach, 0.4), (Strength, 0.3), (Agility, 0.1), (Positioning, 0.1), (WorkRate, 0.1)],
                &[(Heading, 0.4), (JumpReach, 0.3), (Strength, 0.1), (Positioning, 0.1), (Agility, 0.1)],
            ),
            EventType::ThroughFinisher => duel(
                &[(Vision, 0.4), (Acceleration, 0.3), (Agility, 0.1), (Positioning, 0.1), (Composure, 0.1)],
                &[(Positioning, 0.4), (Acceleration, 0.3), (Strength, 0.1), (Tackling, 0.1), (Marking, 0.1)],
            ),
            EventType::FirstTime => solo(&[(BallControl, 0.4), (Finishing, 0.4), (Composure, 0.2)]),
            EventType::Controlled => solo(&[(Finishing, 0.5), (Composure, 0.3), (BallControl, 0.2)]),
            EventType::Header => solo(&[(Heading, 0.5), (JumpReach, 0.3), (Strength, 0.2)]),
            EventType::Chip => solo(&[(Composure, 0.4), (BallControl, 0.3), (Finishing, 0.3)]),
            EventType::Finesse => {
                solo(&[(Vision, 0.3), (Finishing, 0.3), (Composure, 0.1), (Agility, 0.3)])
            }
            EventType::Power => solo(&[(Finishing, 0.4), (Strength, 0.4), (BallControl, 0.2)]),
            EventType::FirstTimeSave => solo(&[(Reflexes, 0.6), (Positioning, 0.3), (Handling, 0.1)]),
            EventType::ControlledSave => solo(&[(Handling, 0.5), (Positioning, 0.3), (Reflexes, 0.2)]),
            EventType::HeaderSave => {
                solo(&[(AerialReach, 0.6), (Positioning, 0.3), (Agility, 0.3), (Handling, 0.1)])
            }
            EventType::ChipSave => solo(&[(OneOnOne, 0.5), (Positioning, 0.3), (Reflexes, 0.2)]),
            EventType::FinesseSave => {
                solo(&[(Handling, 0.5), (Agility, 0.3), (Positioning, 0.3), (Handling, 0.2)])
            }
            EventType::PowerSave => {
                solo(&[(Handling, 0.3), (Reflexes, 0.3), (Strength, 0.3), (Positioning, 0.1)])
            }
            EventType::Penalty => solo(&[(Composure, 0.5), (Finishing, 0.3), (BallControl, 0.2)]),
            EventType::Freekick => {
                solo(&[(Finishing, 0.3), (Vision, 0.2), (Composure, 0.2), (BallControl, 0.3)])
            }
            EventType::PenaltySave => solo(&[(OneOnOne, 0.4), (Composure, 0.3), (Agility, 0.3)]),
            EventType::FreekickSave => solo(&[(Agility, 0.4), (Handling, 0.3), (Positioning, 0.2)]),
            EventType::LongIntercept => solo(&[
                (AerialReach, 0.3),
                (CommandOfArea, 0.3),
                (Strength, 0.2),
                (Positioning, 0.2),
            ]),
            EventType::CrossingIntercept => solo(&[
                (AerialReach, 0.4),
                (CommandOfArea, 0.4),
                (Strength, 0.2),
                (Positioning, 0.2),
            ]),
            EventType::ThroughIntercept => {
                solo(&[(OneOnOne, 0.6), (Positioning, 0.3), (Agility, 0.1)])
            }
            EventType::Corner => duel(
                &[(Crossing, 0.5), (Vision, 0.3), (BallControl, 0.2)],
                &[(AerialReach, 0.5), (CommandOfArea, 0.3), (Positioning, 0.2)],
            ),
            EventType::GkCorner => duel(
                &[(Crossing, 0.5), (Vision, 0.3), (Composure, 0.2)],
                &[(AerialReach, 0.5), (CommandOfArea, 0.3), (Positioning, 0.2)],
            ),
            EventType::HeaderDuel | EventType::CornerFinisher => duel(
                &[(Heading, 0.4), (JumpReach, 0.3), (Positioning, 0.2), (Strength, 0.1)],
                &[(Heading, 0.4), (JumpReach, 0.3), (Positioning, 0.2), (Strength, 0.1)],
            ),
            EventType::Counter => duel(
                &[(Vision, 0.4), (Passing, 0.3), (Composure, 0.2), (Acceleration, 0.1)],
                &[(Positioning, 0.5), (Marking, 0.3), (Tackling, 0.2)],
            ),
            EventType::CornerFromSave => {
                solo(&[(Handling, 0.5), (Positioning, 0.2), (Composure, 0.3)])
            }
            EventType::CornerFromFinisherFail | EventType::CornerFromCreationFail => {
                solo(&[(BallControl, 0.4), (Positioning, 0.3), (Agility, 0.3)])
            }
        }
    }

    pub fn sigmoid(self) -> Sigmoid {
        match self {
            EventType::FirstTime => Sigmoid::new(0.3, 0.15, 0.25),
            EventType::Controlled => Sigmoid::new(0.3, 0.25, 0.25),
            EventType::Header => Sigmoid::new(0.3, 0.2, 0.25),
            EventType::Chip => Sigmoid::new(0.3, 0.1, 0.25),
            EventType::Finesse => Sigmoid::new(0.3, 0.1, 0.25),
            EventType::Power => Sigmoid::new(0.3, 0.2, 0.25),
            EventType::CornerFromSave => Sigmoid::new(0.15, 0.6, 0.3),
            EventType::CornerFromFinisherFail | EventType::CornerFromCreationFail => {
                Sigmoid::new(0.15, 0.75, 0.2)
            }
            EventType::FirstTimeSave => Sigmoid::new(0.3, 0.28, 0.5),
            EventType::ControlledSave => Sigmoid::new(0.3, 0.30, 0.5),
            EventType::HeaderSave => Sigmoid::new(0.3, 0.23, 0.5),
            EventType::ChipSave => Sigmoid::new(0.3, 0.18, 0.5),
            EventType::FinesseSave => Sigmoid::new(0.3, 0.18, 0.5),
            EventType::PowerSave => Sigmoid::new(0.3, 0.40, 0.45),
            EventType::PenaltySave => Sigmoid::new(0.3, 0.0, 0.30),
            EventType::FreekickSave => Sigmoid::new(0.3, 0.25, 0.45),
            EventType::Penalty => Sigmoid::new(0.4, 0.70, 0.25),
            EventType::Freekick => Sigmoid::new(0.3, 0.28, 0.50),
            _ => Sigmoid::DEFAULT,
        }
    }

    /// Skills credited when this event is evaluated, with their ledger weight.
    /// Each skill appears once, in first-mention order.
    pub fn skill_weights(self) -> &'static [(Attribute, f64)] {
        match self {
            EventType::Short => &[
                (Passing, 0.4),
                (Vision, 0.3),
                (BallControl, 0.1),
                (Composure, 0.1),
                (Positioning, 0.1),
                (Marking, 0.4),
                (Tackling, 0.3),
                (WorkRate, 0.1),
                (Strength, 0.1),
            ],
            EventType::Long => &[
                (Crossing, 0.4),
                (Passing, 0.3),
                (BallControl, 0.1),
                (Composure, 0.1),
                (Vision, 0.1),
                (WorkRate, 0.4),
                (Tackling, 0.3),
                (Marking, 0.1),
                (Positioning, 0.1),
                (Strength, 0.1),
            ],
            EventType::Crossing => &[
                (Crossing, 0.4),
                (Acceleration, 0.1),
                (Agility, 0.1),
                (Vision, 0.1),
                (BallControl, 0.1),
                (Marking, 0.4),
                (Positioning, 0.3),
                (Tackling, 0.1),
            ],
            EventType::Through => &[
                (Vision, 0.4),
                (Passing, 0.3),
                (BallControl, 0.1),
                (Crossing, 0.1),
                (Composure, 0.1),
                (Tackling, 0.4),
                (Acceleration, 0.3),
                (Positioning, 0.1),
                (Marking, 0.1),
                (Strength, 0.1),
            ],
            EventType::Solo | EventType::SoloFinisher => &[
                (BallControl, 0.4),
                (Agility, 0.3),
                (Vision, 0.1),
                (Composure, 0.1),
                (Acceleration, 0.1),
                (Tackling, 0.4),
                (Positioning, 0.1),
                (Marking, 0.1),
                (Strength, 0.1),
            ],
            EventType::ShortFinisher => &[
                (BallControl, 0.4),
                (Positioning, 0.1),
                (WorkRate, 0.1),
                (Agility, 0.1),
                (Strength, 0.1),
                (Tackling, 0.4),
                (Marking, 0.3),
            ],
            EventType::LongFinisher => &[
                (JumpReach, 0.3),
                (Strength, 0.1),
                (Agility, 0.1),
                (Positioning, 0.1),
                (Acceleration, 0.1),
                (Heading, 0.4),
            ],
            EventType::CrossingFinisher => &[
                (JumpReach, 0.3),
                (Strength, 0.1),
                (Agility, 0.1),
                (Positioning, 0.1),
                (WorkRate, 0.1),
                (Heading, 0.4),
            ],
            EventType::ThroughFinisher => &[
                (Vision, 0.4),
                (Acceleration, 0.3),
                (Agility, 0.1),
                (Positioning, 0.4),
                (Composure, 0.1),
                (Strength, 0.1),
                (Tackling, 0.1),
                (Marking, 0.1),
            ],
            EventType::FirstTime => &[(BallControl, 0.4), (Finishing, 0.4), (Composure, 0.2)],
            EventType::Controlled => &[(Finishing, 0.5), (Composure, 0.3), (BallControl, 0.2)],
            EventType::Header => &[(Heading, 0.5), (JumpReach, 0.3), (Strength, 0.2)],
            EventType::Chip => &[(Composure, 0.4), (BallControl, 0.3), (Finishing, 0.3)],
            EventType::Finesse => &[(Vision, 0.3), (Finishing, 0.3), (Composure, 0.1), (Agility, 0.3)],
            EventType::Power => &[(Finishing, 0.4), (Strength, 0.4), (BallControl, 0.2)],
            EventType::HeaderDuel | EventType::CornerFinisher => {
                &[(Heading, 0.4), (JumpReach, 0.3), (Positioning, 0.2), (Strength, 0.1)]
            }
            EventType::CornerFromSave => &[
                (Handling, 0.5),
                (Reflexes, 0.3),
                (Positioning, 0.2),
                (Finishing, 0.5),
                (BallControl, 0.3),
                (Composure, 0.2),
            ],
            EventType::CornerFromFinisherFail => &[
                (Tackling, 0.4),
                (Positioning, 0.1),
                (Strength, 0.2),
                (Agility, 0.3),
                (BallControl, 0.4),
                (Composure, 0.2),
            ],
            EventType::CornerFromCreationFail => &[
                (Tackling, 0.4),
                (Marking, 0.3),
                (Positioning, 0.2),
                (Strength, 0.1),
                (BallControl, 0.4),
                (Passing, 0.3),
                (Composure, 0.2),
                (Vision, 0.1),
            ],
            EventType::FirstTimeSave => &[(Reflexes, 0.6), (Positioning, 0.3), (Handling, 0.1)],
            EventType::ControlledSave => &[(Handling, 0.5), (Positioning, 0.3), (Reflexes, 0.2)],
            EventType::HeaderSave => {
                &[(AerialReach, 0.6), (Positioning, 0.3), (Agility, 0.3), (Handling, 0.1)]
            }
            EventType::ChipSave => &[(OneOnOne, 0.5), (Positioning, 0.3), (Reflexes, 0.2)],
            EventType::FinesseSave => &[(Handling, 0.5), (Agility, 0.3), (Positioning, 0.3)],
            EventType::PowerSave => {
                &[(Handling, 0.3), (Reflexes, 0.3), (Strength, 0.3), (Positioning, 0.1)]
            }
            EventType::PenaltySave => &[(OneOnOne, 0.5), (Reflexes, 0.3), (Positioning, 0.2)],
            EventType::FreekickSave => {
                &[(Positioning, 0.4), (Reflexes, 0.3), (CommandOfArea, 0.2), (Handling, 0.1)]
            }
            EventType::LongIntercept => {
                &[(AerialReach, 0.3), (CommandOfArea, 0.3), (Strength, 0.2), (Positioning, 0.2)]
            }
            EventType::CrossingIntercept => {
                &[(AerialReach, 0.4), (CommandOfArea, 0.4), (Strength, 0.2), (Positioning, 0.2)]
            }
            EventType::ThroughIntercept => &[(OneOnOne, 0.6), (Positioning, 0.3), (Agility, 0.1)],
            EventType::Corner => &[
                (Crossing, 0.5),
                (Vision, 0.3),
                (BallControl, 0.2),
                (AerialReach, 0.5),
                (CommandOfArea, 0.3),
                (Positioning, 0.2),
            ],
            EventType::Freekick => &[
                (Finishing, 0.3),
                (Vision, 0.2),
                (Composure, 0.2),
                (BallControl, 0.3),
                (Positioning, 0.3),
                (Reflexes, 0.3),
                (Agility, 0.3),
                (Handling, 0.1),
            ],
            EventType::Penalty => &[
                (Composure, 0.5),
                (Finishing, 0.3),
                (BallControl, 0.2),
                (Reflexes, 0.3),
                (Agility, 0.4),
                (OneOnOne, 0.3),
            ],
            EventType::Counter => &[
                (Vision, 0.4),
                (Passing, 0.3),
                (Composure, 0.2),
                (Acceleration, 0.1),
                (Positioning, 0.5),
                (Marking, 0.3),
                (Tackling, 0.2),
            ],
            EventType::GkCorner => &[
                (Crossing, 0.5),
                (Vision, 0.3),
                (Composure, 0.2),
                (AerialReach, 0.5),
                (CommandOfArea, 0.3),
                (Positioning, 0.2),
            ],
        }
    }

    /// Skills consulted by this event, unweighted.
    pub fn skills_used(self) -> Vec<Attribute> {
        self.skill_weights().iter().map(|(attr, _)| *attr).collect()
    }

    /// Ledger weight for `attr`, 0.0 when the event does not credit it.
    pub fn skill_weight(self, attr: Attribute) -> f64 {
        self.skill_weights()
            .iter()
            .find(|(a, _)| *a == attr)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|event| event.name() == s)
            .ok_or_else(|| MatchError::UnknownEventType(s.to_string()))
    }
}

/// What the initiator's weighted sum is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Opposition {
    /// Weighted sum of the opponent's attributes.
    Player(&'static [(Attribute, f64)]),
    /// A fixed bar; the opponent's attributes are ignored.
    Flat(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formula {
    pub initiator: &'static [(Attribute, f64)],
    pub opposition: Opposition,
}

/// Bar subtracted from single-sided events (shots, saves, intercepts).
pub const FLAT_OPPOSITION: f64 = 10.0;

const fn duel(initiator: &'static [(Attribute, f64)], defender: &'static [(Attribute, f64)]) -> Formula {
    Formula { initiator, opposition: Opposition::Player(defender) }
}

const fn solo(initiator: &'static [(Attribute, f64)]) -> Formula {
    Formula { initiator, opposition: Opposition::Flat(FLAT_OPPOSITION) }
}

/// `c + L / (1 + e^(-aX))`: probability the event succeeds at score X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sigmoid {
    pub a: f64,
    pub c: f64,
    #[serde(rename = "L")]
    pub l: f64,
}

impl Sigmoid {
    pub const DEFAULT: Sigmoid = Sigmoid { a: 0.7, c: 0.20, l: 0.60 };

    pub const fn new(a: f64, c: f64, l: f64) -> Self {
        Self { a, c, l }
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.c + self.l / (1.0 + (-self.a * x).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_names_round_trip() {
        for event in EventType::ALL {
            assert_eq!(event.name().parse::<EventType>().unwrap(), event);
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{}\"", event.name()));
        }
        assert!(matches!("Gk_Pen".parse::<EventType>(), Err(MatchError::UnknownEventType(_))));
    }

    #[test]
    fn test_ledger_keys_are_unique() {
        for event in EventType::ALL {
            let keys: BTreeSet<_> = event.skill_weights().iter().map(|(a, _)| *a).collect();
            assert_eq!(keys.len(), event.skill_weights().len(), "duplicate skill in {event}");
        }
    }

    #[test]
    fn test_ledger_quirks_preserved() {
        let sum = |e: EventType| e.skill_weights().iter().map(|(_, w)| w).sum::<f64>();
        assert!((sum(EventType::HeaderSave) - 1.3).abs() < 1e-9);
        assert!((sum(EventType::FinesseSave) - 1.1).abs() < 1e-9);
        assert!((sum(EventType::CrossingIntercept) - 1.2).abs() < 1e-9);
        assert_eq!(EventType::Crossing.skill_weight(Attribute::Acceleration), 0.1);
        assert_eq!(EventType::ThroughFinisher.skill_weight(Attribute::Positioning), 0.4);
    }

    #[test]
    fn test_single_sided_events_use_flat_bar() {
        for event in [EventType::Header, EventType::PowerSave, EventType::ThroughIntercept, EventType::Penalty] {
            assert_eq!(event.formula().opposition, Opposition::Flat(10.0));
        }
        assert!(matches!(EventType::Corner.formula().opposition, Opposition::Player(_)));
    }

    #[test]
    fn test_intercept_only_for_long_range_chances() {
        for chance in ChanceType::ALL {
            assert_eq!(EventType::intercept(chance).is_some(), chance.allows_goalkeeper_intercept());
        }
    }

    #[test]
    fn test_sigmoid_bounds() {
        let s = EventType::PenaltySave.sigmoid();
        assert!((s.eval(0.0) - 0.15).abs() < 1e-12);
        assert!(s.eval(100.0) <= s.c + s.l);
        assert!(s.eval(-100.0) >= s.c);
        assert_eq!(EventType::Counter.sigmoid(), Sigmoid::DEFAULT);
    }
}
