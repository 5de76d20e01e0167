//! Attribute vocabulary shared by outfield players and goalkeepers.
//!
//! Values live on a 1..=20 scale. Storage is a fixed array indexed by
//! [`Attribute`], so formula tables are checked at compile time and a typo can
//! no longer read a silent zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MatchError;

pub const ATTRIBUTE_MIN: u8 = 1;
pub const ATTRIBUTE_MAX: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Finishing,
    Tackling,
    Marking,
    Heading,
    Passing,
    Crossing,
    #[serde(rename = "Ball Control")]
    BallControl,
    Positioning,
    Vision,
    Composure,
    #[serde(rename = "Work Rate")]
    WorkRate,
    Strength,
    Stamina,
    Acceleration,
    Agility,
    #[serde(rename = "Jump Reach")]
    JumpReach,
    #[serde(rename = "Command of Area")]
    CommandOfArea,
    Reflexes,
    Handling,
    #[serde(rename = "One-on-One")]
    OneOnOne,
    #[serde(rename = "Aerial Reach")]
    AerialReach,
}

pub const ATTRIBUTE_COUNT: usize = 21;

impl Attribute {
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Attribute::Finishing,
        Attribute::Tackling,
        Attribute::Marking,
        Attribute::Heading,
        Attribute::Passing,
        Attribute::Crossing,
        Attribute::BallControl,
        Attribute::Positioning,
        Attribute::Vision,
        Attribute::Composure,
        Attribute::WorkRate,
        Attribute::Strength,
        Attribute::Stamina,
        Attribute::Acceleration,
        Attribute::Agility,
        Attribute::JumpReach,
        Attribute::CommandOfArea,
        Attribute::Reflexes,
        Attribute::Handling,
        Attribute::OneOnOne,
        Attribute::AerialReach,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Finishing => "Finishing",
            Attribute::Tackling => "Tackling",
            Attribute::Marking => "Marking",
            Attribute::Heading => "Heading",
            Attribute::Passing => "Passing",
            Attribute::Crossing => "Crossing",
            Attribute::BallControl => "Ball Control",
            Attribute::Positioning => "Positioning",
            Attribute::Vision => "Vision",
            Attribute::Composure => "Composure",
            Attribute::WorkRate => "Work Rate",
            Attribute::Strength => "Strength",
            Attribute::Stamina => "Stamina",
            Attribute::Acceleration => "Acceleration",
            Attribute::Agility => "Agility",
            Attribute::JumpReach => "Jump Reach",
            Attribute::CommandOfArea => "Command of Area",
            Attribute::Reflexes => "Reflexes",
            Attribute::Handling => "Handling",
            Attribute::OneOnOne => "One-on-One",
            Attribute::AerialReach => "Aerial Reach",
        }
    }

    /// Goalkeeping skills that are never credited to an outfield player.
    pub fn is_goalkeeper_only(self) -> bool {
        GK_ONLY_SKILLS.contains(&self)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|attr| attr.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MatchError::UnknownAttribute(s.to_string()))
    }
}

pub const OUTFIELD_ATTRS: [Attribute; 16] = [
    Attribute::Finishing,
    Attribute::Tackling,
    Attribute::Marking,
    Attribute::Heading,
    Attribute::Passing,
    Attribute::Crossing,
    Attribute::BallControl,
    Attribute::Positioning,
    Attribute::Vision,
    Attribute::Composure,
    Attribute::WorkRate,
    Attribute::Strength,
    Attribute::Stamina,
    Attribute::Acceleration,
    Attribute::Agility,
    Attribute::JumpReach,
];

pub const GOALKEEPER_ATTRS: [Attribute; 13] = [
    Attribute::Positioning,
    Attribute::CommandOfArea,
    Attribute::Composure,
    Attribute::WorkRate,
    Attribute::Strength,
    Attribute::Stamina,
    Attribute::Acceleration,
    Attribute::Agility,
    Attribute::JumpReach,
    Attribute::Reflexes,
    Attribute::Handling,
    Attribute::OneOnOne,
    Attribute::AerialReach,
];

pub const GK_ONLY_SKILLS: [Attribute; 5] = [
    Attribute::AerialReach,
    Attribute::CommandOfArea,
    Attribute::Handling,
    Attribute::OneOnOne,
    Attribute::Reflexes,
];

/// Attribute values for one player. Attributes that were never set read as 0,
/// which is how a goalkeeping term in a formula scores against an outfielder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeSet {
    values: [u8; ATTRIBUTE_COUNT],
    present: u32,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every attribute in `attrs` set to `value`.
    pub fn uniform(attrs: &[Attribute], value: u8) -> Self {
        let mut set = Self::default();
        for &attr in attrs {
            set.set(attr, value);
        }
        set
    }

    pub fn with(mut self, attr: Attribute, value: u8) -> Self {
        self.set(attr, value);
        self
    }

    pub fn set(&mut self, attr: Attribute, value: u8) {
        self.values[attr.index()] = value;
        self.present |= 1 << attr.index();
    }

    #[inline]
    pub fn get(&self, attr: Attribute) -> u8 {
        self.values[attr.index()]
    }

    pub fn contains(&self, attr: Attribute) -> bool {
        self.present & (1 << attr.index()) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, u8)> + '_ {
        Attribute::ALL
            .iter()
            .copied()
            .filter(move |attr| self.contains(*attr))
            .map(move |attr| (attr, self.get(attr)))
    }

    pub fn missing<'a>(&'a self, required: &'a [Attribute]) -> impl Iterator<Item = Attribute> + 'a {
        required.iter().copied().filter(move |attr| !self.contains(*attr))
    }
}

impl FromIterator<(Attribute, u8)> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = (Attribute, u8)>>(iter: T) -> Self {
        let mut set = Self::default();
        for (attr, value) in iter {
            set.set(attr, value);
        }
        set
    }
}
