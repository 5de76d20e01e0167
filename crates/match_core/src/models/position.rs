use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MatchError;

/// Matrix position codes. `GK` plus the thirteen outfield slots, ordered from
/// the back line forward and left to right within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    GK,
    DL,
    DC,
    DR,
    DML,
    DMC,
    DMR,
    ML,
    MC,
    MR,
    OML,
    OMC,
    OMR,
    FC,
}

pub const POSITION_COUNT: usize = 14;

impl Position {
    pub const ALL: [Position; POSITION_COUNT] = [
        Position::GK,
        Position::DL,
        Position::DC,
        Position::DR,
        Position::DML,
        Position::DMC,
        Position::DMR,
        Position::ML,
        Position::MC,
        Position::MR,
        Position::OML,
        Position::OMC,
        Position::OMR,
        Position::FC,
    ];

    /// Positions that take part in the formation matrices.
    pub const OUTFIELD: [Position; 13] = [
        Position::DL,
        Position::DC,
        Position::DR,
        Position::DML,
        Position::DMC,
        Position::DMR,
        Position::ML,
        Position::MC,
        Position::MR,
        Position::OML,
        Position::OMC,
        Position::OMR,
        Position::FC,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn code(self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::DL => "DL",
            Position::DC => "DC",
            Position::DR => "DR",
            Position::DML => "DML",
            Position::DMC => "DMC",
            Position::DMR => "DMR",
            Position::ML => "ML",
            Position::MC => "MC",
            Position::MR => "MR",
            Position::OML => "OML",
            Position::OMC => "OMC",
            Position::OMR => "OMR",
            Position::FC => "FC",
        }
    }

    pub fn is_goalkeeper(self) -> bool {
        self == Position::GK
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Position::ALL
            .iter()
            .copied()
            .find(|pos| pos.code() == code)
            .ok_or_else(|| MatchError::UnknownPosition(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("DMC".parse::<Position>().unwrap(), Position::DMC);
        assert_eq!(" fc ".parse::<Position>().unwrap(), Position::FC);
        assert!(matches!("ST".parse::<Position>(), Err(MatchError::UnknownPosition(_))));
    }

    #[test]
    fn test_outfield_excludes_goalkeeper() {
        assert!(!Position::OUTFIELD.contains(&Position::GK));
        assert_eq!(Position::OUTFIELD.len() + 1, Position::ALL.len());
    }

    #[test]
    fn test_display_round_trips() {
        for pos in Position::ALL {
            assert_eq!(pos.to_string().parse::<Position>().unwrap(), pos);
        }
    }
}
