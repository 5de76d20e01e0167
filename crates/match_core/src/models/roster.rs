//! Serde input shapes for rosters read from JSON or YAML.
//!
//! Names use the display strings ("DMC", "Ball Control", "One-on-One"); all
//! validation happens in the `TryFrom` conversions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::attributes::{Attribute, AttributeSet};
use super::player::Player;
use super::position::Position;
use super::team::Team;
use crate::error::{MatchError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterFile {
    pub home_team: TeamData,
    pub away_team: TeamData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamData {
    pub name: String,
    pub players: Vec<PlayerData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_taker: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerData {
    pub name: String,
    pub position: String,
    pub attributes: BTreeMap<String, u8>,
    /// Derived from the position when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_goalkeeper: Option<bool>,
    #[serde(default)]
    pub minutes_played: u16,
}

impl RosterFile {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn into_teams(self) -> Result<(Team, Team)> {
        Ok((Team::try_from(self.home_team)?, Team::try_from(self.away_team)?))
    }
}

impl TryFrom<PlayerData> for Player {
    type Error = MatchError;

    fn try_from(data: PlayerData) -> Result<Self> {
        let position: Position = data.position.parse()?;
        let attributes = data
            .attributes
            .iter()
            .map(|(name, value)| Ok((name.parse::<Attribute>()?, *value)))
            .collect::<Result<AttributeSet>>()?;
        let is_goalkeeper = data.is_goalkeeper.unwrap_or_else(|| position.is_goalkeeper());
        Ok(Player::new(data.name, position, attributes, is_goalkeeper)?
            .with_minutes_played(data.minutes_played))
    }
}

impl TryFrom<TeamData> for Team {
    type Error = MatchError;

    fn try_from(data: TeamData) -> Result<Self> {
        let players = data.players.into_iter().map(Player::try_from).collect::<Result<Vec<_>>>()?;
        let team = Team::new(data.name, players)?;
        match data.corner_taker {
            Some(taker) => team.with_corner_taker(&taker),
            None => Ok(team),
        }
    }
}

impl From<&Player> for PlayerData {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            position: player.position.code().to_string(),
            attributes: player
                .attributes()
                .iter()
                .map(|(attr, value)| (attr.name().to_string(), value))
                .collect(),
            is_goalkeeper: Some(player.is_goalkeeper),
            minutes_played: player.minutes_played,
        }
    }
}

impl From<&Team> for TeamData {
    fn from(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            players: team.players().iter().map(PlayerData::from).collect(),
            corner_taker: team.corner_taker().map(|p| p.name.clone()),
        }
    }
}
