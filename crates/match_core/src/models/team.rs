use serde::Serialize;
use std::collections::BTreeSet;

use super::player::Player;
use super::position::Position;
use crate::error::{MatchError, Result};

pub const SQUAD_SIZE: usize = 11;

/// A validated starting eleven. Construction is the only place the 11-player,
/// one-goalkeeper rule is checked; a `Team` value always satisfies it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub name: String,
    players: Vec<Player>,
    goalkeeper: usize,
    corner_taker: Option<usize>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Result<Self> {
        let name = name.into();

        if players.len() != SQUAD_SIZE {
            return Err(MatchError::InvalidTeamSize {
                team: name,
                expected: SQUAD_SIZE,
                found: players.len(),
            });
        }

        let keepers: Vec<usize> = players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_goalkeeper)
            .map(|(i, _)| i)
            .collect();
        if keepers.len() != 1 {
            return Err(MatchError::InvalidGoalkeeperCount { team: name, found: keepers.len() });
        }

        let mut seen = BTreeSet::new();
        for player in &players {
            player.validate()?;
            if !seen.insert(player.name.as_str()) {
                return Err(MatchError::DuplicatePlayer { team: name, player: player.name.clone() });
            }
        }

        Ok(Self { name, goalkeeper: keepers[0], players, corner_taker: None })
    }

    /// Designate the player who takes this team's corners.
    pub fn with_corner_taker(mut self, player: &str) -> Result<Self> {
        let idx = self.players.iter().position(|p| p.name == player).ok_or_else(|| {
            MatchError::UnknownCornerTaker { team: self.name.clone(), player: player.to_string() }
        })?;
        self.corner_taker = Some(idx);
        Ok(self)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn goalkeeper(&self) -> &Player {
        &self.players[self.goalkeeper]
    }

    pub fn corner_taker(&self) -> Option<&Player> {
        self.corner_taker.map(|idx| &self.players[idx])
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn players_at(&self, position: Position) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter().filter(move |p| p.position == position)
    }

    pub fn count_at(&self, position: Position) -> usize {
        self.players_at(position).count()
    }

    pub fn outfield_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter().filter(|p| !p.is_goalkeeper)
    }

    /// Distinct positions occupied, in position order. Includes `GK`.
    pub fn positions(&self) -> Vec<Position> {
        let set: BTreeSet<Position> = self.players.iter().map(|p| p.position).collect();
        set.into_iter().collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn squad(shape: &[Position]) -> Vec<Player> {
        shape
            .iter()
            .enumerate()
            .map(|(i, pos)| Player::uniform(format!("P{i}"), *pos, 10).unwrap())
            .collect()
    }

    #[test]
    fn test_valid_team() {
        let team = uniform_team("Home", 10);
        assert_eq!(team.players().len(), 11);
        assert_eq!(team.goalkeeper().position, Position::GK);
        assert_eq!(team.count_at(Position::DC), 2);
        assert_eq!(team.positions().first(), Some(&Position::GK));
        assert!(team.corner_taker().is_none());
    }

    #[test]
    fn test_rejects_wrong_squad_size() {
        let err = Team::new("Short", squad(&FOUR_FOUR_TWO[..10])).unwrap_err();
        assert!(matches!(err, MatchError::InvalidTeamSize { found: 10, .. }));

        let mut twelve = FOUR_FOUR_TWO.to_vec();
        twelve.push(Position::OMC);
        let err = Team::new("Long", squad(&twelve)).unwrap_err();
        assert!(matches!(err, MatchError::InvalidTeamSize { found: 12, .. }));
    }

    #[test]
    fn test_rejects_goalkeeper_count() {
        let mut none = FOUR_FOUR_TWO;
        none[0] = Position::OMC;
        let err = Team::new("NoKeeper", squad(&none)).unwrap_err();
        assert!(matches!(err, MatchError::InvalidGoalkeeperCount { found: 0, .. }));

        let mut two = FOUR_FOUR_TWO;
        two[10] = Position::GK;
        let err = Team::new("TwoKeepers", squad(&two)).unwrap_err();
        assert!(matches!(err, MatchError::InvalidGoalkeeperCount { found: 2, .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let mut players = squad(&FOUR_FOUR_TWO);
        players[5].name = players[4].name.clone();
        let err = Team::new("Dupes", players).unwrap_err();
        assert!(matches!(err, MatchError::DuplicatePlayer { .. }));
    }

    #[test]
    fn test_corner_taker_must_be_in_squad() {
        let team = uniform_team("Home", 10);
        let team = team.with_corner_taker("Home 5").unwrap();
        assert_eq!(team.corner_taker().map(|p| p.name.as_str()), Some("Home 5"));

        let err = uniform_team("Home", 10).with_corner_taker("Nobody").unwrap_err();
        assert!(matches!(err, MatchError::UnknownCornerTaker { .. }));
    }
}
