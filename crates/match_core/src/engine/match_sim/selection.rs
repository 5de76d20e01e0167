//! Player selection for each stage of a move.
//!
//! Every pick degrades instead of failing: an empty or all-zero weight row
//! falls back to a uniform draw, and repeated misses fall back to a fixed or
//! random player.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Chance, Fixture, Play};
use crate::engine::formulas::ChanceType;
use crate::engine::matrices::{normalize, weighted_choice, WeightMap};
use crate::models::{Player, Position, Team};

/// Equal weight over `positions`.
pub(super) fn uniform_weights(positions: &[Position]) -> WeightMap<Position> {
    let share = 1.0 / positions.len().max(1) as f64;
    positions.iter().map(|p| (*p, share)).collect()
}

/// Top `size` players by aerial score, strongest first. Ties keep roster order.
pub(super) fn aerial_pool<'p>(team: &'p Team, exclude: Option<&Player>, size: usize) -> Vec<&'p Player> {
    let mut pool: Vec<&Player> = team
        .players()
        .iter()
        .filter(|p| exclude.map_or(true, |e| e.name != p.name))
        .collect();
    pool.sort_by_key(|p| std::cmp::Reverse(p.aerial_score()));
    pool.truncate(size);
    pool
}

impl<'a, R: Rng> Play<'a, R> {
    // ===========================================
    // Uniform picks
    // ===========================================

    /// Uniform pick among `team`'s players at `position`, skipping `exclude`.
    pub(super) fn player_at(&mut self, team: &'a Team, position: Position, exclude: Option<&Player>) -> Option<&'a Player> {
        let candidates: Vec<&'a Player> = team
            .players_at(position)
            .filter(|p| exclude.map_or(true, |e| e.name != p.name))
            .collect();
        candidates.choose(&mut *self.rng).copied()
    }

    pub(super) fn any_player(&mut self, team: &'a Team) -> Option<&'a Player> {
        team.players().choose(&mut *self.rng)
    }

    pub(super) fn any_of(&mut self, players: &[&'a Player]) -> Option<&'a Player> {
        players.choose(&mut *self.rng).copied()
    }

    /// Weighted draw, or a uniform key when nothing carries weight.
    fn draw_or_any<K: Clone + Ord>(&mut self, weights: &WeightMap<K>) -> Option<K> {
        if let Some(key) = weighted_choice(&mut *self.rng, weights) {
            return Some(key);
        }
        let keys: Vec<&K> = weights.keys().collect();
        keys.choose(&mut *self.rng).map(|k| (*k).clone())
    }

    // ===========================================
    // Stage picks
    // ===========================================

    /// Opponent contesting the creation, with the position it was drawn for.
    pub(super) fn creation_defender(&mut self, fx: Fixture<'a>, creator_pos: Position) -> Option<(&'a Player, Position)> {
        let row = fx.matrices.creation_defence.get(&creator_pos);
        let position = match row.and_then(|row| weighted_choice(&mut *self.rng, row)) {
            Some(position) => position,
            None => *fx.defence.positions().choose(&mut *self.rng)?,
        };
        let defender = match self.player_at(fx.defence, position, None) {
            Some(player) => player,
            None => self.any_player(fx.defence)?,
        };
        Some((defender, position))
    }

    /// Finisher for a created chance. Solo chances and empty rows keep the
    /// creator; otherwise another player is drawn, preferring other positions.
    pub(super) fn finisher(&mut self, fx: Fixture<'a>, chance: &Chance<'a>) -> (&'a Player, Position) {
        let keep_creator = (chance.creator, chance.creator_pos);
        if chance.kind == ChanceType::Solo {
            return keep_creator;
        }
        let Some(row) = fx.matrices.finisher_row(chance.kind, chance.creator_pos).filter(|r| !r.is_empty()) else {
            return keep_creator;
        };

        let mut candidates: WeightMap<Position> =
            row.iter().filter(|(pos, _)| **pos != chance.creator_pos).map(|(p, w)| (*p, *w)).collect();
        if candidates.is_empty() {
            candidates = row.clone();
        }

        for _ in 0..=self.config.selection_retries {
            let position = match weighted_choice(&mut *self.rng, &candidates) {
                Some(position) => position,
                None => match self.draw_or_any(row) {
                    Some(position) => position,
                    None => break,
                },
            };
            if let Some(finisher) = self.player_at(fx.attack, position, Some(chance.creator)) {
                return (finisher, position);
            }
        }
        keep_creator
    }

    /// Opponent contesting the finish. A creation defender who is the only
    /// player at their position is kept out of the draw.
    pub(super) fn finish_defender(
        &mut self,
        fx: Fixture<'a>,
        finisher_pos: Position,
        creation_defender: &'a Player,
        defender_pos: Position,
    ) -> &'a Player {
        let mut weights = fx.matrices.finish_defence.get(&finisher_pos).cloned().unwrap_or_default();
        let lone_defender = fx.defence.count_at(defender_pos) == 1;
        if lone_defender {
            if let Some(weight) = weights.get_mut(&defender_pos) {
                *weight = 0.0;
            }
        }
        let total: f64 = weights.values().sum();
        let weights = if total > 0.0 { normalize(&weights) } else { uniform_weights(&fx.defence.positions()) };

        for _ in 0..=self.config.selection_retries {
            let Some(position) = self.draw_or_any(&weights) else { break };
            let exclude = (lone_defender && position == defender_pos).then_some(creation_defender);
            if let Some(defender) = self.player_at(fx.defence, position, exclude) {
                return defender;
            }
        }
        self.any_player(fx.defence).unwrap_or(creation_defender)
    }

    /// Outfield player to take a penalty or free kick.
    pub(super) fn set_piece_taker(&mut self, team: &'a Team) -> Option<&'a Player> {
        let outfield: Vec<&'a Player> = team.outfield_players().collect();
        self.any_of(&outfield)
    }

    pub(super) fn corner_taker(&mut self, team: &'a Team) -> Option<&'a Player> {
        match team.corner_taker() {
            Some(taker) => Some(taker),
            None => self.any_player(team),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team::fixtures::FOUR_FOUR_TWO;
    use crate::models::Attribute;

    #[test]
    fn test_uniform_weights_sum_to_one() {
        let weights = uniform_weights(&[Position::GK, Position::DC, Position::FC]);
        assert_eq!(weights.len(), 3);
        assert!((weights.values().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(uniform_weights(&[]).is_empty());
    }

    #[test]
    fn test_aerial_pool_ranks_by_heading_and_jump_reach() {
        let mut players: Vec<Player> = FOUR_FOUR_TWO
            .iter()
            .enumerate()
            .map(|(i, pos)| Player::uniform(format!("P{i}"), *pos, 10).unwrap())
            .collect();
        players[9] = Player::new(
            "Tall",
            Position::FC,
            players[9].attributes().clone().with(Attribute::Heading, 20).with(Attribute::JumpReach, 19),
            false,
        )
        .unwrap();
        let team = Team::new("Aerial", players).unwrap();

        let pool = aerial_pool(&team, None, 5);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool[0].name, "Tall");

        let without = aerial_pool(&team, team.player("Tall"), 5);
        assert!(without.iter().all(|p| p.name != "Tall"));

        assert_eq!(aerial_pool(&team, None, 20).len(), 11);
    }
}
