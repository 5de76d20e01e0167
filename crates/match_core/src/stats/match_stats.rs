//! Team and player statistics for one or many matches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::counters::{
    AssistType, GoalkeeperStats, OffDefSplit, ShootingSplit, SkillUsage, Tally, WeightedSkillUsage,
};
use crate::engine::formulas::{ChanceType, FinishType};
use crate::models::{Position, Team};

/// Final result from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn from_score(goals_for: u64, goals_against: u64) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStatsV2 {
    pub name: String,
    pub creator_off: OffDefSplit<ChanceType>,
    pub creator_def: OffDefSplit<ChanceType>,
    pub finisher_off: OffDefSplit<FinishType>,
    pub finisher_def: OffDefSplit<FinishType>,
    pub shooting: ShootingSplit,
    pub skill_usage: SkillUsage,
    pub weighted_skill_usage: WeightedSkillUsage,
    /// One entry per aggregated match.
    pub result_frequency: Tally<Outcome>,
    /// Keyed "for-against".
    pub score_frequency: Tally<String>,
}

impl TeamStatsV2 {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn goals(&self) -> u64 {
        self.shooting.goals()
    }

    pub fn matches(&self) -> u64 {
        self.result_frequency.total()
    }

    pub fn merge(&mut self, other: &Self) {
        self.creator_off.merge(&other.creator_off);
        self.creator_def.merge(&other.creator_def);
        self.finisher_off.merge(&other.finisher_off);
        self.finisher_def.merge(&other.finisher_def);
        self.shooting.merge(&other.shooting);
        self.skill_usage.merge(&other.skill_usage);
        self.weighted_skill_usage.merge(&other.weighted_skill_usage);
        self.result_frequency.merge(&other.result_frequency);
        self.score_frequency.merge(&other.score_frequency);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatsV2 {
    pub name: String,
    pub team: String,
    pub position: Option<Position>,
    pub creator_off: OffDefSplit<ChanceType>,
    pub creator_def: OffDefSplit<ChanceType>,
    pub finisher_off: OffDefSplit<FinishType>,
    pub finisher_def: OffDefSplit<FinishType>,
    pub shooting: ShootingSplit,
    pub assists_by_type: Tally<AssistType>,
    pub skill_usage: SkillUsage,
    pub weighted_skill_usage: WeightedSkillUsage,
    pub goalkeeper_stats: GoalkeeperStats,

    // === Corners ===
    pub corners_taken: u64,
    pub corners_successful: u64,
    pub corner_shots: u64,
    pub corner_shots_success: u64,
    pub corner_goals: u64,
}

impl PlayerStatsV2 {
    pub fn new(name: impl Into<String>, team: impl Into<String>, position: Option<Position>) -> Self {
        Self { name: name.into(), team: team.into(), position, ..Self::default() }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position.is_some_and(Position::is_goalkeeper)
    }

    pub fn goals(&self) -> u64 {
        self.shooting.goals()
    }

    pub fn shots(&self) -> u64 {
        self.shooting.shots()
    }

    pub fn shots_on(&self) -> u64 {
        self.shooting.shots_on()
    }

    pub fn assists(&self) -> u64 {
        self.assists_by_type.total()
    }

    pub fn merge(&mut self, other: &Self) {
        if self.position.is_none() {
            self.position = other.position;
        }
        self.creator_off.merge(&other.creator_off);
        self.creator_def.merge(&other.creator_def);
        self.finisher_off.merge(&other.finisher_off);
        self.finisher_def.merge(&other.finisher_def);
        self.shooting.merge(&other.shooting);
        self.assists_by_type.merge(&other.assists_by_type);
        self.skill_usage.merge(&other.skill_usage);
        self.weighted_skill_usage.merge(&other.weighted_skill_usage);
        self.goalkeeper_stats.merge(&other.goalkeeper_stats);
        self.corners_taken += other.corners_taken;
        self.corners_successful += other.corners_successful;
        self.corner_shots += other.corner_shots;
        self.corner_shots_success += other.corner_shots_success;
        self.corner_goals += other.corner_goals;
    }
}

/// Statistics keyed by team name, then player name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatsV2 {
    pub home: String,
    pub away: String,
    pub team: BTreeMap<String, TeamStatsV2>,
    pub player: BTreeMap<String, BTreeMap<String, PlayerStatsV2>>,
}

impl MatchStatsV2 {
    /// Empty statistics with an entry for every player of both teams.
    pub fn new(home: &Team, away: &Team) -> Self {
        let mut stats = Self { home: home.name.clone(), away: away.name.clone(), ..Self::default() };
        for team in [home, away] {
            stats.team.insert(team.name.clone(), TeamStatsV2::new(&team.name));
            let players = team
                .players()
                .iter()
                .map(|p| (p.name.clone(), PlayerStatsV2::new(&p.name, &team.name, Some(p.position))))
                .collect();
            stats.player.insert(team.name.clone(), players);
        }
        stats
    }

    pub fn team(&self, name: &str) -> Option<&TeamStatsV2> {
        self.team.get(name)
    }

    pub fn player(&self, team: &str, name: &str) -> Option<&PlayerStatsV2> {
        self.player.get(team)?.get(name)
    }

    pub(crate) fn team_mut(&mut self, name: &str) -> &mut TeamStatsV2 {
        self.team.entry(name.to_string()).or_insert_with(|| TeamStatsV2::new(name))
    }

    /// Stats for `name`, created on first use for players outside the rosters.
    pub(crate) fn player_mut(&mut self, team: &str, name: &str) -> &mut PlayerStatsV2 {
        self.player
            .entry(team.to_string())
            .or_default()
            .entry(name.to_string())
            .or_insert_with(|| PlayerStatsV2::new(name, team, None))
    }

    /// (home goals, away goals).
    pub fn score(&self) -> (u64, u64) {
        let goals = |name: &str| self.team(name).map_or(0, TeamStatsV2::goals);
        (goals(&self.home), goals(&self.away))
    }

    /// Pointwise sum. Team labels are kept from `self` unless it has none.
    pub fn merge(&mut self, other: &Self) {
        if self.home.is_empty() && self.away.is_empty() {
            self.home = other.home.clone();
            self.away = other.away.clone();
        }
        for (name, stats) in &other.team {
            self.team.entry(name.clone()).or_insert_with(|| TeamStatsV2::new(name)).merge(stats);
        }
        for (team, players) in &other.player {
            let ours = self.player.entry(team.clone()).or_default();
            for (name, stats) in players {
                ours.entry(name.clone())
                    .or_insert_with(|| PlayerStatsV2::new(name, team, stats.position))
                    .merge(stats);
            }
        }
    }

    pub fn merged<'a>(stats: impl IntoIterator<Item = &'a MatchStatsV2>) -> MatchStatsV2 {
        let mut total = MatchStatsV2::default();
        for s in stats {
            total.merge(s);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team::fixtures::uniform_team;

    #[test]
    fn test_new_lists_every_player() {
        let stats = MatchStatsV2::new(&uniform_team("A", 10), &uniform_team("B", 10));
        assert_eq!(stats.team.len(), 2);
        assert_eq!(stats.player["A"].len(), 11);
        assert!(stats.player("A", "A 0").unwrap().is_goalkeeper());
        assert!(!stats.player("B", "B 5").unwrap().is_goalkeeper());
        assert_eq!(stats.score(), (0, 0));
    }

    #[test]
    fn test_outcome_from_score() {
        assert_eq!(Outcome::from_score(2, 1), Outcome::Win);
        assert_eq!(Outcome::from_score(1, 1), Outcome::Draw);
        assert_eq!(Outcome::from_score(0, 3), Outcome::Loss);
    }

    #[test]
    fn test_merge_into_empty_takes_labels() {
        let stats = MatchStatsV2::new(&uniform_team("A", 10), &uniform_team("B", 10));
        let mut total = MatchStatsV2::default();
        total.merge(&stats);
        assert_eq!(total, stats);
    }

    #[test]
    fn test_player_mut_creates_unknown_players() {
        let mut stats = MatchStatsV2::new(&uniform_team("A", 10), &uniform_team("B", 10));
        stats.player_mut("A", "Guest").corners_taken += 1;
        let guest = stats.player("A", "Guest").unwrap();
        assert_eq!(guest.position, None);
        assert!(!guest.is_goalkeeper());
    }
}
