//! Monte Carlo runs of one fixture.
//!
//! Matches are independent, so they run on the rayon pool. Match `i` is
//! seeded with `base_seed + i`; since merging is order-free the report does
//! not depend on thread scheduling.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::config::SimConfig;
use super::match_sim::MatchSimulator;
use crate::error::{MatchError, Result};
use crate::models::Team;
use crate::stats::{aggregate, MatchStatsV2, Tally};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub matches: u64,
    pub home_wins: u64,
    pub away_wins: u64,
    pub draws: u64,
    pub home_goals_avg: f64,
    pub away_goals_avg: f64,
    /// Final scores keyed "home-away".
    pub score_frequency: Tally<String>,
    pub stats: MatchStatsV2,
}

impl BatchReport {
    pub fn home_win_rate(&self) -> f64 {
        rate(self.home_wins, self.matches)
    }

    pub fn away_win_rate(&self) -> f64 {
        rate(self.away_wins, self.matches)
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.matches)
    }

    /// Most frequent final scores, ties broken by score label.
    pub fn top_scores(&self, n: usize) -> Vec<(&str, u64)> {
        let mut scores: Vec<(&str, u64)> = self.score_frequency.iter().map(|(s, c)| (s.as_str(), c)).collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        scores.truncate(n);
        scores
    }
}

fn rate(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

pub fn simulate_batch(
    home: &Team,
    away: &Team,
    minutes: u16,
    matches: u32,
    base_seed: u64,
    config: &SimConfig,
) -> Result<BatchReport> {
    if matches == 0 {
        return Err(MatchError::InvalidConfig("batch needs at least one match".into()));
    }
    config.validate()?;
    debug!(home = %home.name, away = %away.name, matches, minutes, base_seed, "batch started");

    let per_match: Vec<MatchStatsV2> = (0..matches)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(u64::from(i));
            let mut sim = MatchSimulator::new(home.clone(), away.clone(), minutes, seed)?.with_config(config.clone())?;
            Ok(aggregate(sim.run(), home, away))
        })
        .collect::<Result<_>>()?;

    let mut report = BatchReport {
        matches: u64::from(matches),
        home_wins: 0,
        away_wins: 0,
        draws: 0,
        home_goals_avg: 0.0,
        away_goals_avg: 0.0,
        score_frequency: Tally::default(),
        stats: MatchStatsV2::default(),
    };
    let (mut home_goals, mut away_goals) = (0u64, 0u64);
    for stats in &per_match {
        let (h, a) = stats.score();
        home_goals += h;
        away_goals += a;
        match h.cmp(&a) {
            std::cmp::Ordering::Greater => report.home_wins += 1,
            std::cmp::Ordering::Less => report.away_wins += 1,
            std::cmp::Ordering::Equal => report.draws += 1,
        }
        report.score_frequency.add(format!("{h}-{a}"));
        report.stats.merge(stats);
    }
    report.home_goals_avg = home_goals as f64 / report.matches as f64;
    report.away_goals_avg = away_goals as f64 / report.matches as f64;

    debug!(
        matches = report.matches,
        home_wins = report.home_wins,
        away_wins = report.away_wins,
        draws = report.draws,
        "batch finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team::fixtures::uniform_team;

    #[test]
    fn test_batch_counts_add_up() {
        let (home, away) = (uniform_team("A", 10), uniform_team("B", 10));
        let report = simulate_batch(&home, &away, 90, 40, 100, &SimConfig::default()).unwrap();

        assert_eq!(report.matches, 40);
        assert_eq!(report.home_wins + report.away_wins + report.draws, 40);
        assert_eq!(report.score_frequency.total(), 40);
        assert_eq!(report.stats.team("A").unwrap().matches(), 40);
        let (h, a) = report.stats.score();
        assert!((report.home_goals_avg - h as f64 / 40.0).abs() < 1e-12);
        assert!((report.away_goals_avg - a as f64 / 40.0).abs() < 1e-12);
        assert!((report.home_win_rate() + report.away_win_rate() + report.draw_rate() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let (home, away) = (uniform_team("A", 11), uniform_team("B", 9));
        let config = SimConfig::default();
        let first = simulate_batch(&home, &away, 45, 25, 7, &config).unwrap();
        let second = simulate_batch(&home, &away, 45, 25, 7, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let (home, away) = (uniform_team("A", 10), uniform_team("B", 10));
        let report = simulate_batch(&home, &away, 30, 5, 1000, &SimConfig::default()).unwrap();

        let mut expected = MatchStatsV2::default();
        for i in 0..5 {
            let mut sim = MatchSimulator::new(home.clone(), away.clone(), 30, 1000 + i).unwrap();
            expected.merge(&aggregate(sim.run(), &home, &away));
        }
        assert_eq!(report.stats, expected);
    }

    #[test]
    fn test_batch_rejects_bad_input() {
        let (home, away) = (uniform_team("A", 10), uniform_team("B", 10));
        assert!(simulate_batch(&home, &away, 90, 0, 1, &SimConfig::default()).is_err());
        assert!(matches!(
            simulate_batch(&home, &away, 0, 3, 1, &SimConfig::default()),
            Err(MatchError::InvalidMinutes(0))
        ));
    }

    #[test]
    fn test_top_scores_ordering() {
        let (home, away) = (uniform_team("A", 10), uniform_team("B", 10));
        let report = simulate_batch(&home, &away, 90, 30, 3, &SimConfig::default()).unwrap();
        let top = report.top_scores(3);
        assert!(top.len() <= 3);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }
}
