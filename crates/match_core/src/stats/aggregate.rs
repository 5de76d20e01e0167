//! Reduce an event log into `MatchStatsV2`.

use std::collections::BTreeMap;

use tracing::trace;

use super::counters::{AssistType, ShotType};
use super::match_stats::{MatchStatsV2, Outcome};
use crate::engine::evaluation::Evaluation;
use crate::engine::events::{LogEntry, MatchEvent, Participant, Side};
use crate::engine::formulas::{ChanceType, FinishType};
use crate::models::Team;

/// Single pass over `log`. Every roster player gets an entry even when the
/// log never mentions them.
pub fn aggregate(log: &[LogEntry], home: &Team, away: &Team) -> MatchStatsV2 {
    let mut agg = Aggregator {
        home,
        away,
        stats: MatchStatsV2::new(home, away),
        last_creation: BTreeMap::new(),
        corner_creator: BTreeMap::new(),
    };
    for entry in log {
        agg.apply(entry);
    }
    agg.finish()
}

struct Aggregator<'t> {
    home: &'t Team,
    away: &'t Team,
    stats: MatchStatsV2,
    /// Open-play creations, for assist credit.
    last_creation: BTreeMap<(u16, Side), (String, ChanceType)>,
    corner_creator: BTreeMap<(u16, Side), String>,
}

impl<'t> Aggregator<'t> {
    fn team(&self, side: Side) -> &'t Team {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    fn name(&self, side: Side) -> &'t str {
        &self.team(side).name
    }

    fn apply(&mut self, entry: &LogEntry) {
        let minute = entry.minute;
        let event = &entry.event;
        trace!(minute, section = event.section(), tag = event.tag(), "aggregate");

        if let (Some(eval), Some((initiator, opponent))) = (event.evaluation(), event.participants()) {
            self.credit_skills(eval, initiator, opponent);
        }

        match event {
            MatchEvent::Creation { side, creator, defender, chance, counter, eval, .. } => {
                let (atk, def) = (self.name(*side), self.name(side.opponent()));
                self.stats.team_mut(atk).creator_off.attempt(*chance);
                self.stats.team_mut(def).creator_def.attempt(*chance);
                self.stats.player_mut(atk, creator).creator_off.attempt(*chance);
                self.stats.player_mut(def, defender).creator_def.attempt(*chance);
                if eval.success {
                    self.stats.team_mut(atk).creator_off.succeed(*chance);
                    self.stats.player_mut(atk, creator).creator_off.succeed(*chance);
                    if !*counter {
                        self.last_creation.insert((minute, *side), (creator.clone(), *chance));
                    }
                } else {
                    self.stats.team_mut(def).creator_def.succeed(*chance);
                    self.stats.player_mut(def, defender).creator_def.succeed(*chance);
                }
            }
            MatchEvent::GoalkeeperIntercept { side, goalkeeper, chance, eval, .. } => {
                let def = self.name(side.opponent());
                let gk = &mut self.stats.player_mut(def, goalkeeper).goalkeeper_stats;
                gk.intercept_attempts_by_type.add(*chance);
                if eval.success {
                    gk.intercept_successes_by_type.add(*chance);
                }
            }
            MatchEvent::Finish { side, finisher, defender, finish, eval } => {
                self.finish_duel(*side, finisher, defender, *finish, eval.success);
            }
            MatchEvent::ShotQuality { side, finisher, finish, eval, .. } => {
                self.shot(*side, finisher, (*finish).into(), eval.success);
            }
            MatchEvent::Save { side, finisher, goalkeeper, finish, eval } => {
                self.save(*side, finisher, goalkeeper, (*finish).into(), eval.success);
                if !eval.success {
                    let assist = self.last_creation.get(&(minute, *side)).cloned();
                    if let Some((creator, chance)) = assist {
                        self.assist(*side, &creator, finisher, chance.into());
                    }
                }
            }
            MatchEvent::FinishOutcome { .. }
            | MatchEvent::CounterAttack { .. }
            | MatchEvent::PenaltyAwarded { .. }
            | MatchEvent::FreeKickAwarded { .. }
            | MatchEvent::CornerKick { .. }
            | MatchEvent::CornerFinishOutcome { .. } => {}

            MatchEvent::Penalty { side, taker, eval, .. } => self.shot(*side, taker, ShotType::Penalty, eval.success),
            MatchEvent::FreeKick { side, taker, eval, .. } => self.shot(*side, taker, ShotType::Freekick, eval.success),
            MatchEvent::PenaltySave { side, taker, goalkeeper, eval } => {
                self.save(*side, taker, goalkeeper, ShotType::Penalty, eval.success);
            }
            MatchEvent::FreeKickSave { side, taker, goalkeeper, eval } => {
                self.save(*side, taker, goalkeeper, ShotType::Freekick, eval.success);
            }

            MatchEvent::CornerGkIntercept { side, creator, goalkeeper, eval } => {
                let (atk, def) = (self.name(*side), self.name(side.opponent()));
                self.stats.player_mut(atk, creator).corners_taken += 1;
                let gk = &mut self.stats.player_mut(def, goalkeeper).goalkeeper_stats;
                gk.corner_intercepts_attempted += 1;
                if !eval.success {
                    gk.corner_intercepts_successful += 1;
                }
            }
            MatchEvent::CornerDelivery { side, creator, eval, .. } => {
                if eval.success {
                    let atk = self.name(*side);
                    self.stats.player_mut(atk, creator).corners_successful += 1;
                    self.corner_creator.insert((minute, *side), creator.clone());
                }
            }
            MatchEvent::CornerFinish { side, finisher, defender, eval } => {
                let atk = self.name(*side);
                let player = self.stats.player_mut(atk, finisher);
                player.corner_shots += 1;
                if eval.success {
                    player.corner_shots_success += 1;
                }
                self.finish_duel(*side, finisher, defender, FinishType::Header, eval.success);
            }
            MatchEvent::CornerShotQuality { side, finisher, finish, eval, .. } => {
                self.shot(*side, finisher, (*finish).into(), eval.success);
            }
            MatchEvent::CornerSave { side, finisher, goalkeeper, finish, eval } => {
                self.save(*side, finisher, goalkeeper, (*finish).into(), eval.success);
                if !eval.success {
                    let atk = self.name(*side);
                    self.stats.player_mut(atk, finisher).corner_goals += 1;
                    if let Some(creator) = self.corner_creator.get(&(minute, *side)).cloned() {
                        self.assist(*side, &creator, finisher, AssistType::Corner);
                    }
                }
            }
        }
    }

    fn finish_duel(&mut self, side: Side, finisher: &str, defender: &str, finish: FinishType, success: bool) {
        let (atk, def) = (self.name(side), self.name(side.opponent()));
        self.stats.team_mut(atk).finisher_off.attempt(finish);
        self.stats.team_mut(def).finisher_def.attempt(finish);
        self.stats.player_mut(atk, finisher).finisher_off.attempt(finish);
        self.stats.player_mut(def, defender).finisher_def.attempt(finish);
        if success {
            self.stats.team_mut(atk).finisher_off.succeed(finish);
            self.stats.player_mut(atk, finisher).finisher_off.succeed(finish);
        } else {
            self.stats.team_mut(def).finisher_def.succeed(finish);
            self.stats.player_mut(def, defender).finisher_def.succeed(finish);
        }
    }

    /// A shot by `shooter`, mirrored onto the defending side's keeper.
    fn shot(&mut self, side: Side, shooter: &str, kind: ShotType, on_target: bool) {
        let (atk, def) = (self.name(side), self.name(side.opponent()));
        self.stats.team_mut(atk).shooting.shot(kind, on_target);
        self.stats.player_mut(atk, shooter).shooting.shot(kind, on_target);

        let keeper = &self.team(side.opponent()).goalkeeper().name;
        let gk = &mut self.stats.player_mut(def, keeper).goalkeeper_stats;
        gk.shots_conceded_by_type.add(kind);
        if on_target {
            gk.shots_on_target_by_type.add(kind);
        }
    }

    fn save(&mut self, side: Side, shooter: &str, goalkeeper: &str, kind: ShotType, saved: bool) {
        let (atk, def) = (self.name(side), self.name(side.opponent()));
        if saved {
            self.stats.player_mut(def, goalkeeper).goalkeeper_stats.saves_by_type.add(kind);
        } else {
            self.stats.team_mut(atk).shooting.goal(kind);
            self.stats.player_mut(atk, shooter).shooting.goal(kind);
        }
    }

    fn assist(&mut self, side: Side, creator: &str, scorer: &str, kind: AssistType) {
        if creator != scorer {
            let atk = self.name(side);
            self.stats.player_mut(atk, creator).assists_by_type.add(kind);
        }
    }

    /// Both teams take the full skill list; each player drops the
    /// goalkeeper-only skills unless they play in goal.
    fn credit_skills(&mut self, eval: &Evaluation, initiator: Participant<'_>, opponent: Participant<'_>) {
        let event = eval.event;
        for side in [Side::Home, Side::Away] {
            let name = self.name(side);
            let team = self.stats.team_mut(name);
            for skill in &eval.skills_used {
                team.skill_usage.add(*skill, event);
            }
            for (skill, weight) in event.skill_weights() {
                team.weighted_skill_usage.add(*skill, event, *weight);
            }
        }

        for participant in [initiator, opponent] {
            let team = self.name(participant.side);
            let player = self.stats.player_mut(team, participant.name);
            let keeper = player.is_goalkeeper();
            for skill in eval.skills_used.iter().filter(|s| keeper || !s.is_goalkeeper_only()) {
                player.skill_usage.add(*skill, event);
            }
            for (skill, weight) in event.skill_weights().iter().filter(|(s, _)| keeper || !s.is_goalkeeper_only()) {
                player.weighted_skill_usage.add(*skill, event, *weight);
            }
        }
    }

    fn finish(mut self) -> MatchStatsV2 {
        let (home_goals, away_goals) = self.stats.score();
        for (side, goals_for, goals_against) in [(Side::Home, home_goals, away_goals), (Side::Away, away_goals, home_goals)] {
            let name = self.name(side);
            let team = self.stats.team_mut(name);
            team.result_frequency.add(Outcome::from_score(goals_for, goals_against));
            team.score_frequency.add(format!("{goals_for}-{goals_against}"));
        }
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluation::CritLevel;
    use crate::engine::formulas::EventType;
    use crate::engine::match_sim::MatchSimulator;
    use crate::models::team::fixtures::uniform_team;
    use crate::models::{Attribute, GK_ONLY_SKILLS};

    fn eval(event: EventType, success: bool) -> Evaluation {
        Evaluation { event, success, prob: 0.5, raw_score: 0.0, crit: CritLevel::None, skills_used: event.skills_used() }
    }

    fn at(minute: u16, event: MatchEvent) -> LogEntry {
        LogEntry { minute, event }
    }

    fn teams() -> (Team, Team) {
        (uniform_team("A", 10), uniform_team("B", 10))
    }

    #[test]
    fn test_open_play_goal_credits_assist() {
        let (home, away) = teams();
        let log = vec![
            at(3, MatchEvent::Creation {
                side: Side::Home,
                creator: "A 5".into(),
                defender: "B 2".into(),
                chance: ChanceType::Through,
                critical: false,
                counter: false,
                eval: eval(EventType::Through, true),
            }),
            at(3, MatchEvent::Finish {
                side: Side::Home,
                finisher: "A 9".into(),
                defender: "B 3".into(),
                finish: FinishType::Chip,
                eval: eval(EventType::ThroughFinisher, true),
            }),
            at(3, MatchEvent::ShotQuality {
                side: Side::Home,
                finisher: "A 9".into(),
                defender: "B 3".into(),
                finish: FinishType::Chip,
                eval: eval(EventType::Chip, true),
            }),
            at(3, MatchEvent::Save {
                side: Side::Home,
                finisher: "A 9".into(),
                goalkeeper: "B 0".into(),
                finish: FinishType::Chip,
                eval: eval(EventType::ChipSave, false),
            }),
        ];
        let stats = aggregate(&log, &home, &away);

        assert_eq!(stats.score(), (1, 0));
        assert_eq!(stats.player("A", "A 9").unwrap().goals(), 1);
        assert_eq!(stats.player("A", "A 5").unwrap().assists_by_type.get(&AssistType::Through), 1);
        assert_eq!(stats.team("A").unwrap().creator_off.successes(), 1);
        assert_eq!(stats.team("B").unwrap().creator_def.attempts(), 1);
        assert_eq!(stats.team("B").unwrap().creator_def.successes(), 0);
        assert_eq!(stats.team("B").unwrap().finisher_def.attempts(), 1);

        let keeper = &stats.player("B", "B 0").unwrap().goalkeeper_stats;
        assert_eq!(keeper.shots_conceded(), 1);
        assert_eq!(keeper.shots_on_target(), 1);
        assert_eq!(keeper.saves(), 0);

        assert_eq!(stats.team("A").unwrap().result_frequency.get(&Outcome::Win), 1);
        assert_eq!(stats.team("B").unwrap().score_frequency.get(&"0-1".to_string()), 1);
    }

    #[test]
    fn test_counter_goal_credits_no_assist() {
        let (home, away) = teams();
        let log = vec![
            at(10, MatchEvent::Creation {
                side: Side::Away,
                creator: "B 8".into(),
                defender: "A 3".into(),
                chance: ChanceType::Solo,
                critical: false,
                counter: true,
                eval: eval(EventType::Solo, true),
            }),
            at(10, MatchEvent::Save {
                side: Side::Away,
                finisher: "B 10".into(),
                goalkeeper: "A 0".into(),
                finish: FinishType::Power,
                eval: eval(EventType::PowerSave, false),
            }),
        ];
        let stats = aggregate(&log, &home, &away);
        assert_eq!(stats.score(), (0, 1));
        assert_eq!(stats.player("B", "B 8").unwrap().assists(), 0);
    }

    #[test]
    fn test_failed_creation_is_a_defensive_success() {
        let (home, away) = teams();
        let log = vec![at(1, MatchEvent::Creation {
            side: Side::Home,
            creator: "A 6".into(),
            defender: "B 4".into(),
            chance: ChanceType::Short,
            critical: false,
            counter: false,
            eval: eval(EventType::Short, false),
        })];
        let stats = aggregate(&log, &home, &away);
        let defender = stats.player("B", "B 4").unwrap();
        assert_eq!(defender.creator_def.attempt_by_type.get(&ChanceType::Short), 1);
        assert_eq!(defender.creator_def.success_by_type.get(&ChanceType::Short), 1);
        assert_eq!(stats.player("A", "A 6").unwrap().creator_off.successes(), 0);
    }

    #[test]
    fn test_set_piece_bookkeeping() {
        let (home, away) = teams();
        let log = vec![
            at(44, MatchEvent::Penalty {
                side: Side::Away,
                taker: "B 9".into(),
                goalkeeper: "A 0".into(),
                eval: eval(EventType::Penalty, true),
            }),
            at(44, MatchEvent::PenaltySave {
                side: Side::Away,
                taker: "B 9".into(),
                goalkeeper: "A 0".into(),
                eval: eval(EventType::PenaltySave, true),
            }),
            at(60, MatchEvent::FreeKick {
                side: Side::Away,
                taker: "B 7".into(),
                goalkeeper: "A 0".into(),
                eval: eval(EventType::Freekick, false),
            }),
        ];
        let stats = aggregate(&log, &home, &away);
        let shooting = &stats.team("B").unwrap().shooting;
        assert_eq!(shooting.shots_by_type.get(&ShotType::Penalty), 1);
        assert_eq!(shooting.shots_on_by_type.get(&ShotType::Penalty), 1);
        assert_eq!(shooting.shots_by_type.get(&ShotType::Freekick), 1);
        assert_eq!(shooting.shots_on_by_type.get(&ShotType::Freekick), 0);
        assert_eq!(shooting.goals(), 0);

        let keeper = &stats.player("A", "A 0").unwrap().goalkeeper_stats;
        assert_eq!(keeper.saves_by_type.get(&ShotType::Penalty), 1);
        assert_eq!(keeper.shots_conceded(), 2);
        assert_eq!(keeper.shots_on_target(), 1);
    }

    #[test]
    fn test_corner_bookkeeping_and_assist() {
        let (home, away) = teams();
        let log = vec![
            at(70, MatchEvent::CornerKick { side: Side::Home }),
            at(70, MatchEvent::CornerGkIntercept {
                side: Side::Home,
                creator: "A 7".into(),
                goalkeeper: "B 0".into(),
                eval: eval(EventType::GkCorner, true),
            }),
            at(70, MatchEvent::CornerDelivery {
                side: Side::Home,
                creator: "A 7".into(),
                defender: "B 2".into(),
                critical: false,
                eval: eval(EventType::Corner, true),
            }),
            at(70, MatchEvent::CornerFinish {
                side: Side::Home,
                finisher: "A 3".into(),
                defender: "B 2".into(),
                eval: eval(EventType::HeaderDuel, true),
            }),
            at(70, MatchEvent::CornerShotQuality {
                side: Side::Home,
                finisher: "A 3".into(),
                defender: "B 2".into(),
                finish: FinishType::Header,
                eval: eval(EventType::Header, true),
            }),
            at(70, MatchEvent::CornerSave {
                side: Side::Home,
                finisher: "A 3".into(),
                goalkeeper: "B 0".into(),
                finish: FinishType::Header,
                eval: eval(EventType::HeaderSave, false),
            }),
        ];
        let stats = aggregate(&log, &home, &away);

        let taker = stats.player("A", "A 7").unwrap();
        assert_eq!((taker.corners_taken, taker.corners_successful), (1, 1));
        assert_eq!(taker.assists_by_type.get(&AssistType::Corner), 1);

        let scorer = stats.player("A", "A 3").unwrap();
        assert_eq!((scorer.corner_shots, scorer.corner_shots_success, scorer.corner_goals), (1, 1, 1));
        assert_eq!(scorer.shooting.goals_by_type.get(&ShotType::Header), 1);

        let keeper = &stats.player("B", "B 0").unwrap().goalkeeper_stats;
        assert_eq!((keeper.corner_intercepts_attempted, keeper.corner_intercepts_successful), (1, 0));
        assert_eq!(stats.score(), (1, 0));
    }

    #[test]
    fn test_skill_filter_keeps_keeper_skills_off_outfielders() {
        let (home, away) = teams();
        let log = vec![at(5, MatchEvent::Save {
            side: Side::Home,
            finisher: "A 9".into(),
            goalkeeper: "B 0".into(),
            finish: FinishType::Power,
            eval: eval(EventType::PowerSave, true),
        })];
        let stats = aggregate(&log, &home, &away);
        let reflexes = |team: &str, player: &str| stats.player(team, player).unwrap().skill_usage.total(Attribute::Reflexes);
        assert_eq!(reflexes("B", "B 0"), 1);
        assert_eq!(reflexes("A", "A 9"), 0);
        assert_eq!(stats.team("A").unwrap().skill_usage.total(Attribute::Reflexes), 1);
    }

    #[test]
    fn test_simulated_match_invariants() {
        let (home, away) = teams();
        let mut sim = MatchSimulator::new(home.clone(), away.clone(), 90, 7).unwrap();
        let stats = aggregate(sim.run(), &home, &away);

        for team in stats.team.values() {
            for kind in team.shooting.shots_by_type.iter().map(|(k, _)| *k) {
                let s = &team.shooting;
                assert!(s.goals_by_type.get(&kind) <= s.shots_on_by_type.get(&kind));
                assert!(s.shots_on_by_type.get(&kind) <= s.shots_by_type.get(&kind));
            }
            assert_eq!(team.matches(), 1);
        }
        for player in stats.player.values().flat_map(|p| p.values()).filter(|p| !p.is_goalkeeper()) {
            for skill in GK_ONLY_SKILLS {
                assert_eq!(player.skill_usage.total(skill), 0, "{} used {skill:?}", player.name);
            }
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::engine::match_sim::MatchSimulator;
    use crate::models::team::fixtures::uniform_team;
    use proptest::prelude::*;

    fn simulated(seed: u64) -> MatchStatsV2 {
        let (home, away) = (uniform_team("A", 12), uniform_team("B", 9));
        let log = MatchSimulator::new(home.clone(), away.clone(), 30, seed).map(|mut sim| sim.run().to_vec()).unwrap_or_default();
        aggregate(&log, &home, &away)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_merge_is_associative_and_commutative(a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
            let (a, b, c) = (simulated(a), simulated(b), simulated(c));

            let mut ab_c = a.clone();
            ab_c.merge(&b);
            ab_c.merge(&c);

            let mut bc = b.clone();
            bc.merge(&c);
            let mut a_bc = a.clone();
            a_bc.merge(&bc);

            let mut ac = a.clone();
            ac.merge(&c);
            let mut b_ac = b.clone();
            b_ac.merge(&ac);

            prop_assert_eq!(&ab_c, &a_bc);
            prop_assert_eq!(&ab_c, &b_ac);
        }
    }
}
