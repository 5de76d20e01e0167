//! Penalties and free kicks.
//!
//! Both are shot at the keeper directly: the kick decides whether the ball is
//! on target, then the keeper tries to save it.

use rand::Rng;

use super::{Fixture, Play};
use crate::engine::events::{MatchEvent, SetPiecePhase};
use crate::engine::formulas::EventType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetPiece {
    Penalty,
    FreeKick,
}

impl<'a, R: Rng> Play<'a, R> {
    /// Roll for a penalty, then a free kick. Plays the first one awarded and
    /// reports whether the move ended.
    pub(super) fn set_piece_awarded(&mut self, fx: Fixture<'a>, phase: SetPiecePhase) -> bool {
        let (penalty, free_kick) = match phase {
            SetPiecePhase::DuringCreation => (self.config.penalty_during_creation, self.config.free_kick_during_creation),
            SetPiecePhase::DuringFinish => (self.config.penalty_during_finish, self.config.free_kick_during_finish),
        };

        if self.roll(penalty) {
            self.record(MatchEvent::PenaltyAwarded { side: fx.side, phase });
            self.take_set_piece(fx, SetPiece::Penalty);
            true
        } else if self.roll(free_kick) {
            self.record(MatchEvent::FreeKickAwarded { side: fx.side, phase });
            self.take_set_piece(fx, SetPiece::FreeKick);
            true
        } else {
            false
        }
    }

    fn take_set_piece(&mut self, fx: Fixture<'a>, kind: SetPiece) {
        let Some(taker) = self.set_piece_taker(fx.attack) else { return };
        let keeper = fx.defence.goalkeeper();
        let (side, taker_name, goalkeeper) = (fx.side, taker.name.clone(), keeper.name.clone());

        let (kick_event, save_event) = match kind {
            SetPiece::Penalty => (EventType::Penalty, EventType::PenaltySave),
            SetPiece::FreeKick => (EventType::Freekick, EventType::FreekickSave),
        };

        let kick = self.duel(kick_event, taker, keeper, 0.0);
        let on_target = kick.success;
        self.record(match kind {
            SetPiece::Penalty => MatchEvent::Penalty {
                side,
                taker: taker_name.clone(),
                goalkeeper: goalkeeper.clone(),
                eval: kick,
            },
            SetPiece::FreeKick => MatchEvent::FreeKick {
                side,
                taker: taker_name.clone(),
                goalkeeper: goalkeeper.clone(),
                eval: kick,
            },
        });
        if !on_target {
            return;
        }

        let save = self.duel(save_event, keeper, taker, 0.0);
        self.record(match kind {
            SetPiece::Penalty => MatchEvent::PenaltySave { side, taker: taker_name, goalkeeper, eval: save },
            SetPiece::FreeKick => MatchEvent::FreeKickSave { side, taker: taker_name, goalkeeper, eval: save },
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::config::SimConfig;
    use crate::engine::events::{LogEntry, MatchEvent, SetPiecePhase, Side};
    use crate::engine::match_sim::MatchSimulator;
    use crate::models::team::fixtures::uniform_team;

    fn run(config: SimConfig, seed: u64) -> Vec<LogEntry> {
        let mut sim = MatchSimulator::new(uniform_team("A", 12), uniform_team("B", 12), 120, seed)
            .unwrap()
            .with_config(config)
            .unwrap();
        sim.run().to_vec()
    }

    #[test]
    fn test_free_kick_during_finish() {
        let config = SimConfig {
            event_chance: 1.0,
            home_attack_chance: 1.0,
            free_kick_during_finish: 1.0,
            ..SimConfig::default()
        };
        let log = run(config, 31);
        let mut seen = 0;
        for (i, entry) in log.iter().enumerate() {
            if let MatchEvent::FreeKickAwarded { side, phase } = entry.event {
                seen += 1;
                assert_eq!(side, Side::Home);
                match &log[i + 1].event {
                    MatchEvent::FreeKick { taker, eval, .. } => {
                        assert!(!taker.ends_with(" 0"), "keeper took a free kick");
                        if eval.success {
                            assert!(matches!(log[i + 2].event, MatchEvent::FreeKickSave { .. }));
                        }
                    }
                    other => panic!("free kick award followed by {other:?}"),
                }
                if phase == SetPiecePhase::DuringFinish {
                    assert!(!matches!(log.get(i + 2).map(|e| &e.event), Some(MatchEvent::Finish { .. })));
                }
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn test_penalty_goals_are_unsaved_shots() {
        let config = SimConfig { event_chance: 1.0, penalty_during_creation: 1.0, ..SimConfig::default() };
        let log = run(config, 8);
        for (i, entry) in log.iter().enumerate() {
            if let MatchEvent::PenaltySave { taker, .. } = &entry.event {
                match &log[i - 1].event {
                    MatchEvent::Penalty { taker: kicker, eval, .. } => {
                        assert_eq!(kicker, taker);
                        assert!(eval.success);
                    }
                    other => panic!("penalty save after {other:?}"),
                }
            }
        }
        assert!(log.iter().any(|e| matches!(e.event, MatchEvent::PenaltySave { .. })));
    }
}
