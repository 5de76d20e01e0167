//! Minute-by-minute match simulation.
//!
//! Each minute may produce one attacking move:
//!
//! ```text
//! gate -> attacking side -> creator -> creation defender -> chance type
//!      -> creation duel ──fail──> (counter?)
//!      -> (penalty / free kick?) -> finisher -> (penalty / free kick?)
//!      -> finish defender -> finish type -> (keeper intercept?)
//!      -> finish duel ──fail──> (counter?)
//!      -> shot quality ──off──> miss
//!      -> save ──saved──> (corner?)
//! ```
//!
//! Matrices for both attacking directions are built once in the constructor.
//! Every draw comes from the simulator's own generator, so a seed fixes the
//! whole log.

mod corner;
mod counter;
mod selection;
mod set_pieces;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use super::config::SimConfig;
use super::evaluation::{evaluate, CritLevel, Evaluation};
use super::events::{CounterTrigger, LogEntry, MatchEvent, SetPiecePhase, Side};
use super::formulas::{ChanceType, EventType, FinishType};
use super::matrices::{chance_type_weights, finish_type_weights, weighted_choice, SideMatrices};
use crate::error::{MatchError, Result};
use crate::models::{Player, Position, Team};

pub const DEFAULT_MINUTES: u16 = 90;
pub const MAX_MINUTES: u16 = 120;

pub struct MatchSimulator<R = ChaCha8Rng> {
    home: Team,
    away: Team,
    minutes: u16,
    config: SimConfig,
    home_attack: SideMatrices,
    away_attack: SideMatrices,
    rng: R,
    log: Vec<LogEntry>,
}

impl MatchSimulator<ChaCha8Rng> {
    pub fn new(home: Team, away: Team, minutes: u16, seed: u64) -> Result<Self> {
        debug!(home = %home.name, away = %away.name, minutes, seed, "building match");
        Self::with_rng(home, away, minutes, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> MatchSimulator<R> {
    /// Simulator drawing from a caller-supplied generator.
    pub fn with_rng(home: Team, away: Team, minutes: u16, rng: R) -> Result<Self> {
        if !(1..=MAX_MINUTES).contains(&minutes) {
            return Err(MatchError::InvalidMinutes(minutes));
        }
        if home.name == away.name {
            return Err(MatchError::InvalidConfig(format!("both teams are named {}", home.name)));
        }

        let home_attack = SideMatrices::build(&home, &away);
        let away_attack = SideMatrices::build(&away, &home);
        Ok(Self {
            home,
            away,
            minutes,
            config: SimConfig::default(),
            home_attack,
            away_attack,
            rng,
            log: Vec::new(),
        })
    }

    pub fn with_config(mut self, config: SimConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn home(&self) -> &Team {
        &self.home
    }

    pub fn away(&self) -> &Team {
        &self.away
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Matrices used when `side` attacks.
    pub fn matrices(&self, side: Side) -> &SideMatrices {
        match side {
            Side::Home => &self.home_attack,
            Side::Away => &self.away_attack,
        }
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn into_log(self) -> Vec<LogEntry> {
        self.log
    }

    /// Play every minute from a clean log.
    pub fn run(&mut self) -> &[LogEntry] {
        self.log.clear();
        for minute in 1..=self.minutes {
            self.simulate_minute(minute);
        }

        let goals = self.log.iter().filter(|entry| entry.event.is_goal()).count();
        debug!(
            home = %self.home.name,
            away = %self.away.name,
            entries = self.log.len(),
            goals,
            "match finished"
        );
        &self.log
    }

    /// Resolve a single minute, appending to the log.
    pub fn simulate_minute(&mut self, minute: u16) {
        let Self { home, away, config, home_attack, away_attack, rng, log, .. } = self;
        let mut play = Play {
            minute,
            pitch: Pitch { home, away, home_attack, away_attack },
            config,
            rng,
            log,
        };
        play.play_minute();
    }
}

// ===========================================
// Per-minute state
// ===========================================

/// Both teams and both directions' matrices.
#[derive(Clone, Copy)]
struct Pitch<'a> {
    home: &'a Team,
    away: &'a Team,
    home_attack: &'a SideMatrices,
    away_attack: &'a SideMatrices,
}

impl<'a> Pitch<'a> {
    fn fixture(&self, side: Side) -> Fixture<'a> {
        match side {
            Side::Home => Fixture { side, attack: self.home, defence: self.away, matrices: self.home_attack },
            Side::Away => Fixture { side, attack: self.away, defence: self.home, matrices: self.away_attack },
        }
    }
}

/// One attacking direction.
#[derive(Clone, Copy)]
struct Fixture<'a> {
    side: Side,
    attack: &'a Team,
    defence: &'a Team,
    matrices: &'a SideMatrices,
}

/// A resolved creation, carried into the finishing phase.
#[derive(Clone, Copy)]
struct Chance<'a> {
    creator: &'a Player,
    creator_pos: Position,
    defender: &'a Player,
    defender_pos: Position,
    kind: ChanceType,
    crit: CritLevel,
}

/// Where a move came from. Counters skip set pieces and further counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    OpenPlay,
    Counter,
}

/// How a shot was worked; picks the log section and corner follow-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShotSource {
    OpenPlay,
    Corner,
}

struct Play<'a, R> {
    minute: u16,
    pitch: Pitch<'a>,
    config: &'a SimConfig,
    rng: &'a mut R,
    log: &'a mut Vec<LogEntry>,
}

impl<'a, R: Rng> Play<'a, R> {
    fn record(&mut self, event: MatchEvent) {
        trace!(minute = self.minute, section = event.section(), tag = event.tag(), "event");
        self.log.push(LogEntry { minute: self.minute, event });
    }

    /// True with probability `p`.
    fn roll(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    fn duel(&mut self, event: EventType, initiator: &Player, defender: &Player, bonus: f64) -> Evaluation {
        evaluate(&mut *self.rng, event, initiator, defender, self.config.eval().with_bonus(bonus))
    }

    fn play_minute(&mut self) {
        if !self.roll(self.config.event_chance) {
            return;
        }
        let side = if self.roll(self.config.home_attack_chance) { Side::Home } else { Side::Away };
        self.open_play(self.pitch.fixture(side));
    }

    fn open_play(&mut self, fx: Fixture<'a>) {
        let Some(creator_pos) = weighted_choice(&mut *self.rng, &fx.matrices.creator) else { return };
        let Some(creator) = self.player_at(fx.attack, creator_pos, None) else { return };
        let Some((defender, defender_pos)) = self.creation_defender(fx, creator_pos) else { return };
        let Some(kind) = chance_type_weights(creator_pos).and_then(|w| weighted_choice(&mut *self.rng, w)) else {
            return;
        };

        let eval = self.duel(EventType::creation(kind), creator, defender, 0.0);
        let (success, crit) = (eval.success, eval.crit);
        self.record(MatchEvent::Creation {
            side: fx.side,
            creator: creator.name.clone(),
            defender: defender.name.clone(),
            chance: kind,
            critical: crit.is_crit2(),
            counter: false,
            eval,
        });

        if !success {
            if self.roll(self.config.counter_after_creation_fail) {
                self.launch_counter(fx, defender, CounterTrigger::AfterCreationFail);
            }
            return;
        }

        if self.set_piece_awarded(fx, SetPiecePhase::DuringCreation) {
            return;
        }

        let chance = Chance { creator, creator_pos, defender, defender_pos, kind, crit };
        self.finish_move(fx, chance, Origin::OpenPlay);
    }

    /// Finisher onward, shared by open play and counters.
    fn finish_move(&mut self, fx: Fixture<'a>, chance: Chance<'a>, origin: Origin) {
        let (finisher, finisher_pos) = self.finisher(fx, &chance);

        if origin == Origin::OpenPlay && self.set_piece_awarded(fx, SetPiecePhase::DuringFinish) {
            return;
        }

        let finish_defender = self.finish_defender(fx, finisher_pos, chance.defender, chance.defender_pos);
        let Some(finish) = weighted_choice(&mut *self.rng, finish_type_weights(chance.kind)) else { return };

        if let Some(event) = EventType::intercept(chance.kind) {
            let keeper = fx.defence.goalkeeper();
            let eval = self.duel(event, keeper, finisher, 0.0);
            let intercepted = eval.success;
            self.record(MatchEvent::GoalkeeperIntercept {
                side: fx.side,
                finisher: finisher.name.clone(),
                goalkeeper: keeper.name.clone(),
                chance: chance.kind,
                eval,
            });
            if intercepted {
                return;
            }
        }

        let bonus = self.config.creation_bonus(chance.crit);
        let eval = self.duel(EventType::finisher(chance.kind), finisher, finish_defender, bonus);
        let (success, crit) = (eval.success, eval.crit);
        self.record(MatchEvent::Finish {
            side: fx.side,
            finisher: finisher.name.clone(),
            defender: finish_defender.name.clone(),
            finish,
            eval,
        });

        if !success {
            if origin == Origin::OpenPlay && self.roll(self.config.counter_after_finish_fail) {
                self.launch_counter(fx, finish_defender, CounterTrigger::AfterFinisherFail);
            }
            return;
        }

        let shot_bonus = self.config.shot_bonus(crit);
        self.shoot(fx, finisher, finish_defender, finish, shot_bonus, ShotSource::OpenPlay);
    }

    /// Shot quality, then the keeper. A save may concede a corner from open play.
    fn shoot(
        &mut self,
        fx: Fixture<'a>,
        finisher: &'a Player,
        defender: &'a Player,
        finish: FinishType,
        bonus: f64,
        source: ShotSource,
    ) {
        let side = fx.side;
        let shot = self.duel(EventType::shot(finish), finisher, defender, bonus);
        let on_target = shot.success;
        let (prob, skills_used) = (shot.prob, shot.skills_used.clone());
        let (finisher_name, defender_name) = (finisher.name.clone(), defender.name.clone());
        self.record(match source {
            ShotSource::OpenPlay => MatchEvent::ShotQuality {
                side,
                finisher: finisher_name.clone(),
                defender: defender_name.clone(),
                finish,
                eval: shot,
            },
            ShotSource::Corner => MatchEvent::CornerShotQuality {
                side,
                finisher: finisher_name.clone(),
                defender: defender_name.clone(),
                finish,
                eval: shot,
            },
        });

        if !on_target {
            self.record(match source {
                ShotSource::OpenPlay => MatchEvent::FinishOutcome {
                    side,
                    finisher: finisher_name,
                    defender: defender_name,
                    finish,
                    prob,
                    skills_used,
                },
                ShotSource::Corner => MatchEvent::CornerFinishOutcome {
                    side,
                    finisher: finisher_name,
                    defender: defender_name,
                    finish,
                    prob,
                    skills_used,
                },
            });
            return;
        }

        let keeper = fx.defence.goalkeeper();
        let save = self.duel(EventType::save(finish), keeper, finisher, 0.0);
        let saved = save.success;
        let goalkeeper = keeper.name.clone();
        self.record(match source {
            ShotSource::OpenPlay => MatchEvent::Save { side, finisher: finisher_name, goalkeeper, finish, eval: save },
            ShotSource::Corner => MatchEvent::CornerSave { side, finisher: finisher_name, goalkeeper, finish, eval: save },
        });

        if saved && source == ShotSource::OpenPlay && self.roll(self.config.corner_after_save) {
            self.record(MatchEvent::CornerKick { side });
            self.corner(fx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team::fixtures::{team_with_shape, uniform_team};

    fn always_attack_home() -> SimConfig {
        SimConfig { event_chance: 1.0, home_attack_chance: 1.0, ..SimConfig::default() }
    }

    #[test]
    fn test_rejects_bad_minutes() {
        for minutes in [0, 121] {
            let err = MatchSimulator::new(uniform_team("A", 10), uniform_team("B", 10), minutes, 1).err();
            assert_eq!(err, Some(MatchError::InvalidMinutes(minutes)));
        }
        assert!(MatchSimulator::new(uniform_team("A", 10), uniform_team("B", 10), 120, 1).is_ok());
    }

    #[test]
    fn test_rejects_shared_team_name() {
        let err = MatchSimulator::new(uniform_team("A", 10), uniform_team("A", 12), 90, 1).err();
        assert!(matches!(err, Some(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_same_seed_same_log() {
        let run = |seed| {
            let mut sim = MatchSimulator::new(uniform_team("A", 12), uniform_team("B", 11), 90, seed).unwrap();
            sim.run();
            serde_json::to_string(sim.log()).unwrap()
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }

    #[test]
    fn test_log_is_minute_ordered_and_bounded() {
        let mut sim = MatchSimulator::new(uniform_team("A", 10), uniform_team("B", 10), 45, 3).unwrap();
        let log = sim.run();
        assert!(!log.is_empty());
        assert!(log.windows(2).all(|w| w[0].minute <= w[1].minute));
        assert!(log.iter().all(|e| (1..=45).contains(&e.minute)));
    }

    #[test]
    fn test_run_starts_from_clean_log() {
        let mut sim = MatchSimulator::new(uniform_team("A", 10), uniform_team("B", 10), 30, 5).unwrap();
        let first = sim.run().len();
        let second = sim.run().len();
        assert!(first > 0 && second > 0);
        assert!(sim.log().iter().all(|e| e.minute <= 30));
    }

    #[test]
    fn test_closed_gate_logs_nothing() {
        let config = SimConfig { event_chance: 0.0, ..SimConfig::default() };
        let mut sim = MatchSimulator::new(uniform_team("A", 10), uniform_team("B", 10), 90, 8)
            .unwrap()
            .with_config(config)
            .unwrap();
        assert!(sim.run().is_empty());
    }

    #[test]
    fn test_forced_home_attack_opens_with_home_creation() {
        let mut sim = MatchSimulator::new(uniform_team("A", 10), uniform_team("B", 10), 90, 21)
            .unwrap()
            .with_config(always_attack_home())
            .unwrap();
        for minute in 1..=50 {
            let before = sim.log().len();
            sim.simulate_minute(minute);
            let first = &sim.log()[before].event;
            assert!(matches!(first, MatchEvent::Creation { side: Side::Home, counter: false, .. }));
        }
    }

    #[test]
    fn test_counters_follow_their_trigger() {
        let config = SimConfig {
            counter_after_creation_fail: 1.0,
            counter_after_finish_fail: 1.0,
            ..always_attack_home()
        };
        let mut sim = MatchSimulator::new(uniform_team("A", 10), uniform_team("B", 10), 120, 4)
            .unwrap()
            .with_config(config)
            .unwrap();
        let log = sim.run().to_vec();
        let mut counters = 0;
        for (i, entry) in log.iter().enumerate() {
            if let MatchEvent::CounterAttack { side, player, .. } = &entry.event {
                counters += 1;
                assert_eq!(*side, Side::Away);
                match &log[i + 1].event {
                    MatchEvent::Creation { side, creator, counter, chance, .. } => {
                        assert_eq!(*side, Side::Away);
                        assert_eq!(creator, player);
                        assert!(*counter);
                        assert!(matches!(chance, ChanceType::Through | ChanceType::Long | ChanceType::Solo));
                    }
                    other => panic!("counter followed by {other:?}"),
                }
            }
        }
        assert!(counters > 0);
    }

    #[test]
    fn test_set_pieces_end_the_move() {
        let config = SimConfig { penalty_during_creation: 1.0, ..always_attack_home() };
        let mut sim = MatchSimulator::new(uniform_team("A", 10), uniform_team("B", 10), 60, 13)
            .unwrap()
            .with_config(config)
            .unwrap();
        let log = sim.run().to_vec();
        for (i, entry) in log.iter().enumerate() {
            if let MatchEvent::PenaltyAwarded { phase, .. } = entry.event {
                assert_eq!(phase, SetPiecePhase::DuringCreation);
                assert!(matches!(log[i + 1].event, MatchEvent::Penalty { .. }));
                assert!(!log.iter().any(|e| e.minute == entry.minute && matches!(e.event, MatchEvent::Finish { .. })));
            }
        }
        assert!(log.iter().any(|e| matches!(e.event, MatchEvent::PenaltyAwarded { .. })));
    }

    #[test]
    fn test_solo_creator_finishes() {
        let shape = [
            Position::GK,
            Position::DC,
            Position::DC,
            Position::DC,
            Position::DC,
            Position::DC,
            Position::FC,
            Position::FC,
            Position::FC,
            Position::FC,
            Position::FC,
        ];
        let mut sim = MatchSimulator::new(team_with_shape("A", &shape, 10), uniform_team("B", 10), 120, 77)
            .unwrap()
            .with_config(always_attack_home())
            .unwrap();
        let log = sim.run().to_vec();
        let mut creators = std::collections::BTreeMap::new();
        for entry in &log {
            match &entry.event {
                MatchEvent::Creation { creator, chance, side: Side::Home, .. } => {
                    creators.insert(entry.minute, (creator.clone(), *chance));
                }
                MatchEvent::Finish { finisher, side: Side::Home, .. } => {
                    if let Some((creator, ChanceType::Solo)) = creators.get(&entry.minute) {
                        assert_eq!(creator, finisher);
                    }
                }
                _ => {}
            }
        }
        assert!(creators.values().any(|(_, chance)| *chance == ChanceType::Solo));
    }
}
