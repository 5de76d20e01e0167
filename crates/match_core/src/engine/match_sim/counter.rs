//! Counter-attacks.
//!
//! The player who just won the ball creates for the other side with a chance
//! type drawn uniformly from the configured set. The move then runs the normal
//! finishing phase without set pieces or a further counter.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Chance, Fixture, Origin, Play};
use crate::engine::events::{CounterTrigger, MatchEvent};
use crate::engine::formulas::EventType;
use crate::models::Player;

impl<'a, R: Rng> Play<'a, R> {
    pub(super) fn launch_counter(&mut self, broken: Fixture<'a>, creator: &'a Player, trigger: CounterTrigger) {
        let fx = self.pitch.fixture(broken.side.opponent());
        self.record(MatchEvent::CounterAttack { side: fx.side, player: creator.name.clone(), trigger });

        let Some(&kind) = self.config.counter_chance_types.choose(&mut *self.rng) else { return };
        let creator_pos = creator.position;
        let Some((defender, defender_pos)) = self.creation_defender(fx, creator_pos) else { return };

        let eval = self.duel(EventType::creation(kind), creator, defender, 0.0);
        let (success, crit) = (eval.success, eval.crit);
        self.record(MatchEvent::Creation {
            side: fx.side,
            creator: creator.name.clone(),
            defender: defender.name.clone(),
            chance: kind,
            critical: crit.is_crit2(),
            counter: true,
            eval,
        });
        if !success {
            return;
        }

        let chance = Chance { creator, creator_pos, defender, defender_pos, kind, crit };
        self.finish_move(fx, chance, Origin::Counter);
    }
}
