//! Corner kicks.
//!
//! The defending keeper first tries to claim the delivery. A delivery that
//! gets past the keeper is contested by a matrix-drawn defender, and a completed
//! delivery becomes a header between the two sides' best aerial players.

use rand::Rng;

use super::selection::aerial_pool;
use super::{Fixture, Play, ShotSource};
use crate::engine::events::MatchEvent;
use crate::engine::formulas::{EventType, FinishType};

impl<'a, R: Rng> Play<'a, R> {
    pub(super) fn corner(&mut self, fx: Fixture<'a>) {
        let Some(creator) = self.corner_taker(fx.attack) else { return };
        let keeper = fx.defence.goalkeeper();

        let claim = self.duel(EventType::GkCorner, creator, keeper, 0.0);
        let beaten = claim.success;
        self.record(MatchEvent::CornerGkIntercept {
            side: fx.side,
            creator: creator.name.clone(),
            goalkeeper: keeper.name.clone(),
            eval: claim,
        });
        if !beaten {
            return;
        }

        let Some((defender, _)) = self.creation_defender(fx, creator.position) else { return };
        let delivery = self.duel(EventType::Corner, creator, defender, 0.0);
        let (delivered, delivery_crit) = (delivery.success, delivery.crit);
        self.record(MatchEvent::CornerDelivery {
            side: fx.side,
            creator: creator.name.clone(),
            defender: defender.name.clone(),
            critical: delivery_crit.is_crit2(),
            eval: delivery,
        });
        if !delivered {
            return;
        }

        let size = self.config.corner_pool_size;
        let attackers = aerial_pool(fx.attack, Some(creator), size);
        let Some(finisher) = self.any_of(&attackers) else { return };
        let markers = aerial_pool(fx.defence, None, size);
        let Some(marker) = self.any_of(&markers) else { return };

        let bonus = self.config.creation_bonus(delivery_crit);
        let header = self.duel(EventType::HeaderDuel, finisher, marker, bonus);
        let (won, crit) = (header.success, header.crit);
        self.record(MatchEvent::CornerFinish {
            side: fx.side,
            finisher: finisher.name.clone(),
            defender: marker.name.clone(),
            eval: header,
        });
        if !won {
            return;
        }

        let shot_bonus = self.config.shot_bonus(crit);
        self.shoot(fx, finisher, marker, FinishType::Header, shot_bonus, ShotSource::Corner);
    }
}
