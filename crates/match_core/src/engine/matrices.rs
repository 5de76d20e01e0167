//! Position-weighted selection tables.
//!
//! Base tables are fixed weights over the thirteen outfield slots. A match
//! scales them by how many players the two rosters field in each slot and
//! normalizes each row. `GK` never appears in a base table.

use once_cell::sync::Lazy;
use rand::Rng;
use std::collections::BTreeMap;

use super::formulas::{ChanceType, FinishType};
use crate::models::{Position, Team};

pub type WeightMap<K> = BTreeMap<K, f64>;

/// Row position to weighted column positions.
pub type PositionMatrix = BTreeMap<Position, WeightMap<Position>>;

const OUTFIELD: usize = 13;

fn outfield_slot(pos: Position) -> Option<usize> {
    pos.index().checked_sub(1)
}

/// A row-by-column weight table over outfield positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseTable(pub [[u16; OUTFIELD]; OUTFIELD]);

impl BaseTable {
    pub fn get(&self, row: Position, col: Position) -> Option<u16> {
        Some(self.0[outfield_slot(row)?][outfield_slot(col)?])
    }
}

/// Creation weight per outfield slot: DL DC DR, DML DMC DMR, ML MC MR, OML OMC OMR, FC.
pub const BASE_CREATOR: [u16; OUTFIELD] = [6, 1, 6, 10, 6, 10, 10, 10, 10, 12, 15, 12, 12];

#[rustfmt::skip]
pub const BASE_CREATOR_DEFEND: BaseTable = BaseTable([
    //DL  DC   DR DML DMC DMR   ML   MC   MR OML  OMC  OMR   FC
    [  0,   1,  50,  0, 30, 50,   0,  50, 100,   0,   0, 100,  50], // DL
    [  0,   1,   0,  0,  0,  0,  30,  50,   0,   0,   0,   0, 100], // DC
    [ 50,   1,   0,  0,  0,  0, 100, 100,   0,  50, 100,  50, 100], // DR
    [  0,   1,   0,  0,  0,  0,   0,  50,   0,   0,   0,   0,   0], // DML
    [  0,   1,   0,100, 50,  0,   0,  50,   0, 100,   0,   0,   0], // DMC
    [  0,   1,   0,  0, 50,  0,   0,   0,   0,   0,   0,   0,   0], // DMR
    [  0,   1,   0,  0,  0,  0, 100,  50, 100,   0,   0,   0,   0], // ML
    [  0,   1,   0, 10, 50, 10,  10,  50,  10,  10,  10,  10,   0], // MC
    [100,  50,   0,  0,  0,  0,   0,   0,   0,   0,   0,   0,   0], // MR
    [  0,   1,   0,  0,  0,  0,   0,   0,   0,   0,   0,   0,   0], // OML
    [ 50,  50,   0,100, 50,  0,   0,   0,   0,   0,   0,  30,   0], // OMC
    [100,   1,   0,  0,  0,  0,   0,   0,   0,   0,   0,   0,   0], // OMR
    [ 50, 100,  50, 10,  0, 10,   0,   0,   0,  10,   0,   0,   0], // FC
]);

/// Finisher row to defending column. Same weights as the creation table.
pub const BASE_FINISH_DEFEND: BaseTable = BASE_CREATOR_DEFEND;

#[rustfmt::skip]
pub const BASE_FINISHER_SHORT: BaseTable = BaseTable([
    //DL  DC  DR DML DMC DMR   ML   MC   MR  OML  OMC  OMR   FC
    [  0, 30,  0,  0, 50,  0, 100, 100,   0, 100,  50,   0,  50], // DL
    [ 50,  0, 50,100,100,100, 100, 100, 100, 100, 100, 100,  50], // DC
    [  0, 30,  0,  0, 50,  0,   0, 100, 100,   0,  50, 100,  50], // DR
    [  0, 30,  0,  0, 50,  0, 100, 100,   0, 100,  50,   0,  50], // DML
    [  0,  0,  0, 50, 50, 50, 100, 100, 100, 100, 100, 100,  50], // DMC
    [  0, 30,  0,  0, 50,  0,   0, 100, 100,   0,  50, 100,  50], // DMR
    [ 30,  0,  0, 30,100,  0,   0, 100,   0,   0, 100,   0,  50], // ML
    [  0,  0,  0, 30, 50, 30, 100, 100, 100, 100, 100, 100, 100], // MC
    [  0,  0, 30,  0,100, 30,   0, 100,   0,   0, 100,   0,  50], // MR
    [ 30,  0,  0, 30, 30,  0,   0,  50,   0,   0, 100,   0, 100], // OML
    [  0,  0,  0, 30, 30, 30,  50,  50,  50, 100, 100, 100, 100], // OMC
    [  0,  0, 30,  0, 30, 30,   0,  50,   0,   0, 100,   0, 100], // OMR
    [  0,  0,  0, 30, 30, 30,  30,  50,  30, 100, 100, 100, 100], // FC
]);

#[rustfmt::skip]
pub const BASE_FINISHER_CROSSING: BaseTable = BaseTable([
    //DL  DC  DR DML DMC DMR  ML  MC  MR  OML  OMC  OMR   FC
    [  0,  0, 30,  0, 30, 30,  0, 50, 50,   0, 100,  50, 100], // DL
    [  0,  0,  0,  0,  0,  0, 50, 50, 50, 100, 100, 100, 100], // DC
    [ 30,  0,  0, 30, 30,  0, 50, 50,  0,  50, 100,   0, 100], // DR
    [  0,  0, 30,  0, 30, 30,  0, 50, 50,   0,  50,  50, 100], // DML
    [  0,  0,  0,  0,  0,  0, 50, 50, 50, 100, 100, 100, 100], // DMC
    [ 30,  0,  0, 30, 30,  0, 50, 50,  0,  50,  50,   0, 100], // DMR
    [  0,  0, 30,  0, 30, 30,  0, 50, 50,   0,  50, 100, 100], // ML
    [  0,  0,  0,  0,  0,  0, 50, 50, 50, 100, 100, 100, 100], // MC
    [ 30,  0,  0, 30, 30,  0, 50, 50,  0, 100,  50,   0, 100], // MR
    [  0,  0, 30,  0, 30, 30,  0, 50, 50,   0,  50, 100, 100], // OML
    [  0,  0,  0,  0,  0,  0, 50, 50, 50, 100, 100, 100, 100], // OMC
    [ 30,  0,  0, 30, 30,  0, 50, 50,  0, 100,  50,   0, 100], // OMR
    [  0,  0,  0,  0,  0,  0, 50, 50, 50, 100, 100, 100, 100], // FC
]);

#[rustfmt::skip]
pub const BASE_FINISHER_THROUGH: BaseTable = BaseTable([
    //DL DC DR DML DMC DMR ML  MC  MR  OML  OMC  OMR    FC
    [  0, 0, 0, 0, 0, 0, 50, 50,  0,  50, 100,  30,  100], // DL
    [  0, 0, 0, 0, 0, 0, 50, 50, 50, 100, 100, 100,  100], // DC
    [  0, 0, 0, 0, 0, 0,  0, 50, 50,  30, 100,  50,  100], // DR
    [  0, 0, 0, 0, 0, 0, 50, 50,  0, 100, 100,  50,  100], // DML
    [  0, 0, 0, 0, 0, 0, 30, 50, 30, 100, 100, 100,  100], // DMC
    [  0, 0, 0, 0, 0, 0,  0, 50, 50,  50, 100, 100,  100], // DMR
    [  0, 0, 0, 0, 0, 0,  0, 30,  0,   0, 100,  50,  100], // ML
    [  0, 0, 0, 0, 0, 0, 30, 30, 30, 100, 100, 100, 1000], // MC
    [  0, 0, 0, 0, 0, 0,  0, 30,  0,  50, 100,   0,  100], // MR
    [  0, 0, 0, 0, 0, 0,  0, 50, 30,   0, 100,  50,  100], // OML
    [  0, 0, 0, 0, 0, 0, 50, 50, 50, 100, 100, 100,  100], // OMC
    [  0, 0, 0, 0, 0, 0, 30, 50,  0,  50, 100,   0,  100], // OMR
    [  0, 0, 0, 0, 0, 0, 30, 30, 30, 100, 100, 100,  100], // FC
]);

#[rustfmt::skip]
pub const BASE_FINISHER_LONG: BaseTable = BaseTable([
    //DL DC DR DML DMC DMR ML  MC  MR  OML  OMC  OMR   FC
    [  0, 0, 0, 0, 0, 0, 50, 50, 50, 100, 100, 100, 100], // DL
    [  0, 0, 0, 0, 0, 0, 50, 50, 50, 100, 100, 100, 100], // DC
    [  0, 0, 0, 0, 0, 0, 50, 50, 50, 100, 100, 100, 100], // DR
    [  0, 0, 0, 0, 0, 0, 50, 50, 50, 100, 100, 100, 100], // DML
    [  0, 0, 0, 0, 0, 0, 30, 30, 30, 100, 100, 100, 100], // DMC
    [  0, 0, 0, 0, 0, 0, 50, 50, 50, 100, 100, 100, 100], // DMR
    [  0, 0, 0, 0, 0, 0,  0, 30, 30, 100, 100, 100, 100], // ML
    [  0, 0, 0, 0, 0, 0, 50,  0, 50, 100,  50, 100, 100], // MC
    [  0, 0, 0, 0, 0, 0, 30, 30,  0, 100, 100, 100, 100], // MR
    [  0, 0, 0, 0, 0, 0, 30, 30, 30, 100, 100, 100, 100], // OML
    [  0, 0, 0, 0, 0, 0, 30, 30, 30, 100, 100, 100, 100], // OMC
    [  0, 0, 0, 0, 0, 0, 30, 30, 30, 100, 100, 100, 100], // OMR
    [  0, 0, 0, 0, 0, 0, 30, 30, 30, 100, 100, 100, 100], // FC
]);

/// Chance-type weights per creating position, in `ChanceType::ALL` order
/// (Short, Long, Crossing, Through, Solo).
#[rustfmt::skip]
pub const CREATOR_CHANCE_TYPE: [[u16; 5]; OUTFIELD] = [
    [15, 15, 55, 10,  5], // DL
    [20, 65,  5, 10,  0], // DC
    [15, 15, 55, 10,  5], // DR
    [20, 15, 45, 15,  5], // DML
    [40, 35,  5, 15,  5], // DMC
    [20, 15, 45, 15,  5], // DMR
    [25,  5, 45, 10, 15], // ML
    [40, 20,  5, 25, 10], // MC
    [25,  5, 45, 10, 15], // MR
    [15,  5, 40, 15, 25], // OML
    [40,  5,  5, 30, 20], // OMC
    [15,  5, 40, 15, 25], // OMR
    [35,  5,  5, 25, 30], // FC
];

/// Finish-type weights per chance type. Rows in `ChanceType::ALL` order,
/// columns in `FinishType::ALL` order.
#[rustfmt::skip]
pub const CHANCE_TO_FINISH_TYPE: [[u16; 6]; 5] = [
    // FT  Ctl  Hdr Chip Fin  Pow
    [25, 30,  2,  3, 10, 30], // Short
    [20, 20, 35,  5,  5, 15], // Long
    [20, 20, 55,  0,  0,  5], // Crossing
    [25, 25, 10, 15, 15, 10], // Through
    [10, 25,  0, 10, 25, 30], // Solo
];

/// Base finisher table for a chance type. `Solo` has none: the creator finishes.
pub fn finisher_base(chance: ChanceType) -> Option<&'static BaseTable> {
    match chance {
        ChanceType::Short => Some(&BASE_FINISHER_SHORT),
        ChanceType::Long => Some(&BASE_FINISHER_LONG),
        ChanceType::Crossing => Some(&BASE_FINISHER_CROSSING),
        ChanceType::Through => Some(&BASE_FINISHER_THROUGH),
        ChanceType::Solo => None,
    }
}

/// Players per outfield position, zero entries included. `GK` is not counted.
pub fn formation_count(team: &Team) -> BTreeMap<Position, usize> {
    let mut counts: BTreeMap<Position, usize> = Position::OUTFIELD.iter().map(|p| (*p, 0)).collect();
    for player in team.players() {
        if let Some(count) = counts.get_mut(&player.position) {
            *count += 1;
        }
    }
    counts
}

fn position_count(team: &Team) -> BTreeMap<Position, usize> {
    let mut counts = BTreeMap::new();
    for player in team.players() {
        *counts.entry(player.position).or_insert(0) += 1;
    }
    counts
}

/// Scale weights to sum to 1. An all-zero map stays all-zero.
pub fn normalize<K: Ord + Clone>(weights: &WeightMap<K>) -> WeightMap<K> {
    let total: f64 = weights.values().sum();
    if total == 0.0 {
        return weights.keys().map(|k| (k.clone(), 0.0)).collect();
    }
    weights.iter().map(|(k, v)| (k.clone(), v / total)).collect()
}

/// Which outfield position starts the move, over all thirteen slots.
pub fn creator_matrix(team: &Team) -> WeightMap<Position> {
    let raw: WeightMap<Position> = formation_count(team)
        .into_iter()
        .map(|(pos, count)| {
            let base = outfield_slot(pos).map_or(0, |slot| BASE_CREATOR[slot]);
            (pos, f64::from(base) * count as f64)
        })
        .collect();
    normalize(&raw)
}

/// Rows: creator positions the team fields. Columns: finisher positions the
/// team fields, weighted by headcount.
pub fn finisher_matrix(base: &BaseTable, team: &Team) -> PositionMatrix {
    let counts = position_count(team);
    let mut matrix = PositionMatrix::new();
    for &creator in &Position::OUTFIELD {
        if !counts.contains_key(&creator) {
            continue;
        }
        let row: WeightMap<Position> = Position::OUTFIELD
            .iter()
            .filter_map(|&finisher| {
                let count = *counts.get(&finisher)?;
                let base = base.get(creator, finisher)?;
                Some((finisher, f64::from(base) * count as f64))
            })
            .collect();
        matrix.insert(creator, normalize(&row));
    }
    matrix
}

/// Solo dribbles: every fielded outfield position finishes its own move.
pub fn solo_matrix(team: &Team) -> PositionMatrix {
    formation_count(team)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(pos, _)| (pos, WeightMap::from([(pos, 1.0)])))
        .collect()
}

/// Cell weight is base x attackers in the row slot x defenders in the column slot.
pub fn defender_matrix(base: &BaseTable, attacking: &Team, defending: &Team) -> PositionMatrix {
    let attack = position_count(attacking);
    let defend = position_count(defending);
    let mut matrix = PositionMatrix::new();
    for &row in &Position::OUTFIELD {
        let Some(&attackers) = attack.get(&row) else { continue };
        let weights: WeightMap<Position> = Position::OUTFIELD
            .iter()
            .filter_map(|&col| {
                let defenders = *defend.get(&col)?;
                let base = base.get(row, col)?;
                Some((col, f64::from(base) * attackers as f64 * defenders as f64))
            })
            .collect();
        matrix.insert(row, normalize(&weights));
    }
    matrix
}

static CHANCE_TYPE_WEIGHTS: Lazy<BTreeMap<Position, WeightMap<ChanceType>>> = Lazy::new(|| {
    Position::OUTFIELD
        .iter()
        .filter_map(|&pos| {
            let row = CREATOR_CHANCE_TYPE[outfield_slot(pos)?];
            Some((pos, ChanceType::ALL.iter().zip(row).map(|(c, w)| (*c, f64::from(w))).collect()))
        })
        .collect()
});

static FINISH_TYPE_WEIGHTS: Lazy<BTreeMap<ChanceType, WeightMap<FinishType>>> = Lazy::new(|| {
    ChanceType::ALL
        .iter()
        .map(|&chance| {
            let row = CHANCE_TO_FINISH_TYPE[chance as usize];
            (chance, FinishType::ALL.iter().zip(row).map(|(f, w)| (*f, f64::from(w))).collect())
        })
        .collect()
});

/// Chance-type weights for a creator position; `None` for `GK`.
pub fn chance_type_weights(pos: Position) -> Option<&'static WeightMap<ChanceType>> {
    CHANCE_TYPE_WEIGHTS.get(&pos)
}

pub fn finish_type_weights(chance: ChanceType) -> &'static WeightMap<FinishType> {
    &FINISH_TYPE_WEIGHTS[&chance]
}

/// Draw a key with probability proportional to its weight. Non-positive
/// weights never win; `None` when nothing has positive weight.
pub fn weighted_choice<K: Clone, R: Rng + ?Sized>(rng: &mut R, weights: &BTreeMap<K, f64>) -> Option<K> {
    let total: f64 = weights.values().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let mut target = rng.gen::<f64>() * total;
    let mut last = None;
    for (key, &weight) in weights.iter().filter(|(_, w)| **w > 0.0) {
        if target < weight {
            return Some(key.clone());
        }
        target -= weight;
        last = Some(key);
    }
    // float residue past the final bucket
    last.cloned()
}

/// Matrices for one attacking direction, built once per match.
#[derive(Debug, Clone, PartialEq)]
pub struct SideMatrices {
    pub creator: WeightMap<Position>,
    pub finishers: BTreeMap<ChanceType, PositionMatrix>,
    /// Creator position to the opponent's contesting position.
    pub creation_defence: PositionMatrix,
    /// Finisher position to the opponent's contesting position.
    pub finish_defence: PositionMatrix,
}

impl SideMatrices {
    pub fn build(attacking: &Team, defending: &Team) -> Self {
        let finishers = ChanceType::ALL
            .iter()
            .map(|&chance| {
                let matrix = match finisher_base(chance) {
                    Some(base) => finisher_matrix(base, attacking),
                    None => solo_matrix(attacking),
                };
                (chance, matrix)
            })
            .collect();

        Self {
            creator: creator_matrix(attacking),
            finishers,
            creation_defence: defender_matrix(&BASE_CREATOR_DEFEND, attacking, defending),
            finish_defence: defender_matrix(&BASE_FINISH_DEFEND, attacking, defending),
        }
    }

    pub fn finisher_row(&self, chance: ChanceType, creator: Position) -> Option<&WeightMap<Position>> {
        self.finishers.get(&chance)?.get(&creator)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    proptest! {
        #[test]
        fn prop_normalize_sums_to_one_or_zero(weights in prop::collection::vec(0u16..1000, 1..14)) {
            let map: WeightMap<usize> = weights.iter().enumerate().map(|(i, w)| (i, f64::from(*w))).collect();
            let normalized = normalize(&map);
            let total: f64 = normalized.values().sum();
            if weights.iter().all(|w| *w == 0) {
                prop_assert_eq!(total, 0.0);
            } else {
                prop_assert!((total - 1.0).abs() < 1e-9);
            }
            prop_assert_eq!(normalized.len(), map.len());
        }

        #[test]
        fn prop_weighted_choice_never_picks_zero_weight(
            weights in prop::collection::vec(0u16..5, 1..10),
            seed in any::<u64>(),
        ) {
            let map: WeightMap<usize> = weights.iter().enumerate().map(|(i, w)| (i, f64::from(*w))).collect();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match weighted_choice(&mut rng, &map) {
                Some(k) => prop_assert!(map[&k] > 0.0),
                None => prop_assert!(weights.iter().all(|w| *w == 0)),
            }
        }
    }
}
