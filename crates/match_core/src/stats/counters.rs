//! Keyed counters shared by team and player statistics.
//!
//! Everything here merges by pointwise addition. Weighted usage is kept in
//! integer thousandths so merging is exact.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::engine::formulas::{ChanceType, EventType, FinishType};
use crate::models::Attribute;

/// A count per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(serialize = "K: Ord + Serialize", deserialize = "K: Ord + Deserialize<'de>"))]
pub struct Tally<K>(BTreeMap<K, u64>);

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord + Clone> Tally<K> {
    pub fn add(&mut self, key: K) {
        self.add_n(key, 1);
    }

    pub fn add_n(&mut self, key: K, n: u64) {
        if n > 0 {
            *self.0.entry(key).or_insert(0) += n;
        }
    }

    pub fn get(&self, key: &K) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn merge(&mut self, other: &Self) {
        for (key, n) in &other.0 {
            self.add_n(key.clone(), *n);
        }
    }
}

impl<K: Ord + Clone> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

/// Finish types plus the two set-piece shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShotType {
    FirstTime,
    Controlled,
    Header,
    Chip,
    Finesse,
    Power,
    Penalty,
    Freekick,
}

impl From<FinishType> for ShotType {
    fn from(finish: FinishType) -> Self {
        match finish {
            FinishType::FirstTime => ShotType::FirstTime,
            FinishType::Controlled => ShotType::Controlled,
            FinishType::Header => ShotType::Header,
            FinishType::Chip => ShotType::Chip,
            FinishType::Finesse => ShotType::Finesse,
            FinishType::Power => ShotType::Power,
        }
    }
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Chance types plus corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssistType {
    Short,
    Long,
    Crossing,
    Through,
    Solo,
    Corner,
}

impl From<ChanceType> for AssistType {
    fn from(chance: ChanceType) -> Self {
        match chance {
            ChanceType::Short => AssistType::Short,
            ChanceType::Long => AssistType::Long,
            ChanceType::Crossing => AssistType::Crossing,
            ChanceType::Through => AssistType::Through,
            ChanceType::Solo => AssistType::Solo,
        }
    }
}

/// Attempts and successes per key for one phase, offence or defence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "K: Ord + Serialize", deserialize = "K: Ord + Deserialize<'de>"))]
pub struct OffDefSplit<K> {
    pub attempt_by_type: Tally<K>,
    pub success_by_type: Tally<K>,
}

impl<K> Default for OffDefSplit<K> {
    fn default() -> Self {
        Self { attempt_by_type: Tally::default(), success_by_type: Tally::default() }
    }
}

impl<K: Ord + Clone> OffDefSplit<K> {
    pub fn attempt(&mut self, key: K) {
        self.attempt_by_type.add(key);
    }

    pub fn succeed(&mut self, key: K) {
        self.success_by_type.add(key);
    }

    pub fn attempts(&self) -> u64 {
        self.attempt_by_type.total()
    }

    pub fn successes(&self) -> u64 {
        self.success_by_type.total()
    }

    pub fn merge(&mut self, other: &Self) {
        self.attempt_by_type.merge(&other.attempt_by_type);
        self.success_by_type.merge(&other.success_by_type);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootingSplit {
    pub shots_by_type: Tally<ShotType>,
    pub shots_on_by_type: Tally<ShotType>,
    pub goals_by_type: Tally<ShotType>,
}

impl ShootingSplit {
    pub fn shot(&mut self, kind: ShotType, on_target: bool) {
        self.shots_by_type.add(kind);
        if on_target {
            self.shots_on_by_type.add(kind);
        }
    }

    pub fn goal(&mut self, kind: ShotType) {
        self.goals_by_type.add(kind);
    }

    pub fn shots(&self) -> u64 {
        self.shots_by_type.total()
    }

    pub fn shots_on(&self) -> u64 {
        self.shots_on_by_type.total()
    }

    pub fn goals(&self) -> u64 {
        self.goals_by_type.total()
    }

    pub fn merge(&mut self, other: &Self) {
        self.shots_by_type.merge(&other.shots_by_type);
        self.shots_on_by_type.merge(&other.shots_on_by_type);
        self.goals_by_type.merge(&other.goals_by_type);
    }
}

/// Keeper-only counters. Empty for outfield players.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalkeeperStats {
    pub intercept_attempts_by_type: Tally<ChanceType>,
    pub intercept_successes_by_type: Tally<ChanceType>,
    pub corner_intercepts_attempted: u64,
    pub corner_intercepts_successful: u64,
    pub shots_conceded_by_type: Tally<ShotType>,
    pub shots_on_target_by_type: Tally<ShotType>,
    pub saves_by_type: Tally<ShotType>,
}

impl GoalkeeperStats {
    pub fn intercept_attempts(&self) -> u64 {
        self.intercept_attempts_by_type.total()
    }

    pub fn intercept_successes(&self) -> u64 {
        self.intercept_successes_by_type.total()
    }

    pub fn shots_conceded(&self) -> u64 {
        self.shots_conceded_by_type.total()
    }

    pub fn shots_on_target(&self) -> u64 {
        self.shots_on_target_by_type.total()
    }

    pub fn saves(&self) -> u64 {
        self.saves_by_type.total()
    }

    pub fn merge(&mut self, other: &Self) {
        self.intercept_attempts_by_type.merge(&other.intercept_attempts_by_type);
        self.intercept_successes_by_type.merge(&other.intercept_successes_by_type);
        self.corner_intercepts_attempted += other.corner_intercepts_attempted;
        self.corner_intercepts_successful += other.corner_intercepts_successful;
        self.shots_conceded_by_type.merge(&other.shots_conceded_by_type);
        self.shots_on_target_by_type.merge(&other.shots_on_target_by_type);
        self.saves_by_type.merge(&other.saves_by_type);
    }
}

/// Unweighted skill usage: +1 per skill per evaluated event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUsage {
    pub usage_by_event: BTreeMap<Attribute, Tally<EventType>>,
    pub total_usage: Tally<Attribute>,
}

impl SkillUsage {
    pub fn add(&mut self, skill: Attribute, event: EventType) {
        self.usage_by_event.entry(skill).or_default().add(event);
        self.total_usage.add(skill);
    }

    pub fn total(&self, skill: Attribute) -> u64 {
        self.total_usage.get(&skill)
    }

    pub fn merge(&mut self, other: &Self) {
        for (skill, events) in &other.usage_by_event {
            self.usage_by_event.entry(*skill).or_default().merge(events);
        }
        self.total_usage.merge(&other.total_usage);
    }
}

const MILLI: f64 = 1000.0;

fn to_milli(weight: f64) -> u64 {
    (weight * MILLI).round().max(0.0) as u64
}

/// Skill usage weighted by the event's ledger, in thousandths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedSkillUsage {
    pub usage_by_event: BTreeMap<Attribute, Tally<EventType>>,
    pub total_usage: Tally<Attribute>,
}

impl WeightedSkillUsage {
    pub fn add(&mut self, skill: Attribute, event: EventType, weight: f64) {
        let milli = to_milli(weight);
        self.usage_by_event.entry(skill).or_default().add_n(event, milli);
        self.total_usage.add_n(skill, milli);
    }

    pub fn total(&self, skill: Attribute) -> f64 {
        self.total_usage.get(&skill) as f64 / MILLI
    }

    pub fn by_event(&self, skill: Attribute, event: EventType) -> f64 {
        self.usage_by_event.get(&skill).map_or(0, |events| events.get(&event)) as f64 / MILLI
    }

    pub fn merge(&mut self, other: &Self) {
        for (skill, events) in &other.usage_by_event {
            self.usage_by_event.entry(*skill).or_default().merge(events);
        }
        self.total_usage.merge(&other.total_usage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_totals_and_merge() {
        let mut a: Tally<ChanceType> = [ChanceType::Short, ChanceType::Short, ChanceType::Long].into_iter().collect();
        let b: Tally<ChanceType> = [ChanceType::Long, ChanceType::Solo].into_iter().collect();
        a.merge(&b);
        assert_eq!(a.get(&ChanceType::Short), 2);
        assert_eq!(a.get(&ChanceType::Long), 2);
        assert_eq!(a.get(&ChanceType::Crossing), 0);
        assert_eq!(a.total(), 5);
    }

    #[test]
    fn test_zero_adds_leave_no_key() {
        let mut tally: Tally<ShotType> = Tally::default();
        tally.add_n(ShotType::Power, 0);
        assert!(tally.is_empty());
    }

    #[test]
    fn test_split_totals_match_by_type() {
        let mut split = OffDefSplit::default();
        split.attempt(FinishType::Chip);
        split.attempt(FinishType::Power);
        split.succeed(FinishType::Power);
        assert_eq!(split.attempts(), 2);
        assert_eq!(split.successes(), 1);
    }

    #[test]
    fn test_shooting_split() {
        let mut shooting = ShootingSplit::default();
        shooting.shot(ShotType::Header, true);
        shooting.shot(ShotType::Header, false);
        shooting.goal(ShotType::Header);
        assert_eq!((shooting.shots(), shooting.shots_on(), shooting.goals()), (2, 1, 1));
    }

    #[test]
    fn test_weighted_usage_is_exact() {
        let mut usage = WeightedSkillUsage::default();
        for _ in 0..10 {
            usage.add(Attribute::Passing, EventType::Short, 0.1);
        }
        assert_eq!(usage.total(Attribute::Passing), 1.0);
        assert_eq!(usage.by_event(Attribute::Passing, EventType::Short), 1.0);
        assert_eq!(usage.by_event(Attribute::Passing, EventType::Long), 0.0);
    }

    #[test]
    fn test_tally_serializes_as_map() {
        let tally: Tally<ShotType> = [ShotType::Penalty].into_iter().collect();
        assert_eq!(serde_json::to_string(&tally).unwrap(), r#"{"Penalty":1}"#);
    }
}
