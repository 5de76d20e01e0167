//! Statistics built from match event logs.

pub mod aggregate;
pub mod counters;
pub mod match_stats;

pub use aggregate::aggregate;
pub use counters::{
    AssistType, GoalkeeperStats, OffDefSplit, ShootingSplit, ShotType, SkillUsage, Tally, WeightedSkillUsage,
};
pub use match_stats::{MatchStatsV2, Outcome, PlayerStatsV2, TeamStatsV2};
