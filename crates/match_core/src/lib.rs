//! # match_core - Deterministic Minute-by-Minute Football Match Simulation
//!
//! Simulates a match between two validated elevens and reduces the resulting
//! event log into per-team and per-player statistics.
//!
//! ## Features
//! - Seeded simulation (same teams + seed = same event log)
//! - Typed event log with one variant per event kind
//! - Skill-usage attribution, raw and formula-weighted
//! - Parallel Monte Carlo batches with order-free stat merging
//!
//! ```no_run
//! use match_core::{aggregate, MatchSimulator, RosterFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let roster = RosterFile::from_json_str(&std::fs::read_to_string("roster.json")?)?;
//! let (home, away) = roster.into_teams()?;
//! let mut sim = MatchSimulator::new(home.clone(), away.clone(), 90, 42)?;
//! let stats = aggregate(sim.run(), &home, &away);
//! println!("{:?}", stats.score());
//! # Ok(())
//! # }
//! ```

#![allow(clippy::too_many_arguments)]

pub mod engine;
pub mod error;
pub mod models;
pub mod stats;

pub use engine::{
    simulate_batch, BatchReport, ChanceType, EventType, FinishType, LogEntry, MatchEvent, MatchSimulator, SimConfig,
    Side,
};
pub use error::{MatchError, Result};
pub use models::{Attribute, Player, Position, RosterFile, Team};
pub use stats::{aggregate, MatchStatsV2, PlayerStatsV2, TeamStatsV2};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
