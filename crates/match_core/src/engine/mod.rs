pub mod batch;
pub mod config;
pub mod evaluation;
pub mod events;
pub mod formulas;
pub mod match_sim;
pub mod matrices;

pub use batch::{simulate_batch, BatchReport};
pub use config::SimConfig;
pub use evaluation::{evaluate, evaluate_named, CritLevel, EvalOptions, Evaluation};
pub use events::{CounterTrigger, LogEntry, MatchEvent, Participant, SetPiecePhase, Side};
pub use formulas::{ChanceType, EventType, FinishType};
pub use match_sim::{MatchSimulator, DEFAULT_MINUTES, MAX_MINUTES};
pub use matrices::{weighted_choice, SideMatrices};
