pub mod attributes;
pub mod player;
pub mod position;
pub mod roster;
pub mod team;

pub use attributes::{Attribute, AttributeSet, GK_ONLY_SKILLS, GOALKEEPER_ATTRS, OUTFIELD_ATTRS};
pub use player::Player;
pub use position::Position;
pub use roster::{PlayerData, RosterFile, TeamData};
pub use team::{Team, SQUAD_SIZE};
