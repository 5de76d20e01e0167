use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Invalid team size for {team}: expected {expected}, found {found}")]
    InvalidTeamSize { team: String, expected: usize, found: usize },

    #[error("Team {team} must have exactly 1 goalkeeper, found {found}")]
    InvalidGoalkeeperCount { team: String, found: usize },

    #[error("Player {player}: goalkeeper flag does not match position")]
    GoalkeeperFlagMismatch { player: String },

    #[error("Player {player} missing attributes: {missing:?}")]
    MissingAttributes { player: String, missing: Vec<String> },

    #[error("Player {player}: attribute {attribute} = {value} is outside 1..=20")]
    AttributeOutOfRange { player: String, attribute: String, value: u8 },

    #[error("Team {team} lists player {player} more than once")]
    DuplicatePlayer { team: String, player: String },

    #[error("Team {team}: corner taker {player} is not in the squad")]
    UnknownCornerTaker { team: String, player: String },

    #[error("Invalid player position: {0}")]
    UnknownPosition(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    #[error("Match length must be 1..=120 minutes, got {0}")]
    InvalidMinutes(u16),

    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl MatchError {
    /// True for errors caused by caller-supplied input (rosters, match length,
    /// config files). Everything else points at a defect inside the engine.
    pub fn is_validation(&self) -> bool {
        match self {
            MatchError::InvalidTeamSize { .. }
            | MatchError::InvalidGoalkeeperCount { .. }
            | MatchError::GoalkeeperFlagMismatch { .. }
            | MatchError::MissingAttributes { .. }
            | MatchError::AttributeOutOfRange { .. }
            | MatchError::DuplicatePlayer { .. }
            | MatchError::UnknownCornerTaker { .. }
            | MatchError::UnknownPosition(_)
            | MatchError::UnknownAttribute(_)
            | MatchError::InvalidMinutes(_)
            | MatchError::InvalidConfig(_)
            | MatchError::Deserialization(_) => true,
            MatchError::UnknownEventType(_) | MatchError::Serialization(_) => false,
        }
    }
}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            MatchError::Deserialization(err.to_string())
        } else {
            MatchError::Serialization(err.to_string())
        }
    }
}

impl From<serde_yaml::Error> for MatchError {
    fn from(err: serde_yaml::Error) -> Self {
        MatchError::Deserialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
