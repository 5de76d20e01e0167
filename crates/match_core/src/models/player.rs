use serde::Serialize;

use super::attributes::{
    Attribute, AttributeSet, ATTRIBUTE_MAX, ATTRIBUTE_MIN, GOALKEEPER_ATTRS, OUTFIELD_ATTRS,
};
use super::position::Position;
use crate::error::{MatchError, Result};

/// A player as the match engine sees them: identity, matrix position and the
/// attribute sheet for their role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    attributes: AttributeSet,
    pub is_goalkeeper: bool,
    /// Supplied by the caller and read by the stamina modifier. The engine
    /// never advances it.
    pub minutes_played: u16,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        position: Position,
        attributes: AttributeSet,
        is_goalkeeper: bool,
    ) -> Result<Self> {
        let player = Self { name: name.into(), position, attributes, is_goalkeeper, minutes_played: 0 };
        player.validate()?;
        Ok(player)
    }

    /// Every attribute of the role set to `value`.
    pub fn uniform(name: impl Into<String>, position: Position, value: u8) -> Result<Self> {
        let is_goalkeeper = position.is_goalkeeper();
        let attrs = if is_goalkeeper { &GOALKEEPER_ATTRS[..] } else { &OUTFIELD_ATTRS[..] };
        Self::new(name, position, AttributeSet::uniform(attrs, value), is_goalkeeper)
    }

    pub fn with_minutes_played(mut self, minutes: u16) -> Self {
        self.minutes_played = minutes;
        self
    }

    /// Attribute value, 0 when the role does not carry it.
    #[inline]
    pub fn attr(&self, attr: Attribute) -> u8 {
        self.attributes.get(attr)
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn required_attributes(&self) -> &'static [Attribute] {
        if self.is_goalkeeper {
            &GOALKEEPER_ATTRS
        } else {
            &OUTFIELD_ATTRS
        }
    }

    /// Heading plus Jump Reach, used to rank players for aerial set pieces.
    pub fn aerial_score(&self) -> u16 {
        u16::from(self.attr(Attribute::Heading)) + u16::from(self.attr(Attribute::JumpReach))
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_goalkeeper != self.position.is_goalkeeper() {
            return Err(MatchError::GoalkeeperFlagMismatch { player: self.name.clone() });
        }

        let missing: Vec<String> = self
            .attributes
            .missing(self.required_attributes())
            .map(|attr| attr.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(MatchError::MissingAttributes { player: self.name.clone(), missing });
        }

        if let Some((attr, value)) = self
            .attributes
            .iter()
            .find(|(_, value)| !(ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(value))
        {
            return Err(MatchError::AttributeOutOfRange {
                player: self.name.clone(),
                attribute: attr.name().to_string(),
                value,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_outfield_player() {
        let p = Player::uniform("Striker", Position::FC, 15).unwrap();
        assert!(!p.is_goalkeeper);
        assert_eq!(p.attr(Attribute::Finishing), 15);
        assert_eq!(p.attr(Attribute::Reflexes), 0);
        assert_eq!(p.minutes_played, 0);
        assert_eq!(p.aerial_score(), 30);
    }

    #[test]
    fn test_goalkeeper_flag_must_match_position() {
        let attrs = AttributeSet::uniform(&OUTFIELD_ATTRS, 10);
        let err = Player::new("Keeper", Position::GK, attrs, false).unwrap_err();
        assert!(matches!(err, MatchError::GoalkeeperFlagMismatch { .. }));
    }

    #[test]
    fn test_missing_attributes_are_listed() {
        let attrs = AttributeSet::uniform(&OUTFIELD_ATTRS, 10);
        let err = Player::new("Keeper", Position::GK, attrs, true).unwrap_err();
        match err {
            MatchError::MissingAttributes { player, missing } => {
                assert_eq!(player, "Keeper");
                assert_eq!(missing.len(), 5, "only the GK-only skills are absent");
                assert!(missing.contains(&"Reflexes".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_attribute_range_is_enforced() {
        let attrs = AttributeSet::uniform(&OUTFIELD_ATTRS, 10).with(Attribute::Vision, 21);
        let err = Player::new("Playmaker", Position::OMC, attrs, false).unwrap_err();
        assert!(matches!(err, MatchError::AttributeOutOfRange { value: 21, .. }));

        let attrs = AttributeSet::uniform(&OUTFIELD_ATTRS, 10).with(Attribute::Vision, 0);
        assert!(Player::new("Playmaker", Position::OMC, attrs, false).is_err());
    }
}
