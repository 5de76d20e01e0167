#![allow(dead_code)]

use match_core::{Player, Position, Team};

pub const FOUR_FOUR_TWO: [Position; 11] = [
    Position::GK,
    Position::DL,
    Position::DC,
    Position::DC,
    Position::DR,
    Position::ML,
    Position::MC,
    Position::MC,
    Position::MR,
    Position::FC,
    Position::FC,
];

pub fn team(name: &str, value: u8) -> Team {
    let players = FOUR_FOUR_TWO
        .iter()
        .enumerate()
        .map(|(i, pos)| Player::uniform(format!("{name} {i}"), *pos, value).unwrap())
        .collect();
    Team::new(name, players).unwrap()
}

pub fn players(name: &str, shape: &[Position]) -> Vec<Player> {
    shape
        .iter()
        .enumerate()
        .map(|(i, pos)| Player::uniform(format!("{name} {i}"), *pos, 10).unwrap())
        .collect()
}
