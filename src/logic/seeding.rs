//! Seed ranking and round-1 placement.

use crate::models::{Branch, BracketError, Match, Player, BRACKET_SIZE, BYE_ID_PREFIX};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Seed pairs for winners-bracket round 1, match 1 through 16.
///
/// Standard anti-clash order: seeds 1 and 2 sit in opposite halves, 1–4 in
/// different quarters, and so on, so top seeds only meet in late rounds.
pub const SEED_PAIRS: [(usize, usize); BRACKET_SIZE / 2] = [
    (1, 32),
    (16, 17),
    (9, 24),
    (8, 25),
    (5, 28),
    (12, 21),
    (13, 20),
    (4, 29),
    (3, 30),
    (14, 19),
    (11, 22),
    (6, 27),
    (7, 26),
    (10, 23),
    (2, 31),
    (15, 18),
];

fn by_rating(a: &Player, b: &Player) -> Ordering {
    b.elo
        .cmp(&a.elo)
        .then_with(|| a.full_name.cmp(&b.full_name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Rank real entrants by rating (highest first, ties by name) and pad with byes to 32.
///
/// Players flagged as byes in the input are dropped and replaced by fresh synthetic ones,
/// so byes always hold the bottom seeds. Real entrant ids must be unique and must not
/// start with the bye prefix.
pub fn rank_players(players: &[Player]) -> Result<Vec<Player>, BracketError> {
    let mut ranked: Vec<Player> = players.iter().filter(|p| !p.is_bye).cloned().collect();
    let mut seen = HashSet::new();
    for p in &ranked {
        if p.id.starts_with(BYE_ID_PREFIX) {
            return Err(BracketError::ReservedPlayerId(p.id.clone()));
        }
        if !seen.insert(p.id.as_str()) {
            return Err(BracketError::DuplicatePlayerId(p.id.clone()));
        }
    }
    if ranked.len() > BRACKET_SIZE {
        return Err(BracketError::TooManyPlayers {
            count: ranked.len(),
            capacity: BRACKET_SIZE,
        });
    }
    ranked.sort_by(by_rating);
    let real = ranked.len();
    ranked.extend((real + 1..=BRACKET_SIZE).map(Player::bye));
    Ok(ranked)
}

/// Write ranked seeds into the winners-bracket round-1 slots.
///
/// `ranked` must hold 32 players, seed 1 first.
pub fn place_seeds(matches: &mut [Match], ranked: &[Player]) {
    let seed_id = |seed: usize| ranked.get(seed - 1).map(|p| p.id.clone());
    let first_round = matches
        .iter_mut()
        .filter(|m| m.bracket == Branch::Wb && m.round == 1);
    for (m, &(top, bottom)) in first_round.zip(SEED_PAIRS.iter()) {
        m.player1_id = seed_id(top);
        m.player2_id = seed_id(bottom);
    }
}
