//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use placement_bracket::{resolve, Match, MatchStatus, Player, PriorResults, ResultSnapshot};

/// `n` players with ids `p01..` and strictly decreasing ratings, so seed k is `pk`.
pub fn ranked_players(n: usize) -> Vec<Player> {
    (1..=n)
        .map(|i| Player::new(format!("p{i:02}"), format!("Player {i:02}"), 2000 - i as i32 * 10))
        .collect()
}

pub fn is_bye_id(id: &str) -> bool {
    id.starts_with("bye-")
}

/// Pending match between two real players.
pub fn playable(m: &Match) -> bool {
    m.status == MatchStatus::Pending
        && !m.player1_id.as_deref().map_or(true, is_bye_id)
        && !m.player2_id.as_deref().map_or(true, is_bye_id)
}

pub fn find<'a>(matches: &'a [Match], id: &str) -> &'a Match {
    matches
        .iter()
        .find(|m| m.id == id)
        .unwrap_or_else(|| panic!("no match {id}"))
}

/// Keep recording a result for every playable match until none is left.
pub fn play_out<F>(players: &[Player], mut decide: F) -> PriorResults
where
    F: FnMut(&Match) -> ResultSnapshot,
{
    let mut results = PriorResults::new();
    loop {
        let matches = resolve(players, &results).unwrap();
        let open: Vec<&Match> = matches.iter().filter(|m| playable(m)).collect();
        if open.is_empty() {
            return results;
        }
        for m in open {
            results.insert(m.id.clone(), decide(m));
        }
    }
}

/// Lower id (better seed) wins without dropping a game; scores only, winner derived.
pub fn favourite_wins(m: &Match) -> ResultSnapshot {
    let p1 = m.player1_id.as_deref().unwrap();
    let p2 = m.player2_id.as_deref().unwrap();
    let need = m.wins_needed();
    if p1 < p2 {
        ResultSnapshot::scores(need, 0)
    } else {
        ResultSnapshot::scores(0, need)
    }
}
