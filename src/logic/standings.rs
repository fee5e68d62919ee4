//! Final places read off the terminal matches of a resolved bracket.

use crate::models::{Match, MatchStatus, Player, Standing};
use std::collections::HashSet;

/// Places decided so far, best first.
///
/// Each finished terminal match awards its branch's top place to the winner and the
/// next place to the loser. Ids that are not real entrants in `players` (byes) are skipped.
pub fn standings(matches: &[Match], players: &[Player]) -> Vec<Standing> {
    let entrants: HashSet<&str> = players
        .iter()
        .filter(|p| !p.is_bye)
        .map(|p| p.id.as_str())
        .collect();

    let mut table: Vec<Standing> = matches
        .iter()
        .filter(|m| m.is_terminal() && m.status == MatchStatus::Finished)
        .flat_map(|m| {
            let place = m.bracket.top_place();
            [
                (place, m.winner_id.clone()),
                (place + 1, m.loser_id().cloned()),
            ]
        })
        .filter_map(|(place, id)| id.map(|player_id| Standing { place, player_id }))
        .filter(|s| entrants.contains(s.player_id.as_str()))
        .collect();
    table.sort_by_key(|s| s.place);
    table
}
