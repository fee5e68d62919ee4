//! Result entry for a tournament session: validate edits against the current bracket.

use crate::logic::resolve::Resolver;
use crate::models::{
    BracketError, BracketView, Match, MatchId, MatchStatus, ResultSnapshot, Tournament,
    TournamentError,
};

/// Resolve the tournament's current bracket from its roster and recorded results.
pub fn current_bracket(tournament: &Tournament) -> Result<BracketView, BracketError> {
    Resolver::new().view(&tournament.players, &tournament.results)
}

fn find_match<'a>(view: &'a BracketView, match_id: &str) -> Result<&'a Match, TournamentError> {
    view.matches
        .iter()
        .find(|m| m.id == match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))
}

/// Record (or overwrite) the result of one match.
///
/// The match must have both players, neither a bye. No score may exceed the games needed
/// to win, with at most one side reaching it. An explicit winner must be one of the two
/// players and must agree with the scores when they already decide the match.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: &str,
    snapshot: ResultSnapshot,
) -> Result<(), TournamentError> {
    let view = current_bracket(tournament)?;
    let m = find_match(&view, match_id)?;

    let (Some(p1), Some(p2)) = (&m.player1_id, &m.player2_id) else {
        // One side will never be filled: the match is a walkover.
        if m.status == MatchStatus::Finished {
            return Err(TournamentError::ByeMatch(m.id.clone()));
        }
        return Err(TournamentError::MatchNotReady(m.id.clone()));
    };
    let is_bye = |id: &str| view.seeds.iter().any(|p| p.id == id && p.is_bye);
    if is_bye(p1.as_str()) || is_bye(p2.as_str()) {
        return Err(TournamentError::ByeMatch(m.id.clone()));
    }
    if let Some(winner) = &snapshot.winner_id {
        if !m.has_player(winner) {
            return Err(TournamentError::InvalidWinner(winner.clone()));
        }
    }

    let wins_needed = m.wins_needed();
    let s1 = snapshot.score1.unwrap_or(0);
    let s2 = snapshot.score2.unwrap_or(0);
    if s1 > wins_needed || s2 > wins_needed || (s1 == wins_needed && s2 == wins_needed) {
        return Err(TournamentError::InvalidScore {
            match_id: m.id.clone(),
            wins_needed,
        });
    }
    let decided_by_scores = if s1 == wins_needed {
        Some(p1)
    } else if s2 == wins_needed {
        Some(p2)
    } else {
        None
    };
    if let (Some(winner), Some(decided)) = (&snapshot.winner_id, decided_by_scores) {
        if winner != decided {
            return Err(TournamentError::WinnerContradictsScore(m.id.clone()));
        }
    }

    let id: MatchId = m.id.clone();
    log::info!(
        "Tournament {}: result for {} set to {:?}-{:?}",
        tournament.id,
        id,
        snapshot.score1,
        snapshot.score2
    );
    tournament.results.insert(id, snapshot);
    tournament.touch();
    Ok(())
}

/// Drop the recorded result of one match. Matches it fed fall back to unresolved slots.
pub fn clear_result(tournament: &mut Tournament, match_id: &str) -> Result<(), TournamentError> {
    if tournament.results.remove(match_id).is_none() {
        return Err(TournamentError::MatchNotFound(match_id.to_string()));
    }
    log::info!("Tournament {}: result for {} cleared", tournament.id, match_id);
    tournament.touch();
    Ok(())
}
