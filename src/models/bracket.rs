//! Resolved bracket view, standings, and structural errors.

use crate::models::game::{Match, MatchId};
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Number of entrants the bracket is built for.
pub const BRACKET_SIZE: usize = 32;

/// Structural failures of a resolve call. Any of these means the output must not be persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Two blueprint nodes share an id.
    DuplicateMatchId(MatchId),
    /// A link points at a match that does not exist.
    UnknownMatch { from: MatchId, to: MatchId },
    /// A match links to itself.
    SelfReference(MatchId),
    /// A forward link has no matching backward link, or vice versa.
    InconsistentLink { from: MatchId, to: MatchId },
    /// A non-seeded match is missing a source link for one of its slots.
    MissingSource(MatchId),
    /// Propagation still changed the graph on its last allowed pass.
    NotConverged { passes: usize },
    /// More real entrants than the bracket holds.
    TooManyPlayers { count: usize, capacity: usize },
    /// Two entrants share an id.
    DuplicatePlayerId(PlayerId),
    /// A real entrant uses an id reserved for synthetic byes.
    ReservedPlayerId(PlayerId),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::DuplicateMatchId(id) => write!(f, "Duplicate match id {}", id),
            BracketError::UnknownMatch { from, to } => {
                write!(f, "Match {} links to unknown match {}", from, to)
            }
            BracketError::SelfReference(id) => write!(f, "Match {} links to itself", id),
            BracketError::InconsistentLink { from, to } => {
                write!(f, "Link from {} to {} has no matching back link", from, to)
            }
            BracketError::MissingSource(id) => write!(f, "Match {} is missing a source link", id),
            BracketError::NotConverged { passes } => {
                write!(f, "Bracket did not settle within {} passes", passes)
            }
            BracketError::TooManyPlayers { count, capacity } => {
                write!(f, "{} players entered but the bracket holds {}", count, capacity)
            }
            BracketError::DuplicatePlayerId(id) => write!(f, "Player id {} is used twice", id),
            BracketError::ReservedPlayerId(id) => {
                write!(f, "Player id {} is reserved for byes", id)
            }
        }
    }
}

impl std::error::Error for BracketError {}

/// Final place of one real player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub place: u8,
    pub player_id: PlayerId,
}

/// Everything a renderer needs: ranked seeds (byes included), matches, standings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketView {
    pub seeds: Vec<Player>,
    pub matches: Vec<Match>,
    pub standings: Vec<Standing>,
}
