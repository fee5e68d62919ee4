//! Tournament session: the entrant list and recorded results for one event.

use crate::models::bracket::{BracketError, BRACKET_SIZE};
use crate::models::game::{MatchId, ResultSnapshot};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Errors that can occur while editing a tournament.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a state that allows this action (e.g. roster locked after play began).
    InvalidState,
    /// Player name is empty after trimming.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// All 32 places are taken.
    BracketFull,
    /// Player not found.
    PlayerNotFound(PlayerId),
    /// No match with this id in the bracket.
    MatchNotFound(MatchId),
    /// Both players of the match are not known yet.
    MatchNotReady(MatchId),
    /// The match is decided by a bye and takes no result.
    ByeMatch(MatchId),
    /// The given winner is not playing in this match.
    InvalidWinner(PlayerId),
    /// The given winner lost on the recorded scores.
    WinnerContradictsScore(MatchId),
    /// Scores beyond what the match format allows.
    InvalidScore { match_id: MatchId, wins_needed: u32 },
    /// The bracket itself could not be resolved.
    Bracket(BracketError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::EmptyName => write!(f, "Player name must not be empty"),
            TournamentError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            TournamentError::BracketFull => write!(f, "The bracket already has {} players", BRACKET_SIZE),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::MatchNotReady(id) => write!(f, "Match {} does not have both players yet", id),
            TournamentError::ByeMatch(id) => write!(f, "Match {} is a bye and cannot be scored", id),
            TournamentError::InvalidWinner(_) => write!(f, "Winner is not a player in this match"),
            TournamentError::WinnerContradictsScore(id) => {
                write!(f, "Winner of match {} does not match the scores", id)
            }
            TournamentError::InvalidScore {
                match_id,
                wins_needed,
            } => write!(
                f,
                "Scores for match {} must not exceed {} and only one side can reach it",
                match_id, wins_needed
            ),
            TournamentError::Bracket(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<BracketError> for TournamentError {
    fn from(e: BracketError) -> Self {
        TournamentError::Bracket(e)
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Entrants plus every recorded result. The bracket itself is always re-derived.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Real entrants only; byes are added at resolve time.
    pub players: Vec<Player>,
    /// Recorded results by match id.
    pub results: HashMap<MatchId, ResultSnapshot>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create an empty tournament.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players: Vec::new(),
            results: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Create a tournament with an initial roster (e.g. from an import).
    pub fn with_players(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::new(name)
        }
    }

    /// True once any result has been recorded; the roster is locked from then on.
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn get_player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Add a player. Names must be unique (case-insensitive); at most 32 entrants.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        country: impl Into<String>,
        elo: i32,
    ) -> Result<PlayerId, TournamentError> {
        if self.has_results() {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.full_name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        if self.players.len() >= BRACKET_SIZE {
            return Err(TournamentError::BracketFull);
        }
        let country: String = country.into();
        let player = Player::new(Uuid::new_v4().to_string(), name_trimmed, elo)
            .with_country(country.trim());
        let id = player.id.clone();
        self.players.push(player);
        self.touch();
        Ok(id)
    }

    /// Remove a player by id (only before any result is recorded).
    pub fn remove_player(&mut self, player_id: &str) -> Result<(), TournamentError> {
        if self.has_results() {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| TournamentError::PlayerNotFound(player_id.to_string()))?;
        self.players.remove(idx);
        self.touch();
        Ok(())
    }
}
