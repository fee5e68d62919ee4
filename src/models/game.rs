//! Match record, its status, and result snapshots fed back into the engine.

use crate::models::branch::Branch;
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable match key encoding branch, round and index (`wb-r1-m1`, `p9-r2-m1`, `p3-f`).
pub type MatchId = String;

/// Recorded results keyed by match id.
pub type PriorResults = HashMap<MatchId, ResultSnapshot>;

/// Where a slot's player comes from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Winner,
    Loser,
}

/// Lifecycle of a match as inferred by the engine.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// At least one player slot still unknown.
    #[default]
    Scheduled,
    /// Both players known, no score.
    Pending,
    /// Partial score, no winner.
    Live,
    /// Winner decided.
    Finished,
}

/// One node of the bracket graph.
///
/// The link fields (`source_*`, `next_match_id`, `loser_match_id`) and `best_of` are
/// set by the blueprint and never touched by the engine.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub bracket: Branch,
    pub round: u8,
    pub best_of: u8,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub winner_id: Option<PlayerId>,
    pub status: MatchStatus,
    pub source_match_id1: Option<MatchId>,
    pub source_type1: Option<SourceType>,
    pub source_match_id2: Option<MatchId>,
    pub source_type2: Option<SourceType>,
    pub next_match_id: Option<MatchId>,
    pub loser_match_id: Option<MatchId>,
    #[serde(default)]
    pub micro_points: Vec<serde_json::Value>,
}

impl Match {
    /// Empty node with no players and no links.
    pub fn new(id: impl Into<MatchId>, bracket: Branch, round: u8, best_of: u8) -> Self {
        Self {
            id: id.into(),
            bracket,
            round,
            best_of,
            player1_id: None,
            player2_id: None,
            score1: None,
            score2: None,
            winner_id: None,
            status: MatchStatus::Scheduled,
            source_match_id1: None,
            source_type1: None,
            source_match_id2: None,
            source_type2: None,
            next_match_id: None,
            loser_match_id: None,
            micro_points: Vec::new(),
        }
    }

    /// Games needed to take the match.
    pub fn wins_needed(&self) -> u32 {
        u32::from(self.best_of) / 2 + 1
    }

    /// Player in slot 1 or 2.
    pub fn player(&self, slot: Slot) -> Option<&PlayerId> {
        match slot {
            Slot::One => self.player1_id.as_ref(),
            Slot::Two => self.player2_id.as_ref(),
        }
    }

    /// Source link of slot 1 or 2.
    pub fn source(&self, slot: Slot) -> Option<(&MatchId, SourceType)> {
        match slot {
            Slot::One => self.source_match_id1.as_ref().zip(self.source_type1),
            Slot::Two => self.source_match_id2.as_ref().zip(self.source_type2),
        }
    }

    /// True when `id` currently occupies one of the two slots.
    pub fn has_player(&self, id: &str) -> bool {
        self.player1_id.as_deref() == Some(id) || self.player2_id.as_deref() == Some(id)
    }

    /// The player who did not win, once the match is finished.
    pub fn loser_id(&self) -> Option<&PlayerId> {
        let winner = self.winner_id.as_ref()?;
        if self.player1_id.as_ref() == Some(winner) {
            self.player2_id.as_ref()
        } else {
            self.player1_id.as_ref()
        }
    }

    /// No forward links: winner and loser leave with a final place.
    pub fn is_terminal(&self) -> bool {
        self.next_match_id.is_none() && self.loser_match_id.is_none()
    }
}

/// Player slot of a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::One, Slot::Two];

    /// Zero-based position, for per-slot arrays.
    pub fn index(self) -> usize {
        match self {
            Slot::One => 0,
            Slot::Two => 1,
        }
    }
}

/// Externally recorded result for one match, as supplied by a persistence layer.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSnapshot {
    #[serde(default)]
    pub score1: Option<u32>,
    #[serde(default)]
    pub score2: Option<u32>,
    #[serde(default)]
    pub micro_points: Vec<serde_json::Value>,
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    /// Informational only: the engine recomputes status.
    #[serde(default)]
    pub status: Option<MatchStatus>,
}

impl ResultSnapshot {
    /// Scores only; the engine derives the winner.
    pub fn scores(score1: u32, score2: u32) -> Self {
        Self {
            score1: Some(score1),
            score2: Some(score2),
            ..Self::default()
        }
    }

    /// Snapshot of a match as the engine last emitted it.
    pub fn from_match(m: &Match) -> Self {
        Self {
            score1: m.score1,
            score2: m.score2,
            micro_points: m.micro_points.clone(),
            winner_id: m.winner_id.clone(),
            status: Some(m.status),
        }
    }

    pub fn with_winner(mut self, winner_id: impl Into<PlayerId>) -> Self {
        self.winner_id = Some(winner_id.into());
        self
    }
}
