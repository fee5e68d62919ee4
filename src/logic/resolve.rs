//! Fixed-point resolution of the whole bracket from seeds and recorded results.
//!
//! Every call starts from a fresh blueprint, places the seeds, then walks the graph
//! in topological order until a pass changes nothing. All derived fields (slots,
//! scores, winner, status) are recomputed from the inputs, so the same inputs always
//! give the same bracket and an empty result map gives the unplayed bracket.

use crate::logic::blueprint::{build_blueprint, validate_blueprint};
use crate::logic::seeding::{place_seeds, rank_players};
use crate::logic::standings::standings;
use crate::models::{
    BracketError, BracketView, Match, MatchId, MatchStatus, Player, PlayerId, PriorResults,
    ResultSnapshot, Slot, SourceType,
};
use std::collections::{HashMap, HashSet};

/// Upper bound on propagation passes. The graph is at most six matches deep.
pub const MAX_PASSES: usize = 10;

/// Resolve the standard 32-entrant bracket. See [`Resolver::resolve`].
pub fn resolve(players: &[Player], prior: &PriorResults) -> Result<Vec<Match>, BracketError> {
    Resolver::new().resolve(players, prior)
}

/// Bracket resolution over a fixed blueprint.
#[derive(Clone, Debug)]
pub struct Resolver {
    blueprint: Vec<Match>,
    max_passes: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            blueprint: build_blueprint(),
            max_passes: MAX_PASSES,
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over a custom graph. The graph is checked once here.
    pub fn with_blueprint(blueprint: Vec<Match>) -> Result<Self, BracketError> {
        validate_blueprint(&blueprint)?;
        Ok(Self {
            blueprint,
            max_passes: MAX_PASSES,
        })
    }

    /// Override the pass cap.
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    pub fn blueprint(&self) -> &[Match] {
        &self.blueprint
    }

    /// Rank `players`, seed them, and propagate `prior` results to a fixed point.
    ///
    /// Returns every match sorted by branch, round and index. Fails only on structural
    /// problems: too many entrants, a broken graph, or no fixed point within the cap.
    pub fn resolve(
        &self,
        players: &[Player],
        prior: &PriorResults,
    ) -> Result<Vec<Match>, BracketError> {
        let seeds = rank_players(players)?;
        self.resolve_seeded(&seeds, prior)
    }

    /// Seeds, matches and standings in one go.
    pub fn view(&self, players: &[Player], prior: &PriorResults) -> Result<BracketView, BracketError> {
        let seeds = rank_players(players)?;
        let matches = self.resolve_seeded(&seeds, prior)?;
        let standings = standings(&matches, &seeds);
        Ok(BracketView {
            seeds,
            matches,
            standings,
        })
    }

    fn resolve_seeded(
        &self,
        seeds: &[Player],
        prior: &PriorResults,
    ) -> Result<Vec<Match>, BracketError> {
        validate_blueprint(&self.blueprint)?;

        let byes: HashSet<PlayerId> = seeds
            .iter()
            .filter(|p| p.is_bye)
            .map(|p| p.id.clone())
            .collect();
        let mut arena = Arena::new(self.blueprint.clone(), byes);
        place_seeds(&mut arena.matches, seeds);

        let mut settled = false;
        for pass in 1..=self.max_passes {
            if !arena.pass(prior) {
                log::debug!("Bracket settled after {} passes", pass);
                settled = true;
                break;
            }
        }
        if !settled {
            log::error!("Bracket still changing after {} passes", self.max_passes);
            return Err(BracketError::NotConverged {
                passes: self.max_passes,
            });
        }

        report_ignored(&arena, prior);

        let mut matches = arena.matches;
        matches.sort_by_key(|m| (m.bracket, m.round));
        Ok(matches)
    }
}

/// What a source link delivers into the slot it feeds.
enum Feed {
    /// Source not decided yet.
    Unknown,
    Player(PlayerId),
    /// Nobody will ever arrive: the loser side of a walkover, or either side of a
    /// match that had no player at all.
    Empty,
}

/// Match records indexed by id, updated in place during resolution.
///
/// A side is absent when it holds a bye or when its slot is known to stay empty.
/// Byes never leave their seed slots; only real players move along the links.
struct Arena {
    matches: Vec<Match>,
    index: HashMap<MatchId, usize>,
    empty: Vec<[bool; 2]>,
    byes: HashSet<PlayerId>,
}

impl Arena {
    fn new(matches: Vec<Match>, byes: HashSet<PlayerId>) -> Self {
        let index = matches
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        let empty = vec![[false; 2]; matches.len()];
        Self {
            matches,
            index,
            empty,
            byes,
        }
    }

    fn absent(&self, i: usize, slot: Slot) -> bool {
        self.empty[i][slot.index()]
            || self.matches[i]
                .player(slot)
                .is_some_and(|p| self.byes.contains(p))
    }

    fn absent_sides(&self, i: usize) -> [bool; 2] {
        Slot::BOTH.map(|slot| self.absent(i, slot))
    }

    /// One sweep over the graph. Returns whether anything changed.
    fn pass(&mut self, prior: &PriorResults) -> bool {
        let mut changed = false;
        for i in 0..self.matches.len() {
            changed |= self.fill_slots(i);
            let absent = self.absent_sides(i);
            changed |= settle(&mut self.matches[i], absent, prior);
        }
        changed
    }

    fn feed(&self, source: usize, source_type: SourceType) -> Feed {
        let absent = self.absent_sides(source);
        if absent == [true, true] {
            return Feed::Empty;
        }
        let m = &self.matches[source];
        if m.status != MatchStatus::Finished {
            return Feed::Unknown;
        }
        let incoming = match source_type {
            SourceType::Winner => m.winner_id.clone(),
            SourceType::Loser if absent.contains(&true) => return Feed::Empty,
            SourceType::Loser => m.loser_id().cloned(),
        };
        incoming.map_or(Feed::Unknown, Feed::Player)
    }

    /// Pull players into open slots from decided source matches, or mark the slot empty.
    fn fill_slots(&mut self, i: usize) -> bool {
        let mut changed = false;
        for slot in Slot::BOTH {
            if self.matches[i].player(slot).is_some() || self.empty[i][slot.index()] {
                continue;
            }
            let Some((source_id, source_type)) = self.matches[i].source(slot) else {
                continue;
            };
            let Some(&source) = self.index.get(source_id) else {
                continue;
            };
            match self.feed(source, source_type) {
                Feed::Unknown => continue,
                Feed::Empty => self.empty[i][slot.index()] = true,
                Feed::Player(id) => {
                    let m = &mut self.matches[i];
                    match slot {
                        Slot::One => m.player1_id = Some(id),
                        Slot::Two => m.player2_id = Some(id),
                    }
                }
            }
            changed = true;
        }
        changed
    }
}

/// Result-bearing fields of a match, derived from its players and the recorded results.
#[derive(Debug, PartialEq)]
struct Outcome {
    score1: Option<u32>,
    score2: Option<u32>,
    micro_points: Vec<serde_json::Value>,
    winner_id: Option<PlayerId>,
    status: MatchStatus,
}

impl Outcome {
    fn unplayed(status: MatchStatus) -> Self {
        Self {
            score1: None,
            score2: None,
            micro_points: Vec::new(),
            winner_id: None,
            status,
        }
    }

    fn is_current(&self, m: &Match) -> bool {
        self.score1 == m.score1
            && self.score2 == m.score2
            && self.micro_points == m.micro_points
            && self.winner_id == m.winner_id
            && self.status == m.status
    }

    fn apply(self, m: &mut Match) {
        m.score1 = self.score1;
        m.score2 = self.score2;
        m.micro_points = self.micro_points;
        m.winner_id = self.winner_id;
        m.status = self.status;
    }
}

/// Recompute a match's outcome and write it back if it differs.
fn settle(m: &mut Match, absent: [bool; 2], prior: &PriorResults) -> bool {
    let outcome = derive_outcome(m, absent, prior);
    if outcome.is_current(m) {
        return false;
    }
    outcome.apply(m);
    true
}

fn derive_outcome(m: &Match, absent: [bool; 2], prior: &PriorResults) -> Outcome {
    let p1 = m.player1_id.as_ref().filter(|_| !absent[0]);
    let p2 = m.player2_id.as_ref().filter(|_| !absent[1]);

    match (p1, p2) {
        (Some(p1), Some(p2)) => match prior.get(&m.id) {
            Some(snapshot) => merge_snapshot(m, p1, p2, snapshot),
            None => Outcome::unplayed(MatchStatus::Pending),
        },
        (Some(p1), None) if absent[1] => walkover(p1, 1, 0),
        (None, Some(p2)) if absent[0] => walkover(p2, 0, 1),
        // Two byes: nothing to play, nobody advances.
        _ if m.player1_id.is_some() && m.player2_id.is_some() => {
            Outcome::unplayed(MatchStatus::Pending)
        }
        _ => Outcome::unplayed(MatchStatus::Scheduled),
    }
}

fn walkover(winner: &PlayerId, score1: u32, score2: u32) -> Outcome {
    Outcome {
        score1: Some(score1),
        score2: Some(score2),
        micro_points: Vec::new(),
        winner_id: Some(winner.clone()),
        status: MatchStatus::Finished,
    }
}

/// Take scores and sub-scores from the snapshot. An explicit winner is kept only when it
/// is one of the two players and the scores do not already name the other one;
/// otherwise the winner comes from the scores.
fn merge_snapshot(m: &Match, p1: &PlayerId, p2: &PlayerId, snapshot: &ResultSnapshot) -> Outcome {
    let by_scores = winner_from_scores(m.wins_needed(), p1, p2, snapshot);
    let winner_id = snapshot
        .winner_id
        .as_ref()
        .filter(|w| *w == p1 || *w == p2)
        .filter(|w| by_scores.as_ref().map_or(true, |s| s == *w))
        .cloned()
        .or(by_scores);

    let status = if winner_id.is_some() {
        MatchStatus::Finished
    } else if snapshot.score1.is_some() || snapshot.score2.is_some() {
        MatchStatus::Live
    } else {
        MatchStatus::Pending
    };

    Outcome {
        score1: snapshot.score1,
        score2: snapshot.score2,
        micro_points: snapshot.micro_points.clone(),
        winner_id,
        status,
    }
}

/// The side that reached `wins_needed` while ahead, if any.
fn winner_from_scores(
    wins_needed: u32,
    p1: &PlayerId,
    p2: &PlayerId,
    snapshot: &ResultSnapshot,
) -> Option<PlayerId> {
    let s1 = snapshot.score1.unwrap_or(0);
    let s2 = snapshot.score2.unwrap_or(0);
    if s1 >= wins_needed && s1 > s2 {
        Some(p1.clone())
    } else if s2 >= wins_needed && s2 > s1 {
        Some(p2.clone())
    } else {
        None
    }
}

/// Log snapshots the engine could not use as given.
fn report_ignored(arena: &Arena, prior: &PriorResults) {
    let mut ids: Vec<&MatchId> = prior.keys().collect();
    ids.sort();
    for id in ids {
        let snapshot = &prior[id];
        let Some(&i) = arena.index.get(id.as_str()) else {
            log::warn!("Ignoring result for unknown match {}", id);
            continue;
        };
        let m = &arena.matches[i];
        if arena.absent_sides(i).contains(&true) {
            log::debug!("Ignoring result for walkover match {}", id);
            continue;
        }
        let (Some(p1), Some(p2)) = (&m.player1_id, &m.player2_id) else {
            log::debug!("Holding result for {} until both players are known", id);
            continue;
        };
        let Some(winner) = &snapshot.winner_id else {
            continue;
        };
        if !m.has_player(winner) {
            log::warn!(
                "Ignoring winner {} for match {}: not one of its players",
                winner,
                id
            );
        } else if winner_from_scores(m.wins_needed(), p1, p2, snapshot)
            .is_some_and(|by_scores| by_scores != *winner)
        {
            log::warn!(
                "Ignoring winner {} for match {}: the scores give the match to the other player",
                winner,
                id
            );
        }
    }
}
