//! Static bracket topology: every match, its format, and the links between matches.

use crate::models::{Branch, BracketError, Match, MatchId, Slot, SourceType, BRACKET_SIZE};
use std::collections::HashMap;

/// Number of matches in the full placement cascade (every entrant plays five).
pub const BLUEPRINT_LEN: usize = 80;

/// Where a slot's player comes from during construction.
#[derive(Clone, Debug)]
struct Feed {
    match_id: MatchId,
    source_type: SourceType,
}

/// Build the full 32-entrant graph: the winners bracket plus every placement branch.
///
/// Only winners-bracket round 1 is left without source links; the engine seeds it.
/// Matches come out in topological order (every match after the matches feeding it).
pub fn build_blueprint() -> Vec<Match> {
    let mut matches = Vec::with_capacity(BLUEPRINT_LEN);
    build_branch(Branch::Wb, vec![None; BRACKET_SIZE], &mut matches);
    link_forward(&mut matches);
    matches
}

fn match_id(branch: Branch, round: u8, index: usize, is_final: bool) -> MatchId {
    match branch {
        Branch::Wb => format!("wb-r{}-m{}", round, index),
        _ if is_final => format!("{}-f", branch),
        _ => format!("{}-r{}-m{}", branch, round, index),
    }
}

/// Single-elimination ladder for `entrants`; each round's losers start a lower branch.
fn build_branch(branch: Branch, entrants: Vec<Option<Feed>>, out: &mut Vec<Match>) {
    let rounds = entrants.len().trailing_zeros() as u8;
    let format = branch.format();
    let mut feeds = entrants;
    let mut lower_branches = Vec::new();

    for round in 1..=rounds {
        let is_final = round == rounds;
        let best_of = if is_final {
            format.final_best_of
        } else {
            format.rounds_best_of
        };
        let mut winners = Vec::with_capacity(feeds.len() / 2);
        let mut losers = Vec::with_capacity(feeds.len() / 2);

        for (i, pair) in feeds.chunks_exact(2).enumerate() {
            let id = match_id(branch, round, i + 1, is_final);
            let mut m = Match::new(id.clone(), branch, round, best_of);
            if let Some(feed) = &pair[0] {
                m.source_match_id1 = Some(feed.match_id.clone());
                m.source_type1 = Some(feed.source_type);
            }
            if let Some(feed) = &pair[1] {
                m.source_match_id2 = Some(feed.match_id.clone());
                m.source_type2 = Some(feed.source_type);
            }
            out.push(m);
            winners.push(Some(Feed {
                match_id: id.clone(),
                source_type: SourceType::Winner,
            }));
            losers.push(Some(Feed {
                match_id: id,
                source_type: SourceType::Loser,
            }));
        }

        if !is_final {
            // Everyone still in this branch finishes above this round's losers.
            let place = usize::from(branch.top_place()) + winners.len();
            match Branch::from_top_place(place) {
                Some(lower) => lower_branches.push((lower, losers)),
                None => log::error!("No placement branch for place {} below {}", place, branch),
            }
        }
        feeds = winners;
    }

    for (lower, entrants) in lower_branches {
        build_branch(lower, entrants, out);
    }
}

/// Mirror every source link as a `next_match_id` / `loser_match_id` on the source.
fn link_forward(matches: &mut [Match]) {
    let index: HashMap<MatchId, usize> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id.clone(), i))
        .collect();

    let mut links: Vec<(usize, MatchId, SourceType)> = Vec::new();
    for m in matches.iter() {
        let sources = [
            m.source_match_id1.as_ref().zip(m.source_type1),
            m.source_match_id2.as_ref().zip(m.source_type2),
        ];
        for (src, ty) in sources.into_iter().flatten() {
            if let Some(&i) = index.get(src) {
                links.push((i, m.id.clone(), ty));
            }
        }
    }

    for (i, target, ty) in links {
        match ty {
            SourceType::Winner => matches[i].next_match_id = Some(target),
            SourceType::Loser => matches[i].loser_match_id = Some(target),
        }
    }
}

/// One-time self-check of a graph: unique ids, resolvable links, and forward links
/// that agree with source links in both directions.
pub fn validate_blueprint(matches: &[Match]) -> Result<(), BracketError> {
    let mut index: HashMap<&str, &Match> = HashMap::with_capacity(matches.len());
    for m in matches {
        if index.insert(m.id.as_str(), m).is_some() {
            return Err(BracketError::DuplicateMatchId(m.id.clone()));
        }
    }

    for m in matches {
        check_shape(m, &index)?;
    }
    for m in matches {
        check_back_links(m, &index)?;
        check_forward_links(m, &index)?;
    }
    Ok(())
}

fn links(m: &Match) -> [Option<&MatchId>; 4] {
    [
        m.source_match_id1.as_ref(),
        m.source_match_id2.as_ref(),
        m.next_match_id.as_ref(),
        m.loser_match_id.as_ref(),
    ]
}

/// Both slots sourced (or neither, for seeded matches), no self links, no dangling ids.
fn check_shape(m: &Match, index: &HashMap<&str, &Match>) -> Result<(), BracketError> {
    let slot1 = (m.source_match_id1.is_some(), m.source_type1.is_some());
    let slot2 = (m.source_match_id2.is_some(), m.source_type2.is_some());
    let seeded = m.bracket == Branch::Wb && m.round == 1;
    let shape_ok = match (slot1, slot2) {
        ((true, true), (true, true)) => true,
        ((false, false), (false, false)) => seeded,
        _ => false,
    };
    if !shape_ok {
        return Err(BracketError::MissingSource(m.id.clone()));
    }

    for target in links(m).into_iter().flatten() {
        if *target == m.id {
            return Err(BracketError::SelfReference(m.id.clone()));
        }
        if !index.contains_key(target.as_str()) {
            return Err(BracketError::UnknownMatch {
                from: m.id.clone(),
                to: target.clone(),
            });
        }
    }
    Ok(())
}

/// Every source must name this match as its next (winner) or loser destination.
fn check_back_links(m: &Match, index: &HashMap<&str, &Match>) -> Result<(), BracketError> {
    for (src, ty) in [
        (&m.source_match_id1, m.source_type1),
        (&m.source_match_id2, m.source_type2),
    ] {
        let (Some(src), Some(ty)) = (src, ty) else {
            continue;
        };
        let Some(source) = index.get(src.as_str()) else {
            continue;
        };
        let forward = match ty {
            SourceType::Winner => &source.next_match_id,
            SourceType::Loser => &source.loser_match_id,
        };
        if forward.as_deref() != Some(m.id.as_str()) {
            return Err(BracketError::InconsistentLink {
                from: src.clone(),
                to: m.id.clone(),
            });
        }
    }
    Ok(())
}

/// Every destination must have a slot sourced from this match with the matching type.
fn check_forward_links(m: &Match, index: &HashMap<&str, &Match>) -> Result<(), BracketError> {
    for (target, ty) in [
        (&m.next_match_id, SourceType::Winner),
        (&m.loser_match_id, SourceType::Loser),
    ] {
        let Some(target) = target else { continue };
        let Some(next) = index.get(target.as_str()) else {
            continue;
        };
        let fed = Slot::BOTH
            .into_iter()
            .any(|slot| next.source(slot) == Some((&m.id, ty)));
        if !fed {
            return Err(BracketError::InconsistentLink {
                from: m.id.clone(),
                to: target.clone(),
            });
        }
    }
    Ok(())
}
