//! Data structures for the placement bracket: players, matches, branches, tournament sessions.

mod bracket;
mod branch;
mod game;
mod player;
mod tournament;

pub use bracket::{BracketError, BracketView, Standing, BRACKET_SIZE};
pub use branch::{Branch, BranchFormat, BRANCH_FORMATS};
pub use game::{Match, MatchId, MatchStatus, PriorResults, ResultSnapshot, Slot, SourceType};
pub use player::{Player, PlayerId, BYE_ID_PREFIX, BYE_NAME};
pub use tournament::{Tournament, TournamentError, TournamentId};
