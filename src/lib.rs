//! Placement bracket organizer: library with models and bracket resolution logic.

pub mod logic;
pub mod models;

pub use logic::{
    build_blueprint, clear_result, current_bracket, place_seeds, rank_players, record_result,
    resolve, standings, validate_blueprint, Resolver, BLUEPRINT_LEN, MAX_PASSES, SEED_PAIRS,
};
pub use models::{
    BracketError, BracketView, Branch, BranchFormat, Match, MatchId, MatchStatus, Player,
    PlayerId, PriorResults, ResultSnapshot, Slot, SourceType, Standing, Tournament,
    TournamentError, TournamentId, BRACKET_SIZE, BRANCH_FORMATS, BYE_ID_PREFIX, BYE_NAME,
};
