//! Bracket logic: blueprint, seeding, resolution, standings, and result entry.

mod blueprint;
mod resolve;
mod seeding;
mod session;
mod standings;

pub use blueprint::{build_blueprint, validate_blueprint, BLUEPRINT_LEN};
pub use resolve::{resolve, Resolver, MAX_PASSES};
pub use seeding::{place_seeds, rank_players, SEED_PAIRS};
pub use session::{clear_result, current_bracket, record_result};
pub use standings::standings;
