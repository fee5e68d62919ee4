//! Player data structure.

use serde::{Deserialize, Serialize};

/// Identifier for a player. Owned by whoever supplies the player list.
pub type PlayerId = String;

/// Display name given to synthetic bye entrants.
pub const BYE_NAME: &str = "BYE";

/// Id prefix of synthetic byes. Real entrants may not use it.
pub const BYE_ID_PREFIX: &str = "bye-";

/// A tournament entrant, or a synthetic bye used to fill the bracket to 32.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    #[serde(alias = "full_name")]
    pub full_name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub elo: i32,
    /// Synthetic filler, never a real entrant.
    #[serde(default)]
    pub is_bye: bool,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, full_name: impl Into<String>, elo: i32) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            country: String::new(),
            elo,
            is_bye: false,
        }
    }

    /// Builder-style country setter.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Synthetic bye occupying the given seed.
    pub fn bye(seed: usize) -> Self {
        Self {
            id: format!("{BYE_ID_PREFIX}{seed}"),
            full_name: BYE_NAME.to_string(),
            country: String::new(),
            elo: 0,
            is_bye: true,
        }
    }
}
