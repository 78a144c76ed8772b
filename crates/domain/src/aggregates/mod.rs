//! Aggregates: the player record and the game state around it

mod game_state;
mod player_character;

pub use game_state::GameState;
pub use player_character::{
    PlayerCharacter, DEFAULT_CHARISMA_POOL, DEFAULT_HP, DEFAULT_SANITY, MAX_NAME_LENGTH,
};
