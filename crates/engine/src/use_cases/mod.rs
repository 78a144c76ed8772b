//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate across the domain aggregate and the ports.

pub mod character;
pub mod economy;
pub mod effects;
pub mod settlement;
pub mod turn;

// Re-export main types
pub use settlement::{SettlementContext, SettlementLog};
pub use turn::{PlayTurn, TurnError, TurnOutcome, TurnRequest};
