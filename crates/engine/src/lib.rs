//! Lingshu Engine library.
//!
//! Turns free-form narrative into deterministic game-state mutations.
//!
//! ## Structure
//!
//! - `use_cases/` - Effect parsing, settlement, economy and the turn orchestrator
//! - `infrastructure/` - External dependency implementations (ports + adapters)

pub mod infrastructure;
pub mod use_cases;

pub use use_cases::{PlayTurn, TurnError, TurnOutcome, TurnRequest};
