//! Lingshu Shared - wire formats between the settlement engine and front ends
//!
//! - `layer`: the pseudo-layer codec that embeds body, choices and summary in
//!   one narrative string
//! - `messages`: turn submission and settlement report DTOs
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde, serde_json, uuid, tracing
//! 2. **No settlement logic** - pure data types and the codec
//! 3. **No domain IDs** - use raw `uuid::Uuid` in DTOs

pub mod layer;
pub mod messages;

pub use layer::{decode, encode, has_layer, normalize, replace_body, strip_layer, LayerFields};
pub use messages::{
    ClientMessage, PlayerSummary, ServerMessage, SettlementReport, TurnFailureCode,
    TurnSubmission,
};
