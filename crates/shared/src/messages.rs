//! Turn DTOs exchanged with a front end
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Unknown enum variants deserialize to `Unknown` for forward compatibility
//! - DTOs carry raw `uuid::Uuid`, not domain ids

use lingshu_domain::value_objects::{Rank, ResourcePool};
use lingshu_domain::PlayerCharacter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layer::LayerFields;

/// A player action submitted for settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSubmission {
    pub player_input: String,
    /// NPC currently selected in the UI, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_npc: Option<Uuid>,
}

impl TurnSubmission {
    pub fn new(player_input: impl Into<String>) -> Self {
        Self {
            player_input: player_input.into(),
            selected_npc: None,
        }
    }

    pub fn with_selected_npc(mut self, npc: Uuid) -> Self {
        self.selected_npc = Some(npc);
        self
    }
}

/// Everything a front end needs to render a settled turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReport {
    /// The layered narrative as stored
    pub narrative: String,
    /// The decoded layer, for convenience
    pub layer: LayerFields,
    /// Settlement audit lines in order
    pub lines: Vec<String>,
    /// Player numbers after settlement
    pub player: PlayerSummary,
    /// RFC 3339 timestamp of the settlement
    pub settled_at: String,
}

/// The player numbers a HUD shows after a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub rank: Rank,
    pub xp: i64,
    pub max_xp: i64,
    pub hp: ResourcePool,
    pub mp: ResourcePool,
    pub sanity: ResourcePool,
    pub charisma: ResourcePool,
    pub credits: i64,
}

impl From<&PlayerCharacter> for PlayerSummary {
    fn from(player: &PlayerCharacter) -> Self {
        let pools = player.pools();
        Self {
            rank: player.rank(),
            xp: player.psionic().xp(),
            max_xp: player.psionic().max_xp(),
            hp: pools.hp,
            mp: pools.mp,
            sanity: pools.sanity,
            charisma: pools.charisma,
            credits: player.currency.credits(),
        }
    }
}

/// Why a turn produced no settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnFailureCode {
    NarrativeFailed,
    Cancelled,
    TimedOut,
    TurnInFlight,
    #[serde(other)]
    Unknown,
}

/// Messages from a front end to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    SubmitTurn(TurnSubmission),
    CancelTurn,
    #[serde(other)]
    Unknown,
}

/// Messages from the engine to a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    TurnSettled(SettlementReport),
    TurnFailed {
        code: TurnFailureCode,
        message: String,
    },
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_wire_shape() {
        let json = serde_json::to_value(TurnSubmission::new("我攻击守卫")).expect("serialize");
        assert_eq!(json, serde_json::json!({ "playerInput": "我攻击守卫" }));
    }

    #[test]
    fn test_client_message_tagged() {
        let npc = Uuid::new_v4();
        let message = ClientMessage::SubmitTurn(TurnSubmission::new("hi").with_selected_npc(npc));
        let json = serde_json::to_string(&message).expect("serialize");
        assert!(json.contains(r#""type":"SubmitTurn""#));
        let back: ClientMessage = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, message);
    }

    #[test]
    fn test_player_summary_reads_pools() {
        let player = PlayerCharacter::new("林夜", lingshu_domain::Gender::Female)
            .expect("valid name")
            .with_credits(42);
        let summary = PlayerSummary::from(&player);
        assert_eq!(summary.rank, Rank::Lv1);
        assert_eq!(summary.max_xp, 100);
        assert_eq!(summary.mp.max(), 300);
        assert_eq!(summary.credits, 42);
    }

    #[test]
    fn test_unknown_variants_are_tolerated() {
        let message: ServerMessage =
            serde_json::from_str(r#"{"type":"SomethingNew"}"#).expect("deserialize");
        assert_eq!(message, ServerMessage::Unknown);

        let code: TurnFailureCode = serde_json::from_str(r#""exploded""#).expect("deserialize");
        assert_eq!(code, TurnFailureCode::Unknown);
    }
}
