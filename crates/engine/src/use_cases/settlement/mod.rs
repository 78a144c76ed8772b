//! Deterministic turn settlement.
//!
//! A turn settles in two passes over the same `GameState`:
//!
//! 1. [`settle_intent_cost`] charges the player's action from the raw input.
//! 2. [`settle_narrative`] scans the combined input and narrative for kills
//!    and status tags.
//!
//! Both passes append to one [`SettlementLog`], the human-readable audit trail
//! of every mutation. Nothing here draws random numbers.

mod intent;
mod intent_cost;
mod kill;
mod status;

pub use intent::{classify, is_action_intent, SceneIntent};
pub use intent_cost::{
    charisma_bonus, compute_cost, difficulty_class, settle_intent_cost, IntentCost, DC_HIGH_RISK,
    DC_MINOR, DC_STANDARD, NO_INTENT_LINE, NO_TARGET_LINE, SUCCESS_LINE,
};
pub use kill::{core_fragments, scan_kills, settle_kills, target_rank, KillScan, NEGATED_LINE};
pub use status::{parse_status_tags, settle_status, StatusTag, NARRATIVE_SOURCE};

use lingshu_domain::{GameState, NpcId};

/// Ordered settlement lines for one turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementLog {
    lines: Vec<String>,
}

impl SettlementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn append(&mut self, other: SettlementLog) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Caller-supplied context for the intent-cost pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementContext {
    /// NPC picked in the UI; wins over a name match while it still exists
    pub selected_npc: Option<NpcId>,
}

impl SettlementContext {
    pub fn with_selected(npc: NpcId) -> Self {
        Self {
            selected_npc: Some(npc),
        }
    }
}

/// Kill rewards then status affixes, from the combined turn text.
pub fn settle_narrative(state: &mut GameState, combined: &str) -> SettlementLog {
    let mut log = settle_kills(state, combined);
    log.append(settle_status(state, combined));
    log
}

/// Both passes in order. `combined` must be the fully generated text; partial
/// output must never be settled.
pub fn settle_turn(
    state: &mut GameState,
    player_input: &str,
    combined: &str,
    context: &SettlementContext,
) -> SettlementLog {
    let mut log = settle_intent_cost(state, player_input, context);
    log.append(settle_narrative(state, combined));
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingshu_domain::{Gender, PlayerCharacter};

    #[test]
    fn test_settle_turn_orders_passes() {
        let player = PlayerCharacter::new("林夜", Gender::Female).expect("valid name");
        let mut state = GameState::new(player);
        let input = "我攻击守卫";
        let combined = format!("{}\n你击杀了Lv.1守卫。[核心状态|name=杀意|type=buff]", input);
        let log = settle_turn(&mut state, input, &combined, &SettlementContext::default());

        let prefixes: Vec<&str> = log
            .lines()
            .iter()
            .map(|l| l.split('】').next().unwrap_or_default())
            .collect();
        assert_eq!(
            prefixes,
            ["【场景", "【结果", "【代价", "【强度", "【击杀", "【奖励", "【战利品", "【核心状态"]
        );
    }

    #[test]
    fn test_log_append_keeps_order() {
        let mut first = SettlementLog::new();
        first.push("a");
        let mut second = SettlementLog::new();
        second.push("b");
        second.push("c");
        first.append(second);
        assert_eq!(first.into_lines(), ["a", "b", "c"]);
    }
}
