//! Turn orchestration.
//!
//! One turn: charge the action's intent cost, ask the narrative port for
//! prose, wrap it in a layer, then settle kills and status tags from the
//! combined text. All of it runs on a staged copy of the state that replaces
//! the caller's only once the narrative has fully arrived, so a failed,
//! cancelled or timed-out generation leaves no trace.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use lingshu_domain::{GameState, NpcId};
use lingshu_shared::{
    decode, encode, has_layer, LayerFields, PlayerSummary, ServerMessage, SettlementReport,
    TurnFailureCode, TurnSubmission,
};

use crate::infrastructure::ports::{ClockPort, NarrativeError, NarrativePort, NarrativeRequest};
use crate::use_cases::effects::recompute_bonus;
use crate::use_cases::settlement::{
    settle_intent_cost, settle_narrative, SettlementContext, SettlementLog,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub player_input: String,
    pub selected_npc: Option<NpcId>,
}

impl TurnRequest {
    pub fn new(player_input: impl Into<String>) -> Self {
        Self {
            player_input: player_input.into(),
            selected_npc: None,
        }
    }

    pub fn with_selected_npc(mut self, npc: NpcId) -> Self {
        self.selected_npc = Some(npc);
        self
    }
}

impl From<TurnSubmission> for TurnRequest {
    fn from(submission: TurnSubmission) -> Self {
        Self {
            player_input: submission.player_input,
            selected_npc: submission.selected_npc.map(NpcId::from_uuid),
        }
    }
}

/// A fully settled turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Layered narrative
    pub narrative: String,
    pub lines: Vec<String>,
    pub settled_at: DateTime<Utc>,
}

impl TurnOutcome {
    /// Front-end view of this turn against the settled state.
    pub fn to_report(&self, state: &GameState) -> SettlementReport {
        SettlementReport {
            narrative: self.narrative.clone(),
            layer: decode(&self.narrative),
            lines: self.lines.clone(),
            player: PlayerSummary::from(&state.player),
            settled_at: self.settled_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("Narrative generation failed: {0}")]
    Narrative(#[from] NarrativeError),
    #[error("Turn cancelled before the narrative arrived")]
    Cancelled,
    #[error("Narrative generation timed out after {after_ms}ms")]
    TimedOut { after_ms: u64 },
    #[error("A turn is already in flight")]
    TurnInFlight,
}

impl TurnError {
    pub fn code(&self) -> TurnFailureCode {
        match self {
            Self::Narrative(_) => TurnFailureCode::NarrativeFailed,
            Self::Cancelled => TurnFailureCode::Cancelled,
            Self::TimedOut { .. } => TurnFailureCode::TimedOut,
            Self::TurnInFlight => TurnFailureCode::TurnInFlight,
        }
    }

    pub fn to_server_message(&self) -> ServerMessage {
        ServerMessage::TurnFailed {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Clears the in-flight flag however the turn ends, including when the
/// `execute` future is dropped mid-await.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Play one turn against a narrative source.
pub struct PlayTurn {
    narrative: Arc<dyn NarrativePort>,
    clock: Arc<dyn ClockPort>,
    timeout: Duration,
    in_flight: AtomicBool,
}

impl PlayTurn {
    pub fn new(
        narrative: Arc<dyn NarrativePort>,
        clock: Arc<dyn ClockPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            narrative,
            clock,
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Settle one turn.
    ///
    /// # Errors
    ///
    /// Returns `TurnError` when no narrative is available for this turn; `state`
    /// is left untouched in every error case.
    pub async fn execute(
        &self,
        state: &mut GameState,
        request: TurnRequest,
        cancel: CancellationToken,
    ) -> Result<TurnOutcome, TurnError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("Rejected turn: another turn is in flight");
            return Err(TurnError::TurnInFlight);
        };

        let input = request.player_input.trim();
        tracing::info!(input_chars = input.chars().count(), "Turn started");

        let mut staged = state.clone();
        // The runtime bonus is never persisted; a loaded state arrives without it.
        recompute_bonus(&mut staged.player);
        let context = SettlementContext {
            selected_npc: request.selected_npc,
        };
        let mut log = settle_intent_cost(&mut staged, input, &context);

        let narrative_request = NarrativeRequest::new(input).with_prompt(build_prompt(input, &log));
        let generation = tokio::time::timeout(
            self.timeout,
            self.narrative.generate(narrative_request),
        );
        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Turn cancelled; discarding staged settlement");
                return Err(TurnError::Cancelled);
            }
            result = generation => match result {
                Err(_) => {
                    let after_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                    tracing::warn!(after_ms, "Narrative generation timed out");
                    return Err(TurnError::TimedOut { after_ms });
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Narrative generation failed");
                    return Err(e.into());
                }
                Ok(Ok(text)) => text,
            },
        };

        let narrative = if has_layer(&text) {
            text
        } else {
            encode(&LayerFields::from_body(text))
        };
        let body = decode(&narrative).body;
        let combined = format!("{}\n{}", input, body);
        log.append(settle_narrative(&mut staged, &combined));

        *state = staged;
        let settled_at = self.clock.now();
        tracing::info!(lines = log.len(), %settled_at, "Turn settled");

        Ok(TurnOutcome {
            narrative,
            lines: log.into_lines(),
            settled_at,
        })
    }
}

/// The player's words followed by the costs already charged.
fn build_prompt(input: &str, cost_log: &SettlementLog) -> String {
    let mut prompt = String::from(input);
    for line in cost_log.lines() {
        prompt.push('\n');
        prompt.push_str(line);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockNarrativePort;
    use chrono::TimeZone;
    use crate::use_cases::effects::equip_item;
    use lingshu_domain::{Equippable, Gender, LootKind, Npc, PlayerCharacter, Rank, SixDimKey};

    fn fixed_clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).single().expect("valid date"),
        ))
    }

    fn state() -> GameState {
        GameState::new(PlayerCharacter::new("林夜", Gender::Female).expect("valid name"))
    }

    fn play_turn(narrative: MockNarrativePort) -> PlayTurn {
        PlayTurn::new(Arc::new(narrative), fixed_clock(), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_turn_settles_cost_then_narrative() {
        let mut narrative = MockNarrativePort::new();
        narrative
            .expect_generate()
            .withf(|req| req.player_input == "我攻击守卫" && req.prompt.contains("【代价】"))
            .times(1)
            .returning(|_| Ok("你成功击杀了Lv.3的守卫，并掏核。".to_string()));

        let turn = play_turn(narrative);
        let mut state = state();
        let outcome = turn
            .execute(&mut state, TurnRequest::new("我攻击守卫"), CancellationToken::new())
            .await
            .expect("turn settles");

        assert!(has_layer(&outcome.narrative));
        assert_eq!(outcome.lines[0], "【场景】近战搏斗");
        assert!(outcome.lines.contains(&"【击杀】确认击杀 1 名 Lv.3 目标".to_string()));
        assert_eq!(state.player.currency.credits(), 45);
        assert_eq!(state.player.inventory.loot_quantity(LootKind::CoreFragment, Rank::Lv3), 1);
        assert_eq!(outcome.settled_at.to_rfc3339(), "2026-01-01T12:00:00+00:00");
        assert!(!turn.is_in_flight());
    }

    #[tokio::test]
    async fn test_layered_narrative_kept_as_is() {
        let layered = encode(&LayerFields {
            body: "守卫退开了。".to_string(),
            choices: vec!["继续前进".to_string(), "返回".to_string()],
            summary: vec![("地点".to_string(), "城门".to_string())],
        });
        let returned = layered.clone();
        let mut narrative = MockNarrativePort::new();
        narrative
            .expect_generate()
            .returning(move |_| Ok(returned.clone()));

        let turn = play_turn(narrative);
        let mut state = state();
        let outcome = turn
            .execute(&mut state, TurnRequest::new("我推开守卫"), CancellationToken::new())
            .await
            .expect("turn settles");
        assert_eq!(outcome.narrative, layered);

        let report = outcome.to_report(&state);
        assert_eq!(report.layer.choices, ["继续前进", "返回"]);
        assert_eq!(report.player.credits, 0);
    }

    #[tokio::test]
    async fn test_narrative_failure_leaves_state_untouched() {
        let mut narrative = MockNarrativePort::new();
        narrative
            .expect_generate()
            .returning(|_| Err(NarrativeError::request_failed("backend down")));

        let turn = play_turn(narrative);
        let mut state = state();
        let before = state.clone();
        let err = turn
            .execute(&mut state, TurnRequest::new("我攻击守卫"), CancellationToken::new())
            .await
            .expect_err("narrative failed");

        assert!(matches!(err, TurnError::Narrative(_)));
        assert_eq!(err.code(), TurnFailureCode::NarrativeFailed);
        assert_eq!(state, before);
        assert!(!turn.is_in_flight());
    }

    #[tokio::test]
    async fn test_cancelled_turn_leaves_state_untouched() {
        let mut narrative = MockNarrativePort::new();
        narrative
            .expect_generate()
            .returning(|_| Ok("你击杀了守卫。".to_string()));

        let turn = play_turn(narrative);
        let mut state = state();
        let before = state.clone();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = turn
            .execute(&mut state, TurnRequest::new("我攻击守卫"), cancel)
            .await
            .expect_err("cancelled");

        assert!(matches!(err, TurnError::Cancelled));
        assert_eq!(state, before);
    }

    struct SlowNarrative;

    #[async_trait::async_trait]
    impl NarrativePort for SlowNarrative {
        async fn generate(&self, _request: NarrativeRequest) -> Result<String, NarrativeError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_timed_out_turn_leaves_state_untouched() {
        let turn = PlayTurn::new(Arc::new(SlowNarrative), fixed_clock(), Duration::from_millis(50));
        let mut state = state();
        let before = state.clone();
        let err = turn
            .execute(&mut state, TurnRequest::new("我攻击守卫"), CancellationToken::new())
            .await
            .expect_err("timed out");

        assert!(matches!(err, TurnError::TimedOut { after_ms: 50 }));
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_loaded_state_settles_with_equipment_bonus() {
        let mut player = PlayerCharacter::new("林夜", Gender::Male).expect("valid name");
        let arm = player.body_parts[3].id;
        equip_item(
            &mut player,
            arm,
            Equippable::new("铁拳套")
                .with_description("[EFFECT|target=player.sixdim.力量|op=add|value=10]"),
        )
        .expect("slot free");

        let json = serde_json::to_string(&GameState::new(player)).expect("serialize");
        let mut state: GameState = serde_json::from_str(&json).expect("deserialize");
        assert!(state.player.runtime_bonus().is_empty());

        let mut narrative = MockNarrativePort::new();
        narrative
            .expect_generate()
            .returning(|_| Ok("守卫后退了一步。".to_string()));
        let outcome = play_turn(narrative)
            .execute(&mut state, TurnRequest::new("我攻击守卫"), CancellationToken::new())
            .await
            .expect("turn settles");

        // strength 20 with the gauntlet: power 15 against DC 16
        assert_eq!(outcome.lines[2], "【代价】灵力 -6，理智 -1");
        assert_eq!(state.player.pools().mp.current(), 94);
        assert_eq!(state.player.runtime_bonus().six_dim_delta(SixDimKey::Strength), 10);
    }

    #[tokio::test]
    async fn test_second_turn_rejected_while_first_pending() {
        let turn = PlayTurn::new(Arc::new(SlowNarrative), fixed_clock(), Duration::from_millis(50));
        let mut first_state = state();
        let mut second_state = state();

        let (first, second) = tokio::join!(
            turn.execute(&mut first_state, TurnRequest::new("我攻击守卫"), CancellationToken::new()),
            turn.execute(&mut second_state, TurnRequest::new("我攻击守卫"), CancellationToken::new()),
        );

        assert!(matches!(first, Err(TurnError::TimedOut { .. })));
        assert!(matches!(second, Err(TurnError::TurnInFlight)));
        assert!(!turn.is_in_flight());
    }

    #[tokio::test]
    async fn test_in_flight_flag_rejects_turn() {
        let mut narrative = MockNarrativePort::new();
        narrative.expect_generate().times(0);

        let turn = play_turn(narrative);
        turn.in_flight.store(true, Ordering::Release);
        let mut state = state();
        let err = turn
            .execute(&mut state, TurnRequest::new("我攻击守卫"), CancellationToken::new())
            .await
            .expect_err("in flight");

        assert!(matches!(err, TurnError::TurnInFlight));
        assert!(matches!(
            err.to_server_message(),
            ServerMessage::TurnFailed {
                code: TurnFailureCode::TurnInFlight,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_selected_npc_from_submission() {
        let npc = Npc::new("老陈", Gender::Male);
        let npc_id = npc.id();
        let mut state = state().with_npc(Npc::new("苏璃", Gender::Female)).with_npc(npc);

        let mut narrative = MockNarrativePort::new();
        narrative
            .expect_generate()
            .returning(|_| Ok("对方点了点头。".to_string()));
        let turn = play_turn(narrative);

        let submission = TurnSubmission::new("我对苏璃微笑").with_selected_npc(npc_id.to_uuid());
        turn.execute(&mut state, submission.into(), CancellationToken::new())
            .await
            .expect("turn settles");

        assert_eq!(state.npcs[0].affection(), 0);
        assert_eq!(state.npcs[1].trust(), 1);
    }
}
