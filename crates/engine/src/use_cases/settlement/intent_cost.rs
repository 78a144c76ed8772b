//! Intent-cost resolution.
//!
//! Every recognised action succeeds; only its MP/Sanity/Reputation cost
//! varies with the gap between the action's power and its difficulty:
//!
//! ```text
//! power      = floor(sum(attr * weight%) / 100)
//! gap        = max(0, dc - power)
//! mpCost     = max(2, 5 + ceil(gap * 0.9))
//! sanityCost = ceil(gap * 0.35)
//! repCost    = ceil(gap * 0.25)          (social_charm only)
//! ```
//!
//! All ceilings are computed in integer arithmetic, so the same inputs always
//! produce the same lines.

use lingshu_domain::{GameState, SixDimProfile};

use super::intent::{classify, contains_any, is_action_intent, SceneIntent};
use super::{SettlementContext, SettlementLog};

pub const DC_MINOR: i32 = 12;
pub const DC_STANDARD: i32 = 16;
pub const DC_HIGH_RISK: i32 = 22;

pub const MIN_MP_COST: i64 = 2;
pub const BASE_MP_COST: i64 = 5;

const HIGH_RISK_PHRASES: &[&str] = &[
    "全力", "拼命", "强行", "硬闯", "强攻", "猛攻", "孤注一掷", "不顾一切", "冒险", "以一敌多",
    "死战", "all-out", "reckless", "desperate", "by force",
];

const MINOR_PHRASES: &[&str] = &[
    "试探", "轻轻", "小心", "谨慎", "稍微", "简单", "随便", "轻微", "缓慢", "carefully",
    "gently", "tentative", "probe",
];

pub const NO_INTENT_LINE: &str = "【判定】未识别到行动意图，本回合不结算";
pub const SUCCESS_LINE: &str = "【结果】行动成功（叙事必然成功，仅代价浮动）";
pub const NO_TARGET_LINE: &str = "【关系】未锁定社交对象，关系不变";

/// The computed (not yet charged) cost of one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentCost {
    pub scene: SceneIntent,
    pub power: i32,
    pub dc: i32,
    pub gap: i32,
    pub mp: i64,
    pub sanity: i64,
    pub reputation: i64,
}

/// Difficulty tier from risk phrasing; high risk wins over minor.
pub fn difficulty_class(text: &str) -> i32 {
    let lowered = text.to_lowercase();
    if contains_any(&lowered, HIGH_RISK_PHRASES) {
        DC_HIGH_RISK
    } else if contains_any(&lowered, MINOR_PHRASES) {
        DC_MINOR
    } else {
        DC_STANDARD
    }
}

/// Relationship increase for a Charisma score.
pub fn charisma_bonus(charisma: i32) -> i32 {
    match charisma {
        c if c >= 95 => 12,
        c if c >= 80 => 8,
        c if c >= 60 => 5,
        c if c >= 40 => 2,
        _ => 1,
    }
}

pub fn compute_cost(text: &str, six_dim: &SixDimProfile) -> IntentCost {
    let scene = classify(text);
    let power = six_dim.weighted_score(&scene.weights());
    let dc = difficulty_class(text);
    let gap = (dc - power).max(0);
    let gap_i64 = i64::from(gap);

    let mp = (BASE_MP_COST + ceil_div(gap_i64 * 9, 10)).max(MIN_MP_COST);
    let sanity = ceil_div(gap_i64 * 35, 100).max(0);
    let reputation = if scene == SceneIntent::SocialCharm {
        ceil_div(gap_i64 * 25, 100).max(0)
    } else {
        0
    };

    IntentCost {
        scene,
        power,
        dc,
        gap,
        mp,
        sanity,
        reputation,
    }
}

/// Charge the cost of the action in `text` and, for social actions, move the
/// target NPC's relationship.
pub fn settle_intent_cost(
    state: &mut GameState,
    text: &str,
    context: &SettlementContext,
) -> SettlementLog {
    let mut log = SettlementLog::new();

    if !is_action_intent(text) {
        tracing::debug!("No action intent; skipping cost settlement");
        log.push(NO_INTENT_LINE);
        return log;
    }

    let player = &mut state.player;
    let cost = compute_cost(text, &player.effective_six_dim());
    let mp = player.spend_mp(cost.mp);
    let sanity = player.spend_sanity(cost.sanity);

    log.push(format!("【场景】{}", cost.scene.label()));
    log.push(SUCCESS_LINE);
    if cost.scene == SceneIntent::SocialCharm {
        let reputation = player.spend_reputation(cost.reputation);
        log.push(format!(
            "【代价】灵力 -{}，理智 -{}，声望 -{}",
            mp, sanity, reputation
        ));
    } else {
        log.push(format!("【代价】灵力 -{}，理智 -{}", mp, sanity));
    }
    log.push(format!(
        "【强度】行动强度 {} / 难度 {}（差距 {}）",
        cost.power, cost.dc, cost.gap
    ));

    tracing::info!(
        scene = %cost.scene,
        power = cost.power,
        dc = cost.dc,
        gap = cost.gap,
        mp_charged = mp,
        sanity_charged = sanity,
        "Intent cost settled"
    );

    if cost.scene == SceneIntent::SocialCharm {
        settle_relationship(state, text, context, &mut log);
    }
    log
}

fn settle_relationship(
    state: &mut GameState,
    text: &str,
    context: &SettlementContext,
    log: &mut SettlementLog,
) {
    let charisma = state.player.effective_charisma();
    let Some(index) = state.resolve_npc(context.selected_npc, text) else {
        tracing::debug!("Social action without a resolvable target");
        log.push(NO_TARGET_LINE);
        return;
    };

    let bonus = charisma_bonus(charisma);
    let npc = &mut state.npcs[index];
    let (label, (before, after)) = if npc.gender().is_female() {
        ("好感", npc.raise_affection(bonus))
    } else {
        ("信任", npc.raise_trust(bonus))
    };
    tracing::info!(npc = npc.name(), charisma, before, after, "Relationship raised");
    log.push(format!(
        "【关系】{} {} +{}（{} → {}）",
        npc.name(),
        label,
        after - before,
        before,
        after
    ));
}

/// Ceiling division for a non-negative numerator and positive divisor.
fn ceil_div(numerator: i64, divisor: i64) -> i64 {
    (numerator + divisor - 1).div_euclid(divisor)
}
