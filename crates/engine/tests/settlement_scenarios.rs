//! End-to-end settlement scenarios through the public API.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio_util::sync::CancellationToken;

use lingshu_domain::value_objects::SixDimKey;
use lingshu_domain::{
    Equippable, ExchangeOutcome, GameState, Gender, LootKind, Npc, PlayerCharacter,
    Rank, SixDimProfile,
};
use lingshu_engine::infrastructure::clock::FixedClock;
use lingshu_engine::infrastructure::narrative::FixedNarrative;
use lingshu_engine::use_cases::economy;
use lingshu_engine::use_cases::effects::{aggregate_bonus, equip_item, equip_skill, unequip_skill};
use lingshu_engine::use_cases::settlement::{
    compute_cost, settle_intent_cost, settle_narrative, SceneIntent, SettlementContext,
    NEGATED_LINE,
};
use lingshu_engine::{PlayTurn, TurnRequest};

fn player(gender: Gender) -> PlayerCharacter {
    PlayerCharacter::new("林夜", gender).expect("valid name")
}

fn assert_invariants(state: &GameState) {
    for pool in state.player.pool_list() {
        assert!(0 <= pool.current() && pool.current() <= pool.max(), "{:?}", pool);
    }
    let six_dim = &state.player.six_dim;
    for (key, value) in six_dim.iter() {
        assert!((1..=six_dim.cap()).contains(&value), "{:?} = {}", key, value);
    }
}

#[test]
fn scenario_1_melee_cost() {
    let six_dim = SixDimProfile::default()
        .with(SixDimKey::Strength, 20)
        .with(SixDimKey::Agility, 10)
        .with(SixDimKey::Constitution, 10);
    let cost = compute_cost("我攻击守卫", &six_dim);

    assert_eq!(cost.scene, SceneIntent::CombatMelee);
    assert_eq!(cost.power, 15);
    assert_eq!(cost.dc, 16);
    assert_eq!(cost.gap, 1);
    assert_eq!(cost.mp, 6);
    assert_eq!(cost.sanity, 1);

    let mut state = GameState::new(player(Gender::Male).with_six_dim(six_dim));
    let log = settle_intent_cost(&mut state, "我攻击守卫", &SettlementContext::default());
    assert_eq!(log.lines()[2], "【代价】灵力 -6，理智 -1");
    assert_eq!(state.player.pools().mp.current(), 100 - 6);
    assert_invariants(&state);
}

#[test]
fn scenario_2_kill_with_core_harvest() {
    let mut state = GameState::new(player(Gender::Male));
    let log = settle_narrative(&mut state, "成功击杀了Lv.3的目标，并掏核");

    assert_eq!(
        log.lines(),
        [
            "【击杀】确认击杀 1 名 Lv.3 目标",
            "【奖励】信用点 +45，经验 +60（当前 Lv.1，经验 60/100）",
            "【战利品】Lv.3 躯体素材 ×1，Lv.3 核心碎片 ×1",
        ]
    );
    assert_eq!(state.player.currency.credits(), 45);
    assert_eq!(state.player.psionic().xp(), 60);
    let inventory = &state.player.inventory;
    assert_eq!(inventory.loot_quantity(LootKind::BodyMaterial, Rank::Lv3), 1);
    assert_eq!(inventory.loot_quantity(LootKind::CoreFragment, Rank::Lv3), 1);
}

#[test]
fn scenario_3_effect_tag_bonus() {
    let bonus = aggregate_bonus(["[EFFECT|target=player.sixdim.力量|op=add|value=5]"]);
    assert_eq!(bonus.six_dim_delta(SixDimKey::Strength), 5);
    assert_eq!(bonus.six_dim.len(), 1);
    assert_eq!(bonus.conversion, 0.0);
    assert_eq!(bonus.recovery, 0.0);
    assert_eq!(bonus.charisma, 0);
    assert!(!bonus.can_fly);
}

#[test]
fn scenario_4_exchange_up() {
    let mut state = GameState::new(player(Gender::Female).with_credits(100));
    let receipt = economy::exchange_up(&mut state, 100);
    assert!(receipt.outcome.is_applied());
    assert_eq!(state.player.currency.credits(), 0);
    assert_eq!(state.player.currency.vault_balance(Rank::Lv2), 20);

    let mut state = GameState::new(player(Gender::Female).with_credits(100));
    let before = state.clone();
    let receipt = economy::exchange_up(&mut state, 101);
    assert!(matches!(
        receipt.outcome,
        ExchangeOutcome::InsufficientBalance { .. }
    ));
    assert_eq!(state, before);
}

#[test]
fn scenario_5_negation_overrides_kill() {
    let mut state = GameState::new(player(Gender::Female));
    let before = state.clone();
    let log = settle_narrative(&mut state, "未击杀任何目标，但提到了杀戮的传说");
    assert_eq!(log.lines(), [NEGATED_LINE]);
    assert_eq!(state, before);
}

#[test]
fn equipment_changes_drive_effective_values() {
    let mut state = GameState::new(player(Gender::Female)).with_npc(Npc::new("苏璃", Gender::Female));
    let arm = state.player.body_parts[2].id;
    let charm = Equippable::new("魅影")
        .with_description("[EFFECT|target=player.sixdim.魅力|op=add|value=10]");
    let charm_id = charm.id;
    equip_skill(&mut state.player, arm, charm).expect("slot free");
    equip_item(
        &mut state.player,
        arm,
        Equippable::new("香囊").with_description("魅力+5"),
    )
    .expect("slot free");
    assert_eq!(state.player.effective_six_dim().get(SixDimKey::Charisma), 20);
    assert_eq!(state.player.body_parts[2].skills().len(), 1);
    assert_eq!(state.player.equipped_texts().len(), 2);

    unequip_skill(&mut state.player, arm, charm_id).expect("equipped");
    assert_eq!(state.player.effective_six_dim().get(SixDimKey::Charisma), 15);
    assert_eq!(
        state.player.runtime_bonus().six_dim_delta(SixDimKey::Charisma),
        5
    );
}

#[test]
fn identical_inputs_settle_identically() {
    let base = GameState::new(player(Gender::Female)).with_npc(Npc::new("老陈", Gender::Male));
    let input = "我全力说服老陈";
    let combined = format!(
        "{}\n随后你击杀了两名Lv.2男子。[状态|part=头|name=眩晕|type=负面]",
        input
    );
    let run = |mut state: GameState| {
        let mut log = settle_intent_cost(&mut state, input, &SettlementContext::default());
        log.append(settle_narrative(&mut state, &combined));
        (state, log)
    };

    let (state_a, log_a) = run(base.clone());
    let (state_b, log_b) = run(base.clone());

    assert_eq!(log_a, log_b);
    assert_eq!(state_a, state_b);
    assert_ne!(state_a, base);
    assert_eq!(state_a.player.body_parts[0].status_affixes[0].id, "head-1");
}

#[test]
fn pools_stay_clamped_and_rank_never_drops() {
    let mut state = GameState::new(player(Gender::Male)).with_location("荒野");
    let mut rank = state.player.rank();
    let inputs = [
        ("我不顾一切地冲向敌阵", "你击杀了Lv.5首领，又斩杀了三名Lv.4护卫"),
        ("我孤注一掷地施法", "[核心状态|name=透支|type=debuff]"),
        ("我拼命说服她", "她摇头。"),
        ("我拼命攻击", "你消灭了Lv.5的巨兽"),
    ];
    for _ in 0..20 {
        for (input, narrative) in inputs {
            settle_intent_cost(&mut state, input, &SettlementContext::default());
            settle_narrative(&mut state, &format!("{}\n{}", input, narrative));
            economy::convert_mp_to_currency(&mut state, 10);
            assert_invariants(&state);
            assert!(state.player.rank() >= rank);
            rank = state.player.rank();
        }
    }
    assert_eq!(state.player.rank(), Rank::Lv5);
    assert_eq!(state.player.pools().mp.current(), 0);
    assert!(state.player.psionic().xp() <= Rank::Lv5.xp_threshold());
}

#[tokio::test]
async fn full_turn_with_prerecorded_narrative() {
    let clock = FixedClock(
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0)
            .single()
            .expect("valid date"),
    );
    let turn = PlayTurn::new(
        Arc::new(FixedNarrative::new(
            "你悄悄绕到守卫身后，将其击杀。[状态|part=右臂|name=擦伤|type=负面]",
        )),
        Arc::new(clock),
        Duration::from_secs(5),
    );
    let mut state = GameState::new(player(Gender::Female));
    let outcome = turn
        .execute(&mut state, TurnRequest::new("我潜行接近守卫"), CancellationToken::new())
        .await
        .expect("turn settles");

    assert_eq!(outcome.lines[0], "【场景】潜行隐匿");
    assert!(outcome.lines.iter().any(|l| l == "【击杀】确认击杀 1 名 Lv.1 目标"));
    assert_eq!(outcome.lines.last().map(String::as_str), Some("【状态】右臂 获得减益「擦伤」"));
    assert_eq!(state.player.body_parts[3].status_affixes.len(), 1);

    let report = outcome.to_report(&state);
    assert_eq!(report.settled_at, "2026-03-01T08:30:00+00:00");
    assert_eq!(report.player.credits, 15);
    assert!(report.layer.body.starts_with("你悄悄绕到守卫身后"));
}
