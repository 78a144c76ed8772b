//! Rank economy use cases.
//!
//! Thin wrappers over the domain exchange and conversion rules that log each
//! outcome and render a settlement line for the ones that moved value. No-op
//! outcomes are returned unchanged and produce no line.

use lingshu_domain::{ConversionOutcome, ExchangeOutcome, GameState, Promotion};

/// An economy outcome plus its settlement line, when it applied
#[derive(Debug, Clone, PartialEq)]
pub struct EconomyReceipt<O> {
    pub outcome: O,
    pub line: Option<String>,
}

impl<O> EconomyReceipt<O> {
    fn new(outcome: O, line: Option<String>) -> Self {
        Self { outcome, line }
    }
}

/// Current-rank credits into the next rank's vault.
pub fn exchange_up(state: &mut GameState, amount: i64) -> EconomyReceipt<ExchangeOutcome> {
    let outcome = state.player.exchange_up(amount);
    log_exchange("up", amount, &outcome);
    EconomyReceipt::new(outcome, exchange_line(&outcome))
}

/// The next rank's vault back into current-rank credits.
pub fn exchange_down(state: &mut GameState, amount: i64) -> EconomyReceipt<ExchangeOutcome> {
    let outcome = state.player.exchange_down(amount);
    log_exchange("down", amount, &outcome);
    EconomyReceipt::new(outcome, exchange_line(&outcome))
}

pub fn convert_mp_to_xp(state: &mut GameState, mp: i64) -> EconomyReceipt<ConversionOutcome> {
    let outcome = state.player.convert_mp_to_xp(mp);
    log_conversion("mp_to_xp", mp, &state.location, &outcome);
    let line = match outcome {
        ConversionOutcome::Converted {
            spent,
            gained,
            promotion,
        } => Some(format!(
            "【转化】灵力 -{} → 经验 +{}{}",
            spent,
            gained,
            promotion_suffix(promotion)
        )),
        _ => None,
    };
    EconomyReceipt::new(outcome, line)
}

pub fn convert_mp_to_currency(
    state: &mut GameState,
    mp: i64,
) -> EconomyReceipt<ConversionOutcome> {
    let location = state.location.clone();
    let outcome = state.player.convert_mp_to_currency(mp, &location);
    log_conversion("mp_to_currency", mp, &location, &outcome);
    let line = match outcome {
        ConversionOutcome::Converted { spent, gained, .. } => {
            Some(format!("【转化】灵力 -{} → 信用点 +{}", spent, gained))
        }
        _ => None,
    };
    EconomyReceipt::new(outcome, line)
}

pub fn convert_currency_to_mp(
    state: &mut GameState,
    amount: i64,
) -> EconomyReceipt<ConversionOutcome> {
    let location = state.location.clone();
    let outcome = state.player.convert_currency_to_mp(amount, &location);
    log_conversion("currency_to_mp", amount, &location, &outcome);
    let line = match outcome {
        ConversionOutcome::Converted { spent, gained, .. } => {
            Some(format!("【转化】信用点 -{} → 灵力 +{}", spent, gained))
        }
        _ => None,
    };
    EconomyReceipt::new(outcome, line)
}

fn exchange_line(outcome: &ExchangeOutcome) -> Option<String> {
    match outcome {
        ExchangeOutcome::Exchanged {
            from,
            to,
            debited,
            credited,
        } => Some(format!(
            "【兑换】Lv.{} 货币 -{} → Lv.{} 货币 +{}",
            from.level(),
            debited,
            to.level(),
            credited
        )),
        _ => None,
    }
}

fn promotion_suffix(promotion: Option<Promotion>) -> String {
    match promotion {
        Some(p) => format!("，晋升 Lv.{} → Lv.{}", p.from.level(), p.to.level()),
        None => String::new(),
    }
}

fn log_exchange(direction: &str, amount: i64, outcome: &ExchangeOutcome) {
    if outcome.is_applied() {
        tracing::info!(direction, amount, ?outcome, "Currency exchanged");
    } else {
        tracing::debug!(direction, amount, ?outcome, "Currency exchange skipped");
    }
}

fn log_conversion(kind: &str, amount: i64, location: &str, outcome: &ConversionOutcome) {
    if outcome.is_applied() {
        tracing::info!(kind, amount, location, ?outcome, "Conversion applied");
    } else {
        tracing::debug!(kind, amount, location, ?outcome, "Conversion skipped");
    }
}
