//! Currency ledger and the cross-rank exchange
//!
//! `credits` is denominated in the holder's current rank. `coin_vault` keeps
//! balances of other ranks' currencies. Exchanges move value one rank at a time
//! at a fixed 20% yield; any exchange that cannot complete is a no-op outcome,
//! never an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Promotion, Rank};

/// Percentage of the source amount received by a cross-rank exchange.
pub const EXCHANGE_YIELD_PERCENT: i64 = 20;

/// `floor(amount * 0.2)` for non-negative amounts. Whole hundreds and the
/// remainder are scaled separately so no intermediate exceeds `amount`.
pub fn exchange_yield(amount: i64) -> i64 {
    let amount = amount.max(0);
    (amount / 100) * EXCHANGE_YIELD_PERCENT + (amount % 100) * EXCHANGE_YIELD_PERCENT / 100
}

/// Result of a cross-rank exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExchangeOutcome {
    Exchanged {
        from: Rank,
        to: Rank,
        debited: i64,
        credited: i64,
    },
    InsufficientBalance {
        balance: i64,
        requested: i64,
    },
    ZeroYield,
    TerminalRank,
}

impl ExchangeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Exchanged { .. })
    }
}

/// Result of an in-rank MP/XP/currency conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConversionOutcome {
    Converted {
        spent: i64,
        gained: i64,
        promotion: Option<Promotion>,
    },
    InsufficientBalance {
        balance: i64,
        requested: i64,
    },
    ZeroYield,
    RegionBlocked,
    PoolFull,
}

impl ConversionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyLedger {
    credits: i64,
    #[serde(default)]
    coin_vault: BTreeMap<Rank, i64>,
    /// Male targets slain by a female player, per target rank
    #[serde(default)]
    soul_ledger: BTreeMap<Rank, i64>,
}

impl CurrencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credits(mut self, credits: i64) -> Self {
        self.credits = credits.max(0);
        self
    }

    pub fn credits(&self) -> i64 {
        self.credits
    }

    pub fn deposit(&mut self, amount: i64) {
        self.credits = self.credits.saturating_add(amount.max(0));
    }

    /// Debit `amount` if the balance covers it.
    pub fn withdraw(&mut self, amount: i64) -> bool {
        if amount < 0 || amount > self.credits {
            return false;
        }
        self.credits -= amount;
        true
    }

    pub fn vault_balance(&self, rank: Rank) -> i64 {
        self.coin_vault.get(&rank).copied().unwrap_or(0)
    }

    pub fn deposit_vault(&mut self, rank: Rank, amount: i64) {
        let balance = self.coin_vault.entry(rank).or_insert(0);
        *balance = balance.saturating_add(amount.max(0));
    }

    pub fn coin_vault(&self) -> &BTreeMap<Rank, i64> {
        &self.coin_vault
    }

    /// Convert `amount` of the current rank's credits into the next rank's coin.
    pub fn exchange_up(&mut self, current: Rank, amount: i64) -> ExchangeOutcome {
        let Some(target) = current.next() else {
            return ExchangeOutcome::TerminalRank;
        };
        if amount <= 0 || amount > self.credits {
            return ExchangeOutcome::InsufficientBalance {
                balance: self.credits,
                requested: amount,
            };
        }
        let credited = exchange_yield(amount);
        if credited == 0 {
            return ExchangeOutcome::ZeroYield;
        }

        self.credits -= amount;
        self.deposit_vault(target, credited);
        ExchangeOutcome::Exchanged {
            from: current,
            to: target,
            debited: amount,
            credited,
        }
    }

    /// Convert `amount` of the next rank's vaulted coin back into current credits.
    pub fn exchange_down(&mut self, current: Rank, amount: i64) -> ExchangeOutcome {
        let Some(source) = current.next() else {
            return ExchangeOutcome::TerminalRank;
        };
        let balance = self.vault_balance(source);
        if amount <= 0 || amount > balance {
            return ExchangeOutcome::InsufficientBalance {
                balance,
                requested: amount,
            };
        }
        let credited = exchange_yield(amount);
        if credited == 0 {
            return ExchangeOutcome::ZeroYield;
        }

        self.coin_vault.insert(source, balance - amount);
        self.credits = self.credits.saturating_add(credited);
        ExchangeOutcome::Exchanged {
            from: source,
            to: current,
            debited: amount,
            credited,
        }
    }

    pub fn souls(&self, rank: Rank) -> i64 {
        self.soul_ledger.get(&rank).copied().unwrap_or(0)
    }

    /// Increment the soul ledger for `rank`; returns the new total.
    pub fn record_souls(&mut self, rank: Rank, count: i64) -> i64 {
        let total = self.soul_ledger.entry(rank).or_insert(0);
        *total = total.saturating_add(count.max(0));
        *total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_yield_floors_without_overflow() {
        assert_eq!(exchange_yield(4), 0);
        assert_eq!(exchange_yield(5), 1);
        assert_eq!(exchange_yield(101), 20);
        assert_eq!(exchange_yield(-50), 0);
        assert_eq!(exchange_yield(i64::MAX), i64::MAX / 5);
    }

    #[test]
    fn test_exchange_up_exact_balance() {
        let mut ledger = CurrencyLedger::new().with_credits(100);
        let outcome = ledger.exchange_up(Rank::Lv1, 100);
        assert_eq!(
            outcome,
            ExchangeOutcome::Exchanged {
                from: Rank::Lv1,
                to: Rank::Lv2,
                debited: 100,
                credited: 20,
            }
        );
        assert_eq!(ledger.credits(), 0);
        assert_eq!(ledger.vault_balance(Rank::Lv2), 20);
    }

    #[test]
    fn test_exchange_up_insufficient_is_noop() {
        let mut ledger = CurrencyLedger::new().with_credits(100);
        let before = ledger.clone();
        let outcome = ledger.exchange_up(Rank::Lv1, 101);
        assert!(matches!(outcome, ExchangeOutcome::InsufficientBalance { .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_exchange_up_zero_yield_is_noop() {
        let mut ledger = CurrencyLedger::new().with_credits(100);
        assert_eq!(ledger.exchange_up(Rank::Lv1, 4), ExchangeOutcome::ZeroYield);
        assert_eq!(ledger.credits(), 100);
        assert!(ledger.coin_vault().is_empty());
    }

    #[test]
    fn test_exchange_up_from_terminal_rank() {
        let mut ledger = CurrencyLedger::new().with_credits(1000);
        assert_eq!(
            ledger.exchange_up(Rank::Lv5, 100),
            ExchangeOutcome::TerminalRank
        );
        assert_eq!(ledger.credits(), 1000);
    }

    #[test]
    fn test_exchange_down_debits_higher_vault() {
        let mut ledger = CurrencyLedger::new().with_credits(7);
        ledger.deposit_vault(Rank::Lv3, 50);
        let outcome = ledger.exchange_down(Rank::Lv2, 50);
        assert_eq!(
            outcome,
            ExchangeOutcome::Exchanged {
                from: Rank::Lv3,
                to: Rank::Lv2,
                debited: 50,
                credited: 10,
            }
        );
        assert_eq!(ledger.vault_balance(Rank::Lv3), 0);
        assert_eq!(ledger.credits(), 17);
    }

    #[test]
    fn test_exchange_down_insufficient_vault() {
        let mut ledger = CurrencyLedger::new();
        ledger.deposit_vault(Rank::Lv2, 10);
        let before = ledger.clone();
        assert!(!ledger.exchange_down(Rank::Lv1, 11).is_applied());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_withdraw_never_goes_negative() {
        let mut ledger = CurrencyLedger::new().with_credits(5);
        assert!(!ledger.withdraw(6));
        assert!(ledger.withdraw(5));
        assert_eq!(ledger.credits(), 0);
    }

    #[test]
    fn test_record_souls_accumulates() {
        let mut ledger = CurrencyLedger::new();
        assert_eq!(ledger.record_souls(Rank::Lv2, 1), 1);
        assert_eq!(ledger.record_souls(Rank::Lv2, 2), 3);
        assert_eq!(ledger.souls(Rank::Lv3), 0);
    }

    #[test]
    fn test_vault_round_trips_through_json() {
        let mut ledger = CurrencyLedger::new().with_credits(30);
        ledger.deposit_vault(Rank::Lv4, 12);
        ledger.record_souls(Rank::Lv1, 2);
        let json = serde_json::to_string(&ledger).expect("serialize");
        let back: CurrencyLedger = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ledger);
    }
}
