//! Psionic profile - rank, XP, and the conversion/recovery percentages
//!
//! # Rank progression
//!
//! ```text
//! gain_xp(n):
//!   xp += n
//!   while xp >= threshold(rank) and rank < Lv.5:
//!     xp -= threshold(rank); rank = rank.next()
//!   at Lv.5: xp = min(xp, threshold(Lv.5))
//! ```
//!
//! Rank only moves up through `gain_xp`. `force_rank` is the explicit
//! downgrade tool and is never used by settlement.

use serde::{Deserialize, Serialize};

use super::{Rank, RuntimeBonus};

pub const DEFAULT_CONVERSION_RATE: f64 = 50.0;
pub const DEFAULT_RECOVERY_RATE: f64 = 10.0;

/// A rank change produced by an XP gain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub from: Rank,
    pub to: Rank,
}

impl Promotion {
    pub fn promoted(&self) -> bool {
        self.to > self.from
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsionicProfile {
    rank: Rank,
    xp: i64,
    conversion_rate: f64,
    recovery_rate: f64,
}

impl Default for PsionicProfile {
    fn default() -> Self {
        Self {
            rank: Rank::Lv1,
            xp: 0,
            conversion_rate: DEFAULT_CONVERSION_RATE,
            recovery_rate: DEFAULT_RECOVERY_RATE,
        }
    }
}

impl PsionicProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn xp(&self) -> i64 {
        self.xp
    }

    /// XP threshold of the current rank.
    pub fn max_xp(&self) -> i64 {
        self.rank.xp_threshold()
    }

    pub fn conversion_rate(&self) -> f64 {
        self.conversion_rate
    }

    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    pub fn set_conversion_rate(&mut self, rate: f64) {
        self.conversion_rate = rate.max(0.0);
    }

    pub fn set_recovery_rate(&mut self, rate: f64) {
        self.recovery_rate = rate.max(0.0);
    }

    /// Base rate plus equipment bonus, floored at 0, as a percentage.
    pub fn effective_conversion_rate(&self, bonus: &RuntimeBonus) -> f64 {
        (self.conversion_rate + bonus.conversion).max(0.0)
    }

    pub fn effective_recovery_rate(&self, bonus: &RuntimeBonus) -> f64 {
        (self.recovery_rate + bonus.recovery).max(0.0)
    }

    /// Add XP and run the promotion loop.
    pub fn gain_xp(&mut self, amount: i64) -> Promotion {
        let from = self.rank;
        self.xp = self.xp.saturating_add(amount.max(0));

        while self.xp >= self.rank.xp_threshold() {
            match self.rank.next() {
                Some(next) => {
                    self.xp -= self.rank.xp_threshold();
                    self.rank = next;
                }
                None => break,
            }
        }
        if self.rank.is_terminal() {
            self.xp = self.xp.min(self.rank.xp_threshold());
        }

        Promotion {
            from,
            to: self.rank,
        }
    }

    /// Explicit rank override (admin/downgrade tooling). XP is clamped to the
    /// new rank's threshold.
    pub fn force_rank(&mut self, rank: Rank) {
        self.rank = rank;
        self.xp = self.xp.min(rank.xp_threshold());
    }
}
