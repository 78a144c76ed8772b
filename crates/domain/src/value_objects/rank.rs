//! Rank ladder, gender, and the fixed lookup tables keyed by rank
//!
//! Ranks run Lv.1 through Lv.5. Lv.5 is terminal: `Rank::Lv5.next()` is `None`,
//! so neither promotion nor an "up" currency exchange can move past it.
//!
//! # Tables
//!
//! | Rank | XP threshold | MP cap (male/other) | MP cap (female) |
//! |------|--------------|---------------------|-----------------|
//! | Lv.1 | 100          | 100                 | 300             |
//! | Lv.2 | 300          | 200                 | 600             |
//! | Lv.3 | 800          | 400                 | 1200            |
//! | Lv.4 | 2000         | 800                 | 2400            |
//! | Lv.5 | 5000         | 1600                | 4800            |
//!
//! ```
//! use lingshu_domain::value_objects::{Gender, Rank, FEMALE_MP_MULTIPLIER};
//!
//! assert_eq!(Rank::Lv3.xp_threshold(), 800);
//! assert_eq!(Rank::Lv3.mp_cap(Gender::Male), 400);
//! assert_eq!(Rank::Lv3.mp_cap(Gender::Female), 400 * FEMALE_MP_MULTIPLIER);
//! assert_eq!(Rank::Lv5.next(), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Female characters get this multiple of the base MP cap at every rank.
pub const FEMALE_MP_MULTIPLIER: i64 = 3;

const XP_THRESHOLDS: [i64; 5] = [100, 300, 800, 2000, 5000];
const BASE_MP_CAPS: [i64; 5] = [100, 200, 400, 800, 1600];

/// Character gender as far as settlement cares about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub fn is_female(self) -> bool {
        matches!(self, Self::Female)
    }
}

/// One of the five ordered power tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rank {
    #[default]
    Lv1 = 1,
    Lv2 = 2,
    Lv3 = 3,
    Lv4 = 4,
    Lv5 = 5,
}

impl Rank {
    /// Every rank in ladder order.
    pub const ALL: [Rank; 5] = [Rank::Lv1, Rank::Lv2, Rank::Lv3, Rank::Lv4, Rank::Lv5];

    /// Numeric level, 1 through 5.
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Lv1),
            2 => Some(Self::Lv2),
            3 => Some(Self::Lv3),
            4 => Some(Self::Lv4),
            5 => Some(Self::Lv5),
            _ => None,
        }
    }

    /// The next rank up, or `None` at the terminal rank.
    pub fn next(self) -> Option<Self> {
        Self::from_level(self.level() + 1)
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// XP needed to leave this rank (or the XP ceiling at Lv.5).
    pub fn xp_threshold(self) -> i64 {
        XP_THRESHOLDS[self.index()]
    }

    /// MP pool maximum for a character of this rank and gender.
    pub fn mp_cap(self, gender: Gender) -> i64 {
        let base = BASE_MP_CAPS[self.index()];
        if gender.is_female() {
            base * FEMALE_MP_MULTIPLIER
        } else {
            base
        }
    }

    fn index(self) -> usize {
        usize::from(self.level() - 1)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lv.{}", self.level())
    }
}

impl TryFrom<u8> for Rank {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_level(value)
            .ok_or_else(|| DomainError::parse(format!("Unknown rank level: {}", value)))
    }
}

impl From<Rank> for u8 {
    fn from(value: Rank) -> Self {
        value.level()
    }
}
