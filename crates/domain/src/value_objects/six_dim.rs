//! Six-dimension attribute profile
//!
//! Every attribute is clamped to `[MIN_ATTRIBUTE, cap]`. The cap starts low for
//! a new character and is raised later; it is never lowered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::RuntimeBonus;

pub const MIN_ATTRIBUTE: i32 = 1;
pub const DEFAULT_ATTRIBUTE_CAP: i32 = 99;
pub const START_ATTRIBUTE_CAP: i32 = 20;
pub const DEFAULT_ATTRIBUTE_VALUE: i32 = 10;

/// One of the six named attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SixDimKey {
    #[serde(rename = "力量")]
    Strength,
    #[serde(rename = "敏捷")]
    Agility,
    #[serde(rename = "体质")]
    Constitution,
    #[serde(rename = "感知")]
    Perception,
    #[serde(rename = "意志")]
    Will,
    #[serde(rename = "魅力")]
    Charisma,
}

impl SixDimKey {
    pub const ALL: [SixDimKey; 6] = [
        SixDimKey::Strength,
        SixDimKey::Agility,
        SixDimKey::Constitution,
        SixDimKey::Perception,
        SixDimKey::Will,
        SixDimKey::Charisma,
    ];

    /// The in-game label, also used as the serialized name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Strength => "力量",
            Self::Agility => "敏捷",
            Self::Constitution => "体质",
            Self::Perception => "感知",
            Self::Will => "意志",
            Self::Charisma => "魅力",
        }
    }

    /// Resolve a Chinese label or an English name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(key) = Self::ALL.iter().find(|k| k.label() == name) {
            return Some(*key);
        }
        match name.to_ascii_lowercase().as_str() {
            "strength" | "str" => Some(Self::Strength),
            "agility" | "agi" | "dexterity" => Some(Self::Agility),
            "constitution" | "con" => Some(Self::Constitution),
            "perception" | "per" => Some(Self::Perception),
            "will" | "willpower" => Some(Self::Will),
            "charisma" | "cha" => Some(Self::Charisma),
            _ => None,
        }
    }
}

impl fmt::Display for SixDimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six attributes plus the unallocated-points counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SixDimData")]
pub struct SixDimProfile {
    values: BTreeMap<SixDimKey, i32>,
    cap: i32,
    unallocated: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SixDimData {
    #[serde(default)]
    values: BTreeMap<SixDimKey, i32>,
    cap: i32,
    #[serde(default)]
    unallocated: i32,
}

impl From<SixDimData> for SixDimProfile {
    fn from(data: SixDimData) -> Self {
        let mut profile = Self::new(data.cap);
        for (key, value) in data.values {
            profile.set(key, value);
        }
        profile.unallocated = data.unallocated.max(0);
        profile
    }
}

impl Default for SixDimProfile {
    fn default() -> Self {
        Self::new(DEFAULT_ATTRIBUTE_CAP)
    }
}

impl SixDimProfile {
    /// Every attribute at `DEFAULT_ATTRIBUTE_VALUE` (clamped to `cap`).
    pub fn new(cap: i32) -> Self {
        let cap = cap.max(MIN_ATTRIBUTE);
        let values = SixDimKey::ALL
            .iter()
            .map(|key| (*key, DEFAULT_ATTRIBUTE_VALUE.clamp(MIN_ATTRIBUTE, cap)))
            .collect();
        Self {
            values,
            cap,
            unallocated: 0,
        }
    }

    /// Builder-style setter (clamped).
    pub fn with(mut self, key: SixDimKey, value: i32) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: SixDimKey) -> i32 {
        self.values.get(&key).copied().unwrap_or(MIN_ATTRIBUTE)
    }

    /// Set an attribute, clamped to `[MIN_ATTRIBUTE, cap]`.
    pub fn set(&mut self, key: SixDimKey, value: i32) {
        self.values.insert(key, value.clamp(MIN_ATTRIBUTE, self.cap));
    }

    pub fn cap(&self) -> i32 {
        self.cap
    }

    pub fn unallocated(&self) -> i32 {
        self.unallocated
    }

    pub fn iter(&self) -> impl Iterator<Item = (SixDimKey, i32)> + '_ {
        SixDimKey::ALL.iter().map(move |key| (*key, self.get(*key)))
    }

    /// Add points to the unallocated counter.
    pub fn grant_points(&mut self, points: i32) {
        self.unallocated = self.unallocated.saturating_add(points.max(0));
    }

    /// Move points from the counter into an attribute.
    ///
    /// Returns `false` (and changes nothing) when the counter is short or the
    /// attribute is already at the cap. Points that would overflow the cap stay
    /// in the counter.
    pub fn allocate(&mut self, key: SixDimKey, points: i32) -> bool {
        if points <= 0 || points > self.unallocated {
            return false;
        }
        let room = self.cap - self.get(key);
        let applied = points.min(room);
        if applied <= 0 {
            return false;
        }
        self.set(key, self.get(key) + applied);
        self.unallocated -= applied;
        true
    }

    /// Lift the cap. Lower values are ignored.
    pub fn raise_cap(&mut self, new_cap: i32) {
        self.cap = self.cap.max(new_cap);
    }

    /// The profile with runtime bonuses folded in, re-clamped. The base is untouched.
    pub fn with_bonus(&self, bonus: &RuntimeBonus) -> SixDimProfile {
        let mut effective = self.clone();
        for (key, delta) in &bonus.six_dim {
            effective.set(*key, self.get(*key).saturating_add(*delta));
        }
        effective
    }

    /// Integer weighted score: `floor(sum(value * percent) / 100)`.
    pub fn weighted_score(&self, weights: &[(SixDimKey, i32)]) -> i32 {
        let total: i32 = weights
            .iter()
            .map(|(key, percent)| self.get(*key) * percent)
            .sum();
        total.div_euclid(100)
    }
}
