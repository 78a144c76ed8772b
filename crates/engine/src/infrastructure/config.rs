//! Engine configuration from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `LINGSHU_NARRATIVE_TIMEOUT_MS` | `60000` |
//! | `LINGSHU_START_ATTRIBUTE_CAP` | `20` |
//! | `LINGSHU_DEFAULT_SKILL_SLOTS` | `3` |
//! | `LINGSHU_DEFAULT_EQUIP_SLOTS` | `2` |
//!
//! Missing variables fall back to the defaults; present but unparseable ones
//! are an error.

use std::str::FromStr;
use std::time::Duration;

use lingshu_domain::entities::{DEFAULT_EQUIP_SLOTS, DEFAULT_SKILL_SLOTS};
use lingshu_domain::value_objects::START_ATTRIBUTE_CAP;

pub const NARRATIVE_TIMEOUT_ENV: &str = "LINGSHU_NARRATIVE_TIMEOUT_MS";
pub const START_ATTRIBUTE_CAP_ENV: &str = "LINGSHU_START_ATTRIBUTE_CAP";
pub const SKILL_SLOTS_ENV: &str = "LINGSHU_DEFAULT_SKILL_SLOTS";
pub const EQUIP_SLOTS_ENV: &str = "LINGSHU_DEFAULT_EQUIP_SLOTS";

const DEFAULT_NARRATIVE_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub narrative_timeout: Duration,
    pub start_attribute_cap: i32,
    pub default_skill_slots: u32,
    pub default_equip_slots: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            narrative_timeout: Duration::from_millis(DEFAULT_NARRATIVE_TIMEOUT_MS),
            start_attribute_cap: START_ATTRIBUTE_CAP,
            default_skill_slots: DEFAULT_SKILL_SLOTS,
            default_equip_slots: DEFAULT_EQUIP_SLOTS,
        }
    }
}

impl EngineConfig {
    /// Read the process environment. Call after `.env` files are loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_ms = parse_or(
            &lookup,
            NARRATIVE_TIMEOUT_ENV,
            DEFAULT_NARRATIVE_TIMEOUT_MS,
        )?;
        Ok(Self {
            narrative_timeout: Duration::from_millis(timeout_ms),
            start_attribute_cap: parse_or(
                &lookup,
                START_ATTRIBUTE_CAP_ENV,
                defaults.start_attribute_cap,
            )?,
            default_skill_slots: parse_or(&lookup, SKILL_SLOTS_ENV, defaults.default_skill_slots)?,
            default_equip_slots: parse_or(&lookup, EQUIP_SLOTS_ENV, defaults.default_equip_slots)?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
