//! Runtime bonus aggregate and the effect commands that build it
//!
//! A `RuntimeBonus` is never persisted. It is recomputed by folding the effect
//! commands extracted from every equipped skill/item description over
//! `RuntimeBonus::default()`.
//!
//! Unknown targets and ill-typed values are skipped silently: the command source
//! is free narrative text, and a bad fragment must not poison the rest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::SixDimKey;

/// Passive numeric effects of the current equipment set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeBonus {
    /// Added to the conversion rate percentage
    pub conversion: f64,
    /// Added to the recovery rate percentage
    pub recovery: f64,
    /// Added to 魅力 when the social bonus tier is looked up
    pub charisma: i32,
    /// Per-attribute deltas; absent keys mean 0
    pub six_dim: BTreeMap<SixDimKey, i32>,
    pub can_fly: bool,
}

impl RuntimeBonus {
    pub fn six_dim_delta(&self, key: SixDimKey) -> i32 {
        self.six_dim.get(&key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectOp {
    #[default]
    Add,
    Set,
    Flag,
}

impl EffectOp {
    /// Case-insensitive; `None` for anything but add/set/flag.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "set" => Some(Self::Set),
            "flag" => Some(Self::Flag),
            _ => None,
        }
    }
}

/// A command payload: number, free text, or boolean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Default for EffectValue {
    fn default() -> Self {
        Self::Bool(true)
    }
}

impl EffectValue {
    /// `true`/`false` (any case) become booleans, numeric text (`+5`, `-2`,
    /// `1.5`) becomes a number, everything else stays text.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Some(number) = parse_number(trimmed) {
            return Self::Number(number);
        }
        Self::Text(trimmed.to_string())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => {
                let s = s.trim();
                !(s.is_empty()
                    || s == "0"
                    || s.eq_ignore_ascii_case("no")
                    || s.eq_ignore_ascii_case("off"))
            }
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('+').unwrap_or(text);
    let digits = unsigned.strip_prefix('-').unwrap_or(unsigned);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    unsigned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// One extracted `{op, target, value, source}` instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectCommand {
    pub op: EffectOp,
    pub target: String,
    pub value: EffectValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl EffectCommand {
    pub fn new(op: EffectOp, target: impl Into<String>, value: EffectValue) -> Self {
        Self {
            op,
            target: target.into(),
            value,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A bonus field a target path resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    SixDim(SixDimKey),
    Conversion,
    Recovery,
    Charisma,
    Flight,
}

impl EffectTarget {
    /// Resolve a dotted path. ASCII segments are compared case-insensitively
    /// with `_` and `-` ignored.
    pub fn resolve(path: &str) -> Option<Self> {
        let segments: Vec<String> = path
            .trim()
            .split('.')
            .map(|segment| {
                segment
                    .trim()
                    .chars()
                    .filter(|c| *c != '_' && *c != '-')
                    .collect::<String>()
                    .to_ascii_lowercase()
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            ["player", "sixdim", attr] => SixDimKey::from_name(attr).map(Self::SixDim),
            ["player", "psionic", "conversionrate"] | ["player", "conversion"] => {
                Some(Self::Conversion)
            }
            ["player", "psionic", "recoveryrate"] | ["player", "recovery"] => Some(Self::Recovery),
            ["player", "charisma"] | ["player", "social", "charisma"] => Some(Self::Charisma),
            ["player", "flags", "flight"] | ["player", "flags", "canfly"] | ["player", "canfly"] => {
                Some(Self::Flight)
            }
            _ => None,
        }
    }
}

impl fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SixDim(key) => write!(f, "player.sixdim.{}", key),
            Self::Conversion => f.write_str("player.psionic.conversionrate"),
            Self::Recovery => f.write_str("player.psionic.recoveryrate"),
            Self::Charisma => f.write_str("player.charisma"),
            Self::Flight => f.write_str("player.flags.flight"),
        }
    }
}

/// Fold `commands` over `base` in order.
pub fn apply_commands(base: RuntimeBonus, commands: &[EffectCommand]) -> RuntimeBonus {
    commands.iter().fold(base, |mut bonus, command| {
        apply_command(&mut bonus, command);
        bonus
    })
}

/// Apply one command; returns whether it changed a known field.
pub fn apply_command(bonus: &mut RuntimeBonus, command: &EffectCommand) -> bool {
    let Some(target) = EffectTarget::resolve(&command.target) else {
        return false;
    };

    if target == EffectTarget::Flight {
        bonus.can_fly = command.value.is_truthy();
        return true;
    }
    let Some((amount, replace)) = numeric_update(command) else {
        return false;
    };

    match target {
        EffectTarget::Conversion => {
            bonus.conversion = if replace { amount } else { bonus.conversion + amount };
        }
        EffectTarget::Recovery => {
            bonus.recovery = if replace { amount } else { bonus.recovery + amount };
        }
        EffectTarget::Charisma => {
            let delta = truncate(amount);
            bonus.charisma = if replace {
                delta
            } else {
                bonus.charisma.saturating_add(delta)
            };
        }
        EffectTarget::SixDim(key) => {
            let delta = truncate(amount);
            let entry = bonus.six_dim.entry(key).or_insert(0);
            *entry = if replace {
                delta
            } else {
                entry.saturating_add(delta)
            };
        }
        EffectTarget::Flight => return false,
    }
    true
}

/// `(amount, replace)` for add/set with a numeric value.
fn numeric_update(command: &EffectCommand) -> Option<(f64, bool)> {
    let amount = command.value.as_number()?;
    match command.op {
        EffectOp::Add => Some((amount, false)),
        EffectOp::Set => Some((amount, true)),
        EffectOp::Flag => None,
    }
}

fn truncate(amount: f64) -> i32 {
    // `as` saturates at the i32 bounds
    amount.trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(op: EffectOp, target: &str, value: EffectValue) -> EffectCommand {
        EffectCommand::new(op, target, value)
    }

    #[test]
    fn test_value_parse() {
        assert_eq!(EffectValue::parse("+5"), EffectValue::Number(5.0));
        assert_eq!(EffectValue::parse("-2"), EffectValue::Number(-2.0));
        assert_eq!(EffectValue::parse("1.5"), EffectValue::Number(1.5));
        assert_eq!(EffectValue::parse("TRUE"), EffectValue::Bool(true));
        assert_eq!(EffectValue::parse("false"), EffectValue::Bool(false));
        assert_eq!(EffectValue::parse("inf"), EffectValue::Text("inf".into()));
        assert_eq!(EffectValue::parse("wings"), EffectValue::Text("wings".into()));
    }

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(
            EffectTarget::resolve("player.sixdim.力量"),
            Some(EffectTarget::SixDim(SixDimKey::Strength))
        );
        assert_eq!(
            EffectTarget::resolve("Player.SixDim.agility"),
            Some(EffectTarget::SixDim(SixDimKey::Agility))
        );
        assert_eq!(
            EffectTarget::resolve("player.psionic.conversion_rate"),
            Some(EffectTarget::Conversion)
        );
        assert_eq!(EffectTarget::resolve("player.recovery"), Some(EffectTarget::Recovery));
        assert_eq!(
            EffectTarget::resolve("player.social.charisma"),
            Some(EffectTarget::Charisma)
        );
        assert_eq!(EffectTarget::resolve("player.can-fly"), Some(EffectTarget::Flight));
        assert_eq!(EffectTarget::resolve("player.sixdim.luck"), None);
        assert_eq!(EffectTarget::resolve("world.weather"), None);
    }

    #[test]
    fn test_add_strength_changes_nothing_else() {
        let bonus = apply_commands(
            RuntimeBonus::default(),
            &[cmd(EffectOp::Add, "player.sixdim.力量", EffectValue::Number(5.0))],
        );
        let mut expected = RuntimeBonus::default();
        expected.six_dim.insert(SixDimKey::Strength, 5);
        assert_eq!(bonus, expected);
    }

    #[test]
    fn test_set_replaces_running_value() {
        let bonus = apply_commands(
            RuntimeBonus::default(),
            &[
                cmd(EffectOp::Add, "player.conversion", EffectValue::Number(10.0)),
                cmd(EffectOp::Add, "player.conversion", EffectValue::Number(5.0)),
                cmd(EffectOp::Set, "player.conversion", EffectValue::Number(3.0)),
                cmd(EffectOp::Add, "player.conversion", EffectValue::Number(1.0)),
            ],
        );
        assert_eq!(bonus.conversion, 4.0);
    }

    #[test]
    fn test_flag_on_bool_field_uses_truthiness() {
        let flying = apply_commands(
            RuntimeBonus::default(),
            &[cmd(EffectOp::Flag, "player.flags.flight", EffectValue::Bool(true))],
        );
        assert!(flying.can_fly);

        let grounded = apply_commands(
            flying,
            &[cmd(EffectOp::Set, "player.canfly", EffectValue::Number(0.0))],
        );
        assert!(!grounded.can_fly);
    }

    #[test]
    fn test_unknown_and_ill_typed_commands_are_ignored() {
        let bonus = apply_commands(
            RuntimeBonus::default(),
            &[
                cmd(EffectOp::Add, "player.luck", EffectValue::Number(7.0)),
                cmd(EffectOp::Add, "player.recovery", EffectValue::Text("lots".into())),
                cmd(EffectOp::Flag, "player.charisma", EffectValue::Bool(true)),
            ],
        );
        assert!(bonus.is_empty());
    }

    #[test]
    fn test_six_dim_truncates_toward_zero() {
        let bonus = apply_commands(
            RuntimeBonus::default(),
            &[
                cmd(EffectOp::Add, "player.sixdim.意志", EffectValue::Number(2.9)),
                cmd(EffectOp::Add, "player.sixdim.感知", EffectValue::Number(-1.7)),
            ],
        );
        assert_eq!(bonus.six_dim_delta(SixDimKey::Will), 2);
        assert_eq!(bonus.six_dim_delta(SixDimKey::Perception), -1);
    }
}
