//! Effect command extraction from free text.
//!
//! Three fail-soft passes:
//! - `[EFFECT|target=..|op=..|value=..|source=..]` inline tags
//! - `<EFFECT> ... </EFFECT>` blocks holding one JSON object or an array of them
//! - natural-language heuristics (`力量+5`, `+10转化率`, flight phrases)
//!
//! Tags and blocks are merged in document order. The heuristic pass is kept
//! separate; callers use it only when a text carries no explicit commands.

use regex_lite::{Match, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use lingshu_domain::value_objects::{EffectCommand, EffectOp, EffectValue, SixDimKey};

/// `source` attached to commands found by the heuristic pass
pub const HEURISTIC_SOURCE: &str = "heuristic";

const CONVERSION_TARGET: &str = "player.psionic.conversionrate";
const RECOVERY_TARGET: &str = "player.psionic.recoveryrate";
const FLIGHT_TARGET: &str = "player.flags.flight";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[EFFECT\|([^\]]*)\]").expect("valid regex"));
static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<EFFECT>(.*?)</EFFECT>").expect("valid regex"));

// Attribute name, then +N
static ATTR_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(力量|敏捷|体质|感知|意志|魅力|转化率|转换率|恢复率|回复率|(?i:conversion\s+rate|recovery\s+rate))\s*[+＋]\s*(\d+(?:\.\d+)?)",
    )
    .expect("valid regex")
});
// +N, then attribute name
static DIGIT_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[+＋]\s*(\d+(?:\.\d+)?)\s*%?\s*(力量|敏捷|体质|感知|意志|魅力|转化率|转换率|恢复率|回复率|(?i:conversion\s+rate|recovery\s+rate))",
    )
    .expect("valid regex")
});
static FLIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)飞行|浮空|悬浮|御空|凌空|levitat(?:e|es|ed|ing|ion)|\bflight\b|\bfly\b")
        .expect("valid regex")
});

/// Explicit commands from tags and JSON blocks, in document order.
pub fn parse_effect_commands(text: &str) -> Vec<EffectCommand> {
    let mut positioned: Vec<(usize, EffectCommand)> = Vec::new();

    for caps in TAG_RE.captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        match parse_tag(body.as_str()) {
            Some(command) => positioned.push((whole.start(), command)),
            None => tracing::debug!(tag = whole.as_str(), "Skipping EFFECT tag without usable target/op"),
        }
    }

    for caps in BLOCK_RE.captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        for command in parse_block(body.as_str()) {
            positioned.push((whole.start(), command));
        }
    }

    // Stable sort keeps array order within one block
    positioned.sort_by_key(|(position, _)| *position);
    positioned.into_iter().map(|(_, command)| command).collect()
}

/// Natural-language bonuses. Never fails; no match means no commands.
pub fn parse_heuristic_commands(text: &str) -> Vec<EffectCommand> {
    let mut positioned: Vec<(usize, EffectCommand)> = Vec::new();
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    for caps in ATTR_FIRST_RE.captures_iter(text) {
        let (Some(whole), Some(name), Some(amount)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if let Some(command) = heuristic_command(name.as_str(), amount.as_str()) {
            claimed.push((whole.start(), whole.end()));
            positioned.push((whole.start(), command));
        }
    }

    for caps in DIGIT_FIRST_RE.captures_iter(text) {
        let (Some(whole), Some(amount), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if overlaps(&claimed, &whole) {
            continue;
        }
        if let Some(command) = heuristic_command(name.as_str(), amount.as_str()) {
            positioned.push((whole.start(), command));
        }
    }

    if let Some(found) = FLIGHT_RE.find(text) {
        positioned.push((
            found.start(),
            EffectCommand::new(EffectOp::Flag, FLIGHT_TARGET, EffectValue::Bool(true))
                .with_source(HEURISTIC_SOURCE),
        ));
    }

    positioned.sort_by_key(|(position, _)| *position);
    positioned.into_iter().map(|(_, command)| command).collect()
}

/// Explicit commands when the text has any, else the heuristic ones.
pub fn commands_for_text(text: &str) -> Vec<EffectCommand> {
    let explicit = parse_effect_commands(text);
    if explicit.is_empty() {
        parse_heuristic_commands(text)
    } else {
        explicit
    }
}

fn parse_tag(body: &str) -> Option<EffectCommand> {
    let mut target = None;
    let mut op = EffectOp::Add;
    let mut value = EffectValue::default();
    let mut source = None;

    for segment in body.split('|') {
        let Some((key, raw)) = segment.split_once('=') else {
            continue;
        };
        let raw = raw.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "target" if !raw.is_empty() => target = Some(raw.to_string()),
            "op" => op = EffectOp::parse(raw)?,
            "value" => value = EffectValue::parse(raw),
            "source" if !raw.is_empty() => source = Some(raw.to_string()),
            _ => {}
        }
    }

    Some(EffectCommand {
        op,
        target: target?,
        value,
        source,
    })
}

fn parse_block(body: &str) -> Vec<EffectCommand> {
    let parsed: Value = match serde_json::from_str(body.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(block = body.trim(), error = %e, "Skipping malformed EFFECT block");
            return Vec::new();
        }
    };

    let objects = match parsed {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            tracing::warn!(kind = %json_kind(&other), "EFFECT block is not an object or array");
            return Vec::new();
        }
    };

    objects.iter().filter_map(command_from_json).collect()
}

fn command_from_json(value: &Value) -> Option<EffectCommand> {
    let Value::Object(map) = value else {
        return None;
    };

    let mut target = None;
    let mut op = EffectOp::Add;
    let mut effect_value = EffectValue::default();
    let mut source = None;

    for (key, field) in map {
        match key.to_ascii_lowercase().as_str() {
            "target" => target = field.as_str().map(str::to_string),
            "op" => op = EffectOp::parse(field.as_str()?)?,
            "value" => effect_value = json_effect_value(field)?,
            "source" => source = field.as_str().map(str::to_string),
            _ => {}
        }
    }

    let target = target.filter(|t| !t.trim().is_empty())?;
    Some(EffectCommand {
        op,
        target,
        value: effect_value,
        source,
    })
}

fn json_effect_value(field: &Value) -> Option<EffectValue> {
    match field {
        Value::Null => Some(EffectValue::default()),
        Value::Bool(b) => Some(EffectValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(EffectValue::Number),
        Value::String(s) => Some(EffectValue::parse(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn heuristic_command(name: &str, amount: &str) -> Option<EffectCommand> {
    let amount: f64 = amount.parse().ok()?;
    let target = heuristic_target(name)?;
    Some(
        EffectCommand::new(EffectOp::Add, target, EffectValue::Number(amount))
            .with_source(HEURISTIC_SOURCE),
    )
}

fn heuristic_target(name: &str) -> Option<String> {
    let folded = name.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase();
    match folded.as_str() {
        "转化率" | "转换率" | "conversion rate" => Some(CONVERSION_TARGET.to_string()),
        "恢复率" | "回复率" | "recovery rate" => Some(RECOVERY_TARGET.to_string()),
        _ => SixDimKey::from_name(name).map(|key| format!("player.sixdim.{}", key.label())),
    }
}

fn overlaps(claimed: &[(usize, usize)], candidate: &Match<'_>) -> bool {
    claimed
        .iter()
        .any(|(start, end)| candidate.start() < *end && *start < candidate.end())
}
