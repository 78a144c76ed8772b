//! Pseudo-layer codec
//!
//! One narrative blob carries three machine-readable sections:
//!
//! ```text
//! ⟦LS:BODY⟧
//! <normalized body>
//! ⟦/LS:BODY⟧
//! ⟦LS:CHOICES⟧
//! <choice 1>|<choice 2>|...
//! ⟦/LS:CHOICES⟧
//! ⟦LS:SUMMARY⟧
//! <key>:<value>;<key>:<value>
//! ⟦/LS:SUMMARY⟧
//! ```
//!
//! The markers use U+27E6/U+27E7, which ordinary prose never contains.
//! Decoding is total: a missing section decodes as empty.
//!
//! ```
//! use lingshu_shared::layer::{decode, encode, has_layer, replace_body, LayerFields};
//!
//! let fields = LayerFields {
//!     body: "雨夜。\n\n\n\n你推开门。".into(),
//!     choices: vec!["追上去".into(), "留在原地".into()],
//!     summary: vec![("地点".into(), "旧港".into())],
//! };
//! let text = encode(&fields);
//! assert!(has_layer(&text));
//!
//! let decoded = decode(&text);
//! assert_eq!(decoded.body, "雨夜。\n\n你推开门。");
//! assert_eq!(decoded.choices, vec!["追上去", "留在原地"]);
//!
//! let replaced = replace_body(&text, "门后空无一人。");
//! assert_eq!(decode(&replaced).body, "门后空无一人。");
//! assert_eq!(decode(&replaced).choices, decoded.choices);
//! ```

use serde::{Deserialize, Serialize};

pub const BODY_OPEN: &str = "⟦LS:BODY⟧";
pub const BODY_CLOSE: &str = "⟦/LS:BODY⟧";
pub const CHOICES_OPEN: &str = "⟦LS:CHOICES⟧";
pub const CHOICES_CLOSE: &str = "⟦/LS:CHOICES⟧";
pub const SUMMARY_OPEN: &str = "⟦LS:SUMMARY⟧";
pub const SUMMARY_CLOSE: &str = "⟦/LS:SUMMARY⟧";

/// Upper bound on choices carried by a layer
pub const MAX_CHOICES: usize = 4;

const MARKERS: [&str; 6] = [
    BODY_OPEN,
    BODY_CLOSE,
    CHOICES_OPEN,
    CHOICES_CLOSE,
    SUMMARY_OPEN,
    SUMMARY_CLOSE,
];

/// The three sections of a layered narrative
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFields {
    pub body: String,
    #[serde(default)]
    pub choices: Vec<String>,
    /// Ordered `(key, value)` pairs
    #[serde(default)]
    pub summary: Vec<(String, String)>,
}

impl LayerFields {
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn summary_value(&self, key: &str) -> Option<&str> {
        self.summary
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// `\r\n` becomes `\n` and trailing spaces/tabs are dropped from every line.
/// Runs of blank lines then collapse to one, and the result is trimmed.
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;
    for line in unified.split('\n') {
        let line = line.trim_end_matches([' ', '\t']);
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

pub fn encode(fields: &LayerFields) -> String {
    let body = normalize(&strip_markers(&fields.body));
    let choices = encode_choices(&fields.choices);
    let summary = encode_summary(&fields.summary);
    format!(
        "{BODY_OPEN}\n{body}\n{BODY_CLOSE}\n\
         {CHOICES_OPEN}\n{choices}\n{CHOICES_CLOSE}\n\
         {SUMMARY_OPEN}\n{summary}\n{SUMMARY_CLOSE}"
    )
}

/// Never fails. Missing sections yield empty values.
pub fn decode(text: &str) -> LayerFields {
    let body = section(text, BODY_OPEN, BODY_CLOSE)
        .map(|(start, end)| normalize(&text[start..end]))
        .unwrap_or_default();
    let choices = section(text, CHOICES_OPEN, CHOICES_CLOSE)
        .map(|(start, end)| decode_choices(&text[start..end]))
        .unwrap_or_default();
    let summary = section(text, SUMMARY_OPEN, SUMMARY_CLOSE)
        .map(|(start, end)| decode_summary(&text[start..end]))
        .unwrap_or_default();

    LayerFields {
        body,
        choices,
        summary,
    }
}

/// True when both body markers are present, open before close.
pub fn has_layer(text: &str) -> bool {
    section(text, BODY_OPEN, BODY_CLOSE).is_some()
}

/// Rewrite only the body section. Unlayered text is returned unchanged.
pub fn replace_body(text: &str, new_body: &str) -> String {
    let Some((start, end)) = section(text, BODY_OPEN, BODY_CLOSE) else {
        tracing::debug!("No layer present; body left unchanged");
        return text.to_string();
    };
    let body = normalize(&strip_markers(new_body));
    format!("{}\n{}\n{}", &text[..start], body, &text[end..])
}

/// The body of a layered text, or the trimmed input when unlayered.
pub fn strip_layer(text: &str) -> String {
    match section(text, BODY_OPEN, BODY_CLOSE) {
        Some((start, end)) => normalize(&text[start..end]),
        None => text.trim().to_string(),
    }
}

/// Byte range strictly between the first `open` and the next `close`.
fn section(text: &str, open: &str, close: &str) -> Option<(usize, usize)> {
    let start = text.find(open)? + open.len();
    let end = start + text[start..].find(close)?;
    Some((start, end))
}

fn strip_markers(text: &str) -> String {
    MARKERS
        .iter()
        .fold(text.to_string(), |acc, marker| acc.replace(marker, ""))
}

fn encode_choices(choices: &[String]) -> String {
    choices
        .iter()
        .map(|c| {
            c.chars()
                .filter(|ch| !matches!(ch, '|' | '\n' | '\r'))
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|c| !c.is_empty())
        .take(MAX_CHOICES)
        .collect::<Vec<_>>()
        .join("|")
}

fn decode_choices(raw: &str) -> Vec<String> {
    raw.split(['|', '\n'])
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .take(MAX_CHOICES)
        .map(str::to_string)
        .collect()
}

fn encode_summary(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .filter_map(|(key, value)| {
            let key: String = key
                .chars()
                .filter(|c| !matches!(c, ':' | ';' | '\n' | '\r'))
                .collect();
            let value: String = value
                .chars()
                .filter(|c| !matches!(c, ';' | '\n' | '\r'))
                .collect();
            let key = key.trim();
            (!key.is_empty()).then(|| format!("{}:{}", key, value.trim()))
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn decode_summary(raw: &str) -> Vec<(String, String)> {
    raw.split([';', '\n'])
        .filter_map(|fragment| {
            let (key, value) = fragment.split_once(':')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}
