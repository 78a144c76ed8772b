//! Status affixes attached to the player core or to a body part

use serde::{Deserialize, Serialize};
use std::fmt;

const DEBUFF_SYNONYMS: [&str; 6] = ["减益", "负面", "有害", "诅咒", "debuff", "negative"];
const BUFF_SYNONYMS: [&str; 6] = ["增益", "正面", "有益", "祝福", "buff", "positive"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffixType {
    Buff,
    Debuff,
    #[default]
    Neutral,
}

impl AffixType {
    /// Map free text by synonym containment. Debuff is checked first because
    /// "debuff" contains "buff".
    pub fn from_text(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if DEBUFF_SYNONYMS.iter().any(|s| lowered.contains(s)) {
            Self::Debuff
        } else if BUFF_SYNONYMS.iter().any(|s| lowered.contains(s)) {
            Self::Buff
        } else {
            Self::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Buff => "增益",
            Self::Debuff => "减益",
            Self::Neutral => "中性",
        }
    }
}

impl fmt::Display for AffixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeAffix {
    /// `{scope}-{seq}`, allocated by the owning player
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub affix_type: AffixType,
    pub source: String,
    pub stacks: u32,
}

impl RuntimeAffix {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        affix_type: AffixType,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            affix_type,
            source: source.into(),
            stacks: 1,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debuff_checked_before_buff() {
        assert_eq!(AffixType::from_text("DeBuff"), AffixType::Debuff);
        assert_eq!(AffixType::from_text("buff"), AffixType::Buff);
        assert_eq!(AffixType::from_text("强力诅咒"), AffixType::Debuff);
        assert_eq!(AffixType::from_text("神圣祝福"), AffixType::Buff);
        assert_eq!(AffixType::from_text("奇怪"), AffixType::Neutral);
        assert_eq!(AffixType::from_text(""), AffixType::Neutral);
    }

    #[test]
    fn test_affix_type_serializes_lowercase() {
        let affix = RuntimeAffix::new("core-1", "灼烧", AffixType::Debuff, "narrative");
        let json = serde_json::to_value(&affix).expect("serialize");
        assert_eq!(json["type"], "debuff");
        assert_eq!(json["stacks"], 1);
    }

    #[test]
    fn test_with_stacks_floors_at_one() {
        let affix = RuntimeAffix::new("a-1", "x", AffixType::Neutral, "narrative").with_stacks(0);
        assert_eq!(affix.stacks, 1);
    }
}
