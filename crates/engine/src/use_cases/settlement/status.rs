//! Status-affix settlement from `[状态|..]` and `[核心状态|..]` tags.

use std::sync::LazyLock;

use regex_lite::Regex;

use lingshu_domain::{AffixType, GameState, RuntimeAffix};

use super::SettlementLog;

pub const NARRATIVE_SOURCE: &str = "narrative";
const CORE_SCOPE: &str = "core";

static STATUS_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(核心状态|状态)\|([^\]]*)\]").expect("valid regex"));

/// One status tag, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTag {
    /// `None` for a core tag
    pub part: Option<String>,
    pub name: String,
    pub description: String,
    pub affix_type: AffixType,
    pub stacks: u32,
}

/// Extract every well-formed status tag. Part tags without `part` and any tag
/// without `name` are dropped.
pub fn parse_status_tags(text: &str) -> Vec<StatusTag> {
    STATUS_TAG_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let is_core = &caps[1] == "核心状态";
            let mut tag = StatusTag {
                stacks: 1,
                ..StatusTag::default()
            };
            for segment in caps[2].split('|') {
                let Some((key, value)) = segment.split_once('=') else {
                    continue;
                };
                let value = value.trim();
                match key.trim().to_lowercase().as_str() {
                    "part" => tag.part = Some(value.to_string()),
                    "name" => tag.name = value.to_string(),
                    "desc" => tag.description = value.to_string(),
                    "type" => tag.affix_type = AffixType::from_text(value),
                    "stacks" => {
                        if let Ok(stacks) = value.parse::<u32>() {
                            tag.stacks = stacks.max(1);
                        }
                    }
                    _ => {}
                }
            }
            if is_core {
                tag.part = None;
            } else if tag.part.as_deref().unwrap_or_default().is_empty() {
                return None;
            }
            (!tag.name.is_empty()).then_some(tag)
        })
        .collect()
}

pub fn settle_status(state: &mut GameState, text: &str) -> SettlementLog {
    let mut log = SettlementLog::new();
    let player = &mut state.player;

    for tag in parse_status_tags(text) {
        let label = tag.affix_type.label();
        match tag.part.as_deref() {
            None => {
                let id = player.next_affix_id(CORE_SCOPE);
                player.core_affixes.push(build_affix(id, &tag));
                log.push(format!("【核心状态】获得{}「{}」", label, tag.name));
            }
            Some(needle) => {
                let Some(key) = player.find_part_mut(needle).map(|p| p.key.clone()) else {
                    tracing::debug!(part = needle, affix = %tag.name, "No part matches status tag");
                    continue;
                };
                let id = player.next_affix_id(&key);
                if let Some(part) = player.find_part_mut(needle) {
                    part.status_affixes.push(build_affix(id, &tag));
                    log.push(format!("【状态】{} 获得{}「{}」", part.name, label, tag.name));
                }
            }
        }
    }

    if !log.is_empty() {
        tracing::info!(affixes = log.len(), "Status affixes attached");
    }
    log
}

fn build_affix(id: String, tag: &StatusTag) -> RuntimeAffix {
    RuntimeAffix::new(id, tag.name.as_str(), tag.affix_type, NARRATIVE_SOURCE)
        .with_description(tag.description.as_str())
        .with_stacks(tag.stacks)
}
