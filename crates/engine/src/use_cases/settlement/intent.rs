//! Scene intent classification.
//!
//! Pure keyword membership over fixed sets, checked in priority order:
//! social_charm > stealth > research > psionic_control > combat_ranged, with
//! combat_melee as the fallback. ASCII keywords match case-insensitively and
//! only at the start of a word, so `use` does not fire inside `because`.

use std::fmt;

use lingshu_domain::value_objects::SixDimKey;

const SOCIAL_KEYWORDS: &[&str] = &[
    "说服", "劝说", "魅惑", "诱惑", "勾引", "调情", "搭讪", "交谈", "谈判", "讨好", "恭维",
    "安抚", "示好", "微笑", "撒娇", "交涉", "persuade", "charm", "seduce", "flirt", "negotiate",
    "convince",
];

const STEALTH_KEYWORDS: &[&str] = &[
    "潜行", "潜入", "隐匿", "隐藏", "躲藏", "偷偷", "悄悄", "偷袭", "尾随", "跟踪", "伪装",
    "藏身", "sneak", "stealth", "hide", "infiltrate",
];

const RESEARCH_KEYWORDS: &[&str] = &[
    "调查", "研究", "分析", "搜查", "搜索", "检查", "查看", "观察", "破解", "解读", "阅读",
    "鉴定", "侦查", "investigate", "research", "analyze", "examine", "inspect", "search",
];

const PSIONIC_KEYWORDS: &[&str] = &[
    "灵能", "灵力", "念力", "精神", "意念", "操控", "控制", "心灵", "施法", "法术", "结印",
    "psionic", "telekinesis", "mind", "spell",
];

const RANGED_KEYWORDS: &[&str] = &[
    "射击", "开枪", "狙击", "射箭", "投掷", "扫射", "瞄准", "弓", "枪", "shoot", "snipe",
    "throw",
];

const MELEE_KEYWORDS: &[&str] = &[
    "攻击", "砍", "刺", "劈", "斩", "揍", "踢", "拳", "格斗", "搏斗", "冲向", "撞", "打",
    "attack", "strike", "punch", "kick", "slash", "stab",
];

/// Action verbs not tied to a particular scene
const GENERAL_ACTION_KEYWORDS: &[&str] = &[
    "击杀", "杀", "使用", "施展", "发动", "前往", "进入", "打开", "拿起", "抓住", "逃跑",
    "躲避", "冲", "跳", "爬", "推", "拉", "偷", "买", "卖", "交易", "尝试", "use", "cast",
    "open", "grab", "run", "kill", "climb", "jump", "try",
];

/// The six scene categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneIntent {
    CombatMelee,
    CombatRanged,
    PsionicControl,
    Stealth,
    SocialCharm,
    Research,
}

impl SceneIntent {
    /// Categories in classification priority; the fallback is last.
    pub const PRIORITY: [SceneIntent; 6] = [
        SceneIntent::SocialCharm,
        SceneIntent::Stealth,
        SceneIntent::Research,
        SceneIntent::PsionicControl,
        SceneIntent::CombatRanged,
        SceneIntent::CombatMelee,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::CombatMelee => "combat_melee",
            Self::CombatRanged => "combat_ranged",
            Self::PsionicControl => "psionic_control",
            Self::Stealth => "stealth",
            Self::SocialCharm => "social_charm",
            Self::Research => "research",
        }
    }

    /// Label used in settlement lines
    pub fn label(self) -> &'static str {
        match self {
            Self::CombatMelee => "近战搏斗",
            Self::CombatRanged => "远程射击",
            Self::PsionicControl => "灵能操控",
            Self::Stealth => "潜行隐匿",
            Self::SocialCharm => "社交魅惑",
            Self::Research => "调查研究",
        }
    }

    /// Attribute weights in integer percent; always sum to 100.
    pub fn weights(self) -> [(SixDimKey, i32); 3] {
        use SixDimKey::*;
        match self {
            Self::CombatMelee => [(Strength, 50), (Agility, 30), (Constitution, 20)],
            Self::CombatRanged => [(Agility, 50), (Perception, 30), (Strength, 20)],
            Self::PsionicControl => [(Will, 50), (Perception, 30), (Charisma, 20)],
            Self::Stealth => [(Agility, 50), (Perception, 30), (Will, 20)],
            Self::SocialCharm => [(Charisma, 60), (Will, 20), (Perception, 20)],
            Self::Research => [(Perception, 50), (Will, 30), (Constitution, 20)],
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::CombatMelee => MELEE_KEYWORDS,
            Self::CombatRanged => RANGED_KEYWORDS,
            Self::PsionicControl => PSIONIC_KEYWORDS,
            Self::Stealth => STEALTH_KEYWORDS,
            Self::SocialCharm => SOCIAL_KEYWORDS,
            Self::Research => RESEARCH_KEYWORDS,
        }
    }
}

impl fmt::Display for SceneIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Always returns a category; text with no keyword is melee.
pub fn classify(text: &str) -> SceneIntent {
    let lowered = text.to_lowercase();
    SceneIntent::PRIORITY
        .into_iter()
        .find(|scene| contains_any(&lowered, scene.keywords()))
        .unwrap_or(SceneIntent::CombatMelee)
}

/// Whether the text describes an action that should be settled at all.
pub fn is_action_intent(text: &str) -> bool {
    let lowered = text.to_lowercase();
    if lowered.trim().is_empty() {
        return false;
    }
    contains_any(&lowered, GENERAL_ACTION_KEYWORDS)
        || SceneIntent::PRIORITY
            .into_iter()
            .any(|scene| contains_any(&lowered, scene.keywords()))
}

/// `haystack` must already be lowercased.
pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| contains_keyword(haystack, needle))
}

fn contains_keyword(haystack: &str, needle: &str) -> bool {
    if !needle.is_ascii() {
        return haystack.contains(needle);
    }
    haystack.match_indices(needle).any(|(start, _)| {
        !haystack[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric())
    })
}
