//! Kill settlement: reward credits, XP and loot for kills found in the
//! combined turn text.

use std::sync::LazyLock;

use regex_lite::Regex;

use lingshu_domain::{GameState, LootKind, Rank};

use super::SettlementLog;

pub const CREDITS_PER_KILL_LEVEL: i64 = 15;
pub const XP_PER_KILL_LEVEL: i64 = 20;

pub const NEGATED_LINE: &str = "【击杀】文本声明未击杀，不发放奖励";

const KILL_VERBS: &str = "击杀|杀死|杀掉|斩杀|击毙|处决|消灭|歼灭|格杀|秒杀|诛杀|毙命";

static NEGATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:并没有|并未|没有|不曾|未|没)(?:能|有)?(?:{})|(?i:\bno\s+kills?\b|\bdid\s+not\s+kill|\bdidn't\s+kill|\bwithout\s+killing)",
        KILL_VERBS
    ))
    .expect("valid regex")
});

static KILL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{}|(?i:\b(?:kill(?:ed|s)?|slay(?:s)?|slain|slew|execute(?:d)?|eliminate(?:d)?)\b)",
        KILL_VERBS
    ))
    .expect("valid regex")
});

static LV_RANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i:\blv)\.?\s*(\d+)").expect("valid regex"));

static JI_RANK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+|[一二三四五六七八九十百千]+)\s*级").expect("valid regex")
});

static CORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"掏核|取核|挖核|剖核|挖出核心|取出核心|摘取核心|收取核心|获得核心|(?i:\bharvest(?:ed)?\s+(?:the\s+)?cores?\b)",
    )
    .expect("valid regex")
});

static MALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"男性|男人|男子|少年|大汉|老头|老者|(?i:\b(?:male|man)\b)").expect("valid regex")
});

/// What the text says about kills, before any state is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillScan {
    None,
    Negated,
    Kills {
        count: u32,
        rank: Rank,
        core_harvested: bool,
        male_target: bool,
    },
}

pub fn scan_kills(text: &str) -> KillScan {
    if NEGATION_RE.is_match(text) {
        return KillScan::Negated;
    }
    let count = KILL_RE.find_iter(text).count();
    if count == 0 {
        return KillScan::None;
    }
    KillScan::Kills {
        count: u32::try_from(count).unwrap_or(u32::MAX),
        rank: target_rank(text),
        core_harvested: CORE_RE.is_match(text),
        male_target: MALE_RE.is_match(text),
    }
}

/// First in-range rank mention; `Lv` forms are tried before `级` forms.
/// Levels outside 1-5 (`Lv.15`, `十五级`) are skipped. Defaults to Lv.1.
pub fn target_rank(text: &str) -> Rank {
    first_rank(&LV_RANK_RE, text)
        .or_else(|| first_rank(&JI_RANK_RE, text))
        .unwrap_or(Rank::Lv1)
}

fn first_rank(re: &Regex, text: &str) -> Option<Rank> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| rank_number(m.as_str()))
}

fn rank_number(number: &str) -> Option<Rank> {
    let level = match number {
        "一" => 1,
        "二" => 2,
        "三" => 3,
        "四" => 4,
        "五" => 5,
        digits => digits.parse::<u8>().ok()?,
    };
    Rank::from_level(level)
}

/// Core fragments dropped for `count` kills.
pub fn core_fragments(count: u32, core_harvested: bool) -> u32 {
    if core_harvested {
        count
    } else {
        (count / 2).max(1)
    }
}

pub fn settle_kills(state: &mut GameState, text: &str) -> SettlementLog {
    let mut log = SettlementLog::new();
    let (count, rank, core_harvested, male_target) = match scan_kills(text) {
        KillScan::None => return log,
        KillScan::Negated => {
            tracing::debug!("Kill negated in text; no rewards");
            log.push(NEGATED_LINE);
            return log;
        }
        KillScan::Kills {
            count,
            rank,
            core_harvested,
            male_target,
        } => (count, rank, core_harvested, male_target),
    };

    let level = i64::from(rank.level());
    let kills = i64::from(count);
    let credits = CREDITS_PER_KILL_LEVEL * level * kills;
    let xp = XP_PER_KILL_LEVEL * level * kills;

    let player = &mut state.player;
    player.currency.deposit(credits);
    let promotion = player.gain_xp(xp);

    log.push(format!("【击杀】确认击杀 {} 名 Lv.{} 目标", count, rank.level()));
    log.push(format!(
        "【奖励】信用点 +{}，经验 +{}（当前 Lv.{}，经验 {}/{}）",
        credits,
        xp,
        player.rank().level(),
        player.psionic().xp(),
        player.psionic().max_xp()
    ));
    if promotion.promoted() {
        log.push(format!(
            "【晋升】Lv.{} → Lv.{}，灵力上限 {}",
            promotion.from.level(),
            promotion.to.level(),
            player.pools().mp.max()
        ));
    }

    let fragments = core_fragments(count, core_harvested);
    player.add_loot(LootKind::BodyMaterial, rank, count);
    player.add_loot(LootKind::CoreFragment, rank, fragments);
    log.push(format!(
        "【战利品】Lv.{r} {} ×{}，Lv.{r} {} ×{}",
        LootKind::BodyMaterial.label(),
        count,
        LootKind::CoreFragment.label(),
        fragments,
        r = rank.level()
    ));

    if player.gender().is_female() && male_target {
        let total = player.currency.record_souls(rank, kills);
        log.push(format!(
            "【魂账】Lv.{} 男性魂记 +{}（累计 {}）",
            rank.level(),
            count,
            total
        ));
    }

    tracing::info!(
        kills = count,
        rank = rank.level(),
        credits,
        xp,
        promoted = promotion.promoted(),
        "Kill settlement applied"
    );
    log
}
