//! Effect use cases - turning equipped descriptions into the runtime bonus.
//!
//! The bonus is a fold over every equipped skill/item description. It is
//! recomputed eagerly after each equipment change and never cached elsewhere.

mod equipment;
mod parser;

pub use equipment::{equip_item, equip_skill, unequip_item, unequip_skill};
pub use parser::{
    commands_for_text, parse_effect_commands, parse_heuristic_commands, HEURISTIC_SOURCE,
};

use lingshu_domain::value_objects::{apply_commands, EffectTarget, RuntimeBonus};
use lingshu_domain::PlayerCharacter;

/// Fold every blob's commands over `RuntimeBonus::default()`, left to right.
/// Each blob contributes its explicit commands, or its heuristic ones when it
/// has none.
pub fn aggregate_bonus<'a>(texts: impl IntoIterator<Item = &'a str>) -> RuntimeBonus {
    texts
        .into_iter()
        .fold(RuntimeBonus::default(), |bonus, text| {
            let commands = commands_for_text(text);
            for command in &commands {
                if EffectTarget::resolve(&command.target).is_none() {
                    tracing::debug!(effect_target = %command.target, "Ignoring unknown effect target");
                }
            }
            apply_commands(bonus, &commands)
        })
}

/// Recompute the player's runtime bonus from everything equipped.
pub fn recompute_bonus(player: &mut PlayerCharacter) {
    let bonus = aggregate_bonus(player.equipped_texts());
    tracing::debug!(
        player_id = %player.id(),
        conversion = bonus.conversion,
        recovery = bonus.recovery,
        charisma = bonus.charisma,
        can_fly = bonus.can_fly,
        "Runtime bonus recomputed"
    );
    player.set_runtime_bonus(bonus);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingshu_domain::value_objects::SixDimKey;

    #[test]
    fn test_explicit_tag_changes_only_its_field() {
        let bonus = aggregate_bonus(["[EFFECT|target=player.sixdim.力量|op=add|value=5]"]);
        let mut expected = RuntimeBonus::default();
        expected.six_dim.insert(SixDimKey::Strength, 5);
        assert_eq!(bonus, expected);
    }

    #[test]
    fn test_explicit_blob_ignores_its_heuristics() {
        let bonus = aggregate_bonus(["力量+9 [EFFECT|target=player.charisma|value=2]"]);
        assert_eq!(bonus.charisma, 2);
        assert_eq!(bonus.six_dim_delta(SixDimKey::Strength), 0);
    }

    #[test]
    fn test_blobs_fold_left_to_right() {
        let bonus = aggregate_bonus([
            "意志+3",
            "[EFFECT|target=player.sixdim.意志|op=set|value=1]",
            "＋2意志",
        ]);
        assert_eq!(bonus.six_dim_delta(SixDimKey::Will), 3);
    }

    #[test]
    fn test_plain_text_contributes_nothing() {
        assert!(aggregate_bonus(["一把生锈的短刀", ""]).is_empty());
    }
}
