//! Character setup.

use lingshu_domain::{DomainError, Gender, PlayerCharacter, SixDimProfile};

use crate::infrastructure::config::EngineConfig;

/// A fresh player with the configured attribute cap and part capacities.
///
/// # Errors
///
/// `DomainError::Validation` when the name is empty or too long.
pub fn create_player(
    name: &str,
    gender: Gender,
    config: &EngineConfig,
) -> Result<PlayerCharacter, DomainError> {
    let player = PlayerCharacter::new(name, gender)?
        .with_six_dim(SixDimProfile::new(config.start_attribute_cap))
        .with_part_slots(config.default_skill_slots, config.default_equip_slots);
    tracing::info!(
        player_id = %player.id(),
        name = player.name(),
        rank = player.rank().level(),
        "Player created"
    );
    Ok(player)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_player_applies_config() {
        let config = EngineConfig {
            start_attribute_cap: 12,
            default_skill_slots: 1,
            default_equip_slots: 4,
            ..EngineConfig::default()
        };
        let player = create_player("林夜", Gender::Female, &config).expect("valid player");
        assert_eq!(player.six_dim.cap(), 12);
        assert!(player
            .body_parts
            .iter()
            .chain(player.lingshu_parts.iter())
            .all(|p| p.max_skill_slots() == 1 && p.max_equip_slots() == 4));
        assert_eq!(player.pools().mp.max(), 300);
    }

    #[test]
    fn test_create_player_rejects_blank_name() {
        let err = create_player("  ", Gender::Male, &EngineConfig::default()).expect_err("blank name");
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
