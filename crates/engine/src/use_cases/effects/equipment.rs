//! Equip/unequip use cases. Every successful mutation recomputes the bonus.

use lingshu_domain::{DomainError, EquipSlot, Equippable, EquippableId, PartId, PlayerCharacter};

use super::recompute_bonus;

pub fn equip_skill(
    player: &mut PlayerCharacter,
    part_id: PartId,
    skill: Equippable,
) -> Result<(), DomainError> {
    equip(player, part_id, EquipSlot::Skill, skill)
}

pub fn equip_item(
    player: &mut PlayerCharacter,
    part_id: PartId,
    item: Equippable,
) -> Result<(), DomainError> {
    equip(player, part_id, EquipSlot::Item, item)
}

pub fn unequip_skill(
    player: &mut PlayerCharacter,
    part_id: PartId,
    skill_id: EquippableId,
) -> Result<Equippable, DomainError> {
    unequip(player, part_id, EquipSlot::Skill, skill_id)
}

pub fn unequip_item(
    player: &mut PlayerCharacter,
    part_id: PartId,
    item_id: EquippableId,
) -> Result<Equippable, DomainError> {
    unequip(player, part_id, EquipSlot::Item, item_id)
}

fn equip(
    player: &mut PlayerCharacter,
    part_id: PartId,
    slot: EquipSlot,
    equippable: Equippable,
) -> Result<(), DomainError> {
    let name = equippable.name.clone();
    let part = player
        .part_mut(part_id)
        .ok_or_else(|| DomainError::not_found("BodyPart", part_id.to_string()))?;
    if let Err(e) = part.equip(slot, equippable) {
        tracing::warn!(part = %part.name, equippable = %name, error = %e, "Equip rejected");
        return Err(e);
    }
    tracing::info!(part_id = %part_id, equippable = %name, slot = ?slot, "Equipped");
    recompute_bonus(player);
    Ok(())
}

fn unequip(
    player: &mut PlayerCharacter,
    part_id: PartId,
    slot: EquipSlot,
    id: EquippableId,
) -> Result<Equippable, DomainError> {
    let part = player
        .part_mut(part_id)
        .ok_or_else(|| DomainError::not_found("BodyPart", part_id.to_string()))?;
    let removed = part.unequip(slot, id)?;
    tracing::info!(part_id = %part_id, equippable = %removed.name, slot = ?slot, "Unequipped");
    recompute_bonus(player);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingshu_domain::value_objects::SixDimKey;
    use lingshu_domain::Gender;

    fn player() -> PlayerCharacter {
        PlayerCharacter::new("林夜", Gender::Female).expect("valid name")
    }

    #[test]
    fn test_equip_recomputes_bonus() {
        let mut pc = player();
        let arm = pc.body_parts[2].id;
        equip_skill(
            &mut pc,
            arm,
            Equippable::new("铁拳").with_description("力量+4"),
        )
        .expect("fits");
        assert_eq!(pc.runtime_bonus().six_dim_delta(SixDimKey::Strength), 4);

        let core = pc.lingshu_parts[0].id;
        equip_item(
            &mut pc,
            core,
            Equippable::new("羽衣").with_description("[EFFECT|target=player.flags.flight|op=flag]"),
        )
        .expect("fits");
        assert!(pc.runtime_bonus().can_fly);
        assert_eq!(pc.runtime_bonus().six_dim_delta(SixDimKey::Strength), 4);
    }

    #[test]
    fn test_unequip_drops_bonus() {
        let mut pc = player();
        let arm = pc.body_parts[2].id;
        let ring = Equippable::new("魅影戒").with_description("魅力+6");
        let ring_id = ring.id;
        equip_item(&mut pc, arm, ring).expect("fits");
        assert_eq!(pc.runtime_bonus().six_dim_delta(SixDimKey::Charisma), 6);

        let removed = unequip_item(&mut pc, arm, ring_id).expect("equipped");
        assert_eq!(removed.name, "魅影戒");
        assert!(pc.runtime_bonus().is_empty());
    }

    #[test]
    fn test_capacity_error_leaves_bonus_untouched() {
        let mut pc = player().with_part_slots(1, 1);
        let head = pc.body_parts[0].id;
        equip_skill(&mut pc, head, Equippable::new("a").with_description("感知+2"))
            .expect("fits");
        let err = equip_skill(&mut pc, head, Equippable::new("b").with_description("感知+9"))
            .expect_err("full");
        assert_eq!(err, DomainError::container_full(1, 1));
        assert_eq!(pc.runtime_bonus().six_dim_delta(SixDimKey::Perception), 2);
    }

    #[test]
    fn test_unknown_part_is_not_found() {
        let mut pc = player();
        let result = equip_skill(&mut pc, PartId::new(), Equippable::new("x"));
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
