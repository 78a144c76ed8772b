//! Body parts and lingshu parts
//!
//! Both kinds share one record. Each part owns its skills, equipped items and
//! status affixes. Slot capacities are checked when something is equipped;
//! lowering a capacity later never drops what is already there.

use serde::{Deserialize, Serialize};

use super::{EquipSlot, Equippable};
use crate::value_objects::{Rank, RuntimeAffix};
use crate::{DomainError, EquippableId, PartId};

pub const DEFAULT_SKILL_SLOTS: u32 = 3;
pub const DEFAULT_EQUIP_SLOTS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPart {
    pub id: PartId,
    /// Stable ASCII key, e.g. `left_arm`
    pub key: String,
    /// Display name, e.g. `左臂`
    pub name: String,
    #[serde(default)]
    pub rank: Rank,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    skills: Vec<Equippable>,
    #[serde(default)]
    equipped_items: Vec<Equippable>,
    #[serde(default)]
    pub status_affixes: Vec<RuntimeAffix>,
    max_skill_slots: u32,
    max_equip_slots: u32,
}

/// A spirit-hub slot; same shape and rules as a body part.
pub type LingshuPart = BodyPart;

impl BodyPart {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PartId::new(),
            key: key.into(),
            name: name.into(),
            rank: Rank::Lv1,
            description: String::new(),
            skills: Vec::new(),
            equipped_items: Vec::new(),
            status_affixes: Vec::new(),
            max_skill_slots: DEFAULT_SKILL_SLOTS,
            max_equip_slots: DEFAULT_EQUIP_SLOTS,
        }
    }

    pub fn with_slots(mut self, max_skill_slots: u32, max_equip_slots: u32) -> Self {
        self.max_skill_slots = max_skill_slots;
        self.max_equip_slots = max_equip_slots;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn skills(&self) -> &[Equippable] {
        &self.skills
    }

    pub fn equipped_items(&self) -> &[Equippable] {
        &self.equipped_items
    }

    pub fn max_skill_slots(&self) -> u32 {
        self.max_skill_slots
    }

    pub fn max_equip_slots(&self) -> u32 {
        self.max_equip_slots
    }

    /// Change the skill capacity. Existing skills are kept even above it.
    pub fn set_max_skill_slots(&mut self, slots: u32) {
        self.max_skill_slots = slots;
    }

    /// Change the equip capacity. Existing items are kept even above it.
    pub fn set_max_equip_slots(&mut self, slots: u32) {
        self.max_equip_slots = slots;
    }

    /// Case-insensitive substring test against name and key.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim();
        if needle.is_empty() {
            return false;
        }
        let lowered = needle.to_lowercase();
        self.name.to_lowercase().contains(&lowered) || self.key.to_lowercase().contains(&lowered)
    }

    /// Equip into the given slot kind.
    ///
    /// # Errors
    ///
    /// `DomainError::ContainerFull` when the slot kind is at capacity; the part
    /// is left unchanged.
    pub fn equip(&mut self, slot: EquipSlot, equippable: Equippable) -> Result<(), DomainError> {
        let (list, max) = match slot {
            EquipSlot::Skill => (&mut self.skills, self.max_skill_slots),
            EquipSlot::Item => (&mut self.equipped_items, self.max_equip_slots),
        };
        let current = u32::try_from(list.len()).unwrap_or(u32::MAX);
        if current >= max {
            return Err(DomainError::container_full(current, max));
        }
        list.push(equippable);
        Ok(())
    }

    /// Remove by id from the given slot kind.
    ///
    /// # Errors
    ///
    /// `DomainError::NotFound` when nothing with that id is equipped there.
    pub fn unequip(&mut self, slot: EquipSlot, id: EquippableId) -> Result<Equippable, DomainError> {
        let list = match slot {
            EquipSlot::Skill => &mut self.skills,
            EquipSlot::Item => &mut self.equipped_items,
        };
        let index = list
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| DomainError::not_found("Equippable", id.to_string()))?;
        Ok(list.remove(index))
    }

    /// Description blobs of every skill, then every item.
    pub fn equipped_texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.skills
            .iter()
            .chain(self.equipped_items.iter())
            .map(|e| e.description.as_str())
    }

    pub fn remove_affix(&mut self, affix_id: &str) -> Option<RuntimeAffix> {
        let index = self.status_affixes.iter().position(|a| a.id == affix_id)?;
        Some(self.status_affixes.remove(index))
    }
}
