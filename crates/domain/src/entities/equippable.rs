//! Skills and items that can be equipped on a part

use serde::{Deserialize, Serialize};

use crate::value_objects::Rank;
use crate::EquippableId;

/// Whether an equippable occupies a skill slot or an equip slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipSlot {
    Skill,
    Item,
}

/// A skill or item. `description` is the only input to bonus aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equippable {
    pub id: EquippableId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rank: Rank,
}

impl Equippable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EquippableId::new(),
            name: name.into(),
            description: String::new(),
            rank: Rank::Lv1,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }
}
