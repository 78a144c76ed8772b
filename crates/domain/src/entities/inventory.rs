//! Loot inventory; stacks merge by `(key, rank)`

use serde::{Deserialize, Serialize};

use crate::value_objects::Rank;

/// Loot produced by kill settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LootKind {
    BodyMaterial,
    CoreFragment,
}

impl LootKind {
    pub fn key(self) -> &'static str {
        match self {
            Self::BodyMaterial => "body_material",
            Self::CoreFragment => "core_fragment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BodyMaterial => "躯体素材",
            Self::CoreFragment => "核心碎片",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStack {
    pub key: String,
    pub name: String,
    pub rank: Rank,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    stacks: Vec<InventoryStack>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge into the `(key, rank)` stack or append a new one. Zero is ignored.
    pub fn add(&mut self, key: &str, name: &str, rank: Rank, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self
            .stacks
            .iter_mut()
            .find(|s| s.key == key && s.rank == rank)
        {
            Some(stack) => stack.quantity = stack.quantity.saturating_add(quantity),
            None => self.stacks.push(InventoryStack {
                key: key.to_string(),
                name: name.to_string(),
                rank,
                quantity,
            }),
        }
    }

    pub fn add_loot(&mut self, kind: LootKind, rank: Rank, quantity: u32) {
        self.add(kind.key(), kind.label(), rank, quantity);
    }

    pub fn quantity(&self, key: &str, rank: Rank) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.key == key && s.rank == rank)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    pub fn loot_quantity(&self, kind: LootKind, rank: Rank) -> u32 {
        self.quantity(kind.key(), rank)
    }

    pub fn stacks(&self) -> &[InventoryStack] {
        &self.stacks
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
