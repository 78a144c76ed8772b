//! Entities: records with identity owned by the player or the world

mod body_part;
mod equippable;
mod inventory;
mod npc;

pub use body_part::{BodyPart, LingshuPart, DEFAULT_EQUIP_SLOTS, DEFAULT_SKILL_SLOTS};
pub use equippable::{EquipSlot, Equippable};
pub use inventory::{Inventory, InventoryStack, LootKind};
pub use npc::{Npc, MAX_RELATIONSHIP};
