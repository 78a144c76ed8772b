//! Lingshu Domain
//!
//! Pure data model and formulas for the narrative settlement core: six-dim
//! attributes, the rank ladder, resource pools, currency ledgers, status
//! affixes, and the runtime bonus aggregate.
//!
//! Nothing in this crate parses free text, performs I/O, or draws random
//! numbers. Given the same state and the same inputs every operation here
//! produces the same result.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{GameState, PlayerCharacter};
pub use entities::{BodyPart, EquipSlot, Equippable, Inventory, LingshuPart, LootKind, Npc};
pub use error::DomainError;
pub use ids::{EquippableId, NpcId, PartId, PlayerId};
pub use value_objects::{
    AffixType, ConversionOutcome, CurrencyLedger, EffectCommand, EffectOp, EffectValue,
    ExchangeOutcome, Gender, Promotion, PsionicProfile, Rank, ResourcePool, ResourcePools,
    RuntimeAffix, RuntimeBonus, SixDimKey, SixDimProfile,
};
