//! Value objects: immutable or self-clamping records with no identity

mod affix;
mod currency;
mod psionic;
mod rank;
mod region;
mod resource_pool;
mod runtime_bonus;
mod six_dim;

pub use affix::{AffixType, RuntimeAffix};
pub use currency::{
    exchange_yield, ConversionOutcome, CurrencyLedger, ExchangeOutcome, EXCHANGE_YIELD_PERCENT,
};
pub use psionic::{Promotion, PsionicProfile, DEFAULT_CONVERSION_RATE, DEFAULT_RECOVERY_RATE};
pub use rank::{Gender, Rank, FEMALE_MP_MULTIPLIER};
pub use region::{region_factor, DEFAULT_REGION_FACTOR, FORBIDDEN_REGION};
pub use resource_pool::{ResourcePool, ResourcePools};
pub use runtime_bonus::{
    apply_command, apply_commands, EffectCommand, EffectOp, EffectTarget, EffectValue,
    RuntimeBonus,
};
pub use six_dim::{
    SixDimKey, SixDimProfile, DEFAULT_ATTRIBUTE_CAP, DEFAULT_ATTRIBUTE_VALUE, MIN_ATTRIBUTE,
    START_ATTRIBUTE_CAP,
};
