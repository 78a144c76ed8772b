//! PlayerCharacter aggregate - the record every settlement pass mutates
//!
//! # Invariants
//!
//! - `pools.mp.max` always equals `psionic.rank().mp_cap(gender)`; every path that
//!   can change rank re-syncs it and re-clamps current MP
//! - rank only rises through `gain_xp`; `force_rank` is the sole downgrade path
//! - `runtime_bonus` is derived from equipped descriptions and is never persisted
//! - affix ids come from `affix_seq`, so identical inputs yield identical ids
//!
//! # Example
//!
//! ```
//! use lingshu_domain::aggregates::PlayerCharacter;
//! use lingshu_domain::value_objects::{Gender, Rank};
//!
//! let mut pc = PlayerCharacter::new("林夜", Gender::Female).expect("valid name");
//! assert_eq!(pc.pools().mp.max(), 300);
//!
//! let promotion = pc.gain_xp(100);
//! assert_eq!(promotion.to, Rank::Lv2);
//! assert_eq!(pc.pools().mp.max(), 600);
//! ```

use serde::{Deserialize, Serialize};

use crate::entities::{BodyPart, Inventory, LingshuPart, LootKind};
use crate::value_objects::{
    region_factor, ConversionOutcome, CurrencyLedger, ExchangeOutcome, Gender, Promotion,
    PsionicProfile, Rank, ResourcePool, ResourcePools, RuntimeAffix, RuntimeBonus,
    SixDimKey, SixDimProfile, START_ATTRIBUTE_CAP,
};
use crate::{DomainError, PartId, PlayerId};

pub const MAX_NAME_LENGTH: usize = 200;
pub const DEFAULT_HP: i64 = 100;
pub const DEFAULT_SANITY: i64 = 100;
pub const DEFAULT_CHARISMA_POOL: i64 = 100;

const DEFAULT_BODY_PARTS: [(&str, &str); 6] = [
    ("head", "头部"),
    ("torso", "躯干"),
    ("left_arm", "左臂"),
    ("right_arm", "右臂"),
    ("left_leg", "左腿"),
    ("right_leg", "右腿"),
];

const DEFAULT_LINGSHU_PARTS: [(&str, &str); 2] = [("spirit_core", "灵核"), ("mind_sea", "识海")];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PlayerCharacterData")]
pub struct PlayerCharacter {
    id: PlayerId,
    name: String,
    gender: Gender,

    pub six_dim: SixDimProfile,
    psionic: PsionicProfile,
    pools: ResourcePools,
    pub currency: CurrencyLedger,

    #[serde(default)]
    pub core_affixes: Vec<RuntimeAffix>,
    #[serde(default)]
    pub body_parts: Vec<BodyPart>,
    #[serde(default)]
    pub lingshu_parts: Vec<LingshuPart>,
    #[serde(default)]
    pub inventory: Inventory,

    #[serde(default)]
    affix_seq: u64,
    #[serde(skip)]
    runtime_bonus: RuntimeBonus,
}

/// Stored shape of a player. Loading goes through `From` so the MP maximum is
/// re-derived from `(gender, rank)` instead of trusted from the save.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCharacterData {
    id: PlayerId,
    name: String,
    gender: Gender,
    six_dim: SixDimProfile,
    psionic: PsionicProfile,
    pools: ResourcePools,
    currency: CurrencyLedger,
    #[serde(default)]
    core_affixes: Vec<RuntimeAffix>,
    #[serde(default)]
    body_parts: Vec<BodyPart>,
    #[serde(default)]
    lingshu_parts: Vec<LingshuPart>,
    #[serde(default)]
    inventory: Inventory,
    #[serde(default)]
    affix_seq: u64,
}

impl From<PlayerCharacterData> for PlayerCharacter {
    fn from(data: PlayerCharacterData) -> Self {
        let mut player = Self {
            id: data.id,
            name: data.name,
            gender: data.gender,
            six_dim: data.six_dim,
            psionic: data.psionic,
            pools: data.pools,
            currency: data.currency,
            core_affixes: data.core_affixes,
            body_parts: data.body_parts,
            lingshu_parts: data.lingshu_parts,
            inventory: data.inventory,
            affix_seq: data.affix_seq,
            runtime_bonus: RuntimeBonus::default(),
        };
        player.sync_mp_cap();
        player
    }
}

impl PlayerCharacter {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// A fresh Lv.1 character with default parts and full pools.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` for an empty or over-long name.
    pub fn new(name: impl Into<String>, gender: Gender) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Player name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Player name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }

        let psionic = PsionicProfile::new();
        let pools = ResourcePools::new(
            DEFAULT_HP,
            psionic.rank().mp_cap(gender),
            DEFAULT_SANITY,
            DEFAULT_CHARISMA_POOL,
        );

        Ok(Self {
            id: PlayerId::new(),
            name,
            gender,
            six_dim: SixDimProfile::new(START_ATTRIBUTE_CAP),
            psionic,
            pools,
            currency: CurrencyLedger::new(),
            core_affixes: Vec::new(),
            body_parts: DEFAULT_BODY_PARTS
                .iter()
                .map(|(key, name)| BodyPart::new(*key, *name))
                .collect(),
            lingshu_parts: DEFAULT_LINGSHU_PARTS
                .iter()
                .map(|(key, name)| BodyPart::new(*key, *name))
                .collect(),
            inventory: Inventory::new(),
            affix_seq: 0,
            runtime_bonus: RuntimeBonus::default(),
        })
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_six_dim(mut self, six_dim: SixDimProfile) -> Self {
        self.six_dim = six_dim;
        self
    }

    /// Apply slot capacities to every part.
    pub fn with_part_slots(mut self, max_skill_slots: u32, max_equip_slots: u32) -> Self {
        for part in self.body_parts.iter_mut().chain(self.lingshu_parts.iter_mut()) {
            part.set_max_skill_slots(max_skill_slots);
            part.set_max_equip_slots(max_equip_slots);
        }
        self
    }

    pub fn with_credits(mut self, credits: i64) -> Self {
        self.currency = self.currency.with_credits(credits);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn psionic(&self) -> &PsionicProfile {
        &self.psionic
    }

    pub fn rank(&self) -> Rank {
        self.psionic.rank()
    }

    pub fn pools(&self) -> &ResourcePools {
        &self.pools
    }

    pub fn runtime_bonus(&self) -> &RuntimeBonus {
        &self.runtime_bonus
    }

    /// Replace the derived bonus. Callers recompute it from equipped texts.
    pub fn set_runtime_bonus(&mut self, bonus: RuntimeBonus) {
        self.runtime_bonus = bonus;
    }

    /// Six-dim profile with the runtime bonus folded in.
    pub fn effective_six_dim(&self) -> SixDimProfile {
        self.six_dim.with_bonus(&self.runtime_bonus)
    }

    /// Effective 魅力 plus the flat charisma bonus.
    pub fn effective_charisma(&self) -> i32 {
        self.effective_six_dim()
            .get(SixDimKey::Charisma)
            .saturating_add(self.runtime_bonus.charisma)
    }

    pub fn effective_conversion_rate(&self) -> f64 {
        self.psionic.effective_conversion_rate(&self.runtime_bonus)
    }

    pub fn effective_recovery_rate(&self) -> f64 {
        self.psionic.effective_recovery_rate(&self.runtime_bonus)
    }

    // =========================================================================
    // Pools
    // =========================================================================

    /// Clamped; returns the amount actually removed.
    pub fn spend_mp(&mut self, amount: i64) -> i64 {
        self.pools.mp.spend(amount)
    }

    pub fn restore_mp(&mut self, amount: i64) -> i64 {
        self.pools.mp.restore(amount)
    }

    pub fn spend_sanity(&mut self, amount: i64) -> i64 {
        self.pools.sanity.spend(amount)
    }

    /// Reputation is charged against the charisma pool.
    pub fn spend_reputation(&mut self, amount: i64) -> i64 {
        self.pools.charisma.spend(amount)
    }

    pub fn spend_hp(&mut self, amount: i64) -> i64 {
        self.pools.hp.spend(amount)
    }

    pub fn restore_hp(&mut self, amount: i64) -> i64 {
        self.pools.hp.restore(amount)
    }

    // =========================================================================
    // Rank progression
    // =========================================================================

    /// Feed XP into the promotion loop and rescale the MP cap.
    pub fn gain_xp(&mut self, amount: i64) -> Promotion {
        let promotion = self.psionic.gain_xp(amount);
        self.sync_mp_cap();
        promotion
    }

    /// Explicit rank override; not used by settlement.
    pub fn force_rank(&mut self, rank: Rank) {
        self.psionic.force_rank(rank);
        self.sync_mp_cap();
    }

    pub fn set_conversion_rate(&mut self, rate: f64) {
        self.psionic.set_conversion_rate(rate);
    }

    pub fn set_recovery_rate(&mut self, rate: f64) {
        self.psionic.set_recovery_rate(rate);
    }

    /// Re-derive the MP maximum from `(gender, rank)`. Current MP is re-clamped,
    /// never raised.
    pub fn sync_mp_cap(&mut self) {
        self.pools.mp.set_max(self.rank().mp_cap(self.gender));
    }

    // =========================================================================
    // Economy
    // =========================================================================

    /// Current-rank credits into the next rank's vault.
    pub fn exchange_up(&mut self, amount: i64) -> ExchangeOutcome {
        let rank = self.rank();
        self.currency.exchange_up(rank, amount)
    }

    /// Next rank's vaulted coin back into current credits.
    pub fn exchange_down(&mut self, amount: i64) -> ExchangeOutcome {
        let rank = self.rank();
        self.currency.exchange_down(rank, amount)
    }

    /// Spend MP for `floor(mp * rate)` XP.
    pub fn convert_mp_to_xp(&mut self, mp: i64) -> ConversionOutcome {
        let balance = self.pools.mp.current();
        if mp <= 0 || mp > balance {
            return ConversionOutcome::InsufficientBalance {
                balance,
                requested: mp,
            };
        }
        let gained = floor_amount(mp as f64 * self.conversion_ratio());
        if gained == 0 {
            return ConversionOutcome::ZeroYield;
        }

        self.pools.mp.spend(mp);
        let promotion = self.gain_xp(gained);
        ConversionOutcome::Converted {
            spent: mp,
            gained,
            promotion: promotion.promoted().then_some(promotion),
        }
    }

    /// Spend MP for `floor(mp * rate * regionFactor)` credits.
    pub fn convert_mp_to_currency(&mut self, mp: i64, location: &str) -> ConversionOutcome {
        let Some(factor) = region_factor(location) else {
            return ConversionOutcome::RegionBlocked;
        };
        let balance = self.pools.mp.current();
        if mp <= 0 || mp > balance {
            return ConversionOutcome::InsufficientBalance {
                balance,
                requested: mp,
            };
        }
        let gained = floor_amount(mp as f64 * self.conversion_ratio() * factor);
        if gained == 0 {
            return ConversionOutcome::ZeroYield;
        }

        self.pools.mp.spend(mp);
        self.currency.deposit(gained);
        ConversionOutcome::Converted {
            spent: mp,
            gained,
            promotion: None,
        }
    }

    /// Spend credits to restore `floor(amount * rate * regionFactor)` MP.
    pub fn convert_currency_to_mp(&mut self, amount: i64, location: &str) -> ConversionOutcome {
        let Some(factor) = region_factor(location) else {
            return ConversionOutcome::RegionBlocked;
        };
        if self.pools.mp.is_full() {
            return ConversionOutcome::PoolFull;
        }
        let balance = self.currency.credits();
        if amount <= 0 || amount > balance {
            return ConversionOutcome::InsufficientBalance {
                balance,
                requested: amount,
            };
        }
        let restorable = floor_amount(amount as f64 * self.conversion_ratio() * factor);
        if restorable == 0 {
            return ConversionOutcome::ZeroYield;
        }

        self.currency.withdraw(amount);
        let gained = self.pools.mp.restore(restorable);
        ConversionOutcome::Converted {
            spent: amount,
            gained,
            promotion: None,
        }
    }

    fn conversion_ratio(&self) -> f64 {
        self.effective_conversion_rate() / 100.0
    }

    // =========================================================================
    // Parts, affixes and loot
    // =========================================================================

    /// Allocate the next deterministic affix id, `{scope}-{seq}`.
    pub fn next_affix_id(&mut self, scope: &str) -> String {
        self.affix_seq += 1;
        format!("{}-{}", scope, self.affix_seq)
    }

    pub fn part(&self, id: PartId) -> Option<&BodyPart> {
        self.body_parts
            .iter()
            .chain(self.lingshu_parts.iter())
            .find(|p| p.id == id)
    }

    pub fn part_mut(&mut self, id: PartId) -> Option<&mut BodyPart> {
        self.body_parts
            .iter_mut()
            .chain(self.lingshu_parts.iter_mut())
            .find(|p| p.id == id)
    }

    /// First part whose name or key contains `needle`; body parts are searched
    /// before lingshu parts.
    pub fn find_part_mut(&mut self, needle: &str) -> Option<&mut BodyPart> {
        self.body_parts
            .iter_mut()
            .chain(self.lingshu_parts.iter_mut())
            .find(|p| p.matches(needle))
    }

    /// Remove an affix from the core list or any part.
    pub fn remove_affix(&mut self, affix_id: &str) -> Option<RuntimeAffix> {
        if let Some(index) = self.core_affixes.iter().position(|a| a.id == affix_id) {
            return Some(self.core_affixes.remove(index));
        }
        self.body_parts
            .iter_mut()
            .chain(self.lingshu_parts.iter_mut())
            .find_map(|p| p.remove_affix(affix_id))
    }

    pub fn add_loot(&mut self, kind: LootKind, rank: Rank, quantity: u32) {
        self.inventory.add_loot(kind, rank, quantity);
    }

    /// Description blobs of everything equipped, body parts first.
    pub fn equipped_texts(&self) -> Vec<&str> {
        self.body_parts
            .iter()
            .chain(self.lingshu_parts.iter())
            .flat_map(|p| p.equipped_texts())
            .collect()
    }

    /// Every pool, for invariant checks.
    pub fn pool_list(&self) -> [&ResourcePool; 4] {
        self.pools.all()
    }
}

/// Floor a non-negative yield. The epsilon absorbs representation error in
/// products like `100 * 0.5 * 1.2`.
fn floor_amount(value: f64) -> i64 {
    (value + 1e-9).floor().max(0.0) as i64
}
