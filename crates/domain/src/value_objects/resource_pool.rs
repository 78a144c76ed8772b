//! Resource pools - bounded `{current, max}` pairs
//!
//! `current` is always within `[0, max]`. Every mutation clamps; there is no
//! deficit borrowing and no overflow past the maximum.

use serde::{Deserialize, Serialize};

/// A bounded resource (HP, MP, Sanity, Charisma)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ResourcePoolData")]
pub struct ResourcePool {
    current: i64,
    max: i64,
}

/// Unchecked wire shape; converted through `ResourcePool::new` so loaded
/// saves are re-clamped.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourcePoolData {
    current: i64,
    max: i64,
}

impl From<ResourcePoolData> for ResourcePool {
    fn from(data: ResourcePoolData) -> Self {
        Self::new(data.current, data.max)
    }
}

impl ResourcePool {
    /// Create a pool, clamping `current` into `[0, max]` and `max` to `>= 0`.
    pub fn new(current: i64, max: i64) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
        }
    }

    /// Create a pool filled to its maximum.
    pub fn full(max: i64) -> Self {
        Self::new(max, max)
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Clamped subtraction. Returns the amount actually removed.
    pub fn spend(&mut self, amount: i64) -> i64 {
        let taken = amount.max(0).min(self.current);
        self.current -= taken;
        taken
    }

    /// Clamped addition. Returns the amount actually added.
    pub fn restore(&mut self, amount: i64) -> i64 {
        let added = amount.max(0).min(self.max - self.current);
        self.current += added;
        added
    }

    /// Change the maximum and re-clamp `current`. Never raises `current`.
    pub fn set_max(&mut self, max: i64) {
        self.max = max.max(0);
        self.current = self.current.min(self.max);
    }
}

/// The four pools every player carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePools {
    pub hp: ResourcePool,
    pub mp: ResourcePool,
    pub sanity: ResourcePool,
    /// Social standing; social actions charge it as reputation
    pub charisma: ResourcePool,
}

impl ResourcePools {
    pub fn new(hp: i64, mp: i64, sanity: i64, charisma: i64) -> Self {
        Self {
            hp: ResourcePool::full(hp),
            mp: ResourcePool::full(mp),
            sanity: ResourcePool::full(sanity),
            charisma: ResourcePool::full(charisma),
        }
    }

    pub fn all(&self) -> [&ResourcePool; 4] {
        [&self.hp, &self.mp, &self.sanity, &self.charisma]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_current() {
        assert_eq!(ResourcePool::new(150, 100).current(), 100);
        assert_eq!(ResourcePool::new(-5, 100).current(), 0);
        let negative_max = ResourcePool::new(10, -1);
        assert_eq!(negative_max.max(), 0);
        assert_eq!(negative_max.current(), 0);
    }

    #[test]
    fn test_spend_floors_at_zero() {
        let mut pool = ResourcePool::new(4, 100);
        assert_eq!(pool.spend(6), 4);
        assert_eq!(pool.current(), 0);
        assert_eq!(pool.spend(3), 0);
        assert_eq!(pool.spend(-10), 0);
        assert_eq!(pool.current(), 0);
    }

    #[test]
    fn test_restore_caps_at_max() {
        let mut pool = ResourcePool::new(90, 100);
        assert_eq!(pool.restore(25), 10);
        assert!(pool.is_full());
    }

    #[test]
    fn test_set_max_reclamps_without_inventing() {
        let mut pool = ResourcePool::new(80, 100);
        pool.set_max(300);
        assert_eq!(pool.current(), 80);
        pool.set_max(50);
        assert_eq!(pool.current(), 50);
    }

    #[test]
    fn test_deserialize_reclamps() {
        let pool: ResourcePool =
            serde_json::from_str(r#"{"current": 500, "max": 120}"#).expect("deserialize");
        assert_eq!(pool, ResourcePool::new(120, 120));
    }
}
