//! Non-player characters and their relationship scores

use serde::{Deserialize, Serialize};

use crate::value_objects::Gender;
use crate::NpcId;

pub const MAX_RELATIONSHIP: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "NpcData")]
pub struct Npc {
    id: NpcId,
    name: String,
    gender: Gender,
    affection: i32,
    trust: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NpcData {
    id: NpcId,
    name: String,
    #[serde(default)]
    gender: Gender,
    #[serde(default)]
    affection: i32,
    #[serde(default)]
    trust: i32,
}

impl From<NpcData> for Npc {
    fn from(data: NpcData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            gender: data.gender,
            affection: clamp_relationship(data.affection),
            trust: clamp_relationship(data.trust),
        }
    }
}

fn clamp_relationship(value: i32) -> i32 {
    value.clamp(0, MAX_RELATIONSHIP)
}

impl Npc {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: NpcId::new(),
            name: name.into(),
            gender,
            affection: 0,
            trust: 0,
        }
    }

    pub fn with_relationship(mut self, affection: i32, trust: i32) -> Self {
        self.affection = clamp_relationship(affection);
        self.trust = clamp_relationship(trust);
        self
    }

    pub fn id(&self) -> NpcId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn affection(&self) -> i32 {
        self.affection
    }

    pub fn trust(&self) -> i32 {
        self.trust
    }

    /// Returns `(before, after)`.
    pub fn raise_affection(&mut self, amount: i32) -> (i32, i32) {
        let before = self.affection;
        self.affection = clamp_relationship(before.saturating_add(amount.max(0)));
        (before, self.affection)
    }

    /// Returns `(before, after)`.
    pub fn raise_trust(&mut self, amount: i32) -> (i32, i32) {
        let before = self.trust;
        self.trust = clamp_relationship(before.saturating_add(amount.max(0)));
        (before, self.trust)
    }
}
