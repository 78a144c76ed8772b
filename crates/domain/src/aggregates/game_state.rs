//! GameState aggregate - the unit one settlement pass mutates

use serde::{Deserialize, Serialize};

use super::PlayerCharacter;
use crate::entities::Npc;
use crate::NpcId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub player: PlayerCharacter,
    /// Insertion order is significant: name matching takes the first hit.
    #[serde(default)]
    pub npcs: Vec<Npc>,
    /// Free-text location; region factors are keyed on substrings of it
    #[serde(default)]
    pub location: String,
}

impl GameState {
    pub fn new(player: PlayerCharacter) -> Self {
        Self {
            player,
            npcs: Vec::new(),
            location: String::new(),
        }
    }

    pub fn with_npc(mut self, npc: Npc) -> Self {
        self.npcs.push(npc);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn npc(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id() == id)
    }

    pub fn npc_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|n| n.id() == id)
    }

    /// Index of the selected NPC when it exists, else of the first NPC (in list
    /// order) whose name appears in `text`.
    pub fn resolve_npc(&self, selected: Option<NpcId>, text: &str) -> Option<usize> {
        if let Some(id) = selected {
            if let Some(index) = self.npcs.iter().position(|n| n.id() == id) {
                return Some(index);
            }
        }
        self.npcs
            .iter()
            .position(|n| !n.name().is_empty() && text.contains(n.name()))
    }
}
