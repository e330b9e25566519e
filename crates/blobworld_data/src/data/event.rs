use super::entity::{FruitId, FruitKind, OrganismId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
/// Tagged union of everything noteworthy that happened during a frame.
///
/// Serialised with `#[serde(tag = "event")]` so a log sink can stream it as
/// JSONL.
pub enum SimEvent {
    /// A new organism was placed in the arena.
    OrganismSpawned {
        id: OrganismId,
        segments: usize,
        x: f32,
        z: f32,
        frame: u64,
    },
    /// An organism was found without segments and dropped from the pool.
    OrganismPruned { id: OrganismId, frame: u64 },
    /// The head role moved to another segment.
    LeaderRotated {
        id: OrganismId,
        from_segment: usize,
        frame: u64,
    },
    FruitSpawned {
        id: FruitId,
        kind: FruitKind,
        x: f32,
        z: f32,
        frame: u64,
    },
    FruitCollected {
        id: FruitId,
        kind: FruitKind,
        frame: u64,
    },
    /// The world was torn down and rebuilt for new bounds.
    ArenaRebuilt { width: f32, depth: f32, frame: u64 },
}

impl SimEvent {
    #[must_use]
    pub fn frame(&self) -> u64 {
        match self {
            SimEvent::OrganismSpawned { frame, .. }
            | SimEvent::OrganismPruned { frame, .. }
            | SimEvent::LeaderRotated { frame, .. }
            | SimEvent::FruitSpawned { frame, .. }
            | SimEvent::FruitCollected { frame, .. }
            | SimEvent::ArenaRebuilt { frame, .. } => *frame,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
