use super::entity::{FruitId, FruitKind, OrganismId, Rgb};
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SegmentSnapshot {
    pub position: Vec2,
    pub radius: f32,
}

/// Read-only view of one organism. Segment 0 is the current head.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrganismSnapshot {
    pub id: OrganismId,
    pub color: Rgb,
    pub segments: Vec<SegmentSnapshot>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct FruitSnapshot {
    pub id: FruitId,
    pub position: Vec2,
    pub kind: FruitKind,
}

/// Everything a renderer needs to draw one frame.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WorldSnapshot {
    pub frame: u64,
    pub width: f32,
    pub depth: f32,
    pub organisms: Vec<OrganismSnapshot>,
    pub fruit: Vec<FruitSnapshot>,
}

impl WorldSnapshot {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.organisms.iter().map(|o| o.segments.len()).sum()
    }
}
