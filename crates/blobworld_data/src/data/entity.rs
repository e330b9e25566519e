use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic identity of an organism. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org#{}", self.0)
    }
}

/// Monotonic identity of a fruit marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FruitId(pub u64);

impl fmt::Display for FruitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fruit#{}", self.0)
    }
}

/// Display color of an organism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Palette organisms are colored from.
    pub const PALETTE: [Rgb; 6] = [
        Rgb::new(0x7f, 0xd8, 0x9c),
        Rgb::new(0xf2, 0x8c, 0x8c),
        Rgb::new(0x8c, 0xb4, 0xf2),
        Rgb::new(0xf2, 0xd0, 0x6b),
        Rgb::new(0xc3, 0x8c, 0xf2),
        Rgb::new(0x6b, 0xe0, 0xe0),
    ];
}

impl Default for Rgb {
    fn default() -> Self {
        Self::PALETTE[0]
    }
}

/// Display tag of a fruit. The simulation never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Berry,
    Plum,
    Lime,
}

impl FruitKind {
    pub const ALL: [FruitKind; 4] = [
        FruitKind::Apple,
        FruitKind::Berry,
        FruitKind::Plum,
        FruitKind::Lime,
    ];
}
