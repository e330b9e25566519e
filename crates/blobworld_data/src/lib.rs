//! Plain data shared between the simulation core and its collaborators.
//!
//! Everything in here is owned, serde-serializable and free of physics
//! handles, so a renderer or a log sink can consume it without linking the
//! simulation itself.

pub mod data;

pub use data::entity::{FruitId, FruitKind, OrganismId, Rgb};
pub use data::event::SimEvent;
pub use data::snapshot::{FruitSnapshot, OrganismSnapshot, SegmentSnapshot, WorldSnapshot};
pub use glam::Vec2;
