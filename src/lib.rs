//! Headless host for the blobworld simulation: an autopilot player that
//! feeds its path into the arena and asks the collision queries a real
//! movement loop would.

pub mod app;
pub mod model;
