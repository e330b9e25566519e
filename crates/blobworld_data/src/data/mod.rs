//! Core data structures for the Blobworld simulation.

pub mod entity;
pub mod event;
pub mod snapshot;
