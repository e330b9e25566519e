//! Per-organism systems run once per frame, in this order: steering, leader
//! rotation, chain relaxation.

pub mod leader;
pub mod relaxation;
pub mod steering;
