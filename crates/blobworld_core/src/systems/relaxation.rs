//! Soft-body chain relaxation.
//!
//! The head is authoritative: its segment is copied from the physics body.
//! Every follower keeps an undistorted `anchor` that is pulled toward its
//! parent whenever it sits farther than its rest length, closing a fixed
//! fraction of the excess per frame. The drawn position is the anchor plus a
//! small periodic wiggle that is recomputed from elapsed time every frame, so
//! it never accumulates into the constraint.

use crate::config::OrganismConfig;
use crate::organism::Organism;
use crate::physics::RigidBodyWorld;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxParams {
    /// Fraction of the excess stretch removed per frame, in `(0, 1]`.
    pub stiffness: f32,
    pub wiggle_amplitude: f32,
    /// Radians per second.
    pub wiggle_frequency: f32,
}

impl From<&OrganismConfig> for RelaxParams {
    fn from(config: &OrganismConfig) -> Self {
        Self {
            stiffness: config.stiffness,
            wiggle_amplitude: config.wiggle_amplitude,
            wiggle_frequency: config.wiggle_frequency,
        }
    }
}

impl RelaxParams {
    fn wiggle(&self, elapsed: f32, phase: f32) -> Vec2 {
        if self.wiggle_amplitude == 0.0 {
            return Vec2::ZERO;
        }
        let t = elapsed * self.wiggle_frequency + phase;
        // Mismatched rates on the two axes keep the motion from looking like
        // a plain circle.
        Vec2::new(t.sin(), (t * 1.3).cos()) * self.wiggle_amplitude
    }
}

/// Relaxes one organism's chain and pushes the result into its sensor bodies.
///
/// Segments are visited in index order; a parent index that does not point
/// at an earlier segment falls back to the head.
pub fn relax<W: RigidBodyWorld + ?Sized>(world: &mut W, organism: &mut Organism, params: &RelaxParams, elapsed: f32) {
    let Some(head_pos) = world.position(organism.head_body) else {
        return;
    };
    let Some(head) = organism.segments.first_mut() else {
        return;
    };
    head.position = head_pos;
    head.anchor = head_pos;

    for i in 1..organism.segments.len() {
        let parent = organism.segments[i].parent.filter(|&p| p < i).unwrap_or(0);
        let parent_pos = organism.segments[parent].position;

        let seg = &mut organism.segments[i];
        let to_parent = parent_pos - seg.anchor;
        let dist = to_parent.length();
        if dist > seg.rest_length && dist > f32::EPSILON {
            let excess = dist - seg.rest_length;
            seg.anchor += to_parent / dist * excess * params.stiffness;
        }
        seg.position = seg.anchor + params.wiggle(elapsed, seg.phase);
        world.set_position(seg.body, seg.position);
    }
}
