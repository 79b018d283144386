use glam::{Quat, Vec3};

/// Per-joint local pose, kept as `(position, rotation)` pairs.
///
/// Matrices are only materialized by the pose composer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub positions: Vec<Vec3>,
    pub rotations: Vec<Quat>,
}

impl Pose {
    /// Zero translation and identity rotation for every joint.
    #[must_use]
    pub fn identity(joint_count: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; joint_count],
            rotations: vec![Quat::IDENTITY; joint_count],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Resizes to `joint_count`, filling new joints with the identity pose.
    pub fn resize(&mut self, joint_count: usize) {
        self.positions.resize(joint_count, Vec3::ZERO);
        self.rotations.resize(joint_count, Quat::IDENTITY);
    }
}
