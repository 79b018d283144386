//! Pose Composer
//!
//! Turns a per-joint local pose into the matrices the renderer consumes.
//!
//! For each geometry `g` and each joint `j`, in ascending joint order:
//!
//! ```text
//! local_pose        = T(position[j]) * R(rotation[j])
//! local_bone[g, j]  = bind_pose[g, j] * local_pose
//! model_bone[g, j]  = model_bone[g, parent(j)] * local_bone[g, j]   (identity parent for roots)
//! inverse_bind[g, j] = inverse_bind_pose[g, j]
//! skinning[g, j]    = model_bone[g, j] * inverse_bind[g, j]
//! ```
//!
//! Pre-multiplying by the bind pose keeps the rest shape when the animated
//! pose is identity. `model_bone[g, j]` lives in the same space as geometry
//! `g`'s bind-time vertices, so the skinning matrix is identity at rest.

use glam::{Mat4, Quat, Vec3};

use crate::mesh::SkinnedMesh;

/// Flat per-geometry, per-joint transform buffers.
///
/// Each buffer holds `geometry_count * joint_count` matrices, geometry-major.
/// Sized once on creation.
#[derive(Debug, Clone)]
pub struct BoneBuffers {
    geometry_count: usize,
    joint_count: usize,
    local: Vec<Mat4>,
    model: Vec<Mat4>,
    inverse_bind: Vec<Mat4>,
    skinning: Vec<Mat4>,
}

impl BoneBuffers {
    #[must_use]
    pub fn new(geometry_count: usize, joint_count: usize) -> Self {
        let total = geometry_count * joint_count;
        Self {
            geometry_count,
            joint_count,
            local: vec![Mat4::IDENTITY; total],
            model: vec![Mat4::IDENTITY; total],
            inverse_bind: vec![Mat4::IDENTITY; total],
            skinning: vec![Mat4::IDENTITY; total],
        }
    }

    #[inline]
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.geometry_count
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    #[inline]
    fn range(&self, geometry: usize) -> std::ops::Range<usize> {
        assert!(
            geometry < self.geometry_count,
            "geometry {geometry} out of range ({} geometries)",
            self.geometry_count
        );
        let start = geometry * self.joint_count;
        start..start + self.joint_count
    }

    /// Parent-relative bone transforms of `geometry`.
    #[must_use]
    pub fn local(&self, geometry: usize) -> &[Mat4] {
        &self.local[self.range(geometry)]
    }

    /// Model-space bone transforms of `geometry`.
    #[must_use]
    pub fn model(&self, geometry: usize) -> &[Mat4] {
        &self.model[self.range(geometry)]
    }

    #[must_use]
    pub fn inverse_bind(&self, geometry: usize) -> &[Mat4] {
        &self.inverse_bind[self.range(geometry)]
    }

    /// `model * inverse_bind` per joint; what vertex skinning consumes.
    #[must_use]
    pub fn skinning(&self, geometry: usize) -> &[Mat4] {
        &self.skinning[self.range(geometry)]
    }
}

/// Stateless composer over a [`SkinnedMesh`] and caller-owned [`BoneBuffers`].
pub struct PoseComposer;

impl PoseComposer {
    /// `T(position) * R(rotation)`.
    #[inline]
    #[must_use]
    pub fn local_pose(position: Vec3, rotation: Quat) -> Mat4 {
        Mat4::from_rotation_translation(rotation, position)
    }

    /// Composes the pose into `buffers` for every geometry of `mesh`.
    ///
    /// `positions` and `rotations` are indexed by joint and must cover the skeleton.
    pub fn compose(
        mesh: &SkinnedMesh,
        positions: &[Vec3],
        rotations: &[Quat],
        buffers: &mut BoneBuffers,
    ) {
        let joint_count = mesh.joint_count();
        assert!(
            positions.len() >= joint_count && rotations.len() >= joint_count,
            "pose covers {}/{} joints, skeleton has {joint_count}",
            positions.len(),
            rotations.len()
        );
        assert_eq!(buffers.joint_count, joint_count, "bone buffers sized for another skeleton");
        assert_eq!(buffers.geometry_count, mesh.geometry_count(), "bone buffers sized for another mesh");

        let joints = mesh.skeleton().joints();

        for (geometry, bind) in mesh.geometries().iter().enumerate() {
            let base = geometry * joint_count;

            // Parents precede children, so model[parent] is already final here
            for joint in joints {
                let j = joint.index;
                let local_pose = Self::local_pose(positions[j], rotations[j]);
                let local = bind.bind_pose[j] * local_pose;

                let parent_model = joint
                    .parent
                    .map_or(Mat4::IDENTITY, |parent| buffers.model[base + parent]);
                let model = parent_model * local;
                let inverse_bind = bind.inverse_bind_pose[j];

                buffers.local[base + j] = local;
                buffers.model[base + j] = model;
                buffers.inverse_bind[base + j] = inverse_bind;
                buffers.skinning[base + j] = model * inverse_bind;
            }
        }
    }
}
