use glam::Mat4;
use marrow_core::{MarrowError, Result};

use crate::skeleton::Skeleton;

/// Bind data for one geometry rigged to the shared skeleton.
///
/// `bind_pose[j]` is joint `j`'s rest transform relative to its parent;
/// `inverse_bind_pose[j]` maps a bind-time vertex into joint `j`'s space.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBind {
    pub bind_pose: Vec<Mat4>,
    pub inverse_bind_pose: Vec<Mat4>,
}

impl GeometryBind {
    #[must_use]
    pub fn new(bind_pose: Vec<Mat4>, inverse_bind_pose: Vec<Mat4>) -> Self {
        Self {
            bind_pose,
            inverse_bind_pose,
        }
    }

    /// Derives the inverse bind matrices from parent-relative rest transforms
    /// by chaining them down the hierarchy and inverting the result.
    ///
    /// `bind_pose` must hold one matrix per joint of `skeleton`.
    #[must_use]
    pub fn from_rest_pose(skeleton: &Skeleton, bind_pose: Vec<Mat4>) -> Self {
        let mut model = vec![Mat4::IDENTITY; bind_pose.len()];
        for joint in skeleton.joints() {
            let parent = joint.parent.map_or(Mat4::IDENTITY, |p| model[p]);
            model[joint.index] = parent * bind_pose[joint.index];
        }

        let inverse_bind_pose = model.iter().map(Mat4::inverse).collect();
        Self::new(bind_pose, inverse_bind_pose)
    }
}

/// A named mount point on a bone (weapon hand, muzzle, camera anchor, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bone_index: usize,
}

/// The skinning-related part of a loaded mesh: one skeleton shared by every
/// geometry, plus per-geometry bind data.
#[derive(Debug, Clone, Default)]
pub struct SkinnedMesh {
    skeleton: Skeleton,
    geometries: Vec<GeometryBind>,
    attachments: Vec<Attachment>,
}

impl SkinnedMesh {
    /// Rejects any geometry whose bind data does not cover every joint.
    pub fn new(skeleton: Skeleton, geometries: Vec<GeometryBind>) -> Result<Self> {
        let expected = skeleton.len();
        for (geometry, bind) in geometries.iter().enumerate() {
            let found = bind.bind_pose.len().min(bind.inverse_bind_pose.len());
            if bind.bind_pose.len() != expected || bind.inverse_bind_pose.len() != expected {
                return Err(MarrowError::MissingBindData {
                    geometry,
                    expected,
                    found,
                });
            }
        }

        Ok(Self {
            skeleton,
            geometries,
            attachments: Vec::new(),
        })
    }

    /// A mesh with no skeleton; models using it never allocate bone buffers.
    #[must_use]
    pub fn rigid() -> Self {
        Self::default()
    }

    /// Mounts `name` on the bone called `bone_name`.
    pub fn add_attachment(&mut self, name: impl Into<String>, bone_name: &str) -> Result<()> {
        let name = name.into();
        let bone_index =
            self.skeleton
                .find_bone_named(bone_name)
                .ok_or_else(|| MarrowError::UnresolvedBone {
                    context: name.clone(),
                    bone: bone_name.to_string(),
                })?;

        self.attachments.push(Attachment { name, bone_index });
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn geometries(&self) -> &[GeometryBind] {
        &self.geometries
    }

    #[inline]
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.skeleton.len()
    }

    /// Whether this mesh declares skeletal support.
    #[inline]
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        !self.skeleton.is_empty() && !self.geometries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    #[must_use]
    pub fn find_attachment(&self, name: &str) -> Option<usize> {
        self.attachments
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.bone_index)
    }
}
