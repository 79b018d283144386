//! Model Instance Data
//!
//! Per-entity animation state for one model: the animations attached to it,
//! its bone buffers, and its overall placement transform.
//!
//! # Frame Flow
//!
//! ```rust,ignore
//! // 1. Advance every live instance once
//! library.update(delta_seconds);
//! // 2. Fetch the active animation's pose and compose it
//! model.update_pose(&library);
//! // 3. Hand the results to the renderer
//! let matrices = model.skinning_transforms(geometry);
//! ```
//!
//! Animated instances live in the [`AnimationLibrary`] pool; the model keeps
//! their handles and is the only code that releases them.
//!
//! Load failures (unknown clip, unresolved bone) come back as `None` plus a
//! logged warning. Out-of-range animation or bone indices are caller bugs and panic.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use marrow_animation::{AnimatedInstance, AnimationHandle, AnimationLibrary, Pose};
use smallvec::SmallVec;

use crate::composer::{BoneBuffers, PoseComposer};
use crate::mesh::SkinnedMesh;

pub struct ModelInstanceData {
    mesh: Arc<SkinnedMesh>,
    transform: Mat4,
    bones: Option<BoneBuffers>,
    animations: SmallVec<[AnimationHandle; 4]>,
    active_animation: Option<usize>,
    scratch_pose: Pose,
}

impl ModelInstanceData {
    /// Bone buffers are not allocated until [`create_bones`](Self::create_bones).
    #[must_use]
    pub fn new(mesh: Arc<SkinnedMesh>) -> Self {
        let joint_count = mesh.joint_count();
        Self {
            mesh,
            transform: Mat4::IDENTITY,
            bones: None,
            animations: SmallVec::new(),
            active_animation: None,
            scratch_pose: Pose::identity(joint_count),
        }
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self) -> &Arc<SkinnedMesh> {
        &self.mesh
    }

    // ========================================================================
    // Placement
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn local_transform(&self) -> &Mat4 {
        &self.transform
    }

    #[inline]
    pub fn set_local_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    // ========================================================================
    // Bone Buffers
    // ========================================================================

    /// Allocates the bone buffers and fills them with the bind pose.
    ///
    /// Does nothing for meshes without skeletal support, or when the buffers
    /// already exist.
    pub fn create_bones(&mut self) {
        if !self.mesh.is_skinned() {
            log::debug!("create_bones called on a mesh without a skeleton; ignored");
            return;
        }
        if self.bones.is_some() {
            return;
        }

        let mut bones = BoneBuffers::new(self.mesh.geometry_count(), self.mesh.joint_count());
        let rest = Pose::identity(self.mesh.joint_count());
        PoseComposer::compose(&self.mesh, &rest.positions, &rest.rotations, &mut bones);
        self.bones = Some(bones);
    }

    pub fn destroy_bones(&mut self) {
        self.bones = None;
    }

    #[inline]
    #[must_use]
    pub fn has_bones(&self) -> bool {
        self.bones.is_some()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> Option<&BoneBuffers> {
        self.bones.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn total_bones(&self) -> usize {
        self.mesh.joint_count()
    }

    /// Matrices per geometry in each bone buffer.
    #[inline]
    #[must_use]
    pub fn total_transforms(&self) -> usize {
        self.bones.as_ref().map_or(0, BoneBuffers::joint_count)
    }

    #[inline]
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.mesh.geometry_count()
    }

    #[must_use]
    pub fn find_bone_named(&self, name: &str) -> Option<usize> {
        self.mesh.skeleton().find_bone_named(name)
    }

    #[must_use]
    pub fn find_attachment(&self, name: &str) -> Option<usize> {
        self.mesh.find_attachment(name)
    }

    fn buffer(&self, select: fn(&BoneBuffers, usize) -> &[Mat4], geometry: usize) -> &[Mat4] {
        match &self.bones {
            Some(bones) => select(bones, geometry),
            None => &[],
        }
    }

    /// Empty when bones were never created.
    #[must_use]
    pub fn local_bone_transforms(&self, geometry: usize) -> &[Mat4] {
        self.buffer(BoneBuffers::local, geometry)
    }

    #[must_use]
    pub fn model_bone_transforms(&self, geometry: usize) -> &[Mat4] {
        self.buffer(BoneBuffers::model, geometry)
    }

    #[must_use]
    pub fn inverse_bind_transforms(&self, geometry: usize) -> &[Mat4] {
        self.buffer(BoneBuffers::inverse_bind, geometry)
    }

    /// Final skinning matrices (`model * inverse_bind`) for `geometry`.
    #[must_use]
    pub fn skinning_transforms(&self, geometry: usize) -> &[Mat4] {
        self.buffer(BoneBuffers::skinning, geometry)
    }

    /// [`skinning_transforms`](Self::skinning_transforms) as raw bytes for buffer upload.
    #[must_use]
    pub fn skinning_bytes(&self, geometry: usize) -> &[u8] {
        bytemuck::cast_slice(self.skinning_transforms(geometry))
    }

    // ========================================================================
    // Animations
    // ========================================================================

    /// Loads the sequence called `name` (or reuses the cached one) and attaches
    /// a new instance of it. Returns the new animation index, which also
    /// becomes the active animation.
    ///
    /// Calling this twice with the same name attaches two independent instances.
    pub fn add_animation(&mut self, library: &mut AnimationLibrary, name: &str) -> Option<usize> {
        let key = match library.load_sequence(name, self.mesh.skeleton()) {
            Ok(key) => key,
            Err(err) => {
                log::warn!("Unable to add animation '{name}': {err}");
                return None;
            }
        };

        let handle = match library.create_instance(key) {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("Unable to instance animation '{name}': {err}");
                return None;
            }
        };

        self.animations.push(handle);
        let index = self.animations.len() - 1;
        self.active_animation = Some(index);
        Some(index)
    }

    /// Case-insensitive lookup of an attached animation by sequence name.
    #[must_use]
    pub fn get_animation_index(&self, library: &AnimationLibrary, name: &str) -> Option<usize> {
        self.animations.iter().position(|&handle| {
            library
                .instance(handle)
                .is_some_and(|instance| instance.name().eq_ignore_ascii_case(name))
        })
    }

    #[inline]
    #[must_use]
    pub fn total_animations(&self) -> usize {
        self.animations.len()
    }

    #[must_use]
    pub fn animation_handle(&self, index: usize) -> AnimationHandle {
        self.animations[index]
    }

    fn instance<'a>(
        &self,
        library: &'a AnimationLibrary,
        index: usize,
    ) -> Option<&'a AnimatedInstance> {
        let handle = self.animations[index];
        let instance = library.instance(handle);
        if instance.is_none() {
            log::warn!("Animation {index} refers to a released instance");
        }
        instance
    }

    fn instance_mut<'a>(
        &self,
        library: &'a mut AnimationLibrary,
        index: usize,
    ) -> Option<&'a mut AnimatedInstance> {
        let handle = self.animations[index];
        let instance = library.instance_mut(handle);
        if instance.is_none() {
            log::warn!("Animation {index} refers to a released instance");
        }
        instance
    }

    pub fn set_animation_enabled(
        &self,
        library: &mut AnimationLibrary,
        index: usize,
        enabled: bool,
    ) {
        if let Some(instance) = self.instance_mut(library, index) {
            instance.set_enabled(enabled);
        }
    }

    #[must_use]
    pub fn is_animation_enabled(&self, library: &AnimationLibrary, index: usize) -> bool {
        self.instance(library, index)
            .is_some_and(AnimatedInstance::is_enabled)
    }

    /// Clip length in seconds; zero for a released instance.
    #[must_use]
    pub fn get_animation_duration(&self, library: &AnimationLibrary, index: usize) -> f32 {
        self.instance(library, index)
            .map_or(0.0, AnimatedInstance::duration_seconds)
    }

    /// Rewinds the animation to its first frame and samples it.
    pub fn reset_channels(&self, library: &mut AnimationLibrary, index: usize) {
        if let Some(instance) = self.instance_mut(library, index) {
            instance.reset_channels();
        }
    }

    /// Copies the animation's current interpolated pose into the output slices.
    pub fn get_animation_pose(
        &self,
        library: &AnimationLibrary,
        index: usize,
        positions: &mut [Vec3],
        rotations: &mut [Quat],
    ) {
        if let Some(instance) = self.instance(library, index) {
            instance.get_pose(positions, rotations);
        }
    }

    #[inline]
    #[must_use]
    pub fn active_animation(&self) -> Option<usize> {
        self.active_animation
    }

    /// Selects which animation [`update_pose`](Self::update_pose) composes.
    pub fn set_active_animation(&mut self, index: Option<usize>) {
        if let Some(index) = index {
            assert!(
                index < self.animations.len(),
                "animation index {index} out of range ({} attached)",
                self.animations.len()
            );
        }
        self.active_animation = index;
    }

    // ========================================================================
    // Pose
    // ========================================================================

    /// Composes a local pose into the bone buffers of every geometry.
    pub fn set_pose(&mut self, positions: &[Vec3], rotations: &[Quat]) {
        let Some(bones) = self.bones.as_mut() else {
            log::warn!("set_pose called before create_bones; pose dropped");
            return;
        };
        PoseComposer::compose(&self.mesh, positions, rotations, bones);
    }

    /// Fetches the active animation's pose and composes it.
    ///
    /// Joints the clip does not animate keep the identity pose.
    pub fn update_pose(&mut self, library: &AnimationLibrary) {
        let Some(index) = self.active_animation else {
            return;
        };
        if self.bones.is_none() {
            return;
        }

        let Some(instance) = self.instance(library, index) else {
            return;
        };

        let joint_count = self.mesh.joint_count();
        let mut pose = std::mem::replace(&mut self.scratch_pose, Pose::identity(0));
        pose.positions.clear();
        pose.rotations.clear();
        pose.resize(joint_count);
        instance.get_pose(&mut pose.positions, &mut pose.rotations);

        self.set_pose(&pose.positions, &pose.rotations);
        self.scratch_pose = pose;
    }

    /// Decomposes bone `bone_index`'s parent-relative transform (first geometry).
    #[must_use]
    pub fn get_local_bone_pose(&self, bone_index: usize) -> (Vec3, Quat) {
        decompose(self.bone_matrix(bone_index, BoneBuffers::local))
    }

    /// Decomposes bone `bone_index`'s model-space transform (first geometry).
    #[must_use]
    pub fn get_model_bone_pose(&self, bone_index: usize) -> (Vec3, Quat) {
        decompose(self.bone_matrix(bone_index, BoneBuffers::model))
    }

    fn bone_matrix(&self, bone_index: usize, buffer: fn(&BoneBuffers, usize) -> &[Mat4]) -> Mat4 {
        let joint_count = self.mesh.joint_count();
        assert!(
            bone_index < joint_count,
            "bone index {bone_index} out of range ({joint_count} bones)"
        );
        let bones = self
            .bones
            .as_ref()
            .unwrap_or_else(|| panic!("bone pose queried before create_bones"));
        buffer(bones, 0)[bone_index]
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Destroys every attached instance and frees the bone buffers.
    pub fn release(&mut self, library: &mut AnimationLibrary) {
        for handle in self.animations.drain(..) {
            library.destroy_instance(handle);
        }
        self.active_animation = None;
        self.destroy_bones();
    }
}

fn decompose(matrix: Mat4) -> (Vec3, Quat) {
    let (_scale, rotation, translation) = matrix.to_scale_rotation_translation();
    (translation, rotation)
}
