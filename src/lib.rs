//! # Marrow
//!
//! Skeletal animation playback and pose composition for real-time 3D.
//!
//! The engine is split into focused crates; this umbrella crate re-exports
//! them under one roof:
//!
//! | Module        | Crate              | Contents                                      |
//! |---------------|--------------------|-----------------------------------------------|
//! | [`errors`]    | `marrow_core`      | [`MarrowError`], [`Result`], [`MAX_BONES`]    |
//! | [`animation`] | `marrow_animation` | keyframes, channels, sequences, the pool      |
//! | [`scene`]     | `marrow_scene`     | skeletons, bind data, composer, model state   |
//!
//! ```rust,ignore
//! use marrow::prelude::*;
//!
//! let mut library = AnimationLibrary::new(AnimationSettings::default());
//! let mut model = ModelInstanceData::new(mesh);
//! model.create_bones();
//! model.add_animation(&mut library, "walk");
//!
//! library.update(dt);
//! model.update_pose(&library);
//! upload(model.skinning_bytes(0));
//! ```

pub use marrow_animation as animation;
pub use marrow_core::errors;
pub use marrow_scene as scene;

pub use marrow_core::{MAX_BONES, MarrowError, Result};

pub use animation::{
    AnimatedInstance, AnimationHandle, AnimationLibrary, AnimationSettings, Channel,
    KeyframeStore, Sequence, SequenceDocument,
};
pub use scene::{BoneBuffers, ModelInstanceData, PoseComposer, Skeleton, SkinnedMesh};

pub mod prelude {
    pub use crate::animation::{
        AnimatedInstance, AnimationHandle, AnimationLibrary, AnimationSettings, BoneResolver,
        Keyframe, KeyframeStore, MemorySequenceSource, Pose, Sequence, SequenceDocument,
        SequenceSource,
    };
    pub use crate::scene::{
        GeometryBind, Joint, ModelInstanceData, PoseComposer, Skeleton, SkinnedMesh,
    };
    pub use crate::{MAX_BONES, MarrowError, Result};
    pub use glam::{Mat4, Quat, Vec3};
}
