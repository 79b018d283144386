//! Skeleton hierarchy, pose composition and per-model skinning state.

pub mod composer;
pub mod mesh;
pub mod model;
pub mod skeleton;

pub use composer::{BoneBuffers, PoseComposer};
pub use mesh::{Attachment, GeometryBind, SkinnedMesh};
pub use model::ModelInstanceData;
pub use skeleton::{Joint, Skeleton};
