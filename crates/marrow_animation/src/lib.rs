//! Keyframe playback for skeletal animation.
//!
//! Data flows leaves-first:
//!
//! - [`KeyframeStore`]: immutable, time-ordered samples for one joint property.
//! - [`Channel`]: a stateful cursor over one store, advanced by wall time.
//! - [`Sequence`]: a named clip holding one translation and one rotation store per joint.
//! - [`AnimatedInstance`]: per-model playback state over a shared [`Sequence`].
//! - [`AnimationLibrary`]: the sequence cache plus the generational instance pool.

pub mod channel;
pub mod clip;
pub mod document;
pub mod instance;
pub mod keyframes;
pub mod library;
pub mod pose;
pub mod settings;
pub mod source;
pub mod values;

pub use channel::Channel;
pub use clip::Sequence;
pub use document::{BoneResolver, BoneTrackDocument, SequenceDocument, TrackValues};
pub use instance::AnimatedInstance;
pub use keyframes::{Keyframe, KeyframeStore};
pub use library::{AnimationHandle, AnimationLibrary, SequenceKey};
pub use pose::Pose;
pub use settings::AnimationSettings;
pub use source::{FileSequenceSource, MemorySequenceSource, SequenceSource};
pub use values::Interpolatable;
