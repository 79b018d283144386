//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`MarrowError`] covers every load-time failure mode:
//! - Missing or malformed animation sequences
//! - Bone names that do not resolve against a skeleton
//! - Skeletons that break the joint ordering or the bone ceiling
//! - Skinned geometry without bind-pose data
//!
//! Runtime sampling never fails; numeric edge cases are resolved by clamping.
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`] which is an alias for `std::result::Result<T, MarrowError>`.
//!
//! ```rust,ignore
//! use marrow::errors::{MarrowError, Result};
//!
//! fn load_clip() -> Result<()> {
//!     Err(MarrowError::SequenceNotFound("walk".into()))
//! }
//! ```

use thiserror::Error;

/// The main error type for the Marrow engine.
#[derive(Error, Debug)]
pub enum MarrowError {
    // ========================================================================
    // Sequence Loading Errors
    // ========================================================================
    /// No source could provide a sequence with this name.
    #[error("Animation sequence not found: {0}")]
    SequenceNotFound(String),

    /// A sequence track or mesh attachment names a bone the skeleton does not have.
    #[error("'{context}' references unknown bone '{bone}'")]
    UnresolvedBone {
        /// Sequence or attachment being resolved
        context: String,
        /// The bone name that failed to resolve
        bone: String,
    },

    /// The sequence document is structurally invalid.
    #[error("Invalid animation sequence '{name}': {reason}")]
    InvalidSequence {
        /// Sequence being loaded
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// Keyframe times are not in ascending order.
    #[error("Keyframe {index} is earlier than the key before it")]
    UnorderedKeyframes {
        /// First key that breaks the ordering
        index: usize,
    },

    /// An animation instance handle no longer refers to a live instance.
    #[error("Animation instance handle is stale or was never issued")]
    StaleHandle,

    // ========================================================================
    // Skeleton & Skinning Errors
    // ========================================================================
    /// The skeleton declares more joints than the configured ceiling.
    #[error("Skeleton has {count} joints, limit is {max}")]
    BoneLimitExceeded {
        /// Number of joints declared
        count: usize,
        /// The ceiling in effect
        max: usize,
    },

    /// A joint's parent does not precede it in the joint array.
    #[error("Joint {joint} has parent {parent}; parents must precede their children")]
    InvalidJointOrder {
        /// Offending joint index
        joint: usize,
        /// Its declared parent index
        parent: usize,
    },

    /// A joint's stored index disagrees with its array position.
    #[error("Joint at position {position} declares index {index}")]
    JointIndexMismatch {
        /// Position in the joint array
        position: usize,
        /// Index the joint claims
        index: usize,
    },

    /// A skinned geometry is missing bind-pose data for some joints.
    #[error("Geometry {geometry} has {found} bind matrices, skeleton needs {expected}")]
    MissingBindData {
        /// Geometry index within the mesh
        geometry: usize,
        /// Joint count of the skeleton
        expected: usize,
        /// Matrices actually supplied
        found: usize,
    },

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, MarrowError>`.
pub type Result<T> = std::result::Result<T, MarrowError>;
