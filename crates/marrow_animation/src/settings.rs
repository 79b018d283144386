//! Animation Settings
//!
//! Configuration consumed once by [`AnimationLibrary::new`](crate::AnimationLibrary::new).
//!
//! ```rust,ignore
//! use marrow::animation::{AnimationLibrary, AnimationSettings};
//!
//! let library = AnimationLibrary::new(AnimationSettings {
//!     sequence_root: "assets/animations".into(),
//!     ..Default::default()
//! });
//! ```

use std::path::PathBuf;

use marrow_core::MAX_BONES;

/// Global configuration for the animation library.
///
/// | Field                | Description                                   | Default       |
/// |----------------------|-----------------------------------------------|---------------|
/// | `max_bones`          | Joint ceiling for skeletons sequences bind to | `MAX_BONES`   |
/// | `sequence_root`      | Directory searched for sequence files         | `"."`         |
/// | `sequence_extension` | File extension of sequence documents          | `"animation"` |
#[derive(Debug, Clone)]
pub struct AnimationSettings {
    /// Sequences targeting a skeleton with more joints than this fail to load.
    pub max_bones: usize,

    /// Root directory for [`FileSequenceSource`](crate::FileSequenceSource).
    ///
    /// A sequence named `"walk"` resolves to `<sequence_root>/walk.<sequence_extension>`.
    pub sequence_root: PathBuf,

    /// Extension appended to sequence names, without the leading dot.
    pub sequence_extension: String,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            max_bones: MAX_BONES,
            sequence_root: PathBuf::from("."),
            sequence_extension: "animation".to_string(),
        }
    }
}
