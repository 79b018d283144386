use std::sync::Arc;

use glam::{Quat, Vec3};
use marrow_core::{MarrowError, Result};

use crate::keyframes::KeyframeStore;

/// A named animation clip: one translation store and one rotation store per joint.
///
/// Loaded once and shared read-only by every instance that plays it.
#[derive(Debug, Clone)]
pub struct Sequence {
    name: String,
    duration_seconds: f32,
    frame_delay_seconds: f32,
    translations: Vec<Arc<KeyframeStore<Vec3>>>,
    rotations: Vec<Arc<KeyframeStore<Quat>>>,
}

impl Sequence {
    /// Builds a sequence from per-joint stores, indexed by joint.
    ///
    /// The clip duration is the longest of `duration_seconds` and every store's duration.
    pub fn new(
        name: impl Into<String>,
        frame_delay_seconds: f32,
        duration_seconds: f32,
        translations: Vec<KeyframeStore<Vec3>>,
        rotations: Vec<KeyframeStore<Quat>>,
    ) -> Result<Self> {
        let name = name.into();

        if translations.len() != rotations.len() {
            return Err(MarrowError::InvalidSequence {
                name,
                reason: format!(
                    "{} translation tracks but {} rotation tracks",
                    translations.len(),
                    rotations.len()
                ),
            });
        }

        let duration_seconds = translations
            .iter()
            .map(KeyframeStore::duration_seconds)
            .chain(rotations.iter().map(KeyframeStore::duration_seconds))
            .fold(duration_seconds.max(0.0), f32::max);

        Ok(Self {
            name,
            duration_seconds,
            frame_delay_seconds,
            translations: translations.into_iter().map(Arc::new).collect(),
            rotations: rotations.into_iter().map(Arc::new).collect(),
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.duration_seconds
    }

    #[inline]
    #[must_use]
    pub fn frame_delay_seconds(&self) -> f32 {
        self.frame_delay_seconds
    }

    /// Number of animated joints.
    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.translations.len()
    }

    #[inline]
    #[must_use]
    pub fn translation(&self, joint: usize) -> &Arc<KeyframeStore<Vec3>> {
        &self.translations[joint]
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self, joint: usize) -> &Arc<KeyframeStore<Quat>> {
        &self.rotations[joint]
    }

    #[inline]
    #[must_use]
    pub fn translations(&self) -> &[Arc<KeyframeStore<Vec3>>] {
        &self.translations
    }

    #[inline]
    #[must_use]
    pub fn rotations(&self) -> &[Arc<KeyframeStore<Quat>>] {
        &self.rotations
    }
}
