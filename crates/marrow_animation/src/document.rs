//! Sequence Documents
//!
//! The serialized form of an animation clip, as written by the asset pipeline:
//!
//! ```json
//! {
//!     "name": "walk",
//!     "frames_per_second": 30,
//!     "duration_seconds": 1.0,
//!     "children": [
//!         {
//!             "name": "spine",
//!             "translation": { "value": [[0.0, 1.0, 0.0], [0.0, 1.1, 0.0]] },
//!             "rotation": { "value": [[0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.38, 0.92]] },
//!             "scale": { "value": [[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]] }
//!         }
//!     ]
//! }
//! ```
//!
//! Key times are not stored; key `i` of every track lands at `i / frames_per_second`.
//! Rotations are `[x, y, z, w]`. Scale tracks are accepted but not played.

use std::io::Read;

use glam::{Quat, Vec3};
use marrow_core::{MarrowError, Result};
use serde::{Deserialize, Serialize};

use crate::clip::Sequence;
use crate::keyframes::KeyframeStore;

/// Resolves bone names to joint indices while a sequence is being bound.
pub trait BoneResolver {
    fn joint_count(&self) -> usize;
    fn find_bone(&self, name: &str) -> Option<usize>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackValues<V> {
    #[serde(default)]
    pub value: Vec<V>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneTrackDocument {
    pub name: String,
    pub translation: TrackValues<[f32; 3]>,
    pub rotation: TrackValues<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<TrackValues<[f32; 3]>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceDocument {
    pub name: String,
    pub frames_per_second: u32,
    pub duration_seconds: f32,
    #[serde(default)]
    pub children: Vec<BoneTrackDocument>,
}

impl SequenceDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolves every bone track against `bones` and builds a [`Sequence`] called `name`.
    ///
    /// Joints without a track get empty stores, which evaluate to the identity pose.
    pub fn to_sequence(&self, name: &str, bones: &dyn BoneResolver) -> Result<Sequence> {
        if self.frames_per_second == 0 {
            return Err(MarrowError::InvalidSequence {
                name: name.to_string(),
                reason: "frames_per_second must be positive".to_string(),
            });
        }

        let frame_delay = 1.0 / self.frames_per_second as f32;
        let joint_count = bones.joint_count();

        let mut translations = vec![KeyframeStore::<Vec3>::empty(); joint_count];
        let mut rotations = vec![KeyframeStore::<Quat>::empty(); joint_count];
        let mut seen = vec![false; joint_count];

        for track in &self.children {
            let joint = bones
                .find_bone(&track.name)
                .ok_or_else(|| MarrowError::UnresolvedBone {
                    context: name.to_string(),
                    bone: track.name.clone(),
                })?;

            if seen[joint] {
                log::warn!(
                    "Sequence '{name}' has more than one track for bone '{}'; keeping the last",
                    track.name
                );
            }
            seen[joint] = true;

            let positions: Vec<Vec3> = track
                .translation
                .value
                .iter()
                .copied()
                .map(Vec3::from_array)
                .collect();
            let orientations: Vec<Quat> = track
                .rotation
                .value
                .iter()
                .copied()
                .map(quat_from_xyzw)
                .collect();

            translations[joint] =
                KeyframeStore::from_samples(&positions, frame_delay, self.duration_seconds);
            rotations[joint] =
                KeyframeStore::from_samples(&orientations, frame_delay, self.duration_seconds);
        }

        Sequence::new(
            name,
            frame_delay,
            self.duration_seconds,
            translations,
            rotations,
        )
    }
}

fn quat_from_xyzw(xyzw: [f32; 4]) -> Quat {
    let q = Quat::from_array(xyzw);
    if q.length_squared() > f32::EPSILON {
        q.normalize()
    } else {
        Quat::IDENTITY
    }
}
