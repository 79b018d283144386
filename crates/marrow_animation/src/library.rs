//! Animation Library
//!
//! Owns every loaded [`Sequence`] and every live [`AnimatedInstance`].
//!
//! - Sequences are cached by name and skeleton binding: loading the same clip
//!   for the same skeleton twice returns the same [`SequenceKey`], and all
//!   instances share its keyframe data. A skeleton that resolves the clip's
//!   bones to different joints gets its own binding of the clip.
//! - Instances live in a generational slot pool. An [`AnimationHandle`] is an
//!   opaque `(index, generation)` pair, so a handle that outlives its instance
//!   resolves to `None` instead of aliasing a newer one.
//!
//! The library is single-threaded. A host that ticks animation from several
//! threads must put its own lock around it.

use std::sync::Arc;

use marrow_core::{MarrowError, Result};
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::clip::Sequence;
use crate::document::{BoneResolver, SequenceDocument};
use crate::instance::AnimatedInstance;
use crate::settings::AnimationSettings;
use crate::source::{FileSequenceSource, SequenceSource};

new_key_type! {
    /// Identifies a loaded sequence.
    pub struct SequenceKey;

    /// Identifies a live animated instance in the pool.
    pub struct AnimationHandle;
}

/// The skeleton a cached sequence was bound to.
#[derive(Debug, Clone, PartialEq)]
struct SequenceBinding {
    joint_count: usize,
    /// Track bone name and the joint it resolved to.
    bones: Vec<(String, usize)>,
}

impl SequenceBinding {
    fn capture(document: &SequenceDocument, bones: &dyn BoneResolver) -> Self {
        Self {
            joint_count: bones.joint_count(),
            bones: document
                .children
                .iter()
                .filter_map(|track| Some((track.name.clone(), bones.find_bone(&track.name)?)))
                .collect(),
        }
    }

    fn matches(&self, bones: &dyn BoneResolver) -> bool {
        self.joint_count == bones.joint_count()
            && self
                .bones
                .iter()
                .all(|(name, joint)| bones.find_bone(name) == Some(*joint))
    }
}

#[derive(Debug, Clone)]
struct CachedSequence {
    key: SequenceKey,
    /// `None` for registered sequences, which match any skeleton of their joint count.
    binding: Option<SequenceBinding>,
}

pub struct AnimationLibrary {
    settings: AnimationSettings,
    // Searched front to back
    sources: Vec<Box<dyn SequenceSource>>,
    sequences: SlotMap<SequenceKey, Arc<Sequence>>,
    sequences_by_name: FxHashMap<String, Vec<CachedSequence>>,
    instances: SlotMap<AnimationHandle, AnimatedInstance>,
}

impl std::fmt::Debug for AnimationLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationLibrary")
            .field("settings", &self.settings)
            .field("source_count", &self.sources.len())
            .field("sequence_count", &self.sequences.len())
            .field("instance_count", &self.instances.len())
            .finish_non_exhaustive()
    }
}

impl Default for AnimationLibrary {
    fn default() -> Self {
        Self::new(AnimationSettings::default())
    }
}

impl AnimationLibrary {
    /// Creates a library that reads sequences from `settings.sequence_root`.
    #[must_use]
    pub fn new(settings: AnimationSettings) -> Self {
        let file_source = FileSequenceSource::from_settings(&settings);
        let mut library = Self::without_sources(settings);
        library.sources.push(Box::new(file_source));
        library
    }

    /// Creates a library with no sequence sources; clips must be registered or
    /// provided through [`add_source`](Self::add_source).
    #[must_use]
    pub fn without_sources(settings: AnimationSettings) -> Self {
        Self {
            settings,
            sources: Vec::new(),
            sequences: SlotMap::with_key(),
            sequences_by_name: FxHashMap::default(),
            instances: SlotMap::with_key(),
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    /// Adds a source that is searched before every existing one.
    pub fn add_source(&mut self, source: impl SequenceSource + 'static) {
        self.sources.insert(0, Box::new(source));
    }

    // ========================================================================
    // Sequences
    // ========================================================================

    /// Adds a pre-built sequence under its own name, replacing any earlier
    /// sequence with that name for future lookups.
    pub fn register_sequence(&mut self, sequence: Sequence) -> SequenceKey {
        let name = sequence.name().to_string();
        let key = self.sequences.insert(Arc::new(sequence));
        let entry = CachedSequence { key, binding: None };
        if self
            .sequences_by_name
            .insert(name.clone(), vec![entry])
            .is_some()
        {
            log::warn!("Sequence '{name}' registered twice; the newer clip wins");
        }
        key
    }

    /// Returns the sequence called `name` bound to `bones`, loading it on first use.
    ///
    /// The cached binding is reused only when `bones` resolves every track to
    /// the same joint; otherwise the clip is loaded again for this skeleton.
    pub fn load_sequence(&mut self, name: &str, bones: &dyn BoneResolver) -> Result<SequenceKey> {
        if bones.joint_count() > self.settings.max_bones {
            return Err(MarrowError::BoneLimitExceeded {
                count: bones.joint_count(),
                max: self.settings.max_bones,
            });
        }

        if let Some(key) = self.cached_sequence(name, bones) {
            return Ok(key);
        }

        let document = self.fetch_document(name)?;
        let sequence = document.to_sequence(name, bones)?;
        let binding = SequenceBinding::capture(&document, bones);

        log::debug!(
            "Loaded animation '{name}' ('{}'): {} joints, {:.3}s @ {} fps",
            document.name,
            sequence.joint_count(),
            sequence.duration_seconds(),
            document.frames_per_second
        );

        let key = self.sequences.insert(Arc::new(sequence));
        let entries = self.sequences_by_name.entry(name.to_string()).or_default();
        if !entries.is_empty() {
            log::debug!("Animation '{name}' rebound for a skeleton with different bone indices");
        }
        entries.push(CachedSequence {
            key,
            binding: Some(binding),
        });
        Ok(key)
    }

    fn cached_sequence(&self, name: &str, bones: &dyn BoneResolver) -> Option<SequenceKey> {
        self.sequences_by_name
            .get(name)?
            .iter()
            .find(|entry| match &entry.binding {
                Some(binding) => binding.matches(bones),
                None => self
                    .sequences
                    .get(entry.key)
                    .is_some_and(|sequence| sequence.joint_count() == bones.joint_count()),
            })
            .map(|entry| entry.key)
    }

    fn fetch_document(&self, name: &str) -> Result<SequenceDocument> {
        for source in &self.sources {
            match source.load(name) {
                Ok(document) => return Ok(document),
                Err(MarrowError::SequenceNotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Err(MarrowError::SequenceNotFound(name.to_string()))
    }

    /// The first sequence cached under `name`, whatever skeleton it was bound to.
    #[must_use]
    pub fn find_sequence(&self, name: &str) -> Option<SequenceKey> {
        self.sequences_by_name
            .get(name)
            .and_then(|entries| entries.first())
            .map(|entry| entry.key)
    }

    #[must_use]
    pub fn sequence(&self, key: SequenceKey) -> Option<&Arc<Sequence>> {
        self.sequences.get(key)
    }

    #[inline]
    #[must_use]
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Creates a new instance playing `key`, sampled at time zero.
    pub fn create_instance(&mut self, key: SequenceKey) -> Result<AnimationHandle> {
        let sequence = self
            .sequences
            .get(key)
            .cloned()
            .ok_or_else(|| MarrowError::SequenceNotFound(format!("{key:?}")))?;

        let mut instance = AnimatedInstance::new(sequence);
        instance.reset_channels();
        Ok(self.instances.insert(instance))
    }

    /// Releases an instance. Its handle, and any copy of it, goes stale.
    pub fn destroy_instance(&mut self, handle: AnimationHandle) -> Option<AnimatedInstance> {
        self.instances.remove(handle)
    }

    #[inline]
    #[must_use]
    pub fn instance(&self, handle: AnimationHandle) -> Option<&AnimatedInstance> {
        self.instances.get(handle)
    }

    #[inline]
    pub fn instance_mut(&mut self, handle: AnimationHandle) -> Option<&mut AnimatedInstance> {
        self.instances.get_mut(handle)
    }

    pub fn try_instance_mut(&mut self, handle: AnimationHandle) -> Result<&mut AnimatedInstance> {
        self.instances
            .get_mut(handle)
            .ok_or(MarrowError::StaleHandle)
    }

    #[inline]
    #[must_use]
    pub fn contains_instance(&self, handle: AnimationHandle) -> bool {
        self.instances.contains_key(handle)
    }

    #[inline]
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Advances every live instance by `delta_seconds`. Disabled instances are skipped.
    pub fn update(&mut self, delta_seconds: f32) {
        for (_handle, instance) in &mut self.instances {
            instance.advance(delta_seconds);
        }
    }
}
