use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::channel::Channel;
use crate::clip::Sequence;
use crate::pose::Pose;

/// Per-model playback state over a shared [`Sequence`].
///
/// Holds one translation channel and one rotation channel per animated joint.
/// The channels are owned exclusively; the sequence data is shared.
#[derive(Debug, Clone)]
pub struct AnimatedInstance {
    sequence: Arc<Sequence>,
    enabled: bool,
    started: bool,
    translation_channels: Vec<Channel<Vec3>>,
    rotation_channels: Vec<Channel<Quat>>,
}

impl AnimatedInstance {
    /// Binds one channel pair per joint of `sequence`, all looping at the clip duration.
    ///
    /// Nothing is sampled until [`reset_channels`](Self::reset_channels) or
    /// [`advance`](Self::advance) runs.
    #[must_use]
    pub fn new(sequence: Arc<Sequence>) -> Self {
        let frame_delay = sequence.frame_delay_seconds();
        let duration = sequence.duration_seconds();

        let translation_channels = sequence
            .translations()
            .iter()
            .map(|store| Channel::with_loop_duration(Arc::clone(store), frame_delay, duration))
            .collect();

        let rotation_channels = sequence
            .rotations()
            .iter()
            .map(|store| Channel::with_loop_duration(Arc::clone(store), frame_delay, duration))
            .collect();

        Self {
            sequence,
            enabled: true,
            started: false,
            translation_channels,
            rotation_channels,
        }
    }

    #[inline]
    #[must_use]
    pub fn sequence(&self) -> &Arc<Sequence> {
        &self.sequence
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.sequence.name()
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.sequence.duration_seconds()
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.translation_channels.len()
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled instances ignore [`advance`](Self::advance) and keep their last pose.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether any pose has been sampled yet.
    #[inline]
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Advances every channel by `delta_seconds` and samples it. O(joint count).
    pub fn advance(&mut self, delta_seconds: f32) {
        if !self.enabled {
            return;
        }
        self.step(delta_seconds);
    }

    /// Rewinds every channel to frame 0 and samples the first frame, even when disabled.
    pub fn reset_channels(&mut self) {
        for channel in &mut self.translation_channels {
            channel.reset();
        }
        for channel in &mut self.rotation_channels {
            channel.reset();
        }
        self.step(0.0);
    }

    fn step(&mut self, delta_seconds: f32) {
        for channel in &mut self.translation_channels {
            channel.advance(delta_seconds);
            channel.update();
        }
        for channel in &mut self.rotation_channels {
            channel.advance(delta_seconds);
            channel.update();
        }
        self.started = true;
    }

    #[inline]
    #[must_use]
    pub fn position(&self, joint: usize) -> Vec3 {
        self.translation_channels[joint].value()
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self, joint: usize) -> Quat {
        self.rotation_channels[joint].value()
    }

    #[inline]
    #[must_use]
    pub fn translation_channel(&self, joint: usize) -> &Channel<Vec3> {
        &self.translation_channels[joint]
    }

    #[inline]
    #[must_use]
    pub fn rotation_channel(&self, joint: usize) -> &Channel<Quat> {
        &self.rotation_channels[joint]
    }

    /// Copies the current pose into the output slices.
    ///
    /// Copies `min(joint_count, output length)` joints; extra output entries are untouched.
    pub fn get_pose(&self, positions: &mut [Vec3], rotations: &mut [Quat]) {
        debug_assert!(self.started, "pose read from an instance that was never sampled");

        for (out, channel) in positions.iter_mut().zip(&self.translation_channels) {
            *out = channel.value();
        }
        for (out, channel) in rotations.iter_mut().zip(&self.rotation_channels) {
            *out = channel.value();
        }
    }

    /// Writes the current pose into `pose`, resizing it to the joint count.
    pub fn write_pose(&self, pose: &mut Pose) {
        pose.resize(self.joint_count());
        self.get_pose(&mut pose.positions, &mut pose.rotations);
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        let mut pose = Pose::identity(self.joint_count());
        self.write_pose(&mut pose);
        pose
    }
}
