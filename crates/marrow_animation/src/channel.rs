use std::sync::Arc;

use crate::keyframes::KeyframeStore;
use crate::values::Interpolatable;

/// Stateful playback cursor over one [`KeyframeStore`].
///
/// A channel owns its output value. [`advance`](Self::advance) moves the
/// cursor through time and [`update`](Self::update) writes the interpolated
/// value for the current position. Playback always loops.
///
/// Invariants:
/// - `current_frame` stays within `[0, key_count - 1]`.
/// - `current_time_seconds` stays within `[0, loop_duration)` once the loop
///   duration is positive.
///
/// The loop duration defaults to the store's own duration. Channels playing
/// part of a [`Sequence`](crate::Sequence) loop at the clip's duration instead,
/// so every track of the clip wraps on the same tick.
#[derive(Debug, Clone)]
pub struct Channel<T: Interpolatable> {
    value: T,
    data_source: Option<Arc<KeyframeStore<T>>>,
    current_frame: usize,
    current_time_seconds: f32,
    frame_delay_seconds: f32,
    loop_duration_seconds: f32,
}

impl<T: Interpolatable> Default for Channel<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            data_source: None,
            current_frame: 0,
            current_time_seconds: 0.0,
            frame_delay_seconds: 0.0,
            loop_duration_seconds: 0.0,
        }
    }
}

impl<T: Interpolatable> Channel<T> {
    #[must_use]
    pub fn new(data_source: Arc<KeyframeStore<T>>, frame_delay_seconds: f32) -> Self {
        let loop_duration_seconds = data_source.duration_seconds();
        Self::with_loop_duration(data_source, frame_delay_seconds, loop_duration_seconds)
    }

    /// Binds `data_source` but wraps at `loop_duration_seconds` rather than the
    /// store's own length. A shorter store holds its last key until the loop ends.
    #[must_use]
    pub fn with_loop_duration(
        data_source: Arc<KeyframeStore<T>>,
        frame_delay_seconds: f32,
        loop_duration_seconds: f32,
    ) -> Self {
        Self {
            loop_duration_seconds: loop_duration_seconds.max(data_source.duration_seconds()),
            data_source: Some(data_source),
            frame_delay_seconds,
            ..Default::default()
        }
    }

    pub fn set_data_source(&mut self, data_source: Arc<KeyframeStore<T>>, frame_delay_seconds: f32) {
        self.loop_duration_seconds = data_source.duration_seconds();
        self.data_source = Some(data_source);
        self.frame_delay_seconds = frame_delay_seconds;
        self.reset();
    }

    #[inline]
    #[must_use]
    pub fn data_source(&self) -> Option<&Arc<KeyframeStore<T>>> {
        self.data_source.as_ref()
    }

    /// The last value written by [`update`](Self::update).
    #[inline]
    #[must_use]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[inline]
    #[must_use]
    pub fn current_time_seconds(&self) -> f32 {
        self.current_time_seconds
    }

    #[inline]
    #[must_use]
    pub fn frame_delay_seconds(&self) -> f32 {
        self.frame_delay_seconds
    }

    #[inline]
    #[must_use]
    pub fn loop_duration_seconds(&self) -> f32 {
        self.loop_duration_seconds
    }

    /// Rewinds to the first frame. The output value is left untouched until the next update.
    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.current_time_seconds = 0.0;
    }

    /// Moves the cursor forward by `delta_seconds`.
    ///
    /// Without a bound store, or with fewer than two keys, this is a no-op.
    /// A delta larger than the clip skips whole loops; intermediate keys are
    /// not observed.
    pub fn advance(&mut self, delta_seconds: f32) {
        let Some(store) = self.data_source.as_deref() else {
            return;
        };

        let key_count = store.len();
        if key_count < 2 {
            return;
        }

        self.current_time_seconds += delta_seconds;

        let duration = self.loop_duration_seconds;
        if duration > 0.0
            && (self.current_time_seconds >= duration || self.current_time_seconds < 0.0)
        {
            // Loop: wrap time into [0, duration) and rescan from the first frame
            self.current_time_seconds = self.current_time_seconds.rem_euclid(duration);
            if self.current_time_seconds >= duration {
                self.current_time_seconds = 0.0;
            }
            self.current_frame = 0;
        } else if self.current_time_seconds < store.time(self.current_frame) {
            self.current_frame = 0;
        }

        let last = key_count - 1;
        while self.current_frame < last
            && self.current_time_seconds >= store.time(self.current_frame + 1)
        {
            self.current_frame += 1;
        }
    }

    /// Writes the value interpolated between the current key and the next one.
    ///
    /// At the last key the "next" key is the last key itself (flat extrapolation).
    pub fn update(&mut self) {
        let Some(store) = self.data_source.as_deref() else {
            return;
        };

        if store.is_empty() {
            self.value = store.pre_infinity();
            return;
        }

        let last = store.len() - 1;
        let frame = self.current_frame.min(last);
        let next_frame = (frame + 1).min(last);

        let t0 = store.time(frame);
        let t1 = store.time(next_frame);
        let span = t1 - t0;

        let alpha = if span > f32::EPSILON {
            ((self.current_time_seconds - t0) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.value = T::interpolate(store.value(frame), store.value(next_frame), alpha);
    }
}
