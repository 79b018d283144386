use marrow_core::{MarrowError, Result};

use crate::values::Interpolatable;

/// A single `(time, value)` sample on an animation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub time_seconds: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    #[inline]
    #[must_use]
    pub fn new(time_seconds: f32, value: T) -> Self {
        Self {
            time_seconds,
            value,
        }
    }
}

/// Immutable, time-ordered keyframes for one property of one joint.
///
/// Outside the keyed range the store clamps to its boundary values
/// (`pre_infinity` before the first key, `post_infinity` after the last).
/// An empty store is valid and evaluates to `T::default()`.
#[derive(Debug, Clone)]
pub struct KeyframeStore<T: Interpolatable> {
    keys: Vec<Keyframe<T>>,
    duration_seconds: f32,
    pre_infinity: T,
    post_infinity: T,
}

impl<T: Interpolatable> Default for KeyframeStore<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Interpolatable> KeyframeStore<T> {
    /// Builds a store from explicit keys.
    ///
    /// The duration is the larger of `duration_seconds` and the last key time.
    pub fn new(keys: Vec<Keyframe<T>>, duration_seconds: f32) -> Result<Self> {
        if let Some(index) = keys
            .windows(2)
            .position(|pair| pair[1].time_seconds < pair[0].time_seconds)
        {
            return Err(MarrowError::UnorderedKeyframes { index: index + 1 });
        }

        let last_time = keys.last().map_or(0.0, |k| k.time_seconds);
        let pre_infinity = keys.first().map_or_else(T::default, |k| k.value);
        let post_infinity = keys.last().map_or_else(T::default, |k| k.value);

        Ok(Self {
            keys,
            duration_seconds: duration_seconds.max(last_time),
            pre_infinity,
            post_infinity,
        })
    }

    /// Builds a store from evenly sampled values, key `i` landing at `i * frame_delay_seconds`.
    #[must_use]
    pub fn from_samples(values: &[T], frame_delay_seconds: f32, duration_seconds: f32) -> Self {
        let frame_delay_seconds = frame_delay_seconds.max(0.0);
        let keys: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(index, value)| Keyframe::new(frame_delay_seconds * index as f32, *value))
            .collect();

        let last_time = keys.last().map_or(0.0, |k| k.time_seconds);
        Self {
            pre_infinity: values.first().copied().unwrap_or_default(),
            post_infinity: values.last().copied().unwrap_or_default(),
            keys,
            duration_seconds: duration_seconds.max(last_time),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            keys: Vec::new(),
            duration_seconds: 0.0,
            pre_infinity: T::default(),
            post_infinity: T::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    #[inline]
    #[must_use]
    pub fn time(&self, index: usize) -> f32 {
        self.keys[index].time_seconds
    }

    #[inline]
    #[must_use]
    pub fn value(&self, index: usize) -> &T {
        &self.keys[index].value
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.duration_seconds
    }

    #[inline]
    #[must_use]
    pub fn pre_infinity(&self) -> T {
        self.pre_infinity
    }

    #[inline]
    #[must_use]
    pub fn post_infinity(&self) -> T {
        self.post_infinity
    }

    /// Stateless evaluation at an absolute time, without wrapping.
    ///
    /// Used by tools and debug views; playback goes through [`Channel`](crate::Channel).
    #[must_use]
    pub fn sample(&self, time_seconds: f32) -> T {
        let Some(first) = self.keys.first() else {
            return T::default();
        };

        if time_seconds <= first.time_seconds {
            return self.pre_infinity;
        }

        // partition_point finds the first key strictly after `time`, i.e. the next key
        let next = self.keys.partition_point(|k| k.time_seconds <= time_seconds);
        if next >= self.keys.len() {
            return self.post_infinity;
        }

        let prev = next - 1;
        let t0 = self.keys[prev].time_seconds;
        let t1 = self.keys[next].time_seconds;
        let span = t1 - t0;
        let alpha = if span > f32::EPSILON {
            ((time_seconds - t0) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        T::interpolate(&self.keys[prev].value, &self.keys[next].value, alpha)
    }
}
