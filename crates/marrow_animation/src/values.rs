use glam::{Quat, Vec3};

/// A value a [`Channel`](crate::Channel) can blend between two keyframes.
///
/// `alpha` is not clamped here; callers clamp it, and out-of-range values
/// extrapolate along the same curve.
pub trait Interpolatable: Copy + Default {
    fn interpolate(from: &Self, to: &Self, alpha: f32) -> Self;
}

impl Interpolatable for f32 {
    #[inline]
    fn interpolate(from: &Self, to: &Self, alpha: f32) -> Self {
        from + (to - from) * alpha
    }
}

impl Interpolatable for Vec3 {
    #[inline]
    fn interpolate(from: &Self, to: &Self, alpha: f32) -> Self {
        from.lerp(*to, alpha)
    }
}

impl Interpolatable for Quat {
    /// Shortest-arc spherical interpolation.
    #[inline]
    fn interpolate(from: &Self, to: &Self, alpha: f32) -> Self {
        // q and -q encode the same rotation; pick the one on from's hemisphere
        let to = if from.dot(*to) < 0.0 { -*to } else { *to };
        from.slerp(to, alpha).normalize()
    }
}
