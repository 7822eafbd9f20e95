/*
 * Vector Module
 *
 * The simulation core works in f64 on top of glam's DVec2. This module adds
 * the two helpers the steering rules lean on: a normalization that tolerates
 * zero-length input and a magnitude clamp used for both forces and speed.
 */

pub use glam::DVec2 as Vec2;

// Vectors shorter than this normalize to zero instead of dividing by ~0
pub const NORMALIZE_EPSILON: f64 = 1e-5;

pub trait SteeringVector: Sized {
    /// Unit vector in the same direction, or zero when the length is below
    /// [`NORMALIZE_EPSILON`].
    fn normalized(self) -> Self;

    /// Returns `self` when its length is at most `max`, otherwise the vector
    /// rescaled to length `max`. The result's `length()` never exceeds `max`.
    fn clamp_magnitude(self, max: f64) -> Self;
}

impl SteeringVector for Vec2 {
    #[inline]
    fn normalized(self) -> Self {
        let length = self.length();
        if length < NORMALIZE_EPSILON {
            Vec2::ZERO
        } else {
            self / length
        }
    }

    #[inline]
    fn clamp_magnitude(self, max: f64) -> Self {
        let length = self.length();
        if length <= max {
            return self;
        }

        let mut clamped = self * (max / length);
        // The rescale can round a few ulps over `max`; shave them off
        while clamped.length() > max {
            clamped *= 1.0 - f64::EPSILON;
        }
        clamped
    }
}
