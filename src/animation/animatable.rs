/// Trait for values that can be animated by interpolating between them.
pub trait Animatable: Clone + PartialEq + 'static {
    /// Linear interpolation between two values.
    /// t = 0.0 returns `from`, t = 1.0 returns `to`.
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

/// The progress arc animates a bare fraction.
impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}
