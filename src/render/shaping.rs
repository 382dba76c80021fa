//! Nested sine shaping curve.

/// Compose `sin` with itself `depth` times, starting from `theta`.
///
/// `nested_sine(t, 3) == t.sin().sin().sin()`. A depth of zero is treated as
/// one, so the result always lies in `[-1, 1]` for finite `theta`.
pub fn nested_sine(theta: f64, depth: u32) -> f64 {
    (1..depth.max(1)).fold(theta.sin(), |s, _| s.sin())
}
