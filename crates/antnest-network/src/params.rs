//! Flat parameter vector operations.
//!
//! [`PolicyNetwork`](crate::PolicyNetwork) stores each weight matrix and bias vector as
//! a flat `Vec<f32>`. These helpers build and perturb such vectors; the network applies
//! them to its four arrays in a fixed order (`W1`, `B1`, `W2`, `B2`) so that random
//! number consumption is reproducible for a given seed.

use rand::Rng;

/// Half-width of the uniform range used to initialize weights.
pub const WEIGHT_INIT_RANGE: f32 = 0.5;

/// Half-width of the uniform range used to initialize biases.
pub const BIAS_INIT_RANGE: f32 = 0.1;

/// Creates a parameter vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use antnest_network::params;
///
/// let values = params::from_fn(|i| i as f32 * 0.5, 4);
/// assert_eq!(values, vec![0.0, 0.5, 1.0, 1.5]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates a parameter vector with values drawn uniformly from `[-half_width, half_width]`.
///
/// # Panics
///
/// Panics if `half_width` is negative or not finite.
pub fn uniform<R>(rng: &mut R, half_width: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert!(
        half_width.is_finite() && half_width >= 0.0,
        "half width must be finite and non-negative"
    );
    from_fn(|_| rng.random_range(-half_width..=half_width), len)
}

/// Applies uniform additive mutation to a parameter vector in-place.
///
/// Each value independently, with probability `rate`, receives an offset drawn
/// uniformly from `[-strength, strength]`. Values are never clamped.
///
/// The mutation decision is drawn for every value, mutated or not, so the number of
/// random draws depends only on the outcome of those decisions.
///
/// # Panics
///
/// Panics if `rate` is outside `[0, 1]`, `strength` is negative, or `2 * strength`
/// overflows.
pub fn mutate<R>(values: &mut [f32], rate: f64, strength: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    assert!((0.0..=1.0).contains(&rate), "mutation rate must be in [0, 1]");
    assert!(
        (2.0 * strength).is_finite() && strength >= 0.0,
        "mutation strength must be non-negative with a finite span"
    );
    for v in values {
        if rng.random_bool(rate) {
            *v += strength * rng.random_range(-1.0_f32..=1.0);
        }
    }
}
