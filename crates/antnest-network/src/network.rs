use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{InputLengthError, ShapeError, params};

/// Layer sizes of a [`PolicyNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkShape {
    /// Length of the observation vector.
    pub input: usize,
    /// Number of hidden units.
    pub hidden: usize,
    /// Number of action scores.
    pub output: usize,
}

impl NetworkShape {
    #[must_use]
    pub const fn new(input: usize, hidden: usize, output: usize) -> Self {
        Self {
            input,
            hidden,
            output,
        }
    }

    /// Returns `true` if every layer has at least one unit.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.input > 0 && self.hidden > 0 && self.output > 0
    }

    /// Total number of weights and biases for this shape.
    #[must_use]
    pub const fn parameter_count(&self) -> usize {
        self.input * self.hidden + self.hidden + self.hidden * self.output + self.output
    }
}

impl Default for NetworkShape {
    fn default() -> Self {
        Self::new(6, 8, 6)
    }
}

/// A fixed-topology feedforward network with one hidden layer.
///
/// Weight matrices are stored row-major and flattened: `W1[i, h]` lives at
/// `w1[i * hidden_size + h]` and `W2[h, o]` at `w2[h * output_size + o]`.
///
/// Cloning produces a deep copy; the clone and the original never share storage.
/// Evaluation through [`Self::forward`] never changes the weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolicyNetwork")]
pub struct PolicyNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    w1: Vec<f32>,
    b1: Vec<f32>,
    w2: Vec<f32>,
    b2: Vec<f32>,
}

/// Unvalidated wire form of [`PolicyNetwork`].
#[derive(Deserialize)]
struct RawPolicyNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    w1: Vec<f32>,
    b1: Vec<f32>,
    w2: Vec<f32>,
    b2: Vec<f32>,
}

impl TryFrom<RawPolicyNetwork> for PolicyNetwork {
    type Error = ShapeError;

    fn try_from(raw: RawPolicyNetwork) -> Result<Self, Self::Error> {
        let RawPolicyNetwork {
            input_size,
            hidden_size,
            output_size,
            w1,
            b1,
            w2,
            b2,
        } = raw;
        let shape = NetworkShape::new(input_size, hidden_size, output_size);
        if !shape.is_valid() {
            return Err(ShapeError::ZeroSize {
                input: input_size,
                hidden: hidden_size,
                output: output_size,
            });
        }
        check_len("w1", input_size * hidden_size, &w1)?;
        check_len("b1", hidden_size, &b1)?;
        check_len("w2", hidden_size * output_size, &w2)?;
        check_len("b2", output_size, &b2)?;
        Ok(Self {
            input_size,
            hidden_size,
            output_size,
            w1,
            b1,
            w2,
            b2,
        })
    }
}

fn check_len(name: &'static str, expected: usize, values: &[f32]) -> Result<(), ShapeError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(ShapeError::ParameterLength {
            name,
            expected,
            actual: values.len(),
        })
    }
}

impl PolicyNetwork {
    /// Creates a network with randomly initialized parameters.
    ///
    /// Weights are drawn uniformly from `[-0.5, 0.5]` and biases from `[-0.1, 0.1]`,
    /// in the order `W1`, `B1`, `W2`, `B2`.
    ///
    /// # Panics
    ///
    /// Panics if any layer size is zero.
    pub fn new<R>(shape: NetworkShape, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(shape.is_valid(), "network sizes must be positive");
        let NetworkShape {
            input,
            hidden,
            output,
        } = shape;
        let w1 = params::uniform(rng, params::WEIGHT_INIT_RANGE, input * hidden);
        let b1 = params::uniform(rng, params::BIAS_INIT_RANGE, hidden);
        let w2 = params::uniform(rng, params::WEIGHT_INIT_RANGE, hidden * output);
        let b2 = params::uniform(rng, params::BIAS_INIT_RANGE, output);
        Self {
            input_size: input,
            hidden_size: hidden,
            output_size: output,
            w1,
            b1,
            w2,
            b2,
        }
    }

    #[must_use]
    pub fn shape(&self) -> NetworkShape {
        NetworkShape::new(self.input_size, self.hidden_size, self.output_size)
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Iterates over every weight and bias in storage order (`W1`, `B1`, `W2`, `B2`).
    pub fn parameters(&self) -> impl Iterator<Item = f32> + '_ {
        [&self.w1, &self.b1, &self.w2, &self.b2]
            .into_iter()
            .flatten()
            .copied()
    }

    /// Runs the forward pass.
    ///
    /// ```text
    /// hidden[h] = tanh(B1[h] + Σ_i input[i] * W1[i, h])
    /// output[o] = tanh(B2[o] + Σ_h hidden[h] * W2[h, o])
    /// ```
    ///
    /// Every returned value lies in `[-1, 1]`.
    #[expect(clippy::cast_possible_truncation)]
    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>, InputLengthError> {
        if input.len() != self.input_size {
            return Err(InputLengthError {
                expected: self.input_size,
                actual: input.len(),
            });
        }

        // Accumulate in f64 so that extreme but finite observations saturate instead of
        // overflowing into NaN.
        let hidden = params::from_fn(
            |h| {
                let sum = input
                    .iter()
                    .enumerate()
                    .fold(f64::from(self.b1[h]), |acc, (i, x)| {
                        acc + f64::from(*x) * f64::from(self.w1[i * self.hidden_size + h])
                    });
                sum.tanh() as f32
            },
            self.hidden_size,
        );

        let output = params::from_fn(
            |o| {
                let sum = hidden
                    .iter()
                    .enumerate()
                    .fold(f64::from(self.b2[o]), |acc, (h, x)| {
                        acc + f64::from(*x) * f64::from(self.w2[h * self.output_size + o])
                    });
                sum.tanh() as f32
            },
            self.output_size,
        );

        Ok(output)
    }

    /// Mutates every weight and bias independently.
    ///
    /// With probability `rate` a parameter receives an offset drawn uniformly from
    /// `[-strength, strength]`. See [`params::mutate`].
    ///
    /// # Panics
    ///
    /// Panics if `rate` is outside `[0, 1]` or `strength` is negative.
    pub fn mutate<R>(&mut self, rng: &mut R, rate: f64, strength: f32)
    where
        R: Rng + ?Sized,
    {
        for values in [&mut self.w1, &mut self.b1, &mut self.w2, &mut self.b2] {
            params::mutate(values, rate, strength, rng);
        }
    }
}
