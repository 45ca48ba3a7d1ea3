//! Feedforward policy networks evolved by the antnest trainer.
//!
//! A [`PolicyNetwork`] maps an observation vector to a vector of action scores
//! through a single hidden layer. Both layers use `tanh`, so every output lies in
//! `[-1, 1]`. The topology is fixed at construction; only the weights change, and
//! only through [`PolicyNetwork::mutate`].
//!
//! # Architecture
//!
//! ```text
//! observation (input_size)
//!     ↓ W1 (input_size × hidden_size) + B1, tanh
//! hidden (hidden_size)
//!     ↓ W2 (hidden_size × output_size) + B2, tanh
//! action scores (output_size)
//!     ↓ argmax
//! action index
//! ```
//!
//! # Modules
//!
//! - [`network`]: the network itself (construction, forward pass, mutation, persistence)
//! - [`params`]: flat parameter vector operations shared by initialization and mutation
//! - [`action`]: turning action scores into a discrete action
//!
//! # Example
//!
//! ```
//! use antnest_network::{NetworkShape, PolicyNetwork, action};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(12345);
//! let network = PolicyNetwork::new(NetworkShape::new(6, 8, 6), &mut rng);
//!
//! let scores = network.forward(&[1.0, 0.0, 0.0, 0.3, 1.0, 1.0]).unwrap();
//! assert_eq!(scores.len(), 6);
//! assert!(scores.iter().all(|s| (-1.0..=1.0).contains(s)));
//!
//! let chosen = action::argmax(&scores).unwrap();
//! assert!(chosen < 6);
//! ```

pub use self::network::*;

pub mod action;
pub mod network;
pub mod params;

/// Returned by [`PolicyNetwork::forward`] when the observation has the wrong length.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("observation has {actual} values but the network expects {expected}")]
pub struct InputLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// Returned when deserialized parameter arrays disagree with the declared sizes.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("network sizes must be positive (got {input}x{hidden}x{output})")]
    ZeroSize {
        input: usize,
        hidden: usize,
        output: usize,
    },
    #[display("parameter array `{name}` has {actual} values, expected {expected}")]
    ParameterLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}
