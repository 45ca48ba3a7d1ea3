//! Statistical summaries for the antnest training system.
//!
//! The trainer summarizes every completed generation's fitness scores and the CLI
//! summarizes the parameters of saved policy networks. Both go through
//! [`descriptive::DescriptiveStats`].
//!
//! # Example
//!
//! ```
//! use antnest_stats::descriptive::DescriptiveStats;
//!
//! let scores = [10.0, 30.0, 20.0, 5.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.max, 30.0);
//! assert_eq!(stats.mean, 16.25);
//! ```

pub mod descriptive;
