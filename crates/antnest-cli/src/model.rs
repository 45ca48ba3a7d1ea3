use std::path::Path;

use antnest_network::PolicyNetwork;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained queen policy as written by `antnest train`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Generation in which the network reached `final_fitness`.
    pub generation: u32,
    pub final_fitness: f64,
    pub network: PolicyNetwork,
}

impl PolicyModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("policy model", path)
    }
}
