use chrono::{DateTime, Utc};
use robby_engine::WorldConfig;
use robby_policy::Policy;
use serde::{Deserialize, Serialize};

/// A trained policy together with the settings it was trained under.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Fitness measured in the last generation, absent if no generation ran.
    pub final_fitness: Option<f64>,
    pub generations: usize,
    pub world: WorldConfig,
    pub max_steps: usize,
    pub policy: Policy,
}

/// Contents of a policy file: either a full model or a bare policy table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PolicyFile {
    Model(Box<PolicyModel>),
    Table(Policy),
}

impl PolicyFile {
    pub fn into_policy(self) -> Policy {
        match self {
            PolicyFile::Model(model) => model.policy,
            PolicyFile::Table(policy) => policy,
        }
    }
}
