use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct EloOptions {
    /// Elo sensitivity constant. Controls how far a single pair
    /// adjustment can swing a rating.
    pub k_factor: f64,
}

impl Default for EloOptions {
    fn default() -> Self {
        Self { k_factor: 32.0 }
    }
}
