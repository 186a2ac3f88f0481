//! Quick-reference emergency content. Read-only, never scored.

use serde::{Deserialize, Serialize};

/// One numbered action of the fall-through self-rescue sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyStep {
    pub id: String,
    pub step_number: u32,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub is_warning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// Signs and temperature band of one hypothermia stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypothermiaStage {
    pub id: String,
    pub stage: String,
    pub signs: Vec<String>,
    pub temperature: String,
    pub severity: Severity,
}
