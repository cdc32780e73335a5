//! Task-type enumeration and per-task generation configuration.

use serde::{Deserialize, Serialize};

use crate::TriageError;

/// The fixed set of documentation tasks the orchestrator accepts.
///
/// Each variant maps to one generation workload with its own model
/// configuration; requests naming anything else are rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Head-to-toe nursing assessment narrative.
    NursingAssessment,
    /// Subjective/Objective/Assessment/Plan progress note.
    SoapNote,
    /// Fall- and medication-risk narrative summary.
    RiskAssessment,
    /// Discharge summary draft.
    DischargeSummary,
}

impl TaskType {
    /// All accepted task types, in canonical order.
    pub const ALL: [Self; 4] = [
        Self::NursingAssessment,
        Self::SoapNote,
        Self::RiskAssessment,
        Self::DischargeSummary,
    ];

    /// Canonical snake_case name, stable across releases (used in cache keys).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NursingAssessment => "nursing_assessment",
            Self::SoapNote => "soap_note",
            Self::RiskAssessment => "risk_assessment",
            Self::DischargeSummary => "discharge_summary",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TriageError::validation(format!("unknown task type: {s}")))
    }
}

/// Generation parameters for one task type.
///
/// The orchestrator treats this as opaque and forwards it to the selected
/// adapter; only structural validity is checked at registration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Model identifier understood by the target provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token budget.
    pub max_tokens: u32,
}

impl TaskConfig {
    /// Conservative defaults for a task type.
    ///
    /// Narrative tasks get a larger token budget than note-shaped ones.
    #[must_use]
    pub fn default_for(task: TaskType) -> Self {
        let max_tokens = match task {
            TaskType::SoapNote => 600,
            TaskType::NursingAssessment | TaskType::DischargeSummary => 1200,
            TaskType::RiskAssessment => 800,
        };
        Self {
            model: "default".to_string(),
            temperature: 0.3,
            max_tokens,
        }
    }

    /// Validate structural invariants.
    ///
    /// # Errors
    /// Returns `Validation` when the model name is empty, the temperature is
    /// outside `[0, 2]`, or the token budget is zero.
    pub fn validate(&self) -> Result<(), TriageError> {
        if self.model.trim().is_empty() {
            return Err(TriageError::validation("task config: empty model name"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(TriageError::validation(format!(
                "task config: temperature {} outside [0, 2]",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(TriageError::validation("task config: max_tokens must be > 0"));
        }
        Ok(())
    }
}
