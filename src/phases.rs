//! Phase definitions and workflow status, the two backend snapshots the graph is built from.
//!
//! `PhasesResponse` is the static methodology definition (phases and their workflows).
//! `WorkflowStatus` is the live completion data. Both arrive snake_case from the backend
//! and are treated as immutable snapshots: a reload replaces them wholesale.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Static definition
// =============================================================================

/// One workflow inside a phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    /// Label of the gating condition. Non-null marks the workflow conditional.
    #[serde(default)]
    pub conditional: Option<String>,
    #[serde(default)]
    pub condition_type: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    /// Artifact path this workflow produces.
    #[serde(default)]
    pub output: Option<String>,
    /// Parent workflow that gates this one.
    #[serde(default)]
    pub included_by: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    /// Precomputed classification flags from the backend. Either `required`
    /// or `is_required` marks the workflow required.
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_optional: bool,
    /// Keep this workflow out of arrow-key traversal (e.g. the story/dev/review loop).
    #[serde(default)]
    pub exclude_from_primary_navigation: bool,
}

/// Required / optional / conditional, exactly one per workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowKind {
    Required,
    Optional,
    Conditional,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::Required => "required",
            WorkflowKind::Optional => "optional",
            WorkflowKind::Conditional => "conditional",
        }
    }
}

impl WorkflowDefinition {
    pub fn is_conditional(&self) -> bool {
        self.conditional.is_some()
    }

    /// Classification; `required` wins over a stray condition label.
    pub fn kind(&self) -> WorkflowKind {
        if self.required || self.is_required {
            WorkflowKind::Required
        } else if self.is_conditional() {
            WorkflowKind::Conditional
        } else {
            WorkflowKind::Optional
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    pub phase: u32,
    pub name: String,
    #[serde(default)]
    pub workflows: Vec<WorkflowDefinition>,
}

impl PhaseDefinition {
    /// Required workflows in declaration order.
    pub fn required_workflows(&self) -> impl Iterator<Item = &WorkflowDefinition> {
        self.workflows
            .iter()
            .filter(|w| w.kind() == WorkflowKind::Required)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhasesResponse {
    #[serde(default)]
    pub method_name: String,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phases: Vec<PhaseDefinition>,
}

impl PhasesResponse {
    /// Phases sorted by phase number. Ties keep their declared order.
    pub fn ordered_phases(&self) -> Vec<&PhaseDefinition> {
        let mut phases: Vec<&PhaseDefinition> = self.phases.iter().collect();
        phases.sort_by_key(|p| p.phase);
        phases
    }

    /// Every workflow in (phase, declaration) order, paired with its phase.
    pub fn workflows(&self) -> impl Iterator<Item = (&PhaseDefinition, &WorkflowDefinition)> {
        self.ordered_phases()
            .into_iter()
            .flat_map(|p| p.workflows.iter().map(move |w| (p, w)))
    }

    pub fn find_workflow(&self, workflow_id: &str) -> Option<&WorkflowDefinition> {
        self.workflows()
            .map(|(_, w)| w)
            .find(|w| w.id == workflow_id)
    }

    pub fn workflow_ids(&self) -> HashSet<&str> {
        self.phases
            .iter()
            .flat_map(|p| p.workflows.iter().map(|w| w.id.as_str()))
            .collect()
    }

    /// Flag the given workflow ids as excluded from primary navigation.
    /// Returns how many workflows were flagged.
    pub fn mark_excluded_from_navigation<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let mut marked = 0;
        for workflow in self.phases.iter_mut().flat_map(|p| p.workflows.iter_mut()) {
            if ids.iter().any(|id| id.as_ref() == workflow.id) {
                workflow.exclude_from_primary_navigation = true;
                marked += 1;
            }
        }
        marked
    }
}

// =============================================================================
// Live status
// =============================================================================

/// Per-workflow status as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Complete,
    #[default]
    NotStarted,
    Required,
    Optional,
    Skipped,
    Recommended,
    Conditional,
    /// Anything the backend sends that this build does not know about.
    #[serde(other)]
    Unknown,
}

impl WorkflowState {
    /// Complete or skipped: satisfies downstream dependencies.
    pub fn is_done(&self) -> bool {
        matches!(self, WorkflowState::Complete | WorkflowState::Skipped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Complete => "complete",
            WorkflowState::NotStarted => "not_started",
            WorkflowState::Required => "required",
            WorkflowState::Optional => "optional",
            WorkflowState::Skipped => "skipped",
            WorkflowState::Recommended => "recommended",
            WorkflowState::Conditional => "conditional",
            WorkflowState::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowCompletionStatus {
    pub workflow_id: String,
    #[serde(default)]
    pub status: WorkflowState,
    #[serde(default)]
    pub artifact_path: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_optional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseCompletion {
    #[serde(default)]
    pub completed_count: u32,
    #[serde(default)]
    pub total_required: u32,
    #[serde(default)]
    pub percent_complete: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    #[serde(default)]
    pub current_phase: u32,
    #[serde(default)]
    pub current_phase_name: String,
    #[serde(default)]
    pub next_workflow_id: Option<String>,
    #[serde(default)]
    pub next_workflow_agent: Option<String>,
    /// Keyed by phase number (JSON object keys are strings on the wire).
    #[serde(default)]
    pub phase_completion: HashMap<String, PhaseCompletion>,
    #[serde(default)]
    pub workflow_statuses: HashMap<String, WorkflowCompletionStatus>,
}

impl WorkflowStatus {
    /// Status of a workflow; a missing entry means `not_started`.
    pub fn state_of(&self, workflow_id: &str) -> WorkflowState {
        self.workflow_statuses
            .get(workflow_id)
            .map(|s| s.status)
            .unwrap_or_default()
    }

    pub fn is_done(&self, workflow_id: &str) -> bool {
        self.state_of(workflow_id).is_done()
    }

    pub fn artifact_path(&self, workflow_id: &str) -> Option<&str> {
        self.workflow_statuses
            .get(workflow_id)
            .and_then(|s| s.artifact_path.as_deref())
    }

    pub fn completion_for_phase(&self, phase: u32) -> Option<&PhaseCompletion> {
        self.phase_completion.get(&phase.to_string())
    }

    pub fn is_next(&self, workflow_id: &str) -> bool {
        self.next_workflow_id.as_deref() == Some(workflow_id)
    }
}
