//! Dependency resolution: which upstream workflows block each node.
//!
//! Rules, applied per phase in ascending phase order:
//! - a required workflow depends on every earlier required workflow in its phase;
//! - the first required workflow of a phase also depends on the last required
//!   workflow of the most recent earlier phase that had any;
//! - any workflow with an `included_by` parent depends on that parent.
//!
//! A dependency is satisfied when it is complete or skipped. Only immediate
//! blockers are listed (no transitive closure) and duplicates are kept.

use crate::phases::{PhasesResponse, WorkflowKind, WorkflowStatus};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyInfo {
    pub dependencies_met: bool,
    pub unmet_dependencies: Vec<String>,
}

impl DependencyInfo {
    fn from_unmet(unmet_dependencies: Vec<String>) -> Self {
        Self {
            dependencies_met: unmet_dependencies.is_empty(),
            unmet_dependencies,
        }
    }
}

/// Unmet dependencies for every workflow, in node order: ascending phase, then
/// declaration order. Ids may repeat across phases, so results are positional.
pub fn resolve_dependencies(
    phases: &PhasesResponse,
    status: &WorkflowStatus,
) -> Vec<DependencyInfo> {
    let known_ids = phases.workflow_ids();
    let mut resolved = Vec::new();
    let mut carried_required: Option<&str> = None;

    for phase in phases.ordered_phases() {
        let mut earlier_required: Vec<&str> = Vec::new();

        for workflow in &phase.workflows {
            let mut unmet = Vec::new();

            if workflow.kind() == WorkflowKind::Required {
                unmet.extend(
                    earlier_required
                        .iter()
                        .filter(|id| !status.is_done(id))
                        .map(|id| id.to_string()),
                );

                if earlier_required.is_empty() {
                    if let Some(previous) = carried_required {
                        if !status.is_done(previous) {
                            unmet.push(previous.to_string());
                        }
                    }
                }
                earlier_required.push(&workflow.id);
            }

            if let Some(parent) = workflow.included_by.as_deref() {
                if !known_ids.contains(parent) {
                    warn!(
                        workflow = %workflow.id,
                        parent,
                        "included_by references an unknown workflow, ignoring"
                    );
                } else if !status.is_done(parent) {
                    unmet.push(parent.to_string());
                }
            }

            resolved.push(DependencyInfo::from_unmet(unmet));
        }

        if let Some(last) = earlier_required.last() {
            carried_required = Some(*last);
        }
    }

    resolved
}
