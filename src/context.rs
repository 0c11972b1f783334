//! Context tracing: which upstream artifacts a workflow reads.
//!
//! The trace is structural: it only looks at the phase definitions. Whether an
//! artifact exists yet is a separate join against live status (`is_available`).

use crate::label::LabelFormatter;
use crate::phases::{PhasesResponse, WorkflowKind, WorkflowStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextDependency {
    pub workflow_id: String,
    pub output_path: String,
    pub label: String,
}

/// A traced dependency joined with live status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    #[serde(flatten)]
    pub dependency: ContextDependency,
    pub available: bool,
    pub artifact_path: Option<String>,
}

/// Required, artifact-producing workflows that run before `workflow_id`.
///
/// Scans every phase up to the target's phase; inside the target's phase only
/// workflows declared before it count. Unknown ids trace to nothing.
pub fn trace_context(
    workflow_id: &str,
    phases: &PhasesResponse,
    labels: &LabelFormatter,
) -> Vec<ContextDependency> {
    let ordered = phases.ordered_phases();
    let Some((target_phase, target_index)) = ordered.iter().find_map(|p| {
        p.workflows
            .iter()
            .position(|w| w.id == workflow_id)
            .map(|index| (p.phase, index))
    }) else {
        return Vec::new();
    };

    let mut trace = Vec::new();
    for phase in ordered.iter().filter(|p| p.phase <= target_phase) {
        let scanned = if phase.phase == target_phase {
            &phase.workflows[..target_index]
        } else {
            &phase.workflows[..]
        };

        for workflow in scanned {
            if workflow.id == workflow_id || workflow.kind() != WorkflowKind::Required {
                continue;
            }
            if let Some(output) = &workflow.output {
                trace.push(ContextDependency {
                    workflow_id: workflow.id.clone(),
                    output_path: output.clone(),
                    label: labels.format(&workflow.id),
                });
            }
        }
    }
    trace
}

/// Whether the dependency's artifact has been produced.
pub fn is_available(dependency: &ContextDependency, status: Option<&WorkflowStatus>) -> bool {
    status
        .and_then(|s| s.artifact_path(&dependency.workflow_id))
        .is_some()
}

pub fn with_availability(
    dependencies: Vec<ContextDependency>,
    status: Option<&WorkflowStatus>,
) -> Vec<ContextEntry> {
    dependencies
        .into_iter()
        .map(|dependency| {
            let artifact_path = status
                .and_then(|s| s.artifact_path(&dependency.workflow_id))
                .map(String::from);
            ContextEntry {
                available: artifact_path.is_some(),
                artifact_path,
                dependency,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelRules;
    use crate::phases::{PhaseDefinition, WorkflowCompletionStatus, WorkflowDefinition, WorkflowState};

    fn producer(id: &str, required: bool, output: Option<&str>) -> WorkflowDefinition {
        WorkflowDefinition {
            id: id.into(),
            required,
            optional: !required,
            output: output.map(String::from),
            ..Default::default()
        }
    }

    fn sample_phases() -> PhasesResponse {
        PhasesResponse {
            phases: vec![
                PhaseDefinition {
                    phase: 1,
                    name: "Analysis".into(),
                    workflows: vec![
                        producer("research", false, Some("docs/research.md")),
                        producer("create-product-brief", true, Some("docs/brief.md")),
                    ],
                },
                PhaseDefinition {
                    phase: 2,
                    name: "Planning".into(),
                    workflows: vec![
                        producer("brainstorm", false, Some("docs/brainstorm.md")),
                        producer("create-prd", true, Some("docs/prd.md")),
                        producer("create-architecture", true, None),
                        producer("create-epics", true, Some("docs/epics.md")),
                    ],
                },
                PhaseDefinition {
                    phase: 3,
                    name: "Solutioning".into(),
                    workflows: vec![producer("tech-spec", true, Some("docs/tech-spec.md"))],
                },
            ],
            ..Default::default()
        }
    }

    fn labels() -> LabelFormatter {
        LabelFormatter::default()
    }

    #[test]
    fn test_trace_excludes_later_and_optional_producers() {
        let trace = trace_context("create-architecture", &sample_phases(), &labels());
        let ids: Vec<&str> = trace.iter().map(|d| d.workflow_id.as_str()).collect();

        // create-epics (index 3) comes after the target (index 2)
        // research and brainstorm are optional
        assert_eq!(ids, vec!["create-product-brief", "create-prd"]);
        assert_eq!(trace[1].output_path, "docs/prd.md");
        assert_eq!(trace[1].label, "PRD");
    }

    #[test]
    fn test_trace_ignores_later_phases() {
        let trace = trace_context("create-product-brief", &sample_phases(), &labels());
        assert!(trace.is_empty());
    }

    #[test]
    fn test_trace_spans_all_earlier_phases() {
        let trace = trace_context("tech-spec", &sample_phases(), &labels());
        let ids: Vec<&str> = trace.iter().map(|d| d.workflow_id.as_str()).collect();
        assert_eq!(ids, vec!["create-product-brief", "create-prd", "create-epics"]);
    }

    #[test]
    fn test_unknown_workflow_traces_nothing() {
        assert!(trace_context("missing", &sample_phases(), &labels()).is_empty());
    }

    #[test]
    fn test_trace_uses_configured_labels() {
        let mut rules = LabelRules::default();
        rules
            .overrides
            .insert("create-product-brief".into(), "Brief".into());
        let trace = trace_context("create-epics", &sample_phases(), &LabelFormatter::new(rules));
        assert_eq!(trace[0].label, "Brief");
        assert_eq!(trace[1].label, "PRD");
    }

    #[test]
    fn test_availability_join() {
        let trace = trace_context("create-epics", &sample_phases(), &labels());
        let status = WorkflowStatus {
            workflow_statuses: [(
                "create-product-brief".to_string(),
                WorkflowCompletionStatus {
                    workflow_id: "create-product-brief".into(),
                    status: WorkflowState::Complete,
                    artifact_path: Some("docs/brief.md".into()),
                    is_complete: true,
                    ..Default::default()
                },
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        assert!(is_available(&trace[0], Some(&status)));
        assert!(!is_available(&trace[1], Some(&status)));
        assert!(!is_available(&trace[0], None));

        let entries = with_availability(trace, Some(&status));
        assert!(entries[0].available);
        assert_eq!(entries[0].artifact_path.as_deref(), Some("docs/brief.md"));
        assert!(!entries[1].available);
    }
}
