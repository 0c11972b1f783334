//! Phase Graph: merge phase definitions with live status into renderable nodes and edges
//!
//! Nodes are a pure projection of (`PhasesResponse`, `WorkflowStatus`) and are rebuilt
//! wholesale whenever either snapshot changes. Node order is part of the contract:
//! ascending phase number, then declaration order inside the phase. Each node also
//! carries its `(phase_num, index_in_phase)` position so consumers need not rely on
//! array position.

use crate::dependencies::{resolve_dependencies, DependencyInfo};
use std::collections::HashSet;
use crate::label::LabelFormatter;
use crate::phases::{PhasesResponse, WorkflowKind, WorkflowState, WorkflowStatus};
use crate::visual_state::{classify, VisualState};
use serde::{Deserialize, Serialize};

// =============================================================================
// Public Types (match TypeScript PhaseGraph)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseGraphNode {
    pub workflow_id: String,
    pub label: String,
    pub phase_num: u32,
    pub index_in_phase: usize,
    pub is_required: bool,
    pub is_optional: bool,
    pub is_conditional: bool,
    pub agent: Option<String>,
    pub included_by: Option<String>,
    pub purpose: Option<String>,
    pub status: WorkflowState,
    pub is_current: bool,
    pub dependencies_met: bool,
    pub unmet_dependencies: Vec<String>,
    pub artifact_path: Option<String>,
    pub exclude_from_primary_navigation: bool,
    pub visual_state: VisualState,
    pub aria_label: String,
}

impl PhaseGraphNode {
    pub fn kind(&self) -> WorkflowKind {
        if self.is_required {
            WorkflowKind::Required
        } else if self.is_conditional {
            WorkflowKind::Conditional
        } else {
            WorkflowKind::Optional
        }
    }

    pub fn is_locked(&self) -> bool {
        self.visual_state == VisualState::Locked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseGraphEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Rendering hint only (dashed line), not a weaker dependency.
    pub is_optional: bool,
}

impl PhaseGraphEdge {
    /// Solid edge in the required chain. Id is `"{from}->{to}"`.
    fn sequential(from: &str, to: &str) -> Self {
        Self {
            id: format!("{}->{}", from, to),
            from: from.to_string(),
            to: to.to_string(),
            is_optional: false,
        }
    }

    /// Parent to `included_by` child. Id is `"{from}->{to}:include"` so it can sit
    /// next to a sequential edge over the same pair.
    fn inclusion(from: &str, to: &str, is_optional: bool) -> Self {
        Self {
            id: format!("{}->{}:include", from, to),
            from: from.to_string(),
            to: to.to_string(),
            is_optional,
        }
    }
}

/// One phase column header with its completion rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseColumn {
    pub phase_num: u32,
    pub name: String,
    pub workflow_ids: Vec<String>,
    pub completed_count: u32,
    pub total_required: u32,
    pub percent_complete: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseGraph {
    pub method_name: Option<String>,
    pub nodes: Vec<PhaseGraphNode>,
    pub edges: Vec<PhaseGraphEdge>,
    pub columns: Vec<PhaseColumn>,
    pub total_progress: u8,
}

impl PhaseGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, workflow_id: &str) -> Option<&PhaseGraphNode> {
        self.nodes.iter().find(|n| n.workflow_id == workflow_id)
    }
}

// =============================================================================
// Builder
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    labels: LabelFormatter,
}

impl GraphBuilder {
    pub fn new(labels: LabelFormatter) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &LabelFormatter {
        &self.labels
    }

    /// One node per workflow. Empty when either snapshot is missing.
    pub fn build_nodes(
        &self,
        phases: Option<&PhasesResponse>,
        status: Option<&WorkflowStatus>,
    ) -> Vec<PhaseGraphNode> {
        let (Some(phases), Some(status)) = (phases, status) else {
            return Vec::new();
        };

        let mut dependencies = resolve_dependencies(phases, status).into_iter();
        let mut nodes = Vec::new();

        for phase in phases.ordered_phases() {
            for (index_in_phase, workflow) in phase.workflows.iter().enumerate() {
                let state = status.state_of(&workflow.id);
                let is_current = status.is_next(&workflow.id);
                let deps = dependencies.next().unwrap_or_else(|| DependencyInfo {
                    dependencies_met: true,
                    unmet_dependencies: Vec::new(),
                });
                let visual_state = classify(state, is_current, deps.dependencies_met);
                let label = self.labels.format(&workflow.id);

                let mut node = PhaseGraphNode {
                    workflow_id: workflow.id.clone(),
                    label,
                    phase_num: phase.phase,
                    index_in_phase,
                    is_required: workflow.kind() == WorkflowKind::Required,
                    is_optional: workflow.kind() == WorkflowKind::Optional,
                    is_conditional: workflow.is_conditional(),
                    agent: workflow.agent.clone(),
                    included_by: workflow.included_by.clone(),
                    purpose: workflow.purpose.clone(),
                    status: state,
                    is_current,
                    dependencies_met: deps.dependencies_met,
                    unmet_dependencies: deps.unmet_dependencies,
                    artifact_path: status.artifact_path(&workflow.id).map(String::from),
                    exclude_from_primary_navigation: workflow.exclude_from_primary_navigation,
                    visual_state,
                    aria_label: String::new(),
                };
                node.aria_label = aria_label(&node, &self.labels);
                nodes.push(node);
            }
        }

        nodes
    }

    /// Sequential edges between required workflows (within and across phases)
    /// plus inclusion edges from each `included_by` parent. Edge ids are unique;
    /// a pair repeated by ids recurring across phases is emitted once.
    pub fn build_edges(&self, phases: Option<&PhasesResponse>) -> Vec<PhaseGraphEdge> {
        let Some(phases) = phases else {
            return Vec::new();
        };

        let known_ids = phases.workflow_ids();
        let mut edges = EdgeList::default();
        let mut carried_required: Option<&str> = None;

        for phase in phases.ordered_phases() {
            let required: Vec<&str> = phase.required_workflows().map(|w| w.id.as_str()).collect();

            if let (Some(previous), Some(first)) = (carried_required, required.first()) {
                edges.push(PhaseGraphEdge::sequential(previous, first));
            }

            for pair in required.windows(2) {
                edges.push(PhaseGraphEdge::sequential(pair[0], pair[1]));
            }

            for workflow in &phase.workflows {
                let Some(parent) = workflow.included_by.as_deref() else {
                    continue;
                };
                if !known_ids.contains(parent) {
                    continue;
                }
                let dashed = matches!(
                    workflow.kind(),
                    WorkflowKind::Optional | WorkflowKind::Conditional
                );
                edges.push(PhaseGraphEdge::inclusion(parent, &workflow.id, dashed));
            }

            if let Some(last) = required.last() {
                carried_required = Some(*last);
            }
        }

        edges.edges
    }

    /// Phase column headers. Backend rollups win; otherwise count required
    /// workflows that are complete or skipped, same as `total_progress`.
    pub fn build_columns(
        &self,
        phases: Option<&PhasesResponse>,
        status: Option<&WorkflowStatus>,
    ) -> Vec<PhaseColumn> {
        let (Some(phases), Some(status)) = (phases, status) else {
            return Vec::new();
        };

        phases
            .ordered_phases()
            .into_iter()
            .map(|phase| {
                let (completed_count, total_required, percent_complete) =
                    match status.completion_for_phase(phase.phase) {
                        Some(rollup) => (
                            rollup.completed_count,
                            rollup.total_required,
                            rollup.percent_complete,
                        ),
                        None => {
                            let total = phase.required_workflows().count() as u32;
                            let done = phase
                                .required_workflows()
                                .filter(|w| status.is_done(&w.id))
                                .count() as u32;
                            (done, total, percent(done, total))
                        }
                    };

                PhaseColumn {
                    phase_num: phase.phase,
                    name: phase.name.clone(),
                    workflow_ids: phase.workflows.iter().map(|w| w.id.clone()).collect(),
                    completed_count,
                    total_required,
                    percent_complete,
                }
            })
            .collect()
    }

    pub fn build(
        &self,
        phases: Option<&PhasesResponse>,
        status: Option<&WorkflowStatus>,
    ) -> PhaseGraph {
        let nodes = self.build_nodes(phases, status);
        if nodes.is_empty() {
            return PhaseGraph::default();
        }

        let required: Vec<&PhaseGraphNode> = nodes.iter().filter(|n| n.is_required).collect();
        let done = required.iter().filter(|n| n.status.is_done()).count() as u32;
        let total_progress = percent(done, required.len() as u32).round() as u8;

        PhaseGraph {
            method_name: phases.map(|p| p.method_name.clone()),
            edges: self.build_edges(phases),
            columns: self.build_columns(phases, status),
            nodes,
            total_progress,
        }
    }
}

#[derive(Default)]
struct EdgeList {
    seen: HashSet<String>,
    edges: Vec<PhaseGraphEdge>,
}

impl EdgeList {
    fn push(&mut self, edge: PhaseGraphEdge) {
        if self.seen.insert(edge.id.clone()) {
            self.edges.push(edge);
        }
    }
}

fn percent(done: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        (done as f32 / total as f32) * 100.0
    }
}

/// Build nodes with the default label rules.
pub fn build_nodes(
    phases: Option<&PhasesResponse>,
    status: Option<&WorkflowStatus>,
) -> Vec<PhaseGraphNode> {
    GraphBuilder::default().build_nodes(phases, status)
}

/// Build edges with the default label rules.
pub fn build_edges(phases: Option<&PhasesResponse>) -> Vec<PhaseGraphEdge> {
    GraphBuilder::default().build_edges(phases)
}

pub fn build_graph(phases: Option<&PhasesResponse>, status: Option<&WorkflowStatus>) -> PhaseGraph {
    GraphBuilder::default().build(phases, status)
}

/// Screen-reader label for a rendered node.
///
/// `"{label}, Phase {n}, {kind}, {state}"`, plus the blocking workflows when locked.
pub fn aria_label(node: &PhaseGraphNode, labels: &LabelFormatter) -> String {
    let mut text = format!(
        "{}, Phase {}, {}, {}",
        node.label,
        node.phase_num,
        node.kind().as_str(),
        node.visual_state
    );
    if node.visual_state == VisualState::Locked {
        let blockers: Vec<String> = node
            .unmet_dependencies
            .iter()
            .map(|id| labels.format(id))
            .collect();
        text.push_str(&format!(" — blocked by: {}", blockers.join(", ")));
    }
    text
}

// =============================================================================
// Tests
// =============================================================================
