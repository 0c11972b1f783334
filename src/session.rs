//! Graph session: holds the latest backend snapshots and republishes the graph.
//!
//! Every snapshot change rebuilds the whole `PhaseGraph` and publishes it on a
//! `watch` channel. Nothing is patched incrementally.

use crate::context::{trace_context, with_availability, ContextEntry};
use crate::graph::{GraphBuilder, PhaseGraph};
use crate::navigation::{GraphNavigator, NavKey, NavOutcome};
use crate::phases::{PhasesResponse, WorkflowStatus};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub struct GraphSession {
    builder: GraphBuilder,
    excluded_workflows: Vec<String>,
    phases: Option<PhasesResponse>,
    status: Option<WorkflowStatus>,
    graph: Arc<PhaseGraph>,
    navigator: GraphNavigator,
    updated_at: Option<DateTime<Utc>>,
    sender: watch::Sender<Arc<PhaseGraph>>,
}

impl Default for GraphSession {
    fn default() -> Self {
        Self::new(GraphBuilder::default(), Vec::new())
    }
}

impl GraphSession {
    /// `excluded_workflows` are flagged out of primary navigation on every phases load.
    pub fn new(builder: GraphBuilder, excluded_workflows: Vec<String>) -> Self {
        let graph = Arc::new(PhaseGraph::default());
        let (sender, _) = watch::channel(graph.clone());
        Self {
            builder,
            excluded_workflows,
            phases: None,
            status: None,
            graph,
            navigator: GraphNavigator::new(),
            updated_at: None,
            sender,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<PhaseGraph>> {
        self.sender.subscribe()
    }

    pub fn graph(&self) -> Arc<PhaseGraph> {
        self.graph.clone()
    }

    pub fn phases(&self) -> Option<&PhasesResponse> {
        self.phases.as_ref()
    }

    pub fn status(&self) -> Option<&WorkflowStatus> {
        self.status.as_ref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn navigator(&self) -> &GraphNavigator {
        &self.navigator
    }

    /// Replace the phase definitions.
    pub fn set_phases(&mut self, mut phases: PhasesResponse) -> Arc<PhaseGraph> {
        phases.mark_excluded_from_navigation(&self.excluded_workflows);
        self.phases = Some(phases);
        self.recompute()
    }

    /// Replace the live workflow status.
    pub fn set_status(&mut self, status: WorkflowStatus) -> Arc<PhaseGraph> {
        self.status = Some(status);
        self.recompute()
    }

    /// Drop both snapshots (e.g. project closed).
    pub fn clear(&mut self) -> Arc<PhaseGraph> {
        self.phases = None;
        self.status = None;
        self.recompute()
    }

    /// Upstream artifacts `workflow_id` reads, labelled like the graph nodes.
    /// `None` until phase definitions are loaded.
    pub fn trace_context(&self, workflow_id: &str) -> Option<Vec<ContextEntry>> {
        let phases = self.phases.as_ref()?;
        let trace = trace_context(workflow_id, phases, self.builder.labels());
        Some(with_availability(trace, self.status.as_ref()))
    }

    pub fn focus_entry(&mut self) -> NavOutcome {
        self.navigator.focus_entry(&self.graph.nodes)
    }

    pub fn handle_key(&mut self, key: NavKey) -> NavOutcome {
        self.navigator.handle_key(key, &self.graph.nodes)
    }

    fn recompute(&mut self) -> Arc<PhaseGraph> {
        if let (Some(phases), Some(status)) = (&self.phases, &self.status) {
            if let Some(next) = status.next_workflow_id.as_deref() {
                if phases.find_workflow(next).is_none() {
                    warn!(next, "next_workflow_id does not match any workflow");
                }
            }
        }

        let graph = Arc::new(self.builder.build(self.phases.as_ref(), self.status.as_ref()));
        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            progress = graph.total_progress,
            "phase graph recomputed"
        );

        self.navigator.sync(&graph.nodes);
        self.graph = graph.clone();
        self.updated_at = Some(Utc::now());
        self.sender.send_replace(graph.clone());
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{LabelFormatter, LabelRules};
    use crate::phases::{PhaseDefinition, WorkflowDefinition};

    fn phases() -> PhasesResponse {
        PhasesResponse {
            method_name: "method".into(),
            phases: vec![PhaseDefinition {
                phase: 4,
                name: "Implementation".into(),
                workflows: vec![
                    WorkflowDefinition {
                        id: "sprint-planning".into(),
                        required: true,
                        ..Default::default()
                    },
                    WorkflowDefinition {
                        id: "dev-story".into(),
                        required: true,
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_graph_empty_until_both_snapshots_present() {
        let mut session = GraphSession::default();
        assert!(session.set_phases(phases()).is_empty());
        assert!(session.updated_at().is_some());

        let graph = session.set_status(WorkflowStatus::default());
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);

        assert!(session.clear().is_empty());
        assert!(session.phases().is_none());
    }

    #[test]
    fn test_configured_exclusions_applied_on_load() {
        let mut session = GraphSession::new(GraphBuilder::default(), vec!["dev-story".into()]);
        session.set_phases(phases());
        let graph = session.set_status(WorkflowStatus::default());
        let dev = graph.node("dev-story").unwrap();
        assert!(dev.exclude_from_primary_navigation);
    }

    #[test]
    fn test_focus_survives_status_refresh() {
        let mut session = GraphSession::default();
        session.set_phases(phases());
        session.set_status(WorkflowStatus::default());

        session.focus_entry();
        session.handle_key(NavKey::Down);
        assert_eq!(session.navigator().focused_index(), Some(1));

        session.set_status(WorkflowStatus {
            next_workflow_id: Some("dev-story".into()),
            ..Default::default()
        });
        assert_eq!(session.navigator().focused_index(), Some(1));
    }

    #[test]
    fn test_trace_shares_node_labels() {
        let mut rules = LabelRules::default();
        rules.overrides.insert("sprint-planning".into(), "Planning".into());
        let mut session = GraphSession::new(GraphBuilder::new(LabelFormatter::new(rules)), Vec::new());
        assert!(session.trace_context("dev-story").is_none());

        let mut phases = phases();
        phases.phases[0].workflows[0].output = Some("docs/sprint.yaml".into());
        session.set_phases(phases);
        let graph = session.set_status(WorkflowStatus::default());

        let trace = session.trace_context("dev-story").unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].dependency.label, "Planning");
        assert_eq!(graph.node("sprint-planning").unwrap().label, "Planning");
        assert!(!trace[0].available);
    }

    #[tokio::test]
    async fn test_subscribers_see_recomputed_graph() {
        let mut session = GraphSession::default();
        let mut rx = session.subscribe();

        session.set_phases(phases());
        session.set_status(WorkflowStatus::default());

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().nodes.len(), 2);
    }
}
