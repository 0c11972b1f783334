use std::path::PathBuf;
use workflow_studio::config::StudioConfig;
use workflow_studio::navigation::{NavKey, NavOutcome};
use workflow_studio::snapshot::{parse_phases, parse_status, read_phases, read_status};
use workflow_studio::{build_edges, build_nodes, VisualState};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_analysis_to_planning_scenario() {
    let phases = parse_phases(
        r#"{
            "method_name": "method",
            "phases": [
                {"phase": 1, "name": "Analysis", "workflows": [
                    {"id": "research", "optional": true},
                    {"id": "create-product-brief", "required": true}
                ]},
                {"phase": 2, "name": "Planning", "workflows": [
                    {"id": "prd", "required": true}
                ]}
            ]
        }"#,
    )
    .unwrap();
    let status = parse_status(
        r#"{
            "current_phase": 2,
            "current_phase_name": "Planning",
            "next_workflow_id": "prd",
            "workflow_statuses": {
                "research": {"workflow_id": "research", "status": "skipped"},
                "create-product-brief": {"workflow_id": "create-product-brief", "status": "complete"},
                "prd": {"workflow_id": "prd", "status": "required"}
            }
        }"#,
    )
    .unwrap();

    let nodes = build_nodes(Some(&phases), Some(&status));
    let states: Vec<(&str, VisualState)> = nodes
        .iter()
        .map(|n| (n.workflow_id.as_str(), n.visual_state))
        .collect();
    assert_eq!(
        states,
        vec![
            ("research", VisualState::Skipped),
            ("create-product-brief", VisualState::Complete),
            ("prd", VisualState::Current),
        ]
    );
    assert!(nodes[2].unmet_dependencies.is_empty());
    assert!(nodes[2].dependencies_met);

    let edges = build_edges(Some(&phases));
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].id, "create-product-brief->prd");
}

#[tokio::test]
async fn test_fixture_graph_locks_downstream_work() {
    let phases = read_phases(&fixture("phases.json")).await.unwrap();
    let status = read_status(&fixture("status.json")).await.unwrap();

    let mut session = StudioConfig::default().session();
    session.set_phases(phases);
    let graph = session.set_status(status);

    let ux = graph.node("create-ux-design").unwrap();
    assert_eq!(ux.visual_state, VisualState::Locked);
    assert_eq!(
        ux.aria_label,
        "UX Design, Phase 2, conditional, locked — blocked by: PRD"
    );

    let architecture = graph.node("create-architecture").unwrap();
    assert_eq!(architecture.unmet_dependencies, vec!["prd"]);

    let readiness = graph.node("check-implementation-readiness").unwrap();
    assert_eq!(readiness.label, "Readiness Check");
    assert_eq!(readiness.unmet_dependencies, vec!["create-architecture"]);

    let dev = graph.node("dev-story").unwrap();
    assert!(dev.exclude_from_primary_navigation);

    let pairs: Vec<(&str, &str, bool)> = graph
        .edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.is_optional))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("create-product-brief", "prd", false),
            ("prd", "create-ux-design", true),
            ("prd", "create-architecture", false),
            ("create-architecture", "check-implementation-readiness", false),
            ("check-implementation-readiness", "sprint-planning", false),
            ("sprint-planning", "create-story", false),
            ("create-story", "dev-story", false),
        ]
    );

    assert_eq!(graph.columns[0].percent_complete, 100.0);
    assert_eq!(graph.columns[1].completed_count, 0);
}

#[tokio::test]
async fn test_fixture_keyboard_walk() {
    let mut session = StudioConfig::default().session();
    session.set_phases(read_phases(&fixture("phases.json")).await.unwrap());
    session.set_status(read_status(&fixture("status.json")).await.unwrap());
    let graph = session.graph();
    let focused_id = |session: &workflow_studio::session::GraphSession| {
        session
            .navigator()
            .focused_node(&graph.nodes)
            .map(|n| n.workflow_id.clone())
    };

    match session.focus_entry() {
        NavOutcome::Focused { announcement, .. } => {
            assert_eq!(announcement, "PRD, Phase 2, current, Agent: pm")
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    session.handle_key(NavKey::Down);
    assert_eq!(focused_id(&session).as_deref(), Some("create-ux-design"));
    assert_eq!(session.handle_key(NavKey::Enter), NavOutcome::Unchanged);

    session.handle_key(NavKey::Right);
    assert_eq!(focused_id(&session).as_deref(), Some("create-architecture"));

    session.handle_key(NavKey::Right);
    assert_eq!(focused_id(&session).as_deref(), Some("sprint-planning"));

    // create-story, dev-story and code-review are skipped
    session.handle_key(NavKey::Down);
    assert_eq!(focused_id(&session).as_deref(), Some("retrospective"));

    assert_eq!(session.handle_key(NavKey::Right), NavOutcome::Unchanged);

    session.handle_key(NavKey::Left);
    assert_eq!(
        focused_id(&session).as_deref(),
        Some("check-implementation-readiness")
    );
}

#[tokio::test]
async fn test_fixture_context_trace() {
    let mut session = StudioConfig::default().session();
    session.set_phases(read_phases(&fixture("phases.json")).await.unwrap());
    session.set_status(read_status(&fixture("status.json")).await.unwrap());

    let entries = session.trace_context("check-implementation-readiness").unwrap();
    let summary: Vec<(&str, bool)> = entries
        .iter()
        .map(|e| (e.dependency.workflow_id.as_str(), e.available))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("create-product-brief", true),
            ("prd", false),
            ("create-architecture", false),
        ]
    );
}
