//! Tauri IPC commands: interface between the graph view and the Rust backend.
//!
//! The frontend fetches snapshots from the methodology backend and hands them
//! over as JSON; every load recomputes the graph and emits `phase-graph-updated`.

use crate::config::StudioConfig;
use crate::context::ContextEntry;
use crate::error::{ErrorCode, StudioError};
use crate::graph::PhaseGraph;
use crate::navigation::{NavKey, NavOutcome};
use crate::session::GraphSession;
use crate::snapshot::{parse_phases, parse_status};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tauri::{AppHandle, Emitter, State};

pub const GRAPH_UPDATED_EVENT: &str = "phase-graph-updated";

/// Application state shared across commands.
pub struct AppState {
    pub session: Mutex<GraphSession>,
}

impl AppState {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            session: Mutex::new(config.session()),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, GraphSession>, StudioError> {
        self.session
            .lock()
            .map_err(|e| StudioError::new(ErrorCode::SessionPoisoned, e.to_string()))
    }
}

/// Payload of `phase-graph-updated`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUpdated<'a> {
    pub graph: &'a PhaseGraph,
    pub updated_at: Option<DateTime<Utc>>,
}

fn publish(app: &AppHandle, session: &GraphSession, graph: &PhaseGraph) {
    let payload = GraphUpdated {
        graph,
        updated_at: session.updated_at(),
    };
    if let Err(e) = app.emit(GRAPH_UPDATED_EVENT, payload) {
        tracing::warn!("failed to emit graph update: {}", e);
    }
}

/// Replace the phase definitions (`GET /phases` payload).
#[tauri::command]
pub async fn load_phases(
    app: AppHandle,
    state: State<'_, AppState>,
    payload: String,
) -> Result<PhaseGraph, StudioError> {
    let phases = parse_phases(&payload)?;
    let mut session = state.session()?;
    let graph = session.set_phases(phases);
    publish(&app, &session, &graph);
    Ok((*graph).clone())
}

/// Replace the live workflow status (fetched or pushed).
#[tauri::command]
pub async fn load_workflow_status(
    app: AppHandle,
    state: State<'_, AppState>,
    payload: String,
) -> Result<PhaseGraph, StudioError> {
    let status = parse_status(&payload)?;
    let mut session = state.session()?;
    let graph = session.set_status(status);
    publish(&app, &session, &graph);
    Ok((*graph).clone())
}

/// Current graph; empty while either snapshot is missing.
#[tauri::command]
pub async fn get_phase_graph(state: State<'_, AppState>) -> Result<PhaseGraph, StudioError> {
    Ok((*state.session()?.graph()).clone())
}

/// Focus entering the graph (Tab from outside).
#[tauri::command]
pub async fn focus_phase_graph(state: State<'_, AppState>) -> Result<NavOutcome, StudioError> {
    let mut session = state.session()?;
    if session.graph().is_empty() {
        return Err(StudioError::new(
            ErrorCode::GraphNotLoaded,
            "Phase graph is not loaded",
        ));
    }
    Ok(session.focus_entry())
}

/// Apply a key press (`KeyboardEvent.key`) to the focused node.
#[tauri::command]
pub async fn navigate_phase_graph(
    state: State<'_, AppState>,
    key: String,
) -> Result<NavOutcome, StudioError> {
    let key: NavKey = key.parse()?;
    let mut session = state.session()?;
    if session.graph().is_empty() {
        return Err(StudioError::new(
            ErrorCode::GraphNotLoaded,
            "Phase graph is not loaded",
        ));
    }
    Ok(session.handle_key(key))
}

/// Upstream artifacts a workflow reads, with availability.
#[tauri::command]
pub async fn trace_workflow_context(
    state: State<'_, AppState>,
    workflow_id: String,
) -> Result<Vec<ContextEntry>, StudioError> {
    state.session()?.trace_context(&workflow_id).ok_or_else(|| {
        StudioError::new(ErrorCode::GraphNotLoaded, "Phase definitions are not loaded")
    })
}

/// Launch the desktop shell.
pub fn run(config: StudioConfig) {
    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .manage(AppState::new(&config))
        .invoke_handler(tauri::generate_handler![
            // Snapshots
            load_phases,
            load_workflow_status,
            // Graph
            get_phase_graph,
            trace_workflow_context,
            // Keyboard navigation
            focus_phase_graph,
            navigate_phase_graph,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
