//! Workflow Studio: phase graph engine for the methodology desktop UI.
//!
//! Merges the static phase definitions with live workflow status into a
//! renderable node/edge graph, classifies each node's visual state, traces the
//! artifacts a workflow depends on, and drives keyboard focus over the graph.
//! All graph computation is synchronous and side-effect free; `session` wires
//! it to snapshot updates and `commands` exposes it to the Tauri frontend.

pub mod config;
pub mod context;
pub mod dependencies;
pub mod error;
pub mod graph;
pub mod label;
pub mod logging;
pub mod navigation;
pub mod phases;
pub mod session;
pub mod snapshot;
pub mod util;
pub mod visual_state;

#[cfg(feature = "desktop")]
pub mod commands;

pub use error::{ErrorCode, StudioError};
pub use graph::{build_edges, build_graph, build_nodes, PhaseGraph, PhaseGraphEdge, PhaseGraphNode};
pub use label::format_label;
pub use visual_state::{classify, VisualState};
