//! Keyboard navigation over a rendered phase graph.
//!
//! Arrow keys move focus between phase columns (Left/Right) and within a
//! column (Up/Down). Workflows flagged `exclude_from_primary_navigation` are
//! never arrow-key targets. Enter selects the focused node; Space opens a
//! completed node's artifact directly when one exists. Locked nodes cannot be
//! activated.
//!
//! Traversal order is computed from each node's `(phase_num, index_in_phase)`
//! rather than from its position in the slice.

use crate::error::{ErrorCode, StudioError};
use crate::graph::PhaseGraphNode;
use crate::phases::WorkflowState;
use crate::visual_state::VisualState;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
}

impl FromStr for NavKey {
    type Err = StudioError;

    /// Accepts DOM `KeyboardEvent.key` values as well as short names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowUp" | "up" | "Up" => Ok(NavKey::Up),
            "ArrowDown" | "down" | "Down" => Ok(NavKey::Down),
            "ArrowLeft" | "left" | "Left" => Ok(NavKey::Left),
            "ArrowRight" | "right" | "Right" => Ok(NavKey::Right),
            "Enter" | "enter" => Ok(NavKey::Enter),
            " " | "Space" | "space" | "Spacebar" => Ok(NavKey::Space),
            other => Err(StudioError::new(
                ErrorCode::InvalidNavigationKey,
                format!("Unsupported navigation key: {:?}", other),
            )),
        }
    }
}

/// Emitted when a node is activated with Enter or Space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
    pub workflow_id: String,
    pub visual_state: VisualState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,
}

impl SelectionEvent {
    fn for_node(node: &PhaseGraphNode) -> Self {
        Self {
            workflow_id: node.workflow_id.clone(),
            visual_state: node.visual_state,
            artifact_path: node.artifact_path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavOutcome {
    /// Nothing happened (boundary, locked node, no focus).
    Unchanged,
    /// Focus moved; the announcement is for screen readers.
    Focused { index: usize, announcement: String },
    /// Generic workflow action for the node.
    Selected(SelectionEvent),
    /// Shortcut: open the node's artifact.
    OpenArtifact(SelectionEvent),
}

/// Screen-reader announcement for a newly focused node.
pub fn announcement(node: &PhaseGraphNode) -> String {
    let mut text = format!(
        "{}, Phase {}, {}",
        node.label, node.phase_num, node.visual_state
    );
    if let Some(agent) = &node.agent {
        text.push_str(&format!(", Agent: {}", agent));
    }
    if node.artifact_path.is_some() {
        text.push_str(", artifact available");
    }
    text
}

/// Focus state for one rendered graph.
#[derive(Debug, Clone, Default)]
pub struct GraphNavigator {
    focused: Option<usize>,
    focused_id: Option<String>,
}

impl GraphNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_node<'a>(&self, nodes: &'a [PhaseGraphNode]) -> Option<&'a PhaseGraphNode> {
        self.focused.and_then(|i| nodes.get(i))
    }

    pub fn clear(&mut self) {
        self.focused = None;
        self.focused_id = None;
    }

    /// Focus entering the graph from outside: the recommended next workflow,
    /// else the first unlocked node, else the first node.
    pub fn focus_entry(&mut self, nodes: &[PhaseGraphNode]) -> NavOutcome {
        let target = nodes
            .iter()
            .position(|n| n.is_current)
            .or_else(|| nodes.iter().position(|n| !n.is_locked()))
            .or(if nodes.is_empty() { None } else { Some(0) });

        match target {
            Some(index) => self.focus(index, nodes),
            None => NavOutcome::Unchanged,
        }
    }

    /// Move focus to `index`. Out-of-range indices are ignored.
    pub fn focus(&mut self, index: usize, nodes: &[PhaseGraphNode]) -> NavOutcome {
        let Some(node) = nodes.get(index) else {
            return NavOutcome::Unchanged;
        };
        self.focused = Some(index);
        self.focused_id = Some(node.workflow_id.clone());
        debug!(workflow = %node.workflow_id, index, "graph focus moved");
        NavOutcome::Focused {
            index,
            announcement: announcement(node),
        }
    }

    /// Re-point focus after the node list was rebuilt. Focus follows the
    /// workflow id; it is cleared when that workflow is gone.
    pub fn sync(&mut self, nodes: &[PhaseGraphNode]) {
        let Some(id) = self.focused_id.as_deref() else {
            self.focused = None;
            return;
        };
        match nodes.iter().position(|n| n.workflow_id == id) {
            Some(index) => self.focused = Some(index),
            None => self.clear(),
        }
    }

    pub fn handle_key(&mut self, key: NavKey, nodes: &[PhaseGraphNode]) -> NavOutcome {
        let Some(current_index) = self.focused.filter(|i| *i < nodes.len()) else {
            return NavOutcome::Unchanged;
        };
        let current = &nodes[current_index];

        match key {
            NavKey::Enter | NavKey::Space => activate(key, current),
            NavKey::Left | NavKey::Right | NavKey::Up | NavKey::Down => {
                match directional_target(key, current_index, nodes) {
                    Some(index) => self.focus(index, nodes),
                    None => NavOutcome::Unchanged,
                }
            }
        }
    }
}

fn activate(key: NavKey, node: &PhaseGraphNode) -> NavOutcome {
    if node.is_locked() {
        return NavOutcome::Unchanged;
    }
    let event = SelectionEvent::for_node(node);
    if key == NavKey::Space && node.status == WorkflowState::Complete && node.artifact_path.is_some()
    {
        return NavOutcome::OpenArtifact(event);
    }
    NavOutcome::Selected(event)
}

/// Indices of arrow-key candidates in traversal order.
fn primary_order(nodes: &[PhaseGraphNode]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..nodes.len())
        .filter(|&i| !nodes[i].exclude_from_primary_navigation)
        .collect();
    order.sort_by_key(|&i| (nodes[i].phase_num, nodes[i].index_in_phase));
    order
}

fn directional_target(key: NavKey, current_index: usize, nodes: &[PhaseGraphNode]) -> Option<usize> {
    let order = primary_order(nodes);
    let phase = nodes[current_index].phase_num;

    match key {
        NavKey::Right => order.iter().copied().find(|&i| nodes[i].phase_num > phase),
        NavKey::Left => order.iter().copied().rev().find(|&i| nodes[i].phase_num < phase),
        NavKey::Down | NavKey::Up => {
            let column: Vec<usize> = order
                .into_iter()
                .filter(|&i| nodes[i].phase_num == phase)
                .collect();
            let position = column.iter().position(|&i| i == current_index)?;
            if key == NavKey::Down {
                column.get(position + 1).copied()
            } else {
                position.checked_sub(1).and_then(|p| column.get(p).copied())
            }
        }
        NavKey::Enter | NavKey::Space => None,
    }
}
