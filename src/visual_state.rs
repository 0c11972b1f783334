//! Visual state of a graph node.

use crate::phases::WorkflowState;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualState {
    Current,
    Complete,
    Skipped,
    Locked,
    Conditional,
    Required,
    Recommended,
    Optional,
    NotStarted,
}

impl VisualState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualState::Current => "current",
            VisualState::Complete => "complete",
            VisualState::Skipped => "skipped",
            VisualState::Locked => "locked",
            VisualState::Conditional => "conditional",
            VisualState::Required => "required",
            VisualState::Recommended => "recommended",
            VisualState::Optional => "optional",
            VisualState::NotStarted => "not-started",
        }
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a node. Checks short-circuit in order: current, complete, skipped,
/// locked, then the raw status.
///
/// A finished node never shows as locked, and the recommended next workflow
/// always shows as current.
pub fn classify(status: WorkflowState, is_current: bool, dependencies_met: bool) -> VisualState {
    if is_current {
        return VisualState::Current;
    }
    match status {
        WorkflowState::Complete => return VisualState::Complete,
        WorkflowState::Skipped => return VisualState::Skipped,
        _ => {}
    }
    if !dependencies_met {
        return VisualState::Locked;
    }
    match status {
        WorkflowState::Conditional => VisualState::Conditional,
        WorkflowState::Required => VisualState::Required,
        WorkflowState::Recommended => VisualState::Recommended,
        WorkflowState::Optional => VisualState::Optional,
        _ => VisualState::NotStarted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [WorkflowState; 8] = [
        WorkflowState::Complete,
        WorkflowState::NotStarted,
        WorkflowState::Required,
        WorkflowState::Optional,
        WorkflowState::Skipped,
        WorkflowState::Recommended,
        WorkflowState::Conditional,
        WorkflowState::Unknown,
    ];

    #[test]
    fn test_current_overrides_everything() {
        for status in ALL_STATES {
            for met in [true, false] {
                assert_eq!(classify(status, true, met), VisualState::Current);
            }
        }
    }

    #[test]
    fn test_history_beats_lock() {
        assert_eq!(
            classify(WorkflowState::Complete, false, false),
            VisualState::Complete
        );
        assert_eq!(
            classify(WorkflowState::Skipped, false, false),
            VisualState::Skipped
        );
    }

    #[test]
    fn test_unmet_dependencies_lock() {
        for status in [
            WorkflowState::Required,
            WorkflowState::Optional,
            WorkflowState::NotStarted,
            WorkflowState::Conditional,
            WorkflowState::Recommended,
        ] {
            assert_eq!(classify(status, false, false), VisualState::Locked);
        }
    }

    #[test]
    fn test_direct_mapping() {
        assert_eq!(
            classify(WorkflowState::Conditional, false, true),
            VisualState::Conditional
        );
        assert_eq!(
            classify(WorkflowState::Required, false, true),
            VisualState::Required
        );
        assert_eq!(
            classify(WorkflowState::Recommended, false, true),
            VisualState::Recommended
        );
        assert_eq!(
            classify(WorkflowState::Optional, false, true),
            VisualState::Optional
        );
        assert_eq!(
            classify(WorkflowState::NotStarted, false, true),
            VisualState::NotStarted
        );
        assert_eq!(
            classify(WorkflowState::Unknown, false, true),
            VisualState::NotStarted
        );
    }

    #[test]
    fn test_serializes_kebab_case() {
        let json = serde_json::to_string(&VisualState::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
        assert_eq!(VisualState::NotStarted.to_string(), "not-started");
    }
}
