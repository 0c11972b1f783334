//! Snapshot loading for `PhasesResponse` / `WorkflowStatus` payloads.
//!
//! The backend fetch itself lives outside this crate; these helpers parse what
//! it hands over, either as a string (IPC) or a file on disk (CLI, fixtures).

use crate::error::Result;
use crate::phases::{PhasesResponse, WorkflowStatus};
use crate::util::parse_json_safe;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

pub fn parse_phases(json: &str) -> Result<PhasesResponse> {
    Ok(parse_json_safe(json)?)
}

pub fn parse_status(json: &str) -> Result<WorkflowStatus> {
    Ok(parse_json_safe(json)?)
}

pub async fn read_phases(path: &Path) -> Result<PhasesResponse> {
    let phases: PhasesResponse = read_json(path).await?;
    debug!(
        path = %path.display(),
        phases = phases.phases.len(),
        "loaded phase definitions"
    );
    Ok(phases)
}

pub async fn read_status(path: &Path) -> Result<WorkflowStatus> {
    let status: WorkflowStatus = read_json(path).await?;
    debug!(
        path = %path.display(),
        workflows = status.workflow_statuses.len(),
        "loaded workflow status"
    );
    Ok(status)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_json_safe(&content)?)
}
