//! Studio configuration (`config.yaml`).
//!
//! ```yaml
//! log_level: debug
//! labels:
//!   overrides:
//!     retrospective: Retro
//!   uppercase: [qa]
//! navigation:
//!   excluded_workflows: [create-story, dev-story, code-review]
//! ```
//!
//! A missing file means defaults. Label entries extend the built-in rules.

use crate::error::Result;
use crate::graph::GraphBuilder;
use crate::label::{LabelFormatter, LabelRules};
use crate::session::GraphSession;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workflows forming the story/dev/review loop.
const DEV_LOOP_WORKFLOWS: &[&str] = &["create-story", "dev-story", "code-review"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Flagged `exclude_from_primary_navigation` when phases load.
    pub excluded_workflows: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            excluded_workflows: DEV_LOOP_WORKFLOWS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub log_level: String,
    pub labels: LabelRules,
    pub navigation: NavigationConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            labels: LabelRules {
                overrides: Default::default(),
                uppercase: Vec::new(),
                strip_prefixes: Vec::new(),
            },
            navigation: NavigationConfig::default(),
        }
    }
}

/// `<config dir>/workflow-studio/config.yaml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workflow-studio")
        .join("config.yaml")
}

impl StudioConfig {
    /// Load from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Built-in label rules extended with the configured ones.
    pub fn label_formatter(&self) -> LabelFormatter {
        let mut rules = LabelRules::default();
        rules.extend(&self.labels);
        LabelFormatter::new(rules)
    }

    pub fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new(self.label_formatter())
    }

    pub fn session(&self) -> GraphSession {
        GraphSession::new(
            self.graph_builder(),
            self.navigation.excluded_workflows.clone(),
        )
    }
}
