//! Display labels for workflow identifiers.
//!
//! `create-product-brief` becomes "Product Brief", `create-prd` becomes "PRD".
//! A fixed override table handles ids whose mechanical label reads badly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Rules driving label formatting. Configured values extend the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRules {
    /// Exact workflow id → label, returned verbatim.
    pub overrides: HashMap<String, String>,
    /// Tokens rendered fully uppercase (matched lowercase).
    pub uppercase: Vec<String>,
    /// Prefixes stripped before tokenizing, first match wins.
    pub strip_prefixes: Vec<String>,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            overrides: HashMap::from([(
                "check-implementation-readiness".to_string(),
                "Readiness Check".to_string(),
            )]),
            uppercase: ["prd", "ux", "ci", "nfr", "atdd"]
                .into_iter()
                .map(String::from)
                .collect(),
            strip_prefixes: vec!["create-".to_string(), "dev-".to_string()],
        }
    }
}

impl LabelRules {
    /// Merge user-supplied rules on top of these.
    pub fn extend(&mut self, other: &LabelRules) {
        self.overrides
            .extend(other.overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        for token in &other.uppercase {
            let token = token.to_lowercase();
            if !self.uppercase.contains(&token) {
                self.uppercase.push(token);
            }
        }
        for prefix in &other.strip_prefixes {
            if !self.strip_prefixes.contains(prefix) {
                self.strip_prefixes.push(prefix.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelFormatter {
    rules: LabelRules,
}

impl LabelFormatter {
    pub fn new(rules: LabelRules) -> Self {
        Self { rules }
    }

    pub fn format(&self, workflow_id: &str) -> String {
        if let Some(label) = self.rules.overrides.get(workflow_id) {
            return label.clone();
        }

        let stem = self
            .rules
            .strip_prefixes
            .iter()
            .find_map(|prefix| workflow_id.strip_prefix(prefix.as_str()))
            .unwrap_or(workflow_id);

        stem.split('-')
            .map(|token| self.format_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn format_token(&self, token: &str) -> String {
        let lower = token.to_lowercase();
        if self.rules.uppercase.iter().any(|u| *u == lower) {
            return token.to_uppercase();
        }
        let mut chars = token.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

fn default_formatter() -> &'static LabelFormatter {
    static FORMATTER: OnceLock<LabelFormatter> = OnceLock::new();
    FORMATTER.get_or_init(LabelFormatter::default)
}

/// Format a workflow id with the default rules.
pub fn format_label(workflow_id: &str) -> String {
    default_formatter().format(workflow_id)
}
