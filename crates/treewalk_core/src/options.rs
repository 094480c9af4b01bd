//! Walk options.

use serde::{Deserialize, Serialize};

use crate::WalkError;

/// Options recognized by the walker.
///
/// Unknown keys are ignored when parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkOptions {
    /// Invoke `componentWillUnmount` once a class component's subtree has been walked.
    /// Default: false
    #[serde(default)]
    pub component_will_unmount: bool,
}

impl WalkOptions {
    /// Creates `WalkOptions` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables unmount hooks.
    pub fn component_will_unmount(mut self, yes: bool) -> Self {
        self.component_will_unmount = yes;
        self
    }

    /// Parses options from a JSON object such as `{"componentWillUnmount": true}`.
    pub fn from_json(json: &str) -> Result<Self, WalkError> {
        serde_json::from_str(json).map_err(|e| WalkError::config(e.to_string()))
    }
}
