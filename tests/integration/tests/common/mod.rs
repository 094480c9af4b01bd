//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use treewalk_core::{Instance, VisitError, VisitResult, Visitor};
use treewalk_node::{ContextMap, Node, StateMap};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Element type name for elements, rendered text for primitives.
pub fn label(node: &Node) -> String {
    match node.as_element() {
        Some(element) => element.element_type.name().to_string(),
        None => node.primitive_text().unwrap_or_default(),
    }
}

pub fn map(value: Value) -> StateMap {
    value.as_object().cloned().unwrap_or_default()
}

/// One visitor call as seen by [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub label: String,
    pub has_instance: bool,
    pub context: ContextMap,
    pub child_context: Option<ContextMap>,
}

/// A visitor logging every call, with optional pruning and delays per label.
#[derive(Default)]
pub struct Recorder {
    log: Mutex<Vec<String>>,
    visits: Mutex<Vec<Visit>>,
    prune: HashSet<String>,
    delays: HashMap<String, Duration>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prunes elements with this label.
    pub fn prune(mut self, label: &str) -> Self {
        self.prune.insert(label.to_string());
        self
    }

    /// Sleeps inside the visitor for nodes with this label, then logs `"<label> done"`.
    pub fn delay(mut self, label: &str, millis: u64) -> Self {
        self.delays
            .insert(label.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    pub fn visits(&self) -> Vec<Visit> {
        self.visits.lock().clone()
    }
}

#[async_trait]
impl Visitor for Recorder {
    async fn visit(
        &self,
        node: &Node,
        instance: Option<&mut Instance>,
        context: &ContextMap,
        child_context: Option<&ContextMap>,
    ) -> Result<VisitResult, VisitError> {
        let label = label(node);
        self.log.lock().push(label.clone());
        self.visits.lock().push(Visit {
            label: label.clone(),
            has_instance: instance.is_some(),
            context: context.clone(),
            child_context: child_context.cloned(),
        });

        if let Some(delay) = self.delays.get(&label) {
            tokio::time::sleep(*delay).await;
            self.log.lock().push(format!("{label} done"));
        }

        if self.prune.contains(&label) {
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }
}
