//! Scripted stand-ins for stages and operators.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::{LibraryItem, ProductId, StageKind, StatusOutcome};
use crate::decision::{DecisionRequest, DecisionSurface, OperatorChoice};
use crate::errors::{LiberatorError, Result};
use crate::stages::{Stage, StageContext};

/// A stage that succeeds unless told otherwise for a given item.
///
/// Decrypts audio unless another kind is set.
#[derive(Debug)]
pub struct ScriptedStage {
    name: String,
    kind: StageKind,
    requires_document: bool,
    failures: Mutex<HashMap<ProductId, StatusOutcome>>,
    panics: Mutex<HashSet<ProductId>>,
    cancels: Mutex<HashSet<ProductId>>,
    calls: Mutex<Vec<ProductId>>,
}

impl ScriptedStage {
    /// Creates a stage that succeeds for every item.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StageKind::DecryptAudio,
            requires_document: false,
            failures: Mutex::new(HashMap::new()),
            panics: Mutex::new(HashSet::new()),
            cancels: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the stage kind.
    #[must_use]
    pub fn with_kind(mut self, kind: StageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Only validates items that ship with a document.
    #[must_use]
    pub fn only_with_document(mut self) -> Self {
        self.requires_document = true;
        self
    }

    /// Fails the given item with these messages.
    pub fn fail_on<I, S>(&self, product_id: &str, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failures
            .lock()
            .insert(ProductId::from(product_id), StatusOutcome::fail_many(messages));
    }

    /// Lets the given item succeed again.
    pub fn succeed_on(&self, product_id: &str) {
        self.failures.lock().remove(&ProductId::from(product_id));
        self.panics.lock().remove(&ProductId::from(product_id));
    }

    /// Panics while processing the given item.
    pub fn panic_on(&self, product_id: &str) {
        self.panics.lock().insert(ProductId::from(product_id));
    }

    /// Cancels the run while processing the given item, then succeeds.
    pub fn cancel_on(&self, product_id: &str) {
        self.cancels.lock().insert(ProductId::from(product_id));
    }

    /// Returns the number of times the stage was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the ids the stage was called with, in order.
    #[must_use]
    pub fn invoked_ids(&self) -> Vec<String> {
        self.calls.lock().iter().map(ToString::to_string).collect()
    }
}

#[async_trait]
impl Stage for ScriptedStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        self.kind
    }

    fn validate(&self, item: &LibraryItem) -> bool {
        !self.requires_document || item.has_document
    }

    async fn process(&self, item: &LibraryItem, ctx: &StageContext) -> StatusOutcome {
        self.calls.lock().push(item.product_id.clone());

        if self.panics.lock().contains(&item.product_id) {
            panic!("scripted panic for {}", item.product_id);
        }
        if self.cancels.lock().contains(&item.product_id) {
            ctx.cancellation().cancel("scripted cancellation");
        }

        self.failures
            .lock()
            .get(&item.product_id)
            .cloned()
            .unwrap_or(StatusOutcome::Success)
    }
}

/// A decision surface answering from a queue of scripted choices.
///
/// Running out of choices is a decision-surface error.
#[derive(Debug, Default)]
pub struct ScriptedDecisionSurface {
    choices: Mutex<VecDeque<OperatorChoice>>,
    requests: Mutex<Vec<DecisionRequest>>,
    keep_going_checks: Mutex<Option<usize>>,
}

impl ScriptedDecisionSurface {
    /// Creates a surface with no scripted answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an answer.
    pub fn push(&self, choice: OperatorChoice) {
        self.choices.lock().push_back(choice);
    }

    /// Clears the keep-going flag after it has been read `checks` times.
    pub fn stop_keep_going_after(&self, checks: usize) {
        *self.keep_going_checks.lock() = Some(checks);
    }

    /// Returns every prompt received.
    #[must_use]
    pub fn requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DecisionSurface for ScriptedDecisionSurface {
    async fn decide(&self, request: &DecisionRequest) -> Result<OperatorChoice> {
        self.requests.lock().push(request.clone());
        self.choices
            .lock()
            .pop_front()
            .ok_or_else(|| LiberatorError::Decision("no scripted choice left".to_string()))
    }

    fn keep_going(&self) -> bool {
        let mut checks = self.keep_going_checks.lock();
        match checks.as_mut() {
            None => true,
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
        }
    }
}
