//! Makeover planning orchestrator
//!
//! Runs one request through the pipeline:
//!
//! ```text
//! detections -> inventory -> prompt -> model -> validate -> allocate -> links -> plan
//! ```
//!
//! Style and budget are checked before anything else so a bad request never
//! reaches the model. The model call is the only await point; it is bounded
//! by a timeout and abandoned as soon as the request is cancelled.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::budget::allocate;
use super::links::LinkSynthesizer;
use super::outcome::{DropReason, MakeoverOutcome, PlanWarning, Stage};
use super::validator::validate_response;
use crate::config::Config;
use crate::domain::{BudgetConstraint, BudgetLimits, Detection, MakeoverPlan, RoomInventory, StyleProfile};
use crate::error::MakeoverError;
use crate::inventory::InventoryClassifier;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{BuiltPrompt, PromptBuilder};
use crate::styles::StyleCatalog;

/// One makeover planning request
#[derive(Debug, Clone)]
pub struct MakeoverRequest {
    pub detections: Vec<Detection>,
    pub style_name: String,
    pub budget_ceiling: Decimal,
    /// Most important first
    pub priorities: Vec<String>,
}

impl MakeoverRequest {
    pub fn new(detections: Vec<Detection>, style_name: impl Into<String>, budget_ceiling: Decimal) -> Self {
        Self {
            detections,
            style_name: style_name.into(),
            budget_ceiling,
            priorities: Vec::new(),
        }
    }

    pub fn with_priorities(mut self, priorities: Vec<String>) -> Self {
        self.priorities = priorities;
        self
    }
}

/// Everything computed before the model call
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub inventory: RoomInventory,
    pub style: StyleProfile,
    pub budget: BudgetConstraint,
    pub prompt: BuiltPrompt,
}

/// Sequences the planning pipeline for independent requests
///
/// Holds only shared immutable state, so one orchestrator can serve
/// concurrent `run` calls.
pub struct Orchestrator {
    catalog: Arc<StyleCatalog>,
    client: Arc<dyn LlmClient>,
    prompts: Arc<PromptBuilder>,
    classifier: InventoryClassifier,
    links: LinkSynthesizer,
    limits: BudgetLimits,
    confidence_threshold: f64,
    model_timeout: Duration,
    max_tokens: u32,
}

impl Orchestrator {
    pub fn new(config: &Config, catalog: Arc<StyleCatalog>, prompts: PromptBuilder, client: Arc<dyn LlmClient>) -> Self {
        debug!(client = client.name(), "Orchestrator::new: called");
        Self {
            catalog,
            client,
            prompts: Arc::new(prompts),
            classifier: InventoryClassifier::new(&config.detection),
            links: LinkSynthesizer::new(config.shopping.platforms.clone()),
            limits: config.budget.limits(),
            confidence_threshold: config.planner.confidence_threshold,
            model_timeout: Duration::from_millis(config.planner.model_timeout_ms),
            max_tokens: config.planner.max_tokens,
        }
    }

    /// Validate the request and build the prompt without calling the model
    ///
    /// Returns the failing stage alongside the error.
    pub fn prepare(&self, request: &MakeoverRequest) -> Result<PreparedPrompt, (Stage, MakeoverError)> {
        debug!(style = %request.style_name, ceiling = %request.budget_ceiling, "Orchestrator::prepare: called");

        enter(Stage::DetectionReceived);
        let style = self
            .catalog
            .get_style(&request.style_name)
            .map_err(|e| (Stage::DetectionReceived, e))?
            .clone();
        let budget =
            BudgetConstraint::new(request.budget_ceiling, &self.limits).map_err(|e| (Stage::DetectionReceived, e))?;

        enter(Stage::InventoryClassified);
        let inventory = self.classifier.classify(&request.detections);
        info!(room_type = %inventory.room_type(), objects = inventory.total_objects(), "Room classified");

        enter(Stage::PromptBuilt);
        let prompt = self
            .prompts
            .build(&inventory, &style, &budget, &request.priorities);
        debug!(len = prompt.instruction.len(), "Orchestrator::prepare: prompt built");

        Ok(PreparedPrompt {
            inventory,
            style,
            budget,
            prompt,
        })
    }

    /// Plan one makeover
    pub async fn run(&self, request: MakeoverRequest, cancel: CancellationToken) -> MakeoverOutcome {
        let request_id = Uuid::now_v7();
        let span = info_span!("makeover", %request_id, style = %request.style_name);
        self.run_inner(request, cancel).instrument(span).await
    }

    async fn run_inner(&self, request: MakeoverRequest, cancel: CancellationToken) -> MakeoverOutcome {
        info!(detections = request.detections.len(), ceiling = %request.budget_ceiling, "Planning makeover");

        let prepared = match self.prepare(&request) {
            Ok(prepared) => prepared,
            Err((stage, error)) => return fail(stage, error),
        };

        enter(Stage::ModelInvoked);
        let raw = match self.invoke_model(&prepared.prompt, &cancel).await {
            Ok(raw) => raw,
            Err(error) => return fail(Stage::ModelInvoked, error),
        };

        enter(Stage::ResponseValidated);
        let validated = match validate_response(&raw) {
            Ok(validated) => validated,
            Err(error) => return fail(Stage::ResponseValidated, error),
        };
        let mut warnings = Vec::new();
        if validated.dropped > 0 {
            warnings.push(PlanWarning::ItemsDropped {
                count: validated.dropped,
                reason: DropReason::Invalid,
            });
        }

        enter(Stage::BudgetAllocated);
        let allocation = allocate(validated.items, &prepared.budget);
        if allocation.budget_too_low() {
            let cheapest = allocation
                .skipped
                .iter()
                .map(|item| item.estimated_price)
                .min()
                .unwrap_or_default();
            warn!(ceiling = %prepared.budget.ceiling(), %cheapest, "No suggested item fits the budget");
            warnings.push(PlanWarning::BudgetTooLow {
                ceiling: prepared.budget.ceiling(),
                cheapest,
            });
        } else if !allocation.skipped.is_empty() {
            info!(skipped = allocation.skipped.len(), "Items skipped to stay within budget");
            warnings.push(PlanWarning::ItemsDropped {
                count: allocation.skipped.len(),
                reason: DropReason::OverBudget,
            });
        }

        enter(Stage::LinksSynthesized);
        let items = self.links.attach(allocation.accepted);

        enter(Stage::Complete);
        if validated.confidence < self.confidence_threshold {
            warnings.push(PlanWarning::LowConfidence {
                confidence: validated.confidence,
                threshold: self.confidence_threshold,
            });
        }

        let plan = MakeoverPlan::assemble(
            prepared.inventory.room_type(),
            prepared.style.name,
            prepared.budget,
            items,
            prepared.inventory.description().to_string(),
            validated.narrative,
            validated.confidence,
        );
        info!(
            items = plan.items().len(),
            total = %plan.total_price(),
            remaining = %plan.remaining_budget(),
            confidence = plan.confidence(),
            warnings = warnings.len(),
            "Makeover planned"
        );
        MakeoverOutcome::from_plan(plan, warnings)
    }

    /// Single model call, bounded by the timeout and the cancellation token
    async fn invoke_model(&self, prompt: &BuiltPrompt, cancel: &CancellationToken) -> Result<String, MakeoverError> {
        debug!(client = self.client.name(), timeout = ?self.model_timeout, "Orchestrator::invoke_model: called");
        if cancel.is_cancelled() {
            return Err(MakeoverError::Cancelled);
        }

        let request = CompletionRequest::single(&prompt.system, &prompt.instruction, self.max_tokens);
        let call = tokio::time::timeout(self.model_timeout, self.client.complete(request));

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Request cancelled during model call");
                return Err(MakeoverError::Cancelled);
            }
            result = call => match result {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(MakeoverError::ModelTimeout(self.model_timeout)),
            },
        };

        debug!(
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Orchestrator::invoke_model: response received"
        );
        Ok(response.content.unwrap_or_default())
    }
}

fn enter(stage: Stage) {
    info!(%stage, "Stage");
}

fn fail(stage: Stage, error: MakeoverError) -> MakeoverOutcome {
    warn!(%stage, kind = %error.kind(), %error, "Makeover planning failed");
    MakeoverOutcome::Failure { stage, error }
}
