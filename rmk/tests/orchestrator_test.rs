//! Integration tests for the makeover planning pipeline
//!
//! These tests drive `Orchestrator::run` end to end with scripted model clients.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use roommakeover::config::Config;
use roommakeover::domain::{Detection, RoomType};
use roommakeover::error::{ErrorKind, MakeoverError};
use roommakeover::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use roommakeover::planning::{DropReason, MakeoverOutcome, MakeoverRequest, MakeoverResponse, Orchestrator, PlanWarning, Stage};
use roommakeover::prompts::PromptBuilder;
use roommakeover::styles::StyleCatalog;

const BEDROOM_RESPONSE: &str = include_str!("../../demos/bedroom_response.json");
const TRUNCATED_RESPONSE: &str = include_str!("../../demos/truncated_response.json");

/// Answers with a fixed reply, optionally after a delay
struct ScriptedClient {
    reply: Result<String, u16>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Ok(text) => Ok(CompletionResponse::text(text.clone())),
            Err(status) => Err(LlmError::ApiError {
                status: *status,
                message: "scripted failure".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn orchestrator_with(config: &Config, client: Arc<ScriptedClient>) -> Orchestrator {
    Orchestrator::new(config, Arc::new(StyleCatalog::builtin()), PromptBuilder::embedded(), client)
}

fn orchestrator(client: Arc<ScriptedClient>) -> Orchestrator {
    orchestrator_with(&Config::default(), client)
}

fn bedroom_request(style: &str, ceiling: i64) -> MakeoverRequest {
    MakeoverRequest::new(
        vec![Detection::new("bed", 0.92), Detection::new("wardrobe", 0.81)],
        style,
        Decimal::from(ceiling),
    )
}

fn items_json(prices: &[i64]) -> String {
    let items: Vec<serde_json::Value> = prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            serde_json::json!({
                "name": format!("Item {}", i + 1),
                "description": "A useful thing",
                "estimated_price": price,
                "style_rationale": "Fits the style",
                "search_keywords": [format!("item {}", i + 1)],
            })
        })
        .collect();
    serde_json::json!({"items": items, "summary": "ok", "styling_tips": "tidy up"}).to_string()
}

// =============================================================================
// Success paths
// =============================================================================

#[tokio::test]
async fn test_scandinavian_bedroom_success() {
    let client = ScriptedClient::replying(BEDROOM_RESPONSE);
    let outcome = orchestrator(client.clone())
        .run(bedroom_request("scandinavian", 8000), CancellationToken::new())
        .await;

    let plan = match outcome {
        MakeoverOutcome::Success(plan) => plan,
        other => panic!("expected success, got {:?}", other),
    };

    assert_eq!(plan.room_type(), RoomType::Bedroom);
    assert_eq!(plan.items().len(), 3);
    assert_eq!(plan.total_price(), Decimal::from(6200));
    assert_eq!(plan.remaining_budget(), Decimal::from(1800));
    assert_eq!(plan.confidence(), 1.0);
    assert!(plan.room_description().contains("Bedroom"));
    assert!(!plan.summary().is_empty());
    assert_eq!(client.calls(), 1);

    for planned in plan.items() {
        assert_eq!(planned.shopping_links.len(), 4);
    }
    assert_eq!(
        plan.items()[0].shopping_links[0].url,
        "https://www.amazon.in/s?k=wool+rug+off+white+5x7"
    );
}

#[tokio::test]
async fn test_success_envelope_json() {
    let client = ScriptedClient::replying(BEDROOM_RESPONSE);
    let outcome = orchestrator(client)
        .run(bedroom_request("Scandinavian", 8000), CancellationToken::new())
        .await;

    let value = serde_json::to_value(MakeoverResponse::from(outcome)).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["plan"]["room_type"], "bedroom");
    assert_eq!(value["plan"]["style"], "scandinavian");
    assert_eq!(value["plan"]["total_price"], "6200");
    assert_eq!(value["plan"]["remaining_budget"], "1800");
    assert_eq!(value["plan"]["budget"]["currency"], "INR");
    assert_eq!(value["warnings"], serde_json::json!([]));
    assert!(value["error"].is_null());
}

#[tokio::test]
async fn test_concurrent_runs_share_orchestrator() {
    let client = ScriptedClient::replying(BEDROOM_RESPONSE);
    let orchestrator = Arc::new(orchestrator(client.clone()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .run(bedroom_request("scandinavian", 8000), CancellationToken::new())
                    .await
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap();
        assert_eq!(outcome.status(), "success");
    }
    assert_eq!(client.calls(), 4);
}

// =============================================================================
// Partial success
// =============================================================================

#[tokio::test]
async fn test_missing_bracket_is_partial_success() {
    let client = ScriptedClient::replying(TRUNCATED_RESPONSE);
    let outcome = orchestrator(client)
        .run(bedroom_request("scandinavian", 8000), CancellationToken::new())
        .await;

    match outcome {
        MakeoverOutcome::PartialSuccess { plan, warnings } => {
            assert!(plan.confidence() > 0.0);
            assert!(plan.confidence() < 1.0);
            assert_eq!(plan.total_price(), Decimal::from(6200));
            assert!(
                warnings
                    .iter()
                    .any(|w| matches!(w, PlanWarning::LowConfidence { .. }))
            );
        }
        other => panic!("expected partial success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_budget_too_low_is_non_fatal() {
    let client = ScriptedClient::replying(&items_json(&[12_000, 9_000]));
    let outcome = orchestrator(client)
        .run(bedroom_request("modern", 500), CancellationToken::new())
        .await;

    match outcome {
        MakeoverOutcome::PartialSuccess { plan, warnings } => {
            assert!(plan.items().is_empty());
            assert_eq!(plan.total_price(), Decimal::ZERO);
            assert_eq!(plan.remaining_budget(), Decimal::from(500));
            assert_eq!(
                warnings,
                vec![PlanWarning::BudgetTooLow {
                    ceiling: Decimal::from(500),
                    cheapest: Decimal::from(9000),
                }]
            );
        }
        other => panic!("expected partial success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_over_budget_items_are_skipped() {
    let client = ScriptedClient::replying(&items_json(&[3000, 4000, 1500]));
    let outcome = orchestrator(client)
        .run(bedroom_request("industrial", 5000), CancellationToken::new())
        .await;

    match outcome {
        MakeoverOutcome::PartialSuccess { plan, warnings } => {
            let names: Vec<&str> = plan.items().iter().map(|p| p.item.name.as_str()).collect();
            assert_eq!(names, vec!["Item 1", "Item 3"]);
            assert_eq!(plan.total_price(), Decimal::from(4500));
            assert_eq!(plan.remaining_budget(), Decimal::from(500));
            assert_eq!(
                warnings,
                vec![PlanWarning::ItemsDropped {
                    count: 1,
                    reason: DropReason::OverBudget,
                }]
            );
        }
        other => panic!("expected partial success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_price_at_decimal_limit_is_skipped() {
    let response = r#"{"items": [
        {"name": "Table Lamp", "description": "Brass lamp", "estimated_price": 1000,
         "style_rationale": "Warm light", "search_keywords": ["brass table lamp"]},
        {"name": "Gold Throne", "description": "Solid gold", "estimated_price": "79,228,162,514,264,337,593,543,950,335",
         "style_rationale": "Opulent", "search_keywords": ["throne"]}
    ]}"#;
    let client = ScriptedClient::replying(response);
    let outcome = orchestrator(client)
        .run(bedroom_request("traditional", 8000), CancellationToken::new())
        .await;

    match outcome {
        MakeoverOutcome::PartialSuccess { plan, warnings } => {
            assert_eq!(plan.items().len(), 1);
            assert_eq!(plan.items()[0].item.name, "Table Lamp");
            assert_eq!(plan.total_price(), Decimal::from(1000));
            assert_eq!(plan.remaining_budget(), Decimal::from(7000));
            assert_eq!(
                warnings,
                vec![PlanWarning::ItemsDropped {
                    count: 1,
                    reason: DropReason::OverBudget,
                }]
            );
        }
        other => panic!("expected partial success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_custom_confidence_threshold() {
    let mut config = Config::default();
    config.planner.confidence_threshold = 0.8;

    let client = ScriptedClient::replying(TRUNCATED_RESPONSE);
    let outcome = orchestrator_with(&config, client)
        .run(bedroom_request("scandinavian", 8000), CancellationToken::new())
        .await;
    assert_eq!(outcome.status(), "success");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_unknown_style_fails_without_model_call() {
    let client = ScriptedClient::replying(BEDROOM_RESPONSE);
    let outcome = orchestrator(client.clone())
        .run(bedroom_request("zen", 8000), CancellationToken::new())
        .await;

    let response = MakeoverResponse::from(outcome);
    assert_eq!(response.status, "failure");
    let error = response.error.unwrap();
    assert_eq!(error.kind, ErrorKind::ConfigurationError);
    assert_eq!(error.stage, Stage::DetectionReceived);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_model_timeout() {
    let mut config = Config::default();
    config.planner.model_timeout_ms = 50;

    let client = ScriptedClient::slow(BEDROOM_RESPONSE, Duration::from_secs(30));
    let outcome = orchestrator_with(&config, client)
        .run(bedroom_request("modern", 8000), CancellationToken::new())
        .await;

    match outcome {
        MakeoverOutcome::Failure { stage, error } => {
            assert_eq!(stage, Stage::ModelInvoked);
            assert!(matches!(error, MakeoverError::ModelTimeout(_)));
            assert_eq!(error.kind(), ErrorKind::ModelTimeout);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancellation_during_model_call() {
    let client = ScriptedClient::slow(BEDROOM_RESPONSE, Duration::from_secs(30));
    let orchestrator = orchestrator(client.clone());
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        })
    };

    let outcome = orchestrator.run(bedroom_request("bohemian", 8000), cancel).await;
    canceller.await.unwrap();

    match outcome {
        MakeoverOutcome::Failure { stage, error } => {
            assert_eq!(stage, Stage::ModelInvoked);
            assert_eq!(error.kind(), ErrorKind::Cancelled);
        }
        other => panic!("expected cancellation, got {:?}", other),
    }
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_model_unavailable() {
    let client = ScriptedClient::failing(503);
    let outcome = orchestrator(client)
        .run(bedroom_request("traditional", 8000), CancellationToken::new())
        .await;

    match outcome {
        MakeoverOutcome::Failure { stage, error } => {
            assert_eq!(stage, Stage::ModelInvoked);
            assert_eq!(error.kind(), ErrorKind::ModelUnavailable);
            assert!(error.to_string().contains("503"));
        }
        other => panic!("expected unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_response_is_plan_generation_failure() {
    let client = ScriptedClient::replying("I'm sorry, I can't see the room.");
    let outcome = orchestrator(client)
        .run(bedroom_request("coastal", 8000), CancellationToken::new())
        .await;

    match outcome {
        MakeoverOutcome::Failure { stage, error } => {
            assert_eq!(stage, Stage::ResponseValidated);
            assert_eq!(error.kind(), ErrorKind::PlanGenerationFailure);
        }
        other => panic!("expected plan generation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_detections_plan_for_general_room() {
    let client = ScriptedClient::replying(BEDROOM_RESPONSE);
    let request = MakeoverRequest::new(vec![], "minimalist", Decimal::from(8000));
    let outcome = orchestrator(client).run(request, CancellationToken::new()).await;

    let plan = outcome.plan().expect("plan");
    assert_eq!(plan.room_type(), RoomType::General);
}
