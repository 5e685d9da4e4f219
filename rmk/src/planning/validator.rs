//! Plan response validation
//!
//! Turns decoded model output into typed items, tolerating the common ways
//! models drift from the output contract. Every tolerance is counted as a
//! repair and costs confidence.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::repair::{DecodeOutcome, decode};
use crate::domain::{ItemCategory, PlanNarrative, SuggestedItem};
use crate::error::MakeoverError;

/// Confidence multiplier per decode-level repair action
pub const DECODE_REPAIR_FACTOR: f64 = 0.85;

/// Quality multiplier per item-level repair action
pub const ITEM_REPAIR_FACTOR: f64 = 0.9;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:₹|rs\.?|inr)?\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*(?:/-|inr|rs\.?|rupees)?$")
        .expect("price pattern is valid")
});

/// Validated items plus everything the orchestrator needs to score them
#[derive(Debug, Clone)]
pub struct ValidatedResponse {
    pub items: Vec<SuggestedItem>,
    pub narrative: PlanNarrative,
    pub confidence: f64,
    pub decode_repairs: u32,
    pub item_repairs: u32,
    pub dropped: usize,
}

/// Confidence from decode repairs and per-item qualities
///
/// A dropped item contributes quality 0.
pub fn confidence(decode_repairs: u32, item_qualities: &[f64]) -> f64 {
    if item_qualities.is_empty() {
        return 0.0;
    }
    let mean = item_qualities.iter().sum::<f64>() / item_qualities.len() as f64;
    let score = DECODE_REPAIR_FACTOR.powi(decode_repairs as i32) * (0.5 + 0.5 * mean);
    score.clamp(0.0, 1.0)
}

fn item_quality(repairs: u32) -> f64 {
    ITEM_REPAIR_FACTOR.powi(repairs as i32)
}

/// Decode, repair and validate raw model text
pub fn validate_response(raw: &str) -> Result<ValidatedResponse, MakeoverError> {
    debug!(len = raw.len(), "validate_response: called");
    let outcome = decode(raw);
    let decode_repairs = outcome.repair_count();
    debug!(outcome = outcome.tag(), %decode_repairs, "validate_response: decoded");

    let value = match outcome {
        DecodeOutcome::Decoded(value) | DecodeOutcome::Repaired { value, .. } => value,
        DecodeOutcome::Failed { error, .. } => {
            return Err(MakeoverError::PlanGeneration(format!(
                "model response is not valid JSON after repair: {}",
                error
            )));
        }
    };

    let (raw_items, narrative) = match value {
        Value::Array(items) => (items, PlanNarrative::default()),
        Value::Object(mut map) => {
            let items = match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            (items, narrative_from(&map))
        }
        other => {
            return Err(MakeoverError::PlanGeneration(format!(
                "model response is a JSON {} rather than an object or array",
                json_kind(&other)
            )));
        }
    };

    let mut items = Vec::new();
    let mut qualities = Vec::with_capacity(raw_items.len());
    let mut item_repairs = 0;
    let mut dropped = 0;

    for (index, raw_item) in raw_items.iter().enumerate() {
        match parse_item(raw_item) {
            Some((item, repairs)) => {
                debug!(%index, name = %item.name, %repairs, "validate_response: item accepted");
                item_repairs += repairs;
                qualities.push(item_quality(repairs));
                items.push(item);
            }
            None => {
                warn!(%index, "Dropping model item missing name, description or a valid price");
                dropped += 1;
                qualities.push(0.0);
            }
        }
    }

    if items.is_empty() {
        return Err(MakeoverError::PlanGeneration(format!(
            "model response contains no valid items ({} dropped)",
            dropped
        )));
    }

    let confidence = confidence(decode_repairs, &qualities);
    debug!(%confidence, %item_repairs, %dropped, "validate_response: scored");

    Ok(ValidatedResponse {
        items,
        narrative,
        confidence,
        decode_repairs,
        item_repairs,
        dropped,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn narrative_from(map: &Map<String, Value>) -> PlanNarrative {
    PlanNarrative {
        summary: text_field(map, &["summary", "makeover_summary"]),
        styling_tips: text_field(map, &["styling_tips"]),
        room_analysis: text_field(map, &["room_analysis"]),
        style_direction: text_field(map, &["style_direction"]),
    }
}

/// First present key as text; lists of strings are joined by newlines
fn text_field(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| match map.get(*key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Array(parts) => Some(
                parts
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        })
        .unwrap_or_default()
}

/// Parse one item, returning it with its repair count, or None to drop it
fn parse_item(value: &Value) -> Option<(SuggestedItem, u32)> {
    let map = value.as_object()?;
    let mut repairs = 0;

    let name = required_text(map, "name")?;
    let description = required_text(map, "description")?;

    let price_value = match map.get("estimated_price") {
        Some(v) => v,
        None => {
            repairs += 1;
            map.get("price")?
        }
    };
    let (price, coerced) = parse_price(price_value)?;
    if coerced {
        repairs += 1;
    }

    let style_rationale = match map.get("style_rationale").and_then(Value::as_str) {
        Some(s) => s.trim().to_string(),
        None => match map.get("style_impact").and_then(Value::as_str) {
            Some(s) => {
                repairs += 1;
                s.trim().to_string()
            }
            None => String::new(),
        },
    };

    let search_keywords = match map.get("search_keywords") {
        Some(Value::Array(words)) => {
            let keywords: Vec<String> = words
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if keywords.len() != words.len() {
                repairs += 1;
            }
            keywords
        }
        Some(Value::String(joined)) => {
            repairs += 1;
            joined
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }
        Some(_) => {
            repairs += 1;
            Vec::new()
        }
        None => Vec::new(),
    };

    let category = match map.get("category").and_then(Value::as_str) {
        Some(raw) => match ItemCategory::from_str(raw) {
            Ok(category) => Some(category),
            Err(e) => {
                debug!(error = %e, "parse_item: ignoring category");
                repairs += 1;
                None
            }
        },
        None => None,
    };

    let mut item = SuggestedItem::new(name, description, price)
        .with_rationale(style_rationale)
        .with_keywords(search_keywords);
    item.category = category;
    Some((item, repairs))
}

fn required_text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Non-negative price, and whether it had to be coerced from text
fn parse_price(value: &Value) -> Option<(Decimal, bool)> {
    let (price, coerced) = match value {
        Value::Number(n) => (number_to_decimal(n)?, false),
        Value::String(s) => (parse_price_text(s)?, true),
        _ => return None,
    };
    if price.is_sign_negative() && !price.is_zero() {
        debug!(%price, "parse_price: negative price");
        return None;
    }
    Some((price.normalize(), coerced))
}

fn number_to_decimal(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Parse prices such as "₹1,299", "Rs. 850/-" or "2500 INR"
pub fn parse_price_text(text: &str) -> Option<Decimal> {
    let captures = PRICE_RE.captures(text.trim())?;
    let digits = captures.get(1)?.as_str().replace(',', "");
    Decimal::from_str(&digits).ok()
}
