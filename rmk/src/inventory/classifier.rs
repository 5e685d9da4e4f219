//! Room Inventory Classifier
//!
//! Turns raw detections into a normalized label inventory and a room type.
//! Classification never fails: a photo with nothing recognizable is simply a
//! `general` room with an empty inventory.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::config::DetectionConfig;
use crate::domain::{Detection, RoomInventory, RoomType};

/// Signature labels per candidate room type
const SIGNATURES: &[(RoomType, &[&str])] = &[
    (RoomType::Bedroom, &["bed", "mattress", "nightstand", "dresser", "wardrobe"]),
    (RoomType::LivingRoom, &["sofa", "tv", "coffee_table", "armchair", "remote"]),
    (RoomType::Kitchen, &["stove", "oven", "refrigerator", "microwave", "toaster"]),
    (RoomType::Office, &["desk", "monitor", "computer", "laptop", "keyboard"]),
    (RoomType::DiningRoom, &["dining_table", "chair"]),
];

/// Chairs only signal a dining room when there are at least this many
const DINING_CHAIR_MIN: u32 = 4;

/// Label aliases folded onto one canonical label
const ALIASES: &[(&str, &str)] = &[
    ("couch", "sofa"),
    ("settee", "sofa"),
    ("television", "tv"),
    ("tvmonitor", "tv"),
    ("fridge", "refrigerator"),
    ("chairs", "chair"),
    ("dining_chair", "chair"),
    ("remote_control", "remote"),
    ("night_stand", "nightstand"),
    ("bedside_table", "nightstand"),
    ("cooktop", "stove"),
    ("range", "stove"),
    ("computer_monitor", "monitor"),
    ("diningtable", "dining_table"),
    ("pottedplant", "potted_plant"),
];

/// Classifies detections into a [`RoomInventory`]
#[derive(Debug, Clone)]
pub struct InventoryClassifier {
    min_confidence: f64,
    ignored_labels: BTreeSet<String>,
}

impl Default for InventoryClassifier {
    fn default() -> Self {
        Self::new(&DetectionConfig::default())
    }
}

impl InventoryClassifier {
    pub fn new(config: &DetectionConfig) -> Self {
        debug!(min_confidence = config.min_confidence, ignored = ?config.ignored_labels, "InventoryClassifier::new: called");
        Self {
            min_confidence: config.min_confidence,
            ignored_labels: config.ignored_labels.iter().map(|l| normalize_label(l)).collect(),
        }
    }

    /// Aggregate detections and derive the room type
    pub fn classify(&self, detections: &[Detection]) -> RoomInventory {
        debug!(detection_count = detections.len(), "InventoryClassifier::classify: called");
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();

        for detection in detections {
            if !detection.is_usable(self.min_confidence) {
                debug!(label = %detection.label, confidence = detection.confidence, "InventoryClassifier::classify: skipping low-confidence detection");
                continue;
            }
            let label = normalize_label(&detection.label);
            if self.ignored_labels.contains(&label) {
                debug!(%label, "InventoryClassifier::classify: skipping ignored label");
                continue;
            }
            *counts.entry(label).or_insert(0) += 1;
        }

        let room_type = classify_room_type(&counts);
        let description = describe(room_type, &counts);
        info!(%room_type, distinct = counts.len(), "Classified room");

        RoomInventory::new(room_type, counts, description)
    }
}

/// Canonical form of a detector label: lowercase, `_`-separated, aliases folded
pub fn normalize_label(label: &str) -> String {
    let normalized = label
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(normalized)
}

/// Number of signature labels of `room_type` present in the counts
fn score(room_type: RoomType, signature: &[&str], counts: &BTreeMap<String, u32>) -> u32 {
    signature
        .iter()
        .filter(|label| {
            let count = counts.get(**label).copied().unwrap_or(0);
            if room_type == RoomType::DiningRoom && **label == "chair" {
                count >= DINING_CHAIR_MIN
            } else {
                count > 0
            }
        })
        .count() as u32
}

/// Highest signature score wins; ties go to the earlier room in priority order
fn classify_room_type(counts: &BTreeMap<String, u32>) -> RoomType {
    let mut best = (RoomType::General, 0u32);
    for room_type in RoomType::PRIORITY {
        let Some((_, signature)) = SIGNATURES.iter().find(|(rt, _)| *rt == room_type) else {
            continue;
        };
        let room_score = score(room_type, signature, counts);
        debug!(%room_type, room_score, "classify_room_type: scored");
        if room_score > best.1 {
            best = (room_type, room_score);
        }
    }
    best.0
}

/// Deterministic natural-language description of the inventory
fn describe(room_type: RoomType, counts: &BTreeMap<String, u32>) -> String {
    if counts.is_empty() {
        return "A minimal or empty room with very few recognizable furniture items.".to_string();
    }

    let parts: Vec<String> = counts
        .iter()
        .map(|(label, count)| {
            let words = label.replace('_', " ");
            if *count > 1 {
                format!("{} {}", count, pluralize(&words))
            } else {
                format!("{} {}", article(&words), words)
            }
        })
        .collect();

    let items_text = match parts.as_slice() {
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
        [] => String::new(),
    };

    let kinds = counts.len();
    format!(
        "This appears to be {} {} containing {}. The space has {} different type{} of furniture and objects.",
        article(room_type.title()),
        room_type.title(),
        items_text,
        kinds,
        if kinds == 1 { "" } else { "s" }
    )
}

fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn pluralize(words: &str) -> String {
    if words.ends_with('s') || words.ends_with('x') || words.ends_with("ch") || words.ends_with("sh") {
        format!("{}es", words)
    } else {
        format!("{}s", words)
    }
}
