//! Room type and inventory domain types

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Room category derived from detected furniture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Bedroom,
    LivingRoom,
    Kitchen,
    Office,
    DiningRoom,
    #[default]
    General,
}

impl RoomType {
    /// All room types in tie-break priority order (highest first)
    pub const PRIORITY: [RoomType; 6] = [
        RoomType::Bedroom,
        RoomType::LivingRoom,
        RoomType::Kitchen,
        RoomType::Office,
        RoomType::DiningRoom,
        RoomType::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bedroom => "bedroom",
            Self::LivingRoom => "living_room",
            Self::Kitchen => "kitchen",
            Self::Office => "office",
            Self::DiningRoom => "dining_room",
            Self::General => "general",
        }
    }

    /// Human-readable title, e.g. "Living Room"
    pub fn title(&self) -> &'static str {
        match self {
            Self::Bedroom => "Bedroom",
            Self::LivingRoom => "Living Room",
            Self::Kitchen => "Kitchen",
            Self::Office => "Office",
            Self::DiningRoom => "Dining Room",
            Self::General => "General Room",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated, normalized object inventory of one room photo
///
/// Built once by the classifier and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInventory {
    room_type: RoomType,
    counts: BTreeMap<String, u32>,
    distinct_labels: BTreeSet<String>,
    description: String,
}

impl RoomInventory {
    pub(crate) fn new(room_type: RoomType, counts: BTreeMap<String, u32>, description: String) -> Self {
        debug!(%room_type, label_count = counts.len(), "RoomInventory::new: called");
        let distinct_labels = counts.keys().cloned().collect();
        Self {
            room_type,
            counts,
            distinct_labels,
            description,
        }
    }

    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    pub fn counts(&self) -> &BTreeMap<String, u32> {
        &self.counts
    }

    pub fn distinct_labels(&self) -> &BTreeSet<String> {
        &self.distinct_labels
    }

    /// Natural-language description of the room contents
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Count for a normalized label (0 when absent)
    pub fn count(&self, label: &str) -> u32 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Total number of counted objects
    pub fn total_objects(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Inventory rendered as `label: count` pairs in label order
    pub fn counts_line(&self) -> String {
        self.counts
            .iter()
            .map(|(label, count)| format!("{}: {}", label, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
