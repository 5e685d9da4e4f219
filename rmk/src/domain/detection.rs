//! Detection domain type
//!
//! One labeled, confidence-scored object instance as reported by the detector.

use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single object detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label as emitted by the detector (e.g. "bed", "dining table")
    pub label: String,

    /// Detector confidence in [0, 1]
    pub confidence: f64,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Whether this detection is trustworthy enough to count
    ///
    /// Non-finite or out-of-range confidences are never usable.
    pub fn is_usable(&self, min_confidence: f64) -> bool {
        debug!(label = %self.label, confidence = self.confidence, min_confidence, "Detection::is_usable: called");
        self.confidence.is_finite()
            && (0.0..=1.0).contains(&self.confidence)
            && self.confidence >= min_confidence
            && !self.label.trim().is_empty()
    }
}

/// Detector output file: either a bare list or `{"detections": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetectionFile {
    List(Vec<Detection>),
    Wrapped { detections: Vec<Detection> },
}

/// Load detections from a detector output JSON file
pub fn load_detections(path: impl AsRef<Path>) -> Result<Vec<Detection>> {
    let path = path.as_ref();
    debug!(?path, "load_detections: called");
    let content =
        std::fs::read_to_string(path).context(format!("Failed to read detections from {}", path.display()))?;
    parse_detections(&content).context(format!("Failed to parse detections in {}", path.display()))
}

/// Parse detector output JSON
pub fn parse_detections(content: &str) -> Result<Vec<Detection>> {
    debug!(content_len = content.len(), "parse_detections: called");
    let file: DetectionFile = serde_json::from_str(content)?;
    let detections = match file {
        DetectionFile::List(list) => list,
        DetectionFile::Wrapped { detections } => detections,
    };
    debug!(count = detections.len(), "parse_detections: parsed");
    Ok(detections)
}
