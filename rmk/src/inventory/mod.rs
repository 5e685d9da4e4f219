//! Room inventory classification
//!
//! Detections in, [`RoomInventory`](crate::domain::RoomInventory) out.

mod classifier;

pub use classifier::{InventoryClassifier, normalize_label};
