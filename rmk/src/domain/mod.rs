//! Domain types for RoomMakeover
//!
//! Core request/response values: Detection, RoomInventory, StyleProfile,
//! BudgetConstraint, SuggestedItem and MakeoverPlan. Each request owns a fresh
//! set of these; none of them is shared mutable state.

mod budget;
mod detection;
mod item;
mod plan;
mod room;
mod style;

pub use budget::{BudgetConstraint, BudgetLimits, Currency};
pub use detection::{Detection, load_detections, parse_detections};
pub use item::{ItemCategory, PlannedItem, ShoppingLink, SuggestedItem};
pub use plan::{MakeoverPlan, PlanNarrative};
pub use room::{RoomInventory, RoomType};
pub use style::{StyleName, StyleProfile};
