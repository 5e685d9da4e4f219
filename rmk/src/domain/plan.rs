//! MakeoverPlan domain type
//!
//! The final, budget-respecting plan handed to the presentation layer.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::{BudgetConstraint, PlannedItem, RoomType, StyleName};

/// Free-text sections the model wrote alongside the items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanNarrative {
    pub summary: String,
    pub styling_tips: String,
    pub room_analysis: String,
    pub style_direction: String,
}

/// A complete makeover plan
///
/// Invariants: `total_price` is the exact sum of item prices, never exceeds
/// the budget ceiling, and `remaining_budget == ceiling - total_price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakeoverPlan {
    room_type: RoomType,
    style: StyleName,
    budget: BudgetConstraint,
    items: Vec<PlannedItem>,
    total_price: Decimal,
    remaining_budget: Decimal,
    room_description: String,
    summary: String,
    styling_tips: String,
    room_analysis: String,
    style_direction: String,
    confidence: f64,
}

impl MakeoverPlan {
    /// Assemble a plan from allocated items, computing the totals
    pub(crate) fn assemble(
        room_type: RoomType,
        style: StyleName,
        budget: BudgetConstraint,
        items: Vec<PlannedItem>,
        room_description: String,
        narrative: PlanNarrative,
        confidence: f64,
    ) -> Self {
        let total_price: Decimal = items.iter().map(|p| p.item.estimated_price).sum();
        debug!(item_count = items.len(), %total_price, ceiling = %budget.ceiling(), "MakeoverPlan::assemble: called");
        debug_assert!(total_price <= budget.ceiling(), "allocated items exceed the ceiling");
        Self {
            room_type,
            style,
            budget,
            items,
            total_price,
            remaining_budget: budget.ceiling() - total_price,
            room_description,
            summary: narrative.summary,
            styling_tips: narrative.styling_tips,
            room_analysis: narrative.room_analysis,
            style_direction: narrative.style_direction,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    pub fn style(&self) -> StyleName {
        self.style
    }

    pub fn budget(&self) -> &BudgetConstraint {
        &self.budget
    }

    pub fn items(&self) -> &[PlannedItem] {
        &self.items
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn remaining_budget(&self) -> Decimal {
        self.remaining_budget
    }

    pub fn room_description(&self) -> &str {
        &self.room_description
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn styling_tips(&self) -> &str {
        &self.styling_tips
    }

    pub fn room_analysis(&self) -> &str {
        &self.room_analysis
    }

    pub fn style_direction(&self) -> &str {
        &self.style_direction
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BudgetLimits, SuggestedItem};

    fn planned(name: &str, price: i64) -> PlannedItem {
        PlannedItem {
            item: SuggestedItem::new(name, "desc", Decimal::from(price)),
            shopping_links: vec![],
        }
    }

    #[test]
    fn test_assemble_computes_totals() {
        let budget = BudgetConstraint::new(Decimal::from(8000), &BudgetLimits::default()).unwrap();
        let plan = MakeoverPlan::assemble(
            RoomType::Bedroom,
            StyleName::Scandinavian,
            budget,
            vec![planned("Rug", 2500), planned("Lamp", 3700)],
            "A bedroom".to_string(),
            PlanNarrative::default(),
            1.0,
        );

        assert_eq!(plan.total_price(), Decimal::from(6200));
        assert_eq!(plan.remaining_budget(), Decimal::from(1800));
        assert_eq!(plan.items().len(), 2);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let budget = BudgetConstraint::new(Decimal::from(1000), &BudgetLimits::default()).unwrap();
        let plan = MakeoverPlan::assemble(
            RoomType::General,
            StyleName::Modern,
            budget,
            vec![],
            String::new(),
            PlanNarrative::default(),
            1.7,
        );
        assert_eq!(plan.confidence(), 1.0);
        assert_eq!(plan.remaining_budget(), Decimal::from(1000));
    }

    #[test]
    fn test_plan_serializes_totals() {
        let budget = BudgetConstraint::new(Decimal::from(5000), &BudgetLimits::default()).unwrap();
        let plan = MakeoverPlan::assemble(
            RoomType::Office,
            StyleName::Industrial,
            budget,
            vec![planned("Desk Lamp", 1200)],
            String::new(),
            PlanNarrative {
                summary: "Warm metal accents".to_string(),
                ..Default::default()
            },
            0.9,
        );
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["room_type"], "office");
        assert_eq!(value["style"], "industrial");
        assert_eq!(value["total_price"], "1200");
        assert_eq!(value["remaining_budget"], "3800");
        assert_eq!(value["budget"]["currency"], "INR");
        assert_eq!(value["summary"], "Warm metal accents");
    }
}
