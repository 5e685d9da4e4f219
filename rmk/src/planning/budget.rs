//! Greedy budget allocation
//!
//! Walks items in the model's order and keeps each one that still fits under
//! the ceiling. The model's order is its priority order, so a cheaper item
//! later in the list never displaces an earlier one.

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{BudgetConstraint, SuggestedItem};

/// Result of fitting items under a ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Accepted items in their original order
    pub accepted: Vec<SuggestedItem>,
    /// Items that did not fit, in their original order
    pub skipped: Vec<SuggestedItem>,
    pub total: Decimal,
    pub remaining: Decimal,
}

impl Allocation {
    /// Items were offered but none fit
    pub fn budget_too_low(&self) -> bool {
        self.accepted.is_empty() && !self.skipped.is_empty()
    }
}

/// Accept items left to right while the running total stays within the ceiling
pub fn allocate(items: Vec<SuggestedItem>, budget: &BudgetConstraint) -> Allocation {
    let ceiling = budget.ceiling();
    debug!(count = items.len(), %ceiling, "allocate: called");

    let mut accepted = Vec::new();
    let mut skipped = Vec::new();
    let mut total = Decimal::ZERO;

    for item in items {
        // An overflowing sum cannot fit under any ceiling
        match total.checked_add(item.estimated_price).filter(|next| *next <= ceiling) {
            Some(next) => {
                debug!(name = %item.name, price = %item.estimated_price, "allocate: accepted");
                total = next;
                accepted.push(item);
            }
            None => {
                debug!(name = %item.name, price = %item.estimated_price, %total, "allocate: skipped");
                skipped.push(item);
            }
        }
    }

    Allocation {
        accepted,
        skipped,
        total,
        remaining: ceiling - total,
    }
}
