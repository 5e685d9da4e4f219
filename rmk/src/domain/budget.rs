//! Budget ceiling and currency types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MakeoverError;

/// Currency all amounts are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "INR")]
    Inr,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Inr => "₹",
        }
    }

    /// Format an amount with the currency symbol, e.g. `₹8000`
    pub fn format(&self, amount: Decimal) -> String {
        format!("{}{}", self.symbol(), amount.normalize())
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Inclusive range a budget ceiling must fall within
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetLimits {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self {
            min: Decimal::from(500),
            max: Decimal::from(50_000),
        }
    }
}

impl BudgetLimits {
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Validated spending ceiling for one makeover request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetConstraint {
    ceiling: Decimal,
    currency: Currency,
}

impl BudgetConstraint {
    /// Validate a ceiling against the configured limits
    pub fn new(ceiling: Decimal, limits: &BudgetLimits) -> Result<Self, MakeoverError> {
        debug!(%ceiling, min = %limits.min, max = %limits.max, "BudgetConstraint::new: called");
        if !limits.contains(ceiling) {
            debug!("BudgetConstraint::new: ceiling out of range");
            return Err(MakeoverError::BudgetOutOfRange {
                ceiling,
                min: limits.min,
                max: limits.max,
            });
        }
        Ok(Self {
            ceiling: ceiling.normalize(),
            currency: Currency::Inr,
        })
    }

    pub fn ceiling(&self) -> Decimal {
        self.ceiling
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Ceiling formatted with the currency symbol
    pub fn display(&self) -> String {
        self.currency.format(self.ceiling)
    }
}
