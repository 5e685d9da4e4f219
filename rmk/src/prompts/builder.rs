//! Prompt Builder
//!
//! Renders the makeover instruction from inventory, style and budget. Output is
//! a pure function of the inputs and the loaded template: no clocks, no
//! randomness, so identical requests produce byte-identical prompts.

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::{PromptLoader, embedded};
use crate::domain::{BudgetConstraint, ItemCategory, RoomInventory, StyleProfile};

const MAKEOVER_TEMPLATE: &str = "makeover";
const EMBEDDED_TEMPLATE: &str = "makeover-embedded";

/// Values substituted into the makeover template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptContext {
    pub room_type: String,
    pub room_description: String,
    /// `label: count` pairs, e.g. "bed: 1, wardrobe: 1"
    pub inventory: String,
    pub total_objects: u32,
    pub style: String,
    pub tone: String,
    pub palette: String,
    pub materials: String,
    pub motifs: String,
    pub budget: String,
    pub currency: String,
    pub currency_symbol: String,
    pub has_priorities: bool,
    pub priorities: Vec<String>,
    pub categories: String,
}

impl PromptContext {
    pub fn new(
        inventory: &RoomInventory,
        style: &StyleProfile,
        budget: &BudgetConstraint,
        priorities: &[String],
    ) -> Self {
        debug!(room_type = %inventory.room_type(), style = %style.name, ceiling = %budget.ceiling(), "PromptContext::new: called");
        let priorities: Vec<String> = priorities
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let inventory_line = if inventory.is_empty() {
            "none detected".to_string()
        } else {
            inventory.counts_line()
        };

        Self {
            room_type: inventory.room_type().title().to_string(),
            room_description: inventory.description().to_string(),
            inventory: inventory_line,
            total_objects: inventory.total_objects(),
            style: style.name.title().to_string(),
            tone: style.tone_description.clone(),
            palette: style.palette.join(", "),
            materials: style.materials.join(", "),
            motifs: style.motifs.join(", "),
            budget: budget.ceiling().normalize().to_string(),
            currency: budget.currency().code().to_string(),
            currency_symbol: budget.currency().symbol().to_string(),
            has_priorities: !priorities.is_empty(),
            priorities,
            categories: ItemCategory::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join("/"),
        }
    }
}

/// A rendered prompt ready for the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub system: String,
    pub instruction: String,
}

/// Builds makeover prompts from a loaded template
pub struct PromptBuilder {
    hbs: Handlebars<'static>,
    system: String,
    has_custom_template: bool,
}

impl PromptBuilder {
    /// Create a builder from the loader's template chain
    ///
    /// A template that fails to load or parse is logged and replaced by the
    /// embedded default.
    pub fn new(loader: &PromptLoader) -> Self {
        debug!(has_overrides = loader.has_overrides(), "PromptBuilder::new: called");
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);

        if let Err(e) = hbs.register_template_string(EMBEDDED_TEMPLATE, embedded::MAKEOVER) {
            error!(error = %e, "Embedded makeover template failed to parse");
        }

        let mut has_custom_template = false;
        if loader.has_overrides() {
            match loader.load_template(MAKEOVER_TEMPLATE) {
                Ok(source) if source != embedded::MAKEOVER => match hbs.register_template_string(MAKEOVER_TEMPLATE, source) {
                    Ok(()) => {
                        info!("Using custom makeover prompt template");
                        has_custom_template = true;
                    }
                    Err(e) => warn!(error = %e, "Custom makeover template is invalid, using embedded"),
                },
                Ok(_) => debug!("PromptBuilder::new: override matches embedded template"),
                Err(e) => warn!(error = %e, "Failed to load makeover template, using embedded"),
            }
        }

        let system = loader.load_template("system").unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load system prompt, using embedded");
            embedded::SYSTEM.to_string()
        });

        Self {
            hbs,
            system: system.trim().to_string(),
            has_custom_template,
        }
    }

    /// Builder using only the embedded templates
    pub fn embedded() -> Self {
        Self::new(&PromptLoader::embedded_only())
    }

    pub fn has_custom_template(&self) -> bool {
        self.has_custom_template
    }

    /// Render the makeover prompt
    pub fn build(
        &self,
        inventory: &RoomInventory,
        style: &StyleProfile,
        budget: &BudgetConstraint,
        priorities: &[String],
    ) -> BuiltPrompt {
        let context = PromptContext::new(inventory, style, budget, priorities);
        BuiltPrompt {
            system: self.system.clone(),
            instruction: self.render(&context),
        }
    }

    /// Render a prepared context, falling back to the embedded template
    pub fn render(&self, context: &PromptContext) -> String {
        debug!(has_custom_template = self.has_custom_template, "PromptBuilder::render: called");
        if self.has_custom_template {
            match self.hbs.render(MAKEOVER_TEMPLATE, context) {
                Ok(text) => return text,
                Err(e) => warn!(error = %e, "Custom makeover template failed to render, using embedded"),
            }
        }

        self.hbs.render(EMBEDDED_TEMPLATE, context).unwrap_or_else(|e| {
            error!(error = %e, "Embedded makeover template failed to render");
            String::new()
        })
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::embedded()
    }
}
