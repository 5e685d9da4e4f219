//! Suggested item domain types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shopping category of a suggested item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Furniture,
    Decor,
    Lighting,
    Textile,
    Storage,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 5] = [
        ItemCategory::Furniture,
        ItemCategory::Decor,
        ItemCategory::Lighting,
        ItemCategory::Textile,
        ItemCategory::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Furniture => "furniture",
            Self::Decor => "decor",
            Self::Lighting => "lighting",
            Self::Textile => "textile",
            Self::Storage => "storage",
        }
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "furniture" => Ok(Self::Furniture),
            "decor" | "decoration" => Ok(Self::Decor),
            "lighting" | "light" => Ok(Self::Lighting),
            "textile" | "textiles" => Ok(Self::Textile),
            "storage" => Ok(Self::Storage),
            _ => Err(format!("Unknown item category: {}", s)),
        }
    }
}

/// One product the model proposed, after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedItem {
    pub name: String,
    pub description: String,
    /// Never negative
    pub estimated_price: Decimal,
    pub style_rationale: String,
    pub search_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ItemCategory>,
}

impl SuggestedItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>, estimated_price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            estimated_price,
            style_rationale: String::new(),
            search_keywords: Vec::new(),
            category: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.style_rationale = rationale.into();
        self
    }

    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Keywords used for shopping search, falling back to the item name
    pub fn search_terms(&self) -> Vec<&str> {
        let keywords: Vec<&str> = self
            .search_keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            debug!(name = %self.name, "SuggestedItem::search_terms: no keywords, using name");
            vec![self.name.trim()]
        } else {
            keywords
        }
    }
}

/// Search link for one retail platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingLink {
    pub platform: String,
    pub url: String,
}

/// Accepted item together with its shopping links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedItem {
    #[serde(flatten)]
    pub item: SuggestedItem,
    pub shopping_links: Vec<ShoppingLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms_fallback_to_name() {
        let item = SuggestedItem::new("Oak Bed Frame", "Solid oak", Decimal::from(4000));
        assert_eq!(item.search_terms(), vec!["Oak Bed Frame"]);

        let item = item.with_keywords(["  ", ""]);
        assert_eq!(item.search_terms(), vec!["Oak Bed Frame"]);
    }

    #[test]
    fn test_search_terms_uses_keywords() {
        let item = SuggestedItem::new("Rug", "Wool rug", Decimal::from(1500)).with_keywords([" wool rug ", "beige"]);
        assert_eq!(item.search_terms(), vec!["wool rug", "beige"]);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Lighting".parse::<ItemCategory>().unwrap(), ItemCategory::Lighting);
        assert_eq!("textiles".parse::<ItemCategory>().unwrap(), ItemCategory::Textile);
        assert!("plumbing".parse::<ItemCategory>().is_err());
    }

    #[test]
    fn test_planned_item_flattens() {
        let planned = PlannedItem {
            item: SuggestedItem::new("Lamp", "Floor lamp", Decimal::from(900)).with_category(ItemCategory::Lighting),
            shopping_links: vec![ShoppingLink {
                platform: "amazon".to_string(),
                url: "https://www.amazon.in/s?k=Lamp".to_string(),
            }],
        };
        let value = serde_json::to_value(&planned).unwrap();
        assert_eq!(value["name"], "Lamp");
        assert_eq!(value["category"], "lighting");
        assert_eq!(value["shopping_links"][0]["platform"], "amazon");
    }
}
