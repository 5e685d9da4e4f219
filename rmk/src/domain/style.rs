//! Design style types

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Supported interior design styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleName {
    Modern,
    Minimalist,
    Scandinavian,
    Bohemian,
    Industrial,
    Traditional,
    Coastal,
}

impl StyleName {
    /// All styles in catalog order
    pub const ALL: [StyleName; 7] = [
        StyleName::Modern,
        StyleName::Minimalist,
        StyleName::Scandinavian,
        StyleName::Bohemian,
        StyleName::Industrial,
        StyleName::Traditional,
        StyleName::Coastal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Minimalist => "minimalist",
            Self::Scandinavian => "scandinavian",
            Self::Bohemian => "bohemian",
            Self::Industrial => "industrial",
            Self::Traditional => "traditional",
            Self::Coastal => "coastal",
        }
    }

    /// Display title, e.g. "Scandinavian"
    pub fn title(&self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Minimalist => "Minimalist",
            Self::Scandinavian => "Scandinavian",
            Self::Bohemian => "Bohemian",
            Self::Industrial => "Industrial",
            Self::Traditional => "Traditional",
            Self::Coastal => "Coastal",
        }
    }

    /// Parse a user-supplied style name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        debug!(%name, "StyleName::parse: called");
        let wanted = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|s| s.as_str() == wanted)
    }
}

impl std::fmt::Display for StyleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static description of one design aesthetic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleProfile {
    pub name: StyleName,
    /// Ordered color names, most characteristic first
    pub palette: Vec<String>,
    pub materials: Vec<String>,
    pub motifs: Vec<String>,
    pub tone_description: String,
}
