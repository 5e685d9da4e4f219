//! Style Catalog
//!
//! Static registry of the supported design styles. Built once at startup and
//! shared read-only (`Arc<StyleCatalog>`) across requests.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{StyleName, StyleProfile};
use crate::error::MakeoverError;

/// Immutable registry of style profiles
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    profiles: BTreeMap<StyleName, StyleProfile>,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleCatalog {
    /// The built-in catalog of all seven styles
    pub fn builtin() -> Self {
        debug!("StyleCatalog::builtin: called");
        let profiles = StyleName::ALL
            .into_iter()
            .map(|name| (name, builtin_profile(name)))
            .collect();
        Self { profiles }
    }

    /// Look up a style by user-supplied name (case-insensitive)
    pub fn get_style(&self, name: &str) -> Result<&StyleProfile, MakeoverError> {
        debug!(%name, "StyleCatalog::get_style: called");
        StyleName::parse(name)
            .and_then(|style| self.profiles.get(&style))
            .ok_or_else(|| {
                debug!(%name, "StyleCatalog::get_style: unknown style");
                MakeoverError::UnknownStyle {
                    name: name.to_string(),
                    supported: self.supported_names(),
                }
            })
    }

    /// All profiles in catalog order
    pub fn list_styles(&self) -> Vec<&StyleProfile> {
        debug!("StyleCatalog::list_styles: called");
        StyleName::ALL.iter().filter_map(|name| self.profiles.get(name)).collect()
    }

    fn supported_names(&self) -> String {
        StyleName::ALL
            .iter()
            .filter(|name| self.profiles.contains_key(name))
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn builtin_profile(name: StyleName) -> StyleProfile {
    let (palette, materials, motifs, tone): (&[&str], &[&str], &[&str], &str) = match name {
        StyleName::Modern => (
            &["white", "black", "gray", "beige"],
            &["glass", "metal", "concrete", "leather"],
            &["geometric shapes", "open spaces", "minimal decor", "statement lighting"],
            "Clean lines, minimalist approach, neutral colors, functional furniture",
        ),
        StyleName::Minimalist => (
            &["white", "cream", "light gray", "natural wood"],
            &["natural wood", "linen", "cotton", "bamboo"],
            &["hidden storage", "multi-functional furniture", "negative space", "natural light"],
            "Less is more philosophy, clutter-free, functional simplicity",
        ),
        StyleName::Scandinavian => (
            &["white", "light blue", "soft gray", "natural wood tones"],
            &["light wood", "wool", "cotton", "linen"],
            &["natural textures", "cozy textiles", "functional design", "plants"],
            "Cozy, functional, light woods, hygge-inspired comfort",
        ),
        StyleName::Bohemian => (
            &["earth tones", "jewel tones", "warm oranges", "deep purples"],
            &["rattan", "macrame", "vintage fabrics", "natural fibers"],
            &["layered rugs", "hanging plants", "vintage furniture", "tapestries"],
            "Eclectic, colorful, artistic, layered textures and patterns",
        ),
        StyleName::Industrial => (
            &["charcoal", "rust", "black", "deep brown"],
            &["exposed brick", "metal", "reclaimed wood", "concrete"],
            &["exposed pipes", "metal fixtures", "vintage machinery", "Edison bulbs"],
            "Raw materials, exposed elements, urban loft aesthetic",
        ),
        StyleName::Traditional => (
            &["burgundy", "navy", "forest green", "warm gold"],
            &["dark wood", "silk", "velvet", "brass"],
            &["antique furniture", "formal arrangements", "rich textures", "classic patterns"],
            "Classic elegance, rich fabrics, warm colors, timeless furniture",
        ),
        StyleName::Coastal => (
            &["ocean blue", "sandy beige", "coral", "seafoam green"],
            &["weathered wood", "rope", "seagrass", "linen"],
            &["nautical decor", "natural lighting", "woven textures", "shell accents"],
            "Beach-inspired, light and airy, natural textures",
        ),
    };

    StyleProfile {
        name,
        palette: strings(palette),
        materials: strings(materials),
        motifs: strings(motifs),
        tone_description: tone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_get_style() {
        let catalog = StyleCatalog::builtin();
        let profile = catalog.get_style("scandinavian").unwrap();
        assert_eq!(profile.name, StyleName::Scandinavian);
        assert_eq!(profile.palette[0], "white");
        assert!(profile.materials.contains(&"wool".to_string()));
        assert!(profile.tone_description.contains("hygge"));
    }

    #[test]
    fn test_get_style_case_insensitive() {
        let catalog = StyleCatalog::builtin();
        assert_eq!(catalog.get_style("Industrial").unwrap().name, StyleName::Industrial);
    }

    #[test]
    fn test_unknown_style() {
        let catalog = StyleCatalog::builtin();
        let err = catalog.get_style("zen").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert!(err.to_string().contains("zen"));
        assert!(err.to_string().contains("scandinavian"));
    }

    #[test]
    fn test_list_styles_in_order() {
        let catalog = StyleCatalog::builtin();
        let names: Vec<StyleName> = catalog.list_styles().iter().map(|p| p.name).collect();
        assert_eq!(names, StyleName::ALL.to_vec());
    }

    #[test]
    fn test_every_profile_is_populated() {
        for profile in StyleCatalog::builtin().list_styles() {
            assert!(!profile.palette.is_empty(), "{} has no palette", profile.name);
            assert!(!profile.materials.is_empty(), "{} has no materials", profile.name);
            assert!(!profile.motifs.is_empty(), "{} has no motifs", profile.name);
            assert!(!profile.tone_description.is_empty());
        }
    }

    #[test]
    fn test_catalog_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StyleCatalog>();
    }
}
