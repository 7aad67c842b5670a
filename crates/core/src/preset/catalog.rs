//! Tag-to-preset resolution.

use super::types::Preset;

/// Immutable mapping from preset tags to presets.
///
/// Populated once at startup and never mutated. Resolution is the only
/// operation; callers that need the full set iterate [`PresetCatalog::all`].
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog;

impl PresetCatalog {
    /// Creates the catalog with the built-in preset set.
    pub fn new() -> Self {
        Self
    }

    /// Resolves a tag to its preset, or `None` for an unknown tag.
    ///
    /// Tags are matched exactly; there is no fuzzy or case-insensitive
    /// lookup.
    pub fn resolve(&self, tag: &str) -> Option<Preset> {
        Preset::ALL.iter().copied().find(|p| p.tag() == tag)
    }

    /// Every known preset, in catalog order.
    pub fn all(&self) -> &'static [Preset] {
        Preset::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_tags() {
        let catalog = PresetCatalog::new();
        for preset in catalog.all() {
            assert_eq!(catalog.resolve(preset.tag()), Some(*preset));
        }
    }

    #[test]
    fn test_resolve_unknown_tag() {
        let catalog = PresetCatalog::new();
        assert_eq!(catalog.resolve("Make It Better"), None);
        assert_eq!(catalog.resolve(""), None);
        // Exact match only
        assert_eq!(catalog.resolve("remove audio"), None);
    }

    #[test]
    fn test_catalog_is_complete() {
        let catalog = PresetCatalog::new();
        assert_eq!(catalog.all().len(), 7);
    }
}
