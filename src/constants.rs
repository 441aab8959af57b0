/// Shared constants for record keeping and the URL surface.
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Progeny born strictly less than this many hours apart belong to one litter.
pub const LITTER_TOLERANCE_HOURS: i64 = 24;

/// Prefix placed before the primary breed title of a mixed animal.
pub const MIXED_BREED_PREFIX: &str = "Mixed ";

/// Minimum length of a path segment before it is tried as a UUID fragment.
pub const MIN_UUID_FRAGMENT_LEN: usize = 8;

/// Default depth for pedigree trees.
pub const DEFAULT_PEDIGREE_DEPTH: usize = 3;

// Top-level URL segments
pub const ANIMALS_SEGMENT: &str = "animals";
pub const PRODUCTS_SEGMENT: &str = "products";
pub const BUILDINGS_SEGMENT: &str = "buildings";
pub const FIELDS_SEGMENT: &str = "fields";

/// Female terms keyed by genus slug.
static FEMALE_TERMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("pig", "sow"),
        ("chicken", "hen"),
        ("goat", "doe"),
        ("dog", "bitch"),
        ("sheep", "ewe"),
    ])
});

/// Look up the word used for a female of the given genus.
pub fn female_term(genus_slug: &str) -> Option<&'static str> {
    FEMALE_TERMS
        .get(genus_slug.to_lowercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_female_terms() {
        assert_eq!(female_term("goat"), Some("doe"));
        assert_eq!(female_term("Sheep"), Some("ewe"));
        assert_eq!(female_term("cow"), None);
    }
}
