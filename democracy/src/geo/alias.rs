//! Boundary names that differ from the index's country names.
//!
//! Natural Earth abbreviates ("Dem. Rep. Congo"), uses current official
//! names ("Czechia") or keeps diacritics ("Côte d'Ivoire"). Territories
//! without their own index entry are drawn with their sovereign state.

/// (boundary name, index name)
pub const COUNTRY_ALIASES: [(&str, &str); 13] = [
    ("Bosnia and Herz.", "Bosnia and Herzegovina"),
    ("Côte d'Ivoire", "Ivory Coast"),
    ("United States of America", "United States"),
    ("Central African Rep.", "Central African Republic"),
    ("Eq. Guinea", "Equatorial Guinea"),
    ("Congo", "Republic of the Congo"),
    ("eSwatini", "Eswatini"),
    ("Czechia", "Czech Republic"),
    ("Dominican Rep.", "Dominican Republic"),
    ("Dem. Rep. Congo", "Democratic Republic of the Congo"),
    ("Timor-Leste", "East Timor"),
    ("Greenland", "Denmark"),
    ("Falkland Is.", "Argentina"),
];

/// Boundary left out of every map.
pub const ANTARCTICA: &str = "Antarctica";

/// Index name for a boundary name. Names without an alias map to themselves.
pub fn resolve(boundary_name: &str) -> &str {
    COUNTRY_ALIASES
        .iter()
        .find(|(from, _)| *from == boundary_name)
        .map(|(_, to)| *to)
        .unwrap_or(boundary_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(resolve("Czechia"), "Czech Republic");
        assert_eq!(resolve("Dem. Rep. Congo"), "Democratic Republic of the Congo");
        assert_eq!(resolve("Côte d'Ivoire"), "Ivory Coast");
        assert_eq!(resolve("Greenland"), "Denmark");
    }

    #[test]
    fn test_resolve_passthrough() {
        assert_eq!(resolve("Norway"), "Norway");
        // exact match only
        assert_eq!(resolve("czechia"), "czechia");
    }

    #[test]
    fn test_aliases_are_unique_sources() {
        let mut sources: Vec<&str> = COUNTRY_ALIASES.iter().map(|(from, _)| *from).collect();
        sources.sort();
        sources.dedup();
        assert_eq!(sources.len(), COUNTRY_ALIASES.len());
    }
}
