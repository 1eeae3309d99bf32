//! Catalog search and damage-type filtering over enriched builds.

use serde::Deserialize;

use crate::enrichment::EnrichedBuild;

/// Element filter value that matches every build.
pub const ELEMENT_ALL: &str = "All";

/// Query parameters for the catalog listing (`?q=&element=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive substring matched against the build name, gear item
    /// names and the calibration label.
    pub q: Option<String>,
    /// Exact damage-type label, or `All`.
    pub element: Option<String>,
}

impl CatalogFilter {
    fn query(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    fn element(&self) -> Option<&str> {
        self.element
            .as_deref()
            .filter(|e| !e.is_empty() && *e != ELEMENT_ALL)
    }

    pub fn matches(&self, build: &EnrichedBuild) -> bool {
        let matches_search = match self.query() {
            None => true,
            Some(q) => {
                build.name.to_lowercase().contains(&q)
                    || build
                        .gear_list
                        .iter()
                        .any(|g| g.item.to_lowercase().contains(&q))
                    || build.calibration.to_lowercase().contains(&q)
            }
        };

        let matches_element = match self.element() {
            None => true,
            Some(e) => build.dmg_type == e,
        };

        matches_search && matches_element
    }

    /// Keep only matching builds, preserving order.
    pub fn apply(&self, builds: Vec<EnrichedBuild>) -> Vec<EnrichedBuild> {
        builds.into_iter().filter(|b| self.matches(b)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
