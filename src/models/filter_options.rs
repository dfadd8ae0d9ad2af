//! Filter option lists for driving filter UIs.

use serde::{Deserialize, Serialize};

use super::OrgDimension;

/// The distinct dimension values observed in a snapshot.
///
/// Every list is sorted by code (then description) and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Company codes.
    pub companies: Vec<String>,
    /// Personnel areas.
    pub personnel_areas: Vec<OrgDimension>,
    /// Cost centers.
    pub cost_centers: Vec<OrgDimension>,
    /// Jobs, as job code plus job description.
    pub jobs: Vec<OrgDimension>,
}
