//! Retained inventory snapshot.

use std::collections::HashSet;

use super::vehicle::{InventoryPage, Vehicle};

/// The last successfully observed inventory state.
///
/// Exactly one snapshot is live at a time; it is replaced wholesale after
/// every successful fetch. The VIN set is always derived from the retained
/// vehicle list, so the two cannot drift apart. "No snapshot yet" is
/// modelled as `Option<Snapshot>` by the cycle state, not a variant here.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// VINs of the vehicles returned on the captured page.
    pub vins: HashSet<String>,

    /// Authoritative inventory total at capture time. Can exceed
    /// `vehicles.len()` because the page is bounded.
    pub count: usize,

    /// Full vehicle records at capture time.
    pub vehicles: Vec<Vehicle>,
}

impl Snapshot {
    /// Capture a snapshot from a fetched page.
    ///
    /// Vehicles without a VIN are kept in the collection (they still
    /// count) but are excluded from the identifier set.
    pub fn capture(page: &InventoryPage) -> Self {
        let vins = page
            .vehicles
            .iter()
            .filter_map(|v| v.vin.clone())
            .collect();

        Self {
            vins,
            count: page.total,
            vehicles: page.vehicles.clone(),
        }
    }
}
