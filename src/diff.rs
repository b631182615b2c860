//! Snapshot diff calculation.
//!
//! Compares the retained snapshot against a freshly fetched listing to
//! decide what changed. Additions are keyed by VIN set difference.
//! Removals are only guaranteed as a count delta: VINs are not reliably
//! comparable across fetch strategies, so individual removed-vehicle
//! detail is not reported.

use crate::models::{InventoryPage, Snapshot, Vehicle};

/// Changes between the previous snapshot and the current listing.
/// Transient: recomputed every cycle, never stored.
#[derive(Debug, Clone, Default)]
pub struct Delta {
    /// Vehicles present now whose VIN was absent from the previous
    /// snapshot. Vehicles without a VIN cannot be attributed as added.
    pub added: Vec<Vehicle>,

    /// How far the authoritative total shrank; zero when it grew or
    /// held steady.
    pub removed_count: usize,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed_count == 0
    }
}

/// Calculate the delta between the previous snapshot and a fresh page.
///
/// The first-observation case (no previous snapshot) is decided by the
/// cycle, not here; callers only invoke this with an initialized
/// snapshot. Both directions can be non-empty in one cycle (churn) and
/// are reported independently.
pub fn calculate(previous: &Snapshot, current: &InventoryPage) -> Delta {
    let added = current
        .vehicles
        .iter()
        .filter(|v| {
            v.vin
                .as_ref()
                .is_some_and(|vin| !previous.vins.contains(vin))
        })
        .cloned()
        .collect();

    Delta {
        added,
        removed_count: previous.count.saturating_sub(current.total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(vin: &str) -> Vehicle {
        Vehicle {
            vin: Some(vin.to_string()),
            model: "my".into(),
            trim: String::new(),
            year: None,
            price: None,
            currency: String::new(),
            paint: vec![],
            interior: vec![],
        }
    }

    fn page(vins: &[&str]) -> InventoryPage {
        InventoryPage {
            total: vins.len(),
            vehicles: vins.iter().map(|v| vehicle(v)).collect(),
        }
    }

    fn snapshot(vins: &[&str]) -> Snapshot {
        Snapshot::capture(&page(vins))
    }

    #[test]
    fn test_no_changes() {
        let prev = snapshot(&["A", "B"]);
        let delta = calculate(&prev, &page(&["A", "B"]));
        assert!(delta.is_empty());
    }

    #[test]
    fn test_churn_reports_addition_without_shrink() {
        // {A,B,C} -> {A,C,D}: one added, count held at 3, no removal.
        let prev = snapshot(&["A", "B", "C"]);
        let delta = calculate(&prev, &page(&["A", "C", "D"]));

        let added: Vec<_> = delta.added.iter().filter_map(|v| v.vin.as_deref()).collect();
        assert_eq!(added, vec!["D"]);
        assert_eq!(delta.removed_count, 0);
    }

    #[test]
    fn test_shrink_reports_count_delta() {
        // {A,B} -> {A}: nothing added, one removed.
        let prev = snapshot(&["A", "B"]);
        let delta = calculate(&prev, &page(&["A"]));

        assert!(delta.added.is_empty());
        assert_eq!(delta.removed_count, 1);
    }

    #[test]
    fn test_growth_is_not_negative_removal() {
        let prev = snapshot(&["A"]);
        let delta = calculate(&prev, &page(&["A", "B", "C"]));

        assert_eq!(delta.added.len(), 2);
        assert_eq!(delta.removed_count, 0);
    }

    #[test]
    fn test_vinless_vehicles_never_count_as_added() {
        let prev = snapshot(&["A"]);
        let mut current = page(&["A"]);
        current.total = 2;
        current.vehicles.push(Vehicle {
            vin: None,
            ..vehicle("ignored")
        });

        let delta = calculate(&prev, &current);
        assert!(delta.added.is_empty());
    }

    #[test]
    fn test_count_delta_uses_totals_not_page_sizes() {
        // Totals beyond the page bound still drive the shrink signal.
        let mut prev_page = page(&["A", "B"]);
        prev_page.total = 40;
        let prev = Snapshot::capture(&prev_page);

        let mut current = page(&["A", "B"]);
        current.total = 25;

        let delta = calculate(&prev, &current);
        assert_eq!(delta.removed_count, 15);
    }

    #[test]
    fn test_full_churn_both_directions() {
        let prev = snapshot(&["A", "B", "C"]);
        let delta = calculate(&prev, &page(&["D"]));

        assert_eq!(delta.added.len(), 1);
        assert_eq!(delta.removed_count, 2);
    }
}
