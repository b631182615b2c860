//! Vehicle and inventory payload structures.

use serde::{Deserialize, Deserializer, Serialize};

/// One vehicle from an inventory listing.
///
/// Field names follow the upstream API payload. Everything except the
/// VIN is best-effort; listings routinely omit attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    /// Vehicle identification number; the only key used for diffing.
    #[serde(rename = "VIN", default)]
    pub vin: Option<String>,

    /// Model code (e.g. "my")
    #[serde(rename = "Model", default)]
    pub model: String,

    /// Trim display name
    #[serde(rename = "TrimName", default)]
    pub trim: String,

    /// Model year
    #[serde(rename = "Year", default)]
    pub year: Option<u32>,

    /// Listed price, in the source market's currency
    #[serde(rename = "Price", default)]
    pub price: Option<f64>,

    /// ISO currency code for the price
    #[serde(rename = "CurrencyCode", default)]
    pub currency: String,

    /// Paint option labels
    #[serde(rename = "PAINT", default)]
    pub paint: Vec<String>,

    /// Interior option labels
    #[serde(rename = "INTERIOR", default)]
    pub interior: Vec<String>,
}

impl Vehicle {
    /// One-line summary for logs: year, model, trim.
    pub fn summary(&self) -> String {
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!("{} {} {}", year, self.model, self.trim)
            .trim()
            .to_string()
    }
}

/// A normalized inventory listing: the authoritative total plus the
/// vehicles returned on this page.
///
/// The total can exceed the page size, so the vehicle list is a sample
/// of the full inventory, not the whole of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryPage {
    pub total: usize,
    pub vehicles: Vec<Vehicle>,
}

impl InventoryPage {
    /// Parse an inventory response body.
    ///
    /// The upstream schema has two shapes for `results`: a flat array,
    /// or an object with `exact`/`approximate` lists. The latter is
    /// flattened exact-first.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let raw: RawPayload = serde_json::from_str(body)?;

        let vehicles = match raw.results {
            RawResults::Flat(list) => list,
            RawResults::Split { exact, approximate } => {
                let mut merged = exact;
                merged.extend(approximate);
                merged
            }
        };

        Ok(Self {
            total: raw.total_matches_found,
            vehicles,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default, deserialize_with = "total_from_value")]
    total_matches_found: usize,

    #[serde(default)]
    results: RawResults,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawResults {
    Flat(Vec<Vehicle>),
    Split {
        #[serde(default)]
        exact: Vec<Vehicle>,
        #[serde(default)]
        approximate: Vec<Vehicle>,
    },
}

impl Default for RawResults {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

/// The total arrives as a number or, from some regions, a numeric string.
fn total_from_value<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Total {
        Number(usize),
        Text(String),
    }

    match Total::deserialize(deserializer)? {
        Total::Number(n) => Ok(n),
        Total::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_results() {
        let body = r#"{
            "total_matches_found": 2,
            "results": [
                {"VIN": "5YJ001", "Model": "my", "TrimName": "Long Range", "Year": 2025,
                 "Price": 52000.0, "CurrencyCode": "EUR", "PAINT": ["White"], "INTERIOR": ["Black"]},
                {"VIN": "5YJ002", "Model": "my"}
            ]
        }"#;

        let page = InventoryPage::from_json(body).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.vehicles.len(), 2);
        assert_eq!(page.vehicles[0].vin.as_deref(), Some("5YJ001"));
        assert_eq!(page.vehicles[0].paint, vec!["White"]);
        assert_eq!(page.vehicles[1].price, None);
    }

    #[test]
    fn test_parse_split_results_exact_first() {
        let body = r#"{
            "total_matches_found": 3,
            "results": {
                "exact": [{"VIN": "EX1"}],
                "approximate": [{"VIN": "AP1"}, {"VIN": "AP2"}]
            }
        }"#;

        let page = InventoryPage::from_json(body).unwrap();
        assert_eq!(page.total, 3);
        let vins: Vec<_> = page.vehicles.iter().filter_map(|v| v.vin.as_deref()).collect();
        assert_eq!(vins, vec!["EX1", "AP1", "AP2"]);
    }

    #[test]
    fn test_parse_total_as_string() {
        let body = r#"{"total_matches_found": "17", "results": []}"#;
        let page = InventoryPage::from_json(body).unwrap();
        assert_eq!(page.total, 17);
        assert!(page.vehicles.is_empty());
    }

    #[test]
    fn test_parse_missing_fields_defaults() {
        let page = InventoryPage::from_json("{}").unwrap();
        assert_eq!(page.total, 0);
        assert!(page.vehicles.is_empty());
    }

    #[test]
    fn test_parse_non_json_fails() {
        assert!(InventoryPage::from_json("<html><body>blocked</body></html>").is_err());
    }

    #[test]
    fn test_summary() {
        let v = Vehicle {
            vin: Some("5YJ001".into()),
            model: "my".into(),
            trim: "Long Range".into(),
            year: Some(2025),
            price: None,
            currency: String::new(),
            paint: vec![],
            interior: vec![],
        };
        assert_eq!(v.summary(), "2025 my Long Range");
    }
}
