//! Regional inventory sources.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// One regional endpoint configuration producing a comparable inventory
/// listing. Sources are tried in declared order; demotion to a later
/// source changes the market and therefore the listed currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    /// Market code, e.g. "TR", "DE"
    pub market: String,

    /// Language code, e.g. "tr", "de"
    pub language: String,

    /// API super-region bucket for the query document
    #[serde(default = "default_super_region")]
    pub super_region: String,

    /// Endpoint origin
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model code to query
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_super_region() -> String {
    "europe".to_string()
}

fn default_base_url() -> String {
    "https://www.tesla.com".to_string()
}

fn default_model() -> String {
    "my".to_string()
}

impl Source {
    /// Locale path segment, `{lang}_{MARKET}`.
    pub fn locale(&self) -> String {
        format!(
            "{}_{}",
            self.language.to_lowercase(),
            self.market.to_uppercase()
        )
    }

    /// Short label for logs and advisory messages.
    pub fn label(&self) -> String {
        format!("{} ({})", self.market.to_uppercase(), self.locale())
    }

    /// Referer value matching a browser on this market's inventory page.
    pub fn referer(&self) -> String {
        format!(
            "{}/{}/inventory/new/{}",
            self.base_url,
            self.locale().to_lowercase(),
            self.model
        )
    }

    /// Build the inventory query URL.
    ///
    /// The API takes its whole query as one URL-encoded JSON document in
    /// the `query` parameter.
    pub fn inventory_url(&self, count: usize) -> Result<Url> {
        let query = serde_json::json!({
            "query": {
                "model": self.model,
                "condition": "new",
                "options": {},
                "arrangeby": "Price",
                "order": "asc",
                "market": self.market,
                "language": self.language,
                "super_region": self.super_region,
                "lng": "",
                "lat": "",
                "zip": "",
                "range": 0,
            },
            "offset": 0,
            "count": count,
            "outsideOffset": 0,
            "outsideSearch": false,
            "isFalconDeliverySelectionEnabled": true,
            "version": "v2",
        });

        let mut url = Url::parse(&format!(
            "{}/coinorder/api/v4/inventory-results",
            self.base_url
        ))?;
        url.query_pairs_mut()
            .append_pair("query", &query.to_string());
        Ok(url)
    }

    /// Direct order-page link for one vehicle.
    pub fn order_url(&self, vin: &str) -> String {
        format!(
            "{}/{}/{}/order/{}?titleStatus=new&redirect=no#overview",
            self.base_url,
            self.locale(),
            self.model,
            vin
        )
    }
}
