//! Request strategy descriptors.
//!
//! The endpoint rejects request shapes it decides look automated, and
//! which shapes pass changes over time. Each strategy is one complete
//! shape (headers plus optional cookie jar) tried in declared order.
//! Strategies are data: adding one is a config/table addition, never a
//! code branch.

use serde::{Deserialize, Serialize};

/// One HTTP header for a strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// An immutable request shape presented to the inventory endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Strategy {
    /// Identity string used in logs and failure reports.
    pub name: String,

    /// Headers sent with the request, in order.
    #[serde(default)]
    pub headers: Vec<Header>,

    /// Pre-baked cookie string, sent as a `Cookie` header when present.
    #[serde(default)]
    pub cookie: Option<String>,
}

fn header(name: &str, value: &str) -> Header {
    Header {
        name: name.to_string(),
        value: value.to_string(),
    }
}

const CHROME_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Built-in strategy catalog, in priority order.
///
/// Shapes mirror what the endpoint has historically accepted: a full
/// browser-session clone with consent cookies, a minimal header set, and
/// a modern-Chrome XHR profile.
pub fn builtin_catalog(referer: &str) -> Vec<Strategy> {
    vec![
        Strategy {
            name: "browser-session".to_string(),
            headers: vec![
                header("accept", "*/*"),
                header("accept-language", "tr-TR,tr;q=0.9,en;q=0.8,ja;q=0.7,ru;q=0.6"),
                header("cache-control", "no-cache"),
                header("pragma", "no-cache"),
                header("priority", "u=1, i"),
                header("referer", referer),
                header(
                    "sec-ch-ua",
                    "\"Not)A;Brand\";v=\"8\", \"Chromium\";v=\"138\", \"Google Chrome\";v=\"138\"",
                ),
                header("sec-ch-ua-mobile", "?0"),
                header("sec-ch-ua-platform", "\"macOS\""),
                header("sec-fetch-dest", "empty"),
                header("sec-fetch-mode", "cors"),
                header("sec-fetch-site", "same-origin"),
                header("user-agent", CHROME_UA),
            ],
            cookie: Some(
                "tsla-cookie-consent=accepted; _gcl_au=1.1.1331641573.1752777198; \
                 _ga=GA1.1.961358143.1752777198; \
                 optimizelyEndUserId=oeu1752777241908r0.6631413698015863"
                    .to_string(),
            ),
        },
        Strategy {
            name: "minimal".to_string(),
            headers: vec![
                header("accept", "*/*"),
                header("accept-language", "tr-TR,tr;q=0.9,en;q=0.8"),
                header("referer", referer),
                header("user-agent", CHROME_UA),
            ],
            cookie: None,
        },
        Strategy {
            name: "chrome-xhr".to_string(),
            headers: vec![
                header("User-Agent", CHROME_UA),
                header("Accept", "application/json, text/plain, */*"),
                header("Accept-Language", "tr-TR,tr;q=0.9,en;q=0.8"),
                header("Referer", referer),
                header(
                    "sec-ch-ua",
                    "\"Not)A;Brand\";v=\"8\", \"Chromium\";v=\"138\", \"Google Chrome\";v=\"138\"",
                ),
                header("sec-ch-ua-mobile", "?0"),
                header("sec-ch-ua-platform", "\"macOS\""),
            ],
            cookie: None,
        },
    ]
}
