//! Single-request fetch execution and outcome classification.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::{FetchConfig, InventoryPage, Source, Strategy};

/// Classified result of one fetch attempt.
///
/// Every attempt lands in exactly one bucket; raw transport errors never
/// cross this boundary. Callers route on the classification: blocked
/// failures rotate strategy/source faster, hard failures back off.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx with a parseable inventory payload.
    Success(InventoryPage),

    /// Anti-automation signature: 403/429, or a 2xx whose body is not
    /// the expected structured payload (interstitial HTML and the like).
    Blocked { detail: String },

    /// Non-success status below the server-error threshold.
    Soft { status: u16 },

    /// Network error, timeout, or 5xx.
    Hard { detail: String },
}

/// Failure classification carried into terminal failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Blocked,
    Soft,
    Hard,
}

impl FetchOutcome {
    /// The failure bucket, or `None` for a success.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::Blocked { .. } => Some(FailureKind::Blocked),
            Self::Soft { .. } => Some(FailureKind::Soft),
            Self::Hard { .. } => Some(FailureKind::Hard),
        }
    }

    /// Human-readable failure description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Success(page) => format!("success ({} vehicles)", page.vehicles.len()),
            Self::Blocked { detail } => format!("blocked: {detail}"),
            Self::Soft { status } => format!("status {status}"),
            Self::Hard { detail } => detail.clone(),
        }
    }
}

/// Issues one inventory request with one strategy against one source.
pub struct FetchExecutor {
    client: Client,
    page_size: usize,
}

impl FetchExecutor {
    /// Create an executor with the configured timeout.
    ///
    /// No default headers on the client: every header the endpoint sees
    /// comes from the strategy, so attempts differ only by strategy.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            page_size: config.page_size,
        })
    }

    /// Perform one fetch and classify the result.
    pub async fn fetch(&self, source: &Source, strategy: &Strategy) -> FetchOutcome {
        let url = match source.inventory_url(self.page_size) {
            Ok(url) => url,
            Err(e) => {
                return FetchOutcome::Hard {
                    detail: format!("invalid source url: {e}"),
                };
            }
        };

        let mut request = self.client.get(url);
        for header in &strategy.headers {
            request = request.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(cookie) = &strategy.cookie {
            request = request.header("Cookie", cookie.as_str());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::Hard {
                    detail: format!("request failed: {e}"),
                };
            }
        };

        let status = response.status();
        if status.is_server_error() {
            return FetchOutcome::Hard {
                detail: format!("server error {status}"),
            };
        }
        if status.as_u16() == 403 || status.as_u16() == 429 {
            return FetchOutcome::Blocked {
                detail: format!("status {status}"),
            };
        }
        if !status.is_success() {
            return FetchOutcome::Soft {
                status: status.as_u16(),
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return FetchOutcome::Hard {
                    detail: format!("body read failed: {e}"),
                };
            }
        };

        match InventoryPage::from_json(&body) {
            Ok(page) => FetchOutcome::Success(page),
            Err(e) => {
                let trimmed = body.trim_start();
                if trimmed.starts_with('<') {
                    FetchOutcome::Blocked {
                        detail: "html body where json was expected".to_string(),
                    }
                } else {
                    // Recurring stable parse failures here mean the
                    // upstream schema changed, not that we are blocked.
                    log::warn!("Inventory payload did not match schema: {e}");
                    FetchOutcome::Blocked {
                        detail: format!("unexpected payload shape: {e}"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_source(base_url: &str) -> Source {
        Source {
            market: "TR".into(),
            language: "tr".into(),
            super_region: "europe".into(),
            base_url: base_url.to_string(),
            model: "my".into(),
        }
    }

    fn test_strategy() -> Strategy {
        Strategy {
            name: "test".into(),
            headers: vec![],
            cookie: None,
        }
    }

    fn executor() -> FetchExecutor {
        FetchExecutor::new(&FetchConfig::default()).unwrap()
    }

    async fn mock_inventory(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/coinorder/api/v4/inventory-results"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_success_with_payload() {
        let server = MockServer::start().await;
        let body = r#"{"total_matches_found": 1, "results": [{"VIN": "5YJ001"}]}"#;
        mock_inventory(
            &server,
            ResponseTemplate::new(200).set_body_raw(body, "application/json"),
        )
        .await;

        let outcome = executor()
            .fetch(&test_source(&server.uri()), &test_strategy())
            .await;

        match outcome {
            FetchOutcome::Success(page) => {
                assert_eq!(page.total, 1);
                assert_eq!(page.vehicles[0].vin.as_deref(), Some("5YJ001"));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_html_body_is_blocked() {
        let server = MockServer::start().await;
        mock_inventory(
            &server,
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>Access Denied</body></html>", "text/html"),
        )
        .await;

        let outcome = executor()
            .fetch(&test_source(&server.uri()), &test_strategy())
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Blocked));
    }

    #[tokio::test]
    async fn test_403_is_blocked() {
        let server = MockServer::start().await;
        mock_inventory(&server, ResponseTemplate::new(403)).await;

        let outcome = executor()
            .fetch(&test_source(&server.uri()), &test_strategy())
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Blocked));
    }

    #[tokio::test]
    async fn test_429_is_blocked() {
        let server = MockServer::start().await;
        mock_inventory(&server, ResponseTemplate::new(429)).await;

        let outcome = executor()
            .fetch(&test_source(&server.uri()), &test_strategy())
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Blocked));
    }

    #[tokio::test]
    async fn test_404_is_soft() {
        let server = MockServer::start().await;
        mock_inventory(&server, ResponseTemplate::new(404)).await;

        let outcome = executor()
            .fetch(&test_source(&server.uri()), &test_strategy())
            .await;
        assert!(matches!(outcome, FetchOutcome::Soft { status: 404 }));
    }

    #[tokio::test]
    async fn test_500_is_hard() {
        let server = MockServer::start().await;
        mock_inventory(&server, ResponseTemplate::new(503)).await;

        let outcome = executor()
            .fetch(&test_source(&server.uri()), &test_strategy())
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Hard));
    }

    #[tokio::test]
    async fn test_connection_refused_is_hard() {
        let outcome = executor()
            .fetch(&test_source("http://127.0.0.1:9"), &test_strategy())
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Hard));
    }

    #[tokio::test]
    async fn test_strategy_headers_are_sent() {
        use wiremock::matchers::header;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coinorder/api/v4/inventory-results"))
            .and(header("user-agent", "lotwatch-test"))
            .and(header("cookie", "consent=yes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"total_matches_found": 0, "results": []}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let strategy = Strategy {
            name: "headered".into(),
            headers: vec![crate::models::Header {
                name: "user-agent".into(),
                value: "lotwatch-test".into(),
            }],
            cookie: Some("consent=yes".into()),
        };

        let outcome = executor().fetch(&test_source(&server.uri()), &strategy).await;
        assert!(matches!(outcome, FetchOutcome::Success(_)));
    }
}
