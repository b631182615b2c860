//! Strategy sweep and regional source fallback.

use std::time::Duration;

use crate::models::{Config, InventoryPage, Source, Strategy, builtin_catalog};

use super::executor::{FailureKind, FetchExecutor, FetchOutcome};
use super::retry::{BackoffShape, RetryPolicy};

/// All strategies and sources exhausted in one cycle.
#[derive(Debug, Clone)]
pub struct TerminalFailure {
    /// Classification of the last observed failure.
    pub kind: FailureKind,
    pub detail: String,
}

impl std::fmt::Display for TerminalFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail)
    }
}

/// A successful acquisition: the parsed page plus which source produced
/// it, so the cycle can notice demotions.
#[derive(Debug)]
pub struct Acquisition {
    pub page: InventoryPage,
    pub source_index: usize,
}

/// Drives the fetch executor across strategies, sweep retries, and
/// regional sources until one attempt succeeds or everything is spent.
///
/// The first successful (strategy, source) pair wins; there is no scoring
/// beyond declared order.
pub struct FallbackController {
    executor: FetchExecutor,
    sources: Vec<Source>,
    strategy_override: Vec<Strategy>,
    source_attempts: u32,
    backoff_unit: Duration,
    attempt_delay_min: Duration,
    attempt_delay_max: Duration,
}

impl FallbackController {
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        Ok(Self {
            executor: FetchExecutor::new(&config.fetch)?,
            sources: config.sources.clone(),
            strategy_override: config.strategies.clone(),
            source_attempts: config.fetch.source_attempts,
            backoff_unit: Duration::from_millis(config.fetch.backoff_unit_ms),
            attempt_delay_min: Duration::from_millis(config.fetch.attempt_delay_min_ms),
            attempt_delay_max: Duration::from_millis(config.fetch.attempt_delay_max_ms),
        })
    }

    /// The sources this controller rotates across, in preference order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Acquire one inventory page, or report terminal failure carrying
    /// the last observed classification.
    pub async fn acquire(&self) -> Result<Acquisition, TerminalFailure> {
        let mut last = TerminalFailure {
            kind: FailureKind::Hard,
            detail: "no sources configured".to_string(),
        };

        for (index, source) in self.sources.iter().enumerate() {
            let strategies = self.strategies_for(source);
            let sweep_retry = RetryPolicy {
                max_attempts: self.source_attempts,
                shape: BackoffShape::Linear {
                    unit: self.backoff_unit,
                },
            };

            match sweep_retry
                .run(|sweep| self.sweep(source, &strategies, sweep))
                .await
            {
                Ok(page) => {
                    return Ok(Acquisition {
                        page,
                        source_index: index,
                    });
                }
                Err(failure) => {
                    log::warn!(
                        "Source {} exhausted after {} sweep(s): {}",
                        source.label(),
                        self.source_attempts.max(1),
                        failure
                    );
                    last = failure;
                }
            }
        }

        Err(last)
    }

    /// One pass over the strategy catalog for a source, with randomized
    /// pacing between attempts.
    async fn sweep(
        &self,
        source: &Source,
        strategies: &[Strategy],
        sweep: u32,
    ) -> Result<InventoryPage, TerminalFailure> {
        if strategies.is_empty() {
            return Err(TerminalFailure {
                kind: FailureKind::Hard,
                detail: "no strategies configured".to_string(),
            });
        }

        let policy = RetryPolicy {
            max_attempts: strategies.len() as u32,
            shape: BackoffShape::Jittered {
                min: self.attempt_delay_min,
                max: self.attempt_delay_max,
            },
        };

        policy
            .run(|attempt| {
                let strategy = &strategies[attempt as usize - 1];
                async move {
                    log::debug!(
                        "Fetching {} with strategy {} (sweep {sweep}, attempt {attempt})",
                        source.label(),
                        strategy.name
                    );

                    match self.executor.fetch(source, strategy).await {
                        FetchOutcome::Success(page) => Ok(page),
                        outcome => {
                            log::warn!(
                                "Strategy {} against {} failed: {}",
                                strategy.name,
                                source.label(),
                                outcome.describe()
                            );
                            Err(TerminalFailure {
                                kind: outcome.failure_kind().unwrap_or(FailureKind::Hard),
                                detail: format!(
                                    "{} via {}: {}",
                                    source.label(),
                                    strategy.name,
                                    outcome.describe()
                                ),
                            })
                        }
                    }
                }
            })
            .await
    }

    fn strategies_for(&self, source: &Source) -> Vec<Strategy> {
        if self.strategy_override.is_empty() {
            builtin_catalog(&source.referer())
        } else {
            self.strategy_override.clone()
        }
    }
}
