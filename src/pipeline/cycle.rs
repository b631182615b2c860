//! One check cycle: fetch, diff, notify.

use chrono::Utc;

use crate::diff;
use crate::fetch::FallbackController;
use crate::models::{Config, Snapshot};
use crate::notify::{Dispatcher, Event};
use crate::tracker::{ErrorDecision, ErrorTracker};

/// All state that survives between cycles.
///
/// Threaded explicitly through [`run_cycle`] and owned by the single
/// scheduler worker; the no-overlap guarantee means no other flow ever
/// touches it concurrently.
#[derive(Debug)]
pub struct TrackerState {
    /// Last observed inventory; `None` until the first successful fetch.
    pub snapshot: Option<Snapshot>,

    /// Error window state for outage suppression.
    pub errors: ErrorTracker,

    /// Index of the source the previous successful cycle read from.
    /// Moving to a higher index is a demotion worth announcing.
    pub active_source: usize,
}

impl TrackerState {
    pub fn new(config: &Config) -> Self {
        Self {
            snapshot: None,
            errors: ErrorTracker::new(config.tracker.suppress_minutes),
            active_source: 0,
        }
    }
}

/// Run one complete check cycle.
///
/// Every failure path ends inside this function as a logged event or a
/// tracked error decision; nothing propagates to the scheduler.
pub async fn run_cycle(
    fetcher: &FallbackController,
    dispatcher: &Dispatcher,
    state: &mut TrackerState,
) {
    log::info!("Checking inventory...");

    match fetcher.acquire().await {
        Ok(acquisition) => {
            let source = fetcher.sources()[acquisition.source_index].clone();

            if acquisition.source_index > state.active_source {
                let from = fetcher.sources()[state.active_source].label();
                log::warn!("Demoted from source {from} to {}", source.label());
                dispatcher
                    .dispatch(Event::SourceDemoted {
                        from,
                        to: source.label(),
                    })
                    .await;
            } else if acquisition.source_index < state.active_source {
                log::info!("Preferred source {} is answering again", source.label());
            }
            state.active_source = acquisition.source_index;

            if state.errors.on_success() {
                // Recovery is silent; the next inventory event says enough.
                log::info!("Inventory source recovered; resuming normal checks.");
            }

            let page = acquisition.page;
            log::info!(
                "Inventory fetched from {}: total {}, {} on page",
                source.label(),
                page.total,
                page.vehicles.len()
            );

            match &state.snapshot {
                None => {
                    if page.total > 0 {
                        dispatcher
                            .dispatch(Event::InitialInventory {
                                total: page.total,
                                vehicles: page.vehicles.clone(),
                                source,
                            })
                            .await;
                    } else {
                        log::info!("No vehicles listed on first observation; tracking silently.");
                    }
                }
                Some(previous) => {
                    let delta = diff::calculate(previous, &page);

                    if delta.is_empty() {
                        log::info!("Inventory unchanged: {} vehicle(s)", page.total);
                    }
                    if !delta.added.is_empty() {
                        dispatcher
                            .dispatch(Event::VehiclesAdded {
                                added: delta.added.clone(),
                                total: page.total,
                                source,
                            })
                            .await;
                    }
                    if delta.removed_count > 0 {
                        if page.total > 0 {
                            dispatcher
                                .dispatch(Event::InventoryShrunk {
                                    removed: delta.removed_count,
                                    remaining: page.total,
                                })
                                .await;
                        } else {
                            log::info!("All vehicles left the listing; staying silent.");
                        }
                    }
                }
            }

            // Replaced unconditionally so drift cannot accumulate.
            state.snapshot = Some(Snapshot::capture(&page));
        }

        Err(failure) => {
            log::error!("Check cycle failed: {failure}");

            match state.errors.on_failure(Utc::now()) {
                ErrorDecision::Open => {
                    dispatcher
                        .dispatch(Event::ErrorOpened {
                            detail: failure.detail,
                        })
                        .await;
                }
                ErrorDecision::StillFailing { minutes } => {
                    dispatcher
                        .dispatch(Event::ErrorPersisting {
                            minutes,
                            detail: failure.detail,
                        })
                        .await;
                }
                ErrorDecision::Suppressed => {
                    log::debug!("Error notification suppressed; window still open.");
                }
            }
        }
    }
}
