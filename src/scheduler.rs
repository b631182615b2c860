//! Periodic check scheduling with overlap protection and graceful
//! shutdown.

use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::fetch::FallbackController;
use crate::models::Config;
use crate::notify::{Dispatcher, Event};
use crate::pipeline::{TrackerState, run_cycle};

/// Run check cycles until a shutdown signal arrives.
///
/// The first cycle runs immediately. Cycles execute inside the tick arm,
/// so a new tick can never start one while the previous is in flight;
/// ticks that elapse during a slow cycle are skipped, not queued. A
/// shutdown signal received mid-cycle takes effect once that cycle
/// completes.
pub async fn run(
    fetcher: &FallbackController,
    dispatcher: &Dispatcher,
    config: &Config,
    state: &mut TrackerState,
) {
    dispatcher
        .dispatch(Event::Startup {
            source: fetcher.sources()[0].label(),
            period_secs: config.poller.period_secs,
        })
        .await;

    let mut ticker = tokio::time::interval(Duration::from_secs(config.poller.period_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut first = true;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if first {
                    first = false;
                } else {
                    let jitter = period_jitter(config.poller.jitter_secs);
                    if !jitter.is_zero() {
                        tokio::time::sleep(jitter).await;
                    }
                }
                run_cycle(fetcher, dispatcher, state).await;
            }
            _ = &mut shutdown => {
                log::info!("Shutdown signal received; stopping checks.");
                break;
            }
        }
    }

    // Best effort: a dropped goodbye is acceptable loss.
    dispatcher.dispatch(Event::Shutdown).await;
}

/// Random extra delay before a check so the cadence is not an exact
/// fingerprint.
fn period_jitter(jitter_secs: u64) -> Duration {
    if jitter_secs == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::random_range(0..=jitter_secs * 1_000))
}

/// Completes on ctrl-c or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
