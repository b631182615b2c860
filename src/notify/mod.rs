//! Notification rendering and dispatch.
//!
//! Domain events are rendered into Markdown messages and delivered
//! sequentially through a [`MessageChannel`]. Delivery is paced to stay
//! under the channel's own rate limits, detail bursts are capped per
//! cycle, and a failed send is logged and dropped — never escalated.

pub mod telegram;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NotifyConfig, Source, Vehicle};

/// Narrow contract over the external messaging channel. Sequential calls
/// from one sender must arrive in order.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Discrete notification-worthy happenings, produced by the cycle and
/// the scheduler.
#[derive(Debug, Clone)]
pub enum Event {
    Startup {
        source: String,
        period_secs: u64,
    },
    /// First successful observation of a non-empty inventory. Distinct
    /// from an addition: nothing "changed", something was seen.
    InitialInventory {
        total: usize,
        vehicles: Vec<Vehicle>,
        source: Source,
    },
    VehiclesAdded {
        added: Vec<Vehicle>,
        total: usize,
        source: Source,
    },
    InventoryShrunk {
        removed: usize,
        remaining: usize,
    },
    /// One-time advisory that the controller fell back to a later
    /// source, so readers know why listings may look different.
    SourceDemoted {
        from: String,
        to: String,
    },
    ErrorOpened {
        detail: String,
    },
    ErrorPersisting {
        minutes: i64,
        detail: String,
    },
    Shutdown,
}

/// A rendered message awaiting delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
    /// Per-vehicle detail messages pace slower than the rest.
    pub detail: bool,
}

impl Message {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            detail: false,
        }
    }

    fn detail(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            detail: true,
        }
    }
}

/// Render one event into its message sequence, capping per-vehicle
/// details at `max_details` with a trailing "more" summary.
pub fn render(event: &Event, max_details: usize) -> Vec<Message> {
    match event {
        Event::Startup {
            source,
            period_secs,
        } => vec![Message::new(
            "Inventory tracker started",
            format!("🚀 Watching {source}, checking every {period_secs}s."),
        )],

        Event::InitialInventory {
            total,
            vehicles,
            source,
        } => {
            let mut messages = vec![Message::new(
                "Inventory status",
                format!("📊 {total} vehicle(s) currently listed."),
            )];
            push_details(&mut messages, vehicles, source, max_details, "Listed vehicle");
            let shown = vehicles.len().min(max_details);
            if *total > shown {
                messages.push(Message::new(
                    "More vehicles",
                    format!("{} more listed beyond the first {shown}.", total - shown),
                ));
            }
            messages
        }

        Event::VehiclesAdded {
            added,
            total,
            source,
        } => {
            let mut messages = vec![Message::new(
                "New vehicles",
                format!(
                    "🎉 {} new vehicle(s) in the inventory!\nTotal now: {total}",
                    added.len()
                ),
            )];
            push_details(&mut messages, added, source, max_details, "New vehicle");
            if added.len() > max_details {
                messages.push(Message::new(
                    "More vehicles",
                    format!(
                        "{} more new vehicle(s) beyond the first {max_details}.",
                        added.len() - max_details
                    ),
                ));
            }
            messages
        }

        Event::InventoryShrunk { removed, remaining } => vec![Message::new(
            "Inventory update",
            format!("📉 {removed} vehicle(s) left the listing.\nRemaining: {remaining}"),
        )],

        Event::SourceDemoted { from, to } => vec![Message::new(
            "Source fallback",
            format!(
                "⚠️ {from} is not answering; now reading {to} instead. \
                 Listings and prices may appear in a different market's currency."
            ),
        )],

        Event::ErrorOpened { detail } => vec![Message::new(
            "Tracker error",
            format!("❌ Inventory source unreachable: {detail}"),
        )],

        Event::ErrorPersisting { minutes, detail } => vec![Message::new(
            "Tracker still failing",
            format!("⚠️ Inventory source unreachable for {minutes} minutes: {detail}"),
        )],

        Event::Shutdown => vec![Message::new(
            "Inventory tracker stopped",
            "🛑 Tracking stopped.",
        )],
    }
}

fn push_details(
    messages: &mut Vec<Message>,
    vehicles: &[Vehicle],
    source: &Source,
    max_details: usize,
    title_prefix: &str,
) {
    let shown = vehicles.len().min(max_details);
    for (index, vehicle) in vehicles.iter().take(max_details).enumerate() {
        messages.push(Message::detail(
            format!("{title_prefix} {}/{shown}", index + 1),
            render_vehicle(vehicle, source),
        ));
    }
}

/// Detail body for one vehicle: headline, price, VIN, options, and the
/// direct order link when a VIN is present.
pub fn render_vehicle(vehicle: &Vehicle, source: &Source) -> String {
    let mut body = format!("🚗 {}\n", vehicle.summary());

    if let Some(price) = vehicle.price {
        body.push_str(&format!("💰 Price: {price} {}\n", vehicle.currency));
    }
    if let Some(vin) = &vehicle.vin {
        body.push_str(&format!("🔢 VIN: {vin}\n"));
    }
    if let Some(paint) = vehicle.paint.first() {
        body.push_str(&format!("🎨 Paint: {paint}\n"));
    }
    if let Some(interior) = vehicle.interior.first() {
        body.push_str(&format!("🪑 Interior: {interior}\n"));
    }
    if let Some(vin) = &vehicle.vin {
        body.push_str(&format!("\n🔗 View: {}", source.order_url(vin)));
    }

    body
}

/// Renders events and delivers them in order through the channel.
pub struct Dispatcher {
    channel: Box<dyn MessageChannel>,
    config: NotifyConfig,
}

impl Dispatcher {
    pub fn new(channel: Box<dyn MessageChannel>, config: NotifyConfig) -> Self {
        Self { channel, config }
    }

    /// Render and deliver one event.
    ///
    /// A failed send is logged and skipped; the rest of the sequence
    /// still goes out and the caller never sees an error.
    pub async fn dispatch(&self, event: Event) {
        let messages = render(&event, self.config.max_details);

        for (index, message) in messages.iter().enumerate() {
            if index > 0 {
                let pace_ms = if message.detail {
                    self.config.detail_pace_ms
                } else {
                    self.config.pace_ms
                };
                tokio::time::sleep(Duration::from_millis(pace_ms)).await;
            }

            let text = format!("*{}*\n\n{}", message.title, message.body);
            match self.channel.send(&text).await {
                Ok(()) => log::info!("Notification sent: {}", message.title),
                Err(e) => log::error!("Notification delivery failed ({}): {e}", message.title),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn source() -> Source {
        Source {
            market: "TR".into(),
            language: "tr".into(),
            super_region: "europe".into(),
            base_url: "https://www.tesla.com".into(),
            model: "my".into(),
        }
    }

    fn vehicle(vin: &str) -> Vehicle {
        Vehicle {
            vin: Some(vin.to_string()),
            model: "Model Y".into(),
            trim: "Long Range".into(),
            year: Some(2025),
            price: Some(52_000.0),
            currency: "TRY".into(),
            paint: vec!["White".into()],
            interior: vec!["Black".into()],
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageChannel for Recorder {
        async fn send(&self, text: &str) -> Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(crate::error::AppError::notify("channel down"));
            }
            Ok(())
        }
    }

    fn instant_config() -> NotifyConfig {
        NotifyConfig {
            pace_ms: 0,
            detail_pace_ms: 0,
            max_details: 5,
        }
    }

    #[test]
    fn test_initial_inventory_caps_details() {
        let vehicles: Vec<_> = (0..8).map(|i| vehicle(&format!("VIN{i}"))).collect();
        let event = Event::InitialInventory {
            total: 12,
            vehicles,
            source: source(),
        };

        let messages = render(&event, 5);
        // Status + 5 details + "more" summary.
        assert_eq!(messages.len(), 7);
        assert_eq!(messages.iter().filter(|m| m.detail).count(), 5);
        assert!(messages[6].body.contains("7 more"));
    }

    #[test]
    fn test_added_under_cap_has_no_more_summary() {
        let event = Event::VehiclesAdded {
            added: vec![vehicle("A"), vehicle("B")],
            total: 9,
            source: source(),
        };

        let messages = render(&event, 5);
        assert_eq!(messages.len(), 3);
        assert!(messages[0].body.contains("2 new vehicle(s)"));
        assert!(messages[0].body.contains("Total now: 9"));
    }

    #[test]
    fn test_vehicle_detail_includes_order_link() {
        let body = render_vehicle(&vehicle("5YJ001"), &source());
        assert!(body.contains("2025 Model Y Long Range"));
        assert!(body.contains("52000 TRY"));
        assert!(body.contains("VIN: 5YJ001"));
        assert!(body.contains("tr_TR/my/order/5YJ001"));
    }

    #[test]
    fn test_vehicle_without_vin_has_no_link() {
        let mut v = vehicle("X");
        v.vin = None;
        let body = render_vehicle(&v, &source());
        assert!(!body.contains("View:"));
        assert!(!body.contains("VIN:"));
    }

    #[test]
    fn test_single_message_events() {
        for event in [
            Event::InventoryShrunk {
                removed: 2,
                remaining: 5,
            },
            Event::SourceDemoted {
                from: "TR (tr_TR)".into(),
                to: "DE (de_DE)".into(),
            },
            Event::ErrorOpened {
                detail: "status 403".into(),
            },
            Event::ErrorPersisting {
                minutes: 45,
                detail: "timeout".into(),
            },
            Event::Shutdown,
        ] {
            assert_eq!(render(&event, 5).len(), 1, "event {event:?}");
        }
    }

    #[tokio::test]
    async fn test_dispatch_sends_in_order() {
        let recorder = Recorder::default();
        let dispatcher = Dispatcher::new(Box::new(recorder.clone()), instant_config());

        dispatcher
            .dispatch(Event::VehiclesAdded {
                added: vec![vehicle("A")],
                total: 3,
                source: source(),
            })
            .await;

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].starts_with("*New vehicles*"));
        assert!(sent[1].starts_with("*New vehicle 1/1*"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let dispatcher = Dispatcher::new(Box::new(recorder.clone()), instant_config());

        // Must not panic or abort; every message is still attempted.
        dispatcher
            .dispatch(Event::InitialInventory {
                total: 2,
                vehicles: vec![vehicle("A"), vehicle("B")],
                source: source(),
            })
            .await;

        assert_eq!(recorder.sent.lock().unwrap().len(), 3);
    }
}
