//! MQTT adapter — the automatic command path and telemetry uplink.
//!
//! Inbound: the energy manager publishes the commanded surplus power in
//! watts on the power topic.  The broker callback parses the payload,
//! stores it in the shared command state and queues a `CommandReceived`
//! event so the control loop recomputes the drive level immediately.
//!
//! Outbound: implements [`EventSink`]; every telemetry snapshot with a
//! fresh sample is published as a two-decimal temperature string on the
//! temperature topic.  Stale snapshots (probe failure) are suppressed —
//! downstream consumers never see a dead probe as a plausible number.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real `EspMqttClient` against the broker.
//! - **all other targets**: records published messages in-memory.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::SystemConfig;
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

#[cfg(target_os = "espidf")]
use crate::command_state::SHARED_COMMANDS;
#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

// ───────────────────────────────────────────────────────────────
// Payload codecs (pure, host-testable)
// ───────────────────────────────────────────────────────────────

/// Parse a power payload in watts.
///
/// Anything that does not parse as a finite number maps to 0 W — a
/// garbled frame must never leave the element running at its previous
/// level on a stale command.
pub fn parse_power_payload(payload: &[u8]) -> f32 {
    let Ok(text) = core::str::from_utf8(payload) else {
        return 0.0;
    };
    match text.trim().parse::<f32>() {
        Ok(watts) if watts.is_finite() => watts,
        _ => 0.0,
    }
}

/// Format a temperature sample as the fixed two-decimal wire string.
pub fn format_temperature(temp_c: f32) -> heapless::String<16> {
    let mut out = heapless::String::new();
    // 16 bytes fit every f32 rendered at two decimals.
    let _ = write!(out, "{temp_c:.2}");
    out
}

// ───────────────────────────────────────────────────────────────
// MQTT adapter
// ───────────────────────────────────────────────────────────────

pub struct MqttAdapter {
    temperature_topic: heapless::String<48>,
    power_topic: heapless::String<48>,
    #[cfg(target_os = "espidf")]
    client: EspMqttClient<'static>,
    #[cfg(not(target_os = "espidf"))]
    published: Vec<(String, String)>,
}

impl MqttAdapter {
    /// Connect the client and install the broker callback.
    ///
    /// The callback runs on the MQTT client task: it only touches the
    /// shared command state and the event queue, both lock-free.
    #[cfg(target_os = "espidf")]
    pub fn new(config: &SystemConfig) -> Result<Self, CommsError> {
        let power_topic = config.mqtt_power_topic.clone();
        let cb_topic = power_topic.clone();

        let mqtt_cfg = MqttClientConfiguration {
            client_id: Some("pvheat"),
            ..Default::default()
        };
        let client = EspMqttClient::new_cb(
            config.mqtt_broker_url.as_str(),
            &mqtt_cfg,
            move |event| match event.payload() {
                EventPayload::Connected(_) | EventPayload::Disconnected => {
                    push_event(Event::LinkChanged);
                }
                EventPayload::Received {
                    topic: Some(topic),
                    data,
                    ..
                } if topic == cb_topic.as_str() => {
                    SHARED_COMMANDS.set_automatic_power(parse_power_payload(data));
                    push_event(Event::CommandReceived);
                }
                _ => {}
            },
        )
        .map_err(|_| CommsError::MqttConnectFailed)?;

        Ok(Self {
            temperature_topic: config.mqtt_temperature_topic.clone(),
            power_topic,
            client,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: &SystemConfig) -> Result<Self, CommsError> {
        info!("MQTT(sim): client for '{}'", config.mqtt_broker_url);
        Ok(Self {
            temperature_topic: config.mqtt_temperature_topic.clone(),
            power_topic: config.mqtt_power_topic.clone(),
            published: Vec::new(),
        })
    }

    /// (Re)subscribe to the power topic.  Called from the main loop on
    /// every `LinkChanged` event — subscriptions do not survive a broker
    /// reconnect.
    pub fn subscribe_topics(&mut self) -> Result<(), CommsError> {
        #[cfg(target_os = "espidf")]
        {
            self.client
                .subscribe(self.power_topic.as_str(), QoS::AtMostOnce)
                .map_err(|_| CommsError::MqttConnectFailed)?;
        }
        info!("MQTT: subscribed to '{}'", self.power_topic);
        Ok(())
    }

    /// Publish one temperature sample on the temperature topic.
    pub fn publish_temperature(&mut self, temp_c: f32) -> Result<(), CommsError> {
        let payload = format_temperature(temp_c);

        #[cfg(target_os = "espidf")]
        {
            self.client
                .enqueue(
                    self.temperature_topic.as_str(),
                    QoS::AtMostOnce,
                    false,
                    payload.as_bytes(),
                )
                .map_err(|_| CommsError::MqttPublishFailed)?;
        }

        #[cfg(not(target_os = "espidf"))]
        self.published
            .push((self.temperature_topic.to_string(), payload.to_string()));

        Ok(())
    }

    /// Messages recorded by the simulation client (host/test only).
    #[cfg(not(target_os = "espidf"))]
    pub fn published(&self) -> &[(String, String)] {
        &self.published
    }
}

// ───────────────────────────────────────────────────────────────
// EventSink
// ───────────────────────────────────────────────────────────────

impl EventSink for MqttAdapter {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::Telemetry(t) = event {
            if !t.sensor_ok {
                // Stale sample: hold the publish rather than repeat a
                // number the probe did not produce.
                return;
            }
            if let Err(e) = self.publish_temperature(t.temperature_c) {
                warn!("MQTT: temperature publish failed ({e})");
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
