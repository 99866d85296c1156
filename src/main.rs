//! PvHeat Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  HardwareAdapter   LogEventSink   MqttAdapter   Esp32Time  │
//! │  (Sensor+Actuator) (EventSink)    (EventSink)              │
//! │  WifiAdapter       Panel (HTTP)                            │
//! │  (Connectivity)                                            │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────────    │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │             AppService (pure logic)                  │  │
//! │  │  Arbiter · Mapper · Thermal interlock                │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod command_state;
mod error;
mod events;
mod pins;
mod safety;

pub mod app;
mod adapters;
mod control;
mod drivers;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::mqtt::MqttAdapter;
use adapters::panel;
use adapters::time::Esp32TimeAdapter;
use adapters::wifi::{ConnectivityPort, WifiAdapter};
use app::events::AppEvent;
use app::ports::EventSink;
use app::service::AppService;
use command_state::SHARED_COMMANDS;
use config::SystemConfig;
use drivers::heater::HeaterDriver;
use events::{push_event, Event};
use sensors::temperature::{Ds18b20Sensor, TANK_PROBE_ADDRESS};

// WiFi credentials are baked in at build time; the device has no
// provisioning surface.
const WIFI_SSID: &str = match option_env!("PVHEAT_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "heizung",
};
const WIFI_PASSWORD: &str = match option_env!("PVHEAT_WIFI_PASSWORD") {
    Some(pw) => pw,
    None => "",
};

// ── Event fan-out ─────────────────────────────────────────────
//
// The service emits each event once; this sink forwards it to both the
// serial log and the MQTT uplink.

struct CompositeSink<A, B>(A, B);

impl<A: EventSink, B: EventSink> EventSink for CompositeSink<A, B> {
    fn emit(&mut self, event: &AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PvHeat v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = drivers::watchdog::Watchdog::new();

    let config = SystemConfig::default();
    let time_adapter = Esp32TimeAdapter::new();

    // ── 3. Construct adapters ─────────────────────────────────
    let sensor = Ds18b20Sensor::new(pins::ONE_WIRE_GPIO, TANK_PROBE_ADDRESS);
    let mut hw = HardwareAdapter::new(sensor, HeaterDriver::new());
    let mut log_sink = LogEventSink::new();

    // ── 4. WiFi station adapter ───────────────────────────────
    let mut wifi = WifiAdapter::new();
    #[cfg(target_os = "espidf")]
    {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::hal::peripherals::Peripherals;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        let driver = BlockingWifi::wrap(
            EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
            sysloop,
        )?;
        wifi.attach_driver(driver);
    }
    if let Err(e) = wifi.set_credentials(WIFI_SSID, WIFI_PASSWORD) {
        warn!("WiFi: bad credentials ({e}), running offline");
    } else if let Err(e) = wifi.connect() {
        // The reconnect backoff keeps retrying from the loop.
        warn!("WiFi: initial connect failed ({e})");
    }

    // ── 5. MQTT + control panel ───────────────────────────────
    let mut mqtt = MqttAdapter::new(&config)?;

    #[cfg(target_os = "espidf")]
    let _panel_server = panel::start_server()?;

    // ── 6. OTA bookkeeping ────────────────────────────────────
    // Comms are up and the control core is about to start: this image
    // is good, cancel any pending bootloader rollback.
    #[cfg(target_os = "espidf")]
    if let Err(e) = esp_ota::mark_app_valid() {
        warn!("OTA: mark_app_valid failed ({e:?})");
    }

    // ── 7. Construct app service ──────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(
        &mut hw,
        &mut CompositeSink(&mut log_sink, &mut mqtt),
    );

    info!("System ready. Entering control loop.");

    // ── 8. Control loop ───────────────────────────────────────
    let mut last_temp_sample_ms: u64 = 0;

    loop {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.control_loop_interval_ms,
        )));
        push_event(Event::ControlTick);

        // Temperature pacing off the monotonic clock, not tick counting —
        // a slow loop iteration must not stretch the sampling interval.
        let now_ms = time_adapter.uptime_ms();
        if now_ms.saturating_sub(last_temp_sample_ms) >= u64::from(config.temp_sample_interval_ms)
        {
            last_temp_sample_ms = now_ms;
            push_event(Event::TemperatureTick);
        }

        // Panel triggers funnel through the same command path as MQTT.
        if let Some(action) = panel::take_pending() {
            app.handle_command(
                action.command(),
                &SHARED_COMMANDS,
                &mut hw,
                &mut CompositeSink(&mut log_sink, &mut mqtt),
            );
            // Refresh the panel snapshot now — a click must show up on
            // /status without waiting for the next temperature tick.
            panel::publish_status(app.status(&SHARED_COMMANDS));
        }

        // Process all pending events.
        events::drain_events(|event| match event {
            Event::ControlTick | Event::CommandReceived => {
                app.control_tick(&SHARED_COMMANDS, &mut hw);
            }

            Event::TemperatureTick => {
                app.temperature_tick(
                    &SHARED_COMMANDS,
                    &mut hw,
                    &mut CompositeSink(&mut log_sink, &mut mqtt),
                );
                panel::publish_status(app.status(&SHARED_COMMANDS));
            }

            Event::LinkChanged => {
                info!("Link changed (connected={})", wifi.is_connected());
                if let Err(e) = mqtt.subscribe_topics() {
                    warn!("MQTT: resubscribe failed ({e})");
                }
            }
        });

        // WiFi reconnection poll (exponential backoff, non-blocking while
        // the backoff runs so the watchdog keeps getting fed).
        wifi.poll(time_adapter.uptime_ms());

        // Feed watchdog on every iteration.
        watchdog.feed();
    }
}
