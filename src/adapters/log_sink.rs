//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The MQTT adapter implements the same trait for the network side.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={:.2}\u{00b0}C ({}) | auto={:.0}W | manual={} | \
                     duty={} | overheat={}",
                    t.temperature_c,
                    if t.sensor_ok { "ok" } else { "STALE" },
                    t.automatic_power_w,
                    t.manual_label,
                    t.duty_cycle,
                    t.overheat,
                );
            }
            AppEvent::OverheatTripped { temp_c } => {
                warn!("SAFETY | overheat tripped at {:.2}\u{00b0}C", temp_c);
            }
            AppEvent::OverheatCleared { temp_c } => {
                info!("SAFETY | overheat cleared at {:.2}\u{00b0}C", temp_c);
            }
            AppEvent::ManualChanged { label } => {
                info!("MANUAL | override -> {}", label);
            }
            AppEvent::Started { duty } => {
                info!("START | initial_duty={}", duty);
            }
        }
    }
}
