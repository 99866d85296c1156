//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements       | Connects to                  |
//! |------------|------------------|------------------------------|
//! | `hardware` | SensorPort       | DS18B20 one-wire probe       |
//! |            | ActuatorPort     | Heater LEDC PWM              |
//! | `log_sink` | EventSink        | Serial log output            |
//! | `mqtt`     | EventSink        | MQTT broker (power in,       |
//! |            |                  | temperature out)             |
//! | `panel`    | —                | Embedded HTTP status panel   |
//! | `time`     | —                | ESP32 system timer           |
//! | `wifi`     | ConnectivityPort | ESP-IDF WiFi STA             |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod panel;
pub mod time;
pub mod wifi;
