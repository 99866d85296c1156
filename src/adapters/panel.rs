//! Control panel adapter — embedded HTTP status page and manual override.
//!
//! The panel is the installer's surface: a static page with four trigger
//! links (automatic / 0 % / 50 % / 100 %) and a JSON status endpoint.
//!
//! Handlers run on the HTTP server task, so they follow the same
//! discipline as the MQTT callback: record the latest action in an
//! atomic, queue a `CommandReceived` event, and return.  The control
//! loop drains the action and applies it — a double-click between loop
//! iterations collapses to the last click, never a queue of stale ones.

use core::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

#[cfg(target_os = "espidf")]
use log::info;

use crate::app::commands::AppCommand;
use crate::app::events::StatusReport;
use crate::control::arbiter::{ManualLevel, ManualOverride};
#[cfg(target_os = "espidf")]
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

// ───────────────────────────────────────────────────────────────
// Panel actions
// ───────────────────────────────────────────────────────────────

/// The four manual-override triggers the panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    /// Return to automatic (MQTT-commanded) operation.
    Automatic,
    /// Force the element off (idle floor).
    ForceOff,
    /// Force 50 % drive.
    ForceHalf,
    /// Force 100 % drive.
    ForceFull,
}

impl PanelAction {
    /// The request path that triggers this action.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Automatic => "/manual/auto",
            Self::ForceOff => "/manual/off",
            Self::ForceHalf => "/manual/half",
            Self::ForceFull => "/manual/full",
        }
    }

    pub const ALL: [Self; 4] = [
        Self::Automatic,
        Self::ForceOff,
        Self::ForceHalf,
        Self::ForceFull,
    ];

    /// Translate the trigger into an application command.
    pub const fn command(self) -> AppCommand {
        match self {
            Self::Automatic => AppCommand::SetManual(ManualOverride::Disabled),
            Self::ForceOff => AppCommand::SetManual(ManualOverride::Level(ManualLevel::Off)),
            Self::ForceHalf => AppCommand::SetManual(ManualOverride::Level(ManualLevel::Half)),
            Self::ForceFull => AppCommand::SetManual(ManualOverride::Level(ManualLevel::Full)),
        }
    }
}

/// Map a request path to its panel action.
pub fn parse_action(path: &str) -> Option<PanelAction> {
    PanelAction::ALL.into_iter().find(|a| a.path() == path)
}

// ───────────────────────────────────────────────────────────────
// Handler → control-loop handoff
// ───────────────────────────────────────────────────────────────

const PENDING_NONE: u8 = 0;

// Latest-action-wins cell written by HTTP handlers, drained by the loop.
static PENDING_ACTION: AtomicU8 = AtomicU8::new(PENDING_NONE);

fn action_code(action: PanelAction) -> u8 {
    match action {
        PanelAction::Automatic => 1,
        PanelAction::ForceOff => 2,
        PanelAction::ForceHalf => 3,
        PanelAction::ForceFull => 4,
    }
}

/// Record a trigger from handler context.
pub fn set_pending(action: PanelAction) {
    PENDING_ACTION.store(action_code(action), Ordering::Release);
}

/// Drain the pending trigger (control-loop context).
pub fn take_pending() -> Option<PanelAction> {
    match PENDING_ACTION.swap(PENDING_NONE, Ordering::AcqRel) {
        1 => Some(PanelAction::Automatic),
        2 => Some(PanelAction::ForceOff),
        3 => Some(PanelAction::ForceHalf),
        4 => Some(PanelAction::ForceFull),
        _ => None,
    }
}

// ───────────────────────────────────────────────────────────────
// Status read model
// ───────────────────────────────────────────────────────────────

// Handlers read, the control loop writes after every temperature tick.
static STATUS: Mutex<StatusReport> = Mutex::new(StatusReport {
    manual: "DISABLED",
    automatic_power_w: 0.0,
    duty_cycle: 0,
    temperature_c: 0.0,
    sensor_ok: false,
    overheat: false,
});

/// Refresh the snapshot served by `/status` (control-loop context).
pub fn publish_status(report: StatusReport) {
    if let Ok(mut status) = STATUS.lock() {
        *status = report;
    }
}

/// Current snapshot as the JSON body of `/status`.
pub fn status_json() -> String {
    let snapshot = STATUS.lock().map(|s| *s).unwrap_or_default();
    serde_json::to_string(&snapshot).unwrap_or_default()
}

// ───────────────────────────────────────────────────────────────
// HTTP server (espidf only)
// ───────────────────────────────────────────────────────────────

const INDEX_HTML: &str = "<!DOCTYPE html><html><head><title>PV Heater</title></head>\
<body><h1>PV Heater</h1>\
<p><a href=\"/manual/auto\">Automatic</a> | \
<a href=\"/manual/off\">0%</a> | \
<a href=\"/manual/half\">50%</a> | \
<a href=\"/manual/full\">100%</a></p>\
<p><a href=\"/status\">Status (JSON)</a></p></body></html>";

/// Start the panel server and register all routes.
///
/// The returned server must be kept alive for the routes to stay
/// registered; `main()` holds it for the process lifetime.
#[cfg(target_os = "espidf")]
pub fn start_server() -> Result<esp_idf_svc::http::server::EspHttpServer<'static>, CommsError> {
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::http::Method;
    use esp_idf_svc::io::Write as _;

    let mut server = EspHttpServer::new(&Configuration::default())
        .map_err(|_| CommsError::HttpServerFailed)?;

    server
        .fn_handler::<anyhow::Error, _>("/", Method::Get, |req| {
            req.into_response(200, Some("OK"), &[("Content-Type", "text/html")])?
                .write_all(INDEX_HTML.as_bytes())?;
            Ok(())
        })
        .map_err(|_| CommsError::HttpServerFailed)?;

    server
        .fn_handler::<anyhow::Error, _>("/status", Method::Get, |req| {
            let body = status_json();
            req.into_response(200, Some("OK"), &[("Content-Type", "application/json")])?
                .write_all(body.as_bytes())?;
            Ok(())
        })
        .map_err(|_| CommsError::HttpServerFailed)?;

    for action in PanelAction::ALL {
        server
            .fn_handler::<anyhow::Error, _>(action.path(), Method::Get, move |req| {
                set_pending(action);
                push_event(Event::CommandReceived);
                req.into_response(200, Some("OK"), &[("Content-Type", "text/html")])?
                    .write_all(INDEX_HTML.as_bytes())?;
                Ok(())
            })
            .map_err(|_| CommsError::HttpServerFailed)?;
    }

    info!("Panel: HTTP server up (/, /status, 4 manual triggers)");
    Ok(server)
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
