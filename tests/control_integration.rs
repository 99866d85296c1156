//! Integration tests: AppService → arbiter/mapper/interlock → actuator.

use pvheat::app::commands::AppCommand;
use pvheat::app::events::AppEvent;
use pvheat::app::ports::{ActuatorPort, EventSink, SensorPort};
use pvheat::app::service::AppService;
use pvheat::command_state::SharedCommands;
use pvheat::config::SystemConfig;
use pvheat::control::arbiter::{ManualLevel, ManualOverride};
use pvheat::error::SensorError;

// ── Mock implementations ──────────────────────────────────────

struct MockHw {
    /// Every duty written, in order.
    duties: Vec<u16>,
    /// What the next probe read returns.
    next_read: Result<f32, SensorError>,
}

impl MockHw {
    fn new() -> Self {
        Self {
            duties: Vec::new(),
            next_read: Ok(25.0),
        }
    }

    fn last_duty(&self) -> u16 {
        *self.duties.last().expect("no duty written yet")
    }
}

impl SensorPort for MockHw {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.next_read
    }
}

impl ActuatorPort for MockHw {
    fn write_duty(&mut self, duty: u16) {
        self.duties.push(duty);
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<String>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        let tag = match event {
            AppEvent::Telemetry(t) => {
                format!("telemetry(ok={},T={:.2})", t.sensor_ok, t.temperature_c)
            }
            AppEvent::OverheatTripped { temp_c } => format!("tripped({temp_c:.1})"),
            AppEvent::OverheatCleared { temp_c } => format!("cleared({temp_c:.1})"),
            AppEvent::ManualChanged { label } => format!("manual({label})"),
            AppEvent::Started { duty } => format!("started({duty})"),
        };
        self.events.push(tag);
    }
}

fn setup() -> (AppService, SharedCommands, MockHw, RecordingSink) {
    (
        AppService::new(SystemConfig::default()),
        SharedCommands::new(),
        MockHw::new(),
        RecordingSink::default(),
    )
}

// ── Arbitration ───────────────────────────────────────────────

#[test]
fn automatic_watts_drive_the_element() {
    let (mut app, shared, mut hw, mut sink) = setup();
    app.handle_command(
        AppCommand::SetAutomaticPower(1500.0),
        &shared,
        &mut hw,
        &mut sink,
    );
    // 102 + 819 * 0.5 = 511.5 → 512.
    assert_eq!(hw.last_duty(), 512);
}

#[test]
fn manual_override_beats_automatic_power() {
    let (mut app, shared, mut hw, mut sink) = setup();
    shared.set_automatic_power(3000.0);

    app.handle_command(
        AppCommand::SetManual(ManualOverride::Level(ManualLevel::Half)),
        &shared,
        &mut hw,
        &mut sink,
    );

    assert_eq!(hw.last_duty(), 512, "manual 50% wins over automatic 3 kW");
    assert_eq!(sink.events, vec!["manual(50%)".to_string()]);
}

#[test]
fn disabling_manual_returns_to_automatic() {
    let (mut app, shared, mut hw, mut sink) = setup();
    shared.set_automatic_power(3000.0);

    app.handle_command(
        AppCommand::SetManual(ManualOverride::Level(ManualLevel::Off)),
        &shared,
        &mut hw,
        &mut sink,
    );
    assert_eq!(hw.last_duty(), 102, "forced 0% idles the element");

    app.handle_command(
        AppCommand::SetManual(ManualOverride::Disabled),
        &shared,
        &mut hw,
        &mut sink,
    );
    assert_eq!(hw.last_duty(), 921, "automatic 3 kW resumes immediately");
}

#[test]
fn command_updates_duty_without_waiting_for_a_tick() {
    let (mut app, shared, mut hw, mut sink) = setup();

    app.handle_command(
        AppCommand::SetAutomaticPower(3000.0),
        &shared,
        &mut hw,
        &mut sink,
    );

    assert_eq!(
        hw.duties.len(),
        1,
        "handle_command runs the actuator path itself"
    );
    assert_eq!(hw.last_duty(), 921);
}

// ── Interlock through the service ─────────────────────────────

#[test]
fn overheat_pins_element_even_under_manual_full() {
    let (mut app, shared, mut hw, mut sink) = setup();
    shared.set_manual(ManualOverride::Level(ManualLevel::Full));

    hw.next_read = Ok(80.0);
    app.temperature_tick(&shared, &mut hw, &mut sink);
    app.control_tick(&shared, &mut hw);

    assert!(app.is_overheat_tripped());
    assert_eq!(hw.last_duty(), 102, "interlock outranks manual 100%");
    assert!(sink.events.iter().any(|e| e == "tripped(80.0)"));
}

#[test]
fn overheat_clears_below_lower_threshold_and_drive_resumes() {
    let (mut app, shared, mut hw, mut sink) = setup();
    shared.set_automatic_power(3000.0);

    hw.next_read = Ok(80.0);
    app.temperature_tick(&shared, &mut hw, &mut sink);
    app.control_tick(&shared, &mut hw);
    assert_eq!(hw.last_duty(), 102);

    // Inside the dead band: still pinned.
    hw.next_read = Ok(72.0);
    app.temperature_tick(&shared, &mut hw, &mut sink);
    app.control_tick(&shared, &mut hw);
    assert_eq!(hw.last_duty(), 102);

    // Below the clear threshold: full drive returns.
    hw.next_read = Ok(69.0);
    app.temperature_tick(&shared, &mut hw, &mut sink);
    app.control_tick(&shared, &mut hw);
    assert_eq!(hw.last_duty(), 921);
    assert!(sink.events.iter().any(|e| e == "cleared(69.0)"));
}

// ── Sensor failure handling ───────────────────────────────────

#[test]
fn sensor_failure_marks_telemetry_stale() {
    let (mut app, shared, mut hw, mut sink) = setup();

    hw.next_read = Ok(55.0);
    app.temperature_tick(&shared, &mut hw, &mut sink);
    assert_eq!(sink.events.last().unwrap(), "telemetry(ok=true,T=55.00)");

    hw.next_read = Err(SensorError::NoPresence);
    app.temperature_tick(&shared, &mut hw, &mut sink);
    assert_eq!(
        sink.events.last().unwrap(),
        "telemetry(ok=false,T=55.00)",
        "stale snapshot keeps the old number but flags it"
    );
}

#[test]
fn sensor_failure_never_clears_a_trip() {
    let (mut app, shared, mut hw, mut sink) = setup();

    hw.next_read = Ok(80.0);
    app.temperature_tick(&shared, &mut hw, &mut sink);
    assert!(app.is_overheat_tripped());

    for err in [
        SensorError::NoPresence,
        SensorError::CrcMismatch,
        SensorError::ConversionTimeout,
    ] {
        hw.next_read = Err(err);
        app.temperature_tick(&shared, &mut hw, &mut sink);
        assert!(
            app.is_overheat_tripped(),
            "trip must survive a {err:?} read"
        );
    }

    app.control_tick(&shared, &mut hw);
    assert_eq!(hw.last_duty(), 102);
}

// ── Boot and status ───────────────────────────────────────────

#[test]
fn boot_is_idle_floor_automatic_zero_watts() {
    let (mut app, shared, mut hw, mut sink) = setup();
    app.start(&mut hw, &mut sink);

    assert_eq!(hw.last_duty(), 102);
    assert_eq!(sink.events, vec!["started(102)".to_string()]);

    let status = app.status(&shared);
    assert_eq!(status.manual, "DISABLED");
    assert_eq!(status.automatic_power_w, 0.0);
    assert!(!status.overheat);
    assert!(!status.sensor_ok, "no sample taken yet");
}

#[test]
fn status_snapshot_shows_a_command_without_a_temperature_tick() {
    use pvheat::adapters::panel;

    let (mut app, shared, mut hw, mut sink) = setup();

    app.handle_command(
        AppCommand::SetManual(ManualOverride::Level(ManualLevel::Half)),
        &shared,
        &mut hw,
        &mut sink,
    );
    // The loop refreshes the panel snapshot right after the command, not
    // only on the 10 s temperature tick.
    panel::publish_status(app.status(&shared));

    let json = panel::status_json();
    assert!(json.contains("\"manual\":\"50%\""), "got {json}");
    assert!(json.contains("\"duty_cycle\":512"), "got {json}");
}

#[test]
fn status_reflects_full_cycle() {
    let (mut app, shared, mut hw, mut sink) = setup();
    shared.set_automatic_power(1500.0);

    hw.next_read = Ok(48.3125);
    app.temperature_tick(&shared, &mut hw, &mut sink);
    app.control_tick(&shared, &mut hw);

    let status = app.status(&shared);
    assert_eq!(status.automatic_power_w, 1500.0);
    assert_eq!(status.duty_cycle, 512);
    assert!(status.sensor_ok);
    assert!((status.temperature_c - 48.3125).abs() < 1e-6);
}
