//! Command arbiter — selects between the manual override and the
//! bus-supplied automatic power on every control cycle.
//!
//! A set manual level wins outright: the automatic watts are ignored
//! entirely until the override is explicitly disabled.  There is no timeout
//! on manual mode.

/// Discrete manual drive levels offered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualLevel {
    /// 0 % — element idles at the duty floor.
    Off,
    /// 50 % of the usable drive window.
    Half,
    /// 100 % — full drive.
    Full,
}

impl ManualLevel {
    /// The drive percentage this level commands.
    pub const fn percent(self) -> f32 {
        match self {
            Self::Off => 0.0,
            Self::Half => 50.0,
            Self::Full => 100.0,
        }
    }
}

/// Manual override state.  Explicit tagged variant — there is no sentinel
/// value, and `Disabled` is the boot default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManualOverride {
    /// Automatic (MQTT-commanded) operation.
    #[default]
    Disabled,
    /// User-forced drive level; persists until explicitly changed.
    Level(ManualLevel),
}

impl ManualOverride {
    /// Display label used by the status surface.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "DISABLED",
            Self::Level(ManualLevel::Off) => "0%",
            Self::Level(ManualLevel::Half) => "50%",
            Self::Level(ManualLevel::Full) => "100%",
        }
    }
}

/// A power request with its calling convention, as consumed by the
/// duty-cycle mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerRequest {
    /// Automatic mode: commanded power in watts, rescaled by the mapper.
    Watts(f32),
    /// Manual mode: drive percentage taken as-is.
    Percent(f32),
}

/// Pick the command source for this cycle.
pub fn select(manual: ManualOverride, automatic_w: f32) -> PowerRequest {
    match manual {
        ManualOverride::Level(level) => PowerRequest::Percent(level.percent()),
        ManualOverride::Disabled => PowerRequest::Watts(automatic_w),
    }
}
