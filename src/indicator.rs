//! Status LEDs.

use embedded_hal::digital::v2::{OutputPin, PinState};

/// The two front panel LEDs.
pub struct Indicators<P> {
    /// Lit while the heater is enabled
    active: P,
    /// Lit while the temperature is within the deadband of the setpoint
    at_setpoint: P,
}

impl<P: OutputPin> Indicators<P> {
    pub const fn new(active: P, at_setpoint: P) -> Self {
        Self {
            active,
            at_setpoint,
        }
    }

    pub fn set_active(&mut self, on: bool) -> Result<(), P::Error> {
        self.active.set_state(PinState::from(on))
    }

    pub fn set_at_setpoint(&mut self, on: bool) -> Result<(), P::Error> {
        self.at_setpoint.set_state(PinState::from(on))
    }
}
