//! Relay-switched heating element driven by a slow hardware PWM.

use crate::duty::{DutyCell, DutyCycle};

/// Heating element behind a PWM carrier.
pub trait Heater {
    /// Start the PWM carrier
    fn start(&mut self);

    /// Stop the PWM carrier
    fn stop(&mut self);

    /// Load `duty` into the compare register. Takes effect from the next carrier period.
    fn set_duty(&mut self, duty: DutyCycle);

    /// Drive the heater line inactive regardless of the PWM state
    fn force_off(&mut self);
}

/// Carrier period boundary: move the latest duty cycle from `cell` into the hardware.
#[inline]
pub fn carrier_tick<H: Heater>(cell: &DutyCell, heater: &mut H) {
    heater.set_duty(cell.load());
}
