//! Heater duty cycle and its handoff between the control tick and the carrier interrupt.

use core::sync::atomic::{AtomicU8, Ordering};

use static_assertions::{assert_eq_size, const_assert};

/// Fraction of a carrier period the heater is energized, in 1/256 steps.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyCycle(u8);

/// Smallest duty cycle the PID applies. Anything lower switches the heater off entirely so the
/// relay does not chatter.
pub const DUTY_MIN: DutyCycle = DutyCycle(6);
/// Largest duty cycle the PID applies, keeping the enclosure from overheating.
pub const DUTY_MAX: DutyCycle = DutyCycle(200);

const_assert!(DUTY_MIN.0 < DUTY_MAX.0);
assert_eq_size!(DutyCycle, u8);

impl DutyCycle {
    pub const OFF: Self = Self(0);

    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Scales to a hardware compare value where `max` is one full carrier period.
    pub fn scale(self, max: u16) -> u16 {
        let scaled = (u32::from(self.0) * u32::from(max)) >> 8;
        u16::try_from(scaled).unwrap_or(max)
    }
}

/// Single-slot, lock-free handoff of the latest duty cycle.
///
/// The control tick stores, the carrier interrupt loads. Both are single byte accesses so a
/// reader never observes a partially written value.
#[derive(Debug, Default)]
pub struct DutyCell(AtomicU8);

impl DutyCell {
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    #[inline]
    pub fn store(&self, duty: DutyCycle) {
        self.0.store(duty.0, Ordering::Release);
    }

    #[inline]
    pub fn load(&self) -> DutyCycle {
        DutyCycle(self.0.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_starts_off() {
        assert_eq!(DutyCell::new().load(), DutyCycle::OFF);
    }

    #[test]
    fn cell_returns_last_store() {
        let cell = DutyCell::new();
        cell.store(DutyCycle::new(150));
        cell.store(DUTY_MAX);
        assert_eq!(cell.load(), DUTY_MAX);
    }

    #[test]
    fn scale_to_compare_register() {
        assert_eq!(DutyCycle::OFF.scale(65_000), 0);
        assert_eq!(DutyCycle::new(128).scale(256), 128);
        assert_eq!(DutyCycle::new(255).scale(256), 255);
        assert_eq!(DUTY_MAX.scale(1000), 781);
    }
}
