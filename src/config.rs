//! Build-time configuration of the control loop.

use fugit::MicrosDurationU32;
use static_assertions::const_assert;

use crate::{
    adc::{Channel, ConversionWait},
    controller::{pid::Gains, Gain, Seconds},
    thermometer::{hundredths, thermistor::Smoothing, Celsius},
};

/// Selectable target temperatures.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Preset {
    /// 37.5 °C, chicken eggs
    T37_5,
    /// 40.0 °C
    T40,
    /// 45.0 °C
    T45,
}

impl Preset {
    pub const fn celsius(self) -> Celsius {
        match self {
            Self::T37_5 => hundredths(3750),
            Self::T40 => Celsius::const_from_int(40),
            Self::T45 => Celsius::const_from_int(45),
        }
    }
}

pub const SETPOINT: Preset = Preset::T37_5;

pub const GAINS: Gains = Gains {
    kp: Gain::const_from_int(10),
    ki: hundredths(50),
    kd: Gain::ZERO,
};

/// Half-width of the "at temperature" window around the setpoint
pub const DEADBAND: Celsius = Celsius::const_from_int(1);

/// Control tick period: 256 counts of a 1 MHz / 16384 clock.
pub const CONTROL_PERIOD: MicrosDurationU32 = MicrosDurationU32::micros(4_194_304);

/// [`CONTROL_PERIOD`] as the `dt` of the PID.
pub const CONTROL_DT: Seconds = Seconds::from_bits(
    (((CONTROL_PERIOD.ticks() as i64) << Seconds::FRAC_NBITS) / 1_000_000) as i32,
);

/// ADC channel of the enable potentiometer
pub const ENABLE_CHANNEL: Channel = Channel(1);
/// ADC channel of the thermistor divider
pub const THERMISTOR_CHANNEL: Channel = Channel(3);

pub const SMOOTHING: Smoothing = Smoothing::None;

/// Consecutive agreeing enable readings needed to switch. 1 disables debouncing.
pub const ENABLE_DEBOUNCE: usize = 1;

/// Status checks before a conversion counts as stuck when `adc-timeout` is enabled.
pub const ADC_TIMEOUT_POLLS: u32 = 50_000;

#[cfg(not(feature = "adc-timeout"))]
pub const CONVERSION_WAIT: ConversionWait = ConversionWait::Unbounded;
#[cfg(feature = "adc-timeout")]
pub const CONVERSION_WAIT: ConversionWait = ConversionWait::Bounded {
    polls: ADC_TIMEOUT_POLLS,
};

const_assert!(ENABLE_DEBOUNCE > 0);
const_assert!(ADC_TIMEOUT_POLLS > 0);
const_assert!(CONTROL_DT.to_bits() > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_dt_matches_period() {
        let expected = Seconds::from_num(4.194_304);
        assert!((CONTROL_DT - expected).abs() < Seconds::from_num(0.0001));
    }

    #[test]
    fn presets() {
        assert_eq!(Preset::T37_5.celsius(), Celsius::from_num(37.5));
        assert_eq!(Preset::T40.celsius(), Celsius::from_num(40));
        assert_eq!(Preset::T45.celsius(), Celsius::from_num(45));
    }
}
