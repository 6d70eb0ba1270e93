//! PID with trapezoidal, clamped integral.

use fixed::types::I16F16;

use super::{Controller, Gain, Seconds};
use crate::{
    duty::{DutyCycle, DUTY_MAX, DUTY_MIN},
    thermometer::Celsius,
};

/// The integral term is clamped to the same range as the duty cycle.
const INTEGRAL_MIN: I16F16 = I16F16::const_from_int(DUTY_MIN.value() as i32);
const INTEGRAL_MAX: I16F16 = I16F16::const_from_int(DUTY_MAX.value() as i32);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Gains {
    pub kp: Gain,
    pub ki: Gain,
    pub kd: Gain,
}

/// History carried from one tick to the next.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ControllerState {
    pub previous_error: Celsius,
    pub integral: I16F16,
}

impl ControllerState {
    pub const fn new() -> Self {
        Self {
            previous_error: Celsius::ZERO,
            integral: I16F16::ZERO,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Result of one PID evaluation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PidOutput {
    /// Duty cycle to apply
    pub duty: DutyCycle,
    /// Unclamped sum of the three terms
    pub raw: I16F16,
    /// `|setpoint - measured| < deadband`
    pub at_setpoint: bool,
}

/// Whether `measured` lies strictly within `deadband` of `setpoint`.
#[inline]
pub fn near_setpoint(setpoint: Celsius, measured: Celsius, deadband: Celsius) -> bool {
    setpoint.saturating_sub(measured).saturating_abs() < deadband
}

/// Runs one PID step and updates `state`.
///
/// Outputs above [`DUTY_MAX`] are clamped to it. Outputs below [`DUTY_MIN`] turn the heater off
/// completely instead of idling at the minimum.
#[cfg_attr(feature = "sizing", inline(never))]
pub fn compute(
    gains: &Gains,
    deadband: Celsius,
    setpoint: Celsius,
    measured: Celsius,
    dt: Seconds,
    state: &mut ControllerState,
) -> PidOutput {
    let error = setpoint.saturating_sub(measured);
    let at_setpoint = near_setpoint(setpoint, measured, deadband);

    // Trapezoidal integration, anti-windup by clamping the accumulator itself
    let area = gains
        .ki
        .saturating_mul(dt)
        .saturating_mul(error.saturating_add(state.previous_error) / 2);
    state.integral = state
        .integral
        .saturating_add(area)
        .clamp(INTEGRAL_MIN, INTEGRAL_MAX);

    let derivative = error.saturating_sub(state.previous_error).saturating_div(dt);

    let raw = gains
        .kp
        .saturating_mul(error)
        .saturating_add(state.integral)
        .saturating_add(gains.kd.saturating_mul(derivative));

    let duty = if raw > INTEGRAL_MAX {
        DUTY_MAX
    } else if raw < INTEGRAL_MIN {
        DutyCycle::OFF
    } else {
        DutyCycle::new(raw.saturating_to_num())
    };

    state.previous_error = error;

    PidOutput {
        duty,
        raw,
        at_setpoint,
    }
}

pub struct PidController {
    setpoint: Celsius,
    gains: Gains,
    deadband: Celsius,
    dt: Seconds,
    state: ControllerState,
}

impl PidController {
    pub const fn new(setpoint: Celsius, gains: Gains, deadband: Celsius, dt: Seconds) -> Self {
        Self {
            setpoint,
            gains,
            deadband,
            dt,
            state: ControllerState::new(),
        }
    }

    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn near_setpoint(&self, measured: Celsius) -> bool {
        near_setpoint(self.setpoint, measured, self.deadband)
    }
}

impl Controller for PidController {
    type Output = PidOutput;

    fn target(&self) -> Celsius {
        self.setpoint
    }

    fn run(&mut self, measured: Celsius) -> PidOutput {
        let output = compute(
            &self.gains,
            self.deadband,
            self.setpoint,
            measured,
            self.dt,
            &mut self.state,
        );

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "PID: error {=f32}, integral {=f32}, output {=f32}, duty {=u8}",
            self.state.previous_error.to_num::<f32>(),
            self.state.integral.to_num::<f32>(),
            output.raw.to_num::<f32>(),
            output.duty.value()
        );

        output
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermometer::hundredths;

    const GAINS: Gains = Gains {
        kp: Gain::const_from_int(10),
        ki: hundredths(50),
        kd: Gain::ZERO,
    };
    const DEADBAND: Celsius = Celsius::const_from_int(1);
    const DT: Seconds = crate::config::CONTROL_DT;
    const SETPOINT: Celsius = hundredths(3750);

    fn run(measured: Celsius, state: &mut ControllerState) -> PidOutput {
        compute(&GAINS, DEADBAND, SETPOINT, measured, DT, state)
    }

    #[test]
    fn at_setpoint_from_rest_gives_duty_min() {
        let mut state = ControllerState::new();
        let out = run(SETPOINT, &mut state);

        assert_eq!(state.integral, INTEGRAL_MIN);
        assert_eq!(out.raw, INTEGRAL_MIN);
        assert_eq!(out.duty, DUTY_MIN);
        assert!(out.at_setpoint);
        assert_eq!(state.previous_error, Celsius::ZERO);
    }

    #[test]
    fn far_below_setpoint_saturates() {
        let mut state = ControllerState::new();
        let out = run(Celsius::ZERO, &mut state);

        assert!(out.raw > INTEGRAL_MAX);
        assert_eq!(out.duty, DUTY_MAX);
        assert!(!out.at_setpoint);
        assert_eq!(state.previous_error, SETPOINT);
    }

    #[test]
    fn output_below_min_turns_heater_off() {
        let mut state = ControllerState::new();
        // 2 degrees too hot: 10 * -2 + integral(6) < 6
        let out = run(hundredths(3950), &mut state);

        assert!(out.raw < INTEGRAL_MIN);
        assert_eq!(out.duty, DutyCycle::OFF);
    }

    #[test]
    fn output_in_band_is_truncated() {
        let mut state = ControllerState::new();
        // 0.5 degrees too cold: 5 + clamp(0 + 0.5 * 4.19 * 0.25) = 5 + 6
        let out = run(hundredths(3700), &mut state);

        assert_eq!(out.duty, DutyCycle::new(11));
        assert!(out.at_setpoint);
    }

    #[test]
    fn integral_stays_clamped() {
        let mut state = ControllerState::new();
        let temps = [0, 10_000, -6_689, 3_750, 63_092, 2_000, 3_000, 0, 0, 0, 0, 0, 0, 0, 63_092];

        for _ in 0..10 {
            for t in temps {
                run(hundredths(t), &mut state);
                assert!(state.integral >= INTEGRAL_MIN);
                assert!(state.integral <= INTEGRAL_MAX);
            }
        }
    }

    #[test]
    fn derivative_term_reacts_to_change() {
        let gains = Gains {
            kd: Gain::const_from_int(10),
            ..GAINS
        };
        let mut with_d = ControllerState::new();
        let mut without_d = ControllerState::new();

        let measured = hundredths(3700);
        let a = compute(&gains, DEADBAND, SETPOINT, measured, DT, &mut with_d);
        let b = compute(&GAINS, DEADBAND, SETPOINT, measured, DT, &mut without_d);

        assert!(a.raw > b.raw);
    }

    #[test]
    fn deadband_is_strict() {
        assert!(near_setpoint(SETPOINT, hundredths(3660), DEADBAND));
        assert!(!near_setpoint(SETPOINT, hundredths(3650), DEADBAND));
        assert!(!near_setpoint(SETPOINT, hundredths(3850), DEADBAND));
        assert!(near_setpoint(SETPOINT, hundredths(3840), DEADBAND));
    }

    #[test]
    fn controller_reset_clears_history() {
        let mut pid = PidController::new(SETPOINT, GAINS, DEADBAND, DT);
        pid.run(Celsius::ZERO);
        assert_ne!(*pid.state(), ControllerState::new());

        pid.reset();
        assert_eq!(*pid.state(), ControllerState::new());
        assert_eq!(pid.target(), SETPOINT);
    }
}
