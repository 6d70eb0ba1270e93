//! The control tick: sense, decide, compute.

use embedded_hal::digital::v2::OutputPin;

use crate::{
    adc::{AnalogInput, Channel, ConversionWait},
    config,
    controller::{pid::PidController, Controller},
    duty::{DutyCell, DutyCycle},
    error::Result,
    heater::Heater,
    indicator::Indicators,
    state::{HeaterState, Transition},
    thermometer::{thermistor::Thermistor, Celsius},
    trimpot::{self, EnableFilter, EnableLevel},
};

/// Control loop with the build-time configuration.
pub type IncubatorLoop<'d> = ControlLoop<'d, { config::ENABLE_DEBOUNCE }>;

/// Sensor readings of one tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Sample {
    pub level: EnableLevel,
    /// Enable decision after debouncing
    pub enabled: bool,
    pub temperature: Celsius,
}

/// What a tick did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TickReport {
    pub sample: Sample,
    pub transition: Transition,
    pub state: HeaterState,
    /// Duty cycle handed to the carrier interrupt
    pub duty: DutyCycle,
    pub at_setpoint: bool,
}

/// Everything the control tick owns between two ticks.
///
/// The duty cycle is the only state shared with the carrier interrupt and lives in a
/// [`DutyCell`] outside of the loop.
pub struct ControlLoop<'d, const N: usize = 1> {
    state: HeaterState,
    pid: PidController,
    thermistor: Thermistor,
    enable_channel: Channel,
    enable: EnableFilter<N>,
    wait: ConversionWait,
    duty: &'d DutyCell,
}

impl<'d> IncubatorLoop<'d> {
    /// Loop configured from [`config`].
    pub const fn from_config(duty: &'d DutyCell) -> Self {
        ControlLoop::new(
            PidController::new(
                config::SETPOINT.celsius(),
                config::GAINS,
                config::DEADBAND,
                config::CONTROL_DT,
            ),
            Thermistor::new(config::THERMISTOR_CHANNEL, config::SMOOTHING),
            config::ENABLE_CHANNEL,
            config::CONVERSION_WAIT,
            duty,
        )
    }
}

impl<'d, const N: usize> ControlLoop<'d, N> {
    pub const fn new(
        pid: PidController,
        thermistor: Thermistor,
        enable_channel: Channel,
        wait: ConversionWait,
        duty: &'d DutyCell,
    ) -> Self {
        Self {
            state: HeaterState::Disabled,
            pid,
            thermistor,
            enable_channel,
            enable: EnableFilter::new(),
            wait,
            duty,
        }
    }

    pub const fn state(&self) -> HeaterState {
        self.state
    }

    pub const fn controller(&self) -> &PidController {
        &self.pid
    }

    /// Read the potentiometer, then the thermistor.
    pub fn sample<A: AnalogInput, E>(&mut self, adc: &mut A) -> Result<Sample, E> {
        let level = trimpot::read_enable_level(adc, self.enable_channel, self.wait)?;
        let temperature = self.thermistor.read(adc, self.wait)?;
        let enabled = self.enable.update(level);

        Ok(Sample {
            level,
            enabled,
            temperature,
        })
    }

    /// Run the state machine and, while enabled, the PID for `sample`.
    #[cfg_attr(feature = "sizing", inline(never))]
    pub fn apply<H: Heater, P: OutputPin>(
        &mut self,
        sample: &Sample,
        heater: &mut H,
        indicators: &mut Indicators<P>,
    ) -> Result<TickReport, P::Error> {
        let transition = self.state.transition(sample.enabled);
        self.state = self.state.next(transition);

        match transition {
            Transition::Enable => {
                #[cfg(feature = "defmt")]
                defmt::info!("Heater enabled (level {=u8})", sample.level.level());

                heater.start();
            }
            Transition::Disable => {
                #[cfg(feature = "defmt")]
                defmt::info!("Heater disabled");

                self.disable_output(heater);
            }
            Transition::Stay => {}
        }

        let at_setpoint = if self.state.is_active() {
            let output = self.pid.run(sample.temperature);
            self.duty.store(output.duty);
            output.at_setpoint
        } else {
            self.pid.near_setpoint(sample.temperature)
        };

        // Both LEDs are written before the first pin error is returned
        let active = match transition {
            Transition::Enable => indicators.set_active(true),
            Transition::Disable => indicators.set_active(false),
            Transition::Stay => Ok(()),
        };
        let setpoint = indicators.set_at_setpoint(at_setpoint);
        active.and(setpoint)?;

        Ok(TickReport {
            sample: *sample,
            transition,
            state: self.state,
            duty: self.duty.load(),
            at_setpoint,
        })
    }

    /// One full control tick.
    ///
    /// If a conversion times out the output is put into the disabled state and the error is
    /// returned.
    pub fn tick<A: AnalogInput, H: Heater, P: OutputPin>(
        &mut self,
        adc: &mut A,
        heater: &mut H,
        indicators: &mut Indicators<P>,
    ) -> Result<TickReport, P::Error> {
        match self.sample(adc) {
            Ok(sample) => self.apply(&sample, heater, indicators),
            Err(e) => {
                self.shut_down(heater, indicators)?;
                Err(e)
            }
        }
    }

    /// Force the disabled state whatever the current one is.
    pub fn shut_down<H: Heater, P: OutputPin>(
        &mut self,
        heater: &mut H,
        indicators: &mut Indicators<P>,
    ) -> Result<(), P::Error> {
        #[cfg(feature = "defmt")]
        defmt::warn!("Shutting heater down from {}", self.state);

        self.state = HeaterState::Disabled;
        self.enable.reset();
        self.disable_output(heater);

        indicators.set_active(false)?;
        Ok(())
    }

    fn disable_output<H: Heater>(&mut self, heater: &mut H) {
        heater.stop();
        heater.force_off();
        // The carrier interrupt is stopped with the counter, so clear the compare value here
        heater.set_duty(DutyCycle::OFF);
        self.duty.store(DutyCycle::OFF);
        self.pid.reset();
    }
}
