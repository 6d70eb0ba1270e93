//! Heater relay on TIM3 channel 1.

use embedded_hal::PwmPin;
use incubalibre::{duty::DutyCycle, heater::Heater};
use stm32f0xx_hal::{
    pac::TIM3,
    pwm::{PwmChannels, C1},
};

const OC1M_SHIFT: u32 = 4;
const OC1M_MASK: u32 = 0b111 << OC1M_SHIFT;
/// OC1REF forced low
const OC1M_FORCE_INACTIVE: u32 = 0b100;
/// OC1REF high while CNT < CCR1
const OC1M_PWM1: u32 = 0b110;

/// Relay driven by the TIM3 carrier.
///
/// Stopping the carrier halts the counter, which also silences the update interrupt.
pub struct PwmHeater {
    channel: PwmChannels<TIM3, C1>,
    max_duty: u16,
}

impl PwmHeater {
    /// Takes over a configured channel and leaves the heater off with the carrier stopped.
    pub fn new(mut channel: PwmChannels<TIM3, C1>) -> Self {
        let max_duty = channel.get_max_duty();
        channel.set_duty(0);

        let mut heater = Self { channel, max_duty };
        heater.stop();
        heater.force_off();
        heater.channel.enable();

        tim3().dier.modify(|_, w| w.uie().set_bit());

        defmt::debug!("Heater carrier max duty: {=u16}", max_duty);

        heater
    }

    /// Acknowledge the carrier period interrupt
    pub fn clear_update(&mut self) {
        tim3().sr.modify(|_, w| w.uif().clear_bit());
    }
}

impl Heater for PwmHeater {
    fn start(&mut self) {
        set_output_mode(OC1M_PWM1);
        tim3().cr1.modify(|_, w| w.cen().set_bit());
    }

    fn stop(&mut self) {
        tim3().cr1.modify(|_, w| w.cen().clear_bit());
    }

    fn set_duty(&mut self, duty: DutyCycle) {
        self.channel.set_duty(duty.scale(self.max_duty));
    }

    fn force_off(&mut self) {
        set_output_mode(OC1M_FORCE_INACTIVE);
    }
}

fn tim3() -> &'static <TIM3 as core::ops::Deref>::Target {
    // SAFETY: callers only touch CR1.CEN, DIER.UIE, SR.UIF and CCMR1.OC1M, none of which
    // `PwmChannels` writes after setup
    unsafe { &*TIM3::ptr() }
}

fn set_output_mode(mode: u32) {
    tim3()
        .ccmr1_output()
        .modify(|r, w| unsafe { w.bits((r.bits() & !OC1M_MASK) | (mode << OC1M_SHIFT)) });
}
