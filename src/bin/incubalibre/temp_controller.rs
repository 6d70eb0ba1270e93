//! Control tick task

use core::convert::Infallible;

use defmt::*;
use incubalibre::{config::CONTROL_PERIOD, control::TickReport, error::Result};
use rtic::Mutex;
use rtic_monotonics::{
    stm32::{Tim2 as Mono, *},
    Monotonic,
};

#[allow(clippy::needless_lifetimes, reason = "clippy bug")]
#[cfg_attr(feature = "sizing", inline(never))]
pub async fn temp_controller<'a>(mut cx: crate::app::temp_controller::Context<'a>) {
    let mut now = Mono::now();

    loop {
        trace!("temp_controller");

        match temp_controller_inner(&mut cx) {
            Ok(report) => {
                debug!(
                    "Temperature: {=f32}, Level: {=u8}, State: {}, Duty: {=u8}, At setpoint: {=bool}",
                    report.sample.temperature.to_num::<f32>(),
                    report.sample.level.level(),
                    report.state,
                    report.duty.value(),
                    report.at_setpoint
                );
            }
            Err(e) => {
                error!("Error: {}", e);
            }
        }

        now += u64::from(CONTROL_PERIOD.ticks()).micros();
        Mono::delay_until(now).await;
    }
}

/// Samples without holding the heater lock so the carrier interrupt is never delayed by an ADC
/// conversion.
fn temp_controller_inner(
    cx: &mut crate::app::temp_controller::Context<'_>,
) -> Result<TickReport, Infallible> {
    let control = &mut *cx.local.control;
    let indicators = &mut *cx.local.indicators;

    let sample = match control.sample(cx.local.adc) {
        Ok(sample) => sample,
        Err(e) => {
            cx.shared
                .heater
                .lock(|heater| control.shut_down(heater, indicators))?;
            return Err(e);
        }
    };

    cx.shared
        .heater
        .lock(|heater| control.apply(&sample, heater, indicators))
}
