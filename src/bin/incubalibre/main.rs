#![feature(type_alias_impl_trait, lint_reasons)]
#![no_std]
#![no_main]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::wildcard_imports)]

mod adc;
mod heater;
mod temp_controller;

use defmt_rtt as _;
use incubalibre::duty::DutyCell;
use panic_probe as _;

/// Latest duty cycle, stored by the control tick and loaded at every carrier period.
static DUTY: DutyCell = DutyCell::new();

#[rtic::app(device = stm32f0xx_hal::pac, dispatchers = [USART1])]
mod app {
    use defmt::*;
    use incubalibre::{control::IncubatorLoop, heater::carrier_tick, indicator::Indicators};
    use rtic_monotonics::{
        stm32::{Tim2 as Mono, *},
        Monotonic,
    };
    use stm32f0xx_hal::{
        gpio::{Output, Pin, PushPull},
        prelude::*,
        pwm,
    };

    use crate::{adc::BoardAdc, heater::PwmHeater, DUTY};

    #[shared]
    struct Shared {
        heater: PwmHeater,
    }

    #[local]
    struct Local {
        adc: BoardAdc,
        indicators: Indicators<Pin<Output<PushPull>>>,
        control: IncubatorLoop<'static>,
    }

    #[init]
    fn init(mut cx: init::Context) -> (Shared, Local) {
        // Set system clock to 24 MHz
        let mut rcc = cx
            .device
            .RCC
            .configure()
            .hsi48()
            .sysclk(24.mhz())
            .pclk(24.mhz())
            .hclk(24.mhz())
            .freeze(&mut cx.device.FLASH);

        trace!("sysclk: {}", rcc.clocks.sysclk().0);
        trace!("hclk: {}", rcc.clocks.hclk().0);
        trace!("pclk: {}", rcc.clocks.pclk().0);

        // Enable tim2 monotonic
        let token = rtic_monotonics::create_stm32_tim2_monotonic_token!();
        Mono::start(24_000_000, token);

        // Setup GPIO
        let gpioa = cx.device.GPIOA.split(&mut rcc);
        let gpiob = cx.device.GPIOB.split(&mut rcc);

        // Setup indicators, both off
        let mut active = gpiob.pb3.into_push_pull_output(&cx.cs).downgrade();
        let mut at_setpoint = gpiob.pb4.into_push_pull_output(&cx.cs).downgrade();
        unwrap!(active.set_low());
        unwrap!(at_setpoint.set_low());
        let indicators = Indicators::new(active, at_setpoint);

        // Setup ADC: enable potentiometer on PA1 (IN1), thermistor on PA3 (IN3)
        let _ = gpioa.pa1.into_analog(&cx.cs);
        let _ = gpioa.pa3.into_analog(&cx.cs);
        let adc = BoardAdc::new(cx.device.ADC);

        // Setup heater relay on PA6 (TIM3_CH1) with a 1 s carrier
        let relay = gpioa.pa6.into_alternate_af1(&cx.cs);
        let channel = pwm::tim3(cx.device.TIM3, relay, &mut rcc, 1.hz());
        let heater = PwmHeater::new(channel);

        let control = IncubatorLoop::from_config(&DUTY);
        info!(
            "Setpoint: {=f32}",
            incubalibre::config::SETPOINT.celsius().to_num::<f32>()
        );

        // Launch temperature controller
        let _ = temp_controller::spawn();

        (
            Shared { heater },
            Local {
                adc,
                indicators,
                control,
            },
        )
    }

    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }

    #[task(priority = 1, local = [adc, indicators, control], shared = [heater])]
    async fn temp_controller(cx: temp_controller::Context) {
        crate::temp_controller::temp_controller(cx).await;
    }

    /// Carrier period boundary
    #[task(binds = TIM3, priority = 2, shared = [heater])]
    fn carrier(mut cx: carrier::Context) {
        cx.shared.heater.lock(|heater| {
            heater.clear_update();
            carrier_tick(&DUTY, heater);
        });
    }

    timestamp!("{=u64:us}", {
        Mono::now().duration_since_epoch().to_micros()
    });
}
