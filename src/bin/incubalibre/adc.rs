//! ADC driven at register level so conversions can be started and polled step by step.

use incubalibre::adc::{AnalogInput, Channel};
use stm32f0xx_hal::pac::{ADC, RCC};

const CR_ADEN: u32 = 1 << 0;
const CR_ADSTART: u32 = 1 << 2;
const CR_ADCAL: u32 = 1 << 31;

const ISR_ADRDY: u32 = 1 << 0;
const ISR_EOC: u32 = 1 << 2;

/// Left aligned 12 bit data
const CFGR1_ALIGN: u32 = 1 << 5;
/// PCLK / 2
const CFGR2_CKMODE_PCLK_DIV2: u32 = 0b01 << 30;
/// 239.5 cycles, the divider has a high source impedance
const SMPR_239_5: u32 = 0b111;

pub struct BoardAdc {
    adc: ADC,
}

impl BoardAdc {
    /// Clock, calibrate and enable the ADC.
    pub fn new(adc: ADC) -> Self {
        // SAFETY: only the ADC enable bit is touched, the rest of RCC is owned by the HAL `Rcc`
        unsafe {
            (*RCC::ptr()).apb2enr.modify(|_, w| w.adcen().set_bit());
        }

        adc.cfgr2.write(|w| unsafe { w.bits(CFGR2_CKMODE_PCLK_DIV2) });

        adc.cr.modify(|r, w| unsafe { w.bits(r.bits() | CR_ADCAL) });
        while adc.cr.read().bits() & CR_ADCAL != 0 {}

        adc.cfgr1.write(|w| unsafe { w.bits(CFGR1_ALIGN) });
        adc.smpr.write(|w| unsafe { w.bits(SMPR_239_5) });

        adc.cr.modify(|r, w| unsafe { w.bits(r.bits() | CR_ADEN) });
        while adc.isr.read().bits() & ISR_ADRDY == 0 {}

        defmt::debug!("ADC ready");

        Self { adc }
    }
}

impl AnalogInput for BoardAdc {
    fn select_channel(&mut self, channel: Channel) {
        self.adc
            .chselr
            .write(|w| unsafe { w.bits(1 << channel.0) });
    }

    fn start_conversion(&mut self) {
        self.adc
            .cr
            .modify(|r, w| unsafe { w.bits(r.bits() | CR_ADSTART) });
    }

    fn conversion_done(&self) -> bool {
        self.adc.isr.read().bits() & ISR_EOC != 0
    }

    fn read_high_byte(&mut self) -> u8 {
        // Reading DR clears EOC
        let [_, high, ..] = self.adc.dr.read().bits().to_le_bytes();
        high
    }
}
