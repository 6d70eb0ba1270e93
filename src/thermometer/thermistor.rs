use crate::{
    adc::{self, AnalogInput, Channel, ConversionWait},
    error::Result,
    thermometer::{calibration, hundredths, Celsius},
};

/// Filtering applied to successive temperature samples.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Smoothing {
    /// Every read returns the calibration table entry of the sample.
    None,
    /// `average = 0.8 * average + 0.2 * sample`, seeded with the first sample.
    Exponential,
}

const KEEP: Celsius = hundredths(80);
const TAKE: Celsius = hundredths(20);

/// NTC thermistor read through the ADC and linearized with the calibration table.
#[derive(Debug, Clone)]
pub struct Thermistor {
    channel: Channel,
    smoothing: Smoothing,
    average: Option<Celsius>,
}

impl Thermistor {
    pub const fn new(channel: Channel, smoothing: Smoothing) -> Self {
        Self {
            channel,
            smoothing,
            average: None,
        }
    }

    /// Read the temperature in degrees Celsius
    ///
    /// Only the 8 most significant bits of the conversion are used, as a direct index into
    /// [`CALIBRATION_TABLE`](calibration::CALIBRATION_TABLE).
    pub fn read<A: AnalogInput, E>(
        &mut self,
        adc: &mut A,
        wait: ConversionWait,
    ) -> Result<Celsius, E> {
        let code = adc::convert(adc, self.channel, wait)?;
        let sample = calibration::lookup(code);

        #[cfg(feature = "defmt")]
        defmt::trace!("thermistor code {=u8} -> {=f32}", code, sample.to_num::<f32>());

        Ok(self.filter(sample))
    }

    fn filter(&mut self, sample: Celsius) -> Celsius {
        match self.smoothing {
            Smoothing::None => sample,
            Smoothing::Exponential => {
                let average = self.average.map_or(sample, |avg| {
                    avg.saturating_mul(KEEP)
                        .saturating_add(sample.saturating_mul(TAKE))
                });
                self.average = Some(average);
                average
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermometer::calibration::CALIBRATION_TABLE;

    /// Converter that always completes immediately with a fixed code
    struct FixedAdc(u8);

    impl AnalogInput for FixedAdc {
        fn select_channel(&mut self, _: Channel) {}
        fn start_conversion(&mut self) {}
        fn conversion_done(&self) -> bool {
            true
        }
        fn read_high_byte(&mut self) -> u8 {
            self.0
        }
    }

    #[test]
    fn unsmoothed_read_is_table_entry() {
        let mut therm = Thermistor::new(Channel(3), Smoothing::None);
        for code in 0..=u8::MAX {
            let temp = therm
                .read::<_, ()>(&mut FixedAdc(code), ConversionWait::Unbounded)
                .unwrap();
            assert_eq!(temp, CALIBRATION_TABLE[usize::from(code)]);
        }
    }

    #[test]
    fn exponential_smoothing_seeds_then_blends() {
        let mut therm = Thermistor::new(Channel(3), Smoothing::Exponential);

        let first = therm.filter(Celsius::from_num(30));
        assert_eq!(first, Celsius::from_num(30));

        let second = therm.filter(Celsius::from_num(40));
        let expected = Celsius::from_num(32);
        assert!((second - expected).abs() < Celsius::from_num(0.001));
    }
}
