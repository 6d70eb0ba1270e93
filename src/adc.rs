//! Blocking single-channel analog conversions.

use core::convert::Infallible;

use crate::error::Error;

/// ADC input channel number.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(pub u8);

/// Raw access to an analog-to-digital converter.
///
/// Implementations only expose the register-level steps; sequencing and waiting is done by
/// [`convert`].
pub trait AnalogInput {
    /// Route `channel` to the converter
    fn select_channel(&mut self, channel: Channel);

    /// Start a single conversion on the selected channel
    fn start_conversion(&mut self);

    /// Whether the conversion started last has completed
    fn conversion_done(&self) -> bool;

    /// Read the 8 most significant bits of the last conversion result
    fn read_high_byte(&mut self) -> u8;
}

/// How long [`convert`] waits for the end of a conversion.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionWait {
    /// Spin until the converter reports completion.
    ///
    /// A converter that never completes hangs the caller.
    Unbounded,
    /// Give up with [`Error::ConversionTimeout`] after `polls` status checks.
    Bounded { polls: u32 },
}

/// Checks a running conversion once.
pub fn poll<A: AnalogInput>(adc: &mut A) -> nb::Result<u8, Infallible> {
    if adc.conversion_done() {
        Ok(adc.read_high_byte())
    } else {
        Err(nb::Error::WouldBlock)
    }
}

/// Runs one conversion on `channel` and returns the high byte of the result.
#[cfg_attr(feature = "sizing", inline(never))]
pub fn convert<A: AnalogInput, E>(
    adc: &mut A,
    channel: Channel,
    wait: ConversionWait,
) -> Result<u8, Error<E>> {
    adc.select_channel(channel);
    adc.start_conversion();

    match wait {
        ConversionWait::Unbounded => match nb::block!(poll(adc)) {
            Ok(byte) => Ok(byte),
            Err(never) => match never {},
        },
        ConversionWait::Bounded { polls } => {
            for _ in 0..polls {
                match poll(adc) {
                    Ok(byte) => return Ok(byte),
                    Err(nb::Error::WouldBlock) => {}
                    Err(nb::Error::Other(never)) => match never {},
                }
            }

            #[cfg(feature = "defmt")]
            defmt::warn!("ADC channel {} did not finish within {} polls", channel, polls);

            Err(Error::ConversionTimeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    /// Converter that reports busy for a fixed number of status checks
    struct SlowAdc {
        selected: Option<Channel>,
        started: bool,
        busy_polls: Cell<u32>,
        value: u8,
    }

    impl SlowAdc {
        fn new(busy_polls: u32, value: u8) -> Self {
            Self {
                selected: None,
                started: false,
                busy_polls: Cell::new(busy_polls),
                value,
            }
        }
    }

    impl AnalogInput for SlowAdc {
        fn select_channel(&mut self, channel: Channel) {
            self.selected = Some(channel);
        }

        fn start_conversion(&mut self) {
            self.started = true;
        }

        fn conversion_done(&self) -> bool {
            let busy = self.busy_polls.get();
            if busy == 0 {
                return self.started;
            }
            self.busy_polls.set(busy - 1);
            false
        }

        fn read_high_byte(&mut self) -> u8 {
            self.value
        }
    }

    #[test]
    fn poll_would_block_until_done() {
        let mut adc = SlowAdc::new(2, 0x42);
        adc.start_conversion();
        assert_eq!(poll(&mut adc), Err(nb::Error::WouldBlock));
        assert_eq!(poll(&mut adc), Err(nb::Error::WouldBlock));
        assert_eq!(poll(&mut adc), Ok(0x42));
    }

    #[test]
    fn unbounded_selects_channel_and_reads() {
        let mut adc = SlowAdc::new(5, 0xAB);
        let byte = convert::<_, ()>(&mut adc, Channel(3), ConversionWait::Unbounded);
        assert_eq!(byte, Ok(0xAB));
        assert_eq!(adc.selected, Some(Channel(3)));
    }

    #[test]
    fn bounded_times_out_on_stuck_converter() {
        let mut adc = SlowAdc::new(u32::MAX, 0);
        let res = convert::<_, ()>(&mut adc, Channel(1), ConversionWait::Bounded { polls: 16 });
        assert_eq!(res, Err(Error::ConversionTimeout));
    }

    #[test]
    fn bounded_returns_conversion_finishing_in_time() {
        let mut adc = SlowAdc::new(3, 7);
        let res = convert::<_, ()>(&mut adc, Channel(1), ConversionWait::Bounded { polls: 4 });
        assert_eq!(res, Ok(7));
    }
}
