//! Enable potentiometer.

use heapless::HistoryBuffer;

use crate::{
    adc::{self, AnalogInput, Channel, ConversionWait},
    error::Result,
};

/// Coarse potentiometer position, `0..=3`.
///
/// Zero means the incubator is switched off; every other level means on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnableLevel(u8);

impl EnableLevel {
    pub const OFF: Self = Self(0);

    /// Keeps the two most significant bits of an 8-bit conversion.
    #[inline]
    pub const fn from_high_byte(high: u8) -> Self {
        Self(high >> 6)
    }

    #[inline]
    pub const fn level(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_enabled(self) -> bool {
        self.0 != 0
    }
}

/// Reads the potentiometer position.
pub fn read_enable_level<A: AnalogInput, E>(
    adc: &mut A,
    channel: Channel,
    wait: ConversionWait,
) -> Result<EnableLevel, E> {
    let high = adc::convert(adc, channel, wait)?;
    Ok(EnableLevel::from_high_byte(high))
}

/// Debounce for the enable decision.
///
/// The output only flips once the last `N` readings all agree. With `N == 1` every reading is
/// passed through unchanged.
#[derive(Debug)]
pub struct EnableFilter<const N: usize> {
    history: HistoryBuffer<bool, N>,
    enabled: bool,
}

impl<const N: usize> EnableFilter<N> {
    pub const fn new() -> Self {
        Self {
            history: HistoryBuffer::new(),
            enabled: false,
        }
    }

    /// Feed one reading and get the filtered decision back.
    pub fn update(&mut self, level: EnableLevel) -> bool {
        self.history.write(level.is_enabled());

        if self.history.len() == N {
            if self.history.iter().all(|on| *on) {
                self.enabled = true;
            } else if self.history.iter().all(|on| !*on) {
                self.enabled = false;
            }
        }

        self.enabled
    }

    /// Forget past readings and report disabled.
    pub fn reset(&mut self) {
        self.history.clear();
        self.enabled = false;
    }
}

impl<const N: usize> Default for EnableFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_uses_top_two_bits() {
        assert_eq!(EnableLevel::from_high_byte(0x00).level(), 0);
        assert_eq!(EnableLevel::from_high_byte(0x3F).level(), 0);
        assert_eq!(EnableLevel::from_high_byte(0x40).level(), 1);
        assert_eq!(EnableLevel::from_high_byte(0xFF).level(), 3);
        assert!(!EnableLevel::from_high_byte(0x3F).is_enabled());
        assert!(EnableLevel::from_high_byte(0x40).is_enabled());
    }

    #[test]
    fn single_sample_filter_passes_through() {
        let mut filter = EnableFilter::<1>::new();
        assert!(filter.update(EnableLevel(2)));
        assert!(!filter.update(EnableLevel(0)));
        assert!(filter.update(EnableLevel(1)));
    }

    #[test]
    fn debounce_ignores_single_glitch() {
        let mut filter = EnableFilter::<3>::new();
        assert!(!filter.update(EnableLevel(1)));
        assert!(!filter.update(EnableLevel(1)));
        assert!(filter.update(EnableLevel(1)));

        // One noisy zero does not switch off
        assert!(filter.update(EnableLevel(0)));
        assert!(filter.update(EnableLevel(1)));

        assert!(filter.update(EnableLevel(0)));
        assert!(filter.update(EnableLevel(0)));
        assert!(!filter.update(EnableLevel(0)));
    }
}
