/// Result type used by the control loop.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error<E> {
    /// Indicator pin error
    Pin(E),

    /// The ADC did not report the end of a conversion within the configured number of polls.
    /// Only produced with [`ConversionWait::Bounded`](crate::adc::ConversionWait::Bounded).
    ConversionTimeout,
}

impl<E> Error<E> {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::Pin(_) => "Pin error",
            Error::ConversionTimeout => "ADC conversion timeout",
        }
    }
}

impl<E> From<E> for Error<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "{=str}", self.as_str());
    }
}
