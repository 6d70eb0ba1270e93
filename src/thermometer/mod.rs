//! Temperature sensing through the calibrated thermistor

pub mod calibration;
pub mod thermistor;

use fixed::types::I16F16;

/// I16F16 is a fixed point number with 16 fractional bits and 16 integer bits.
/// This gives us a precision of ~0.000015 degrees Celsius & a range of (-2^15, 2^15).
pub type Celsius = I16F16;

/// Builds a fixed point value from an integer count of hundredths.
///
/// Usable in `const` context, which `I16F16::from_num` is not.
pub const fn hundredths(value: i32) -> I16F16 {
    I16F16::from_bits((((value as i64) << I16F16::FRAC_NBITS) / 100) as i32)
}
