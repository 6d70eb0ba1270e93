//! Controller to manage the [`Heater`](crate::heater::Heater) to keep a constant temperature.

use fixed::types::I16F16;

use crate::thermometer::Celsius;

pub mod pid;

/// Controller gain, same representation as [`Celsius`].
pub type Gain = I16F16;

/// Time span in seconds, same representation as [`Celsius`].
pub type Seconds = I16F16;

pub trait Controller {
    type Output;

    /// Get the target temperature in degrees Celsius
    fn target(&self) -> Celsius;

    /// Run the controller for a single tick
    fn run(&mut self, measured: Celsius) -> Self::Output;

    /// Forget all accumulated history
    fn reset(&mut self);
}
