//! On/off state of the duty-cycle output.

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaterState {
    /// Carrier stopped, heater forced off, PID idle.
    #[default]
    Disabled,
    /// Carrier running, PID evaluated every tick.
    Enabled,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Disabled -> Enabled
    Enable,
    /// Enabled -> Disabled
    Disable,
    /// No change of state
    Stay,
}

impl HeaterState {
    /// Decide the transition for the latest enable reading. No hysteresis: one reading decides.
    pub const fn transition(self, enabled: bool) -> Transition {
        match (self, enabled) {
            (Self::Disabled, true) => Transition::Enable,
            (Self::Enabled, false) => Transition::Disable,
            _ => Transition::Stay,
        }
    }

    /// State after taking `transition`.
    pub const fn next(self, transition: Transition) -> Self {
        match transition {
            Transition::Enable => Self::Enabled,
            Transition::Disable => Self::Disabled,
            Transition::Stay => self,
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Enabled)
    }
}
