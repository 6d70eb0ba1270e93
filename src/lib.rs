//! Closed-loop temperature control for an egg incubator.
//!
//! A relay-switched heater is driven with a slow PWM whose duty cycle comes from a PID loop. A
//! thermistor linearized with a lookup table measures the temperature and a potentiometer
//! switches the heater on and off.
//!
//! Two timing domains cooperate:
//! - the control tick ([`control::ControlLoop::tick`]) samples, runs the state machine and the
//!   PID, and stores the resulting duty cycle in a [`duty::DutyCell`];
//! - the carrier tick ([`heater::carrier_tick`]) copies that value into the PWM compare register
//!   at every carrier period.
#![cfg_attr(not(test), no_std)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod adc;
pub mod config;
pub mod control;
pub mod controller;
pub mod duty;
pub mod error;
pub mod heater;
pub mod indicator;
pub mod state;
pub mod thermometer;
pub mod trimpot;

pub use error::Error;
