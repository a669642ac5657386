//! Water tank level sensor: samples a pressure transducer, converts the
//! reading to depth and volume, and pushes it to an HTTP endpoint over WiFi.
//!
//! Hardware is reached through the [`sampler::AnalogInput`],
//! [`link::LinkHardware`], [`upload::Connector`] and [`clock::Clock`] traits;
//! the ESP32 implementations live in the firmware binary.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod config;
pub mod constants;
pub mod converter;
pub mod link;
pub mod measurement;
pub mod request;
pub mod sampler;
pub mod tank;
pub mod upload;

#[cfg(test)]
mod testing;
