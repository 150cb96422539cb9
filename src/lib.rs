#![no_std]

pub mod channel;
pub mod common;
pub mod datatypes;
pub mod io;
pub mod messages;
pub mod queue;
pub mod wire;

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub use messages::{AccelSample, ControllerInputs, GyroSample, MagSample, TelemetryMessage};
pub use wire::{DecodeError, EncodeError, WireMessage, decode, encode};

pub type InstantU64 = fugit::Instant<u64, 1, 1_000_000>;

#[derive(Debug, Clone, Copy)]
pub struct Instant(pub InstantU64);

pub type DurationU64 = fugit::Duration<u64, 1, 1_000_000>;

#[derive(Debug, Clone, Copy)]
pub struct Duration(pub DurationU64);

impl From<InstantU64> for Instant {
    fn from(value: InstantU64) -> Self {
        Instant(value)
    }
}

impl From<DurationU64> for Duration {
    fn from(value: DurationU64) -> Self {
        Duration(value)
    }
}
