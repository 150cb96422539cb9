//! Wire record definitions for the telemetry link.
//!
//! Tag assignments are a wire compatibility contract shared with the flight
//! controller firmware; they must never be renumbered.

use num_derive::FromPrimitive;

use crate::wire::{self, DecodeError, EncodeError, WireMessage};
use crate::wire_message;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

wire_message! {
    /// One accelerometer sample, specific force along the body axes in
    /// m/s^2.
    pub struct AccelSample {
        1 => x: f32,
        2 => y: f32,
        3 => z: f32,
    }
}

wire_message! {
    /// One gyroscope sample, angular velocity about the body axes in rad/s.
    pub struct GyroSample {
        1 => x: f32,
        2 => y: f32,
        3 => z: f32,
    }
}

wire_message! {
    /// One magnetometer sample, field strength along the body axes in gauss.
    pub struct MagSample {
        1 => x: f32,
        2 => y: f32,
        3 => z: f32,
    }
}

wire_message! {
    /// Raw pilot input state, packed by the controller firmware.
    pub struct ControllerInputs {
        1 => timestamp: u32,
        2 => stick_inputs: u32,
        3 => switch_inputs: u32,
        4 => encoder_inputs: u32,
    }
}

/// Frame kind byte identifying which record type a payload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MessageKind {
    Accel = 1,
    Gyro = 2,
    Mag = 3,
    Controller = 4,
}

impl MessageKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(value)
    }
}

/// Any record the telemetry link can carry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TelemetryMessage {
    Accel(AccelSample),
    Gyro(GyroSample),
    Mag(MagSample),
    Controller(ControllerInputs),
}

impl TelemetryMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            TelemetryMessage::Accel(_) => MessageKind::Accel,
            TelemetryMessage::Gyro(_) => MessageKind::Gyro,
            TelemetryMessage::Mag(_) => MessageKind::Mag,
            TelemetryMessage::Controller(_) => MessageKind::Controller,
        }
    }

    /// Largest encoded size of the contained record type.
    pub fn max_size(&self) -> usize {
        match self {
            TelemetryMessage::Accel(_) => AccelSample::MAX_SIZE,
            TelemetryMessage::Gyro(_) => GyroSample::MAX_SIZE,
            TelemetryMessage::Mag(_) => MagSample::MAX_SIZE,
            TelemetryMessage::Controller(_) => ControllerInputs::MAX_SIZE,
        }
    }

    pub fn encode(&self, out: &mut [u8]) -> Result<usize, EncodeError> {
        match self {
            TelemetryMessage::Accel(msg) => wire::encode(msg, out),
            TelemetryMessage::Gyro(msg) => wire::encode(msg, out),
            TelemetryMessage::Mag(msg) => wire::encode(msg, out),
            TelemetryMessage::Controller(msg) => wire::encode(msg, out),
        }
    }

    pub fn decode(kind: MessageKind, input: &[u8]) -> Result<Self, DecodeError> {
        match kind {
            MessageKind::Accel => wire::decode(input).map(TelemetryMessage::Accel),
            MessageKind::Gyro => wire::decode(input).map(TelemetryMessage::Gyro),
            MessageKind::Mag => wire::decode(input).map(TelemetryMessage::Mag),
            MessageKind::Controller => wire::decode(input).map(TelemetryMessage::Controller),
        }
    }
}
