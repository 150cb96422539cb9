//! Byte-stream framing for wire records: `[kind, len, payload]`.

use crate::messages::TelemetryMessage;
use crate::wire::EncodeError;

#[cfg(any(feature = "std", feature = "embedded"))]
pub mod reader;
#[cfg(any(feature = "std", feature = "embedded"))]
pub mod writer;

pub const WIRE_FRAME_HEADER_SIZE: usize = 2;
pub const WIRE_MSG_MAX_SIZE: usize = 20;
pub const WIRE_FRAME_MAX_SIZE: usize = WIRE_FRAME_HEADER_SIZE + WIRE_MSG_MAX_SIZE;

pub trait TelemetryHandler {
    fn handle(&mut self, msg: TelemetryMessage);
}

/// Encodes one framed message into `buf`, returning the frame length.
pub fn encode_frame(
    msg: &TelemetryMessage,
    buf: &mut [u8; WIRE_FRAME_MAX_SIZE],
) -> Result<usize, EncodeError> {
    let len = msg.encode(&mut buf[WIRE_FRAME_HEADER_SIZE..])?;
    buf[0] = msg.kind() as u8;
    buf[1] = len as u8;
    Ok(WIRE_FRAME_HEADER_SIZE + len)
}
