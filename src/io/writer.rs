use alloc::{boxed::Box, vec::Vec};
use thiserror::Error;

use super::{WIRE_FRAME_MAX_SIZE, encode_frame};
use crate::channel::Receiver;
use crate::messages::TelemetryMessage;
use crate::wire::EncodeError;

#[cfg(feature = "std")]
use std::io::Write;

#[cfg(all(feature = "embedded", not(feature = "std")))]
use embedded_io::Write;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("message encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[cfg(feature = "std")]
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(all(feature = "embedded", not(feature = "std")))]
    #[error("transport error: {0:?}")]
    Io(embedded_io::ErrorKind),
}

/// Drains telemetry channels onto a byte transport, one frame per message.
pub struct FrameWriter<W> {
    writer: W,
    channels: Vec<Box<dyn Receiver<TelemetryMessage>>>,
    err_cnt: usize,
}

impl<W> FrameWriter<W> {
    fn new_impl(writer: W, channels: Vec<Box<dyn Receiver<TelemetryMessage>>>) -> Self {
        Self {
            writer,
            channels,
            err_cnt: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.err_cnt
    }
}

impl<W: Write> FrameWriter<W> {
    pub fn new(writer: W, channels: Vec<Box<dyn Receiver<TelemetryMessage>>>) -> Self {
        Self::new_impl(writer, channels)
    }

    /// Writes every pending message from every channel. Failed writes are
    /// counted and the remaining messages are still attempted.
    pub fn write(&mut self) {
        for receiver in self.channels.iter_mut() {
            while let Some(msg) = receiver.try_recv() {
                match write_frame(&mut self.writer, &msg.v) {
                    Ok(_) => {}
                    Err(_) => self.err_cnt = self.err_cnt.wrapping_add(1),
                }
            }
        }
    }
}

#[cfg(feature = "std")]
fn write_frame<W: Write>(writer: &mut W, msg: &TelemetryMessage) -> Result<(), WriteError> {
    let mut buf = [0u8; WIRE_FRAME_MAX_SIZE];
    let len = encode_frame(msg, &mut buf)?;
    writer.write_all(&buf[..len])?;
    Ok(())
}

#[cfg(all(feature = "embedded", not(feature = "std")))]
fn write_frame<W: Write>(writer: &mut W, msg: &TelemetryMessage) -> Result<(), WriteError> {
    let mut buf = [0u8; WIRE_FRAME_MAX_SIZE];
    let len = encode_frame(msg, &mut buf)?;
    writer
        .write_all(&buf[..len])
        .map_err(|err| WriteError::Io(embedded_io::Error::kind(&err)))?;
    Ok(())
}

#[cfg(all(feature = "embedded", not(feature = "std")))]
impl<W: embedded_io_async::Write> FrameWriter<W> {
    pub fn new_async(writer: W, channels: Vec<Box<dyn Receiver<TelemetryMessage>>>) -> Self {
        Self::new_impl(writer, channels)
    }

    /// Async twin of [`FrameWriter::write`] for embedded transports.
    pub async fn write_async(&mut self) {
        for receiver in self.channels.iter_mut() {
            while let Some(msg) = receiver.try_recv() {
                match write_frame_async(&mut self.writer, &msg.v).await {
                    Ok(_) => {}
                    Err(_) => self.err_cnt = self.err_cnt.wrapping_add(1),
                }
            }
        }
    }
}

#[cfg(all(feature = "embedded", not(feature = "std")))]
async fn write_frame_async<W: embedded_io_async::Write>(
    writer: &mut W,
    msg: &TelemetryMessage,
) -> Result<(), WriteError> {
    let mut buf = [0u8; WIRE_FRAME_MAX_SIZE];
    let len = encode_frame(msg, &mut buf)?;
    writer
        .write_all(&buf[..len])
        .await
        .map_err(|err| WriteError::Io(embedded_io::Error::kind(&err)))?;
    Ok(())
}
