use defmt_or_log::warn;
use thiserror::Error;

use super::{TelemetryHandler, WIRE_MSG_MAX_SIZE};
use crate::messages::{MessageKind, TelemetryMessage};
use crate::wire::DecodeError;

#[cfg(feature = "std")]
use std::io::Read;

#[cfg(all(feature = "embedded", not(feature = "std")))]
use embedded_io::{Read, ReadExactError};

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("failed to decode {kind:?} payload: {source}")]
    Decode {
        kind: MessageKind,
        source: DecodeError,
    },

    #[error("frame payload length {len} exceeds the wire maximum")]
    FrameTooLarge { len: usize },

    #[cfg(feature = "std")]
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(all(feature = "embedded", not(feature = "std")))]
    #[error("transport error: {0:?}")]
    Io(embedded_io::ErrorKind),

    #[cfg(all(feature = "embedded", not(feature = "std")))]
    #[error("transport closed before a full frame was read")]
    Eof,
}

pub struct FrameReader<R, H> {
    reader: R,
    handler: H,
    payload: [u8; WIRE_MSG_MAX_SIZE],
}

impl<R, H> FrameReader<R, H> {
    pub fn new(reader: R, handler: H) -> Self {
        Self {
            reader,
            handler,
            payload: [0u8; WIRE_MSG_MAX_SIZE],
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

impl<R, H: TelemetryHandler> FrameReader<R, H> {
    /// Known kinds are decoded and handed to the handler; frames with kinds
    /// this build does not know are consumed and dropped.
    fn dispatch(&mut self, kind_raw: u8, len: usize) -> Result<(), ReadError> {
        match MessageKind::from_u8(kind_raw) {
            Some(kind) => {
                let msg = TelemetryMessage::decode(kind, &self.payload[..len])
                    .map_err(|source| ReadError::Decode { kind, source })?;
                self.handler.handle(msg);
            }
            None => {
                warn!("ignoring frame with unknown kind {}", kind_raw);
            }
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<R: Read, H: TelemetryHandler> FrameReader<R, H> {
    /// Reads and dispatches a single frame.
    pub fn read(&mut self) -> Result<(), ReadError> {
        let mut header = [0u8; super::WIRE_FRAME_HEADER_SIZE];
        self.reader.read_exact(&mut header)?;

        let len = header[1] as usize;
        if len > WIRE_MSG_MAX_SIZE {
            return Err(ReadError::FrameTooLarge { len });
        }
        self.reader.read_exact(&mut self.payload[..len])?;

        self.dispatch(header[0], len)
    }
}

#[cfg(all(feature = "embedded", not(feature = "std")))]
impl<R: Read, H: TelemetryHandler> FrameReader<R, H> {
    /// Reads and dispatches a single frame.
    pub fn read(&mut self) -> Result<(), ReadError> {
        let mut header = [0u8; super::WIRE_FRAME_HEADER_SIZE];
        self.reader
            .read_exact(&mut header)
            .map_err(read_exact_error)?;

        let len = header[1] as usize;
        if len > WIRE_MSG_MAX_SIZE {
            return Err(ReadError::FrameTooLarge { len });
        }
        self.reader
            .read_exact(&mut self.payload[..len])
            .map_err(read_exact_error)?;

        self.dispatch(header[0], len)
    }
}

#[cfg(all(feature = "embedded", not(feature = "std")))]
fn read_exact_error<E: embedded_io::Error>(err: ReadExactError<E>) -> ReadError {
    match err {
        ReadExactError::UnexpectedEof => ReadError::Eof,
        ReadExactError::Other(err) => ReadError::Io(err.kind()),
    }
}
