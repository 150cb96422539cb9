use thiserror::Error;

use super::{WireMessage, WireType};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("output buffer too small: {needed} bytes needed, {capacity} available")]
    BufferTooSmall { needed: usize, capacity: usize },
}

struct Cursor<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(out: &'a mut [u8]) -> Self {
        Cursor { out, pos: 0 }
    }

    fn put(&mut self, byte: u8) -> Result<(), EncodeError> {
        if self.pos >= self.out.len() {
            return Err(EncodeError::BufferTooSmall {
                needed: self.pos + 1,
                capacity: self.out.len(),
            });
        }
        self.out[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    fn put_varint(&mut self, mut value: u32) -> Result<(), EncodeError> {
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.put(byte)?;
            if value == 0 {
                return Ok(());
            }
        }
    }

    fn put_key(&mut self, tag: u8, wire_type: WireType) -> Result<(), EncodeError> {
        self.put_varint(((tag as u32) << 3) | wire_type.code() as u32)
    }

    fn put_fixed32(&mut self, bits: u32) -> Result<(), EncodeError> {
        for byte in bits.to_le_bytes() {
            self.put(byte)?;
        }
        Ok(())
    }
}

/// Encodes a record into `out`, returning the number of bytes written.
///
/// Fields are emitted in ascending tag order, each as a key followed by the
/// 4-byte little-endian value. Any `out` of at least [`WireMessage::MAX_SIZE`]
/// bytes succeeds; the record itself is always representable.
pub fn encode<M: WireMessage>(msg: &M, out: &mut [u8]) -> Result<usize, EncodeError> {
    let mut cursor = Cursor::new(out);

    for field in M::FIELDS {
        if let Some(bits) = msg.field_bits(field.tag) {
            cursor.put_key(field.tag, WireType::Fixed32)?;
            cursor.put_fixed32(bits)?;
        }
    }

    Ok(cursor.pos)
}
