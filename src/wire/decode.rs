use thiserror::Error;

use super::{FieldDescriptor, WireMessage, WireType};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("required field '{field}' (tag {tag}) missing from input")]
    MissingRequiredField { tag: u8, field: &'static str },

    #[error("field '{field}' (tag {tag}) present more than once")]
    DuplicateField { tag: u8, field: &'static str },

    #[error("value for tag {tag} truncated")]
    TruncatedValue { tag: u32 },

    #[error("input ended in the middle of a field key")]
    UnexpectedEndOfInput,

    #[error("field key is not a valid varint")]
    MalformedKey,

    #[error("cannot skip unknown tag {tag} with wire type code {code}")]
    UnsupportedWireType { tag: u32, code: u8 },

    #[error("field '{field}' (tag {tag}) expects a fixed 32-bit value, got wire type code {code}")]
    WireTypeMismatch {
        tag: u8,
        field: &'static str,
        code: u8,
    },
}

struct Scan<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scan<'a> {
    fn new(input: &'a [u8]) -> Self {
        Scan { input, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn take(&mut self) -> Option<u8> {
        let byte = *self.input.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Reads a LEB128 varint, capped at the 5 bytes a u32 can occupy.
    fn take_varint(&mut self) -> Result<u32, DecodeError> {
        let mut value: u32 = 0;
        for shift in 0..5 {
            let byte = self.take().ok_or(DecodeError::UnexpectedEndOfInput)?;
            value |= ((byte & 0x7f) as u32) << (shift * 7);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::MalformedKey)
    }

    fn take_fixed32(&mut self, tag: u32) -> Result<u32, DecodeError> {
        let mut bytes = [0u8; 4];
        for byte in bytes.iter_mut() {
            *byte = self.take().ok_or(DecodeError::TruncatedValue { tag })?;
        }
        Ok(u32::from_le_bytes(bytes))
    }

    fn skip(&mut self, wire_type: WireType, tag: u32) -> Result<(), DecodeError> {
        let width = match wire_type {
            WireType::Fixed32 => 4,
            WireType::Fixed64 => 8,
            WireType::Varint => {
                loop {
                    let byte = self.take().ok_or(DecodeError::TruncatedValue { tag })?;
                    if byte & 0x80 == 0 {
                        break;
                    }
                }
                return Ok(());
            }
            WireType::LengthDelimited => self.take_varint()? as usize,
        };

        if self.input.len() - self.pos < width {
            return Err(DecodeError::TruncatedValue { tag });
        }
        self.pos += width;
        Ok(())
    }
}

fn find_field(fields: &'static [FieldDescriptor], tag: u32) -> Option<(usize, &'static FieldDescriptor)> {
    fields
        .iter()
        .enumerate()
        .find(|(_, field)| field.tag as u32 == tag)
}

/// Decodes one record of type `M` from `input`.
///
/// Fields may arrive in any order; unknown tags are skipped over by wire
/// type. The record is returned only if every required tag was seen exactly
/// once, so a failed decode never yields partially populated data.
pub fn decode<M: WireMessage>(input: &[u8]) -> Result<M, DecodeError> {
    let mut msg = M::default();
    let mut seen: u32 = 0;
    let mut scan = Scan::new(input);

    while !scan.is_empty() {
        let key = scan.take_varint()?;
        let tag = key >> 3;
        let code = (key & 0x7) as u8;

        match find_field(M::FIELDS, tag) {
            Some((index, field)) => {
                if code != WireType::Fixed32.code() {
                    return Err(DecodeError::WireTypeMismatch {
                        tag: field.tag,
                        field: field.name,
                        code,
                    });
                }
                if seen & (1 << index) != 0 {
                    return Err(DecodeError::DuplicateField {
                        tag: field.tag,
                        field: field.name,
                    });
                }
                let bits = scan.take_fixed32(tag)?;
                msg.set_field_bits(field.tag, bits);
                seen |= 1 << index;
            }
            None => match WireType::from_code(code) {
                Some(wire_type) => scan.skip(wire_type, tag)?,
                None => return Err(DecodeError::UnsupportedWireType { tag, code }),
            },
        }
    }

    for (index, field) in M::FIELDS.iter().enumerate() {
        if seen & (1 << index) == 0 {
            return Err(DecodeError::MissingRequiredField {
                tag: field.tag,
                field: field.name,
            });
        }
    }

    Ok(msg)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::messages::{AccelSample, ControllerInputs};
    use crate::wire::encode;

    fn encoded(sample: &AccelSample) -> ([u8; AccelSample::MAX_SIZE], usize) {
        let mut buf = [0u8; AccelSample::MAX_SIZE];
        let len = encode(sample, &mut buf).unwrap();
        (buf, len)
    }

    #[test]
    fn test_round_trip() {
        let sample = AccelSample {
            x: 1.0,
            y: -2.5,
            z: 0.0,
        };

        let (buf, len) = encoded(&sample);
        assert_eq!(len, 15);

        let decoded: AccelSample = decode(&buf[..len]).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_round_trip_preserves_bit_patterns() {
        let sample = AccelSample {
            x: f32::from_bits(0x7fc0_0001), // NaN with payload bits
            y: -0.0,
            z: f32::MIN_POSITIVE / 2.0, // subnormal
        };

        let (buf, len) = encoded(&sample);
        let decoded: AccelSample = decode(&buf[..len]).unwrap();

        assert_eq!(decoded.x.to_bits(), sample.x.to_bits());
        assert_eq!(decoded.y.to_bits(), (-0.0f32).to_bits());
        assert_eq!(decoded.z.to_bits(), sample.z.to_bits());
    }

    #[test]
    fn test_controller_inputs_round_trip() {
        let inputs = ControllerInputs {
            timestamp: 123_456,
            stick_inputs: 0xa5a5_5a5a,
            switch_inputs: 0b1011,
            encoder_inputs: u32::MAX,
        };

        let mut buf = [0u8; ControllerInputs::MAX_SIZE];
        let len = encode(&inputs, &mut buf).unwrap();
        assert_eq!(len, 20);

        let decoded: ControllerInputs = decode(&buf[..len]).unwrap();
        assert_eq!(decoded, inputs);
    }

    #[test]
    fn test_decode_any_field_order() {
        let sample = AccelSample {
            x: 1.0,
            y: -2.5,
            z: 9.81,
        };
        let (buf, len) = encoded(&sample);

        // Permute the three 5-byte field groups to z, x, y.
        let mut permuted = [0u8; 15];
        permuted[..5].copy_from_slice(&buf[10..15]);
        permuted[5..10].copy_from_slice(&buf[..5]);
        permuted[10..].copy_from_slice(&buf[5..10]);
        assert_eq!(len, permuted.len());

        let decoded: AccelSample = decode(&permuted).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_missing_field_detected() {
        let sample = AccelSample {
            x: 1.0,
            y: -2.5,
            z: 0.0,
        };
        let (buf, _) = encoded(&sample);

        // First 10 bytes hold tags 1 and 2 exactly; z never appears.
        let err = decode::<AccelSample>(&buf[..10]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingRequiredField { tag: 3, field: "z" }
        );
    }

    #[test]
    fn test_empty_input_is_missing_first_field() {
        let err = decode::<AccelSample>(&[]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingRequiredField { tag: 1, field: "x" }
        );
    }

    #[test]
    fn test_unknown_tag_skipped() {
        let sample = AccelSample {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let (buf, len) = encoded(&sample);

        // Interleave an unrecognized tag 9 fixed32 pair after the x field.
        let mut extended = [0u8; 20];
        extended[..5].copy_from_slice(&buf[..5]);
        extended[5] = (9 << 3) | 5;
        extended[6..10].copy_from_slice(&0x1122_3344u32.to_le_bytes());
        extended[10..].copy_from_slice(&buf[5..len]);

        let decoded: AccelSample = decode(&extended).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_unknown_wide_tag_skipped() {
        let sample = AccelSample {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let (buf, len) = encoded(&sample);

        // Tag 100 needs a two-byte key: (100 << 3) | 5 = 805.
        let mut extended = [0u8; 21];
        extended[..len].copy_from_slice(&buf[..len]);
        extended[15] = 0xa5;
        extended[16] = 0x06;
        extended[17..].copy_from_slice(&1u32.to_le_bytes());

        let decoded: AccelSample = decode(&extended).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_unknown_varint_and_length_delimited_skipped() {
        let sample = AccelSample {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let (buf, len) = encoded(&sample);

        let mut extended = [0u8; 24];
        // Tag 8 varint, two-byte value.
        extended[0] = 8 << 3;
        extended[1] = 0x81;
        extended[2] = 0x01;
        // Tag 9 length-delimited, 4-byte payload.
        extended[3] = (9 << 3) | 2;
        extended[4] = 4;
        extended[5..9].copy_from_slice(b"crud");
        extended[9..].copy_from_slice(&buf[..len]);

        let decoded: AccelSample = decode(&extended).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let sample = AccelSample {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let (buf, len) = encoded(&sample);

        // Repeat the x field after a complete record.
        let mut extended = [0u8; 20];
        extended[..len].copy_from_slice(&buf[..len]);
        extended[len..].copy_from_slice(&buf[..5]);

        let err = decode::<AccelSample>(&extended).unwrap_err();
        assert_eq!(err, DecodeError::DuplicateField { tag: 1, field: "x" });
    }

    #[test]
    fn test_truncated_value() {
        let (buf, _) = encoded(&AccelSample::default());

        // Key of the second field followed by only two of its four bytes.
        let err = decode::<AccelSample>(&buf[..8]).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedValue { tag: 2 });
    }

    #[test]
    fn test_truncated_unknown_field() {
        // Unknown tag 9 announcing 4 value bytes, input ends after one.
        let input = [(9 << 3) | 5, 0xff];
        let err = decode::<AccelSample>(&input).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedValue { tag: 9 });
    }

    #[test]
    fn test_input_ending_mid_key() {
        // A continuation bit with nothing after it.
        let err = decode::<AccelSample>(&[0x80]).unwrap_err();
        assert_eq!(err, DecodeError::UnexpectedEndOfInput);
    }

    #[test]
    fn test_overlong_key_rejected() {
        let err = decode::<AccelSample>(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01]).unwrap_err();
        assert_eq!(err, DecodeError::MalformedKey);
    }

    #[test]
    fn test_wire_type_mismatch_on_known_tag() {
        // Tag 1 declared fixed32 but sent as a varint.
        let input = [1 << 3, 0x05];
        let err = decode::<AccelSample>(&input).unwrap_err();
        assert_eq!(
            err,
            DecodeError::WireTypeMismatch {
                tag: 1,
                field: "x",
                code: 0
            }
        );
    }

    #[test]
    fn test_unsupported_wire_type_on_unknown_tag() {
        // Wire type 3 (group start) cannot be skipped.
        let input = [(9 << 3) | 3];
        let err = decode::<AccelSample>(&input).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedWireType { tag: 9, code: 3 });
    }
}
