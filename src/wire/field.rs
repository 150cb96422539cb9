/// One row of a message's field-tag table: the wire tag and the field name
/// it maps to. All declared fields carry fixed 32-bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub tag: u8,
    pub name: &'static str,
}

impl FieldDescriptor {
    pub const fn new(tag: u8, name: &'static str) -> Self {
        FieldDescriptor { tag, name }
    }
}

/// Scalar types that travel as a 4-byte little-endian fixed32 value.
pub trait Fixed32: Copy {
    fn to_bits(self) -> u32;
    fn from_bits(bits: u32) -> Self;
}

impl Fixed32 for f32 {
    fn to_bits(self) -> u32 {
        f32::to_bits(self)
    }

    fn from_bits(bits: u32) -> Self {
        f32::from_bits(bits)
    }
}

impl Fixed32 for u32 {
    fn to_bits(self) -> u32 {
        self
    }

    fn from_bits(bits: u32) -> Self {
        bits
    }
}

/// A fixed-shape record that can pass through the wire codec.
///
/// Implementations are produced by [`wire_message!`](crate::wire_message);
/// the field table is the single source of truth consulted by both
/// [`encode`](crate::wire::encode) and [`decode`](crate::wire::decode), and
/// must match on both ends of a link.
pub trait WireMessage: Default + Clone {
    const NAME: &'static str;

    /// Field-tag table, in ascending tag order.
    const FIELDS: &'static [FieldDescriptor];

    /// Largest possible encoded size, for sizing fixed buffers.
    const MAX_SIZE: usize;

    /// Raw fixed32 bits of the field with the given tag, `None` for tags
    /// outside the table.
    fn field_bits(&self, tag: u8) -> Option<u32>;

    /// Stores raw fixed32 bits into the field with the given tag. Tags
    /// outside the table are ignored.
    fn set_field_bits(&mut self, tag: u8, bits: u32);
}

const fn key_len(tag: u8) -> usize {
    let mut rest = ((tag as u32) << 3) >> 7;
    let mut len = 1;
    while rest != 0 {
        rest >>= 7;
        len += 1;
    }
    len
}

/// Upper bound of the encoded size of a message with the given field table:
/// one key plus four value bytes per field.
pub const fn max_encoded_len(fields: &[FieldDescriptor]) -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < fields.len() {
        len += key_len(fields[i].tag) + 4;
        i += 1;
    }
    len
}

/// Declares a wire record type: the struct, its field-tag table, and its
/// [`WireMessage`] implementation, replacing a schema-compiler step with a
/// declarative table.
///
/// ```
/// valkyrie_wire::wire_message! {
///     pub struct BaroSample {
///         1 => pressure_pa: f32,
///         2 => temperature_degc: f32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! wire_message {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $tag:literal => $field:ident : $fty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $fty,
            )+
        }

        impl $crate::wire::WireMessage for $name {
            const NAME: &'static str = stringify!($name);

            const FIELDS: &'static [$crate::wire::FieldDescriptor] = &[
                $($crate::wire::FieldDescriptor::new($tag, stringify!($field)),)+
            ];

            const MAX_SIZE: usize = $crate::wire::max_encoded_len(Self::FIELDS);

            fn field_bits(&self, tag: u8) -> Option<u32> {
                match tag {
                    $($tag => Some($crate::wire::Fixed32::to_bits(self.$field)),)+
                    _ => None,
                }
            }

            fn set_field_bits(&mut self, tag: u8, bits: u32) {
                match tag {
                    $($tag => self.$field = $crate::wire::Fixed32::from_bits(bits),)+
                    _ => {}
                }
            }
        }

        // The decoder tracks required-tag coverage in a u32 mask.
        const _: () = assert!(<$name as $crate::wire::WireMessage>::FIELDS.len() <= 32);
    };
}
