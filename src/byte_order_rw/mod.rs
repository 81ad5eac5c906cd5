mod byte_order_reader;
mod byte_order_writer;

pub use byte_order_reader::ByteOrderReader;
pub use byte_order_writer::ByteOrderWriter;

/// The endianness of all multi-byte fields of one EXIF/TIFF block.
///
/// It is selected once per container (by the `II` / `MM` header marker) and then applies to
/// every tag value in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    /// Reads the byte order from the first two bytes of a TIFF header.
    pub fn from_marker(header: &[u8]) -> Option<Self> {
        match header {
            [0x49, 0x49, ..] => Some(Self::LittleEndian),
            [0x4D, 0x4D, ..] => Some(Self::BigEndian),
            _ => None,
        }
    }

    pub fn marker(&self) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => [0x49, 0x49],
            ByteOrder::BigEndian => [0x4D, 0x4D],
        }
    }

    pub fn is_little_endian(&self) -> bool {
        matches!(self, ByteOrder::LittleEndian)
    }
}
