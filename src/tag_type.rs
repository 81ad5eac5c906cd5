use crate::error::Error;
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The data-type of a tag value.
///
/// A value is always a sequence of units of this type; the unit count is stored next to the type
/// in the IFD entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    Undefined,
    SignedLong,
    SignedRational,
    /// Text that is known to be stored without a trailing NUL. Never appears as a type code in
    /// standard files.
    AsciiNoNul,
}

/// The width of a single unit of a [TagType].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitWidth {
    Fixed(usize),
    /// The value is an opaque byte blob; its length is given by the unit count alone.
    Variable,
}

/// An operation the codec can perform on a [TagType].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Encode,
    Decode,
    ParseText,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operation::Encode => "encoding",
            Operation::Decode => "decoding",
            Operation::ParseText => "parsing from text",
        })
    }
}

/// A row of the static type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub tag_type: TagType,
    pub code: u16,
    pub name: &'static str,
    pub width: UnitWidth,
    pub operations: &'static [Operation],
}

const ALL_OPERATIONS: &[Operation] = &[Operation::Encode, Operation::Decode, Operation::ParseText];

pub const TYPE_DESCRIPTORS: [TypeDescriptor; 9] = [
    TypeDescriptor {
        tag_type: TagType::Byte,
        code: 1,
        name: "BYTE",
        width: UnitWidth::Fixed(1),
        operations: ALL_OPERATIONS,
    },
    TypeDescriptor {
        tag_type: TagType::Ascii,
        code: 2,
        name: "ASCII",
        width: UnitWidth::Variable,
        operations: ALL_OPERATIONS,
    },
    TypeDescriptor {
        tag_type: TagType::Short,
        code: 3,
        name: "SHORT",
        width: UnitWidth::Fixed(2),
        operations: ALL_OPERATIONS,
    },
    TypeDescriptor {
        tag_type: TagType::Long,
        code: 4,
        name: "LONG",
        width: UnitWidth::Fixed(4),
        operations: ALL_OPERATIONS,
    },
    TypeDescriptor {
        tag_type: TagType::Rational,
        code: 5,
        name: "RATIONAL",
        width: UnitWidth::Fixed(8),
        operations: ALL_OPERATIONS,
    },
    TypeDescriptor {
        tag_type: TagType::Undefined,
        code: 7,
        name: "UNDEFINED",
        width: UnitWidth::Variable,
        // undefined values only have a meaning relative to their tag, so there is no text form
        operations: &[Operation::Encode, Operation::Decode],
    },
    TypeDescriptor {
        tag_type: TagType::SignedLong,
        code: 9,
        name: "SLONG",
        width: UnitWidth::Fixed(4),
        operations: ALL_OPERATIONS,
    },
    TypeDescriptor {
        tag_type: TagType::SignedRational,
        code: 10,
        name: "SRATIONAL",
        width: UnitWidth::Fixed(8),
        operations: ALL_OPERATIONS,
    },
    TypeDescriptor {
        tag_type: TagType::AsciiNoNul,
        code: 0xf0,
        name: "ASCII_NO_NUL",
        width: UnitWidth::Variable,
        operations: ALL_OPERATIONS,
    },
];

impl TagType {
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        // the table is ordered like the enum
        &TYPE_DESCRIPTORS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn width(&self) -> UnitWidth {
        self.descriptor().width
    }

    pub fn is_variable(&self) -> bool {
        self.width() == UnitWidth::Variable
    }

    /// The number of bytes of a single unit (variable width types count bytes).
    pub fn size(&self) -> usize {
        match self.width() {
            UnitWidth::Fixed(n) => n,
            UnitWidth::Variable => 1,
        }
    }

    /// The number of bytes a value of `unit_count` units occupies on the wire.
    ///
    /// For [TagType::Ascii] the unit count excludes the NUL terminator, which is added here.
    pub fn byte_count(&self, unit_count: u32) -> u64 {
        let bytes = unit_count as u64 * self.size() as u64;
        match self {
            TagType::Ascii => bytes + 1,
            _ => bytes,
        }
    }

    /// Whether the value fits into the 4 byte value/offset field of an IFD entry.
    pub fn fits_inline(&self, unit_count: u32) -> bool {
        self.byte_count(unit_count) <= 4
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.descriptor().operations.contains(&operation)
    }

    /// Whether `value` holds the native representation of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (TagType::Byte | TagType::Undefined, Value::Bytes(_))
                | (TagType::Ascii | TagType::AsciiNoNul, Value::Text(_))
                | (TagType::Short, Value::Shorts(_))
                | (TagType::Long, Value::Longs(_))
                | (TagType::SignedLong, Value::SignedLongs(_))
                | (TagType::Rational, Value::Rationals(_))
                | (TagType::SignedRational, Value::SignedRationals(_))
        )
    }

    pub fn all() -> impl Iterator<Item = TagType> {
        TYPE_DESCRIPTORS.iter().map(|descriptor| descriptor.tag_type)
    }
}

impl TryFrom<u16> for TagType {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        TYPE_DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.code == value)
            .map(|descriptor| descriptor.tag_type)
            .ok_or(Error::UnknownTypeCode(value))
    }
}

impl From<TagType> for u16 {
    fn from(value: TagType) -> Self {
        value.descriptor().code
    }
}

impl FromStr for TagType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TYPE_DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.name == s)
            .map(|descriptor| descriptor.tag_type)
            .ok_or_else(|| format!("Unknown value type: {}", s))
    }
}

impl Display for TagType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
