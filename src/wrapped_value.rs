use crate::byte_order_rw::ByteOrder;
use crate::codec::TagCodec;
use crate::error::{Error, Result};
use crate::tag_type::TagType;
use crate::value::Value;
use derivative::Derivative;
use std::sync::OnceLock;

/// A tag value as read from (or destined for) an IFD: the raw bytes plus everything needed to
/// decode them.
///
/// The raw bytes stay the source of truth. Decoding happens on first access and is cached;
/// a length that doesn't match the type and unit count is only reported then, not on
/// construction.
#[derive(Derivative)]
#[derivative(Debug, Clone, PartialEq)]
pub struct WrappedValue {
    tag_type: TagType,
    byte_order: ByteOrder,
    raw: Vec<u8>,
    unit_count: u32,
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    decoded: OnceLock<Value>,
}

impl WrappedValue {
    pub fn new(
        tag_type: TagType,
        raw: impl Into<Vec<u8>>,
        unit_count: u32,
        byte_order: ByteOrder,
    ) -> Self {
        Self {
            tag_type,
            byte_order,
            raw: raw.into(),
            unit_count,
            decoded: OnceLock::new(),
        }
    }

    /// Encodes `value` right away (this is the write path); the cache starts out filled.
    pub fn from_value(tag_type: TagType, value: Value, byte_order: ByteOrder) -> Result<Self> {
        let unit_count = narrow_unit_count(tag_type, value.unit_count())?;
        let raw = TagCodec::new(tag_type, byte_order).encode(&value)?;
        let wrapped = Self::new(tag_type, raw, unit_count, byte_order);
        let _ = wrapped.decoded.set(value);
        Ok(wrapped)
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Whether the value is small enough to live in the IFD entry itself.
    pub fn fits_inline(&self) -> bool {
        self.tag_type.fits_inline(self.unit_count)
    }

    /// The decoded value.
    pub fn value(&self) -> Result<&Value> {
        if let Some(value) = self.decoded.get() {
            return Ok(value);
        }
        let value =
            TagCodec::new(self.tag_type, self.byte_order).decode(&self.raw, self.unit_count)?;
        // a concurrent reader may have won the race; both decoded the same bytes
        Ok(self.decoded.get_or_init(|| value))
    }

    /// Renders all units, or only the first one if `first_only` is set.
    pub fn display_string(&self, first_only: bool) -> Result<String> {
        let value = self.value()?;
        Ok(if first_only {
            value.format_first()
        } else {
            value.to_string()
        })
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.raw
    }
}

/// IFD entries store the unit count as a u32.
fn narrow_unit_count(tag_type: TagType, unit_count: usize) -> Result<u32> {
    u32::try_from(unit_count).map_err(|_| Error::TooManyUnits {
        tag_type,
        unit_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::value::{Rational, SignedRational};

    const ORDER: ByteOrder = ByteOrder::BigEndian;

    fn wrap(tag_type: TagType, value: Value, unit_count: u32) -> WrappedValue {
        let encoded = TagCodec::new(tag_type, ORDER).encode(&value).unwrap();
        WrappedValue::new(tag_type, encoded, unit_count, ORDER)
    }

    #[test]
    fn byte_value() {
        let wrapped = wrap(TagType::Byte, Value::Bytes(vec![1, 2, 3, 4]), 4);
        assert_eq!(wrapped.tag_type(), TagType::Byte);
        assert_eq!(wrapped.unit_count(), 4);
        assert_eq!(wrapped.value(), Ok(&Value::Bytes(vec![1, 2, 3, 4])));
        assert_eq!(wrapped.display_string(true).unwrap(), "0x01");
        assert_eq!(wrapped.display_string(false).unwrap(), "01 02 03 04");
    }

    #[test]
    fn ascii_value() {
        for tag_type in [TagType::Ascii, TagType::AsciiNoNul] {
            let wrapped = wrap(tag_type, Value::from("testing"), 7);
            assert_eq!(wrapped.value(), Ok(&Value::from("testing")));
            assert_eq!(wrapped.display_string(true).unwrap(), "testing");
            assert_eq!(wrapped.display_string(false).unwrap(), "testing");
        }
    }

    #[test]
    fn short_value() {
        let wrapped = wrap(TagType::Short, Value::Shorts(vec![11, 22, 33, 44]), 4);
        assert_eq!(wrapped.display_string(true).unwrap(), "11");
        assert_eq!(wrapped.display_string(false).unwrap(), "[11 22 33 44]");
    }

    #[test]
    fn single_long_keeps_brackets() {
        let wrapped = wrap(TagType::Long, Value::Longs(vec![11223344]), 1);
        assert_eq!(wrapped.display_string(true).unwrap(), "11223344");
        assert_eq!(wrapped.display_string(false).unwrap(), "[11223344]");
    }

    #[test]
    fn rational_values() {
        let wrapped = wrap(TagType::Rational, Value::Rationals(vec![Rational::new(0x11, 0x22)]), 1);
        assert_eq!(
            wrapped.raw_bytes(),
            &[0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00, 0x22]
        );
        assert_eq!(wrapped.display_string(true).unwrap(), "17/34");
        assert_eq!(wrapped.display_string(false).unwrap(), "[17/34]");

        let wrapped = wrap(
            TagType::Rational,
            Value::Rationals(vec![Rational::new(0x11, 0x22), Rational::new(0x33, 0x44)]),
            2,
        );
        assert_eq!(wrapped.display_string(true).unwrap(), "17/34");
        assert_eq!(wrapped.display_string(false).unwrap(), "[17/34 51/68]");
    }

    #[test]
    fn signed_values() {
        let wrapped = wrap(TagType::SignedLong, Value::SignedLongs(vec![0x11]), 1);
        assert_eq!(wrapped.display_string(true).unwrap(), "17");
        assert_eq!(wrapped.display_string(false).unwrap(), "[17]");

        let wrapped = wrap(
            TagType::SignedRational,
            Value::SignedRationals(vec![SignedRational::new(0x11, 0x22)]),
            1,
        );
        assert_eq!(wrapped.display_string(true).unwrap(), "17/34");
        assert_eq!(wrapped.display_string(false).unwrap(), "[17/34]");
    }

    #[test]
    fn undefined_renders_like_bytes() {
        let wrapped = WrappedValue::new(TagType::Undefined, b"0230".to_vec(), 4, ORDER);
        assert_eq!(wrapped.display_string(false).unwrap(), "30 32 33 30");
        assert_eq!(wrapped.display_string(true).unwrap(), "0x30");
    }

    #[test]
    fn malformed_length_fails_lazily() {
        let wrapped = WrappedValue::new(TagType::Short, vec![0, 1, 2], 2, ORDER);
        assert_eq!(wrapped.raw_bytes(), &[0, 1, 2]);
        let err = wrapped.value().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(matches!(
            wrapped.display_string(false),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn decoding_is_repeatable() {
        let wrapped = wrap(TagType::Short, Value::Shorts(vec![1, 2]), 2);
        let first = wrapped.value().unwrap().clone();
        assert_eq!(wrapped.value().unwrap(), &first);
        assert_eq!(wrapped.raw_bytes(), &[0, 1, 0, 2]);
        // the cache doesn't take part in equality
        assert_eq!(wrapped, WrappedValue::new(TagType::Short, vec![0, 1, 0, 2], 2, ORDER));
    }

    #[test]
    fn from_value_encodes_eagerly() {
        let wrapped =
            WrappedValue::from_value(TagType::Ascii, Value::from("hi"), ByteOrder::LittleEndian)
                .unwrap();
        assert_eq!(wrapped.raw_bytes(), b"hi\0");
        assert_eq!(wrapped.unit_count(), 2);
        assert!(wrapped.fits_inline());
        assert_eq!(wrapped.display_string(false).unwrap(), "hi");

        let err = WrappedValue::from_value(TagType::Short, Value::from("hi"), ORDER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn unit_counts_beyond_u32_are_rejected() {
        assert_eq!(narrow_unit_count(TagType::Byte, 7), Ok(7));
        assert_eq!(
            narrow_unit_count(TagType::Byte, u32::MAX as usize),
            Ok(u32::MAX)
        );
        #[cfg(target_pointer_width = "64")]
        {
            let err = narrow_unit_count(TagType::Short, u32::MAX as usize + 1).unwrap_err();
            assert_eq!(
                err,
                Error::TooManyUnits {
                    tag_type: TagType::Short,
                    unit_count: u32::MAX as usize + 1
                }
            );
            assert_eq!(err.kind(), ErrorKind::MalformedInput);
        }
    }

    #[test]
    fn shared_between_threads() {
        let wrapped = std::sync::Arc::new(wrap(TagType::Long, Value::Longs(vec![1, 2, 3]), 3));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let wrapped = wrapped.clone();
                std::thread::spawn(move || wrapped.display_string(false).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "[1 2 3]");
        }
    }
}
