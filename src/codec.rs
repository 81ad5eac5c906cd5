use crate::byte_order_rw::{ByteOrder, ByteOrderReader, ByteOrderWriter};
use crate::error::{Error, Result};
use crate::tag_type::{Operation, TagType};
use crate::value::{Rational, SignedRational, Value};
use lazy_regex::{regex_captures, regex_is_match};
use std::io::{self, Cursor};

/// Encodes and decodes the values of one [TagType] under one [ByteOrder].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagCodec {
    tag_type: TagType,
    byte_order: ByteOrder,
}

impl TagCodec {
    pub fn new(tag_type: TagType, byte_order: ByteOrder) -> Self {
        Self {
            tag_type,
            byte_order,
        }
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn check(&self, operation: Operation) -> Result<()> {
        if self.tag_type.supports(operation) {
            Ok(())
        } else {
            Err(Error::Unsupported {
                tag_type: self.tag_type,
                operation,
            })
        }
    }

    /// Encodes `value` to its wire representation.
    ///
    /// ASCII gets exactly one NUL appended; nothing is range checked beyond what the native
    /// representation already enforces.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        self.check(Operation::Encode)?;
        if !self.tag_type.accepts(value) {
            return Err(Error::TypeMismatch {
                tag_type: self.tag_type,
                value_kind: value.kind_name(),
            });
        }

        let mut writer = ByteOrderWriter::new(Vec::new(), self.byte_order);
        match value {
            Value::Bytes(bytes) => writer.extend_from_slice(bytes),
            Value::Text(text) => {
                writer.extend_from_slice(text);
                if self.tag_type == TagType::Ascii {
                    writer.write_u8(0)?;
                }
            }
            Value::Shorts(values) => {
                for v in values {
                    writer.write_u16(*v)?;
                }
            }
            Value::Longs(values) => {
                for v in values {
                    writer.write_u32(*v)?;
                }
            }
            Value::SignedLongs(values) => {
                for v in values {
                    writer.write_i32(*v)?;
                }
            }
            Value::Rationals(values) => {
                for v in values {
                    writer.write_u32(v.numerator)?;
                    writer.write_u32(v.denominator)?;
                }
            }
            Value::SignedRationals(values) => {
                for v in values {
                    writer.write_i32(v.numerator)?;
                    writer.write_i32(v.denominator)?;
                }
            }
        }
        Ok(writer.into_inner())
    }

    /// Decodes `unit_count` units from `raw`.
    ///
    /// `raw` must be exactly [TagType::byte_count] long, with one exception: ASCII data may also
    /// be handed in without its terminator (or with the terminator counted as a unit), in which
    /// case a single trailing NUL is stripped. Text bytes are kept as they are, UTF-8 or not.
    pub fn decode(&self, raw: &[u8], unit_count: u32) -> Result<Value> {
        self.check(Operation::Decode)?;
        match self.tag_type {
            TagType::Ascii => self.decode_ascii(raw, unit_count).map(Value::Text),
            TagType::AsciiNoNul => {
                self.check_length(raw, unit_count)?;
                Ok(Value::Text(raw.to_vec()))
            }
            TagType::Byte | TagType::Undefined => {
                self.check_length(raw, unit_count)?;
                Ok(Value::Bytes(raw.to_vec()))
            }
            TagType::Short => self
                .read_units(raw, unit_count, |r| r.read_u16())
                .map(Value::Shorts),
            TagType::Long => self
                .read_units(raw, unit_count, |r| r.read_u32())
                .map(Value::Longs),
            TagType::SignedLong => self
                .read_units(raw, unit_count, |r| r.read_i32())
                .map(Value::SignedLongs),
            TagType::Rational => self
                .read_units(raw, unit_count, |r| {
                    Ok(Rational::new(r.read_u32()?, r.read_u32()?))
                })
                .map(Value::Rationals),
            TagType::SignedRational => self
                .read_units(raw, unit_count, |r| {
                    Ok(SignedRational::new(r.read_i32()?, r.read_i32()?))
                })
                .map(Value::SignedRationals),
        }
    }

    fn check_length(&self, raw: &[u8], unit_count: u32) -> Result<()> {
        let expected = unit_count as u64 * self.tag_type.size() as u64;
        if raw.len() as u64 == expected {
            Ok(())
        } else {
            Err(Error::LengthMismatch {
                tag_type: self.tag_type,
                unit_count,
                expected,
                actual: raw.len(),
            })
        }
    }

    fn read_units<T>(
        &self,
        raw: &[u8],
        unit_count: u32,
        read_unit: impl Fn(&mut ByteOrderReader<Cursor<&[u8]>>) -> io::Result<T>,
    ) -> Result<Vec<T>> {
        self.check_length(raw, unit_count)?;
        let mut reader = ByteOrderReader::new(Cursor::new(raw), self.byte_order);
        let values: io::Result<Vec<T>> = (0..unit_count)
            .map(|_| read_unit(&mut reader))
            .collect();
        Ok(values?)
    }

    fn decode_ascii(&self, raw: &[u8], unit_count: u32) -> Result<Vec<u8>> {
        let text = if raw.len() as u64 == unit_count as u64 + 1 {
            // the regular wire form: the terminator is not part of the unit count
            let (text, terminator) = raw.split_at(unit_count as usize);
            if terminator != b"\0" {
                log::warn!(
                    "ascii not terminated with nul as expected: [{}]",
                    String::from_utf8_lossy(raw)
                );
            }
            text
        } else if raw.len() as u64 == unit_count as u64 {
            match raw.split_last() {
                Some((0, text)) => text,
                _ => {
                    log::warn!(
                        "ascii not terminated with nul as expected: [{}]",
                        String::from_utf8_lossy(raw)
                    );
                    raw
                }
            }
        } else {
            return Err(Error::LengthMismatch {
                tag_type: self.tag_type,
                unit_count,
                expected: self.tag_type.byte_count(unit_count),
                actual: raw.len(),
            });
        };
        Ok(text.to_vec())
    }

    /// Builds a value from human-entered text.
    ///
    /// Integers are unsigned base-10 (optionally negative for SLONG), rationals are
    /// `numerator/denominator`, BYTE takes every character as one raw byte and the ASCII types
    /// take the text as is. UNDEFINED has no text form and always fails.
    pub fn parse_text(&self, text: &str) -> Result<Value> {
        self.check(Operation::ParseText)?;
        let invalid = |reason: String| Error::InvalidText {
            tag_type: self.tag_type,
            text: text.to_string(),
            reason,
        };
        let number = |digits: &str| -> Result<i64> {
            digits.parse::<i64>().map_err(|e| invalid(e.to_string()))
        };
        let narrow = |n: i64| invalid(format!("{n} is out of range"));

        Ok(match self.tag_type {
            TagType::Byte => Value::Bytes(text.bytes().collect()),
            TagType::Ascii | TagType::AsciiNoNul => Value::from(text),
            TagType::Short | TagType::Long => {
                if !regex_is_match!("^[0-9]+$", text) {
                    return Err(invalid("not an unsigned integer".to_string()));
                }
                let n = number(text)?;
                if self.tag_type == TagType::Short {
                    Value::Shorts(vec![u16::try_from(n).map_err(|_| narrow(n))?])
                } else {
                    Value::Longs(vec![u32::try_from(n).map_err(|_| narrow(n))?])
                }
            }
            TagType::SignedLong => {
                if !regex_is_match!("^-?[0-9]+$", text) {
                    return Err(invalid("not an integer".to_string()));
                }
                let n = number(text)?;
                Value::SignedLongs(vec![i32::try_from(n).map_err(|_| narrow(n))?])
            }
            TagType::Rational => {
                let (_whole, numerator, denominator) =
                    regex_captures!("^([0-9]+)/([0-9]+)$", text).ok_or_else(|| {
                        invalid("expected 'numerator/denominator'".to_string())
                    })?;
                let (numerator, denominator) = (number(numerator)?, number(denominator)?);
                Value::Rationals(vec![Rational::new(
                    u32::try_from(numerator).map_err(|_| narrow(numerator))?,
                    u32::try_from(denominator).map_err(|_| narrow(denominator))?,
                )])
            }
            TagType::SignedRational => {
                let (_whole, numerator, denominator) =
                    regex_captures!("^(-?[0-9]+)/([0-9]+)$", text).ok_or_else(|| {
                        invalid("expected '[-]numerator/denominator'".to_string())
                    })?;
                let (numerator, denominator) = (number(numerator)?, number(denominator)?);
                Value::SignedRationals(vec![SignedRational::new(
                    i32::try_from(numerator).map_err(|_| narrow(numerator))?,
                    i32::try_from(denominator).map_err(|_| narrow(denominator))?,
                )])
            }
            TagType::Undefined => {
                return Err(Error::Unsupported {
                    tag_type: self.tag_type,
                    operation: Operation::ParseText,
                })
            }
        })
    }
}
