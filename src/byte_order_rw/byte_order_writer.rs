use super::ByteOrder;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

pub struct ByteOrderWriter<W: Write> {
    writer: W,
    byte_order: ByteOrder,
}
impl<W: Write> ByteOrderWriter<W> {
    pub fn new(writer: W, byte_order: ByteOrder) -> Self {
        Self { writer, byte_order }
    }
    pub fn into_inner(self) -> W {
        self.writer
    }
}

macro_rules! generate_write_function {
    ($name:ident, $kind:ty) => {
        pub fn $name(&mut self, value: $kind) -> Result<(), io::Error> {
            match self.byte_order {
                ByteOrder::LittleEndian => self.writer.$name::<LittleEndian>(value),
                ByteOrder::BigEndian => self.writer.$name::<BigEndian>(value),
            }
        }
    };
}
impl<W: Write> ByteOrderWriter<W> {
    pub fn write_u8(&mut self, value: u8) -> Result<(), io::Error> {
        self.writer.write_u8(value)
    }
    generate_write_function!(write_u16, u16);
    generate_write_function!(write_u32, u32);
    generate_write_function!(write_i32, i32);
}

impl<W: Write> Deref for ByteOrderWriter<W> {
    type Target = W;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}
impl<W: Write> DerefMut for ByteOrderWriter<W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}
