use super::ByteOrder;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::{
    io::{self, Read},
    ops::{Deref, DerefMut},
};

pub struct ByteOrderReader<R: Read> {
    reader: R,
    byte_order: ByteOrder,
}
impl<R: Read> ByteOrderReader<R> {
    pub fn new(reader: R, byte_order: ByteOrder) -> Self {
        Self { reader, byte_order }
    }
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

macro_rules! generate_read_function {
    ($name:ident, $kind:ty) => {
        pub fn $name(&mut self) -> Result<$kind, io::Error> {
            match self.byte_order {
                ByteOrder::LittleEndian => self.reader.$name::<LittleEndian>(),
                ByteOrder::BigEndian => self.reader.$name::<BigEndian>(),
            }
        }
    };
}
impl<R: Read> ByteOrderReader<R> {
    pub fn read_u8(&mut self) -> Result<u8, io::Error> {
        self.reader.read_u8()
    }
    generate_read_function!(read_u16, u16);
    generate_read_function!(read_u32, u32);
    generate_read_function!(read_i32, i32);
}

impl<R: Read> Deref for ByteOrderReader<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}
impl<R: Read> DerefMut for ByteOrderReader<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}
