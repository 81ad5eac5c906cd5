//! Byte-order aware encoding and decoding of EXIF/TIFF tag values, plus the registries that tell
//! which tags exist in which IFD.
//!
//! ```
//! use exif_codec::{ByteOrder, IfdMapping, TagIndex, WrappedValue, IFD_PATH_STANDARD};
//!
//! let mapping = IfdMapping::with_standard().unwrap();
//! let index = TagIndex::with_standard(&mapping).unwrap();
//! let make = index.get(IFD_PATH_STANDARD, 0x010f).unwrap();
//!
//! let order = ByteOrder::LittleEndian;
//! let value = WrappedValue::new(make.tag_types()[0], b"Canon\0".to_vec(), 5, order);
//! assert_eq!(value.display_string(false).unwrap(), "Canon");
//! ```

pub mod byte_order_rw;
pub mod codec;
pub mod error;
pub mod ifd_mapping;
pub mod tag_index;
pub mod tag_type;
pub mod tags;
pub mod value;
pub mod wrapped_value;

pub use byte_order_rw::ByteOrder;
pub use codec::TagCodec;
pub use error::{Error, ErrorKind, Result};
pub use ifd_mapping::{
    IfdMapping, IfdPathId, IFD_PATH_EXIF, IFD_PATH_GPS, IFD_PATH_IOP, IFD_PATH_STANDARD,
    IFD_PATH_THUMBNAIL,
};
pub use tag_index::{TagIndex, TagInfo};
pub use tag_type::{Operation, TagType};
pub use value::{Rational, SignedRational, Value};
pub use wrapped_value::WrappedValue;
