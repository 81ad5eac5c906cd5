use crate::ifd_mapping::{
    IFD_PATH_EXIF, IFD_PATH_GPS, IFD_PATH_IOP, IFD_PATH_STANDARD, IFD_PATH_THUMBNAIL,
};
use crate::tag_type::TagType;
use std::fmt::{Display, Formatter};

include!(concat!(env!("OUT_DIR"), "/tag_data.rs"));

/// A data structure describing one specific tag (2 byte key) that can appear in an IFD.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TagDescriptor {
    pub name: &'static str,
    pub tag: u16,
    /// The types a writer may use for this tag; the first one is preferred.
    pub dtype: &'static [TagType],
    pub count: TagCount,
    pub interpretation: TagInterpretation,
    pub description: &'static str,
}

/// An enum describing the amount of values we expect for a given tag.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum TagCount {
    N,
    ConcreteValue(u32),
}

impl TagCount {
    pub fn allows(&self, unit_count: u32) -> bool {
        match self {
            TagCount::N => true,
            TagCount::ConcreteValue(n) => *n == unit_count,
        }
    }
}

/// The high level interpretation of a tag.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum TagInterpretation {
    Default,
    /// The value is the offset of a sub-IFD, named relative to the IFD containing the tag.
    IfdPointer { child: &'static str },
}

impl Display for TagDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:#06x})", self.name, self.tag)
    }
}

/// The tags that are valid within one ifd path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagTable {
    pub path: &'static str,
    pub tags: &'static [TagDescriptor],
}

/// The tag tables of the standard EXIF layout. IFD1 and its sub-IFDs reuse the tables of the
/// IFD0 tree.
pub const STANDARD_TAG_TABLES: [TagTable; 8] = [
    TagTable {
        path: IFD_PATH_STANDARD,
        tags: &ifd::ALL,
    },
    TagTable {
        path: IFD_PATH_EXIF,
        tags: &exif::ALL,
    },
    TagTable {
        path: IFD_PATH_GPS,
        tags: &gps_info::ALL,
    },
    TagTable {
        path: IFD_PATH_IOP,
        tags: &iop::ALL,
    },
    TagTable {
        path: IFD_PATH_THUMBNAIL,
        tags: &ifd::ALL,
    },
    TagTable {
        path: "IFD1/Exif",
        tags: &exif::ALL,
    },
    TagTable {
        path: "IFD1/GPSInfo",
        tags: &gps_info::ALL,
    },
    TagTable {
        path: "IFD1/Exif/Iop",
        tags: &iop::ALL,
    },
];
