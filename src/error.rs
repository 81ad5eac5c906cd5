use crate::ifd_mapping::IfdPathId;
use crate::tag_type::{Operation, TagType};
use std::io;
use thiserror::Error;

/// The error-type produced by the codec and the registries.
///
/// Use [Error::kind] to branch on the broad category; unknown tags are routine in real files, so
/// [ErrorKind::NotFound] is expected to be handled rather than propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{tag_type} value with {unit_count} unit(s) needs {expected} bytes, got {actual}")]
    LengthMismatch {
        tag_type: TagType,
        unit_count: u32,
        expected: u64,
        actual: usize,
    },

    #[error("{unit_count} units of {tag_type} don't fit the u32 unit count of an IFD entry")]
    TooManyUnits { tag_type: TagType, unit_count: usize },

    #[error("not enough data: {0}")]
    NotEnoughData(String),

    #[error("unknown type code {0}")]
    UnknownTypeCode(u16),

    #[error("couldn't parse '{text}' as {tag_type}: {reason}")]
    InvalidText {
        tag_type: TagType,
        text: String,
        reason: String,
    },

    #[error("{operation} is not supported for {tag_type} values")]
    Unsupported {
        tag_type: TagType,
        operation: Operation,
    },

    #[error("a {value_kind} value can't be encoded as {tag_type}")]
    TypeMismatch {
        tag_type: TagType,
        value_kind: &'static str,
    },

    #[error("tag {id:#06x} not found in '{path}'")]
    TagNotFound { path: String, id: u16 },

    #[error("tag '{name}' not found in '{path}'")]
    TagNameNotFound { path: String, name: String },

    #[error("unknown ifd path '{0}'")]
    UnknownPath(String),

    #[error("unknown ifd path id {0:?}")]
    UnknownPathId(IfdPathId),

    #[error("'{name}' is already registered under '{parent}'")]
    DuplicatePath { parent: String, name: String },

    #[error("inconsistent seed data: {0}")]
    InternalConsistency(String),
}

/// The broad category of an [Error].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The bytes (or text) handed in do not match the declared type and unit count.
    MalformedInput,
    /// The type does not support the requested operation (or the value).
    Unsupported,
    /// A tag or ifd path is not registered.
    NotFound,
    /// The registries were built from contradicting data.
    InternalConsistency,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::LengthMismatch { .. }
            | Error::TooManyUnits { .. }
            | Error::NotEnoughData(_)
            | Error::UnknownTypeCode(_)
            | Error::InvalidText { .. } => ErrorKind::MalformedInput,
            Error::Unsupported { .. } | Error::TypeMismatch { .. } => ErrorKind::Unsupported,
            Error::TagNotFound { .. }
            | Error::TagNameNotFound { .. }
            | Error::UnknownPath(_)
            | Error::UnknownPathId(_) => ErrorKind::NotFound,
            Error::DuplicatePath { .. } | Error::InternalConsistency(_) => {
                ErrorKind::InternalConsistency
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::NotEnoughData(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinguishable() {
        let not_found = Error::TagNotFound {
            path: "IFD".to_string(),
            id: 0x1234,
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.to_string(), "tag 0x1234 not found in 'IFD'");

        let unsupported = Error::Unsupported {
            tag_type: TagType::Undefined,
            operation: Operation::ParseText,
        };
        assert_eq!(unsupported.kind(), ErrorKind::Unsupported);
        assert!(!unsupported.is_not_found());

        let io_error = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(Error::from(io_error).kind(), ErrorKind::MalformedInput);
    }
}
