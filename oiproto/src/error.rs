//! Structured errors reported back to the host.
//!
//! An error occupies the data of an error report: the [`ErrorId`] first,
//! followed by the arguments of the specific error.

use std::fmt::{self, Debug, Display};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

use crate::report::{LONG_DATA_LENGTH, ReportError};

/// The maximum length of a [`ProtocolError::Custom`] description.
///
/// A long report carries 29 data bytes, one of which is taken by the error ID.
pub const CUSTOM_DESCRIPTION_LENGTH: usize = LONG_DATA_LENGTH - 1;

/// Represents the ID identifying the kind of a [`ProtocolError`] on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ErrorId {
    /// See [`ProtocolError::InvalidValue`].
    InvalidValue = 0x01,

    /// See [`ProtocolError::UnsupportedFunction`].
    UnsupportedFunction = 0x02,

    /// See [`ProtocolError::Custom`].
    Custom = 0xfe,
}

/// Represents an error reported to the host in place of a regular reply.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Error)]
pub enum ProtocolError {
    /// A value included in the request data is invalid.
    #[error("invalid value at data position {position}")]
    InvalidValue {
        /// The data position of the offending byte.
        position: u8,
    },

    /// The addressed function page or function is not supported.
    #[error("unsupported function")]
    UnsupportedFunction,

    /// Any other failure, described by free text.
    #[error("{0}")]
    Custom(Description),
}

impl ProtocolError {
    /// Creates a [`Self::Custom`] error, truncating `description` to
    /// [`CUSTOM_DESCRIPTION_LENGTH`] bytes.
    pub fn custom(description: &str) -> Self {
        Self::Custom(Description::new(description.as_bytes()))
    }

    /// The wire ID of the error.
    pub fn id(&self) -> ErrorId {
        match self {
            Self::InvalidValue { .. } => ErrorId::InvalidValue,
            Self::UnsupportedFunction => ErrorId::UnsupportedFunction,
            Self::Custom(_) => ErrorId::Custom,
        }
    }

    /// Writes the error into report data.
    ///
    /// Anything not fitting into `buf` is cut off, which only ever shortens a
    /// custom description.
    ///
    /// Returns the amount of written bytes.
    pub fn write_payload(&self, buf: &mut [u8]) -> usize {
        let mut payload = [0u8; LONG_DATA_LENGTH];
        payload[0] = self.id().into();

        let len = match self {
            Self::InvalidValue { position } => {
                payload[1] = *position;
                2
            },
            Self::UnsupportedFunction => 1,
            Self::Custom(description) => {
                let bytes = description.as_bytes();
                payload[1..=bytes.len()].copy_from_slice(bytes);
                1 + bytes.len()
            },
        };

        let len = len.min(buf.len());
        buf[..len].copy_from_slice(&payload[..len]);
        len
    }

    /// Tries to read an error from the data of an error report.
    pub fn from_payload(data: &[u8]) -> Result<Self, DecodeError> {
        let Some((&id, args)) = data.split_first() else {
            return Err(DecodeError::Empty);
        };

        match ErrorId::try_from(id).map_err(|err| DecodeError::UnknownId(err.number))? {
            ErrorId::InvalidValue => args
                .first()
                .map(|&position| Self::InvalidValue { position })
                .ok_or(DecodeError::MissingArgument),
            ErrorId::UnsupportedFunction => Ok(Self::UnsupportedFunction),
            ErrorId::Custom => {
                let end = args.iter().position(|&b| b == 0).unwrap_or(args.len());
                Ok(Self::Custom(Description::new(&args[..end])))
            },
        }
    }
}

impl From<ReportError> for ProtocolError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::PayloadTooLong { .. } => Self::custom("reply too long"),
        }
    }
}

/// Represents the description of a [`ProtocolError::Custom`] error.
///
/// The description is raw bytes of at most [`CUSTOM_DESCRIPTION_LENGTH`]
/// bytes. Longer input is truncated on construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Description {
    bytes: [u8; CUSTOM_DESCRIPTION_LENGTH],
    len: u8,
}

impl Description {
    /// Creates a description from raw bytes, keeping the first
    /// [`CUSTOM_DESCRIPTION_LENGTH`] of them.
    pub fn new(raw: &[u8]) -> Self {
        let len = raw.len().min(CUSTOM_DESCRIPTION_LENGTH);
        let mut bytes = [0u8; CUSTOM_DESCRIPTION_LENGTH];
        bytes[..len].copy_from_slice(&raw[..len]);

        Self {
            bytes,
            len: len as u8,
        }
    }

    /// The bytes of the description.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl Debug for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// Represents an error that occurred while reading a [`ProtocolError`] from
/// report data.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Error)]
pub enum DecodeError {
    /// The data is empty.
    #[error("the error payload is empty")]
    Empty,

    /// The error ID is not known.
    #[error("unknown error ID {0:#04x}")]
    UnknownId(u8),

    /// The error requires an argument the data does not contain.
    #[error("the error payload is missing an argument")]
    MissingArgument,
}
