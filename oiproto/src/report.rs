//! Implements the fixed-size reports every request and response travels in.
//!
//! Every report starts with a 3 byte header: the report ID marking the report
//! kind, the function page and the function. The remaining bytes are data.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// The report ID of a short report.
pub const SHORT_REPORT_ID: u8 = 0x20;

/// The total size of a short report, including its report ID.
pub const SHORT_REPORT_LENGTH: usize = 8;

/// The report ID of a long report.
pub const LONG_REPORT_ID: u8 = 0x21;

/// The total size of a long report, including its report ID.
pub const LONG_REPORT_LENGTH: usize = 32;

/// The index of the first data byte in a raw report.
pub const DATA_INDEX: usize = 3;

/// The amount of data bytes a short report carries.
pub const SHORT_DATA_LENGTH: usize = SHORT_REPORT_LENGTH - DATA_INDEX;

/// The amount of data bytes a long report carries.
pub const LONG_DATA_LENGTH: usize = LONG_REPORT_LENGTH - DATA_INDEX;

/// Represents the kind of a report, which determines its size on the wire.
///
/// The numeric value is the report ID sent as the first byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ReportKind {
    /// A report of [`SHORT_REPORT_LENGTH`] bytes.
    Short = 0x20,

    /// A report of [`LONG_REPORT_LENGTH`] bytes.
    Long = 0x21,
}

impl ReportKind {
    /// The total size of a report of this kind.
    pub const fn length(self) -> usize {
        match self {
            Self::Short => SHORT_REPORT_LENGTH,
            Self::Long => LONG_REPORT_LENGTH,
        }
    }

    /// The amount of data bytes a report of this kind carries.
    pub const fn data_length(self) -> usize {
        self.length() - DATA_INDEX
    }
}

/// Represents the header following the report ID of every report.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReportHeader {
    /// The function page the report addresses.
    pub function_page: u8,

    /// The function within [`Self::function_page`].
    pub function: u8,
}

/// Represents a report consisting of a header and data.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Report {
    /// Represents a short report that has 5 bytes of data.
    Short(ReportHeader, [u8; SHORT_DATA_LENGTH]),

    /// Represents a long report that has 29 bytes of data.
    Long(ReportHeader, [u8; LONG_DATA_LENGTH]),
}

impl Report {
    /// Creates a report of the given kind, zero padding the data after
    /// `payload`.
    ///
    /// Returns [`ReportError::PayloadTooLong`] if `payload` does not fit the
    /// data of a report of that kind.
    pub fn new(kind: ReportKind, header: ReportHeader, payload: &[u8]) -> Result<Self, ReportError> {
        let mut report = Self::zeroed(kind, header);
        report.write_data(payload)?;
        Ok(report)
    }

    /// Creates a report of the given kind with all data bytes set to zero.
    pub fn zeroed(kind: ReportKind, header: ReportHeader) -> Self {
        match kind {
            ReportKind::Short => Self::Short(header, [0; SHORT_DATA_LENGTH]),
            ReportKind::Long => Self::Long(header, [0; LONG_DATA_LENGTH]),
        }
    }

    /// Creates an empty reply to a request, keeping its kind and header.
    pub fn reply_to(request: &Report) -> Self {
        Self::zeroed(request.kind(), request.header())
    }

    /// Tries to read a report from raw data.
    ///
    /// The length of `data` has to match the kind announced by its first byte
    /// exactly.
    pub fn read_raw(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() < DATA_INDEX {
            return Err(FrameError::TooShort(data.len()));
        }

        let kind =
            ReportKind::try_from(data[0]).map_err(|err| FrameError::UnknownReportId(err.number))?;
        if data.len() != kind.length() {
            return Err(FrameError::LengthMismatch {
                kind,
                length: data.len(),
            });
        }

        let header = ReportHeader {
            function_page: data[1],
            function: data[2],
        };

        let mut report = Self::zeroed(kind, header);
        report.data_mut().copy_from_slice(&data[DATA_INDEX..]);
        Ok(report)
    }

    /// Writes the report in its raw byte form into a buffer.
    ///
    /// `buf` has to be at least [`ReportKind::length`] bytes long; a buffer of
    /// [`LONG_REPORT_LENGTH`] bytes fits every report.
    ///
    /// Returns the amount of written bytes.
    pub fn write_raw(&self, buf: &mut [u8]) -> usize {
        let len = self.kind().length();
        let header = self.header();

        buf[0] = self.kind().into();
        buf[1] = header.function_page;
        buf[2] = header.function;
        buf[DATA_INDEX..len].copy_from_slice(self.data());

        len
    }

    /// Returns the raw bytes of the report in a buffer fitting any report
    /// along with the amount of bytes in use.
    pub fn to_raw(&self) -> ([u8; LONG_REPORT_LENGTH], usize) {
        let mut buf = [0u8; LONG_REPORT_LENGTH];
        let len = self.write_raw(&mut buf);
        (buf, len)
    }

    /// Extracts the kind of the report.
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Short(..) => ReportKind::Short,
            Self::Long(..) => ReportKind::Long,
        }
    }

    /// Extracts the header of the report.
    pub fn header(&self) -> ReportHeader {
        match *self {
            Self::Short(header, _) => header,
            Self::Long(header, _) => header,
        }
    }

    /// The data bytes of the report.
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Short(_, data) => data,
            Self::Long(_, data) => data,
        }
    }

    /// The data bytes of the report, writable.
    ///
    /// The slice is exactly [`ReportKind::data_length`] bytes long.
    pub fn data_mut(&mut self) -> &mut [u8] {
        match self {
            Self::Short(_, data) => data,
            Self::Long(_, data) => data,
        }
    }

    /// Replaces the data of the report with `payload`, zero padding the rest.
    ///
    /// The report is left untouched if `payload` is too long.
    pub fn write_data(&mut self, payload: &[u8]) -> Result<(), ReportError> {
        let kind = self.kind();
        let data = self.data_mut();
        if payload.len() > data.len() {
            return Err(ReportError::PayloadTooLong {
                kind,
                length: payload.len(),
            });
        }

        data[..payload.len()].copy_from_slice(payload);
        data[payload.len()..].fill(0);
        Ok(())
    }
}

/// Represents the reasons an inbound buffer is not a valid report.
///
/// No response can be sent for any of these, as the kind of the response
/// depends on the kind of the request.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Error)]
pub enum FrameError {
    /// The buffer is shorter than the report header.
    #[error("the buffer of {0} bytes is shorter than a report header")]
    TooShort(usize),

    /// The first byte is neither [`SHORT_REPORT_ID`] nor [`LONG_REPORT_ID`].
    #[error("unknown report ID {0:#04x}")]
    UnknownReportId(u8),

    /// The buffer length does not match the kind announced by the report ID.
    #[error("a {kind:?} report has to be {} bytes long, got {length}", .kind.length())]
    LengthMismatch {
        /// The kind announced by the report ID.
        kind: ReportKind,

        /// The length of the buffer.
        length: usize,
    },
}

/// Represents an error that occurred while building a report.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Error)]
pub enum ReportError {
    /// The payload does not fit into the data of the report.
    #[error("a payload of {length} bytes does not fit a {kind:?} report ({} data bytes)", .kind.data_length())]
    PayloadTooLong {
        /// The kind of the report the payload was written to.
        kind: ReportKind,

        /// The length of the rejected payload.
        length: usize,
    },
}
