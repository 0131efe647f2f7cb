//! The HID report descriptor announcing the protocol reports to the host.

use hidreport::{Field, Report as _, ReportDescriptor, Usage, UsageId, UsagePage};
use thiserror::Error;

use crate::report::{LONG_REPORT_ID, SHORT_REPORT_ID};

/// The vendor-defined usage page both reports live on.
pub const USAGE_PAGE: u16 = 0xff00;

/// The usage of the short report.
pub const SHORT_REPORT_USAGE: u16 = SHORT_REPORT_ID as u16;

/// The usage of the long report.
pub const LONG_REPORT_USAGE: u16 = LONG_REPORT_ID as u16;

/// A report descriptor declaring the short and long reports as both input and
/// output reports of a vendor-defined application collection.
#[rustfmt::skip]
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x06, 0x00, 0xff,       // Usage Page (Vendor Defined 0xFF00)
    0x09, 0x00,             // Usage (0x00)
    0xa1, 0x01,             // Collection (Application)
    0x15, 0x00,             //     Logical Minimum (0)
    0x26, 0xff, 0x00,       //     Logical Maximum (255)
    0x75, 0x08,             //     Report Size (8)

    0x85, SHORT_REPORT_ID,  //     Report ID (0x20)
    0x95, 0x07,             //     Report Count (7)
    0x09, 0x20,             //     Usage (0x20)
    0x81, 0x00,             //     Input (Data, Array, Absolute)
    0x09, 0x20,             //     Usage (0x20)
    0x91, 0x00,             //     Output (Data, Array, Absolute)

    0x85, LONG_REPORT_ID,   //     Report ID (0x21)
    0x95, 0x1f,             //     Report Count (31)
    0x09, 0x21,             //     Usage (0x21)
    0x81, 0x00,             //     Input (Data, Array, Absolute)
    0x09, 0x21,             //     Usage (0x21)
    0x91, 0x00,             //     Output (Data, Array, Absolute)
    0xc0,                   // End Collection
];

/// Checks which of the protocol reports a report descriptor declares.
///
/// Returns `(declares_short, declares_long)`.
pub fn declared_report_kinds(descriptor: &[u8]) -> Result<(bool, bool), DescriptorError> {
    let descriptor = ReportDescriptor::try_from(descriptor)?;

    let declares = |id: u8, usage: u16| {
        descriptor
            .find_input_report(&[id])
            .and_then(|report| report.fields().first())
            .and_then(|field| match field {
                Field::Array(arr) => Some(arr.usage_range()),
                _ => None,
            })
            .is_some_and(|range| {
                range
                    .lookup_usage(&Usage::from_page_and_id(
                        UsagePage::from(USAGE_PAGE),
                        UsageId::from(usage),
                    ))
                    .is_some()
            })
    };

    Ok((
        declares(SHORT_REPORT_ID, SHORT_REPORT_USAGE),
        declares(LONG_REPORT_ID, LONG_REPORT_USAGE),
    ))
}

/// Represents an error that occurred while inspecting a report descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The report descriptor could not be parsed.
    #[error("the report descriptor could not be parsed")]
    Parse(#[from] hidreport::ParserError),
}
