//! Implements sending reports and error reports to the host.

use std::error::Error;

use tracing::{debug, error};

use crate::{
    context::ProtocolContext,
    error::ProtocolError,
    page::FunctionPage,
    report::{Report, ReportHeader, ReportKind},
};

/// Represents the HID transport outbound reports are written to.
///
/// Any type this trait is implemented for can be used by the dispatcher. How
/// the report reaches the host (USB interrupt endpoint, Bluetooth, ...) is up
/// to the implementation.
///
/// The dispatcher calls [`Self::send_report`] at most once per inbound report
/// and never concurrently by itself. If reports are dispatched from several
/// contexts (e.g. a main loop and an interrupt handler), the implementation has
/// to serialize the sends.
pub trait HidTransport {
    /// An implementation-specific error type.
    type Error: Error;

    /// Writes a raw report, including its report ID, to the host.
    fn send_report(&self, report: &[u8]) -> Result<(), Self::Error>;
}

impl<T: HidTransport + ?Sized> HidTransport for &T {
    type Error = T::Error;

    fn send_report(&self, report: &[u8]) -> Result<(), Self::Error> {
        (**self).send_report(report)
    }
}

/// Sends a report through the transport of `ctx`.
pub fn send_report<T: HidTransport>(ctx: &ProtocolContext<T>, report: &Report) -> Result<(), T::Error> {
    let (raw, len) = report.to_raw();
    ctx.transport().send_report(&raw[..len]).inspect_err(|err| {
        error!(%err, header = ?report.header(), "could not send report");
    })
}

/// Builds the error report answering a request of the given kind.
///
/// The report is addressed to [`FunctionPage::Error`] with the error ID as
/// function, and its data starts with the encoded error.
pub fn error_report(request_kind: ReportKind, err: &ProtocolError) -> Report {
    let mut report = Report::zeroed(request_kind, ReportHeader {
        function_page: FunctionPage::Error.into(),
        function: err.id().into(),
    });
    err.write_payload(report.data_mut());
    report
}

/// Sends an error report answering a request of the given kind through the
/// transport of `ctx`.
///
/// Returns the sent report.
pub fn send_error<T: HidTransport>(
    ctx: &ProtocolContext<T>,
    request_kind: ReportKind,
    err: &ProtocolError,
) -> Result<Report, T::Error> {
    debug!(%err, ?request_kind, "reporting error");

    let report = error_report(request_kind, err);
    send_report(ctx, &report)?;
    Ok(report)
}
