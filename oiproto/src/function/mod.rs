//! Handlers implementing the functions of the protocol.

use crate::{
    context::ProtocolContext,
    error::ProtocolError,
    report::{Report, ReportError, ReportKind},
    transport::HidTransport,
};

pub mod info;

/// The result of a [`Handler`].
///
/// On success, the reply prepared by the handler is sent. On failure, the
/// error is sent in its place.
pub type HandlerResult = Result<(), ProtocolError>;

/// Represents the reply a handler prepares for a request.
///
/// The reply always has the kind and header of the request it answers. Only
/// its data can be written.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Reply(Report);

impl Reply {
    /// Creates a zeroed reply to a request.
    pub(crate) fn to(request: &Report) -> Self {
        Self(Report::reply_to(request))
    }

    /// Extracts the report to send.
    pub(crate) fn into_report(self) -> Report {
        self.0
    }

    /// The kind of the reply, which is the kind of the request.
    pub fn kind(&self) -> ReportKind {
        self.0.kind()
    }

    /// The data bytes of the reply.
    pub fn data(&self) -> &[u8] {
        self.0.data()
    }

    /// The data bytes of the reply, writable.
    ///
    /// The slice is exactly [`ReportKind::data_length`] bytes long.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.0.data_mut()
    }

    /// Replaces the data of the reply with `payload`, zero padding the rest.
    ///
    /// See [`Report::write_data`].
    pub fn write_data(&mut self, payload: &[u8]) -> Result<(), ReportError> {
        self.0.write_data(payload)
    }
}

/// Represents the implementation of a single function.
///
/// The dispatcher only invokes a handler for requests whose page and function
/// are supported, so handlers never check that themselves. They do have to
/// validate the request data.
pub trait Handler<T: HidTransport>: Send + Sync {
    /// Handles a request.
    ///
    /// `reply` starts out zeroed.
    fn handle(&self, ctx: &ProtocolContext<T>, request: &Report, reply: &mut Reply) -> HandlerResult;
}

impl<T, F> Handler<T> for F
where
    T: HidTransport,
    F: Fn(&ProtocolContext<T>, &Report, &mut Reply) -> HandlerResult + Send + Sync,
{
    fn handle(&self, ctx: &ProtocolContext<T>, request: &Report, reply: &mut Reply) -> HandlerResult {
        self(ctx, request, reply)
    }
}
