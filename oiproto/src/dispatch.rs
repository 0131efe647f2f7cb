//! Routes inbound reports to their handlers.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::{
    capability::{self, CapabilityTable},
    context::{ConfigError, ProtocolContext},
    error::ProtocolError,
    function::{Handler, Reply, info},
    page::FunctionPage,
    report::Report,
    transport::{self, HidTransport},
};

/// Maps supported functions to their handlers and dispatches inbound reports.
///
/// Created once at startup by [`DispatcherBuilder::build`], which guarantees
/// every function of the capability table has a handler.
pub struct Dispatcher<T: HidTransport> {
    handlers: HashMap<(u8, u8), Box<dyn Handler<T>>>,
}

impl<T: HidTransport> Dispatcher<T> {
    /// Starts building a dispatcher without any handler.
    pub fn builder() -> DispatcherBuilder<T> {
        DispatcherBuilder {
            handlers: HashMap::new(),
        }
    }

    /// Dispatches a single raw inbound report and sends the response through
    /// the transport of `ctx`.
    ///
    /// Malformed buffers are dropped without a response, as the kind of the
    /// response cannot be determined. Every other buffer is answered by exactly
    /// one report: the reply of the handler, or an error report.
    ///
    /// Returns the sent report, or [`None`] if the buffer was dropped. Only
    /// errors of the transport are returned as such.
    pub fn dispatch(&self, ctx: &ProtocolContext<T>, buffer: &[u8]) -> Result<Option<Report>, T::Error> {
        let request = match Report::read_raw(buffer) {
            Ok(request) => request,
            Err(err) => {
                debug!(%err, "dropping malformed report");
                return Ok(None);
            },
        };

        let header = request.header();
        trace!(
            kind = ?request.kind(),
            page = header.function_page,
            function = header.function,
            "dispatching report"
        );

        let response = match self.respond(ctx, &request) {
            Ok(reply) => {
                transport::send_report(ctx, &reply)?;
                reply
            },
            Err(err) => transport::send_error(ctx, request.kind(), &err)?,
        };

        Ok(Some(response))
    }

    fn respond(&self, ctx: &ProtocolContext<T>, request: &Report) -> Result<Report, ProtocolError> {
        let header = request.header();
        if !capability::is_supported(ctx, header.function_page, header.function) {
            return Err(ProtocolError::UnsupportedFunction);
        }

        let Some(handler) = self.handlers.get(&(header.function_page, header.function)) else {
            // Only possible if the context was not the one the dispatcher was built for.
            warn!(
                page = header.function_page,
                function = header.function,
                "supported function has no handler"
            );
            return Err(ProtocolError::UnsupportedFunction);
        };

        let mut reply = Reply::to(request);
        handler.handle(ctx, request, &mut reply)?;
        Ok(reply.into_report())
    }
}

/// Collects handlers for a [`Dispatcher`].
pub struct DispatcherBuilder<T: HidTransport> {
    handlers: HashMap<(u8, u8), Box<dyn Handler<T>>>,
}

impl<T: HidTransport> DispatcherBuilder<T> {
    /// Registers the handler of a function, replacing any previous one.
    pub fn register(
        mut self,
        page: FunctionPage,
        function: u8,
        handler: impl Handler<T> + 'static,
    ) -> Self {
        self.handlers.insert((page.into(), function), Box::new(handler));
        self
    }

    /// Registers the handlers of all info page functions.
    pub fn with_info_page(self) -> Self
    where
        T: 'static,
    {
        info::register(self)
    }

    /// Finishes the dispatcher.
    ///
    /// Returns [`ConfigError::MissingHandler`] for the first function of
    /// `capabilities` without a handler. Handlers of unsupported functions are
    /// kept, but never invoked.
    pub fn build(self, capabilities: &CapabilityTable) -> Result<Dispatcher<T>, ConfigError> {
        if let Some((page, function)) = capabilities
            .iter()
            .find(|pair| !self.handlers.contains_key(pair))
        {
            return Err(ConfigError::MissingHandler {
                page,
                function,
            });
        }

        Ok(Dispatcher {
            handlers: self.handlers,
        })
    }
}

impl<T: HidTransport> Default for DispatcherBuilder<T> {
    fn default() -> Self {
        Dispatcher::builder()
    }
}
