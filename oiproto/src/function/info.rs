//! Implements the info page (`0x00`), which every device supports.
//!
//! The info page lets the host find out which protocol version the device
//! speaks and which functions it supports before using any other page.

use super::{HandlerResult, Reply};
use crate::{
    context::ProtocolContext,
    dispatch::DispatcherBuilder,
    error::ProtocolError,
    page::{FunctionPage, FwInfoField, InfoFunction, SUPPORTED_PAGES},
    report::Report,
    transport::HidTransport,
};

/// The major version of the protocol.
pub const PROTOCOL_VERSION_MAJOR: u8 = 0;

/// The minor version of the protocol.
pub const PROTOCOL_VERSION_MINOR: u8 = 0;

/// The patch version of the protocol.
pub const PROTOCOL_VERSION_PATCH: u8 = 1;

/// Registers the handlers of all [`InfoFunction`]s.
pub fn register<T: HidTransport + 'static>(builder: DispatcherBuilder<T>) -> DispatcherBuilder<T> {
    builder
        .register(FunctionPage::Info, InfoFunction::Version.into(), version::<T>)
        .register(FunctionPage::Info, InfoFunction::FwInfo.into(), fw_info::<T>)
        .register(
            FunctionPage::Info,
            InfoFunction::SupportedFunctionPages.into(),
            supported_function_pages::<T>,
        )
        .register(
            FunctionPage::Info,
            InfoFunction::SupportedFunctions.into(),
            supported_functions::<T>,
        )
}

/// Replies with the protocol version as `[major, minor, patch]`.
pub fn version<T: HidTransport>(
    _: &ProtocolContext<T>,
    _: &Report,
    reply: &mut Reply,
) -> HandlerResult {
    reply.write_data(&[
        PROTOCOL_VERSION_MAJOR,
        PROTOCOL_VERSION_MINOR,
        PROTOCOL_VERSION_PATCH,
    ])?;
    Ok(())
}

/// Replies with the [`FwInfoField`] selected by the first data byte.
///
/// Text is cut off at the end of the reply and zero padded.
pub fn fw_info<T: HidTransport>(
    ctx: &ProtocolContext<T>,
    request: &Report,
    reply: &mut Reply,
) -> HandlerResult {
    let field = FwInfoField::try_from(request.data()[0])
        .map_err(|_| ProtocolError::InvalidValue { position: 0 })?;

    let text = match field {
        FwInfoField::Vendor => ctx.firmware().vendor.as_str(),
        FwInfoField::Version => ctx.firmware().version.as_str(),
        FwInfoField::DeviceName => ctx.device_name(),
    };

    let data = reply.data_mut();
    let len = text.len().min(data.len());
    data[..len].copy_from_slice(&text.as_bytes()[..len]);
    Ok(())
}

/// Replies with the IDs of all function pages supported by this build.
pub fn supported_function_pages<T: HidTransport>(
    _: &ProtocolContext<T>,
    _: &Report,
    reply: &mut Reply,
) -> HandlerResult {
    reply.write_data(&SUPPORTED_PAGES.map(u8::from))?;
    Ok(())
}

/// Replies with the functions supported on the page given by the first data
/// byte, starting at the index given by the second data byte.
///
/// The reply is `[count, remaining, functions...]`: `count` functions in
/// ascending order follow, `remaining` more can be requested by advancing the
/// start index.
pub fn supported_functions<T: HidTransport>(
    ctx: &ProtocolContext<T>,
    request: &Report,
    reply: &mut Reply,
) -> HandlerResult {
    let data = request.data();
    let functions = ctx
        .capabilities()
        .functions(data[0])
        .ok_or(ProtocolError::InvalidValue { position: 0 })?;

    let start = data[1] as usize;
    let total = functions.len();
    if start > total {
        return Err(ProtocolError::InvalidValue { position: 1 });
    }

    let out = reply.data_mut();
    let mut count = 0;
    for (slot, function) in out[2..].iter_mut().zip(functions.iter().skip(start)) {
        *slot = function;
        count += 1;
    }

    out[0] = count as u8;
    out[1] = (total - start - count) as u8;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::{
        capability::CapabilityTable,
        context::FirmwareInfo,
        report::{ReportHeader, ReportKind},
    };

    struct Discard;

    impl HidTransport for Discard {
        type Error = Infallible;

        fn send_report(&self, _: &[u8]) -> Result<(), Infallible> {
            Ok(())
        }
    }

    fn context() -> ProtocolContext<Discard> {
        let capabilities = CapabilityTable::new()
            .with_page(FunctionPage::Info, InfoFunction::ALL.map(u8::from))
            .unwrap()
            .with_page(FunctionPage::Debug, 0x10u8..0x20)
            .unwrap();

        ProtocolContext::new(
            "Keyboard with an unreasonably long display name",
            FirmwareInfo {
                vendor: "acme".into(),
                version: "0.3.0".into(),
            },
            capabilities,
            Discard,
        )
    }

    fn call(
        handler: fn(&ProtocolContext<Discard>, &Report, &mut Reply) -> HandlerResult,
        kind: ReportKind,
        function: InfoFunction,
        args: &[u8],
    ) -> Result<Report, ProtocolError> {
        let request = Report::new(
            kind,
            ReportHeader {
                function_page: 0x00,
                function: function.into(),
            },
            args,
        )
        .unwrap();

        let mut reply = Reply::to(&request);
        handler(&context(), &request, &mut reply)?;
        Ok(reply.into_report())
    }

    #[test]
    fn replies_version() {
        let reply = call(version, ReportKind::Short, InfoFunction::Version, &[]).unwrap();
        assert_eq!(reply.data(), &[0, 0, 1, 0, 0]);
    }

    #[test]
    fn replies_fw_info_fields() {
        let reply = call(fw_info, ReportKind::Long, InfoFunction::FwInfo, &[0x00]).unwrap();
        assert_eq!(&reply.data()[..5], b"acme\0");

        let reply = call(fw_info, ReportKind::Short, InfoFunction::FwInfo, &[0x01]).unwrap();
        assert_eq!(reply.data(), b"0.3.0");

        let reply = call(fw_info, ReportKind::Long, InfoFunction::FwInfo, &[0x02]).unwrap();
        assert_eq!(reply.data(), b"Keyboard with an unreasonably");

        assert_eq!(
            call(fw_info, ReportKind::Short, InfoFunction::FwInfo, &[0x03]),
            Err(ProtocolError::InvalidValue { position: 0 })
        );
    }

    #[test]
    fn replies_supported_pages() {
        let reply = call(
            supported_function_pages,
            ReportKind::Short,
            InfoFunction::SupportedFunctionPages,
            &[],
        )
        .unwrap();

        assert_eq!(reply.data(), &[0x00, 0xfd, 0xfe, 0x00, 0x00]);
    }

    #[test]
    fn paginates_supported_functions() {
        let reply = call(
            supported_functions,
            ReportKind::Short,
            InfoFunction::SupportedFunctions,
            &[0xfe, 0x00],
        )
        .unwrap();
        assert_eq!(reply.data(), &[3, 13, 0x10, 0x11, 0x12]);

        let reply = call(
            supported_functions,
            ReportKind::Short,
            InfoFunction::SupportedFunctions,
            &[0xfe, 15],
        )
        .unwrap();
        assert_eq!(reply.data(), &[1, 0, 0x1f, 0, 0]);

        let reply = call(
            supported_functions,
            ReportKind::Long,
            InfoFunction::SupportedFunctions,
            &[0x00, 0x00],
        )
        .unwrap();
        assert_eq!(&reply.data()[..7], &[4, 0, 0x00, 0x01, 0x02, 0x03, 0x00]);

        let reply = call(
            supported_functions,
            ReportKind::Short,
            InfoFunction::SupportedFunctions,
            &[0xfd, 0x00],
        )
        .unwrap();
        assert_eq!(reply.data(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn rejects_bad_supported_functions_arguments() {
        assert_eq!(
            call(
                supported_functions,
                ReportKind::Short,
                InfoFunction::SupportedFunctions,
                &[0x01, 0x00],
            ),
            Err(ProtocolError::InvalidValue { position: 0 })
        );
        assert_eq!(
            call(
                supported_functions,
                ReportKind::Short,
                InfoFunction::SupportedFunctions,
                &[0xfe, 17],
            ),
            Err(ProtocolError::InvalidValue { position: 1 })
        );
    }
}
