#![allow(dead_code)]

use std::{
    convert::Infallible,
    io,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use oiproto::{
    capability::CapabilityTable,
    context::{FirmwareInfo, ProtocolContext},
    dispatch::Dispatcher,
    function::{HandlerResult, Reply},
    page::{FunctionPage, InfoFunction},
    report::Report,
    transport::HidTransport,
};

/// A transport recording every sent report.
#[derive(Default)]
pub struct Recorder(Mutex<Vec<Vec<u8>>>);

impl Recorder {
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().clone()
    }
}

impl HidTransport for Recorder {
    type Error = Infallible;

    fn send_report(&self, report: &[u8]) -> Result<(), Infallible> {
        self.0.lock().unwrap().push(report.to_vec());
        Ok(())
    }
}

/// A transport whose endpoint is gone, counting every attempted send.
#[derive(Default)]
pub struct Unplugged(AtomicUsize);

impl Unplugged {
    pub fn attempts(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl HidTransport for Unplugged {
    type Error = io::Error;

    fn send_report(&self, _: &[u8]) -> io::Result<()> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "endpoint is gone"))
    }
}

/// A gimmick replying with its first argument incremented, refusing `0xff`.
pub fn increment<T: HidTransport>(
    _: &ProtocolContext<T>,
    request: &Report,
    reply: &mut Reply,
) -> HandlerResult {
    let value = request.data()[0];
    if value == 0xff {
        return Err(oiproto::error::ProtocolError::InvalidValue { position: 0 });
    }

    reply.write_data(&[value + 1])?;
    Ok(())
}

/// A debug function that always fails with a custom error.
pub fn fail<T: HidTransport>(_: &ProtocolContext<T>, _: &Report, _: &mut Reply) -> HandlerResult {
    Err(oiproto::error::ProtocolError::custom("flash write failed at sector 12"))
}

/// A device supporting the info page, one gimmick and one debug function.
pub fn device() -> (ProtocolContext<Recorder>, Dispatcher<Recorder>) {
    device_with(Recorder::default())
}

/// Like [`device`], sending through the given transport.
pub fn device_with<T: HidTransport + 'static>(
    transport: T,
) -> (ProtocolContext<T>, Dispatcher<T>) {
    let capabilities = CapabilityTable::new()
        .with_page(FunctionPage::Info, InfoFunction::ALL.map(u8::from))
        .unwrap()
        .with_page(FunctionPage::Gimmicks, [0x00])
        .unwrap()
        .with_page(FunctionPage::Debug, [0x00])
        .unwrap();

    let ctx = ProtocolContext::new(
        "Test Keyboard",
        FirmwareInfo {
            vendor: "acme".into(),
            version: "2.1.0".into(),
        },
        capabilities,
        transport,
    );

    let dispatcher = Dispatcher::builder()
        .with_info_page()
        .register(FunctionPage::Gimmicks, 0x00, increment::<T>)
        .register(FunctionPage::Debug, 0x00, fail::<T>)
        .build(ctx.capabilities())
        .unwrap();

    (ctx, dispatcher)
}

/// Builds a raw short report.
pub fn short(page: u8, function: u8, data: [u8; 5]) -> Vec<u8> {
    let mut raw = vec![0x20, page, function];
    raw.extend_from_slice(&data);
    raw
}

/// Builds a raw long report with the given leading data bytes.
pub fn long(page: u8, function: u8, data: &[u8]) -> Vec<u8> {
    let mut raw = vec![0u8; 32];
    raw[0] = 0x21;
    raw[1] = page;
    raw[2] = function;
    raw[3..3 + data.len()].copy_from_slice(data);
    raw
}
