//! Builds the simulated device that reports are dispatched to.

use std::{convert::Infallible, fs, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use oiproto::{
    context::{FirmwareInfo, PageConfig, ProtocolConfig, ProtocolContext},
    dispatch::Dispatcher,
    function::{HandlerResult, Reply},
    page::{FunctionPage, InfoFunction},
    report::Report,
    transport::HidTransport,
};

/// A transport capturing outbound reports instead of writing them to a host.
#[derive(Debug, Default)]
pub struct Capture(Mutex<Vec<Vec<u8>>>);

impl Capture {
    /// Removes and returns all reports captured so far.
    pub fn take(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl HidTransport for Capture {
    type Error = Infallible;

    fn send_report(&self, report: &[u8]) -> Result<(), Infallible> {
        self.0.lock().unwrap().push(report.to_vec());
        Ok(())
    }
}

/// The debug function `0x00` of the simulated device, replying with the
/// request data.
fn echo(_: &ProtocolContext<Capture>, request: &Report, reply: &mut Reply) -> HandlerResult {
    reply.write_data(request.data())?;
    Ok(())
}

/// The configuration used when no configuration file is given.
pub fn default_config() -> ProtocolConfig {
    ProtocolConfig {
        device_name: "oisim reference device".into(),
        firmware: FirmwareInfo {
            vendor: "oisim".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        },
        pages: vec![
            PageConfig {
                page: FunctionPage::Info.into(),
                functions: InfoFunction::ALL.map(u8::from).to_vec(),
            },
            PageConfig {
                page: FunctionPage::Gimmicks.into(),
                functions: vec![],
            },
            PageConfig {
                page: FunctionPage::Debug.into(),
                functions: vec![0x00],
            },
        ],
    }
}

/// Reads a device configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<ProtocolConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid device configuration in {}", path.display()))
}

/// Builds the context and dispatcher of the simulated device.
pub fn build(config: ProtocolConfig) -> Result<(ProtocolContext<Capture>, Dispatcher<Capture>)> {
    let ctx = config
        .into_context(Capture::default())
        .context("invalid device configuration")?;

    let dispatcher = Dispatcher::builder()
        .with_info_page()
        .register(FunctionPage::Debug, 0x00, echo)
        .build(ctx.capabilities())
        .context("the device configuration advertises functions the simulator cannot handle")?;

    Ok((ctx, dispatcher))
}
