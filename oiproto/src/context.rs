//! Implements the immutable context every report is dispatched in.

use std::collections::HashSet;

use thiserror::Error;

use crate::{capability::CapabilityTable, page::FunctionPage, transport::HidTransport};

/// Represents metadata about the firmware reported via the info page.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct FirmwareInfo {
    /// The vendor of the firmware.
    pub vendor: String,

    /// The version of the firmware, in no particular format.
    pub version: String,
}

/// Represents everything a dispatched report may depend on.
///
/// The context is created once at startup and passed by reference into every
/// dispatch. It is never mutated afterwards.
#[derive(Debug)]
pub struct ProtocolContext<T: HidTransport> {
    device_name: String,
    firmware: FirmwareInfo,
    capabilities: CapabilityTable,
    transport: T,
}

impl<T: HidTransport> ProtocolContext<T> {
    /// Creates a new context.
    pub fn new(
        device_name: impl Into<String>,
        firmware: FirmwareInfo,
        capabilities: CapabilityTable,
        transport: T,
    ) -> Self {
        Self {
            device_name: device_name.into(),
            firmware,
            capabilities,
            transport,
        }
    }

    /// The display name of the device.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// The firmware metadata of the device.
    pub fn firmware(&self) -> &FirmwareInfo {
        &self.firmware
    }

    /// The functions the device supports.
    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// The transport outbound reports are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Represents the build configuration a [`ProtocolContext`] is created from.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ProtocolConfig {
    /// The display name of the device.
    pub device_name: String,

    /// The firmware metadata of the device.
    pub firmware: FirmwareInfo,

    /// The supported functions, per page.
    pub pages: Vec<PageConfig>,
}

/// Represents the supported functions of a single page.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct PageConfig {
    /// The raw page ID.
    pub page: u8,

    /// The IDs of the supported functions.
    pub functions: Vec<u8>,
}

impl ProtocolConfig {
    /// Builds the capability table described by the configuration.
    pub fn capabilities(&self) -> Result<CapabilityTable, ConfigError> {
        let mut seen = HashSet::new();
        let mut table = CapabilityTable::new();

        for page_config in &self.pages {
            let page = FunctionPage::try_from(page_config.page)
                .map_err(|err| ConfigError::UnknownPage(err.number))?;
            if !seen.insert(page) {
                return Err(ConfigError::DuplicatePage(page));
            }

            table = table.with_page(page, page_config.functions.iter().copied())?;
        }

        Ok(table)
    }

    /// Validates the configuration and turns it into a context sending
    /// through `transport`.
    pub fn into_context<T: HidTransport>(self, transport: T) -> Result<ProtocolContext<T>, ConfigError> {
        let capabilities = self.capabilities()?;
        Ok(ProtocolContext::new(
            self.device_name,
            self.firmware,
            capabilities,
            transport,
        ))
    }
}

/// Represents an error in the build configuration of a device.
///
/// These are detected once at startup, never while dispatching.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Error)]
pub enum ConfigError {
    /// The page ID is not defined by the protocol.
    #[error("unknown function page {0:#04x}")]
    UnknownPage(u8),

    /// The page is defined by the protocol, but not supported by this build.
    #[error("function page {0:?} is not supported by this build")]
    UndeclaredPage(FunctionPage),

    /// The page is configured more than once.
    #[error("function page {0:?} is configured more than once")]
    DuplicatePage(FunctionPage),

    /// A supported function has no handler.
    #[error("no handler for function {function:#04x} on page {page:#04x}")]
    MissingHandler {
        /// The raw page ID.
        page: u8,

        /// The function ID.
        function: u8,
    },
}
