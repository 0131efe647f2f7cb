//! The device side of a small request/response protocol carried in HID
//! reports.
//!
//! The host addresses a *function* on a *function page* using a fixed-size
//! report. The device checks whether it supports that function, invokes its
//! handler and answers with exactly one report of the same size: either the
//! reply of the handler or a structured error.
//!
//! # Wire format
//!
//! | Offset | Size        | Meaning                                          |
//! |--------|-------------|--------------------------------------------------|
//! | 0      | 1           | Report ID: `0x20` short (8 bytes), `0x21` long (32 bytes) |
//! | 1      | 1           | Function page                                    |
//! | 2      | 1           | Function                                         |
//! | 3      | 5 or 29     | Data                                             |
//!
//! Error reports are addressed to the [`page::FunctionPage::Error`] page and
//! carry the encoded [`error::ProtocolError`] as data.
//!
//! # Quickstart
//!
//! The HID transport itself is not part of this crate. Implement
//! [`transport::HidTransport`] for whatever writes reports to the host, then
//! build a context and a dispatcher once at startup:
//!
//! ```
//! use std::convert::Infallible;
//!
//! use oiproto::{
//!     capability::CapabilityTable,
//!     context::{FirmwareInfo, ProtocolContext},
//!     dispatch::Dispatcher,
//!     page::{FunctionPage, InfoFunction},
//!     transport::HidTransport,
//! };
//!
//! struct Endpoint;
//!
//! impl HidTransport for Endpoint {
//!     type Error = Infallible;
//!
//!     fn send_report(&self, report: &[u8]) -> Result<(), Infallible> {
//!         // Queue `report` on the interrupt IN endpoint.
//!         Ok(())
//!     }
//! }
//!
//! let capabilities = CapabilityTable::new()
//!     .with_page(FunctionPage::Info, InfoFunction::ALL.map(u8::from))
//!     .expect("the info page is supported by every build");
//! let ctx = ProtocolContext::new(
//!     "Example Mouse",
//!     FirmwareInfo {
//!         vendor: "example".into(),
//!         version: "1.0.0".into(),
//!     },
//!     capabilities,
//!     Endpoint,
//! );
//! let dispatcher = Dispatcher::builder()
//!     .with_info_page()
//!     .build(ctx.capabilities())
//!     .expect("every supported function has a handler");
//!
//! // For every report received from the host:
//! let response = dispatcher
//!     .dispatch(&ctx, &[0x20, 0x00, 0x00, 0, 0, 0, 0, 0])
//!     .unwrap()
//!     .expect("the request is well-formed");
//! assert_eq!(response.data(), &[0, 0, 1, 0, 0]);
//! ```

pub mod capability;
pub mod context;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod function;
pub mod page;
pub mod report;
pub mod transport;
