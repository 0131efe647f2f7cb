use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::Args;
use itertools::Itertools;
use oiproto::{error::ProtocolError, page::FunctionPage, report::Report};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

use super::Cli;
use crate::device;

/// Dispatch raw reports to a simulated device and print its responses.
#[derive(Args)]
pub struct DispatchCommand {
    /// Load the device configuration from a JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inbound reports as hex, e.g. `2000000000000000`
    #[arg(required = true)]
    reports: Vec<String>,
}

/// A single request and the response of the device.
#[derive(Serialize)]
struct Exchange {
    request: String,
    response: Option<String>,
    error: Option<String>,
}

impl DispatchCommand {
    pub fn execute(&self, root: &Cli) -> Result<()> {
        let mut stdout = BufWriter::new(anstream::stdout());

        let config = match &self.config {
            Some(path) => device::load_config(path)?,
            None => device::default_config(),
        };
        let (ctx, dispatcher) = device::build(config)?;

        let mut exchanges = Vec::new();
        for raw in &self.reports {
            let request = parse_hex(raw).with_context(|| format!("invalid report `{raw}`"))?;

            // The capturing transport never fails.
            let Ok(response) = dispatcher.dispatch(&ctx, &request);
            let sent = ctx.transport().take();

            exchanges.push(Exchange {
                request: hex(&request),
                response: sent.first().map(|raw| hex(raw)),
                error: response
                    .and_then(|report| decode_error(&report))
                    .map(|err| err.to_string()),
            });
        }

        if root.json {
            writeln!(stdout, "{}", json!(exchanges))?;
            return Ok(());
        }

        for (i, exchange) in exchanges.into_iter().enumerate() {
            if i != 0 {
                writeln!(stdout)?;
            }

            writeln!(stdout, "{} {}", "→".bright_blue(), exchange.request)?;
            match (exchange.response, exchange.error) {
                (None, _) => writeln!(
                    stdout,
                    "{} {}",
                    "←".bright_blue(),
                    "dropped".bright_black().italic()
                )?,
                (Some(response), None) => {
                    writeln!(stdout, "{} {}", "←".bright_blue(), response.green())?
                },
                (Some(response), Some(error)) => writeln!(
                    stdout,
                    "{} {} ({})",
                    "←".bright_blue(),
                    response.red(),
                    error.bright_black()
                )?,
            }
        }

        Ok(())
    }
}

/// Decodes the error carried by an error report.
fn decode_error(report: &Report) -> Option<ProtocolError> {
    if report.header().function_page != u8::from(FunctionPage::Error) {
        return None;
    }

    ProtocolError::from_payload(report.data()).ok()
}

/// Parses hex digits, ignoring whitespace, `:` and `-` separators.
fn parse_hex(raw: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .collect();
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }

    digits
        .chunks(2)
        .map(|pair| {
            let pair: String = pair.iter().collect();
            u8::from_str_radix(&pair, 16).with_context(|| format!("`{pair}` is not a hex byte"))
        })
        .collect()
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).join(" ")
}
