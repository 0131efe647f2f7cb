use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::Args;
use itertools::Itertools;
use oiproto::descriptor::{REPORT_DESCRIPTOR, declared_report_kinds};
use owo_colors::OwoColorize;
use serde_json::json;

use super::Cli;

/// Print the HID report descriptor of the device.
#[derive(Args)]
pub struct DescriptorCommand {}

impl DescriptorCommand {
    pub fn execute(&self, root: &Cli) -> Result<()> {
        let mut stdout = BufWriter::new(anstream::stdout());

        let (short, long) = declared_report_kinds(REPORT_DESCRIPTOR)
            .context("could not inspect the report descriptor")?;

        if root.json {
            writeln!(
                stdout,
                "{}",
                json!({
                    "descriptor": hex(REPORT_DESCRIPTOR),
                    "short": short,
                    "long": long,
                })
            )?;
            return Ok(());
        }

        for line in REPORT_DESCRIPTOR.chunks(16) {
            writeln!(stdout, "{}", hex(line).bright_black())?;
        }
        writeln!(stdout)?;
        writeln!(stdout, "short report (0x20): {}", declared(short))?;
        writeln!(stdout, "long report (0x21):  {}", declared(long))?;

        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).join(" ")
}

fn declared(yes: bool) -> String {
    if yes {
        "declared".green().to_string()
    } else {
        "missing".red().to_string()
    }
}
