use anyhow::Result;

mod cli;
mod device;

fn main() -> Result<()> {
    cli::execute()
}
