mod descriptor;
mod dispatch;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use descriptor::DescriptorCommand;
use dispatch::DispatchCommand;
use tracing::Level;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    color: colorchoice_clap::Color,

    #[command(subcommand)]
    command: Commands,

    /// Output plain JSON without color
    #[arg(short, long, global = true)]
    json: bool,

    /// Log what the dispatcher does to stderr, repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    Dispatch(DispatchCommand),
    Descriptor(DescriptorCommand),
}

pub fn execute() -> Result<()> {
    let cli = Cli::parse();

    cli.color.write_global();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Dispatch(cmd) => cmd.execute(&cli),
        Commands::Descriptor(cmd) => cmd.execute(&cli),
    }
}
