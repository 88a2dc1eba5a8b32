//! cc-inspect: decode and build Z-Wave command class frames.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use zwave_cc::Registry;
use zwave_cc_inspect::{
    decode_frame, encode_frame, format_hex, list_commands, render, EncodeCommand, OutputFormat,
};

#[derive(Parser)]
#[command(name = "cc-inspect")]
#[command(about = "Decode and encode Z-Wave command class frames")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a frame given as hex, e.g. "01 03 5B 06 80"
    Decode {
        /// Frame bytes: node id, length, class id, payload
        frame: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Build a frame and print it as hex
    Encode {
        /// Target node id
        node: u8,

        #[command(subcommand)]
        command: EncodeCommand,
    },
    /// List registered commands
    Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let registry = Registry::global();

    match cli.command {
        Commands::Decode { frame, format } => {
            let cc = decode_frame(registry, &frame)?;
            print!("{}", render(&cc, format)?);
            if format == OutputFormat::Json {
                println!();
            }
        }
        Commands::Encode { node, command } => {
            let frame = encode_frame(node, &command)?;
            info!("Encoded {} bytes for node {}", frame.len(), node);
            println!("{}", format_hex(&frame));
        }
        Commands::Commands => {
            for line in list_commands(registry) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
