//! Decode, encode, and list Z-Wave command class frames from the command line.
//!
//! The binary in `main.rs` only parses arguments and sets up logging; the
//! work happens here so it can be tested without spawning a process.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use tracing::{debug, warn};

use zwave_cc::central_scene::{
    CentralSceneCommand, ConfigurationGet, ConfigurationSet, SupportedGet,
};
use zwave_cc::{Command, CommandClass, Decoded, Registry};

/// How decoded frames are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary.
    #[default]
    Text,
    /// Pretty-printed JSON of the decoded frame.
    Json,
}

/// Commands the tool can build.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum EncodeCommand {
    /// Central Scene SupportedGet
    SupportedGet,
    /// Central Scene ConfigurationGet
    ConfigurationGet,
    /// Central Scene ConfigurationSet
    ConfigurationSet {
        /// Enable slow refresh for held-down keys
        #[arg(long)]
        slow_refresh: bool,
    },
}

impl EncodeCommand {
    /// The typed command this subcommand stands for.
    pub fn to_command(&self) -> Command {
        let cmd: CentralSceneCommand = match self {
            EncodeCommand::SupportedGet => SupportedGet.into(),
            EncodeCommand::ConfigurationGet => ConfigurationGet.into(),
            EncodeCommand::ConfigurationSet { slow_refresh } => ConfigurationSet {
                slow_refresh: *slow_refresh,
            }
            .into(),
        };
        cmd.into()
    }
}

/// Parse a hex string into bytes.
///
/// Accepts an optional `0x` prefix and ignores whitespace, `:` and `-`
/// separators, so `"01 02 5B 01"`, `"01:02:5b:01"` and `"0x01025B01"` all
/// parse to the same frame.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .collect();

    if digits.is_empty() {
        bail!("no frame bytes given");
    }

    hex::decode(&digits).with_context(|| format!("invalid hex frame {:?}", input))
}

/// Format bytes as space separated upper-case hex.
pub fn format_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode_upper(bytes);
    let pairs: Vec<&str> = (0..encoded.len())
        .step_by(2)
        .map(|i| &encoded[i..i + 2])
        .collect();
    pairs.join(" ")
}

/// Decode one frame given as hex.
pub fn decode_frame(registry: &Registry, input: &str) -> Result<CommandClass> {
    let data = parse_hex(input)?;
    debug!(len = data.len(), "decoding frame");

    let cc = CommandClass::decode_with(registry, &data)
        .with_context(|| format!("failed to decode frame {}", format_hex(&data)))?;

    if let Decoded::Unspecified(unspecified) = &cc.body {
        warn!(
            class_id = unspecified.class_id,
            command_id = ?unspecified.command_id(),
            "no parser registered, payload left unspecified"
        );
    }

    Ok(cc)
}

/// Render a decoded frame.
pub fn render(cc: &CommandClass, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(cc)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(cc).context("failed to serialize decoded frame")
        }
    }
}

/// Human readable summary of a decoded frame.
pub fn render_text(cc: &CommandClass) -> String {
    let class_name = cc.class_name().unwrap_or("Unknown");
    let mut out = format!(
        "node {} {} (0x{:02X}) {}\n",
        cc.node_id,
        class_name,
        cc.class_id,
        cc.body.name()
    );

    match &cc.body {
        Decoded::Command(Command::CentralScene(cmd)) => render_central_scene(&mut out, cmd),
        Decoded::Unspecified(unspecified) => {
            let _ = writeln!(out, "  payload: {}", format_hex(&unspecified.payload));
        }
    }

    out
}

fn render_central_scene(out: &mut String, cmd: &CentralSceneCommand) {
    match cmd {
        CentralSceneCommand::SupportedGet(_) | CentralSceneCommand::ConfigurationGet(_) => {}
        CentralSceneCommand::SupportedReport(report) => {
            let _ = writeln!(out, "  scenes: {}", report.scene_count);
            let _ = writeln!(out, "  slow refresh: {}", report.supports_slow_refresh);
            let _ = writeln!(out, "  identical: {}", report.identical_key_support);
            for (scene, codes) in &report.supported_key_attributes {
                let _ = writeln!(out, "  scene {}: {:?}", scene, codes);
            }
        }
        CentralSceneCommand::Notification(notification) => {
            let _ = writeln!(out, "  sequence: {}", notification.sequence_number);
            let _ = writeln!(
                out,
                "  scene {}: {}",
                notification.scene_number, notification.key_attribute
            );
            let _ = writeln!(out, "  slow refresh: {}", notification.is_slow_refresh());
        }
        CentralSceneCommand::ConfigurationSet(set) => {
            let _ = writeln!(out, "  slow refresh: {}", set.slow_refresh);
        }
        CentralSceneCommand::ConfigurationReport(report) => {
            let _ = writeln!(out, "  slow refresh: {}", report.slow_refresh);
        }
    }
}

/// Build the frame for `command` addressed to `node_id`.
pub fn encode_frame(node_id: u8, command: &EncodeCommand) -> Result<Vec<u8>> {
    let cc = CommandClass::new(node_id, command.to_command());
    debug!(node_id, command = cc.body.name(), "encoding frame");
    cc.serialize().with_context(|| format!("failed to encode {}", cc.body.name()))
}

/// One line per registered command: `0x5B 0x01 Central Scene SupportedGet`.
pub fn list_commands(registry: &Registry) -> Vec<String> {
    registry
        .commands()
        .map(|(class_id, command_id, name)| {
            let class_name = zwave_cc::command_class_name(class_id).unwrap_or("Unknown");
            format!(
                "0x{:02X} 0x{:02X} {} {}",
                class_id, command_id, class_name, name
            )
        })
        .collect()
}
