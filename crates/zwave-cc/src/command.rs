//! Typed commands and the decode result shared by all command classes.

use serde::{Deserialize, Serialize};

use crate::central_scene::CentralSceneCommand;
use crate::constants::command_class_name;
use crate::error::{CcError, CcResult};

/// A single command of a command class with a fixed wire layout.
///
/// Implementors describe only the body that follows the command id; the
/// provided methods add and check the id and the minimum length.
pub trait CcCommand: Sized {
    /// Command class this command belongs to.
    const COMMAND_CLASS: u8;
    /// Command id, unique within the command class.
    const COMMAND_ID: u8;
    /// Name used in errors and logs.
    const NAME: &'static str;
    /// Minimum number of body bytes after the command id.
    const MIN_LEN: usize;

    /// Append the body (everything after the command id).
    fn encode_body(&self, buf: &mut Vec<u8>);

    /// Parse the body. `body` holds at least [`Self::MIN_LEN`] bytes.
    fn decode_body(body: &[u8]) -> CcResult<Self>;

    /// Encode the payload: command id followed by the body.
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + Self::MIN_LEN);
        buf.push(Self::COMMAND_ID);
        self.encode_body(&mut buf);
        buf
    }

    /// Parse a payload starting with the command id.
    fn decode(payload: &[u8]) -> CcResult<Self> {
        let expected = 1 + Self::MIN_LEN;
        let Some((&command_id, body)) = payload.split_first() else {
            return Err(CcError::truncated(Self::NAME, expected, 0));
        };
        if command_id != Self::COMMAND_ID {
            return Err(CcError::CommandMismatch {
                expected: Self::COMMAND_ID,
                actual: command_id,
            });
        }
        if body.len() < Self::MIN_LEN {
            return Err(CcError::truncated(Self::NAME, expected, payload.len()));
        }
        Self::decode_body(body)
    }
}

/// A typed command of any implemented command class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", content = "command")]
pub enum Command {
    /// Central Scene command class.
    CentralScene(CentralSceneCommand),
}

impl Command {
    /// Command class id.
    pub fn class_id(&self) -> u8 {
        match self {
            Command::CentralScene(_) => crate::constants::CC_CENTRAL_SCENE,
        }
    }

    /// Command id within the class.
    pub fn command_id(&self) -> u8 {
        match self {
            Command::CentralScene(cmd) => cmd.command_id(),
        }
    }

    /// Command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CentralScene(cmd) => cmd.name(),
        }
    }

    /// Encode the payload (command id and body).
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::CentralScene(cmd) => cmd.encode(),
        }
    }

    /// Command id of the report a node answers this command with.
    pub fn expected_response(&self) -> Option<u8> {
        match self {
            Command::CentralScene(cmd) => cmd.expected_response(),
        }
    }

    /// Whether this command answers `request`.
    pub fn is_response_to(&self, request: &Command) -> bool {
        self.class_id() == request.class_id()
            && request.expected_response() == Some(self.command_id())
    }
}

impl From<CentralSceneCommand> for Command {
    fn from(cmd: CentralSceneCommand) -> Self {
        Command::CentralScene(cmd)
    }
}

/// A payload no registered parser owns.
///
/// Carries the class id and the raw payload, command id included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspecifiedCommand {
    /// Command class id.
    pub class_id: u8,
    /// Raw payload.
    pub payload: Vec<u8>,
}

impl UnspecifiedCommand {
    /// Command id, if the payload is not empty.
    pub fn command_id(&self) -> Option<u8> {
        self.payload.first().copied()
    }
}

/// Result of decoding a command class payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Decoded {
    /// A registered command parsed into typed fields.
    Command(Command),
    /// Unknown class or command id.
    Unspecified(UnspecifiedCommand),
}

impl Decoded {
    /// The typed command, if one was parsed.
    pub fn command(&self) -> Option<&Command> {
        match self {
            Decoded::Command(cmd) => Some(cmd),
            Decoded::Unspecified(_) => None,
        }
    }

    /// Whether this is the unspecified fallback.
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Decoded::Unspecified(_))
    }

    /// Command class id.
    pub fn class_id(&self) -> u8 {
        match self {
            Decoded::Command(cmd) => cmd.class_id(),
            Decoded::Unspecified(raw) => raw.class_id,
        }
    }

    /// Payload bytes, command id included.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Decoded::Command(cmd) => cmd.encode(),
            Decoded::Unspecified(raw) => raw.payload.clone(),
        }
    }

    /// Display name: the command name, or the class name for the fallback.
    pub fn name(&self) -> &'static str {
        match self {
            Decoded::Command(cmd) => cmd.name(),
            Decoded::Unspecified(raw) => command_class_name(raw.class_id).unwrap_or("Unknown"),
        }
    }
}
