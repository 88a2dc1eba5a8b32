//! Node-addressed command class instances.
//!
//! [`CommandClass`] is what the transport hands in and gets back: a node id,
//! a class id, and either a typed command or the unspecified fallback. Decoding
//! never fails on unknown classes or command ids; only a malformed frame or a
//! truncated payload of a known command is an error.

use serde::{Deserialize, Serialize};

use crate::command::{Command, Decoded};
use crate::constants::command_class_name;
use crate::error::CcResult;
use crate::frame::{unwrap_frame, Frame};
use crate::registry::Registry;

/// A command class payload addressed to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandClass {
    /// Target (or originating) node.
    pub node_id: u8,
    /// Command class id.
    pub class_id: u8,
    /// Typed command or unspecified fallback.
    pub body: Decoded,
}

impl CommandClass {
    /// Address a typed command to a node.
    pub fn new(node_id: u8, command: impl Into<Command>) -> Self {
        let command = command.into();
        CommandClass {
            node_id,
            class_id: command.class_id(),
            body: Decoded::Command(command),
        }
    }

    /// Decode a raw frame using the default registry.
    pub fn decode(data: &[u8]) -> CcResult<Self> {
        Self::decode_with(Registry::global(), data)
    }

    /// Decode a raw frame using `registry`.
    pub fn decode_with(registry: &Registry, data: &[u8]) -> CcResult<Self> {
        let frame = unwrap_frame(data)?;
        Self::from_frame_with(registry, &frame)
    }

    /// Decode an already unwrapped frame using `registry`.
    pub fn from_frame_with(registry: &Registry, frame: &Frame) -> CcResult<Self> {
        let body = registry.decode(frame.class_id, &frame.payload)?;
        Ok(CommandClass {
            node_id: frame.node_id,
            class_id: frame.class_id,
            body,
        })
    }

    /// Encode into a raw frame.
    ///
    /// Fails with [`crate::CcError::MalformedFrame`] when the encoded payload
    /// does not fit the one-byte length field.
    pub fn serialize(&self) -> CcResult<Vec<u8>> {
        Ok(self.to_frame()?.encode())
    }

    /// Convert into a frame without the header bytes.
    pub fn to_frame(&self) -> CcResult<Frame> {
        Frame::new(self.node_id, self.class_id, self.body.encode())
    }

    /// The typed command, if the payload was understood.
    pub fn command(&self) -> Option<&Command> {
        self.body.command()
    }

    /// Whether the payload could not be interpreted.
    pub fn is_unspecified(&self) -> bool {
        self.body.is_unspecified()
    }

    /// Name of the command class.
    pub fn class_name(&self) -> Option<&'static str> {
        command_class_name(self.class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::central_scene::{
        CentralSceneCommand, ConfigurationGet, ConfigurationSet, KeyAttributeTable,
        SupportedReport,
    };
    use crate::constants::*;
    use crate::error::CcError;
    use crate::frame::wrap_frame;

    #[test]
    fn test_serialize_configuration_get() {
        let cc = CommandClass::new(1, CentralSceneCommand::from(ConfigurationGet));
        assert_eq!(
            cc.serialize().unwrap(),
            vec![1, 2, CC_CENTRAL_SCENE, CENTRAL_SCENE_CONFIGURATION_GET]
        );
    }

    #[test]
    fn test_decode_roundtrip() {
        let cc = CommandClass::new(
            9,
            CentralSceneCommand::from(ConfigurationSet { slow_refresh: true }),
        );
        let decoded = CommandClass::decode(&cc.serialize().unwrap()).unwrap();
        assert_eq!(decoded, cc);
        assert_eq!(decoded.class_name(), Some("Central Scene"));
    }

    #[test]
    fn test_unknown_class_is_unspecified() {
        let data = wrap_frame(3, CC_BATTERY, &[0x03, 0x64]);
        let cc = CommandClass::decode(&data).unwrap();

        assert!(cc.is_unspecified());
        assert_eq!(cc.node_id, 3);
        assert_eq!(cc.class_id, CC_BATTERY);
        assert_eq!(cc.serialize().unwrap(), data);
    }

    #[test]
    fn test_malformed_frame_is_error() {
        assert!(CommandClass::decode(&[1, 5, CC_CENTRAL_SCENE]).is_err());
    }

    #[test]
    fn test_custom_registry() {
        let frame =
            Frame::new(1, CC_CENTRAL_SCENE, vec![CENTRAL_SCENE_CONFIGURATION_GET]).unwrap();
        let cc = CommandClass::from_frame_with(&Registry::new(), &frame).unwrap();
        assert!(cc.is_unspecified());
        assert_eq!(cc.to_frame().unwrap(), frame);
    }

    #[test]
    fn test_oversized_payload_is_error() {
        // 100 scenes of 3 mask bytes each do not fit one frame
        let mut table = KeyAttributeTable::new();
        table.insert(1, vec![17]);
        let report = SupportedReport::new(100, false, table).unwrap();
        assert_eq!(report.mask_bytes, 3);

        let cc = CommandClass::new(1, CentralSceneCommand::from(report));
        assert!(matches!(
            cc.serialize(),
            Err(CcError::MalformedFrame { .. })
        ));
        assert!(matches!(
            cc.to_frame(),
            Err(CcError::MalformedFrame { .. })
        ));
    }
}
