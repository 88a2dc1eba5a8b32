//! Frame envelope encoding/decoding.
//!
//! Every command class payload travels inside a three byte header that names
//! the target node and the command class:
//!
//! ```text
//! +---------+-----------------+----------+-------------------+
//! | node_id | payload_len + 1 | class_id | payload[0..len]   |
//! +---------+-----------------+----------+-------------------+
//! ```
//!
//! The length byte counts the class id byte plus the payload. The first
//! payload byte, when present, is the command id.

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::constants::{FRAME_HEADER_SIZE, MAX_PAYLOAD_SIZE};
use crate::error::{CcError, CcResult};

/// A command class payload addressed to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Target (or originating) node.
    pub node_id: u8,
    /// Command class identifier.
    pub class_id: u8,
    /// Command id followed by the command body.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Create a new frame.
    ///
    /// Fails with [`CcError::MalformedFrame`] when the payload is longer than
    /// [`MAX_PAYLOAD_SIZE`], since the length byte could not describe it.
    pub fn new(node_id: u8, class_id: u8, payload: Vec<u8>) -> CcResult<Self> {
        check_payload_len(payload.len())?;
        Ok(Frame {
            node_id,
            class_id,
            payload,
        })
    }

    /// The command id, if the payload is not empty.
    pub fn command_id(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Encode the frame with its header.
    pub fn encode(&self) -> Vec<u8> {
        wrap_frame(self.node_id, self.class_id, &self.payload)
    }

    /// Decode a frame from raw bytes.
    pub fn decode(data: &[u8]) -> CcResult<Self> {
        unwrap_frame(data)
    }
}

/// Reject payloads the one-byte length field cannot describe.
pub fn check_payload_len(len: usize) -> CcResult<()> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(CcError::malformed(format!(
            "payload of {} bytes exceeds the {} byte limit",
            len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

/// Wrap a payload in the frame header.
///
/// Inputs are trusted internal values; a payload longer than
/// [`MAX_PAYLOAD_SIZE`] produces a length byte that wraps. Go through
/// [`Frame::new`] when the payload size is not known to fit.
pub fn wrap_frame(node_id: u8, class_id: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    buf.put_u8(node_id);
    buf.put_u8((payload.len() + 1) as u8);
    buf.put_u8(class_id);
    buf.put_slice(payload);
    buf
}

/// Strip the frame header from raw bytes.
pub fn unwrap_frame(data: &[u8]) -> CcResult<Frame> {
    if data.len() < FRAME_HEADER_SIZE {
        return Err(CcError::malformed(format!(
            "frame too short: expected at least {} bytes, got {}",
            FRAME_HEADER_SIZE,
            data.len()
        )));
    }

    let declared = data[1] as usize;
    let remaining = data.len() - 2;
    if declared != remaining {
        return Err(CcError::malformed(format!(
            "length byte {} does not match {} remaining bytes",
            declared, remaining
        )));
    }

    Ok(Frame {
        node_id: data[0],
        class_id: data[2],
        payload: data[FRAME_HEADER_SIZE..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CC_CENTRAL_SCENE;

    #[test]
    fn test_wrap_frame_layout() {
        let encoded = wrap_frame(2, CC_CENTRAL_SCENE, &[0x04, 0x80]);
        assert_eq!(encoded, vec![2, 3, CC_CENTRAL_SCENE, 0x04, 0x80]);
    }

    #[test]
    fn test_length_byte_for_all_payload_sizes() {
        for len in 0..=MAX_PAYLOAD_SIZE {
            let payload: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let encoded = wrap_frame(7, 0x20, &payload);
            assert_eq!(encoded[1] as usize, len + 1);

            let frame = unwrap_frame(&encoded).unwrap();
            assert_eq!(frame.node_id, 7);
            assert_eq!(frame.class_id, 0x20);
            assert_eq!(frame.payload, payload);
        }
    }

    #[test]
    fn test_unwrap_too_short() {
        assert!(matches!(
            unwrap_frame(&[]),
            Err(CcError::MalformedFrame { .. })
        ));
        assert!(matches!(
            unwrap_frame(&[1, 1]),
            Err(CcError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn test_unwrap_length_mismatch() {
        // Declares two bytes after the length byte, carries three
        let err = unwrap_frame(&[1, 2, CC_CENTRAL_SCENE, 0x05, 0x00]).unwrap_err();
        assert!(err.to_string().contains("length byte 2"));

        // Declares more than is present
        assert!(unwrap_frame(&[1, 9, CC_CENTRAL_SCENE, 0x05]).is_err());
    }

    #[test]
    fn test_empty_payload_has_no_command_id() {
        let frame = unwrap_frame(&[1, 1, CC_CENTRAL_SCENE]).unwrap();
        assert!(frame.payload.is_empty());
        assert_eq!(frame.command_id(), None);
    }

    #[test]
    fn test_frame_new_rejects_oversized_payload() {
        assert!(Frame::new(1, CC_CENTRAL_SCENE, vec![0; MAX_PAYLOAD_SIZE]).is_ok());

        let err = Frame::new(1, CC_CENTRAL_SCENE, vec![0; MAX_PAYLOAD_SIZE + 1]).unwrap_err();
        assert!(matches!(err, CcError::MalformedFrame { .. }));
        assert!(err.to_string().contains("255 bytes"));
    }

    #[test]
    fn test_frame_encode_decode() {
        let frame = Frame::new(12, CC_CENTRAL_SCENE, vec![0x05]).unwrap();
        let decoded = Frame::decode(&frame.encode()).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(decoded.command_id(), Some(0x05));
    }
}
