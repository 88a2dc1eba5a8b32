//! Error types for zwave-cc.

use thiserror::Error;

/// Structural errors raised while decoding frames and command payloads.
///
/// Unknown command ids are not represented here: they decode to
/// [`crate::Decoded::Unspecified`] instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CcError {
    /// The outer frame header is missing or its length byte is wrong.
    #[error("Malformed frame: {reason}")]
    MalformedFrame {
        /// Description of the mismatch.
        reason: String,
    },

    /// A command payload is shorter than the command's fixed minimum.
    ///
    /// Lengths count the whole payload, command id included.
    #[error("Truncated {command} payload: expected at least {expected} bytes, got {actual}")]
    TruncatedPayload {
        /// Name of the command being decoded.
        command: &'static str,
        /// Minimum payload length.
        expected: usize,
        /// Payload length actually present.
        actual: usize,
    },

    /// A bit table declares more entries than the payload can hold.
    #[error(
        "Inconsistent table length: {entries} entries of {bits_per_entry} bits need more than {available_bits} bits"
    )]
    InconsistentTableLength {
        /// Declared number of entries.
        entries: usize,
        /// Width of each entry in bits.
        bits_per_entry: usize,
        /// Bits actually available.
        available_bits: usize,
    },

    /// A field value cannot be represented on the wire.
    #[error("{field} out of range: {value} is not within {min}..={max}")]
    FieldOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// A command parser was handed a payload for a different command id.
    #[error("Command mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    CommandMismatch {
        /// Command id the parser owns.
        expected: u8,
        /// Command id found in the payload.
        actual: u8,
    },
}

impl CcError {
    /// Create a malformed frame error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        CcError::MalformedFrame {
            reason: reason.into(),
        }
    }

    /// Create a truncated payload error.
    pub fn truncated(command: &'static str, expected: usize, actual: usize) -> Self {
        CcError::TruncatedPayload {
            command,
            expected,
            actual,
        }
    }
}

/// Result alias for command class operations.
pub type CcResult<T> = Result<T, CcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CcError::malformed("length byte 5 does not match 3 remaining bytes");
        assert!(err.to_string().contains("length byte 5"));

        let err = CcError::truncated("Notification", 3, 1);
        assert!(err.to_string().contains("Notification"));
        assert!(err.to_string().contains("at least 3 bytes, got 1"));

        let err = CcError::CommandMismatch {
            expected: 0x04,
            actual: 0xFF,
        };
        assert_eq!(err.to_string(), "Command mismatch: expected 0x04, got 0xFF");

        let err = CcError::FieldOutOfRange {
            field: "key attribute code",
            value: 30,
            min: 1,
            max: 24,
        };
        assert_eq!(
            err.to_string(),
            "key attribute code out of range: 30 is not within 1..=24"
        );
    }
}
