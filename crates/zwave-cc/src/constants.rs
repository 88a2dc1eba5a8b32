//! Protocol constants
//!
//! Command class identifiers and the command identifiers of the classes this
//! crate implements.

// ============================================================================
// Command Class Identifiers
// ============================================================================

/// Basic command class.
pub const CC_BASIC: u8 = 0x20;
/// Binary Switch command class.
pub const CC_SWITCH_BINARY: u8 = 0x25;
/// Multilevel Switch command class.
pub const CC_SWITCH_MULTILEVEL: u8 = 0x26;
/// Scene Activation command class.
pub const CC_SCENE_ACTIVATION: u8 = 0x2B;
/// Binary Sensor command class.
pub const CC_SENSOR_BINARY: u8 = 0x30;
/// Multilevel Sensor command class.
pub const CC_SENSOR_MULTILEVEL: u8 = 0x31;
/// Central Scene command class.
pub const CC_CENTRAL_SCENE: u8 = 0x5B;
/// Configuration command class.
pub const CC_CONFIGURATION: u8 = 0x70;
/// Notification command class.
pub const CC_NOTIFICATION: u8 = 0x71;
/// Manufacturer Specific command class.
pub const CC_MANUFACTURER_SPECIFIC: u8 = 0x72;
/// Battery command class.
pub const CC_BATTERY: u8 = 0x80;
/// Wake Up command class.
pub const CC_WAKE_UP: u8 = 0x84;
/// Association command class.
pub const CC_ASSOCIATION: u8 = 0x85;
/// Version command class.
pub const CC_VERSION: u8 = 0x86;

// ============================================================================
// Central Scene Command Identifiers
// ============================================================================

/// Query which scenes and key attributes a node supports.
pub const CENTRAL_SCENE_SUPPORTED_GET: u8 = 0x01;
/// Report of supported scenes and key attributes.
pub const CENTRAL_SCENE_SUPPORTED_REPORT: u8 = 0x02;
/// Unsolicited scene activation.
pub const CENTRAL_SCENE_NOTIFICATION: u8 = 0x03;
/// Set the slow refresh configuration.
pub const CENTRAL_SCENE_CONFIGURATION_SET: u8 = 0x04;
/// Query the slow refresh configuration.
pub const CENTRAL_SCENE_CONFIGURATION_GET: u8 = 0x05;
/// Report of the slow refresh configuration.
pub const CENTRAL_SCENE_CONFIGURATION_REPORT: u8 = 0x06;

// ============================================================================
// Frame Layout
// ============================================================================

/// Header size: node id, remaining length, command class id.
pub const FRAME_HEADER_SIZE: usize = 3;
/// Largest payload the one-byte length field can describe.
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize - 1;

/// Human-readable name of a command class, if known.
pub fn command_class_name(class_id: u8) -> Option<&'static str> {
    let name = match class_id {
        CC_BASIC => "Basic",
        CC_SWITCH_BINARY => "Binary Switch",
        CC_SWITCH_MULTILEVEL => "Multilevel Switch",
        CC_SCENE_ACTIVATION => "Scene Activation",
        CC_SENSOR_BINARY => "Binary Sensor",
        CC_SENSOR_MULTILEVEL => "Multilevel Sensor",
        CC_CENTRAL_SCENE => "Central Scene",
        CC_CONFIGURATION => "Configuration",
        CC_NOTIFICATION => "Notification",
        CC_MANUFACTURER_SPECIFIC => "Manufacturer Specific",
        CC_BATTERY => "Battery",
        CC_WAKE_UP => "Wake Up",
        CC_ASSOCIATION => "Association",
        CC_VERSION => "Version",
        _ => return None,
    };
    Some(name)
}
