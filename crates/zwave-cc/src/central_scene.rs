//! Central Scene command class (0x5B).
//!
//! Nodes with buttons or other scene controllers report key presses through
//! this class. The controller can discover which scenes and key attributes a
//! node supports and toggle the slow refresh mode for held-down keys.
//!
//! ## Command Layout
//!
//! | Command             | Id   | Body                                          |
//! |---------------------|------|-----------------------------------------------|
//! | SupportedGet        | 0x01 | (none)                                        |
//! | SupportedReport     | 0x02 | scene_count(1) + control(1) + bit masks       |
//! | Notification        | 0x03 | sequence(1) + control(1) + scene(1)           |
//! | ConfigurationSet    | 0x04 | control(1)                                    |
//! | ConfigurationGet    | 0x05 | (none)                                        |
//! | ConfigurationReport | 0x06 | control(1)                                    |
//!
//! SupportedReport control octet: bit 7 slow refresh support, bits 2-1 number
//! of bit mask bytes per scene, bit 0 identical key attributes for all scenes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::bitfield::{
    decode_indexed_bit_table, encode_indexed_bit_table, get_bit, get_bits, pack_flags, set_bits,
    BitTable,
};
use crate::command::{CcCommand, Command};
use crate::constants::*;
use crate::error::{CcError, CcResult};
use crate::registry::Registry;

/// Scene number (1-based) to the ascending key attribute codes it supports.
pub type KeyAttributeTable = BTreeMap<u8, Vec<u8>>;

/// Bit position of the slow refresh flag in every control octet.
const SLOW_REFRESH_BIT: u8 = 7;
/// Bit position of the identical-support flag in the supported report.
const IDENTICAL_BIT: u8 = 0;
/// Shift and width of the bit mask byte count in the supported report.
const MASK_BYTES_SHIFT: u8 = 1;
const MASK_BYTES_WIDTH: u8 = 2;
/// Largest bit mask byte count the two-bit field can carry.
pub const MAX_MASK_BYTES: u8 = 3;
/// Key attribute codes in the supported report count from 1.
const KEY_CODE_ORIGIN: usize = 1;
/// Highest key attribute code three mask bytes can carry.
const MAX_KEY_CODE: usize = MAX_MASK_BYTES as usize * 8 + KEY_CODE_ORIGIN - 1;
/// Width of the key attribute field in a notification.
const KEY_ATTRIBUTE_WIDTH: u8 = 7;

// ============================================================================
// Key Attributes
// ============================================================================

/// How a scene's control was actuated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAttribute {
    /// Pressed once.
    KeyPressed,
    /// Released after being held.
    KeyReleased,
    /// Held down; repeats while held.
    KeyHeldDown,
    /// Pressed twice.
    KeyPressed2x,
    /// Pressed three times.
    KeyPressed3x,
    /// Pressed four times.
    KeyPressed4x,
    /// Pressed five times.
    KeyPressed5x,
    /// A code this crate does not know. Decoding only produces 7..=0x7F.
    Unknown(u8),
}

impl From<u8> for KeyAttribute {
    fn from(code: u8) -> Self {
        match code {
            0 => KeyAttribute::KeyPressed,
            1 => KeyAttribute::KeyReleased,
            2 => KeyAttribute::KeyHeldDown,
            3 => KeyAttribute::KeyPressed2x,
            4 => KeyAttribute::KeyPressed3x,
            5 => KeyAttribute::KeyPressed4x,
            6 => KeyAttribute::KeyPressed5x,
            _ => KeyAttribute::Unknown(code),
        }
    }
}

impl From<KeyAttribute> for u8 {
    fn from(key: KeyAttribute) -> Self {
        match key {
            KeyAttribute::KeyPressed => 0,
            KeyAttribute::KeyReleased => 1,
            KeyAttribute::KeyHeldDown => 2,
            KeyAttribute::KeyPressed2x => 3,
            KeyAttribute::KeyPressed3x => 4,
            KeyAttribute::KeyPressed4x => 5,
            KeyAttribute::KeyPressed5x => 6,
            KeyAttribute::Unknown(code) => code,
        }
    }
}

impl fmt::Display for KeyAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAttribute::KeyPressed => write!(f, "key pressed"),
            KeyAttribute::KeyReleased => write!(f, "key released"),
            KeyAttribute::KeyHeldDown => write!(f, "key held down"),
            KeyAttribute::KeyPressed2x => write!(f, "key pressed 2 times"),
            KeyAttribute::KeyPressed3x => write!(f, "key pressed 3 times"),
            KeyAttribute::KeyPressed4x => write!(f, "key pressed 4 times"),
            KeyAttribute::KeyPressed5x => write!(f, "key pressed 5 times"),
            KeyAttribute::Unknown(code) => write!(f, "unknown key attribute (0x{:02X})", code),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Query supported scenes and key attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupportedGet;

impl CcCommand for SupportedGet {
    const COMMAND_CLASS: u8 = CC_CENTRAL_SCENE;
    const COMMAND_ID: u8 = CENTRAL_SCENE_SUPPORTED_GET;
    const NAME: &'static str = "SupportedGet";
    const MIN_LEN: usize = 0;

    fn encode_body(&self, _buf: &mut Vec<u8>) {}

    fn decode_body(_body: &[u8]) -> CcResult<Self> {
        Ok(SupportedGet)
    }
}

/// Supported scenes and the key attributes of each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedReport {
    /// Number of scenes the node exposes.
    pub scene_count: u8,
    /// Whether the node supports slow refresh of held-down keys.
    pub supports_slow_refresh: bool,
    /// Whether a single bit mask applies to every scene.
    pub identical_key_support: bool,
    /// Bit mask bytes per scene (0-3).
    pub mask_bytes: u8,
    /// Supported key attribute codes per scene, one entry for every scene.
    ///
    /// When `identical_key_support` is set the wire carries a single mask;
    /// decoding copies it to every scene `1..=scene_count` rather than
    /// keeping it under scene 1 only.
    pub supported_key_attributes: KeyAttributeTable,
}

impl SupportedReport {
    /// Build a report with individual key attributes per scene.
    ///
    /// Scenes missing from `table` support no key attributes; codes are
    /// sorted and deduplicated. The identical flag is set when every scene
    /// supports the same codes. Scene numbers outside `1..=scene_count` and
    /// key codes outside `1..=24` cannot be encoded and fail with
    /// [`CcError::FieldOutOfRange`].
    pub fn new(
        scene_count: u8,
        supports_slow_refresh: bool,
        table: KeyAttributeTable,
    ) -> CcResult<Self> {
        for (&scene, codes) in &table {
            if scene == 0 || scene > scene_count {
                return Err(CcError::FieldOutOfRange {
                    field: "scene number",
                    value: scene as usize,
                    min: 1,
                    max: scene_count as usize,
                });
            }
            let invalid = codes
                .iter()
                .find(|&&code| !(KEY_CODE_ORIGIN..=MAX_KEY_CODE).contains(&(code as usize)));
            if let Some(&code) = invalid {
                return Err(CcError::FieldOutOfRange {
                    field: "key attribute code",
                    value: code as usize,
                    min: KEY_CODE_ORIGIN,
                    max: MAX_KEY_CODE,
                });
            }
        }

        let supported_key_attributes: KeyAttributeTable = (1..=scene_count)
            .map(|scene| {
                let mut codes = table.get(&scene).cloned().unwrap_or_default();
                codes.sort_unstable();
                codes.dedup();
                (scene, codes)
            })
            .collect();
        let mut distinct = supported_key_attributes.values();
        let first = distinct.next();
        let identical_key_support = first.is_some() && distinct.all(|codes| Some(codes) == first);

        Ok(SupportedReport {
            scene_count,
            supports_slow_refresh,
            identical_key_support,
            mask_bytes: mask_bytes_for(&supported_key_attributes),
            supported_key_attributes,
        })
    }

    /// Key attribute codes supported by `scene`.
    pub fn key_attributes(&self, scene: u8) -> Option<&[u8]> {
        self.supported_key_attributes
            .get(&scene)
            .map(|codes| codes.as_slice())
    }

    fn control(&self) -> u8 {
        let flags = pack_flags(&[
            (SLOW_REFRESH_BIT, self.supports_slow_refresh),
            (IDENTICAL_BIT, self.identical_key_support),
        ]);
        set_bits(flags, MASK_BYTES_SHIFT, MASK_BYTES_WIDTH, self.mask_bytes)
    }

    fn mask_count(scene_count: u8, identical: bool) -> usize {
        if identical {
            scene_count.min(1) as usize
        } else {
            scene_count as usize
        }
    }
}

/// Smallest bit mask byte count that holds every code in `table`.
fn mask_bytes_for(table: &KeyAttributeTable) -> u8 {
    let highest = table.values().flatten().copied().max().unwrap_or(0) as usize;
    let bits = highest.saturating_sub(KEY_CODE_ORIGIN) + 1;
    (bits.div_ceil(8) as u8).clamp(1, MAX_MASK_BYTES)
}

impl CcCommand for SupportedReport {
    const COMMAND_CLASS: u8 = CC_CENTRAL_SCENE;
    const COMMAND_ID: u8 = CENTRAL_SCENE_SUPPORTED_REPORT;
    const NAME: &'static str = "SupportedReport";
    const MIN_LEN: usize = 2;

    fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.push(self.scene_count);
        buf.push(self.control());

        let masks = Self::mask_count(self.scene_count, self.identical_key_support);
        let table: BitTable = self
            .supported_key_attributes
            .iter()
            .map(|(&scene, codes)| {
                (
                    scene as usize,
                    codes.iter().map(|&code| code as usize).collect(),
                )
            })
            .collect();
        buf.extend_from_slice(&encode_indexed_bit_table(
            &table,
            masks,
            self.mask_bytes as usize * 8,
            KEY_CODE_ORIGIN,
        ));
    }

    fn decode_body(body: &[u8]) -> CcResult<Self> {
        let scene_count = body[0];
        let control = body[1];
        let supports_slow_refresh = get_bit(control, SLOW_REFRESH_BIT);
        let identical_key_support = get_bit(control, IDENTICAL_BIT);
        let mask_bytes = get_bits(control, MASK_BYTES_SHIFT, MASK_BYTES_WIDTH);

        let masks = Self::mask_count(scene_count, identical_key_support);
        let table = decode_indexed_bit_table(
            &body[2..],
            masks,
            mask_bytes as usize * 8,
            KEY_CODE_ORIGIN,
        )?;

        let codes_of = |entry: usize| -> Vec<u8> {
            table
                .get(&entry)
                .map(|bits| bits.iter().map(|&bit| bit as u8).collect())
                .unwrap_or_default()
        };
        let supported_key_attributes: KeyAttributeTable = (1..=scene_count)
            .map(|scene| {
                let entry = if identical_key_support { 1 } else { scene as usize };
                (scene, codes_of(entry))
            })
            .collect();

        trace!(
            scene_count,
            mask_bytes,
            identical_key_support,
            "decoded central scene supported report"
        );

        Ok(SupportedReport {
            scene_count,
            supports_slow_refresh,
            identical_key_support,
            mask_bytes,
            supported_key_attributes,
        })
    }
}

/// A scene was activated on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Sequence number used to drop duplicates.
    pub sequence_number: u8,
    /// How the control was actuated.
    ///
    /// Only the low 7 bits go on the wire. An `Unknown` code above 0x7F loses
    /// its top bit, and an `Unknown` holding a known code (such as
    /// `Unknown(2)`) decodes back as the named attribute.
    pub key_attribute: KeyAttribute,
    /// Raw slow refresh bit. See [`Notification::is_slow_refresh`].
    pub slow_refresh: bool,
    /// Scene that was activated.
    pub scene_number: u8,
}

impl Notification {
    /// Slow refresh mode, which only applies to held-down keys.
    pub fn is_slow_refresh(&self) -> bool {
        self.key_attribute == KeyAttribute::KeyHeldDown && self.slow_refresh
    }
}

impl CcCommand for Notification {
    const COMMAND_CLASS: u8 = CC_CENTRAL_SCENE;
    const COMMAND_ID: u8 = CENTRAL_SCENE_NOTIFICATION;
    const NAME: &'static str = "Notification";
    const MIN_LEN: usize = 3;

    fn encode_body(&self, buf: &mut Vec<u8>) {
        let control = pack_flags(&[(SLOW_REFRESH_BIT, self.slow_refresh)]);
        buf.push(self.sequence_number);
        buf.push(set_bits(
            control,
            0,
            KEY_ATTRIBUTE_WIDTH,
            u8::from(self.key_attribute),
        ));
        buf.push(self.scene_number);
    }

    fn decode_body(body: &[u8]) -> CcResult<Self> {
        let control = body[1];
        let notification = Notification {
            sequence_number: body[0],
            key_attribute: KeyAttribute::from(get_bits(control, 0, KEY_ATTRIBUTE_WIDTH)),
            slow_refresh: get_bit(control, SLOW_REFRESH_BIT),
            scene_number: body[2],
        };

        if notification.slow_refresh && !notification.is_slow_refresh() {
            debug!(
                key_attribute = %notification.key_attribute,
                "slow refresh flag set on a key that is not held down"
            );
        }

        Ok(notification)
    }
}

/// Enable or disable slow refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSet {
    /// Requested slow refresh mode.
    pub slow_refresh: bool,
}

impl CcCommand for ConfigurationSet {
    const COMMAND_CLASS: u8 = CC_CENTRAL_SCENE;
    const COMMAND_ID: u8 = CENTRAL_SCENE_CONFIGURATION_SET;
    const NAME: &'static str = "ConfigurationSet";
    const MIN_LEN: usize = 1;

    fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.push(pack_flags(&[(SLOW_REFRESH_BIT, self.slow_refresh)]));
    }

    fn decode_body(body: &[u8]) -> CcResult<Self> {
        Ok(ConfigurationSet {
            slow_refresh: get_bit(body[0], SLOW_REFRESH_BIT),
        })
    }
}

/// Query the slow refresh configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigurationGet;

impl CcCommand for ConfigurationGet {
    const COMMAND_CLASS: u8 = CC_CENTRAL_SCENE;
    const COMMAND_ID: u8 = CENTRAL_SCENE_CONFIGURATION_GET;
    const NAME: &'static str = "ConfigurationGet";
    const MIN_LEN: usize = 0;

    fn encode_body(&self, _buf: &mut Vec<u8>) {}

    fn decode_body(_body: &[u8]) -> CcResult<Self> {
        Ok(ConfigurationGet)
    }
}

/// Current slow refresh configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationReport {
    /// Current slow refresh mode.
    pub slow_refresh: bool,
}

impl CcCommand for ConfigurationReport {
    const COMMAND_CLASS: u8 = CC_CENTRAL_SCENE;
    const COMMAND_ID: u8 = CENTRAL_SCENE_CONFIGURATION_REPORT;
    const NAME: &'static str = "ConfigurationReport";
    const MIN_LEN: usize = 1;

    fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.push(pack_flags(&[(SLOW_REFRESH_BIT, self.slow_refresh)]));
    }

    // Bits 6-0 are reserved.
    fn decode_body(body: &[u8]) -> CcResult<Self> {
        Ok(ConfigurationReport {
            slow_refresh: get_bit(body[0], SLOW_REFRESH_BIT),
        })
    }
}

// ============================================================================
// Command Enum
// ============================================================================

/// Any Central Scene command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CentralSceneCommand {
    SupportedGet(SupportedGet),
    SupportedReport(SupportedReport),
    Notification(Notification),
    ConfigurationSet(ConfigurationSet),
    ConfigurationGet(ConfigurationGet),
    ConfigurationReport(ConfigurationReport),
}

impl CentralSceneCommand {
    /// Get the command id for this command.
    pub fn command_id(&self) -> u8 {
        match self {
            CentralSceneCommand::SupportedGet(_) => SupportedGet::COMMAND_ID,
            CentralSceneCommand::SupportedReport(_) => SupportedReport::COMMAND_ID,
            CentralSceneCommand::Notification(_) => Notification::COMMAND_ID,
            CentralSceneCommand::ConfigurationSet(_) => ConfigurationSet::COMMAND_ID,
            CentralSceneCommand::ConfigurationGet(_) => ConfigurationGet::COMMAND_ID,
            CentralSceneCommand::ConfigurationReport(_) => ConfigurationReport::COMMAND_ID,
        }
    }

    /// Get the command name.
    pub fn name(&self) -> &'static str {
        match self {
            CentralSceneCommand::SupportedGet(_) => SupportedGet::NAME,
            CentralSceneCommand::SupportedReport(_) => SupportedReport::NAME,
            CentralSceneCommand::Notification(_) => Notification::NAME,
            CentralSceneCommand::ConfigurationSet(_) => ConfigurationSet::NAME,
            CentralSceneCommand::ConfigurationGet(_) => ConfigurationGet::NAME,
            CentralSceneCommand::ConfigurationReport(_) => ConfigurationReport::NAME,
        }
    }

    /// Encode the payload (command id and body).
    pub fn encode(&self) -> Vec<u8> {
        match self {
            CentralSceneCommand::SupportedGet(cmd) => cmd.encode(),
            CentralSceneCommand::SupportedReport(cmd) => cmd.encode(),
            CentralSceneCommand::Notification(cmd) => cmd.encode(),
            CentralSceneCommand::ConfigurationSet(cmd) => cmd.encode(),
            CentralSceneCommand::ConfigurationGet(cmd) => cmd.encode(),
            CentralSceneCommand::ConfigurationReport(cmd) => cmd.encode(),
        }
    }

    /// Command id of the report that answers this command.
    pub fn expected_response(&self) -> Option<u8> {
        match self {
            CentralSceneCommand::SupportedGet(_) => Some(SupportedReport::COMMAND_ID),
            CentralSceneCommand::ConfigurationGet(_) => Some(ConfigurationReport::COMMAND_ID),
            _ => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for CentralSceneCommand {
                fn from(cmd: $variant) -> Self {
                    CentralSceneCommand::$variant(cmd)
                }
            }
        )*
    };
}

impl_from_variant!(
    SupportedGet,
    SupportedReport,
    Notification,
    ConfigurationSet,
    ConfigurationGet,
    ConfigurationReport,
);

// ============================================================================
// Registration
// ============================================================================

fn parse<T>(payload: &[u8]) -> CcResult<Command>
where
    T: CcCommand + Into<CentralSceneCommand>,
{
    Ok(Command::CentralScene(T::decode(payload)?.into()))
}

fn register_command<T>(registry: &mut Registry)
where
    T: CcCommand + Into<CentralSceneCommand>,
{
    registry.register(T::COMMAND_CLASS, T::COMMAND_ID, T::NAME, parse::<T>);
}

/// Register every Central Scene command.
pub fn register(registry: &mut Registry) {
    register_command::<SupportedGet>(registry);
    register_command::<SupportedReport>(registry);
    register_command::<Notification>(registry);
    register_command::<ConfigurationSet>(registry);
    register_command::<ConfigurationGet>(registry);
    register_command::<ConfigurationReport>(registry);
}
