//! Command dispatch by (command class id, command id).
//!
//! The registry maps each known pair to a parser function. Decoding a payload
//! looks up the parser for its first byte; payloads nobody registered decode
//! to [`Decoded::Unspecified`] rather than an error, since nodes routinely run
//! newer protocol versions than this crate knows.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::command::{Command, Decoded, UnspecifiedCommand};
use crate::error::CcResult;

/// Parses a payload (command id included) into a typed command.
pub type ParseFn = fn(&[u8]) -> CcResult<Command>;

#[derive(Clone, Copy)]
struct Entry {
    name: &'static str,
    parse: ParseFn,
}

/// Table of command parsers.
///
/// Populate it once, then share it read-only. [`Registry::global`] holds one
/// with every command this crate implements.
#[derive(Clone, Default)]
pub struct Registry {
    entries: BTreeMap<(u8, u8), Entry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.commands().map(|(class_id, command_id, name)| {
                (format!("0x{:02X}/0x{:02X}", class_id, command_id), name)
            }))
            .finish()
    }
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::with_defaults);

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry {
            entries: BTreeMap::new(),
        }
    }

    /// Create a registry with every implemented command class.
    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        crate::central_scene::register(&mut registry);
        registry
    }

    /// The shared default registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Register a parser for a (class, command) pair.
    ///
    /// # Panics
    ///
    /// Panics if the pair is already registered.
    pub fn register(&mut self, class_id: u8, command_id: u8, name: &'static str, parse: ParseFn) {
        if let Some(existing) = self.entries.get(&(class_id, command_id)) {
            panic!(
                "command 0x{:02X}/0x{:02X} ({}) is already registered as {}",
                class_id, command_id, name, existing.name
            );
        }
        trace!(class_id, command_id, command = name, "registered command parser");
        self.entries.insert((class_id, command_id), Entry { name, parse });
    }

    /// Whether a parser exists for the pair.
    pub fn is_registered(&self, class_id: u8, command_id: u8) -> bool {
        self.entries.contains_key(&(class_id, command_id))
    }

    /// Name of the registered command, if any.
    pub fn command_name(&self, class_id: u8, command_id: u8) -> Option<&'static str> {
        self.entries
            .get(&(class_id, command_id))
            .map(|entry| entry.name)
    }

    /// Registered pairs with their names, in ascending order.
    pub fn commands(&self) -> impl Iterator<Item = (u8, u8, &'static str)> + '_ {
        self.entries
            .iter()
            .map(|(&(class_id, command_id), entry)| (class_id, command_id, entry.name))
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a payload (command id first) of the given class.
    ///
    /// Structural errors from a registered parser are returned. An empty
    /// payload or an unregistered pair yields [`Decoded::Unspecified`].
    pub fn decode(&self, class_id: u8, payload: &[u8]) -> CcResult<Decoded> {
        let entry = payload
            .first()
            .and_then(|&command_id| self.entries.get(&(class_id, command_id)));

        match entry {
            Some(entry) => Ok(Decoded::Command((entry.parse)(payload)?)),
            None => {
                debug!(
                    class_id,
                    command_id = ?payload.first(),
                    "no parser registered, decoding as unspecified"
                );
                Ok(Decoded::Unspecified(UnspecifiedCommand {
                    class_id,
                    payload: payload.to_vec(),
                }))
            }
        }
    }
}
