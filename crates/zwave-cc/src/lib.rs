//! Z-Wave Command Class Codec
//!
//! This crate encodes and decodes the application layer of Z-Wave frames:
//! a node id, a command class id, and a command payload whose first byte is
//! the command id.
//!
//! # Layers
//!
//! - **Frame envelope** ([`wrap_frame`], [`unwrap_frame`]): the three byte
//!   header around a command class payload.
//! - **Registry** ([`Registry`]): maps (class id, command id) to a parser and
//!   falls back to [`UnspecifiedCommand`] for anything unknown.
//! - **Bitfield helpers** ([`bitfield`]): flag bits and indexed bit tables.
//! - **Command classes** ([`central_scene`]): typed commands implementing
//!   [`CcCommand`].
//! - **Command class instances** ([`CommandClass`]): node-addressed decode
//!   and serialize entry points.
//!
//! # Example
//!
//! ```rust
//! use zwave_cc::central_scene::{CentralSceneCommand, ConfigurationSet};
//! use zwave_cc::CommandClass;
//!
//! // Build a command for node 2
//! let cc = CommandClass::new(2, CentralSceneCommand::from(ConfigurationSet { slow_refresh: true }));
//! let frame = cc.serialize().unwrap();
//! assert_eq!(frame, vec![2, 3, 0x5B, 0x04, 0x80]);
//!
//! // Parse it back
//! let decoded = CommandClass::decode(&frame).unwrap();
//! assert_eq!(decoded, cc);
//! ```

pub mod bitfield;
pub mod central_scene;
mod command;
mod command_class;
pub mod constants;
mod error;
mod frame;
mod registry;

pub use command::*;
pub use command_class::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use registry::*;
