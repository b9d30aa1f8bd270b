//! Persistent, attribute-addressable JSON configuration objects.
//!
//! A [`JsonConf`] behaves like an ordered map from string keys to JSON values,
//! starts out with the defaults declared by its [`ConfKind`], and can be synced
//! to a JSON file on disk:
//!
//! ```no_run
//! use jsonconf::{JsonConf, Plain};
//!
//! let settings = JsonConf::<Plain>::load("settings.json")?;
//!
//! let mut settings = settings.write();
//! settings.set_attr("show_indicator_icon", true)?;
//! settings.save()?;
//! # Ok::<(), jsonconf::ConfError>(())
//! ```
//!
//! # Internals
//! - [`Schema`] holds the defaults and reserved method names of a kind,
//!   composed from the schema of its parent kind.
//! - Every mutation goes through [`ConfKind::set_item`], which kinds may override.
//! - [`load`] keeps one shared instance per (kind, canonical path) for the
//!   lifetime of the process.
//! - [`stringify`] renders the canonical JSON text that [`save`] and [`save_as`] write.
//!
//! The [`items`] module contains search result items that are backed by
//! configuration objects, such as user-defined shortcuts.

mod conf;
mod error;
pub mod items;

pub use conf::*;
pub use error::{ConfError, Result};
