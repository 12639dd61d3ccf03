//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (DOM key names -> game actions)

pub mod input;

pub use input::{KeyAction, apply_key, key_action};
