//! Input: UI actions addressed to layers.
//!
//! # Invariants
//! - Every UI surface (toggle, checkbox, script) maps onto the same action set.

pub mod action;

pub use action::{LayerAction, LayerCommand, ParseActionError};
