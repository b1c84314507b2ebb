//! # Mapping Module
//!
//! Keyboard and mouse to controller translation.
//!
//! This module handles:
//! - Scan code bindings ([`bindings`])
//! - Mouse delta shaping for the right stick ([`transform`])
//! - Stateful event translation ([`engine`])
//! - Deciding which events are hidden from the OS ([`filter`])

pub mod bindings;
pub mod engine;
pub mod filter;
pub mod transform;

pub use bindings::{Direction, KeyBinding, KeyBindingTable, StickAxis};
pub use engine::{MappingEngine, MappingEvent};
pub use filter::FilterPolicy;
pub use transform::{AxisState, AxisTransform, StickPosition};
