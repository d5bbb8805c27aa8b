//! Application core: pure domain logic, zero I/O.
//!
//! Mode selection, the per-cycle dispatcher and the events it emits.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
