//! Domain-based type organization
//!
//! Types are organized by domain to match the structure in `update/`:
//! - switch: Switch wire payloads
//! - polling: Status polling state and retry budget

pub mod polling;
pub mod switch;

pub use polling::*;
pub use switch::*;
