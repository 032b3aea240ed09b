//! Custom shell operations that `crux_core` and `crux_http` do not provide.

pub mod delay;
