//! Inline date trigger engine.
//!
//! The engine logic lives in `nld-core` (pure recognition, settings,
//! formatting) and `nld-session` (the stateful session). This crate exports
//! it to host editors through UniFFI.

uniffi::setup_scaffolding!();

pub mod api;
mod trace_init;

pub use nld_core::settings;
