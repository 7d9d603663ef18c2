//! Nimbus Web Console
//!
//! A pure Rust web console built with Leptos. The `boot` module is the
//! bootstrap layer: it wires global failure handlers, mounts the app, and
//! falls back to a diagnostic panel when anything goes wrong.

pub mod app;
pub mod boot;

pub use app::App;
