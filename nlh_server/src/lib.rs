//! WebSocket transport for the `nl_holdem` table.
//!
//! The binary in `main.rs` wires these pieces together: env-driven
//! [`config`], [`logging`] setup, and the [`ws`] router that bridges
//! JSON-over-WebSocket clients to the table actor.

pub mod config;
pub mod logging;
pub mod ws;
