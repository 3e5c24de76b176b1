//! Integration tests for liqrelay-bot.
//!
//! These tests verify the interaction between components:
//! - stream connection lifecycle and reconnect behavior
//! - frame flow through decode -> filter -> dispatch
//! - end-to-end delivery to the webhook endpoint

pub mod common;
