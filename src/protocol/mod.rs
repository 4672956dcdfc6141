// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial protocol between the vehicle and the host computer.
//!
//! Outbound: one [`telemetry`] line per timestep, CRLF-terminated, plain ASCII key:value pairs.
//! Inbound: single tuning command bytes, no framing, handled by [`tuner`].

pub mod telemetry;
#[cfg(feature = "tuner")]
pub mod tuner;

pub use telemetry::{Cadence, Record};
#[cfg(feature = "tuner")]
pub use tuner::Tuner;
