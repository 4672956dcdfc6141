// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! This module provides reusable building blocks for the steering loop.
//!
//! ## Modules
//!
//! - [`pid`] - Discrete PI(D) controller with clamping and anti-windup.
//! - [`smoother`] - Exponentially-weighted moving average for the analog steering input.
//! - [`steering`] - Closed-loop steering servo built from the two above.

pub mod pid;
pub mod smoother;
pub mod steering;

pub use pid::Pid;
pub use smoother::Ewma;
pub use steering::SteeringLoop;
