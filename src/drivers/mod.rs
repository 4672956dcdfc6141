// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic.
//!
//! ## Existing drivers
//!
//! - [`bno055`] – Bosch BNO055 nine-axis absolute orientation sensor (I²C)
//! - [`lidar_lite`] – PulsedLight LidarLite v2 rangefinder (I²C continuous mode)

pub mod bno055;
pub mod lidar_lite;

pub use bno055::Bno055;
pub use lidar_lite::LidarLite;
