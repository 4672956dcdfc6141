// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Terrapin Firmware
//!
//! This crate contains the onboard control firmware for the Terrapin ground vehicle, written in
//! Rust, targeting an STM32F767 MCU (NUCLEO-F767ZI wiring).
//!
//! The firmware runs a fixed-period sense/control/telemetry loop: it samples the steering-angle
//! potentiometer, drives the steering servo toward a commanded setpoint with a PID controller,
//! counts odometer pulses from a quadrature encoder, reads the BNO055 orientation sensor and the
//! LidarLite rangefinder over I²C, and streams a telemetry line to the host computer every 25 ms.
//! Single-byte PID tuning commands arrive on the same serial link.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around ADC, timers, PWM, EXTI, USART, I²C |
//! | [`drivers`] | Device-level drivers (BNO055, LidarLite v2) |
//! | [`control`] | Control algorithms (PID, input smoothing, steering loop) |
//! | [`protocol`] | Serial telemetry format and tuning command parser |
//! | [`isr`] | Interrupt handlers and the state they share with the loop |
//! | [`config`] | Compile-time tuning and hardware constants |
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! ## Build variants
//!
//! - `lidar` (default) — rangefinder attached, I²C continuous backend
//! - `lidar-pwm` — pulse-width rangefinder backend with the rotating-mount bearing encoder
//! - `tuner` (default) — PID tuning over the serial link
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod config;
pub mod control;
pub mod drivers;
pub mod hw;
pub mod isr;
pub mod protocol;
