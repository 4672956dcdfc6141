// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration for the vehicle firmware.
//!
//! Everything here is a constant baked into the binary; there is no runtime configuration. Gains
//! are starting points for bench tuning over the serial link (`tuner` feature).

/// Serial link to the host computer, baud rate.
pub const SERIAL_BAUD: u32 = 115_200;

/// Control/telemetry period in milliseconds.
pub const TIMESTEP_MS: u32 = 25;

/// Control period in seconds, as handed to the PID controller.
pub const TIMESTEP_S: f32 = TIMESTEP_MS as f32 / 1000.0;

/// Smoothing parameter for the exponentially-weighted moving average s[t] of
/// time series measurements y[t]:
///     s[t] = alpha*y[t] + (1-alpha)*s[t-1], 0 < alpha <= 1
/// Small alpha: strong smoothing, with slower response to trends;
/// large alpha: less noise damping but faster response.
pub const SMOOTHING_ALPHA: f32 = 0.3;

/// Initial PID gains for the steering loop.
pub const STEER_KP: f32 = 0.2;
pub const STEER_KI: f32 = 50.0;
pub const STEER_KD: f32 = 0.0;

/// Initial steering setpoint, normalized [0,1]. 0.5 is wheels-straight.
pub const INITIAL_SETPOINT: f32 = 0.5;

/// Steering/throttle PWM period in microseconds (4 kHz).
pub const PWM_PERIOD_US: u32 = 250;

/// ADC1 channel of the steering potentiometer (PA3, Arduino A0).
pub const STEER_POT_CHANNEL: u8 = 3;

/// Rotating-mount encoder ticks per full lidar revolution, measured on the
/// bench by counting ticks between index pulses.
pub const TICKS_PER_REVOLUTION: u32 = 1346;

/// APB1 timer clock in Hz with the default clock tree (HSI, no PLL, no APB
/// prescaling). TIM2/TIM4/TIM5 prescalers are derived from this.
pub const TIM_CLK_HZ: u32 = 16_000_000;

/// IMU readiness polls between LED blinks at startup (spent 100 ms apart).
pub const IMU_POLL_INTERVAL_MS: u32 = 100;

/// Number of failed IMU readiness polls before a diagnostic line is printed.
pub const IMU_POLL_DIAG_THRESHOLD: u32 = 100;
