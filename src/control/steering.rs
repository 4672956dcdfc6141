// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop steering servo.
//!
//! This wraps the steering PWM channel and the PID controller behind a periodic `step()` that the
//! foreground loop calls once per cycle with the smoothed steering angle.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! steering.set_target(0.5);
//!
//! loop {
//!     let angle = smoother.update(adc.read_normalized(POT_CHANNEL));
//!     steering.step(angle);
//! }
//! ```

use crate::control::Pid;
use crate::hw::PwmChannel;

/// Steering servo loop: PID on the normalized pot angle, duty out.
pub struct SteeringLoop {
    pid: Pid,
    servo: PwmChannel<1>,
}

impl SteeringLoop {
    pub fn new(pid: Pid, servo: PwmChannel<1>) -> Self {
        Self { pid, servo }
    }

    /// Set a new target angle, normalized [0,1]; clamped by the controller.
    pub fn set_target(&mut self, target: f32) {
        self.pid.set_setpoint(target);
    }

    /// Access the controller, e.g. for the telemetry status line.
    #[inline]
    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    /// Mutable controller access for the serial tuner.
    #[inline]
    pub fn pid_mut(&mut self) -> &mut Pid {
        &mut self.pid
    }

    /// Run one control step with the measured angle and apply the resulting
    /// duty to the servo. Returns the duty for telemetry.
    pub fn step(&mut self, angle: f32) -> f32 {
        let duty = self.pid.update(angle);
        self.servo.set_duty(duty);
        duty
    }
}
