// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Discrete PID controller for closed-loop control.
//!
//! Works in `no_std` and does not allocate memory. The integrator and the derivative run on the
//! configured sample period; the caller is expected to invoke [`Pid::update`] once per control
//! cycle and is responsible for keeping that cadence.

/// PID controller with tunable gains, a stored setpoint, and output clamping.
pub struct Pid {
    /// Proportional gain
    kp: f32,
    /// Integral gain
    ki: f32,
    /// Derivative gain
    kd: f32,

    /// Target value, clamped to the output range
    setpoint: f32,

    /// Sample period in seconds, fixed at construction
    ts: f32,

    /// Integrator state
    integral: f32,
    /// Last error (for derivative term)
    prev_error: f32,

    /// Output clamp
    out_min: f32,
    out_max: f32,

    /// Most recent clamped output
    output: f32,
}

impl Pid {
    /// Create a new PID controller.
    ///
    /// `kp`, `ki`, `kd` are the gain constants; `ts` is the sample period in
    /// seconds (e.g. 0.025 for the 25 ms loop). Output limits default to
    /// [0,1], the servo duty range.
    pub fn new(kp: f32, ki: f32, kd: f32, setpoint: f32, ts: f32) -> Self {
        Self {
            kp,
            ki,
            kd,

            setpoint: setpoint.clamp(0.0, 1.0),
            ts,

            integral: 0.0,
            prev_error: 0.0,

            out_min: 0.0,
            out_max: 1.0,

            output: 0.0,
        }
    }

    /// Set output limits. The setpoint is re-clamped into the new range.
    pub fn with_output_limits(mut self, min: f32, max: f32) -> Self {
        self.out_min = min;
        self.out_max = max;
        self.setpoint = self.setpoint.clamp(min, max);
        self
    }

    /// Replace the gains. Integrator and derivative history are preserved, so
    /// the controller keeps its state across bench tuning.
    pub fn set_pid(&mut self, kp: f32, ki: f32, kd: f32) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// Set the target value, clamped into the output range.
    pub fn set_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint.clamp(self.out_min, self.out_max);
    }

    #[inline]
    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }

    /// Current gains as (kp, ki, kd).
    #[inline]
    pub fn gains(&self) -> (f32, f32, f32) {
        (self.kp, self.ki, self.kd)
    }

    /// Most recent clamped output.
    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Integrator and previous-error state, exposed for the status line.
    #[inline]
    pub fn internals(&self) -> (f32, f32) {
        (self.integral, self.prev_error)
    }

    /// Reset integrator + derivative history.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    /// Update the controller with the current measurement.
    ///
    /// Returns the clamped output in [`out_min`, `out_max`]. If the raw
    /// command saturates and the error keeps pushing it outward, the
    /// integrator update for this step is rolled back so it cannot wind up
    /// while the actuator is pinned.
    pub fn update(&mut self, measurement: f32) -> f32 {
        let error = self.setpoint - measurement;

        // ----- I term -----
        self.integral += error * self.ts;

        // ----- D term -----
        let derivative = (error - self.prev_error) / self.ts;

        let u = self.kp * error + self.ki * self.integral + self.kd * derivative;

        // ----- Output clamp + anti-windup -----
        let out = u.clamp(self.out_min, self.out_max);
        if u != out && (u - out) * error > 0.0 {
            self.integral -= error * self.ts;
        }

        self.prev_error = error;
        self.output = out;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::Pid;

    const TS: f32 = 0.025;
    const EPS: f32 = 1e-6;

    // Written without f32::abs so the tests stay core-only
    fn close(a: f32, b: f32) -> bool {
        let d = a - b;
        -EPS < d && d < EPS
    }

    #[test]
    fn step_response_matches_hand_calculation() {
        let mut pid = Pid::new(0.2, 50.0, 0.0, 0.5, TS);

        // e = 0.5, I = 0.0125, u = 0.2*0.5 + 50*0.0125 = 0.725
        let out = pid.update(0.0);
        assert!(close(out, 0.725));
        assert!(close(pid.output(), 0.725));
    }

    #[test]
    fn saturation_rolls_back_integrator() {
        let mut pid = Pid::new(0.2, 50.0, 0.0, 0.5, TS);

        pid.update(0.0);
        let (i_before, _) = pid.internals();
        assert!(close(i_before, 0.0125));

        // u = 0.1 + 1.25 = 1.35 clamps to 1.0; integrator update undone
        let out = pid.update(0.0);
        assert!(close(out, 1.0));
        let (i_after, _) = pid.internals();
        assert!(close(i_after, 0.0125));
    }

    #[test]
    fn output_always_within_limits() {
        let mut pid = Pid::new(5.0, 200.0, 0.1, 1.0, TS);
        let inputs = [-2.0, -0.5, 0.0, 0.3, 0.9, 1.5, 10.0, -10.0];
        for &y in &inputs {
            let out = pid.update(y);
            assert!((0.0..=1.0).contains(&out));
        }
    }

    #[test]
    fn integrator_resumes_once_unsaturated() {
        let mut pid = Pid::new(0.2, 50.0, 0.0, 0.5, TS);
        pid.update(0.0);
        pid.update(0.0); // saturated high

        // Measurement close to target: output leaves the rail and the
        // integrator accumulates again
        let (i_before, _) = pid.internals();
        let out = pid.update(0.45);
        assert!(out < 1.0);
        let (i_after, _) = pid.internals();
        assert!(i_after > i_before);
    }

    #[test]
    fn set_pid_preserves_state() {
        let mut pid = Pid::new(0.2, 50.0, 0.0, 0.5, TS);
        pid.update(0.0);
        let before = pid.internals();

        pid.set_pid(0.3, 40.0, 0.001);
        assert_eq!(pid.internals(), before);
        assert_eq!(pid.gains(), (0.3, 40.0, 0.001));
    }

    #[test]
    fn setpoint_is_clamped() {
        let mut pid = Pid::new(0.2, 50.0, 0.0, 0.5, TS);
        pid.set_setpoint(1.7);
        assert!(close(pid.setpoint(), 1.0));
        pid.set_setpoint(-0.2);
        assert!(close(pid.setpoint(), 0.0));
        pid.set_setpoint(0.5);
        assert!(close(pid.setpoint(), 0.5));
    }

    #[test]
    fn reset_clears_history() {
        let mut pid = Pid::new(0.2, 50.0, 0.0, 0.5, TS);
        pid.update(0.2);
        pid.reset();
        assert_eq!(pid.internals(), (0.0, 0.0));
    }
}
