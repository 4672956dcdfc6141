// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Telemetry record and line format.
//!
//! One line per timestep:
//!
//! ```text
//! t:<ms>,AMGS:<a><m><g><s>,qw:<w>,qx:<x>,qy:<y>,qz:<z>,sa:<int>,odo:<int>,r:<int>,b:<int>
//! ```
//!
//! `t` is the millisecond clock; `AMGS` concatenates the four 0–3 calibration codes (accel, mag,
//! gyro, system); `qw..qz` are the raw signed quaternion components; `sa` is the smoothed steering
//! angle in parts-per-thousand; `odo` the signed odometer count; `r` the latest range (cm on the
//! I²C backend, mm on the pulse-width backend); `b` the lidar bearing in whole degrees, 0–359.

use core::fmt;

use crate::drivers::bno055::{Calibration, Quaternion};

/// One telemetry emission, assembled by the foreground loop.
#[derive(Copy, Clone, Default)]
pub struct Record {
    pub t_ms: u32,
    pub cal: Calibration,
    pub quat: Quaternion,
    /// Smoothed steering angle, normalized [0,1].
    pub steer_angle: f32,
    /// Odometer position in encoder ticks.
    pub odometer: i32,
    /// Latest range measurement (unit depends on the rangefinder backend).
    pub range: u32,
    /// Lidar bearing in degrees, 0–359.
    pub bearing: u16,
}

/// Write one telemetry line, CRLF-terminated.
pub fn write_record<W: fmt::Write>(w: &mut W, rec: &Record) -> fmt::Result {
    write!(
        w,
        "t:{},AMGS:{}{}{}{},qw:{},qx:{},qy:{},qz:{},sa:{},odo:{},r:{},b:{}\r\n",
        rec.t_ms,
        rec.cal.accel(),
        rec.cal.mag(),
        rec.cal.gyro(),
        rec.cal.system(),
        rec.quat.w,
        rec.quat.x,
        rec.quat.y,
        rec.quat.z,
        (1000.0 * rec.steer_angle) as i32,
        rec.odometer,
        rec.range,
        rec.bearing,
    )
}

/// Bearing of the rotating mount: ticks into the revolution mapped to whole
/// degrees and clamped to 0–359 (a full revolution reads 359, not 360).
pub fn bearing_from_ticks(ticks: u32, ticks_per_rev: u32) -> u16 {
    let deg = ticks as f32 / ticks_per_rev as f32 * 360.0;
    (deg as u32).min(359) as u16
}

/// Fixed-timestep gate for telemetry emission.
///
/// The loop itself runs as fast as the sensor polling allows; only the
/// emission is paced, so the serial link cannot saturate.
pub struct Cadence {
    timestep_ms: u32,
    prev_emit_ms: u32,
}

impl Cadence {
    pub fn new(timestep_ms: u32) -> Self {
        Self {
            timestep_ms,
            prev_emit_ms: 0,
        }
    }

    /// True once per timestep; the caller emits on true.
    pub fn due(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.prev_emit_ms) >= self.timestep_ms {
            self.prev_emit_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::bno055::{Calibration, Quaternion};
    use core::fmt::Write;

    struct Sink {
        buf: [u8; 128],
        len: usize,
    }

    impl Sink {
        fn new() -> Self {
            Self {
                buf: [0; 128],
                len: 0,
            }
        }

        fn as_str(&self) -> &str {
            core::str::from_utf8(&self.buf[..self.len]).unwrap()
        }
    }

    impl Write for Sink {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            for &b in s.as_bytes() {
                assert!(self.len < self.buf.len());
                self.buf[self.len] = b;
                self.len += 1;
            }
            Ok(())
        }
    }

    #[test]
    fn line_format_is_exact() {
        // accel=3, mag=2, gyro=1, system=0
        let rec = Record {
            t_ms: 1234,
            cal: Calibration::from_raw(0b00_01_11_10),
            quat: Quaternion {
                w: 1,
                x: -2,
                y: 3,
                z: -4,
            },
            steer_angle: 0.5,
            odometer: -42,
            range: 123,
            bearing: 180,
        };

        let mut sink = Sink::new();
        write_record(&mut sink, &rec).unwrap();
        assert_eq!(
            sink.as_str(),
            "t:1234,AMGS:3210,qw:1,qx:-2,qy:3,qz:-4,sa:500,odo:-42,r:123,b:180\r\n"
        );
    }

    #[test]
    fn bearing_mapping() {
        assert_eq!(bearing_from_ticks(0, 1346), 0);
        assert_eq!(bearing_from_ticks(673, 1346), 180);
        // Full revolution clamps to 359
        assert_eq!(bearing_from_ticks(1346, 1346), 359);
    }

    #[test]
    fn cadence_gates_at_timestep() {
        let mut cadence = Cadence::new(25);

        assert!(!cadence.due(10));
        assert!(cadence.due(25));
        assert!(!cadence.due(30));
        assert!(!cadence.due(49));
        assert!(cadence.due(51));

        // Emissions are never closer than one timestep
        assert!(!cadence.due(75));
        assert!(cadence.due(76));
    }
}
