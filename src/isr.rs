// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt service routines and the state they share with the foreground loop.
//!
//! Three ISR families live here:
//!
//! - the quadrature odometer decoder (EXTI3 rising on channel A, EXTI4 both edges on channel B),
//! - the rangefinder pulse-width capture (EXTI6, both edges, `lidar-pwm` builds),
//! - the rotating-mount encoder tick and revolution-index counters (EXTI7/EXTI8, `lidar-pwm`).
//!
//! Every shared field is a word-sized atomic with exactly one writing context, so the handlers
//! stay wait-free: no critical sections, no nested-interrupt masking. The foreground only reads
//! (or seeds state before the NVIC vectors are unmasked). Relaxed ordering is sufficient on this
//! single-core target.
//!
//! The decode logic itself is in plain functions over `&Atomic*` parameters; the vectors bind them
//! to the statics below, and the tests bind them to locals.

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use stm32f7xx_hal::pac::{self, interrupt};

use crate::hw::exti;
#[cfg(feature = "lidar-pwm")]
use crate::hw::clock::Micros;

// EXTI line numbers, fixed by the board wiring in `hw::pins`.
const ENC_A_LINE: u8 = 3; // PB3
const ENC_B_LINE: u8 = 4; // PB4
#[cfg(feature = "lidar-pwm")]
const PULSE_LINE: u8 = 6; // PC6
#[cfg(feature = "lidar-pwm")]
const ROT_TICK_LINE: u8 = 7; // PC7
#[cfg(feature = "lidar-pwm")]
const ROT_INDEX_LINE: u8 = 8; // PC8

/// Signed odometer position, written only by the channel-A handler.
static ENCODER_POS: AtomicI32 = AtomicI32::new(0);
/// Cached channel-B level, written only by the channel-B handler (after the
/// startup seed).
static ENCODER_PREV_B: AtomicBool = AtomicBool::new(false);

#[cfg(feature = "lidar-pwm")]
static PULSE_RISE_US: AtomicU32 = AtomicU32::new(0);
#[cfg(feature = "lidar-pwm")]
static PULSE_WIDTH_US: AtomicU32 = AtomicU32::new(0);
#[cfg(feature = "lidar-pwm")]
static PULSE_FRESH: AtomicBool = AtomicBool::new(false);

#[cfg(feature = "lidar-pwm")]
static ROT_TICKS: AtomicU32 = AtomicU32::new(0);
#[cfg(feature = "lidar-pwm")]
static ROT_LAST_REV: AtomicU32 = AtomicU32::new(0);

// ---------------------------------------------------------------------------
// Decode logic
// ---------------------------------------------------------------------------

/// Channel-A rising edge: count up while B is low, down while B is high.
fn quad_a_rise(pos: &AtomicI32, prev_b: &AtomicBool) {
    if prev_b.load(Ordering::Relaxed) {
        pos.fetch_sub(1, Ordering::Relaxed);
    } else {
        pos.fetch_add(1, Ordering::Relaxed);
    }
}

/// Any channel-B edge: the cached level flips.
fn quad_b_edge(prev_b: &AtomicBool) {
    prev_b.fetch_xor(true, Ordering::Relaxed);
}

/// One edge of the range pulse. `level_high` is the pin level after the edge,
/// `now_us` the capture clock. Returns true when a falling edge completed a
/// pulse, in which case the caller must reset the capture clock.
#[cfg_attr(not(feature = "lidar-pwm"), allow(dead_code))]
fn pulse_edge(
    level_high: bool,
    now_us: u32,
    rise: &AtomicU32,
    width: &AtomicU32,
    fresh: &AtomicBool,
) -> bool {
    if level_high {
        rise.store(now_us, Ordering::Relaxed);
        false
    } else {
        let w = now_us.wrapping_sub(rise.load(Ordering::Relaxed));
        width.store(w, Ordering::Relaxed);
        fresh.store(true, Ordering::Relaxed);
        true
    }
}

/// Rotating-mount encoder edge.
#[cfg_attr(not(feature = "lidar-pwm"), allow(dead_code))]
fn rot_tick(ticks: &AtomicU32) {
    ticks.fetch_add(1, Ordering::Relaxed);
}

/// Revolution index pulse: capture the tick count and restart from zero.
#[cfg_attr(not(feature = "lidar-pwm"), allow(dead_code))]
fn rot_index(ticks: &AtomicU32, last_rev: &AtomicU32) {
    let full = ticks.swap(0, Ordering::Relaxed);
    last_rev.store(full, Ordering::Relaxed);
}

// ---------------------------------------------------------------------------
// Foreground API
// ---------------------------------------------------------------------------

/// Seed the cached channel-B level from the pin, before interrupts are live.
pub fn seed_encoder_b(level: bool) {
    ENCODER_PREV_B.store(level, Ordering::Relaxed);
}

/// Latest odometer position in encoder ticks.
#[inline]
pub fn encoder_position() -> i32 {
    ENCODER_POS.load(Ordering::Relaxed)
}

/// Take the most recent completed pulse width in microseconds, or None if no
/// new pulse finished since the last call.
#[cfg(feature = "lidar-pwm")]
pub fn take_pulse_width_us() -> Option<u32> {
    if PULSE_FRESH.swap(false, Ordering::Relaxed) {
        Some(PULSE_WIDTH_US.load(Ordering::Relaxed))
    } else {
        None
    }
}

/// Rotation ticks since the last index pulse.
#[cfg(feature = "lidar-pwm")]
#[inline]
pub fn rotation_ticks() -> u32 {
    ROT_TICKS.load(Ordering::Relaxed)
}

/// Tick count captured at the last full revolution.
#[cfg(feature = "lidar-pwm")]
#[inline]
pub fn last_revolution_ticks() -> u32 {
    ROT_LAST_REV.load(Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Vectors
// ---------------------------------------------------------------------------

/// Liveness blink on the status LED (PB0), safe from interrupt context: BSRR
/// writes are atomic by hardware.
fn toggle_status_led() {
    let gpiob = unsafe { &*pac::GPIOB::ptr() };
    if gpiob.odr.read().odr0().bit_is_set() {
        gpiob.bsrr.write(|w| w.br0().set_bit());
    } else {
        gpiob.bsrr.write(|w| w.bs0().set_bit());
    }
}

#[interrupt]
fn EXTI3() {
    exti::clear_pending(ENC_A_LINE);
    quad_a_rise(&ENCODER_POS, &ENCODER_PREV_B);
    toggle_status_led();
}

#[interrupt]
fn EXTI4() {
    exti::clear_pending(ENC_B_LINE);
    quad_b_edge(&ENCODER_PREV_B);
}

/// Shared vector for the rangefinder pulse and the rotating-mount encoder.
#[cfg(feature = "lidar-pwm")]
#[interrupt]
fn EXTI9_5() {
    if exti::is_pending(PULSE_LINE) {
        exti::clear_pending(PULSE_LINE);
        let gpioc = unsafe { &*pac::GPIOC::ptr() };
        let level_high = gpioc.idr.read().idr6().bit_is_set();
        if pulse_edge(
            level_high,
            Micros::now_isr(),
            &PULSE_RISE_US,
            &PULSE_WIDTH_US,
            &PULSE_FRESH,
        ) {
            Micros::reset_isr();
        }
    }
    if exti::is_pending(ROT_TICK_LINE) {
        exti::clear_pending(ROT_TICK_LINE);
        rot_tick(&ROT_TICKS);
    }
    if exti::is_pending(ROT_INDEX_LINE) {
        exti::clear_pending(ROT_INDEX_LINE);
        rot_index(&ROT_TICKS, &ROT_LAST_REV);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

    #[test]
    fn forward_rises_count_up() {
        let pos = AtomicI32::new(0);
        let prev_b = AtomicBool::new(false);
        for _ in 0..5 {
            quad_a_rise(&pos, &prev_b);
        }
        assert_eq!(pos.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn reverse_rises_count_down() {
        let pos = AtomicI32::new(0);
        let prev_b = AtomicBool::new(true);
        for _ in 0..5 {
            quad_a_rise(&pos, &prev_b);
        }
        assert_eq!(pos.load(Ordering::Relaxed), -5);
    }

    #[test]
    fn direction_reverses_after_b_edge() {
        let pos = AtomicI32::new(0);
        let prev_b = AtomicBool::new(false);

        quad_a_rise(&pos, &prev_b);
        assert_eq!(pos.load(Ordering::Relaxed), 1);

        quad_b_edge(&prev_b);
        quad_a_rise(&pos, &prev_b);
        assert_eq!(pos.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn pulse_capture_measures_width() {
        let rise = AtomicU32::new(0);
        let width = AtomicU32::new(0);
        let fresh = AtomicBool::new(false);

        // Rising at t=100 µs, falling at t=350 µs
        assert!(!pulse_edge(true, 100, &rise, &width, &fresh));
        assert!(!fresh.load(Ordering::Relaxed));

        assert!(pulse_edge(false, 350, &rise, &width, &fresh));
        assert_eq!(width.load(Ordering::Relaxed), 250);
        assert!(fresh.load(Ordering::Relaxed));
    }

    #[test]
    fn pulse_capture_after_clock_reset() {
        let rise = AtomicU32::new(0);
        let width = AtomicU32::new(0);
        let fresh = AtomicBool::new(false);

        pulse_edge(true, 100, &rise, &width, &fresh);
        pulse_edge(false, 350, &rise, &width, &fresh);

        // The capture clock restarts at zero after each falling edge
        pulse_edge(true, 40, &rise, &width, &fresh);
        pulse_edge(false, 1240, &rise, &width, &fresh);
        assert_eq!(width.load(Ordering::Relaxed), 1200);
    }

    #[test]
    fn index_pulse_captures_and_resets_ticks() {
        let ticks = AtomicU32::new(0);
        let last_rev = AtomicU32::new(0);

        for _ in 0..1346 {
            rot_tick(&ticks);
        }
        assert_eq!(ticks.load(Ordering::Relaxed), 1346);

        rot_index(&ticks, &last_rev);
        assert_eq!(ticks.load(Ordering::Relaxed), 0);
        assert_eq!(last_rev.load(Ordering::Relaxed), 1346);
    }
}
