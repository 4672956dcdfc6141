// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Monotonic timebases built on the 32-bit general-purpose timers.
//!
//! - [`Millis`] — TIM5 free-running at 1 kHz. Started once at boot, never reset. Paces telemetry
//!   and feeds the `t:` field of every record.
//! - [`Micros`] — TIM2 free-running at 1 MHz. Reset by the pulse-capture interrupt at every
//!   falling edge so a single pulse measurement can never straddle a counter rollover.

use stm32f7xx_hal::pac;

/// Millisecond monotonic clock on TIM5.
pub struct Millis {
    tim: pac::TIM5,
}

impl Millis {
    /// Configure TIM5 as a free-running 1 kHz counter and start it.
    pub fn tim5(tim: pac::TIM5, tim_clk_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim5en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 kHz tick
        tim.psc
            .write(|w| unsafe { w.bits(tim_clk_hz / 1_000 - 1) });

        // Auto-reload: max 32-bit
        tim.arr.write(|w| w.bits(0xFFFF_FFFF));

        // Latch the prescaler and reset the counter
        tim.egr.write(|w| w.ug().set_bit());
        tim.cnt.write(|w| w.bits(0));

        // Enable the counter
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Milliseconds since the clock was started.
    #[inline]
    pub fn ms(&self) -> u32 {
        self.tim.cnt.read().bits()
    }

    /// Busy-wait for the given number of milliseconds.
    pub fn delay_ms(&self, ms: u32) {
        let start = self.ms();
        while self.ms().wrapping_sub(start) < ms {}
    }

    pub fn free(self) -> pac::TIM5 {
        self.tim
    }
}

/// Microsecond clock on TIM2.
pub struct Micros {
    tim: pac::TIM2,
}

impl Micros {
    /// Configure TIM2 as a free-running 1 MHz counter and start it.
    pub fn tim2(tim: pac::TIM2, tim_clk_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 MHz tick
        tim.psc
            .write(|w| unsafe { w.bits(tim_clk_hz / 1_000_000 - 1) });

        // Auto-reload: max 32-bit
        tim.arr.write(|w| w.bits(0xFFFF_FFFF));

        // Latch the prescaler and reset the counter
        tim.egr.write(|w| w.ug().set_bit());
        tim.cnt.write(|w| w.bits(0));

        // Enable the counter
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Microseconds since the last reset.
    #[inline]
    pub fn us(&self) -> u32 {
        self.tim.cnt.read().bits()
    }

    /// Reset the counter to zero.
    #[inline]
    pub fn reset(&mut self) {
        self.tim.cnt.write(|w| w.bits(0));
    }

    /// Read the counter from interrupt context.
    ///
    /// The pulse-capture handler owns the counter between the rising and
    /// falling edge; nothing in the foreground touches it.
    #[inline]
    pub fn now_isr() -> u32 {
        let tim = unsafe { &*pac::TIM2::ptr() };
        tim.cnt.read().bits()
    }

    /// Reset the counter from interrupt context.
    #[inline]
    pub fn reset_isr() {
        let tim = unsafe { &*pac::TIM2::ptr() };
        tim.cnt.write(|w| w.bits(0));
    }

    pub fn free(self) -> pac::TIM2 {
        self.tim
    }
}
