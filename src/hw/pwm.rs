// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PWM output on TIM4 for the steering and throttle drivers.
//!
//! TIM4 ticks at 1 MHz so the auto-reload value is the period in microseconds. Both actuator
//! channels share the timebase: CH1 drives the steering motor driver, CH2 the throttle driver.
//! Duty cycles are normalized to [0,1].

use stm32f7xx_hal::pac;

/// TIM4 configured for edge-aligned PWM on CH1/CH2.
pub struct Pwm {
    tim: pac::TIM4,
}

impl Pwm {
    /// Configure TIM4 for PWM with the given period and start it.
    pub fn tim4(tim: pac::TIM4, tim_clk_hz: u32, period_us: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 MHz tick, so ARR counts microseconds
        tim.psc
            .write(|w| unsafe { w.bits(tim_clk_hz / 1_000_000 - 1) });
        tim.arr.write(|w| unsafe { w.bits(period_us - 1) });

        // PWM mode 1 with preload on CH1/CH2
        tim.ccmr1_output().modify(|_, w| unsafe {
            w.oc1m()
                .bits(0b110)
                .oc1pe()
                .set_bit()
                .oc2m()
                .bits(0b110)
                .oc2pe()
                .set_bit()
        });

        // Enable both outputs, active high
        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        // Both channels idle at zero duty
        tim.ccr1().write(|w| unsafe { w.bits(0) });
        tim.ccr2().write(|w| unsafe { w.bits(0) });

        // Buffer the auto-reload, latch the prescaler, reset and enable
        tim.cr1.modify(|_, w| w.arpe().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Change the PWM period. Takes effect at the next timer update.
    pub fn set_period_us(&mut self, period_us: u32) {
        self.tim.arr.write(|w| unsafe { w.bits(period_us - 1) });
    }

    /// Split into per-channel duty handles: (steering CH1, throttle CH2).
    pub fn split(self) -> (PwmChannel<1>, PwmChannel<2>) {
        (PwmChannel { _priv: () }, PwmChannel { _priv: () })
    }

    pub fn free(self) -> pac::TIM4 {
        self.tim
    }
}

/// Duty handle for a single TIM4 channel.
///
/// Each handle writes only its own capture/compare register, so the two
/// channels can be owned by different parts of the foreground loop.
pub struct PwmChannel<const C: u8> {
    _priv: (),
}

impl<const C: u8> PwmChannel<C> {
    /// Set the duty cycle, clamped to [0,1].
    pub fn set_duty(&mut self, duty: f32) {
        let tim = unsafe { &*pac::TIM4::ptr() };
        let period = tim.arr.read().bits() + 1;
        let ticks = (duty.clamp(0.0, 1.0) * period as f32) as u32;
        match C {
            1 => tim.ccr1().write(|w| unsafe { w.bits(ticks) }),
            2 => tim.ccr2().write(|w| unsafe { w.bits(ticks) }),
            _ => unreachable!(),
        }
    }
}
