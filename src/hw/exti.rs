// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Edge-triggered interrupt inputs via SYSCFG/EXTI register access.
//!
//! [`EdgeInput`] binds a floating GPIO input to its EXTI line (line number = pin number) and
//! configures the trigger edge. The interrupt service routines themselves live in [`crate::isr`];
//! they acknowledge lines with [`clear_pending`] and, on shared vectors, dispatch with
//! [`is_pending`].

use cortex_m::peripheral::NVIC;
use stm32f7xx_hal::{
    gpio::{self, Floating, Input},
    pac,
};

/// Which signal edge(s) fire the interrupt.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

/// A floating input pin routed to its EXTI line.
pub struct EdgeInput<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Input<Floating>>,
}

impl<const P: char, const N: u8> EdgeInput<P, N> {
    pub fn new(pin: gpio::Pin<P, N, Input<Floating>>) -> Self {
        Self { pin }
    }

    /// Current pin level.
    #[inline]
    pub fn read(&self) -> bool {
        self.pin.is_high()
    }

    /// Route this pin to EXTI line `N` and arm the trigger edge(s).
    ///
    /// The NVIC vector still has to be unmasked with [`unmask`] before the
    /// handler runs.
    pub fn enable_interrupt(&mut self, syscfg: &pac::SYSCFG, exti: &pac::EXTI, edge: Edge) {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

        // Select the GPIO port for this EXTI line (4-bit field per line)
        let port: u32 = match P {
            'A' => 0,
            'B' => 1,
            'C' => 2,
            'D' => 3,
            'E' => 4,
            'F' => 5,
            'G' => 6,
            'H' => 7,
            _ => unreachable!(),
        };
        let shift = ((N as u32) & 0b11) * 4;
        let mask = !(0xFu32 << shift);
        let sel = port << shift;
        match N >> 2 {
            0 => syscfg
                .exticr1
                .modify(|r, w| unsafe { w.bits((r.bits() & mask) | sel) }),
            1 => syscfg
                .exticr2
                .modify(|r, w| unsafe { w.bits((r.bits() & mask) | sel) }),
            2 => syscfg
                .exticr3
                .modify(|r, w| unsafe { w.bits((r.bits() & mask) | sel) }),
            3 => syscfg
                .exticr4
                .modify(|r, w| unsafe { w.bits((r.bits() & mask) | sel) }),
            _ => unreachable!(),
        }

        // Trigger edges
        let bit = 1u32 << N;
        match edge {
            Edge::Rising => {
                exti.rtsr.modify(|r, w| unsafe { w.bits(r.bits() | bit) });
                exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
            }
            Edge::Falling => {
                exti.rtsr.modify(|r, w| unsafe { w.bits(r.bits() & !bit) });
                exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() | bit) });
            }
            Edge::Both => {
                exti.rtsr.modify(|r, w| unsafe { w.bits(r.bits() | bit) });
                exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() | bit) });
            }
        }

        // Unmask the line
        exti.imr.modify(|r, w| unsafe { w.bits(r.bits() | bit) });
    }

    pub fn free(self) -> gpio::Pin<P, N, Input<Floating>> {
        self.pin
    }
}

/// Enable an EXTI vector in the NVIC.
#[inline]
pub fn unmask(irq: pac::Interrupt) {
    unsafe { NVIC::unmask(irq) };
}

/// Whether the given EXTI line has a pending interrupt. Used by handlers on
/// shared vectors to find the source line.
#[inline]
pub fn is_pending(line: u8) -> bool {
    let exti = unsafe { &*pac::EXTI::ptr() };
    exti.pr.read().bits() & (1u32 << line) != 0
}

/// Acknowledge the given EXTI line (write-1-to-clear).
#[inline]
pub fn clear_pending(line: u8) {
    let exti = unsafe { &*pac::EXTI::ptr() };
    exti.pr.write(|w| unsafe { w.bits(1u32 << line) });
}
