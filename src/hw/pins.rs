// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the Terrapin vehicle controller (NUCLEO-F767ZI wiring).

use stm32f7xx_hal::{
    gpio::{
        gpioa, gpiob, gpioc, gpiod, Alternate, Analog, Floating, Input, OpenDrain, Output,
        PushPull,
    },
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart3: Usart3Pins,
    pub i2c1: I2c1Pins,
    pub steer: SteerPins,
    pub odometer: OdometerPins,
    pub lidar: LidarPins,
}

/// On-board user LEDs.
pub struct LedPins {
    pub green: gpiob::PB0<Output<PushPull>>,
    pub blue: gpiob::PB7<Output<PushPull>>,
    pub red: gpiob::PB14<Output<PushPull>>,
}

/// USART3 runs through the ST-LINK virtual COM port to the host computer.
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// I²C1 bus shared by the BNO055 and the LidarLite.
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

/// Steering feedback and actuation.
pub struct SteerPins {
    pub pot: gpioa::PA3<Analog>,                 // ADC1_IN3 (Arduino A0)
    pub steer_pwm: gpiod::PD12<Alternate<2>>,    // TIM4_CH1
    pub throttle_pwm: gpiod::PD13<Alternate<2>>, // TIM4_CH2
}

/// Quadrature odometer encoder. Channel A interrupts on rising edges
/// (EXTI3), channel B on both edges (EXTI4); the extra floating input on
/// the channel-B pin is read once at startup to seed the decoder.
pub struct OdometerPins {
    pub enc_a: gpiob::PB3<Input<Floating>>,
    pub enc_b: gpiob::PB4<Input<Floating>>,
}

/// Rangefinder lines. `mode` idles high (2.2k external pullups); the sensor
/// pulls it low when a continuous-mode measurement is ready. The pulse and
/// rotation pins are only wired on the rotating-mount build (`lidar-pwm`).
pub struct LidarPins {
    pub mode: gpioa::PA5<Input<Floating>>,
    pub pulse: gpioc::PC6<Input<Floating>>,     // EXTI6, both edges
    pub rot_tick: gpioc::PC7<Input<Floating>>,  // EXTI7, rising
    pub rot_index: gpioc::PC8<Input<Floating>>, // EXTI8, rising
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpioc: pac::GPIOC, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();

        Self {
            leds: LedPins {
                green: gpiob.pb0.into_push_pull_output(),
                blue: gpiob.pb7.into_push_pull_output(),
                red: gpiob.pb14.into_push_pull_output(),
            },

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            steer: SteerPins {
                pot: gpioa.pa3.into_analog(),
                steer_pwm: gpiod.pd12.into_alternate::<2>(),
                throttle_pwm: gpiod.pd13.into_alternate::<2>(),
            },

            odometer: OdometerPins {
                enc_a: gpiob.pb3.into_floating_input(),
                enc_b: gpiob.pb4.into_floating_input(),
            },

            lidar: LidarPins {
                mode: gpioa.pa5.into_floating_input(),
                pulse: gpioc.pc6.into_floating_input(),
                rot_tick: gpioc.pc7.into_floating_input(),
                rot_index: gpioc.pc8.into_floating_input(),
            },
        }
    }
}
