// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PulsedLight LidarLite v2 rangefinder.
//!
//! The sensor is used in continuous acquisition mode: once started it re-measures on its own and
//! signals a fresh sample by pulling its mode line low, at which point the distance register pair
//! holds the range in centimeters. On the rotating-mount build the sensor's PWM output is timed
//! instead and this driver only performs the initial configuration.

use stm32f7xx_hal::i2c::{self, BlockingI2c};

use crate::hw::i2c::{I2cBus, I2cOps};

/// 7-bit I²C address.
pub const ADDR: u8 = 0x62;

// Register addresses
pub mod reg {
    pub const COMMAND: u8 = 0x00;
    pub const MODE_CONTROL: u8 = 0x04;
    pub const OUTER_LOOP_COUNT: u8 = 0x11;
    pub const MEASURE_DELAY: u8 = 0x45;
    /// High/low distance bytes with the auto-increment bit set.
    pub const DISTANCE: u8 = 0x8F;
}

/// COMMAND register values.
pub mod cmd {
    /// Acquire with receiver bias correction.
    pub const ACQUIRE_CORRECTED: u8 = 0x04;
}

/// LidarLite v2 driver bound to a fixed bus address.
pub struct LidarLite {
    addr: u8,
}

impl LidarLite {
    pub fn new() -> Self {
        Self { addr: ADDR }
    }

    /// Apply the power-on acquisition settings.
    pub fn configure<I2C, SCL, SDA>(&mut self, bus: &mut I2cBus<I2C, SCL, SDA>) -> Result<(), i2c::Error>
    where
        BlockingI2c<I2C, SCL, SDA>: I2cOps,
    {
        bus.write(self.addr, &[reg::COMMAND, cmd::ACQUIRE_CORRECTED])
    }

    /// Start free-running acquisition.
    ///
    /// An outer loop count of 0xFF repeats forever; the measurement delay
    /// keeps the default ~10 Hz rate. Each completed measurement pulls the
    /// mode line low until the distance registers are read.
    pub fn begin_continuous<I2C, SCL, SDA>(
        &mut self,
        bus: &mut I2cBus<I2C, SCL, SDA>,
    ) -> Result<(), i2c::Error>
    where
        BlockingI2c<I2C, SCL, SDA>: I2cOps,
    {
        bus.write(self.addr, &[reg::MEASURE_DELAY, 0x14])?;
        bus.write(self.addr, &[reg::OUTER_LOOP_COUNT, 0xFF])?;
        bus.write(self.addr, &[reg::COMMAND, cmd::ACQUIRE_CORRECTED])
    }

    /// Read the latest continuous-mode distance in centimeters.
    pub fn distance_continuous<I2C, SCL, SDA>(
        &mut self,
        bus: &mut I2cBus<I2C, SCL, SDA>,
    ) -> Result<u16, i2c::Error>
    where
        BlockingI2c<I2C, SCL, SDA>: I2cOps,
    {
        let mut raw = [0u8; 2];
        bus.write_read(self.addr, &[reg::DISTANCE], &mut raw)?;
        Ok(u16::from_be_bytes(raw))
    }
}

impl Default for LidarLite {
    fn default() -> Self {
        Self::new()
    }
}
