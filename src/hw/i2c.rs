// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! I²C bus abstraction layer.
//!
//! `I2cBus` wraps a configured HAL `BlockingI2c` instance. The orientation sensor and the
//! rangefinder share the bus; both are only ever accessed from the foreground loop, so no
//! arbitration is needed beyond the peripheral's own state machine.

use embedded_hal::blocking::i2c::{Read, Write, WriteRead};
use stm32f7xx_hal::i2c::{self, BlockingI2c};

/// Alias for the blocking bus operations the drivers rely on. Implemented by
/// every `BlockingI2c` instance/pin combination the HAL supports.
pub trait I2cOps:
    Write<Error = i2c::Error> + Read<Error = i2c::Error> + WriteRead<Error = i2c::Error>
{
}

impl<T> I2cOps for T where
    T: Write<Error = i2c::Error> + Read<Error = i2c::Error> + WriteRead<Error = i2c::Error>
{
}

/// Wrapper around a blocking HAL I²C instance.
pub struct I2cBus<I2C, SCL, SDA> {
    i2c: BlockingI2c<I2C, SCL, SDA>,
}

impl<I2C, SCL, SDA> I2cBus<I2C, SCL, SDA>
where
    BlockingI2c<I2C, SCL, SDA>: I2cOps,
{
    pub fn new(i2c: BlockingI2c<I2C, SCL, SDA>) -> Self {
        Self { i2c }
    }

    /// Write `bytes` to the device at `addr`.
    #[inline]
    pub fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), i2c::Error> {
        self.i2c.write(addr, bytes)
    }

    /// Read `buf.len()` bytes from the device at `addr`.
    #[inline]
    pub fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), i2c::Error> {
        self.i2c.read(addr, buf)
    }

    /// Write `bytes`, then read `buf.len()` bytes in one transaction.
    #[inline]
    pub fn write_read(&mut self, addr: u8, bytes: &[u8], buf: &mut [u8]) -> Result<(), i2c::Error> {
        self.i2c.write_read(addr, bytes, buf)
    }

    pub fn free(self) -> BlockingI2c<I2C, SCL, SDA> {
        self.i2c
    }
}
