pub mod adc;
pub mod clock;
pub mod exti;
pub mod i2c;
pub mod led;
pub mod pins;
pub mod pwm;
pub mod usart;

pub use adc::Adc;
pub use clock::{Micros, Millis};
pub use exti::EdgeInput;
pub use i2c::I2cBus;
pub use led::Led;
pub use pins::BoardPins;
pub use pwm::{Pwm, PwmChannel};
pub use usart::Usart;
