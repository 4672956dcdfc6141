#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    i2c::{BlockingI2c, Mode},
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use terrapin::{
    config,
    control::{Ewma, Pid, SteeringLoop},
    drivers::Bno055,
    hw::{
        exti::{self, Edge},
        Adc, BoardPins, EdgeInput, I2cBus, Led, Micros, Millis, Pwm, Usart,
    },
    isr,
    protocol::{telemetry, Cadence, Record},
};

#[cfg(all(feature = "lidar", not(feature = "lidar-pwm")))]
use terrapin::drivers::LidarLite;
#[cfg(feature = "tuner")]
use terrapin::protocol::Tuner;

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb1 = rcc.apb1;

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);

    // LEDs: green blinks with encoder activity, red marks sensor trouble
    let mut led_status = Led::active_high(pins.leds.green);
    let mut led_error = Led::active_high(pins.leds.red);

    // USART3 to the host over the ST-LINK virtual COM port
    let usart_cfg = Config {
        baud_rate: config::SERIAL_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, usart_cfg);
    let mut usart = Usart::new(serial);

    // Timebases: ms for pacing, µs for pulse capture
    let millis = Millis::tim5(dp.TIM5, config::TIM_CLK_HZ);
    let _micros = Micros::tim2(dp.TIM2, config::TIM_CLK_HZ);

    // Steering PID with servo duty bounds and initial gains
    let pid = Pid::new(
        config::STEER_KP,
        config::STEER_KI,
        config::STEER_KD,
        config::INITIAL_SETPOINT,
        config::TIMESTEP_S,
    )
    .with_output_limits(0.0, 1.0);

    // I²C bus shared by the orientation sensor and the rangefinder
    let mut i2c = I2cBus::new(BlockingI2c::i2c1(
        dp.I2C1,
        (pins.i2c1.scl, pins.i2c1.sda),
        Mode::standard(100.kHz()),
        &clocks,
        &mut apb1,
        50_000,
    ));

    // Configure the LidarLite for continuous mode, which means that a new
    // measurement is available each time the mode line drops low.
    #[cfg(all(feature = "lidar", not(feature = "lidar-pwm")))]
    let mut lidar = {
        usart.println("Configuring lidar sensor");
        let mut lidar = LidarLite::new();
        if lidar.configure(&mut i2c).is_err() || lidar.begin_continuous(&mut i2c).is_err() {
            led_error.on();
            usart.println("lidar configuration failed");
        }
        lidar
    };

    // Bring the IMU out of reset; it reappears on the bus when ready.
    usart.println("Configuring IMU sensor");
    let mut imu = Bno055::new();
    imu.reset(&mut i2c);
    let mut failed_polls: u32 = 0;
    while !imu.ready(&mut i2c) {
        led_status.toggle();
        millis.delay_ms(config::IMU_POLL_INTERVAL_MS);
        failed_polls += 1;
        if failed_polls == config::IMU_POLL_DIAG_THRESHOLD {
            led_error.on();
            usart.println("IMU not responding; still retrying");
        }
    }
    led_status.off();
    led_error.off();
    if imu.set_mode_ndof(&mut i2c).is_err() {
        led_error.on();
        usart.println("IMU mode select failed");
    }

    // Actuator PWM: steering on CH1, throttle on CH2. The throttle channel
    // is wired but not yet driven; it idles at zero duty.
    let pwm = Pwm::tim4(dp.TIM4, config::TIM_CLK_HZ, config::PWM_PERIOD_US);
    let (steer_channel, mut throttle_channel) = pwm.split();
    throttle_channel.set_duty(0.0);

    let mut steering = SteeringLoop::new(pid, steer_channel);

    // First reading seeds the smoothed steering angle
    let adc = Adc::adc1(dp.ADC1);
    let mut angle = Ewma::new(config::SMOOTHING_ALPHA);
    angle.update(adc.read_normalized(config::STEER_POT_CHANNEL));

    // Initialize encoder channel b before its edges start arriving
    let mut enc_a = EdgeInput::new(pins.odometer.enc_a);
    let mut enc_b = EdgeInput::new(pins.odometer.enc_b);
    isr::seed_encoder_b(enc_b.read());

    // Attach edge interrupts: quadrature decoder channels a, b
    enc_a.enable_interrupt(&dp.SYSCFG, &dp.EXTI, Edge::Rising);
    enc_b.enable_interrupt(&dp.SYSCFG, &dp.EXTI, Edge::Both);
    exti::unmask(pac::Interrupt::EXTI3);
    exti::unmask(pac::Interrupt::EXTI4);

    // Rotating-mount build: range pulse plus bearing encoder
    #[cfg(feature = "lidar-pwm")]
    {
        let mut pulse = EdgeInput::new(pins.lidar.pulse);
        let mut rot_tick = EdgeInput::new(pins.lidar.rot_tick);
        let mut rot_index = EdgeInput::new(pins.lidar.rot_index);
        pulse.enable_interrupt(&dp.SYSCFG, &dp.EXTI, Edge::Both);
        rot_tick.enable_interrupt(&dp.SYSCFG, &dp.EXTI, Edge::Rising);
        rot_index.enable_interrupt(&dp.SYSCFG, &dp.EXTI, Edge::Rising);
        exti::unmask(pac::Interrupt::EXTI9_5);
    }

    #[cfg(feature = "tuner")]
    let mut tuner = Tuner::new(config::STEER_KP, config::STEER_KI, config::STEER_KD);

    let mut cadence = Cadence::new(config::TIMESTEP_MS);
    let mut cal = Default::default();
    let mut quat = Default::default();
    #[allow(unused_mut)]
    let mut range: u32 = 0;
    // TODO: bearing stays 0 on the I²C build; it needs the rotating-mount
    // encoder that only the lidar-pwm wiring provides.
    #[allow(unused_mut)]
    let mut bearing: u16 = 0;

    usart.println("Beginning loop");

    loop {
        let smoothed = angle.update(adc.read_normalized(config::STEER_POT_CHANNEL));

        // Drain at most one tuning byte per cycle
        #[cfg(feature = "tuner")]
        if let Some(byte) = usart.try_read() {
            tuner.push(byte, steering.pid_mut(), &mut usart);
        }

        steering.step(smoothed);

        // Latch the freshest range measurement
        #[cfg(all(feature = "lidar", not(feature = "lidar-pwm")))]
        if pins.lidar.mode.is_low() {
            if let Ok(cm) = lidar.distance_continuous(&mut i2c) {
                range = cm as u32;
            }
        }
        #[cfg(feature = "lidar-pwm")]
        if let Some(width_us) = isr::take_pulse_width_us() {
            // Pulse width in µs is the range in mm
            range = width_us;
            bearing =
                telemetry::bearing_from_ticks(isr::rotation_ticks(), config::TICKS_PER_REVOLUTION);
        }

        // Sensor errors leave the previous values in place
        if let Ok(c) = imu.read_calibration(&mut i2c) {
            cal = c;
        }
        if let Ok(q) = imu.read_quaternion(&mut i2c) {
            quat = q;
        }

        let now = millis.ms();
        if cadence.due(now) {
            let record = Record {
                t_ms: now,
                cal,
                quat,
                steer_angle: smoothed,
                odometer: isr::encoder_position(),
                range,
                bearing,
            };
            let _ = telemetry::write_record(&mut usart, &record);
        }
    }
}
