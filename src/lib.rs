//! # TCS34725 RGB and Clear Light Sensor Driver
//!
//! This is a platform-agnostic Rust driver for the TCS34725 family of colour sensors,
//! built using the [`embedded-hal`] traits for I2C communication and blocking delays.
//!
//! The TCS34725 provides:
//! - Clear, Red, Green and Blue 16-bit channels
//! - Programmable gain (1x to 60x)
//! - Programmable integration time (2.4ms to 614ms)
//! - A clear-channel threshold interrupt
//! - I2C interface (address 0x29)
//!
//! ## Features
//!
//! - **Fail-soft measurement API**: an absent or unrecognised sensor reads as zero
//! - **Lazy initialization** on the first measurement
//! - **Normalized RGB** as a packed integer, a hex string or a triple
//! - **Nearest named colour** from a 16-entry palette
//! - **Colour temperature** and **lux** estimation
//! - **Interrupt threshold** configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tcs34725::{Gain, IntegrationTime, Tcs34725};
//!
//! # fn main() {
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let delay = embedded_hal_mock::eh1::delay::NoopDelay::new();
//! let mut sensor = Tcs34725::new(i2c, delay);
//!
//! // Settings made before init are applied during init
//! sensor.set_gain(Gain::X16);
//! sensor.set_integration_time(IntegrationTime::Ms101);
//!
//! if !sensor.init() {
//!     // Measurements will read as zero until a later init succeeds
//! }
//!
//! let rgb = sensor.rgb();
//! let name = sensor.color_name();
//! let cct = sensor.color_temperature();
//! let lux = sensor.illuminance();
//! // println!("{} ({}) {}K {} lux", rgb, name, cct, lux);
//! # let _ = (rgb, name, cct, lux);
//! # }
//! ```
//!
//! Every measurement call performs a full acquisition and blocks for the configured
//! integration time. Derivations can also be applied to a single
//! [`RawSample`] with the functions in [`color`].
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![no_std]
#![deny(missing_docs)]

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub mod color;
pub mod ll;

pub use color::{ColorName, Rgb};
pub use ll::I2C_ADDRESS;

use ll::{enable, register, status, Interface, CLEAR_INTERRUPT, KNOWN_IDS};

/// Settle time after power-on before the device accepts further commands
const POWER_ON_DELAY_MS: u32 = 3;

/// RGBC integration time settings
///
/// The discriminant is the ATIME register code. Larger codes mean shorter
/// integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum IntegrationTime {
    /// 2.4ms, 1 cycle
    Ms2_4 = 0xFF,
    /// 24ms, 10 cycles
    Ms24 = 0xF6,
    /// 50ms, 21 cycles
    Ms50 = 0xEB,
    /// 101ms, 42 cycles
    Ms101 = 0xD6,
    /// 154ms, 64 cycles
    #[default]
    Ms154 = 0xC0,
    /// 614ms, 256 cycles
    Ms614 = 0x00,
}

impl IntegrationTime {
    /// Time in milliseconds to wait for a full integration cycle after
    /// enabling the ADC or reading a sample.
    pub const fn settle_ms(self) -> u32 {
        (256 - self as u32) * 12 / 5 + 1
    }
}

/// Analog gain settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Gain {
    /// 1x gain
    X1 = 0x00,
    /// 4x gain
    #[default]
    X4 = 0x01,
    /// 16x gain
    X16 = 0x02,
    /// 60x gain
    X60 = 0x03,
}

/// Acquisition settings held by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SensorConfig {
    /// Integration time written to ATIME
    pub integration_time: IntegrationTime,
    /// Gain written to CONTROL
    pub gain: Gain,
    /// 7-bit I2C address
    pub address: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            integration_time: IntegrationTime::default(),
            gain: Gain::default(),
            address: I2C_ADDRESS,
        }
    }
}

/// Raw channel counts from one acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct RawSample {
    /// Clear (unfiltered) channel
    pub clear: u16,
    /// Red channel
    pub red: u16,
    /// Green channel
    pub green: u16,
    /// Blue channel
    pub blue: u16,
}

/// All possible errors in this crate
///
/// Only [`Tcs34725::try_init`] and [`Tcs34725::device_id`] report errors.
/// The measurement API degrades to zero values instead.
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C communication error
    I2c(E),
    /// Identification register did not match a known part
    InvalidDeviceId {
        /// Found device ID
        found: u8,
    },
}

/// High-level TCS34725 driver
pub struct Tcs34725<I2C, D> {
    iface: Interface<I2C>,
    delay: D,
    config: SensorConfig,
    initialized: bool,
    powered: bool,
}

impl<I2C, E, D> Tcs34725<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Create a driver on the default address. No bus traffic happens until
    /// [`init`](Self::init) or the first measurement.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::new_with_address(i2c, delay, I2C_ADDRESS)
    }

    /// Create a driver on a custom 7-bit address
    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Self {
        let config = SensorConfig {
            address: address & 0x7F,
            ..SensorConfig::default()
        };
        Self {
            iface: Interface {
                i2c,
                address: config.address,
            },
            delay,
            config,
            initialized: false,
            powered: false,
        }
    }

    /// Identify and power up the sensor. Returns whether it was accepted.
    pub fn init(&mut self) -> bool {
        match self.try_init() {
            Ok(()) => true,
            #[cfg(feature = "defmt-03")]
            Err(Error::InvalidDeviceId { found }) => {
                defmt::warn!("tcs34725: unknown device id {=u8:#x}", found);
                false
            }
            #[cfg(not(feature = "defmt-03"))]
            Err(Error::InvalidDeviceId { .. }) => false,
            Err(Error::I2c(_)) => {
                #[cfg(feature = "defmt-03")]
                defmt::warn!("tcs34725: bus error during init");
                false
            }
        }
    }

    /// Identify and power up the sensor, reporting why it failed.
    ///
    /// Powers the device on, reads the ID register and, if it is a known
    /// revision, applies the stored integration time and gain and enables the
    /// ADC. An unknown ID stops the sequence before any configuration write.
    /// Any failure leaves the driver uninitialized.
    pub fn try_init(&mut self) -> Result<(), Error<E>> {
        let result = self.identify_and_configure();
        self.initialized = result.is_ok();
        result
    }

    fn identify_and_configure(&mut self) -> Result<(), Error<E>> {
        self.write_register(register::ENABLE, enable::PON)?;
        self.delay.delay_ms(POWER_ON_DELAY_MS);

        let id = self.read_register(register::ID)?;
        if !KNOWN_IDS.contains(&id) {
            return Err(Error::InvalidDeviceId { found: id });
        }

        self.write_register(register::ATIME, self.config.integration_time as u8)?;
        self.write_register(register::CONTROL, self.config.gain as u8)?;
        self.enable()?;

        #[cfg(feature = "defmt-03")]
        defmt::debug!(
            "tcs34725: id {=u8:#x}, {}, {}",
            id,
            self.config.integration_time,
            self.config.gain
        );

        Ok(())
    }

    /// Initialize on demand. True if the sensor is usable.
    pub fn ensure_init(&mut self) -> bool {
        self.initialized || self.init()
    }

    /// Power on, then start the ADC and wait one integration cycle.
    ///
    /// This writes the ENABLE register unconditionally; it does not check
    /// identification.
    pub fn enable(&mut self) -> Result<(), Error<E>> {
        self.write_register(register::ENABLE, enable::PON)?;
        self.delay.delay_ms(POWER_ON_DELAY_MS);
        self.write_register(register::ENABLE, enable::PON | enable::AEN)?;
        self.delay.delay_ms(self.config.integration_time.settle_ms());
        self.powered = true;
        Ok(())
    }

    /// Put the sensor to sleep by clearing PON and AEN.
    ///
    /// The driver stays initialized. The next acquisition runs
    /// [`enable`](Self::enable) again before reading.
    pub fn disable(&mut self) {
        if !self.ensure_init() {
            return;
        }
        let result = self.read_register(register::ENABLE).and_then(|ctrl| {
            self.write_register(register::ENABLE, ctrl & !(enable::PON | enable::AEN))
        });
        if result.is_ok() {
            self.powered = false;
        }
        self.drop_error(result);
    }

    /// Set the integration time. Written to the device now if it is
    /// initialized, otherwise applied by the next init.
    pub fn set_integration_time(&mut self, integration_time: IntegrationTime) {
        self.config.integration_time = integration_time;
        if self.initialized {
            let result = self.write_register(register::ATIME, integration_time as u8);
            self.drop_error(result);
        }
    }

    /// Set the analog gain. Written to the device now if it is initialized,
    /// otherwise applied by the next init.
    pub fn set_gain(&mut self, gain: Gain) {
        self.config.gain = gain;
        if self.initialized {
            let result = self.write_register(register::CONTROL, gain as u8);
            self.drop_error(result);
        }
    }

    /// Enable or disable the clear-channel interrupt, keeping the other
    /// ENABLE bits.
    pub fn set_interrupt(&mut self, enabled: bool) {
        if !self.ensure_init() {
            return;
        }
        let result = self.read_register(register::ENABLE).and_then(|ctrl| {
            let ctrl = if enabled {
                ctrl | enable::AIEN
            } else {
                ctrl & !enable::AIEN
            };
            self.write_register(register::ENABLE, ctrl)
        });
        self.drop_error(result);
    }

    /// Clear a pending clear-channel interrupt
    pub fn clear_interrupt(&mut self) {
        if !self.ensure_init() {
            return;
        }
        let result = self.iface.command(CLEAR_INTERRUPT).map_err(Error::I2c);
        self.drop_error(result);
    }

    /// Set the clear-channel thresholds outside of which the interrupt fires
    pub fn set_interrupt_limits(&mut self, low: u16, high: u16) {
        if !self.ensure_init() {
            return;
        }
        let [low_lo, low_hi] = low.to_le_bytes();
        let [high_lo, high_hi] = high.to_le_bytes();
        let result = self
            .write_register(register::AILTL, low_lo)
            .and_then(|()| self.write_register(register::AILTH, low_hi))
            .and_then(|()| self.write_register(register::AIHTL, high_lo))
            .and_then(|()| self.write_register(register::AIHTH, high_hi));
        self.drop_error(result);
    }

    /// Check whether an integration cycle has completed since the ADC was
    /// enabled. False if the sensor is unavailable.
    pub fn is_data_valid(&mut self) -> bool {
        self.read_status() & status::AVALID != 0
    }

    /// Check whether the clear-channel interrupt is pending. False if the
    /// sensor is unavailable.
    pub fn is_interrupt_pending(&mut self) -> bool {
        self.read_status() & status::AINT != 0
    }

    fn read_status(&mut self) -> u8 {
        if !self.ensure_init() {
            return 0;
        }
        let result = self.read_register(register::STATUS);
        match result {
            Ok(value) => value,
            Err(e) => {
                self.drop_error::<()>(Err(e));
                0
            }
        }
    }

    /// Acquire all four channels.
    ///
    /// Reads clear, red, green and blue in that order and then waits one
    /// integration cycle so that the next call sees a fresh sample. Returns
    /// the zero sample if the sensor is unavailable or a read fails. A sensor
    /// put to sleep with [`disable`](Self::disable) is woken first.
    pub fn read_raw_sample(&mut self) -> RawSample {
        if !self.ensure_init() {
            return RawSample::default();
        }

        if !self.powered {
            if let Err(e) = self.enable() {
                self.drop_error::<()>(Err(e));
                return RawSample::default();
            }
        }

        match self.read_channels() {
            Ok(sample) => {
                self.delay
                    .delay_ms(self.config.integration_time.settle_ms());
                sample
            }
            Err(e) => {
                self.drop_error::<()>(Err(e));
                RawSample::default()
            }
        }
    }

    fn read_channels(&mut self) -> Result<RawSample, Error<E>> {
        let clear = self.read_word(register::CDATAL)?;
        let red = self.read_word(register::RDATAL)?;
        let green = self.read_word(register::GDATAL)?;
        let blue = self.read_word(register::BDATAL)?;

        Ok(RawSample {
            clear,
            red,
            green,
            blue,
        })
    }

    /// Raw clear channel from a fresh acquisition
    pub fn raw_clear(&mut self) -> u16 {
        self.read_raw_sample().clear
    }

    /// Raw red channel from a fresh acquisition
    pub fn raw_red(&mut self) -> u16 {
        self.read_raw_sample().red
    }

    /// Raw green channel from a fresh acquisition
    pub fn raw_green(&mut self) -> u16 {
        self.read_raw_sample().green
    }

    /// Raw blue channel from a fresh acquisition
    pub fn raw_blue(&mut self) -> u16 {
        self.read_raw_sample().blue
    }

    /// Normalized colour from a fresh acquisition. Black if the sensor is
    /// unavailable.
    pub fn rgb(&mut self) -> Rgb {
        color::normalize(&self.read_raw_sample())
    }

    /// Closest palette colour from a fresh acquisition
    pub fn color_name(&mut self) -> ColorName {
        color::nearest_color(self.rgb())
    }

    /// Correlated colour temperature in Kelvin from a fresh acquisition
    pub fn color_temperature(&mut self) -> u32 {
        color::color_temperature(&self.read_raw_sample())
    }

    /// Illuminance in lux from a fresh acquisition
    pub fn illuminance(&mut self) -> u32 {
        color::illuminance(&self.read_raw_sample())
    }

    /// Read the identification register
    pub fn device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_register(register::ID)
    }

    /// Current acquisition settings
    pub fn config(&self) -> SensorConfig {
        self.config
    }

    /// 7-bit I2C address the driver talks to
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Whether the last init identified the device
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Destroy the driver and return the I2C interface and delay
    pub fn destroy(self) -> (I2C, D) {
        (self.iface.i2c, self.delay)
    }

    // Helper methods for register access
    fn read_register(&mut self, address: u8) -> Result<u8, Error<E>> {
        self.iface.read8(address).map_err(Error::I2c)
    }

    fn read_word(&mut self, address: u8) -> Result<u16, Error<E>> {
        self.iface.read16(address).map_err(Error::I2c)
    }

    fn write_register(&mut self, address: u8, value: u8) -> Result<(), Error<E>> {
        self.iface.write8(address, value).map_err(Error::I2c)
    }

    fn drop_error<T>(&self, result: Result<T, Error<E>>) {
        if result.is_err() {
            #[cfg(feature = "defmt-03")]
            defmt::warn!("tcs34725: bus error ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    extern crate std;
    use std::vec;
    use std::vec::Vec;

    /// Records every requested delay in milliseconds
    #[derive(Debug, Default)]
    struct RecordingDelay {
        delays_ms: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.delays_ms.push(ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delays_ms.push(ms);
        }
    }

    fn write8(register: u8, value: u8) -> I2cTransaction {
        I2cTransaction::write(I2C_ADDRESS, vec![0x80 | register, value])
    }

    fn read8(register: u8, value: u8) -> I2cTransaction {
        I2cTransaction::write_read(I2C_ADDRESS, vec![0x80 | register], vec![value])
    }

    fn read16(register: u8, value: u16) -> I2cTransaction {
        I2cTransaction::write_read(
            I2C_ADDRESS,
            vec![0x80 | register],
            value.to_le_bytes().to_vec(),
        )
    }

    /// Successful init with the given stored settings
    fn init_sequence(atime: u8, gain: u8) -> Vec<I2cTransaction> {
        init_sequence_with_id(0x44, atime, gain)
    }

    fn init_sequence_with_id(id: u8, atime: u8, gain: u8) -> Vec<I2cTransaction> {
        vec![
            write8(register::ENABLE, 0x01),
            read8(register::ID, id),
            write8(register::ATIME, atime),
            write8(register::CONTROL, gain),
            write8(register::ENABLE, 0x01),
            write8(register::ENABLE, 0x03),
        ]
    }

    /// Init attempt against a device that does not identify
    fn failed_init_sequence() -> Vec<I2cTransaction> {
        vec![
            write8(register::ENABLE, 0x01),
            read8(register::ID, 0x00),
        ]
    }

    fn channel_reads(clear: u16, red: u16, green: u16, blue: u16) -> Vec<I2cTransaction> {
        vec![
            read16(register::CDATAL, clear),
            read16(register::RDATAL, red),
            read16(register::GDATAL, green),
            read16(register::BDATAL, blue),
        ]
    }

    fn initialized_sensor(
        extra: Vec<I2cTransaction>,
    ) -> Tcs34725<I2cMock, RecordingDelay> {
        let mut expectations = init_sequence(0xC0, 0x01);
        expectations.extend(extra);
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());
        assert!(sensor.init());
        sensor
    }

    fn finish(sensor: Tcs34725<I2cMock, RecordingDelay>) -> Vec<u32> {
        let (mut i2c, delay) = sensor.destroy();
        i2c.done();
        delay.delays_ms
    }

    #[test]
    fn test_device_creation() {
        let expectations = [];
        let i2c = I2cMock::new(&expectations);
        let sensor = Tcs34725::new(i2c, RecordingDelay::default());
        assert!(!sensor.is_initialized());
        assert_eq!(sensor.config(), SensorConfig::default());
        assert!(finish(sensor).is_empty());
    }

    #[test]
    fn test_settle_delays() {
        let expected = [
            (IntegrationTime::Ms2_4, 3),
            (IntegrationTime::Ms24, 25),
            (IntegrationTime::Ms50, 51),
            (IntegrationTime::Ms101, 101),
            (IntegrationTime::Ms154, 154),
            (IntegrationTime::Ms614, 615),
        ];
        for (integration_time, settle_ms) in expected {
            assert_eq!(integration_time.settle_ms(), settle_ms);
        }
    }

    #[test]
    fn test_init_sequence() {
        let sensor = initialized_sensor(vec![]);
        assert!(sensor.is_initialized());
        assert_eq!(finish(sensor), vec![3, 3, 154]);
    }

    #[test]
    fn test_init_accepts_known_revisions() {
        for id in KNOWN_IDS {
            let expectations = init_sequence_with_id(id, 0xC0, 0x01);
            let i2c = I2cMock::new(&expectations);
            let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());
            assert!(sensor.init(), "id {id:#x} rejected");
            finish(sensor);
        }
    }

    #[test]
    fn test_init_rejects_unknown_device() {
        let i2c = I2cMock::new(&failed_init_sequence());
        let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());

        match sensor.try_init() {
            Err(Error::InvalidDeviceId { found }) => assert_eq!(found, 0x00),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(!sensor.is_initialized());
        assert_eq!(finish(sensor), vec![3]);
    }

    #[test]
    fn test_init_bus_error() {
        let expectations = [
            write8(register::ENABLE, 0x01),
            read8(register::ID, 0x00).with_error(ErrorKind::Other),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());

        assert!(matches!(sensor.try_init(), Err(Error::I2c(ErrorKind::Other))));
        assert!(!sensor.is_initialized());
        finish(sensor);
    }

    #[test]
    fn test_failed_reinit_clears_initialized() {
        let mut sensor = initialized_sensor(failed_init_sequence());
        assert!(!sensor.init());
        assert!(!sensor.is_initialized());
        finish(sensor);
    }

    #[test]
    fn test_settings_before_init_are_deferred() {
        let i2c = I2cMock::new(&init_sequence(0xF6, 0x02));
        let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());

        sensor.set_gain(Gain::X16);
        sensor.set_integration_time(IntegrationTime::Ms24);
        assert!(sensor.init());

        assert_eq!(sensor.config().gain, Gain::X16);
        assert_eq!(sensor.config().integration_time, IntegrationTime::Ms24);
        assert_eq!(finish(sensor), vec![3, 3, 25]);
    }

    #[test]
    fn test_set_gain_twice_is_idempotent() {
        let mut sensor = initialized_sensor(vec![
            write8(register::CONTROL, 0x03),
            write8(register::CONTROL, 0x03),
        ]);

        sensor.set_gain(Gain::X60);
        let config = sensor.config();
        sensor.set_gain(Gain::X60);

        assert_eq!(sensor.config(), config);
        assert_eq!(config.gain, Gain::X60);
        finish(sensor);
    }

    #[test]
    fn test_set_integration_time_when_live() {
        let mut sensor = initialized_sensor(vec![write8(register::ATIME, 0x00)]);
        sensor.set_integration_time(IntegrationTime::Ms614);
        assert_eq!(sensor.config().integration_time, IntegrationTime::Ms614);
        finish(sensor);
    }

    #[test]
    fn test_read_raw_sample() {
        let mut sensor = initialized_sensor(channel_reads(0x1234, 0x0102, 0xA0B0, 0xFFFF));

        let sample = sensor.read_raw_sample();
        assert_eq!(
            sample,
            RawSample {
                clear: 0x1234,
                red: 0x0102,
                green: 0xA0B0,
                blue: 0xFFFF,
            }
        );
        assert_eq!(finish(sensor), vec![3, 3, 154, 154]);
    }

    #[test]
    fn test_read_raw_sample_bus_error_returns_zero() {
        let mut sensor = initialized_sensor(vec![
            read16(register::CDATAL, 100),
            read16(register::RDATAL, 0).with_error(ErrorKind::Other),
        ]);

        assert_eq!(sensor.read_raw_sample(), RawSample::default());
        // No settle wait after a failed acquisition
        assert_eq!(finish(sensor), vec![3, 3, 154]);
    }

    #[test]
    fn test_each_raw_channel_reacquires() {
        let mut extra = channel_reads(10, 20, 30, 40);
        extra.extend(channel_reads(11, 21, 31, 41));
        extra.extend(channel_reads(12, 22, 32, 42));
        extra.extend(channel_reads(13, 23, 33, 43));
        let mut sensor = initialized_sensor(extra);

        assert_eq!(sensor.raw_clear(), 10);
        assert_eq!(sensor.raw_red(), 21);
        assert_eq!(sensor.raw_green(), 32);
        assert_eq!(sensor.raw_blue(), 43);
        assert_eq!(finish(sensor), vec![3, 3, 154, 154, 154, 154, 154]);
    }

    #[test]
    fn test_measurements() {
        let mut extra = channel_reads(3000, 1200, 900, 1000);
        extra.extend(channel_reads(100, 100, 0, 0));
        extra.extend(channel_reads(3000, 1000, 1200, 900));
        extra.extend(channel_reads(0, 0, 100, 0));
        let mut sensor = initialized_sensor(extra);

        let rgb = sensor.rgb();
        assert_eq!(rgb, Rgb::new(102, 77, 85));
        assert_eq!(rgb.to_packed(), 0x664D55);
        assert_eq!(rgb.to_hex().as_str(), "#664D55");
        assert_eq!(sensor.color_name(), ColorName::Red);
        assert_eq!(sensor.color_temperature(), 5217);
        assert_eq!(sensor.illuminance(), 158);
        finish(sensor);
    }

    #[test]
    fn test_absent_sensor_reads_as_zero() {
        let mut expectations = Vec::new();
        for _ in 0..5 {
            expectations.extend(failed_init_sequence());
        }
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());

        assert_eq!(sensor.raw_red(), 0);
        assert_eq!(sensor.rgb().to_hex().as_str(), "#000000");
        assert_eq!(sensor.color_name(), ColorName::Black);
        assert_eq!(sensor.color_temperature(), 0);
        assert_eq!(sensor.illuminance(), 0);
        assert!(!sensor.is_initialized());
        // Only the power-on settle of each init attempt
        assert_eq!(finish(sensor), vec![3; 5]);
    }

    #[test]
    fn test_lazy_init_on_first_read() {
        let mut expectations = init_sequence(0xC0, 0x01);
        expectations.extend(channel_reads(1, 2, 3, 4));
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());

        assert_eq!(sensor.raw_blue(), 4);
        assert!(sensor.is_initialized());
        finish(sensor);
    }

    #[test]
    fn test_set_interrupt_preserves_other_bits() {
        let mut sensor = initialized_sensor(vec![
            read8(register::ENABLE, 0x03),
            write8(register::ENABLE, 0x13),
            read8(register::ENABLE, 0x1B),
            write8(register::ENABLE, 0x0B),
        ]);

        sensor.set_interrupt(true);
        sensor.set_interrupt(false);
        finish(sensor);
    }

    #[test]
    fn test_clear_interrupt() {
        let mut sensor = initialized_sensor(vec![I2cTransaction::write(I2C_ADDRESS, vec![0xE6])]);
        sensor.clear_interrupt();
        finish(sensor);
    }

    #[test]
    fn test_set_interrupt_limits() {
        let mut sensor = initialized_sensor(vec![
            write8(register::AILTL, 0x34),
            write8(register::AILTH, 0x12),
            write8(register::AIHTL, 0xCD),
            write8(register::AIHTH, 0xAB),
        ]);
        sensor.set_interrupt_limits(0x1234, 0xABCD);
        finish(sensor);
    }

    #[test]
    fn test_interrupt_ops_skip_absent_sensor() {
        let mut expectations = Vec::new();
        for _ in 0..3 {
            expectations.extend(failed_init_sequence());
        }
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());

        sensor.set_interrupt(true);
        sensor.clear_interrupt();
        sensor.set_interrupt_limits(10, 1000);
        finish(sensor);
    }

    #[test]
    fn test_status_bits() {
        let mut sensor = initialized_sensor(vec![
            read8(register::STATUS, 0x11),
            read8(register::STATUS, 0x01),
        ]);
        assert!(sensor.is_data_valid());
        assert!(!sensor.is_interrupt_pending());
        finish(sensor);
    }

    #[test]
    fn test_interrupt_pending() {
        let mut sensor = initialized_sensor(vec![
            read8(register::STATUS, 0x11),
            read8(register::STATUS, 0x10),
        ]);
        assert!(sensor.is_interrupt_pending());
        assert!(!sensor.is_data_valid());
        finish(sensor);
    }

    #[test]
    fn test_status_of_absent_sensor() {
        let mut expectations = failed_init_sequence();
        expectations.extend(failed_init_sequence());
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tcs34725::new(i2c, RecordingDelay::default());

        assert!(!sensor.is_data_valid());
        assert!(!sensor.is_interrupt_pending());
        finish(sensor);
    }

    #[test]
    fn test_disable_clears_power_bits() {
        let mut sensor = initialized_sensor(vec![
            read8(register::ENABLE, 0x13),
            write8(register::ENABLE, 0x10),
        ]);
        sensor.disable();
        assert!(sensor.is_initialized());
        finish(sensor);
    }

    #[test]
    fn test_read_after_disable_wakes_sensor() {
        let mut extra = vec![
            read8(register::ENABLE, 0x03),
            write8(register::ENABLE, 0x00),
            write8(register::ENABLE, 0x01),
            write8(register::ENABLE, 0x03),
        ];
        extra.extend(channel_reads(40, 10, 20, 30));
        extra.extend(channel_reads(41, 11, 21, 31));
        let mut sensor = initialized_sensor(extra);

        sensor.disable();
        assert_eq!(sensor.raw_clear(), 40);
        // Already awake, no second power-up
        assert_eq!(sensor.raw_red(), 11);
        assert_eq!(finish(sensor), vec![3, 3, 154, 3, 154, 154, 154]);
    }

    #[test]
    fn test_custom_address() {
        let expectations = [I2cTransaction::write_read(0x39, vec![0x92], vec![0x4D])];
        let i2c = I2cMock::new(&expectations);
        let mut sensor = Tcs34725::new_with_address(i2c, RecordingDelay::default(), 0x39);

        assert_eq!(sensor.config().address, 0x39);
        assert_eq!(sensor.address(), 0x39);
        assert_eq!(sensor.device_id().unwrap(), 0x4D);
        finish(sensor);
    }
}
