//! Low-level register and interface definitions for TCS34725

use embedded_hal::i2c::I2c;

/// Default I2C address of the TCS34725
pub const I2C_ADDRESS: u8 = 0x29;

/// Command bit that must be set in every register index sent to the device
pub const COMMAND_BIT: u8 = 0x80;

/// Register addresses
pub mod register {
    /// Enable states and interrupts
    pub const ENABLE: u8 = 0x00;
    /// RGBC integration time
    pub const ATIME: u8 = 0x01;
    /// Wait time
    pub const WTIME: u8 = 0x03;
    /// Clear interrupt low threshold, low byte
    pub const AILTL: u8 = 0x04;
    /// Clear interrupt low threshold, high byte
    pub const AILTH: u8 = 0x05;
    /// Clear interrupt high threshold, low byte
    pub const AIHTL: u8 = 0x06;
    /// Clear interrupt high threshold, high byte
    pub const AIHTH: u8 = 0x07;
    /// Interrupt persistence filter
    pub const PERS: u8 = 0x0C;
    /// Configuration
    pub const CONFIG: u8 = 0x0D;
    /// Gain control
    pub const CONTROL: u8 = 0x0F;
    /// Device ID
    pub const ID: u8 = 0x12;
    /// Device status
    pub const STATUS: u8 = 0x13;
    /// Clear channel data, low byte
    pub const CDATAL: u8 = 0x14;
    /// Red channel data, low byte
    pub const RDATAL: u8 = 0x16;
    /// Green channel data, low byte
    pub const GDATAL: u8 = 0x18;
    /// Blue channel data, low byte
    pub const BDATAL: u8 = 0x1A;
}

/// ENABLE register bits
pub mod enable {
    /// Power on
    pub const PON: u8 = 0x01;
    /// RGBC enable
    pub const AEN: u8 = 0x02;
    /// Wait enable
    pub const WEN: u8 = 0x08;
    /// RGBC interrupt enable
    pub const AIEN: u8 = 0x10;
}

/// STATUS register bits
pub mod status {
    /// RGBC integration cycle completed
    pub const AVALID: u8 = 0x01;
    /// RGBC clear channel interrupt pending
    pub const AINT: u8 = 0x10;
}

/// Special function code that clears a pending clear-channel interrupt
pub const CLEAR_INTERRUPT: u8 = 0x66;

/// Identification bytes of the silicon revisions accepted during init
pub const KNOWN_IDS: [u8; 3] = [0x44, 0x4D, 0x10];

/// Register transport bound to a single bus address
#[derive(Debug)]
pub(crate) struct Interface<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) address: u8,
}

impl<I2C: I2c> Interface<I2C> {
    pub(crate) fn write8(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c
            .write(self.address, &[COMMAND_BIT | register, value])
    }

    pub(crate) fn read8(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[COMMAND_BIT | register], &mut buffer)?;
        Ok(buffer[0])
    }

    /// Word read: low byte arrives first.
    pub(crate) fn read16(&mut self, register: u8) -> Result<u16, I2C::Error> {
        let mut buffer = [0u8; 2];
        self.i2c
            .write_read(self.address, &[COMMAND_BIT | register], &mut buffer)?;
        Ok(u16::from(buffer[1]) << 8 | u16::from(buffer[0]))
    }

    /// Send a bare command byte with no payload.
    pub(crate) fn command(&mut self, code: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[COMMAND_BIT | code])
    }
}
