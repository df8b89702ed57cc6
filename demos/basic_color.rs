//! Basic colour sensor reading example
//!
//! This example demonstrates how to:
//! - Initialize the TCS34725 sensor
//! - Configure gain and integration time
//! - Read raw channel counts
//! - Derive RGB, the nearest named colour, colour temperature and lux

use tcs34725::{color, Gain, IntegrationTime, Tcs34725};

// This example uses linux-embedded-hal for demonstration
// Replace with your platform's I2C implementation
use linux_embedded_hal::{Delay, I2cdev};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize I2C interface
    let i2c = I2cdev::new("/dev/i2c-1")?;

    // Create sensor instance
    let mut sensor = Tcs34725::new(i2c, Delay);

    // Configure sensor settings, applied during init
    sensor.set_gain(Gain::X4);
    sensor.set_integration_time(IntegrationTime::Ms101);

    println!("Initializing TCS34725 sensor...");

    if let Err(e) = sensor.try_init() {
        println!("Sensor not available ({e:?}), readings will be zero");
    }

    println!("Starting measurements, press Ctrl+C to exit\n");

    loop {
        // One acquisition, several derivations
        let sample = sensor.read_raw_sample();
        let rgb = color::normalize(&sample);

        println!(
            "C: {:5} R: {:5} G: {:5} B: {:5} | {} {:<10} | CCT: {:5}K | Lux: {:5}",
            sample.clear,
            sample.red,
            sample.green,
            sample.blue,
            rgb,
            color::nearest_color(rgb),
            color::color_temperature(&sample),
            color::illuminance(&sample),
        );

        std::thread::sleep(std::time::Duration::from_millis(1000));
    }
}
