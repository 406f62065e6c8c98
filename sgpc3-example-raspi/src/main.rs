use std::time::Instant;

use linux_embedded_hal::{Delay, I2cdev};
use sgpc3::{PowerMode, Sgpc3};

fn main() {
    let dev = I2cdev::new("/dev/i2c-1").unwrap();
    let start = Instant::now();
    let mut sgp = Sgpc3::new(dev, Delay, move || start.elapsed().as_millis() as u32);

    println!("Starting Sgpc3 tests.");

    match sgp.get_serial_id() {
        Ok(id) => println!("Serial id {:012x}", id),
        Err(e) => println!("Could not read serial id: {e}"),
    }

    if let Err(e) = sgp.initialize(PowerMode::Low) {
        println!("Could not initialize sensor: {e}");
        return;
    }
    println!(
        "Initialized, feature set {}, sampling every {} ms",
        sgp.feature_level(),
        sgp.power_mode().sampling_interval_ms()
    );

    println!("Taking 10 samples");
    for _ in 0..10 {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            sgp.power_mode().sampling_interval_ms(),
        )));
        match sgp.measure_tvoc_and_raw() {
            Ok(m) => println!("{:?}", m),
            Err(e) => println!("Error: {e}"),
        }
    }

    match sgp.get_tvoc_baseline() {
        Ok(baseline) => println!("Baseline {:#06x}, store it to restore after a reset", baseline),
        Err(e) => println!("Could not read baseline: {e}"),
    }

    println!("Switching to ultra-low power.");
    if let Err(e) = sgp.set_power_mode(PowerMode::UltraLow) {
        println!("Could not switch power mode: {e}");
    }
    loop {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            sgp.power_mode().sampling_interval_ms(),
        )));
        match sgp.measure() {
            Ok(tvoc) => println!("TVOC {} ppb", tvoc),
            Err(e) => println!("Error: {e}"),
        }
    }
}
