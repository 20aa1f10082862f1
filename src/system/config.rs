//! General system configuration

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::{self, InterruptExt, Priority},
};
use embassy_time::Duration;

/// Local time zone, seconds east of UTC
pub const TIMEZONE_OFFSET: i32 = 3_600;

/// How often the battery is sampled
pub const BATTERY_SAMPLE_PERIOD: Duration = Duration::from_secs(10);

/// Vibration pulses fired when the Bluetooth link drops
pub const ALERT_PULSES: u8 = 2;

/// Backlight level while the watchface is shown (0 to 7)
pub const BACKLIGHT_LEVEL: u8 = 2;

/// Levels 0, 1 and 4 belong to the SoftDevice
const DRIVER_PRIORITY: Priority = Priority::P2;
const PERIPHERAL_PRIORITY: Priority = Priority::P3;

pub struct SystemConfig {}

impl SystemConfig {
    /// embassy-nrf configuration for a PineTime running the SoftDevice
    pub fn new() -> Config {
        let mut config = Config::default();

        // 32 MHz and 32.768 kHz crystals are both fitted
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;
        config.dcdc.reg1 = true;

        config.gpiote_interrupt_priority = DRIVER_PRIORITY;
        config.time_interrupt_priority = DRIVER_PRIORITY;

        config.debug = Debug::Allowed;
        config
    }

    /// Move the interrupts of the peripherals the firmware drives
    /// (battery ADC, display SPI) off the SoftDevice levels.
    pub fn prioritize_peripherals() {
        interrupt::SAADC.set_priority(PERIPHERAL_PRIORITY);
        interrupt::SPIM2_SPIS2_SPI2.set_priority(PERIPHERAL_PRIORITY);
    }
}
