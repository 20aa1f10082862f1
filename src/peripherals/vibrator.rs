//! Control the vibration motor
//!
//! Implementation based upon https://github.com/tstellanova/cst816s/blob/master/examples/touchpad.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Output, peripherals::P0_16};
use embassy_time::Timer;

#[derive(Clone, Copy)]
/// Pulse length in milliseconds
pub enum PulseLength {
    /// 200ms pulse
    SHORT = 200,
}

pub struct Vibrator {
    /// Motor enable pin (inverted)
    pin_enable: Output<'static, P0_16>,
}

impl Vibrator {
    /// Configure vibrator on boot. The pin must start high (motor off).
    pub fn init(enable_pin: Output<'static, P0_16>) -> Self {
        Self {
            pin_enable: enable_pin,
        }
    }

    /// Pulse the vibrator `times` times with the given pulse length,
    /// pausing for the same length between pulses.
    pub async fn pulse(&mut self, length: PulseLength, times: u8) {
        for i in 0..times {
            if i > 0 {
                Timer::after_millis(length as u64).await;
            }
            self.pin_enable.set_low();
            Timer::after_millis(length as u64).await;
            self.pin_enable.set_high();
        }
    }
}
