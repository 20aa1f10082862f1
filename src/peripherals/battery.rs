//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};
use pinetime_watchface::BatteryState;

/// Battery API
pub struct Battery {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'static, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'static, P0_12>,
}

impl Battery {
    /// Configure battery settings on boot
    pub fn init(adc: Saadc<'static, 1>, charge_pin: Input<'static, P0_12>) -> Self {
        Self {
            adc,
            pin_charge_indication: charge_pin,
        }
    }

    /// Charging state of the battery
    pub fn is_charging(&self) -> bool {
        self.pin_charge_indication.is_low()
    }

    /// Read voltage and charger pin in one go.
    pub async fn sample(&mut self) -> Result<BatteryState, Error> {
        let millivolts = self.voltage().await?;
        Ok(BatteryState::new(
            percent_from_millivolts(millivolts),
            self.is_charging(),
        ))
    }

    /// Battery voltage in millivolts
    async fn voltage(&mut self) -> Result<u16, Error> {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        match buf[0] {
            // For detailed explanation of formula check https://wiki.pine64.org/wiki/PineTime
            // Use u32 during calculation to prevent overflow
            raw @ 0..=4095 => Ok((raw as u32 * 2000 / 1241) as u16),
            _ => Err(Error::InvalidMeasurement),
        }
    }
}

/// Estimate capacity from fixed data points with linear interpolation in
/// between.
fn percent_from_millivolts(millivolts: u16) -> i16 {
    (match millivolts {
        0..=3449 => 0,
        3450..=3699 => (millivolts - 3450) / 5,
        3700..=4199 => 50 + (millivolts - 3700) / 10,
        _ => 100,
    }) as i16
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// ADC reading outside of the 12 bit range
    InvalidMeasurement,
}
