//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_14, P0_18, P0_22, P0_23, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;
use mipidsi::{models::ST7789, Builder, Orientation};

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

/// ST7789 panel driven over SPI
pub type Lcd<SPI> = mipidsi::Display<
    SPIInterface<Spim<'static, SPI>, Output<'static, P0_18>, Output<'static, P0_25>>,
    ST7789,
    Output<'static, P0_26>,
>;

/// Backlight control.
///
/// There are three active-low backlight pins, each connected to a FET that
/// toggles backlight power through a resistor.
///
/// - Low: 2.2 kΩ
/// - Mid: 100 Ω
/// - High: 30 Ω
///
/// Through combinations of these pins, 7 brightness levels (+ off) can be
/// configured.
pub struct Backlight {
    low: Output<'static, P0_14>,
    mid: Output<'static, P0_22>,
    high: Output<'static, P0_23>,
}

impl Backlight {
    /// Configure backlight pins on boot. The backlight starts off.
    pub fn init(
        low: Output<'static, P0_14>,
        mid: Output<'static, P0_22>,
        high: Output<'static, P0_23>,
    ) -> Self {
        let mut backlight = Self { low, mid, high };
        backlight.off();
        backlight
    }

    /// Set the brightness level between 0 (off) and 7 (max brightness).
    pub fn set(&mut self, brightness: u8) -> Result<(), Error> {
        if brightness > 7 {
            return Err(Error::OutOfBounds);
        }
        defmt::debug!("Setting backlight brightness to {}", brightness);

        set_active_low(&mut self.low, brightness & 0x01 != 0);
        set_active_low(&mut self.mid, brightness & 0x02 != 0);
        set_active_low(&mut self.high, brightness & 0x04 != 0);
        Ok(())
    }

    pub fn off(&mut self) {
        self.low.set_high();
        self.mid.set_high();
        self.high.set_high();
    }
}

fn set_active_low<T: embassy_nrf::gpio::Pin>(pin: &mut Output<'static, T>, on: bool) {
    if on {
        pin.set_low();
    } else {
        pin.set_high();
    }
}

pub struct Display<SPI>
where
    SPI: spim::Instance,
{
    /// Display instance
    lcd: Lcd<SPI>,
    /// Backlight pins
    backlight: Backlight,
}

impl<SPI> Display<SPI>
where
    SPI: spim::Instance,
{
    /// Configure display settings on boot and switch the backlight on.
    pub fn init(
        spim: Spim<'static, SPI>,
        cs_pin: Output<'static, P0_25>,
        dc_pin: Output<'static, P0_18>,
        rst_pin: Output<'static, P0_26>,
        backlight: Backlight,
        brightness: u8,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd, backlight };
        display.backlight.set(brightness)?;
        Ok(display)
    }

    /// Draw target for the panel
    pub fn lcd(&mut self) -> &mut Lcd<SPI> {
        &mut self.lcd
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Panel did not accept the init sequence
    Init,
    /// Brightness level above 7
    OutOfBounds,
}
