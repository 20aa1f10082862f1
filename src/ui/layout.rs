//! Fixed watchface geometry
//!
//! The element set never changes at runtime, so every element is a variant
//! with a const rectangle and the stacking order is a const array.

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::{Rgb565, RgbColor},
    primitives::Rectangle,
};
use enumset::{enum_set, EnumSet, EnumSetType};

/// Panel width in pixels
pub const LCD_W: u32 = 240;
/// Panel height in pixels
pub const LCD_H: u32 = 240;

/// Full width of the battery bar at 100 %
pub const BAR_MAX_WIDTH: u32 = 128;

/// Battery bar fill (sunset orange)
pub const BAR_COLOR: Rgb565 = Rgb565::new(31, 21, 10);
/// Time text
pub const TIME_COLOR: Rgb565 = Rgb565::YELLOW;
/// Drop shadow behind the time text
pub const OUTLINE_COLOR: Rgb565 = Rgb565::BLACK;
/// Built-in background fill
pub const BACKGROUND_COLOR: Rgb565 = Rgb565::new(2, 6, 6);
/// Charging bolt
pub const CHARGING_COLOR: Rgb565 = Rgb565::new(31, 53, 0);
/// Link-lost glyph
pub const DISCONNECT_COLOR: Rgb565 = Rgb565::new(31, 8, 4);

const BACKGROUND: Rectangle = Rectangle::new(Point::zero(), Size::new(LCD_W, LCD_H));
const DISCONNECT_ICON: Rectangle = Rectangle::new(Point::new(204, 218), Size::new(16, 16));
const CHARGING_ICON: Rectangle = Rectangle::new(Point::new(168, 200), Size::new(16, 16));
const BATTERY_BAR: Rectangle = Rectangle::new(Point::new(48, 204), Size::new(BAR_MAX_WIDTH, 8));
const TIME_OUTLINE: Rectangle = Rectangle::new(Point::new(45, 217), Size::new(150, 20));
const TIME_TEXT: Rectangle = Rectangle::new(Point::new(44, 216), Size::new(150, 20));

/// Visual elements of the watchface.
#[derive(Debug, EnumSetType)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    Background,
    DisconnectIcon,
    ChargingIcon,
    BatteryBar,
    TimeOutline,
    TimeText,
}

impl Element {
    /// Paint order, bottom layer first
    pub const Z_ORDER: [Element; 6] = [
        Element::Background,
        Element::DisconnectIcon,
        Element::ChargingIcon,
        Element::BatteryBar,
        Element::TimeOutline,
        Element::TimeText,
    ];

    /// Elements shown right after activation
    pub const INITIALLY_VISIBLE: EnumSet<Element> = enum_set!(
        Element::Background | Element::BatteryBar | Element::TimeOutline | Element::TimeText
    );

    /// Bounding box on the panel
    pub const fn bounds(self) -> Rectangle {
        match self {
            Element::Background => BACKGROUND,
            Element::DisconnectIcon => DISCONNECT_ICON,
            Element::ChargingIcon => CHARGING_ICON,
            Element::BatteryBar => BATTERY_BAR,
            Element::TimeOutline => TIME_OUTLINE,
            Element::TimeText => TIME_TEXT,
        }
    }

    /// Whether the two elements share at least one pixel.
    pub fn overlaps(self, other: Element) -> bool {
        !self
            .bounds()
            .intersection(&other.bounds())
            .is_zero_sized()
    }
}
