//! Built-in image resources
//!
//! Icons are 1 bit per pixel and tinted at draw time. Unset bits are
//! transparent, so whatever lies below an icon shows through.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    image::{ImageDrawable, ImageRaw},
    pixelcolor::{BinaryColor, Rgb565},
    primitives::Rectangle,
    Pixel,
};

use crate::{
    host::{ResourceId, ResourceLoader},
    ui::layout::{BACKGROUND_COLOR, CHARGING_COLOR, DISCONNECT_COLOR, LCD_H, LCD_W},
};

const ICON_W: u32 = 16;

#[rustfmt::skip]
const BOLT: [u8; 32] = [
    0b0000_0001, 0b1111_0000, // .......#####....
    0b0000_0011, 0b1110_0000, // ......#####.....
    0b0000_0111, 0b1100_0000, // .....#####......
    0b0000_1111, 0b1000_0000, // ....#####.......
    0b0001_1111, 0b0000_0000, // ...#####........
    0b0011_1111, 0b1111_0000, // ..##########....
    0b0111_1111, 0b1110_0000, // .##########.....
    0b0000_0011, 0b1100_0000, // ......####......
    0b0000_0111, 0b1000_0000, // .....####.......
    0b0000_1111, 0b0000_0000, // ....####........
    0b0001_1110, 0b0000_0000, // ...####.........
    0b0011_1100, 0b0000_0000, // ..####..........
    0b0111_1000, 0b0000_0000, // .####...........
    0b1111_0000, 0b0000_0000, // ####............
    0b1110_0000, 0b0000_0000, // ###.............
    0b1100_0000, 0b0000_0000, // ##..............
];

#[rustfmt::skip]
const LINK_LOST: [u8; 32] = [
    0b1100_0000, 0b0000_0011, // ##............##
    0b0110_0000, 0b0000_0110, // .##..........##.
    0b0011_0000, 0b0000_1100, // ..##........##..
    0b0001_1000, 0b0001_1000, // ...##......##...
    0b0000_1100, 0b0011_0000, // ....##....##....
    0b0000_0110, 0b0110_0000, // .....##..##.....
    0b0000_0011, 0b1100_0000, // ......####......
    0b0000_0001, 0b1000_0000, // .......##.......
    0b0000_0001, 0b1000_0000, // .......##.......
    0b0000_0011, 0b1100_0000, // ......####......
    0b0000_0110, 0b0110_0000, // .....##..##.....
    0b0000_1100, 0b0011_0000, // ....##....##....
    0b0001_1000, 0b0001_1000, // ...##......##...
    0b0011_0000, 0b0000_1100, // ..##........##..
    0b0110_0000, 0b0000_0110, // .##..........##.
    0b1100_0000, 0b0000_0011, // ##............##
];

/// Decoded image resource.
#[derive(Clone, Copy, Debug)]
pub enum Asset {
    /// Opaque single-colour area
    Solid { size: Size, color: Rgb565 },
    /// 1 bpp glyph, set bits drawn in `color`, the rest transparent
    Glyph {
        raw: ImageRaw<'static, BinaryColor>,
        color: Rgb565,
    },
}

impl Asset {
    /// Tinted 1 bpp glyph, `width` pixels per row.
    pub fn glyph(data: &'static [u8], width: u32, color: Rgb565) -> Self {
        Asset::Glyph {
            raw: ImageRaw::new(data, width),
            color,
        }
    }
}

impl OriginDimensions for Asset {
    fn size(&self) -> Size {
        match self {
            Asset::Solid { size, .. } => *size,
            Asset::Glyph { raw, .. } => raw.size(),
        }
    }
}

impl ImageDrawable for Asset {
    type Color = Rgb565;

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        match self {
            Asset::Solid { size, color } => {
                target.fill_solid(&Rectangle::new(Point::zero(), *size), *color)
            }
            Asset::Glyph { raw, color } => raw.draw(&mut Tinted::new(target, *color)),
        }
    }

    fn draw_sub_image<D>(&self, target: &mut D, area: &Rectangle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        match self {
            Asset::Solid { color, .. } => {
                let area = area.intersection(&self.bounding_box());
                target.fill_solid(&Rectangle::new(Point::zero(), area.size), *color)
            }
            Asset::Glyph { raw, color } => {
                raw.draw_sub_image(&mut Tinted::new(target, *color), area)
            }
        }
    }
}

/// Draw target adapter that paints set pixels of a binary image in one
/// colour and skips the unset ones.
struct Tinted<'a, D> {
    target: &'a mut D,
    color: Rgb565,
}

impl<'a, D> Tinted<'a, D> {
    fn new(target: &'a mut D, color: Rgb565) -> Self {
        Self { target, color }
    }
}

impl<D> Dimensions for Tinted<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<D> DrawTarget for Tinted<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Color = BinaryColor;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let color = self.color;
        self.target.draw_iter(
            pixels
                .into_iter()
                .filter(|Pixel(_, bit)| bit.is_on())
                .map(|Pixel(point, _)| Pixel(point, color)),
        )
    }
}

/// Resources compiled into the firmware.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinAssets;

impl ResourceLoader for BuiltinAssets {
    type Image = Asset;

    fn load(&mut self, id: ResourceId) -> Asset {
        match id {
            ResourceId::Background => Asset::Solid {
                size: Size::new(LCD_W, LCD_H),
                color: BACKGROUND_COLOR,
            },
            ResourceId::DisconnectIcon => Asset::glyph(&LINK_LOST, ICON_W, DISCONNECT_COLOR),
            ResourceId::ChargingIcon => Asset::glyph(&BOLT, ICON_W, CHARGING_COLOR),
        }
    }
}
