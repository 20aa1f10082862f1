//! Layer compositor
//!
//! Owns the watchface elements, their visibility and one dirty flag per
//! element. Painting repaints only what is dirty, but always the whole stack
//! of layers covering a dirty element, so overlapping layers stay correct.

use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    geometry::{AnchorPoint, Size},
    image::{Image, ImageDrawable},
    mono_font::{iso_8859_1::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb565,
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable,
};
use enumset::EnumSet;

use crate::{
    fmt::trace,
    host::{BatteryState, ResourceId, ResourceLoader},
    ui::{
        battery_indicator::compute_fill_width,
        layout::{Element, BAR_COLOR, OUTLINE_COLOR, TIME_COLOR},
    },
};

/// State the compositor reads while painting.
///
/// Built fresh for every paint from the authoritative values, never cached.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Label shown by both time layers
    pub time: &'a str,
    /// Last known battery state
    pub battery: BatteryState,
}

pub struct Compositor<I> {
    background: I,
    disconnect_icon: I,
    charging_icon: I,
    visible: EnumSet<Element>,
    dirty: EnumSet<Element>,
}

impl<I> Compositor<I> {
    /// Create the element set. Everything starts dirty, icons start hidden.
    pub fn new(background: I, disconnect_icon: I, charging_icon: I) -> Self {
        Self {
            background,
            disconnect_icon,
            charging_icon,
            visible: Element::INITIALLY_VISIBLE,
            dirty: EnumSet::all(),
        }
    }

    /// Create the element set with images from `loader`.
    pub fn load<L>(loader: &mut L) -> Self
    where
        L: ResourceLoader<Image = I>,
    {
        Self::new(
            loader.load(ResourceId::Background),
            loader.load(ResourceId::DisconnectIcon),
            loader.load(ResourceId::ChargingIcon),
        )
    }

    pub fn mark_dirty(&mut self, element: Element) {
        self.dirty.insert(element);
    }

    /// Mark every element as needing a repaint.
    pub fn mark_all_dirty(&mut self) {
        self.dirty = EnumSet::all();
    }

    /// Forget pending repaints.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Show or hide an element. Marks it dirty if its visibility changed.
    pub fn set_visible(&mut self, element: Element, visible: bool) {
        let changed = if visible {
            self.visible.insert(element)
        } else {
            self.visible.remove(element)
        };
        if changed {
            trace!("{:?} visible: {}", element, visible);
            self.dirty.insert(element);
        }
    }

    pub fn is_visible(&self, element: Element) -> bool {
        self.visible.contains(element)
    }

    pub fn is_dirty(&self, element: Element) -> bool {
        self.dirty.contains(element)
    }

    pub fn dirty(&self) -> EnumSet<Element> {
        self.dirty
    }

    pub fn needs_paint(&self) -> bool {
        !self.dirty.is_empty()
    }
}

impl<I> Compositor<I>
where
    I: ImageDrawable<Color = Rgb565>,
{
    /// Repaint every dirty region and return the elements that were drawn.
    ///
    /// For each dirty element, all visible elements intersecting its bounds
    /// are drawn bottom to top, clipped to those bounds. Dirty flags are
    /// only cleared once everything has been drawn.
    pub fn paint<D>(&mut self, target: &mut D, frame: &Frame<'_>) -> Result<EnumSet<Element>, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut painted = EnumSet::empty();

        for damaged in self.dirty {
            let region = damaged.bounds();
            let mut clipped = target.clipped(&region);

            for element in Element::Z_ORDER {
                if self.is_visible(element) && element.overlaps(damaged) {
                    self.draw_element(element, &mut clipped, frame)?;
                    painted.insert(element);
                }
            }
        }

        self.dirty.clear();
        Ok(painted)
    }

    fn draw_element<D>(&self, element: Element, target: &mut D, frame: &Frame<'_>) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let bounds = element.bounds();
        match element {
            Element::Background => Image::new(&self.background, bounds.top_left).draw(target),
            Element::DisconnectIcon => {
                Image::new(&self.disconnect_icon, bounds.top_left).draw(target)
            }
            Element::ChargingIcon => Image::new(&self.charging_icon, bounds.top_left).draw(target),
            Element::BatteryBar => {
                let width = compute_fill_width(
                    i32::from(frame.battery.charge_percent),
                    bounds.size.width,
                );
                Rectangle::new(bounds.top_left, Size::new(width, bounds.size.height))
                    .into_styled(PrimitiveStyle::with_fill(BAR_COLOR))
                    .draw(target)
            }
            Element::TimeOutline => draw_time(frame.time, bounds, OUTLINE_COLOR, target),
            Element::TimeText => draw_time(frame.time, bounds, TIME_COLOR, target),
        }
    }
}

/// Right-aligned time label inside `bounds`.
fn draw_time<D>(text: &str, bounds: Rectangle, color: Rgb565, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let character_style = MonoTextStyle::new(&FONT_10X20, color);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Right)
        .baseline(Baseline::Top)
        .build();

    Text::with_text_style(
        text,
        bounds.anchor_point(AnchorPoint::TopRight),
        character_style,
        text_style,
    )
    .draw(&mut target.clipped(&bounds))?;
    Ok(())
}
