//! Interface between the watchface and the runtime hosting it
//!
//! The host owns the event sources, the haptic motor and the image
//! resources. The watchface only sees the narrow traits below.

use embedded_graphics::{image::ImageDrawable, pixelcolor::Rgb565};
use enumset::EnumSetType;

/// Wall-clock time as Unix seconds (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSample(pub i64);

/// Battery charge as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryState {
    /// Charge in percent, nominally 0–100. Out-of-range values are clamped on use.
    pub charge_percent: i16,
    /// Charger connected
    pub is_charging: bool,
}

impl BatteryState {
    pub const fn new(charge_percent: i16, is_charging: bool) -> Self {
        Self {
            charge_percent,
            is_charging,
        }
    }

    /// Charge in percent, clamped to 0–100.
    pub fn clamped_percent(&self) -> u8 {
        self.charge_percent.clamp(0, 100) as u8
    }
}

/// Bluetooth link state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectivityState {
    pub connected: bool,
}

impl ConnectivityState {
    pub const CONNECTED: Self = Self { connected: true };
    pub const DISCONNECTED: Self = Self { connected: false };
}

impl From<bool> for ConnectivityState {
    fn from(connected: bool) -> Self {
        Self { connected }
    }
}

/// Event sources the watchface subscribes to.
#[derive(Debug, EnumSetType)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventSource {
    /// Minute tick
    Tick,
    /// Battery level or charger change
    Battery,
    /// Bluetooth link change
    Connectivity,
}

/// A single notification delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Tick(ClockSample),
    Battery(BatteryState),
    Connectivity(ConnectivityState),
}

impl Event {
    /// Source this event belongs to.
    pub fn source(&self) -> EventSource {
        match self {
            Event::Tick(_) => EventSource::Tick,
            Event::Battery(_) => EventSource::Battery,
            Event::Connectivity(_) => EventSource::Connectivity,
        }
    }
}

/// Services the runtime provides to the watchface.
pub trait Host {
    /// Current wall-clock time
    fn now(&mut self) -> ClockSample;

    /// Synchronous read of the current battery state
    fn peek_battery(&mut self) -> BatteryState;

    /// Synchronous read of the current link state
    fn peek_connectivity(&mut self) -> ConnectivityState;

    /// Fire a one-shot haptic alert.
    ///
    /// No acknowledgement: if the host cannot honour it, the alert is dropped.
    fn trigger_alert(&mut self);

    /// Start delivering events of `source`.
    fn subscribe(&mut self, source: EventSource);

    /// Stop delivering events of `source`. Must take effect before returning.
    fn unsubscribe(&mut self, source: EventSource);
}

/// Compile-time image resources used by the watchface.
#[derive(Debug, EnumSetType)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceId {
    Background,
    DisconnectIcon,
    ChargingIcon,
}

/// Turns a resource identifier into a drawable image.
pub trait ResourceLoader {
    /// Decoded image handle, opaque to the watchface
    type Image: ImageDrawable<Color = Rgb565>;

    fn load(&mut self, id: ResourceId) -> Self::Image;
}
