//! PineTime watchface core
//!
//! Event-driven rendering state machine for a minimal watchface: time,
//! battery bar, charging indicator and Bluetooth link indicator. The host
//! (the firmware in `main.rs`, or a test harness) delivers clock, battery and
//! connectivity events and asks the watchface to paint onto any
//! `embedded-graphics` draw target.
//!
//! Nothing in here touches hardware, so the whole crate builds and tests on
//! the host: `cargo test`.

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod host;
pub mod ui;

pub use host::{
    BatteryState, ClockSample, ConnectivityState, Event, EventSource, Host, ResourceId,
    ResourceLoader,
};
pub use ui::{
    assets::BuiltinAssets,
    compositor::{Compositor, Frame},
    layout::Element,
    time_formatter::{DisplayTime, TimeFormatter},
    watchface::Watchface,
};
