//! Watchface UI
//!
//! Indicators turn host state into element visibility and dirty flags, the
//! compositor turns those into pixels.

pub mod assets;
pub mod battery_indicator;
pub mod compositor;
pub mod connectivity_indicator;
pub mod layout;
pub mod time_formatter;
pub mod watchface;
