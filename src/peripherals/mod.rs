//! PineTime peripherals used by the watchface firmware

pub(super) mod battery;
pub(super) mod display;
pub(super) mod vibrator;
