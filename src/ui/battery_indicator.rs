//! Battery bar and charging icon

use crate::{
    fmt::debug,
    host::BatteryState,
    ui::{compositor::Compositor, layout::Element},
};

/// Filled width of a bar `max_width` pixels wide at `percent` charge.
///
/// `percent` is clamped to 0–100 first, the result is rounded down.
pub fn compute_fill_width(percent: i32, max_width: u32) -> u32 {
    let percent = percent.clamp(0, 100) as u64;
    (percent * u64::from(max_width) / 100) as u32
}

/// Keeps the last known battery state and maps it onto the battery bar
/// and the charging icon.
#[derive(Debug)]
pub struct BatteryIndicator {
    state: BatteryState,
}

impl BatteryIndicator {
    /// Start from a synchronously read state, so the bar is right before
    /// the first battery event arrives.
    pub fn new<I>(initial: BatteryState, compositor: &mut Compositor<I>) -> Self {
        let mut indicator = Self { state: initial };
        indicator.on_sample(initial, compositor);
        indicator
    }

    /// Store a new sample. The last sample wins.
    pub fn on_sample<I>(&mut self, sample: BatteryState, compositor: &mut Compositor<I>) {
        debug!(
            "Battery: {}% ({})",
            sample.charge_percent,
            if sample.is_charging {
                "charging"
            } else {
                "discharging"
            }
        );
        self.state = sample;
        compositor.mark_dirty(Element::BatteryBar);
        compositor.set_visible(Element::ChargingIcon, sample.is_charging);
    }

    pub fn state(&self) -> BatteryState {
        self.state
    }

    /// Fill width for the current state.
    pub fn fill_width(&self, max_width: u32) -> u32 {
        compute_fill_width(i32::from(self.state.charge_percent), max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::BAR_MAX_WIDTH;

    fn compositor() -> Compositor<()> {
        let mut compositor = Compositor::new((), (), ());
        compositor.clear_dirty();
        compositor
    }

    #[test]
    fn fill_width_is_floor_of_fraction() {
        for width in [0, 1, 7, 64, 128, 240] {
            for percent in 0..=100 {
                let fill = compute_fill_width(percent, width);
                assert_eq!(fill, (percent as u32 * width) / 100);
                assert!(fill <= width);
            }
        }
        assert_eq!(compute_fill_width(33, 64), 21);
        assert_eq!(compute_fill_width(99, 64), 63);
    }

    #[test]
    fn fill_width_clamps_out_of_range_percent() {
        assert_eq!(compute_fill_width(-1, 128), 0);
        assert_eq!(compute_fill_width(i32::MIN, 128), 0);
        assert_eq!(compute_fill_width(101, 128), 128);
        assert_eq!(compute_fill_width(i32::MAX, 128), 128);
    }

    #[test]
    fn fill_width_does_not_overflow_wide_bars() {
        assert_eq!(compute_fill_width(100, u32::MAX), u32::MAX);
        assert_eq!(compute_fill_width(50, u32::MAX), u32::MAX / 2);
    }

    #[test]
    fn initial_state_sets_charging_icon() {
        let mut compositor = compositor();
        let indicator = BatteryIndicator::new(BatteryState::new(80, true), &mut compositor);
        assert!(compositor.is_visible(Element::ChargingIcon));
        assert!(compositor.is_dirty(Element::BatteryBar));
        assert_eq!(indicator.fill_width(BAR_MAX_WIDTH), 102);
    }

    #[test]
    fn sample_marks_bar_dirty_even_when_unchanged() {
        let mut compositor = compositor();
        let mut indicator = BatteryIndicator::new(BatteryState::new(40, false), &mut compositor);
        compositor.clear_dirty();

        indicator.on_sample(BatteryState::new(40, false), &mut compositor);
        assert!(compositor.is_dirty(Element::BatteryBar));
        // Visibility did not change, so the icon needs no repaint.
        assert!(!compositor.is_dirty(Element::ChargingIcon));
    }

    #[test]
    fn charging_icon_follows_last_sample() {
        let mut compositor = compositor();
        let mut indicator = BatteryIndicator::new(BatteryState::new(40, false), &mut compositor);

        for charging in [true, true, false, true, false, false] {
            indicator.on_sample(BatteryState::new(40, charging), &mut compositor);
            assert_eq!(compositor.is_visible(Element::ChargingIcon), charging);
        }
    }

    #[test]
    fn out_of_range_sample_is_kept_but_clamped_on_use() {
        let mut compositor = compositor();
        let mut indicator = BatteryIndicator::new(BatteryState::new(50, false), &mut compositor);

        indicator.on_sample(BatteryState::new(130, false), &mut compositor);
        assert_eq!(indicator.state().charge_percent, 130);
        assert_eq!(indicator.fill_width(BAR_MAX_WIDTH), BAR_MAX_WIDTH);

        indicator.on_sample(BatteryState::new(-5, false), &mut compositor);
        assert_eq!(indicator.fill_width(BAR_MAX_WIDTH), 0);
    }
}
