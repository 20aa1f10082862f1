//! Watchface controller
//!
//! Ties the indicators, the time label and the compositor to a [`Host`].
//! An active watchface holds its subscriptions for exactly as long as it
//! lives: [`Watchface::activate`] subscribes last, dropping unsubscribes
//! first.

use embedded_graphics::{draw_target::DrawTarget, image::ImageDrawable, pixelcolor::Rgb565};
use enumset::EnumSet;

use crate::{
    fmt::{debug, info},
    host::{BatteryState, ClockSample, ConnectivityState, Event, EventSource, Host, ResourceLoader},
    ui::{
        battery_indicator::BatteryIndicator,
        compositor::{Compositor, Frame},
        connectivity_indicator::ConnectivityIndicator,
        layout::{Element, BAR_MAX_WIDTH},
        time_formatter::{DisplayTime, TimeFormatter},
    },
};

/// Everything the handlers mutate.
struct WatchfaceState<I> {
    formatter: TimeFormatter,
    /// Shared by the time text and its outline
    time: DisplayTime,
    battery: BatteryIndicator,
    connectivity: ConnectivityIndicator,
    compositor: Compositor<I>,
}

/// Active watchface bound to a host.
pub struct Watchface<'h, H: Host, I> {
    host: &'h mut H,
    subscriptions: EnumSet<EventSource>,
    state: WatchfaceState<I>,
}

impl<'h, H: Host, I> Watchface<'h, H, I> {
    /// Build the watchface and start receiving events.
    ///
    /// The initial battery and link state are read synchronously, so the
    /// first paint is already correct. A link that is down at startup shows
    /// the icon but does not alert.
    pub fn activate<L>(host: &'h mut H, loader: &mut L, formatter: TimeFormatter) -> Self
    where
        L: ResourceLoader<Image = I>,
    {
        let mut compositor = Compositor::load(loader);

        let battery = BatteryIndicator::new(host.peek_battery(), &mut compositor);
        let connectivity = ConnectivityIndicator::new(host.peek_connectivity(), &mut compositor);
        let time = formatter.format(host.now());

        let mut watchface = Self {
            host,
            subscriptions: EnumSet::empty(),
            state: WatchfaceState {
                formatter,
                time,
                battery,
                connectivity,
                compositor,
            },
        };

        for source in EnumSet::<EventSource>::all() {
            watchface.host.subscribe(source);
            watchface.subscriptions.insert(source);
        }
        info!("Watchface active, showing {}", watchface.state.time.as_str());
        watchface
    }

    /// Unsubscribe from every source, then release all elements.
    pub fn deactivate(self) {
        drop(self);
    }

    /// Route an event to its handler.
    pub fn handle(&mut self, event: Event) {
        debug!("Event from {:?}", event.source());
        match event {
            Event::Tick(sample) => self.on_tick(sample),
            Event::Battery(state) => self.on_battery(state),
            Event::Connectivity(state) => self.on_connectivity(state),
        }
    }

    pub fn on_tick(&mut self, sample: ClockSample) {
        let state = &mut self.state;
        state.time = state.formatter.format(sample);
        state.compositor.mark_dirty(Element::TimeOutline);
        state.compositor.mark_dirty(Element::TimeText);
    }

    pub fn on_battery(&mut self, sample: BatteryState) {
        let state = &mut self.state;
        state.battery.on_sample(sample, &mut state.compositor);
    }

    pub fn on_connectivity(&mut self, link: ConnectivityState) {
        let state = &mut self.state;
        if state.connectivity.on_change(link, &mut state.compositor) {
            info!("Disconnect alert");
            self.host.trigger_alert();
        }
    }

    /// Whether any element is waiting to be repainted.
    pub fn needs_paint(&self) -> bool {
        self.state.compositor.needs_paint()
    }

    pub fn is_visible(&self, element: Element) -> bool {
        self.state.compositor.is_visible(element)
    }

    /// Last known battery state.
    pub fn battery(&self) -> BatteryState {
        self.state.battery.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state.connectivity.is_connected()
    }

    /// Current width of the battery bar fill in pixels.
    pub fn fill_width(&self) -> u32 {
        self.state.battery.fill_width(BAR_MAX_WIDTH)
    }

    /// Text shown by `element`, `None` for elements without text.
    pub fn element_text(&self, element: Element) -> Option<&str> {
        match element {
            Element::TimeText | Element::TimeOutline => Some(self.state.time.as_str()),
            _ => None,
        }
    }

    /// Sources currently subscribed.
    pub fn subscriptions(&self) -> EnumSet<EventSource> {
        self.subscriptions
    }
}

impl<H: Host, I> Watchface<'_, H, I>
where
    I: ImageDrawable<Color = Rgb565>,
{
    /// Repaint dirty regions onto `target`.
    ///
    /// Returns the elements that were drawn. On error the dirty flags are
    /// kept, so the next call repaints the same regions.
    pub fn paint<D>(&mut self, target: &mut D) -> Result<EnumSet<Element>, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let state = &mut self.state;
        let frame = Frame {
            time: state.time.as_str(),
            battery: state.battery.state(),
        };
        state.compositor.paint(target, &frame)
    }

    /// Mark everything dirty and repaint, e.g. after the panel woke up.
    pub fn repaint<D>(&mut self, target: &mut D) -> Result<EnumSet<Element>, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.state.compositor.mark_all_dirty();
        self.paint(target)
    }
}

impl<H: Host, I> Drop for Watchface<'_, H, I> {
    fn drop(&mut self) {
        for source in self.subscriptions {
            self.host.unsubscribe(source);
        }
        self.subscriptions.clear();
        info!("Watchface deactivated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ResourceId;
    use core::convert::Infallible;
    use embedded_graphics::{
        geometry::{OriginDimensions, Size},
        primitives::Rectangle,
        Pixel,
    };
    use std::{cell::RefCell, rc::Rc};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Subscribe(EventSource),
        Unsubscribe(EventSource),
        Alert,
        Dropped(ResourceId),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct FakeHost {
        log: Log,
        now: ClockSample,
        battery: BatteryState,
        link: ConnectivityState,
    }

    impl FakeHost {
        fn new(log: &Log) -> Self {
            Self {
                log: log.clone(),
                now: ClockSample(1_760_882_700), // 2025-10-19 14:05 UTC
                battery: BatteryState::new(50, false),
                link: ConnectivityState::CONNECTED,
            }
        }

        fn alerts(&self) -> usize {
            self.log
                .borrow()
                .iter()
                .filter(|call| **call == Call::Alert)
                .count()
        }
    }

    impl Host for FakeHost {
        fn now(&mut self) -> ClockSample {
            self.now
        }

        fn peek_battery(&mut self) -> BatteryState {
            self.battery
        }

        fn peek_connectivity(&mut self) -> ConnectivityState {
            self.link
        }

        fn trigger_alert(&mut self) {
            self.log.borrow_mut().push(Call::Alert);
        }

        fn subscribe(&mut self, source: EventSource) {
            self.log.borrow_mut().push(Call::Subscribe(source));
        }

        fn unsubscribe(&mut self, source: EventSource) {
            self.log.borrow_mut().push(Call::Unsubscribe(source));
        }
    }

    /// Image that records when it is released.
    struct Probe {
        id: ResourceId,
        log: Log,
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.log.borrow_mut().push(Call::Dropped(self.id));
        }
    }

    impl OriginDimensions for Probe {
        fn size(&self) -> Size {
            Size::new(1, 1)
        }
    }

    impl ImageDrawable for Probe {
        type Color = Rgb565;

        fn draw<D>(&self, _target: &mut D) -> Result<(), D::Error>
        where
            D: DrawTarget<Color = Rgb565>,
        {
            Ok(())
        }

        fn draw_sub_image<D>(&self, _target: &mut D, _area: &Rectangle) -> Result<(), D::Error>
        where
            D: DrawTarget<Color = Rgb565>,
        {
            Ok(())
        }
    }

    struct ProbeLoader(Log);

    impl ResourceLoader for ProbeLoader {
        type Image = Probe;

        fn load(&mut self, id: ResourceId) -> Probe {
            Probe {
                id,
                log: self.0.clone(),
            }
        }
    }

    /// Swallows every pixel.
    struct NullTarget;

    impl OriginDimensions for NullTarget {
        fn size(&self) -> Size {
            Size::new(240, 240)
        }
    }

    impl DrawTarget for NullTarget {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<P>(&mut self, _pixels: P) -> Result<(), Infallible>
        where
            P: IntoIterator<Item = Pixel<Rgb565>>,
        {
            Ok(())
        }
    }

    fn setup() -> (Log, FakeHost, ProbeLoader) {
        let log = Log::default();
        let host = FakeHost::new(&log);
        let loader = ProbeLoader(log.clone());
        (log, host, loader)
    }

    #[test]
    fn activation_subscribes_to_every_source() {
        let (log, mut host, mut loader) = setup();
        let watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());

        assert_eq!(watchface.subscriptions(), EnumSet::all());
        assert_eq!(
            *log.borrow(),
            vec![
                Call::Subscribe(EventSource::Tick),
                Call::Subscribe(EventSource::Battery),
                Call::Subscribe(EventSource::Connectivity),
            ]
        );
        assert_eq!(watchface.element_text(Element::TimeText), Some("Oct 19  2:05 PM"));
        assert!(watchface.needs_paint());
    }

    #[test]
    fn deactivation_unsubscribes_before_releasing_images() {
        let (log, mut host, mut loader) = setup();
        let watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());
        log.borrow_mut().clear();

        watchface.deactivate();

        let calls = log.borrow();
        assert_eq!(calls.len(), 6);
        assert!(calls[..3].iter().all(|c| matches!(c, Call::Unsubscribe(_))));
        assert!(calls[3..].iter().all(|c| matches!(c, Call::Dropped(_))));
    }

    #[test]
    fn dropping_without_deactivate_also_unsubscribes() {
        let (log, mut host, mut loader) = setup();
        {
            let _watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());
        }
        let unsubscribed = log
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Unsubscribe(_)))
            .count();
        assert_eq!(unsubscribed, 3);
    }

    #[test]
    fn startup_peek_applies_battery_and_link() {
        let (_log, mut host, mut loader) = setup();
        host.battery = BatteryState::new(80, true);
        host.link = ConnectivityState::DISCONNECTED;

        let watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());
        assert!(watchface.is_visible(Element::ChargingIcon));
        assert!(watchface.is_visible(Element::DisconnectIcon));
        assert!(!watchface.is_connected());
        assert_eq!(watchface.fill_width(), 102);
        drop(watchface);

        assert_eq!(host.alerts(), 0);
    }

    #[test]
    fn disconnected_startup_then_repeats_never_alerts() {
        let (_log, mut host, mut loader) = setup();
        host.link = ConnectivityState::DISCONNECTED;

        let mut watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());
        watchface.on_connectivity(ConnectivityState::DISCONNECTED);
        watchface.on_connectivity(ConnectivityState::DISCONNECTED);
        drop(watchface);

        assert_eq!(host.alerts(), 0);
    }

    #[test]
    fn alert_once_per_link_loss() {
        let (_log, mut host, mut loader) = setup();
        let mut watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());

        for connected in [false, false, true, false, true, true, false] {
            watchface.handle(Event::Connectivity(connected.into()));
            assert_eq!(watchface.is_visible(Element::DisconnectIcon), !connected);
        }
        drop(watchface);

        assert_eq!(host.alerts(), 3);
    }

    #[test]
    fn tick_updates_both_text_layers() {
        let (_log, mut host, mut loader) = setup();
        let mut watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());
        watchface.paint(&mut NullTarget).unwrap();
        assert!(!watchface.needs_paint());

        // 2025-10-19 23:59 UTC
        watchface.handle(Event::Tick(ClockSample(1_760_918_340)));
        assert!(watchface.needs_paint());
        assert_eq!(watchface.element_text(Element::TimeText), Some("Oct 19 11:59 PM"));
        assert_eq!(
            watchface.element_text(Element::TimeText),
            watchface.element_text(Element::TimeOutline)
        );
        assert_eq!(watchface.element_text(Element::BatteryBar), None);

        let painted = watchface.paint(&mut NullTarget).unwrap();
        assert!(painted.contains(Element::TimeText));
        assert!(painted.contains(Element::TimeOutline));
    }

    #[test]
    fn battery_event_updates_bar_and_icon() {
        let (_log, mut host, mut loader) = setup();
        let mut watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());

        watchface.handle(Event::Battery(BatteryState::new(25, true)));
        assert_eq!(watchface.battery(), BatteryState::new(25, true));
        assert_eq!(watchface.fill_width(), 32);
        assert!(watchface.is_visible(Element::ChargingIcon));

        watchface.handle(Event::Battery(BatteryState::new(26, false)));
        assert_eq!(watchface.fill_width(), 33);
        assert!(!watchface.is_visible(Element::ChargingIcon));
    }

    #[test]
    fn handle_routes_every_source() {
        let (_log, mut host, mut loader) = setup();
        let mut watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());

        watchface.handle(Event::Battery(BatteryState::new(10, true)));
        watchface.handle(Event::Connectivity(ConnectivityState::DISCONNECTED));
        watchface.handle(Event::Tick(ClockSample(0)));

        assert_eq!(watchface.battery(), BatteryState::new(10, true));
        assert!(!watchface.is_connected());
        assert_eq!(watchface.element_text(Element::TimeText), Some("Jan 01 12:00 AM"));
        drop(watchface);

        assert_eq!(host.alerts(), 1);
    }

    #[test]
    fn repaint_draws_everything_visible() {
        let (_log, mut host, mut loader) = setup();
        let mut watchface = Watchface::activate(&mut host, &mut loader, TimeFormatter::default());
        watchface.paint(&mut NullTarget).unwrap();

        assert_eq!(
            watchface.repaint(&mut NullTarget).unwrap(),
            Element::INITIALLY_VISIBLE
        );
    }
}
