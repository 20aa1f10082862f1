#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Core
use core::sync::atomic::{AtomicBool, AtomicI16, Ordering};

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select3, Either3};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Ticker, Timer};
use nrf_softdevice::Softdevice;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    battery::Battery,
    display::{Backlight, Display},
    vibrator::{PulseLength, Vibrator},
};
use system::{
    bluetooth::{self, Server},
    config::{
        SystemConfig, ALERT_PULSES, BACKLIGHT_LEVEL, BATTERY_SAMPLE_PERIOD, TIMEZONE_OFFSET,
    },
    time::Clock,
};

// Watchface
use pinetime_watchface::{
    BatteryState, BuiltinAssets, ClockSample, ConnectivityState, Event, EventSource, Host,
    TimeFormatter, Watchface,
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

// Communication channels
static BATTERY_STATUS: Signal<ThreadModeRawMutex, BatteryState> = Signal::new();
static LINK_STATUS: Signal<ThreadModeRawMutex, ConnectivityState> = Signal::new();
static NOTIFY: Signal<ThreadModeRawMutex, u8> = Signal::new();

// Latest values, read synchronously on activation
static BATTERY_PERCENT: AtomicI16 = AtomicI16::new(0);
static CHARGING: AtomicBool = AtomicBool::new(false);
static CONNECTED: AtomicBool = AtomicBool::new(false);

/// Watchface host backed by the channels above.
struct PineTimeHost {
    clock: Clock,
}

impl Host for PineTimeHost {
    fn now(&mut self) -> ClockSample {
        self.clock.now()
    }

    fn peek_battery(&mut self) -> BatteryState {
        BatteryState::new(
            BATTERY_PERCENT.load(Ordering::Relaxed),
            CHARGING.load(Ordering::Relaxed),
        )
    }

    fn peek_connectivity(&mut self) -> ConnectivityState {
        CONNECTED.load(Ordering::Relaxed).into()
    }

    fn trigger_alert(&mut self) {
        NOTIFY.signal(ALERT_PULSES);
    }

    fn subscribe(&mut self, source: EventSource) {
        defmt::debug!("Subscribe {}", source);
        // The watchface just peeked the current value, older pending ones are stale
        reset(source);
    }

    fn unsubscribe(&mut self, source: EventSource) {
        defmt::debug!("Unsubscribe {}", source);
        reset(source);
    }
}

fn reset(source: EventSource) {
    match source {
        EventSource::Tick => {}
        EventSource::Battery => BATTERY_STATUS.reset(),
        EventSource::Connectivity => LINK_STATUS.reset(),
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise and forward link changes.
#[embassy_executor::task(pool_size = 1)]
async fn bluetooth_link(sd: &'static Softdevice, server: Server) -> ! {
    bluetooth::serve(
        sd,
        &server,
        || BATTERY_PERCENT.load(Ordering::Relaxed).clamp(0, 100) as u8,
        |connected| {
            CONNECTED.store(connected, Ordering::Relaxed);
            LINK_STATUS.signal(connected.into());
        },
    )
    .await
}

/// Vibrate whenever an alert is signaled
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut vibrator: Vibrator) {
    loop {
        let count = NOTIFY.wait().await;
        vibrator.pulse(PulseLength::SHORT, count).await;
    }
}

/// Sample the battery, signal only on change.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery) {
    let mut ticker = Ticker::every(BATTERY_SAMPLE_PERIOD);
    let mut last = None;
    loop {
        match battery.sample().await {
            Ok(status) if last != Some(status) => {
                BATTERY_PERCENT.store(status.charge_percent, Ordering::Relaxed);
                CHARGING.store(status.is_charging, Ordering::Relaxed);
                BATTERY_STATUS.signal(status);
                last = Some(status);
            }
            Ok(_) => {}
            Err(e) => defmt::warn!("Battery sample failed: {}", e),
        }

        ticker.next().await;
    }
}

/// Run the watchface: wait for the next event, apply it, repaint.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(mut display: Display<SPI2>, clock: Clock) {
    let mut host = PineTimeHost { clock };
    let formatter = TimeFormatter::east(TIMEZONE_OFFSET).unwrap_or_default();
    let mut watchface = Watchface::activate(&mut host, &mut BuiltinAssets, formatter);

    loop {
        if watchface.needs_paint() && watchface.paint(display.lcd()).is_err() {
            defmt::warn!("Display write failed, retrying on next event");
        }

        let event = match select3(
            Timer::after(clock.until_next_minute()),
            BATTERY_STATUS.wait(),
            LINK_STATUS.wait(),
        )
        .await
        {
            Either3::First(()) => Event::Tick(clock.now()),
            Either3::Second(status) => Event::Battery(status),
            Either3::Third(status) => Event::Connectivity(status),
        };
        watchface.handle(event);
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    SystemConfig::prioritize_peripherals();

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::generate_config());
    let server = unwrap!(Server::new(sd));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Battery
    let mut battery = Battery::init(saadc, Input::new(p.P0_12, Pull::None));
    match battery.sample().await {
        Ok(status) => {
            BATTERY_PERCENT.store(status.charge_percent, Ordering::Relaxed);
            CHARGING.store(status.is_charging, Ordering::Relaxed);
        }
        Err(e) => defmt::warn!("Initial battery sample failed: {}", e),
    }

    // Initialize vibration motor, pin high = off
    let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let backlight = Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        backlight,
        BACKLIGHT_LEVEL,
    ));

    defmt::info!("Initialization finished");

    // Schedule tasks
    let clock = Clock::new(UTC_EPOCH);
    unwrap!(spawner.spawn(bluetooth_link(sd, server)));
    unwrap!(spawner.spawn(update_battery_status(battery)));
    unwrap!(spawner.spawn(notify(vibrator)));
    unwrap!(spawner.spawn(update_lcd(display, clock)));
}
