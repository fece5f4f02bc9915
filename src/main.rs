//! EnvNode Firmware: Main Entry Point
//!
//! Three sampling tasks, one GPIO ISR and the main monitor loop meet only
//! in the `READINGS` latest-value channels.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  core 1: temp task ─┐   hum task ─┐   light task ─┐            │
//! │                     ▼             ▼               ▼            │
//! │  GPIO ISR ──▶ EventCounter ──▶  READINGS  (Latest<T> × 5)      │
//! │                                    │                           │
//! │  ──────────────── main loop ───────┼──────────────────────     │
//! │                                    ▼                           │
//! │              MonitorService (alarm · blink · idle)             │
//! │                 │             │              │                 │
//! │            LogEventSink   Indicator   PowerController          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use envnode::adapters::log_sink::LogEventSink;
use envnode::adapters::rtc::Ds3231;
use envnode::adapters::sleep::DeepSleep;
use envnode::adapters::time::Uptime;
use envnode::app::clock;
use envnode::app::events::AppEvent;
use envnode::app::ports::EventSink;
use envnode::app::service::{MonitorService, Tick};
use envnode::config::SystemConfig;
use envnode::drivers::delay::TaskDelay;
use envnode::drivers::hw_init;
use envnode::drivers::indicator::Indicator;
use envnode::drivers::task_pin::{Core, spawn_on_core};
use envnode::error::Error;
use envnode::events::EventCounter;
use envnode::pins;
use envnode::power::{self, PowerController, WakeReason};
use envnode::readings::Readings;
use envnode::sampling::{Quantity, SamplingTask};
use envnode::sensors::dht::{self, Dht, DhtHumidity, DhtTemperature};
use envnode::sensors::light::LightSensor;

static READINGS: Readings = Readings::new();

const SAMPLER_PRIORITY: u8 = 5;
const SAMPLER_STACK_KB: usize = 4;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  EnvNode v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let wake = power::wake_reason();
    match wake {
        WakeReason::PowerOn => info!("Boot: power-on"),
        other => info!("Boot: wake from deep sleep ({:?})", other),
    }

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config: not printable ({})", e),
    }

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals().map_err(Error::from) {
        error!("{}, halting", e);
        power::halt();
    }

    // ── 4. RTC ────────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    // SAFETY: the I²C lines are not claimed through `peripherals.pins`
    // anywhere else.
    let (sda, scl) = unsafe {
        (
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
        )
    };
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUDRATE_HZ)),
    )?;
    let mut rtc = Ds3231::new(i2c);
    let mut log_sink = LogEventSink::new();

    match clock::sync_at_boot(&mut rtc, &clock::build_time()) {
        Ok(status) => log_sink.emit(&AppEvent::ClockSynced(status)),
        Err(e) => {
            error!("RTC not found ({}). Check the I2C wiring. Halting", e);
            power::halt();
        }
    }

    // ── 5. Event counter ISR ──────────────────────────────────
    let counter: &'static EventCounter<'static> = Box::leak(Box::new(EventCounter::new(
        config.debounce_window_ms,
        config.debounce_mode,
        &READINGS.events,
    )));
    match hw_init::init_isr_service(counter).map_err(Error::from) {
        Ok(()) => info!(
            "Event counter armed (window {} ms, {:?})",
            counter.window_ms(),
            counter.mode()
        ),
        Err(e) => error!("{}; continuing without event counting", e),
    }

    // ── 6. Sampling tasks ─────────────────────────────────────
    let shared_dht = dht::shared(Dht::new(pins::DHT_GPIO));

    let temp = SamplingTask::for_quantity(
        Quantity::Temperature,
        &config,
        &READINGS,
        DhtTemperature(shared_dht.clone()),
        TaskDelay,
    );
    spawn_on_core(Core::App, SAMPLER_PRIORITY, SAMPLER_STACK_KB, "temp\0", move || temp.run())?;

    let hum = SamplingTask::for_quantity(
        Quantity::Humidity,
        &config,
        &READINGS,
        DhtHumidity(shared_dht),
        TaskDelay,
    );
    spawn_on_core(Core::App, SAMPLER_PRIORITY, SAMPLER_STACK_KB, "hum\0", move || hum.run())?;

    let light = SamplingTask::for_quantity(
        Quantity::Light,
        &config,
        &READINGS,
        LightSensor::new(pins::ADC1_CH_LDR),
        TaskDelay,
    );
    spawn_on_core(Core::App, SAMPLER_PRIORITY, SAMPLER_STACK_KB, "light\0", move || light.run())?;

    // ── 7. Monitor loop ───────────────────────────────────────
    let uptime = Uptime::new();
    let mut indicator = Indicator::new();
    let mut power_ctl = PowerController::new(DeepSleep::new(
        Some(config.wake_timer_secs).filter(|&s| s > 0),
    ));
    let mut service = MonitorService::new(&config, uptime.uptime_ms());
    service.start(wake, &mut log_sink);

    info!("System ready. Entering monitor loop.");

    let period = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    let mut last_ms = uptime.uptime_ms();
    loop {
        std::thread::sleep(period);

        let now_ms = uptime.uptime_ms();
        let delta_ms = now_ms.wrapping_sub(last_ms);
        last_ms = now_ms;

        if service.tick(now_ms, delta_ms, &READINGS, &mut indicator, &mut log_sink) == Tick::Sleep {
            power_ctl.enter_low_power(&mut indicator, &READINGS);
        }
    }
}
