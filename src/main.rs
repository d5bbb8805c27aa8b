//! TankCtl firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      LogEventSink   ConsoleModeReader         │
//! │  (Input+Output)       (EventSink)    (ModeSource)              │
//! │  Lcd / LogDisplay (DisplaySink, lives inside the level lock)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  AppService: single-shot FSM · continuous FSM · timers │    │
//! │  └───────────────────────────┬────────────────────────────┘    │
//! │                              ▼                                 │
//! │                     Arc<LevelRegister> ◀── boot workers (opt)  │
//! │                                                                │
//! │  CycleScheduler (delay-until, one period per cycle)            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io::{self, BufReader};
use std::sync::Arc;

use anyhow::Result;
use log::info;

use tankctl::adapters::console::{ConsoleButtons, ConsoleModeReader};
use tankctl::adapters::hardware::HardwareAdapter;
use tankctl::adapters::log_sink::LogEventSink;
use tankctl::app::ports::{DisplaySink, InputPort, ModeSource, OutputPort};
use tankctl::app::service::AppService;
use tankctl::config::SystemConfig;
use tankctl::level::LevelRegister;
use tankctl::scheduler::CycleScheduler;
use tankctl::sensors::UniformSampler;
use tankctl::workers::BootWorkers;

fn main() -> Result<()> {
    let (config, display, hw, buttons) = bootstrap()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TankCtl v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let console = ConsoleModeReader::spawn(BufReader::new(io::stdin()), buttons)?;
    run_loop(config, display, hw, console)
}

// ── Control loop (both targets) ───────────────────────────────

fn run_loop<D, H, M>(config: SystemConfig, display: D, mut hw: H, mut modes: M) -> Result<()>
where
    D: DisplaySink + Send + 'static,
    H: InputPort + OutputPort,
    M: ModeSource,
{
    config.validate()?;
    let level = Arc::new(LevelRegister::new(
        &config,
        display,
        UniformSampler::from_entropy(),
    ));

    if config.boot_workers {
        // Detached: each runs its operation once and exits.
        let workers = BootWorkers::spawn(&level)?;
        info!("{} boot workers spawned", workers.len());
    }

    let mut app = AppService::new(config.clone(), Arc::clone(&level))?;
    let mut sink = LogEventSink::new();
    app.start(&mut sink);

    let mut scheduler = CycleScheduler::from_period_ms(config.cycle_period_ms);
    loop {
        app.run_cycle(&mut modes, &mut hw, &mut sink);
        scheduler.wait_next();
    }
}

// ── ESP-IDF bootstrap ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
#[allow(clippy::type_complexity)]
fn bootstrap() -> Result<(
    SystemConfig,
    tankctl::drivers::lcd::Lcd<esp_idf_hal::i2c::I2cDriver<'static>, esp_idf_hal::delay::FreeRtos>,
    HardwareAdapter<
        esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::Gpio26, esp_idf_hal::gpio::Input>,
        esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::Gpio32, esp_idf_hal::gpio::Input>,
        esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::Gpio25, esp_idf_hal::gpio::Output>,
    >,
    ConsoleButtons,
)> {
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::gpio::{PinDriver, Pull};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::units::Hertz;
    use log::warn;
    use tankctl::drivers::lcd::Lcd;
    use tankctl::error::Error;
    use tankctl::pins;

    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let p = Peripherals::take()?;

    // Buttons: active low, internal pull-up.
    let mut emergency = PinDriver::input(p.pins.gpio26)?;
    emergency.set_pull(Pull::Up)?;
    let mut stop = PinDriver::input(p.pins.gpio32)?;
    stop.set_pull(Pull::Up)?;
    let led = PinDriver::output(p.pins.gpio25)?;
    info!(
        "GPIO: emergency={} stop={} led={}",
        pins::EMERGENCY_BUTTON_GPIO,
        pins::STOP_BUTTON_GPIO,
        pins::STATUS_LED_GPIO
    );

    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ));
    // SDA = GPIO21, SCL = GPIO22.
    let i2c = I2cDriver::new(p.i2c0, p.pins.gpio21, p.pins.gpio22, &i2c_config)?;
    let mut lcd = Lcd::new(i2c, FreeRtos, pins::LCD_I2C_ADDR);
    if let Err(e) = lcd.init().map_err(|_| Error::Init("LCD")) {
        // Keep running without a display.
        warn!("{e}");
    }

    Ok((
        SystemConfig::default(),
        lcd,
        HardwareAdapter::from_pins(emergency, stop, led),
        ConsoleButtons::default(),
    ))
}

// ── Host simulation bootstrap ─────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[allow(clippy::type_complexity)]
fn bootstrap() -> Result<(
    SystemConfig,
    tankctl::adapters::log_sink::LogDisplay,
    HardwareAdapter<
        tankctl::adapters::sim_pin::SimPin,
        tankctl::adapters::sim_pin::SimPin,
        tankctl::adapters::sim_pin::SimPin,
    >,
    ConsoleButtons,
)> {
    use tankctl::adapters::log_sink::LogDisplay;
    use tankctl::adapters::sim_pin::SimPin;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config();

    // Released buttons read high (pull-up).
    let emergency = SimPin::new(true);
    let stop = SimPin::new(true);
    let led = SimPin::new(false);
    let hw = HardwareAdapter::from_pins(emergency.clone(), stop.clone(), led);

    Ok((
        config,
        LogDisplay::new(),
        hw,
        ConsoleButtons {
            emergency: Some(emergency),
            stop: Some(stop),
        },
    ))
}

/// Load the JSON file named by `TANKCTL_CONFIG`, or fall back to defaults.
#[cfg(not(target_os = "espidf"))]
fn load_config() -> SystemConfig {
    use log::warn;

    let Ok(path) = std::env::var("TANKCTL_CONFIG") else {
        info!("TANKCTL_CONFIG not set, using default configuration");
        return SystemConfig::default();
    };
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            warn!("cannot read config '{path}' ({e}), using defaults");
            return SystemConfig::default();
        }
    };
    match SystemConfig::from_json(&text) {
        Ok(config) => {
            info!("config loaded from '{path}'");
            config
        }
        Err(e) => {
            warn!("config '{path}' rejected ({e}), using defaults");
            SystemConfig::default()
        }
    }
}
