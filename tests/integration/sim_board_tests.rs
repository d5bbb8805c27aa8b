//! Host board: simulated pins, console input and an LCD on a recorded
//! I²C bus, wired the way `main` wires them.

use std::convert::Infallible;
use std::io::Cursor;
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c, Operation};
use parking_lot::Mutex;

use tankctl::adapters::console::{
    handle_line, ConsoleButtons, ConsoleModeReader, LineOutcome, ModeCell,
};
use tankctl::adapters::hardware::HardwareAdapter;
use tankctl::adapters::sim_pin::SimPin;
use tankctl::app::commands::Mode;
use tankctl::app::events::Machine;
use tankctl::app::service::AppService;
use tankctl::config::SystemConfig;
use tankctl::drivers::lcd::Lcd;
use tankctl::fsm::tables::{continuous, single_shot};
use tankctl::level::LevelRegister;
use tankctl::pins;
use tankctl::sensors::ScriptedSampler;

use super::mock_hw::RecordingSink;

// ── Recorded bus ──────────────────────────────────────────────

#[derive(Clone, Default)]
struct SharedBus(Arc<Mutex<Vec<(u8, Vec<u8>)>>>);

impl SharedBus {
    /// Text written since the last clear command.
    fn screen(&self) -> String {
        let writes = self.0.lock();
        let start = writes
            .iter()
            .rposition(|(_, b)| b.as_slice() == [0x01])
            .map_or(0, |i| i + 1);
        writes[start..]
            .iter()
            .filter(|(_, b)| b.len() == 2 && b[0] == 0x40)
            .map(|(_, b)| char::from(b[1]))
            .collect()
    }
}

impl ErrorType for SharedBus {
    type Error = Infallible;
}

impl I2c for SharedBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Infallible> {
        for op in operations {
            if let Operation::Write(bytes) = op {
                self.0.lock().push((address, bytes.to_vec()));
            }
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// ── Board ─────────────────────────────────────────────────────

struct Board {
    app: AppService,
    hw: HardwareAdapter<SimPin, SimPin, SimPin>,
    buttons: ConsoleButtons,
    led: SimPin,
    bus: SharedBus,
}

fn board(initial_level: f32, readings: &[f32]) -> Board {
    let config = SystemConfig {
        initial_level,
        step_delay_ms: 0,
        ..SystemConfig::default()
    };

    let bus = SharedBus::default();
    let mut lcd = Lcd::new(bus.clone(), NoDelay, pins::LCD_I2C_ADDR);
    lcd.init().unwrap();
    let level = Arc::new(LevelRegister::new(
        &config,
        lcd,
        ScriptedSampler::new(readings.iter().copied(), 0.0),
    ));

    let emergency = SimPin::new(true);
    let stop = SimPin::new(true);
    let led = SimPin::new(false);
    Board {
        app: AppService::new(config, level).unwrap(),
        hw: HardwareAdapter::from_pins(emergency.clone(), stop.clone(), led.clone()),
        buttons: ConsoleButtons {
            emergency: Some(emergency),
            stop: Some(stop),
        },
        led,
        bus,
    }
}

impl Board {
    fn cycles(&mut self, modes: &mut ModeCell, sink: &mut RecordingSink, n: u32) -> u32 {
        let mut ran = 0;
        for _ in 0..n {
            if self.app.run_cycle(&mut *modes, &mut self.hw, &mut *sink) {
                ran += 1;
            }
        }
        ran
    }
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn console_selection_drives_single_shot_to_lcd() {
    let mut b = board(8.0, &[0.0]);
    let mut modes = ModeCell::new();
    let mut sink = RecordingSink::new();

    assert_eq!(b.cycles(&mut modes, &mut sink, 3), 0);

    assert_eq!(
        handle_line("0 0", &modes, &b.buttons),
        LineOutcome::Selected(Mode::ManualSingleShot)
    );
    assert_eq!(b.cycles(&mut modes, &mut sink, 6), 6);

    assert_eq!(b.app.state(Machine::SingleShot), single_shot::EVALUATE);
    assert_eq!(b.bus.screen(), "Level = 4");
    assert!(b
        .bus
        .0
        .lock()
        .iter()
        .all(|(addr, _)| *addr == pins::LCD_I2C_ADDR));
}

#[test]
fn console_emergency_toggle_lights_led_pin() {
    let mut b = board(5.0, &[]);
    let mut modes = ModeCell::new();
    let mut sink = RecordingSink::new();

    handle_line("0 0", &modes, &b.buttons);
    b.cycles(&mut modes, &mut sink, 1);

    assert_eq!(
        handle_line("e", &modes, &b.buttons),
        LineOutcome::Toggled {
            button: "emergency",
            pressed: true
        }
    );
    b.cycles(&mut modes, &mut sink, 1);
    assert_eq!(b.app.state(Machine::SingleShot), single_shot::STABILIZING);
    assert!(b.led.level());
    assert!(b.hw.led_is_on());

    handle_line("e", &modes, &b.buttons);
    let ticks = b.app.config().stabilization_ticks();
    b.cycles(&mut modes, &mut sink, ticks);
    assert!(!b.led.level());
}

#[test]
fn console_stop_toggle_halts_continuous() {
    let mut b = board(6.0, &[0.0]);
    let mut modes = ModeCell::new();
    let mut sink = RecordingSink::new();

    handle_line("0 1", &modes, &b.buttons);
    b.cycles(&mut modes, &mut sink, 1);
    handle_line("s", &modes, &b.buttons);
    b.cycles(&mut modes, &mut sink, 1);
    handle_line("s", &modes, &b.buttons);
    assert_eq!(b.app.state(Machine::Continuous), continuous::STOPPED);

    b.cycles(&mut modes, &mut sink, 10);
    assert_eq!(b.bus.screen(), "Level = 3");
}

#[test]
fn reader_thread_keeps_last_valid_selection() {
    let input = Cursor::new("hello\n0\n1\n7 7\n\n");
    let reader = ConsoleModeReader::spawn(input, ConsoleButtons::default()).unwrap();
    let mut modes = reader.join();
    assert_eq!(modes.get(), Some(Mode::Automatic));

    let mut b = board(5.0, &[]);
    let mut sink = RecordingSink::new();
    assert_eq!(b.cycles(&mut modes, &mut sink, 2), 2);
    assert_eq!(b.app.state(Machine::Continuous), continuous::MEASURING);
    assert_eq!(b.app.state(Machine::SingleShot), single_shot::IDLE);
}
