//! HD44780 character LCD behind a PCF8574-style I2C backpack.
//!
//! ## Framing
//!
//! | Transfer | Bytes on the bus      |
//! |----------|-----------------------|
//! | Command  | `[cmd]`               |
//! | Data     | `[0x40, byte]`        |
//!
//! Generic over `embedded-hal` 1.0 `I2c` and `DelayNs`, so the firmware
//! passes an `esp_idf_hal` I2C driver and tests pass a recorder.  The
//! display is diagnostic only: `DisplaySink` swallows bus errors after
//! logging them.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::DisplaySink;

// ---------------------------------------------------------------------------
// Command set
// ---------------------------------------------------------------------------

pub const CMD_CLEAR: u8 = 0x01;
pub const CMD_ENTRY_MODE_SET: u8 = 0x04;
pub const CMD_DISPLAY_CONTROL: u8 = 0x08;
pub const CMD_FUNCTION_SET: u8 = 0x20;

/// Control byte that prefixes every data write.
const DATA_PREFIX: u8 = 0x40;

/// Power-on wait before the first command.
const POWER_ON_DELAY_MS: u32 = 50;

/// Init sequence: (command, delay after it in ms).
const INIT_SEQUENCE: [(u8, u32); 8] = [
    (CMD_FUNCTION_SET | 0x30, 5),
    (CMD_FUNCTION_SET | 0x30, 1),
    (CMD_FUNCTION_SET | 0x30, 1),
    (CMD_FUNCTION_SET | 0x20, 1),
    (CMD_FUNCTION_SET | 0x20, 1),
    (CMD_DISPLAY_CONTROL | 0x08, 1),
    (CMD_CLEAR, 2),
    (CMD_ENTRY_MODE_SET | 0x06, 1),
];

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

pub struct Lcd<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Lcd<I, D> {
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Run the power-on initialisation sequence.
    pub fn init(&mut self) -> Result<(), I::Error> {
        self.delay.delay_ms(POWER_ON_DELAY_MS);
        for (cmd, wait_ms) in INIT_SEQUENCE {
            self.send_command(cmd)?;
            self.delay.delay_ms(wait_ms);
        }
        info!("LCD initialised at 0x{:02X}", self.address);
        Ok(())
    }

    pub fn send_command(&mut self, cmd: u8) -> Result<(), I::Error> {
        self.i2c.write(self.address, &[cmd])
    }

    pub fn send_data(&mut self, byte: u8) -> Result<(), I::Error> {
        self.i2c.write(self.address, &[DATA_PREFIX, byte])
    }

    /// Write `text` at the cursor.  Non-ASCII characters print as `?`.
    pub fn write_str(&mut self, text: &str) -> Result<(), I::Error> {
        for ch in text.chars() {
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.send_data(byte)?;
        }
        Ok(())
    }

    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }
}

impl<I: I2c, D: DelayNs> DisplaySink for Lcd<I, D> {
    fn clear(&mut self) {
        if let Err(e) = self.send_command(CMD_CLEAR) {
            warn!("LCD clear failed: {e:?}");
        }
    }

    fn print(&mut self, text: &str) {
        if let Err(e) = self.write_str(text) {
            warn!("LCD print failed: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::i2c::{ErrorType, Operation};

    #[derive(Default)]
    struct BusRecorder {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl ErrorType for BusRecorder {
        type Error = Infallible;
    }

    impl I2c for BusRecorder {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Infallible> {
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    fn lcd() -> Lcd<BusRecorder, CountingDelay> {
        Lcd::new(BusRecorder::default(), CountingDelay::default(), 0x27)
    }

    #[test]
    fn init_sends_sequence() {
        let mut lcd = lcd();
        lcd.init().unwrap();
        let (bus, delay) = lcd.release();
        let cmds: Vec<u8> = bus.writes.iter().map(|(_, b)| b[0]).collect();
        assert_eq!(cmds, vec![0x30, 0x30, 0x30, 0x20, 0x20, 0x08, 0x01, 0x06]);
        assert!(bus.writes.iter().all(|(addr, b)| *addr == 0x27 && b.len() == 1));
        // 50 ms power-on plus 13 ms of inter-command waits.
        assert_eq!(delay.total_ns, 63_000_000);
    }

    #[test]
    fn print_frames_each_byte() {
        let mut lcd = lcd();
        lcd.print("Hi");
        lcd.clear();
        let (bus, _) = lcd.release();
        assert_eq!(
            bus.writes,
            vec![
                (0x27, vec![0x40, b'H']),
                (0x27, vec![0x40, b'i']),
                (0x27, vec![CMD_CLEAR]),
            ]
        );
    }

    #[test]
    fn non_ascii_is_replaced() {
        let mut lcd = lcd();
        lcd.print("é");
        let (bus, _) = lcd.release();
        assert_eq!(bus.writes, vec![(0x27, vec![0x40, b'?'])]);
    }
}
