//! GPIO / peripheral pin assignments for the tank controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  The firmware binary selects the matching
//! `esp_idf_hal` pin objects; keep both in sync when rewiring.

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Digital output: lit while the tank is stabilizing after an emergency stop.
pub const STATUS_LED_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Push buttons (active LOW, internal pull-up)
// ---------------------------------------------------------------------------

/// Emergency stop button.
pub const EMERGENCY_BUTTON_GPIO: i32 = 26;
/// Stop-measurement button (continuous mode).
pub const STOP_BUTTON_GPIO: i32 = 32;

// ---------------------------------------------------------------------------
// Character LCD (HD44780 behind a PCF8574 I2C backpack)
// ---------------------------------------------------------------------------

/// Standard-mode I2C.
pub const I2C_FREQ_HZ: u32 = 100_000;
/// 7-bit address of the LCD backpack.
pub const LCD_I2C_ADDR: u8 = 0x27;
