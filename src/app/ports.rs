//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (buttons, status LED, display, event sinks, operator
//! console) implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the control core never touches hardware
//! directly and every path can be exercised on the host.

use crate::app::commands::Mode;
use crate::fsm::context::InputSnapshot;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: sampled once per cycle, before the FSM runs.
pub trait InputPort {
    /// Read both push buttons and return a snapshot.
    fn read_inputs(&mut self) -> InputSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: applied once per cycle, after the FSM runs.
pub trait OutputPort {
    /// Drive the status LED (lit while stabilizing).
    fn set_status_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Display port (diagnostic output)
// ───────────────────────────────────────────────────────────────

/// Character display used by the level operations.
///
/// Purely diagnostic: no control decision depends on it, so neither
/// method can fail.  Implementations log and swallow bus errors.
pub trait DisplaySink {
    /// Blank the display and home the cursor.
    fn clear(&mut self);

    /// Print printable characters at the cursor.
    fn print(&mut self, text: &str);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn print(&mut self, text: &str) {
        (**self).print(text);
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Mode source (driving adapter: operator → domain)
// ───────────────────────────────────────────────────────────────

/// Supplies the operator's mode selection, polled once per cycle.
pub trait ModeSource {
    /// The most recent valid selection, or `None` before the operator
    /// has chosen anything.
    fn current_mode(&mut self) -> Option<Mode>;
}

/// A fixed selection, handy for tests and headless runs.
impl ModeSource for Option<Mode> {
    fn current_mode(&mut self) -> Option<Mode> {
        *self
    }
}
