//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements              | Connects to                     |
//! |-------------|-------------------------|---------------------------------|
//! | `hardware`  | InputPort, OutputPort   | Button + status LED drivers     |
//! | `sim_pin`   | embedded-hal digital    | In-memory level (host)          |
//! | `log_sink`  | EventSink, DisplaySink  | Serial / stderr log output      |
//! | `console`   | ModeSource              | stdin / UART operator console   |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod sim_pin;
