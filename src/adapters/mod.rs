//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements                         | Connects to          |
//! |------------|------------------------------------|----------------------|
//! | `log_sink` | EventSink                          | log output           |
//! | `sim`      | StackPort, SettingsPort,           | scripted host        |
//! |            | FactoryResetPort, hal pin fakes    | simulation           |
//! | `time`     | monotonic ms clock                 | `std::time::Instant` |

pub mod log_sink;
pub mod sim;
pub mod time;
