//! Observability for telescope
//!
//! - Typed event names attached to every log record
//! - Structured log output (JSON lines or text) via `tracing`
//!
//! # Usage
//!
//! ```ignore
//! use telescope::observability::Event;
//!
//! tracing::info!(event = %Event::QueryGenerated, tables = 3, "built query");
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{init_logging, level_for_verbosity, LogFormat};
