//! Selector subsystem
//!
//! Turns selector JSON into `Selector` entities.
//!
//! # Selector file
//!
//! ```text
//! {
//!   "file_format_version": 1..3,
//!   "duration": "<int><unit>[<int><unit>...]",
//!   "metric": "<metric-name>" | "all",
//!   "ip_translation": { "strategy": "<name>", "params": { ... } },
//!   "subsets": [
//!     { "start_time": "YYYY-MM-DDTHH:MM:SSZ", "client_provider": "<id>", "site": "<id>" }
//!   ]
//! }
//! ```
//!
//! Two subsets compare datasets: exactly one of their fields may differ.

mod duration;
mod errors;
mod parser;
mod types;

pub use duration::{duration_to_string, parse_duration};
pub use errors::{SelectorError, SelectorErrorCode, SelectorResult};
pub use parser::{
    SelectorFileParser, SelectorInput, MAX_FILE_FORMAT_VERSION, MIN_FILE_FORMAT_VERSION,
};
pub use types::{
    window_end, IpTranslationSpec, Metric, MetricSelection, MlabProject, Selector, Subset,
    SubsetField,
};
