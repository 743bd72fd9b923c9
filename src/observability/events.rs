//! Observable events
//!
//! Every log record carries one of these as its `event` field, so log
//! consumers can match on a stable name rather than on message text.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Selector parsing
    /// A selector file was read and expanded
    SelectorParsed,
    /// Two subsets differ in exactly one field
    IndependentVariableFound,
    /// A selector file was rejected
    SelectorRejected,

    // Query generation
    /// Query string built for one selector
    QueryGenerated,
    /// Query generation failed for one selector
    QueryRejected,
    /// Server IP list contained duplicates
    DuplicateServerIps,
    /// Client network blocks contained duplicates
    DuplicateClientBlocks,
    /// Query will run in batch mode
    QueryBatched,
    /// Query text written to disk
    QuerySaved,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SelectorParsed => "SELECTOR_PARSED",
            Event::IndependentVariableFound => "INDEPENDENT_VARIABLE_FOUND",
            Event::SelectorRejected => "SELECTOR_REJECTED",
            Event::QueryGenerated => "QUERY_GENERATED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::DuplicateServerIps => "DUPLICATE_SERVER_IPS",
            Event::DuplicateClientBlocks => "DUPLICATE_CLIENT_BLOCKS",
            Event::QueryBatched => "QUERY_BATCHED",
            Event::QuerySaved => "QUERY_SAVED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
