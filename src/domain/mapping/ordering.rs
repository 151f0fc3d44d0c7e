//! Output ordering policies for batch assembly

use clap::ValueEnum;
use serde::Deserialize;

/// How hits and resolved misses are laid out in a batch response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Slot `i` of the output answers request `i`; unresolved slots stay in place
    #[default]
    Positional,
    /// Cache hits first (input order), then resolved misses (miss order);
    /// unresolved misses are dropped. Reproduces the legacy response layout.
    #[value(alias = "legacy")]
    HitsFirst,
}

impl std::fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderingPolicy::Positional => write!(f, "positional"),
            OrderingPolicy::HitsFirst => write!(f, "hits_first"),
        }
    }
}
