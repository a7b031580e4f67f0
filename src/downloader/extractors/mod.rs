// Format discovery module
//
// Provides two modes:
// - JSON mode: the fetch tool's machine-readable dump (robust, preferred)
// - Listing mode: heuristic scrape of the tabular `-F` output, kept
//   behavior-compatible with the historical parse
//
// The orchestrator tries JSON first and falls back to the scrape.

mod diagnostics;
mod json;
mod listing;
mod orchestrator;
mod traits;

pub use diagnostics::{diagnose_error, BlockingReason};
pub use json::JsonFormatExtractor;
pub use listing::{dedupe_and_rank, parse_listing, ListingFormatExtractor};
pub use orchestrator::FormatDiscovery;
pub use traits::{FormatExtractor, ListingConfig};
