//! Anime torrent providers.
//!
//! Each provider queries one or more external indexes and normalizes their
//! responses into [`AnimeTorrent`] records. Upstream failures are absorbed:
//! a provider call always yields a [`SearchOutcome`], with failed sources
//! listed next to whatever results the others produced.

mod aggregator;
mod lenient;
mod multi_source;
mod registry;
mod rss;
mod size;
mod types;

pub use aggregator::{AggregatorProvider, AGGREGATOR_PROVIDER_NAME};
pub use multi_source::{is_title_relevant, MultiSourceProvider, MULTI_SOURCE_PROVIDER_NAME};
pub use registry::{create_registry, ProviderRegistry};
pub use rss::{parse_feed, FeedItem};
pub use size::{format_megabytes, parse_binary_size};
pub use types::*;
