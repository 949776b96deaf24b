//! Core library for batch transcoding camera footage into proxy files.
//!
//! The crate probes each source file for frame count, frame rate and start
//! timecode, picks a proxy codec, builds the ffmpeg invocation and follows the
//! encoder's progress stream to report monotonic frame progress. Items are
//! processed strictly one after another; a failure on one item never stops
//! the batch.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use proxyforge_core::events::{EventDispatcher, LogEventHandler};
//! use proxyforge_core::external::{SidecarSpawner, prober_for};
//! use proxyforge_core::{BatchSummary, CoreConfigBuilder, find_source_items, process_items};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! let config = CoreConfigBuilder::new()
//!     .footage_root(PathBuf::from("/footage"))
//!     .proxy_root(PathBuf::from("/proxies"))
//!     .build()?;
//!
//! let items = find_source_items(&config.footage_root, &config.proxy_root, &config.proxy_extension)?;
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.add_handler(Arc::new(LogEventHandler::new()));
//!
//! let start = Instant::now();
//! let prober = prober_for(config.probe_tool);
//! let outcomes = process_items(&config, &*prober, SidecarSpawner, &items, &dispatcher);
//! let summary = BatchSummary::from_outcomes(&outcomes, start.elapsed());
//! println!("{} of {} proxies written", summary.succeeded, summary.items_total);
//! # Ok::<(), proxyforge_core::CoreError>(())
//! ```

pub mod config;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod events;
pub mod external;
pub mod media;
pub mod platform;
pub mod processing;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::{SourceItem, find_source_items};
pub use encoding::{CodecChoice, CommandBuilder, EncodePlan, ProxyCodec};
pub use error::{CoreError, CoreResult};
pub use media::{MediaMetadata, extract_metadata};
pub use platform::{Platform, PlatformProfile};
pub use processing::{BatchCoordinator, BatchProgress, BatchSummary, TranscodeOutcome, process_items};
pub use utils::{format_bytes, format_duration};
