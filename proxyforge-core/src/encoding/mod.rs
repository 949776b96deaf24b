//! Per-item encoding: codec policy, command building and progress monitoring.
//!
//! Data flows one way through this module: [`policy`] picks the codec from
//! metadata, [`command`] turns the decision into an ffmpeg argument list and
//! [`monitor`] runs it and reports frame progress.

pub mod command;
pub mod monitor;
pub mod policy;

pub use command::{CommandBuilder, EncodePlan, VideoFilterChain, escape_filter_text};
pub use monitor::{FrameCounter, FrameUpdate, ProgressEvents, monitor_encode, parse_frame_line};
pub use policy::{CodecChoice, CodecParameters, CodecSelection, ProxyCodec, resolve_codec, select_codec};
