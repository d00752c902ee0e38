//! Clip pipeline for voxguess - fetching bytes, decoding to PCM,
//! caching per URL, and the background loader worker.

mod cache;
mod config;
mod decode;
mod fetch;
mod worker;

pub use cache::ClipCache;
pub use config::Config;
pub use decode::{ClipDecoder, DecodeError, DecodedClip};
pub use fetch::{ByteSource, FetchError, UrlByteSource};
pub use worker::{spawn_loader, LoadOutcome, LoadPriority, LoadRequest};
