//! reel-stream: byte-range primitives for serving media files.
//!
//! - [`range`]: permissive `Range` header parsing into a concrete [`ByteRange`]
//! - [`substream`]: a bounded, seek-once window over an open file
//! - [`crossing`]: one-shot detection of the watched threshold
//! - [`mime`]: content-type resolution from reported type or extension

pub mod crossing;
pub mod mime;
pub mod range;
pub mod substream;

pub use crossing::{threshold_bytes, CrossingDetector, CrossingState};
pub use range::ByteRange;
pub use substream::BoundedSubStream;
