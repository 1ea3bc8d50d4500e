//! Chunked byte queues and line scanning.
//!
//! Both directions of a connection buffer their bytes in a [`ChunkQueue`]:
//! an ordered sequence of owned chunks with a consumed-offset into the
//! head chunk. The queue hides partial transfers from its users — callers
//! only ever see whole, ordered byte ranges, never chunk boundaries.
//!
//! [`scan_line`] walks the unconsumed range looking for a line terminator;
//! it backs the line-oriented read mode.

mod queue;
mod scan;

pub(crate) use queue::ChunkQueue;
pub(crate) use scan::{ScanOutcome, scan_line};
