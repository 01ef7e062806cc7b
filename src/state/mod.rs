//! State module for tracking crawl progress
//!
//! This module provides the data model threaded through a crawl.
//!
//! # Components
//!
//! - `IdeaRecord`: One extracted idea, an ordered field → value mapping
//! - `CrawlResult`: The aggregate of a crawl (records plus page count)
//! - `PageContext`: Per-iteration cursor of the sequential crawl loop
//! - `StopReason`: Why a crawl loop terminated

mod crawl_result;
mod page_context;
mod record;

// Re-export main types
pub use crawl_result::CrawlResult;
pub use page_context::{PageContext, StopReason};
pub use record::{Field, IdeaRecord};
