//! Cooperative cancellation for long-running extractions
//!
//! A [`CancelToken`] is cloned into an extraction and checked at the loop
//! boundaries where giving up is safe: between k-means iterations and
//! between points of the DBSCAN outer scan. A fired token surfaces as
//! [`ExtractionError::Cancelled`] and all intermediate buffers are dropped
//! on unwind of the call stack.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ExtractionError, Result};

/// Shared flag that requests a running extraction to stop
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; all clones observe the change
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Fail with [`ExtractionError::Cancelled`] if the token has fired
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ExtractionError::Cancelled)
        } else {
            Ok(())
        }
    }
}
