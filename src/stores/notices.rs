//! User-facing notices raised by the stores

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Something the UI should tell the user about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StoreNotice {
    /// Changes are live for this session but could not be saved
    SaveFailed { scope: &'static str, message: String },
}

impl std::fmt::Display for StoreNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreNotice::SaveFailed { scope, message } => {
                write!(f, "Could not save {}: {}", scope, message)
            }
        }
    }
}

/// Tracks save outcomes so a failing backend produces one notice, not one
/// per mutation. A successful save re-arms the notice.
#[derive(Debug, Default)]
pub struct SaveNotices {
    reported: AtomicBool,
    pending: Mutex<Vec<StoreNotice>>,
}

impl SaveNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        if self.reported.swap(false, Ordering::AcqRel) {
            debug!("Storage writes are succeeding again");
        }
    }

    pub fn record_failure(&self, scope: &'static str, err: &StoreError) {
        if self.reported.swap(true, Ordering::AcqRel) {
            debug!("Suppressed repeated {} save failure: {}", scope, err);
            return;
        }

        warn!(
            "Could not save {}; changes are kept for this session only: {}",
            scope, err
        );
        self.pending.lock().push(StoreNotice::SaveFailed {
            scope,
            message: err.to_string(),
        });
    }

    /// Drain notices not yet shown
    pub fn take(&self) -> Vec<StoreNotice> {
        std::mem::take(&mut *self.pending.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reported_once_until_success() {
        let notices = SaveNotices::new();
        let err = StoreError::EmptyField("name");

        notices.record_failure("content", &err);
        notices.record_failure("content", &err);
        assert_eq!(notices.take().len(), 1);
        assert!(notices.take().is_empty());

        notices.record_success();
        notices.record_failure("content", &err);
        assert_eq!(notices.take().len(), 1);
    }
}
