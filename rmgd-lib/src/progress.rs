//! Import progress reporting.

/// Receives progress updates during a bulk import.
pub trait ImportProgress {
    /// Called after each raw record is processed.
    fn on_record(&self, current: usize, total: usize, id: &str);

    /// Called once the import has been committed.
    fn on_complete(&self, message: &str);
}

/// Discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_record(&self, _current: usize, _total: usize, _id: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// Logs every 500th record and the final summary.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_record(&self, current: usize, total: usize, id: &str) {
        if current.is_multiple_of(500) || current == total {
            log::info!("  [{}/{}] {}", current, total, id);
        }
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
