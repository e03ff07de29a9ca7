//! Warning sink for failures that are recovered rather than returned

use tracing::warn;

/// Receives warnings about input that was skipped
pub trait Logger {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing::warn!` under the `mail_metadata` target
///
/// Nothing is written unless the host installs a subscriber; a
/// `tracing_subscriber::fmt` subscriber prints to standard error. Without one,
/// skipped-address warnings are dropped. Pass another [`Logger`] to
/// [`Extractor::with_logger`](crate::Extractor::with_logger) to collect them
/// elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, message: &str) {
        warn!(target: "mail_metadata", "{message}");
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}

impl<L: Logger + ?Sized> Logger for std::sync::Arc<L> {
    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}
