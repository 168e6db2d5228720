use std::error::Error as _;
use std::fmt;
use std::sync::Arc;

use crate::channel::Channel;
use crate::error::SyncError;
use crate::product::ProductId;

/// Receives the outcomes of a sync run.
///
/// Coordinators never return errors to their caller. Everything that goes
/// wrong, and every channel that is skipped, is handed to a reporter so that
/// the caller decides how to present it (log, alert, collect in tests).
pub trait Reporter: Send + Sync {
    fn report_error(&self, error: &SyncError);

    fn report_skip(&self, product_id: ProductId, channel: &Channel, message: &str);
}

impl<T: Reporter + ?Sized> Reporter for Arc<T> {
    fn report_error(&self, error: &SyncError) {
        (**self).report_error(error)
    }

    fn report_skip(&self, product_id: ProductId, channel: &Channel, message: &str) {
        (**self).report_skip(product_id, channel, message)
    }
}

/// Reporter that writes to `tracing`.
///
/// Errors go out at `error` with the remote response body and headers as
/// fields, followed by the full source chain at `debug` under the `webhooks`
/// target. Skips go out at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report_error(&self, error: &SyncError) {
        let api = error.api_error();
        let response = api.and_then(|e| e.response_body()).unwrap_or_default();
        let headers = api.map(|e| e.response_headers()).unwrap_or_default();

        tracing::error!(
            error = %error,
            response,
            headers = ?headers,
            "product import failed"
        );
        tracing::debug!(target: "webhooks", trace = %error_chain(error), "import error trace");
    }

    fn report_skip(&self, product_id: ProductId, channel: &Channel, message: &str) {
        tracing::info!(%product_id, channel = %channel, "skipped product update: {message}");
    }
}

/// Renders an error and its sources, outermost first.
pub fn error_chain(error: &SyncError) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        chain.push_str("\n  caused by: ");
        chain.push_str(&inner.to_string());
        source = inner.source();
    }
    chain
}

/// Summary of one sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub product_id: ProductId,
    /// Importer calls that succeeded.
    pub imported: u64,
    /// Channels skipped: no remote id, or no local listing on update.
    pub skipped: u64,
    /// Channels whose remote call or import failed.
    pub failed: u64,
    /// The run stopped before the channel loop (no channels, fetch failure).
    pub aborted: bool,
}

impl SyncReport {
    pub(crate) fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            imported: 0,
            skipped: 0,
            failed: 0,
            aborted: false,
        }
    }

    pub(crate) fn aborted(product_id: ProductId) -> Self {
        Self {
            aborted: true,
            ..Self::new(product_id)
        }
    }

    /// True when nothing failed and the run was not aborted.
    pub fn is_clean(&self) -> bool {
        !self.aborted && self.failed == 0
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.aborted {
            return write!(f, "product {}: sync aborted", self.product_id);
        }
        write!(
            f,
            "product {}: {} imported, {} skipped, {} failed",
            self.product_id, self.imported, self.skipped, self.failed
        )
    }
}
