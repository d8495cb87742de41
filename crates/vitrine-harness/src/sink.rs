#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use vitrine_core::LookupError;
use vitrine_runtime::DiagnosticSink;

/// Diagnostic sink that keeps every report. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    reports: Rc<RefCell<Vec<LookupError>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reports(&self) -> Vec<LookupError> {
        self.reports.borrow().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.reports.borrow().len()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, error: &LookupError) {
        tracing::debug!(%error, "lookup failure recorded");
        self.reports.borrow_mut().push(error.clone());
    }
}
