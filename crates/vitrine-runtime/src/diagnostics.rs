#![forbid(unsafe_code)]

//! Where lookup failures go.

use vitrine_core::LookupError;

/// Receives one report per failed select.
pub trait DiagnosticSink {
    fn report(&self, error: &LookupError);
}

/// Logs failures as `tracing` errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, error: &LookupError) {
        tracing::error!(
            group = %error.group(),
            slot = error.slot().map(|s| s.as_str()),
            "{error}"
        );
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&LookupError),
{
    fn report(&self, error: &LookupError) {
        self(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn closures_are_sinks() {
        let seen = RefCell::new(Vec::new());
        let sink = |e: &LookupError| seen.borrow_mut().push(e.clone());
        let err = LookupError::UnknownGroup {
            group: "missing".into(),
        };
        sink.report(&err);
        assert_eq!(seen.borrow().as_slice(), &[err]);
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.report(&LookupError::UnknownSlot {
            group: "g".into(),
            slot: "s".into(),
        });
    }
}
