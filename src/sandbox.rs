//! Isolated evaluation of generated service-worker source.
//!
//! A `RunContext` is the whole global scope for one run: a fresh Boa context
//! holding the ambient worker environment and the mock surface, and nothing
//! from the host's own globals.  Isolation supplies a controlled scope, it
//! is not a security boundary.

use std::collections::BTreeMap;

use boa_engine::{Context, Source};

use crate::ambient;
use crate::error::{Error, Result};
use crate::surface::{CallTrace, MockSurface};

/// The synthetic global scope assembled for one evaluation.
///
/// Built fresh per run and consumed by [`RunContext::finish`]; no state is
/// shared across runs.
pub struct RunContext {
    context: Context,
    surface: MockSurface,
}

impl RunContext {
    /// Assemble a fresh scope: ambient worker globals plus the mock surface.
    pub fn new() -> Result<Self> {
        let mut context = Context::default();
        ambient::install(&mut context)
            .map_err(|e| Error::EvaluationError(format!("failed to set up worker scope: {e}")))?;
        let surface = MockSurface::install(&mut context)
            .map_err(|e| Error::EvaluationError(format!("failed to install mock surface: {e}")))?;
        Ok(Self { context, surface })
    }

    /// Evaluate `code` as the top level of a service-worker script.
    ///
    /// Runs synchronously to completion; effects are observed only through
    /// the surface's recorded traces.  Parse errors and thrown exceptions
    /// propagate unchanged as [`Error::EvaluationError`].  Deferred work the
    /// source schedules is not awaited.
    pub fn evaluate(&mut self, code: &str) -> Result<()> {
        log::debug!("evaluating {} bytes of service worker source", code.len());
        self.context
            .eval(Source::from_bytes(code.as_bytes()))
            .map_err(|e| Error::EvaluationError(e.to_string()))?;
        Ok(())
    }

    /// Tear down the run and return the recorded traces, one entry per
    /// surface method (empty when never called).
    pub fn finish(self) -> BTreeMap<&'static str, CallTrace> {
        self.surface.harvest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_propagate() {
        let mut run = RunContext::new().expect("context setup failed");
        let err = run.evaluate("this is not javascript").unwrap_err();
        assert!(matches!(err, Error::EvaluationError(_)));
    }

    #[test]
    fn thrown_exceptions_propagate() {
        let mut run = RunContext::new().expect("context setup failed");
        let err = run.evaluate("throw new Error('boom');").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("boom"), "unexpected message: {msg}");
    }

    #[test]
    fn host_identifiers_are_not_reachable() {
        let mut run = RunContext::new().expect("context setup failed");
        // `process` and `require` belong to a Node host, not this scope
        assert!(run.evaluate("process.exit(0)").is_err());
        assert!(run.evaluate("require('fs')").is_err());
    }

    #[test]
    fn finish_returns_traces_for_the_whole_surface() {
        let mut run = RunContext::new().expect("context setup failed");
        run.evaluate("workbox.skipWaiting();").expect("eval failed");
        let traces = run.finish();
        assert_eq!(traces["skipWaiting"].len(), 1);
        assert!(traces["registerRoute"].is_empty());
    }
}
