//! swharness
//!
//! A test harness that verifies generated service-worker source code makes
//! the expected build-time API calls, without a browser or a real worker
//! runtime.  The source string is evaluated inside an embedded JS engine
//! (Boa) against a synthetic worker scope where every build-time API method
//! is a recording stub; the observed call traces are then compared against
//! caller-supplied expectations.
//!
//! Only the *shape of the configuration calls* made during top-level
//! evaluation is validated, never runtime behavior such as fetch handling
//! or cache hits.
//!
//! # Example
//!
//! ```
//! use swharness::{validate_service_worker, Expectation, ValidateOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut options = ValidateOptions::default();
//! options.sw_code = Some("workbox.skipWaiting();".to_string());
//! options.expected_method_calls.insert(
//!     "skipWaiting".to_string(),
//!     Expectation::Calls(vec![vec![]]),
//! );
//! validate_service_worker(&options)?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

// Synthetic worker-scope globals supplied to the sandbox
pub mod ambient;

// Mock build-time API surface (recording stubs + sentinel factories)
pub mod surface;

// Per-run sandboxed evaluation
pub mod sandbox;

// Trace-vs-expectation comparison
pub mod validate;

pub use sandbox::RunContext;
pub use surface::{CallRecord, CallTrace};

/// Expected calls per surface method name.
///
/// Entries naming methods outside the fixed surface are inert: the validated
/// set is the surface registry, not this map's keys.
pub type ExpectedCalls = BTreeMap<String, Expectation>;

/// The caller's expectation for one surface method.
///
/// Serializes untagged: [`Expectation::NotCalled`] is JSON `null` and
/// [`Expectation::Calls`] is the array of argument-lists, so expectation
/// maps read naturally as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expectation {
    /// The method must not have been called at all
    NotCalled,
    /// The exact ordered sequence of argument-lists the method must have
    /// been called with (deep equality, not identity)
    Calls(CallTrace),
}

/// Configuration for one validation run.
///
/// Exactly one of `sw_file` and `sw_code` must be set; supplying both or
/// neither fails with [`Error::PreconditionError`] before any evaluation.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Path to the generated service-worker file
    pub sw_file: Option<PathBuf>,
    /// Literal generated service-worker source
    pub sw_code: Option<String>,
    /// Expected call trace (or explicit absence) per surface method
    pub expected_method_calls: ExpectedCalls,
}

/// Run one validation: resolve the source, evaluate it in a fresh sandboxed
/// worker scope, and compare every surface method's recorded trace against
/// `expected_method_calls`.
///
/// Returns `Ok(())` only when every comparison passes.  Fails on the first
/// mismatch, carrying the method name and both observed and expected traces;
/// load and evaluation failures propagate as their own error categories.
pub fn validate_service_worker(options: &ValidateOptions) -> Result<()> {
    let code = resolve_source(options)?;
    let mut run = RunContext::new()?;
    run.evaluate(&code)?;
    let traces = run.finish();
    validate::validate_method_calls(&traces, &options.expected_method_calls)
}

fn resolve_source(options: &ValidateOptions) -> Result<String> {
    match (&options.sw_file, &options.sw_code) {
        (Some(_), Some(_)) => Err(Error::PreconditionError(
            "set sw_file or sw_code, but not both".to_string(),
        )),
        (None, None) => Err(Error::PreconditionError(
            "one of sw_file or sw_code is required".to_string(),
        )),
        (Some(path), None) => std::fs::read_to_string(path)
            .map_err(|e| Error::LoadError(format!("{}: {e}", path.display()))),
        (None, Some(code)) => Ok(code.clone()),
    }
}
