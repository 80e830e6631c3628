//! Comparison of observed call traces against caller expectations.
//!
//! Validation is exhaustive over the fixed surface registry, in declared
//! order, and stops at the first failing method.  The semantics are
//! asymmetric: a method that was never called passes only when the
//! expectation map has no meaningful entry for it, while a method that was
//! called must deep-equal its expected trace — an absent entry then counts
//! as a mismatch.  Expectation entries naming methods outside the registry
//! are never read.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::surface::{CallRecord, CallTrace, SURFACE};
use crate::Expectation;

/// Validate every surface method's trace against the expectation map.
pub fn validate_method_calls(
    traces: &BTreeMap<&'static str, CallTrace>,
    expected: &BTreeMap<String, Expectation>,
) -> Result<()> {
    for spec in SURFACE {
        let name = spec.name;
        let trace: &[CallRecord] = traces.get(name).map(Vec::as_slice).unwrap_or(&[]);
        let expectation = expected.get(name);
        if trace.is_empty() {
            match expectation {
                None | Some(Expectation::NotCalled) => {}
                Some(Expectation::Calls(calls)) => {
                    return Err(mismatch(name, Some(calls), None));
                }
            }
        } else {
            match expectation {
                Some(Expectation::Calls(calls)) if calls.as_slice() == trace => {}
                Some(Expectation::Calls(calls)) => {
                    return Err(mismatch(name, Some(calls), Some(trace)));
                }
                Some(Expectation::NotCalled) | None => {
                    return Err(mismatch(name, None, Some(trace)));
                }
            }
        }
        log::trace!("method calls for {name} match");
    }
    Ok(())
}

fn mismatch(
    method: &'static str,
    expected: Option<&CallTrace>,
    observed: Option<&[CallRecord]>,
) -> Error {
    Error::MethodCallsError {
        method,
        expected: render(expected.map(Vec::as_slice)),
        observed: render(observed),
    }
}

fn render(trace: Option<&[CallRecord]>) -> String {
    match trace {
        None => "not called".to_string(),
        Some(t) => serde_json::to_string(t).unwrap_or_else(|_| format!("{t:?}")),
    }
}
