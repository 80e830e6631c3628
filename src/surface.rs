//! Mock build-time API surface: a fixed registry of recording stubs.
//!
//! The surface is declared as data (`SURFACE`): each entry names a method,
//! its dotted path inside the evaluation scope, and an optional fixed
//! sentinel the stub returns when called.  Factory stubs (caching strategies
//! and cache-behavior plugins) return the sentinel naming themselves instead
//! of a real object, so test expectations can assert on configuration
//! composition (e.g. "this strategy was configured with that plugin")
//! without modeling plugin internals.
//!
//! Every stub, when invoked from JS, appends the invocation's arguments to
//! its trace in call order.  `NativeFunction::from_copy_closure` only
//! accepts `Copy` closures, which rules out capturing an `Rc<RefCell<..>>`
//! recorder directly; recorded calls therefore go through a thread-local
//! side channel.  Evaluation is single-threaded, the log is cleared on
//! `install` and drained by the consuming `harvest`, so no state leaks
//! between runs.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use boa_engine::object::JsObject;
use boa_engine::{js_string, Context, JsResult, JsString, JsValue, NativeFunction};

/// The ordered argument values of one recorded invocation
pub type CallRecord = Vec<serde_json::Value>;

/// The ordered sequence of records for one method across one run
pub type CallTrace = Vec<CallRecord>;

/// One row of the surface registry
pub struct MethodSpec {
    /// Key used in expectation maps and diagnostics
    pub name: &'static str,
    /// Path segments under the evaluation scope (e.g. `workbox.routing.registerRoute`)
    pub path: &'static [&'static str],
    /// Fixed value the stub returns; `None` returns `undefined`
    pub sentinel: Option<&'static str>,
}

/// The fixed, enumerated build-time API surface.
///
/// Validation is exhaustive over exactly this set; expectation entries for
/// names outside it are never read.
pub const SURFACE: &[MethodSpec] = &[
    MethodSpec {
        name: "importScripts",
        path: &["importScripts"],
        sentinel: None,
    },
    MethodSpec {
        name: "cacheableResponsePlugin",
        path: &["workbox", "cacheableResponse", "Plugin"],
        sentinel: Some("workbox.cacheableResponse.Plugin"),
    },
    MethodSpec {
        name: "cacheExpirationPlugin",
        path: &["workbox", "expiration", "Plugin"],
        sentinel: Some("workbox.expiration.Plugin"),
    },
    MethodSpec {
        name: "cacheFirst",
        path: &["workbox", "strategies", "cacheFirst"],
        sentinel: Some("cacheFirst"),
    },
    MethodSpec {
        name: "networkFirst",
        path: &["workbox", "strategies", "networkFirst"],
        sentinel: Some("networkFirst"),
    },
    MethodSpec {
        name: "staleWhileRevalidate",
        path: &["workbox", "strategies", "staleWhileRevalidate"],
        sentinel: Some("staleWhileRevalidate"),
    },
    MethodSpec {
        name: "clientsClaim",
        path: &["workbox", "clientsClaim"],
        sentinel: None,
    },
    MethodSpec {
        name: "precacheAndRoute",
        path: &["workbox", "precaching", "precacheAndRoute"],
        sentinel: None,
    },
    MethodSpec {
        name: "suppressWarnings",
        path: &["workbox", "precaching", "suppressWarnings"],
        sentinel: None,
    },
    MethodSpec {
        name: "registerNavigationRoute",
        path: &["workbox", "routing", "registerNavigationRoute"],
        sentinel: None,
    },
    MethodSpec {
        name: "registerRoute",
        path: &["workbox", "routing", "registerRoute"],
        sentinel: None,
    },
    MethodSpec {
        name: "setCacheNameDetails",
        path: &["workbox", "core", "setCacheNameDetails"],
        sentinel: None,
    },
    MethodSpec {
        name: "setConfig",
        path: &["workbox", "setConfig"],
        sentinel: None,
    },
    MethodSpec {
        name: "skipWaiting",
        path: &["workbox", "skipWaiting"],
        sentinel: None,
    },
];

thread_local! {
    static TRACES: RefCell<BTreeMap<&'static str, CallTrace>> = RefCell::new(BTreeMap::new());
}

fn record_call(name: &'static str, record: CallRecord) {
    log::trace!("recorded call {}/{} args", name, record.len());
    TRACES.with(|t| t.borrow_mut().entry(name).or_default().push(record));
}

/// Convert one JS argument into its recorded form.
///
/// `undefined` records as JSON `null` and callables as a fixed `[function]`
/// tag.  Other objects go through the engine's own `JSON.stringify`, which
/// throws a catchable `TypeError` on cyclic values instead of recursing;
/// anything it cannot serialize records as `[unserializable]`.  Records stay
/// deterministic and structurally comparable.
fn json_arg(value: &JsValue, context: &mut Context) -> serde_json::Value {
    if value.is_undefined() {
        return serde_json::Value::Null;
    }
    if value.as_object().is_some_and(JsObject::is_callable) {
        return serde_json::Value::String("[function]".to_string());
    }
    if !value.is_object() {
        return value
            .to_json(context)
            .unwrap_or_else(|_| serde_json::Value::String(value.display().to_string()));
    }
    match stringify_via_engine(value, context) {
        Ok(Some(json)) => json,
        _ => serde_json::Value::String("[unserializable]".to_string()),
    }
}

/// Serialize an object argument with the context's intrinsic
/// `JSON.stringify`, then parse the resulting text back into a
/// `serde_json::Value`.  Function-valued properties are dropped the way
/// `JSON.stringify` always drops them; `Ok(None)` means the value has no
/// JSON form at all.
fn stringify_via_engine(
    value: &JsValue,
    context: &mut Context,
) -> JsResult<Option<serde_json::Value>> {
    let json_object = context.intrinsics().objects().json();
    let stringify = json_object.get(js_string!("stringify"), context)?;
    let Some(stringify) = stringify.as_callable() else {
        return Ok(None);
    };
    let text = stringify.call(&JsValue::undefined(), &[value.clone()], context)?;
    if text.is_undefined() {
        return Ok(None);
    }
    let text = text.to_string(context)?.to_std_string_escaped();
    Ok(serde_json::from_str(&text).ok())
}

fn recording_stub(name: &'static str, sentinel: Option<&'static str>) -> NativeFunction {
    NativeFunction::from_copy_closure(move |_this, args, ctx| {
        let mut record = CallRecord::with_capacity(args.len());
        for arg in args {
            record.push(json_arg(arg, ctx));
        }
        record_call(name, record);
        Ok(match sentinel {
            Some(s) => JsValue::from(JsString::from(s)),
            None => JsValue::undefined(),
        })
    })
}

/// Look up or create an intermediate namespace object (e.g. `workbox.routing`).
fn namespace(owner: &JsObject, name: &str, context: &mut Context) -> JsResult<JsObject> {
    let key = JsString::from(name);
    let existing = owner.get(key.clone(), context)?;
    if let Some(obj) = existing.as_object() {
        return Ok(obj.clone());
    }
    let ns = JsObject::with_object_proto(context.intrinsics());
    owner.set(key, ns.clone(), false, context)?;
    Ok(ns)
}

/// A freshly installed mock surface for one run.
///
/// Installing clears the trace log; `harvest` consumes the surface and
/// drains it, so traces cannot be read twice or shared across runs.
pub struct MockSurface {
    // The trace log is thread-local; keep the surface off other threads.
    _not_send: PhantomData<*const ()>,
}

impl MockSurface {
    /// Build the full surface inside `context`, one recording stub per
    /// registry entry, creating namespace objects along each path.
    pub fn install(context: &mut Context) -> JsResult<Self> {
        TRACES.with(|t| t.borrow_mut().clear());
        let global = context.global_object();
        for spec in SURFACE {
            let mut owner = global.clone();
            for segment in &spec.path[..spec.path.len() - 1] {
                owner = namespace(&owner, segment, context)?;
            }
            let leaf = spec.path[spec.path.len() - 1];
            let stub = recording_stub(spec.name, spec.sentinel).to_js_function(context.realm());
            owner.set(JsString::from(leaf), stub, false, context)?;
        }
        log::debug!("installed {} surface stubs", SURFACE.len());
        Ok(Self {
            _not_send: PhantomData,
        })
    }

    /// Drain the recorded traces, with an empty trace for every surface
    /// method that was never invoked.
    pub fn harvest(self) -> BTreeMap<&'static str, CallTrace> {
        let mut traces = TRACES.with(|t| t.take());
        for spec in SURFACE {
            traces.entry(spec.name).or_default();
        }
        traces
    }
}
