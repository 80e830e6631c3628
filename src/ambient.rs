//! Synthetic service-worker ambient environment.
//!
//! Generated service workers reference worker-scope globals (`self`,
//! `addEventListener`, `caches`, ...) during their top-level evaluation.
//! These are installed as inert stand-ins so that evaluation does not throw;
//! nothing here is recorded or validated.  Promise-returning members resolve
//! immediately to `undefined` — deferred work scheduled through them is
//! never awaited by the harness.

use boa_engine::object::builtins::JsPromise;
use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{js_string, Context, JsResult, JsValue, NativeFunction};

fn noop() -> NativeFunction {
    NativeFunction::from_copy_closure(|_this, _args, _ctx| Ok(JsValue::undefined()))
}

fn resolved() -> NativeFunction {
    NativeFunction::from_copy_closure(|_this, _args, ctx| {
        let promise = JsPromise::resolve(JsValue::undefined(), ctx);
        Ok(JsValue::from(promise))
    })
}

/// Install the ambient worker globals into `context`.
pub fn install(context: &mut Context) -> JsResult<()> {
    let caches = ObjectInitializer::new(context)
        .function(resolved(), js_string!("open"), 1)
        .function(resolved(), js_string!("match"), 1)
        .function(resolved(), js_string!("has"), 1)
        .function(resolved(), js_string!("delete"), 1)
        .function(resolved(), js_string!("keys"), 0)
        .build();
    context.register_global_property(js_string!("caches"), caches, Attribute::all())?;

    let clients = ObjectInitializer::new(context)
        .function(resolved(), js_string!("claim"), 0)
        .function(resolved(), js_string!("matchAll"), 0)
        .build();
    context.register_global_property(js_string!("clients"), clients, Attribute::all())?;

    let location = ObjectInitializer::new(context)
        .property(
            js_string!("href"),
            js_string!("https://example.com/sw.js"),
            Attribute::all(),
        )
        .property(
            js_string!("origin"),
            js_string!("https://example.com"),
            Attribute::all(),
        )
        .build();
    context.register_global_property(js_string!("location"), location, Attribute::all())?;

    context.register_global_property(
        js_string!("addEventListener"),
        noop().to_js_function(context.realm()),
        Attribute::all(),
    )?;
    context.register_global_property(
        js_string!("removeEventListener"),
        noop().to_js_function(context.realm()),
        Attribute::all(),
    )?;

    // `self` is the worker scope itself, so `self.caches` and friends resolve
    let global = context.global_object();
    context.register_global_property(js_string!("self"), global, Attribute::all())?;

    Ok(())
}
