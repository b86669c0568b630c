//! WASM bindings for plot-compat.
//!
//! Exposes `translateOptions` and `resolveLabels` to JavaScript via
//! wasm-bindgen.

use wasm_bindgen::prelude::*;

/// Translate space-separated `key=value` options for `operation`.
///
/// - `engine_version`: release string such as "3.9.2"
/// - `artifacts`: number of artists the call produces
#[wasm_bindgen(js_name = "translateOptions")]
pub fn translate_options(
    operation: &str,
    options: &str,
    engine_version: &str,
    artifacts: usize,
) -> Result<String, JsError> {
    let tokens: Vec<&str> = options.split_whitespace().collect();
    crate::translate_tokens(operation, &tokens, engine_version, artifacts)
        .map(|map| map.to_string())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Size `labels` to `count`; the result is newline-separated.
#[wasm_bindgen(js_name = "resolveLabels")]
pub fn resolve_labels(labels: Vec<String>, count: usize, strict: bool) -> Result<String, JsError> {
    crate::labels::resolve_labels(Some(labels.as_slice()), count, strict)
        .map(|resolved| resolved.labels.join("\n"))
        .map_err(|e| JsError::new(&e.to_string()))
}
