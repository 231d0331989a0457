//! WASM-compatible wrapper for slide deck compilation.
//!
//! This crate exposes the compiler to JavaScript for use in Cloudflare
//! Workers.

use deck_core::{CompilerOptions, RenderRequest};
use deck_pptx::{CompiledOutput, Compiler, PptxReader};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Summary of one slide of an inspected deck.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectedSlide {
    pub number: usize,
    pub texts: Vec<String>,
    pub notes: String,
    pub picture_count: usize,
}

/// Result of inspecting a `.pptx` file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectResult {
    pub title: Option<String>,
    pub slide_count: usize,
    pub slides: Vec<InspectedSlide>,
}

/// Compile a render request into a presentation.
///
/// # Arguments
/// * `request` - `{ document, style, parts? }`
/// * `options` - Optional compiler options (`undefined` for defaults)
///
/// # Returns
/// `{ filename, contentType, parts, bytes }` with `bytes` as a `Uint8Array`,
/// or throws on error.
#[wasm_bindgen]
pub fn compile_deck(request: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let request: RenderRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| JsValue::from_str(&format!("Invalid render request: {}", e)))?;
    let options: CompilerOptions = if options.is_undefined() || options.is_null() {
        CompilerOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))?
    };

    let output = compile_deck_impl(&request, options).map_err(|e| JsValue::from_str(&e))?;

    let result = js_sys::Object::new();
    set(&result, "filename", &JsValue::from_str(&output.filename))?;
    set(&result, "contentType", &JsValue::from_str(output.content_type))?;
    set(&result, "parts", &JsValue::from_f64(output.parts as f64))?;
    set(&result, "bytes", &js_sys::Uint8Array::from(output.bytes.as_slice()).into())?;
    Ok(result.into())
}

fn set(target: &js_sys::Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    js_sys::Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn compile_deck_impl(request: &RenderRequest, options: CompilerOptions) -> Result<CompiledOutput, String> {
    // Workers run single-threaded
    let options = options.with_parallel_parts(false);
    Compiler::new(options)
        .compile(request, None)
        .map_err(|e| format!("Compilation error: {}", e))
}

/// Read back the slides of a `.pptx` file.
///
/// # Arguments
/// * `data` - The raw bytes of the PPTX file
#[wasm_bindgen]
pub fn inspect_deck(data: &[u8]) -> Result<JsValue, JsValue> {
    let result = inspect_deck_impl(data).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn inspect_deck_impl(data: &[u8]) -> Result<InspectResult, String> {
    let summary = PptxReader::new()
        .read_bytes(data)
        .map_err(|e| format!("PPTX parsing error: {}", e))?;

    Ok(InspectResult {
        title: summary.title,
        slide_count: summary.slides.len(),
        slides: summary
            .slides
            .into_iter()
            .map(|slide| InspectedSlide {
                number: slide.number,
                texts: slide.texts,
                notes: slide.notes,
                picture_count: slide.pictures,
            })
            .collect(),
    })
}
