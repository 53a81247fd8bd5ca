mod cached;
mod character;
mod corpus;
mod error;
mod ffi;
mod levenshtein;

use wasm_bindgen::prelude::*;

pub use cached::CachedEditDistance;
pub use character::{
    apply_shift, best_shift, character_edit_rate, phrase_matches, sentence_edit_rate,
    shift_until_stable, PhraseMatch, Shift, Shifted,
};
pub use corpus::{lines_from_reader, load_lines, score_corpus, CorpusScore, SentenceScore};
pub use error::{Error, Result};
pub use ffi::ed_wrapper;
pub use levenshtein::{distance, edit_cost, edit_cost_with, EditCosts, UnitCosts};

/// Normalized token edit distance for JS hosts. Tokens arrive as a
/// `BigUint64Array` view; nothing is retained after the call.
#[wasm_bindgen]
pub fn edit_distance_rate(hyp: &[u64], reference: &[u64], norm: i32) -> f32 {
    levenshtein::distance(hyp, reference, norm)
}

/// CharacTER score of one whitespace-delimited sentence pair.
#[wasm_bindgen]
pub fn character_edit_rate_of(hyp: &str, reference: &str) -> f64 {
    character::sentence_edit_rate(hyp, reference)
}

#[wasm_bindgen]
pub fn score_corpus_to_json(
    hyp_text: &str, ref_text: &str, progress_callback: &js_sys::Function,
) -> std::result::Result<String, JsValue> {
    let _ = progress_callback.call1(&JsValue::NULL, &JsValue::from_str("Rust Wasm (JSON): Starting..."));
    let hyp_lines = corpus::lines_from_reader(hyp_text.as_bytes())
        .map_err(|e| JsValue::from_str(&format!("Hypothesis reading error: {}", e)))?;
    let ref_lines = corpus::lines_from_reader(ref_text.as_bytes())
        .map_err(|e| JsValue::from_str(&format!("Reference reading error: {}", e)))?;
    let _ = progress_callback.call1(&JsValue::NULL, &JsValue::from_str(&format!(
        "Rust Wasm (JSON): Scoring {} hypothesis lines against {} reference lines...",
        hyp_lines.len(), ref_lines.len()
    )));

    let report = corpus::score_corpus(&hyp_lines, &ref_lines)
        .map_err(|e| JsValue::from_str(&format!("Scoring error: {}", e)))?;

    let _ = progress_callback.call1(&JsValue::NULL, &JsValue::from_str("Rust Wasm (JSON): Serializing data..."));
    report.to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
