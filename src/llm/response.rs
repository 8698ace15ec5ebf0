//! Extraction of the JSON answer from a generateContent response
//!
//! The model is asked to answer with a bare JSON object, but answers often come
//! wrapped in markdown code fences. Anything that does not yield a JSON object
//! is treated as "no answer".

use log::{debug, warn};
use serde_json::Value;

/// Remove markdown code-fence markers and surrounding whitespace
pub fn strip_code_fences(text: &str) -> String {
    text.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// The JSON object answered by the model, if any.
///
/// Walks `candidates[].content.parts[].text` and parses the first text part.
/// An `error` member, a missing text part or non-JSON text all yield `None`.
pub fn extract_json(response: &Value) -> Option<Value> {
    if let Some(error) = response.get("error") {
        warn!("LLM returned an error: {}", error);
        return None;
    }

    let text = response
        .get("candidates")?
        .as_array()?
        .iter()
        .filter_map(|candidate| candidate.get("content")?.get("parts")?.as_array())
        .flatten()
        .find_map(|part| part.get("text")?.as_str());

    let Some(text) = text else {
        debug!("No text part in LLM response");
        return None;
    };

    let cleaned = strip_code_fences(text);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            warn!("LLM answer is JSON but not an object");
            None
        }
        Err(e) => {
            warn!("LLM answer is not JSON: {}", e);
            None
        }
    }
}

/// Whether `answer` carries at least one non-null member named in `keys`
pub fn recognizes(answer: &Value, keys: &[&str]) -> bool {
    keys.iter()
        .any(|key| answer.get(key).is_some_and(|v| !v.is_null()))
}
