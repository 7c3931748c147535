//! Inline script data for the map bootstrap.

use maud::PreEscaped;
use serde::Serialize;

/// Serializes `value` as JSON safe to embed inside a `<script>` element.
///
/// `<` is emitted as a unicode escape so feed text can never close the
/// script tag early. Falls back to `null` if serialization fails.
#[must_use]
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> PreEscaped<String> {
    match serde_json::to_string(value) {
        Ok(json) => PreEscaped(json.replace('<', "\\u003c")),
        Err(e) => {
            log::error!("Failed to serialize script data: {e}");
            PreEscaped("null".to_string())
        }
    }
}
