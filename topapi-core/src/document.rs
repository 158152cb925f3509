//! Generic response documents and typed projection.
//!
//! The engine never interprets business payloads. Every response body decodes
//! into a [`Document`] — a dynamic JSON value (object, array, string, number,
//! boolean, or null) — and callers project it into whatever shape they need.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DecodeError, Error, Result};

/// A decoded response body.
pub type Document = Value;

/// Projects a document into a concrete shape.
///
/// Unknown fields are ignored; a shape mismatch fails with a decode error.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use topapi_core::document::{Document, project};
///
/// #[derive(Deserialize)]
/// struct Page {
///     total_results: u64,
/// }
///
/// let doc: Document = serde_json::json!({"total_results": 5924, "trades": []});
/// let page: Page = project(&doc).unwrap();
/// assert_eq!(page.total_results, 5924);
/// ```
pub fn project<T: DeserializeOwned>(doc: &Document) -> Result<T> {
    serde_json::from_value(doc.clone()).map_err(|e| Error::from(DecodeError::Json(e)))
}

/// Raises a business error if the document carries an error envelope with a
/// nonzero code.
///
/// The envelope shape is `{"error_response": {"code": <int>, "msg": <str>}}`;
/// a missing envelope or a zero code means the call succeeded.
pub(crate) fn check_error_envelope(doc: &Document) -> Result<()> {
    let Some(envelope) = doc.get("error_response") else {
        return Ok(());
    };
    let code = envelope.get("code").and_then(Value::as_i64).unwrap_or(0);
    if code == 0 {
        return Ok(());
    }
    let message = envelope
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Err(Error::biz_with_data(code, message, envelope.clone()))
}
