//! Request body extractors whose rejections use the [`AppError`] body shape.

use axum::body::Bytes;
use axum::extract::FromRequest;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `axum::Json` with rejections mapped to 400 `{"message", "code"}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Parse an optional JSON body: an empty (or whitespace-only) body yields
/// `T::default()`.
pub fn json_or_default<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Body {
        regenerate: Option<bool>,
    }

    #[test]
    fn empty_body_is_default() {
        let parsed: Body = json_or_default(&Bytes::new()).unwrap();
        assert_eq!(parsed, Body::default());
        let parsed: Body = json_or_default(&Bytes::from_static(b"  \n")).unwrap();
        assert_eq!(parsed, Body::default());
    }

    #[test]
    fn json_body_is_parsed() {
        let parsed: Body = json_or_default(&Bytes::from_static(br#"{"regenerate":true}"#)).unwrap();
        assert_eq!(parsed.regenerate, Some(true));
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let result: Result<Body, _> = json_or_default(&Bytes::from_static(b"{nope"));
        assert_matches!(result, Err(AppError::BadRequest(_)));
    }
}
