//! The `{success, error?, result?}` JSON envelope every endpoint wraps
//! its response in, except `raw=true` which emits raw bytes instead.

use axum::response::{IntoResponse, Response};
use operator_types::ErrorCode;
use serde::Serialize;

#[derive(Serialize)]
pub struct Resp {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl Resp {
    pub fn ok(result: impl Serialize) -> Self {
        Resp {
            success: true,
            error: None,
            result: Some(serde_json::to_value(result).unwrap_or(serde_json::Value::Null)),
        }
    }

    pub fn ok_empty() -> Self {
        Resp {
            success: true,
            error: None,
            result: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Resp {
            success: false,
            error: Some(message.into()),
            result: None,
        }
    }

    pub fn from_error<E: ErrorCode + std::fmt::Display>(e: &E) -> Self {
        Resp::err(e.to_string())
    }
}

impl IntoResponse for Resp {
    fn into_response(self) -> Response {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("Access-Control-Allow-Origin", "*".parse().unwrap());
        headers.insert("Access-Control-Allow-Methods", "*".parse().unwrap());
        headers.insert(
            "Access-Control-Allow-Headers",
            "origin, content-type, accept".parse().unwrap(),
        );
        (headers, axum::Json(self)).into_response()
    }
}

/// `"0x" + lowercase hex` rendering used throughout the wire surface.
pub fn hex0x(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
