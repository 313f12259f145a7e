//! Error handling for the browser bindings.
//!
//! Converts [`crate::Error`] into JavaScript `Error` objects carrying a
//! `code` property.

use crate::Error;
use wasm_bindgen::prelude::*;

/// Error codes for TypeScript consumption.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Options object could not be read
    Config,
    /// Invalid rootMargin or threshold
    Options,
    /// Unknown error
    Unknown,
}

/// A JavaScript-friendly error type.
#[derive(Debug)]
pub struct WebError {
    code: ErrorCode,
    message: String,
}

impl WebError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Config, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Error> for WebError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidRootMargin { .. } | Error::InvalidThreshold(_) => ErrorCode::Options,
            Error::Toml { .. } | Error::Json { .. } => ErrorCode::Config,
            _ => ErrorCode::Unknown,
        };
        Self::new(code, err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for WebError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        let js_error = js_sys::Error::new(&err.message);

        let code_str = match err.code {
            ErrorCode::Config => "CONFIG_ERROR",
            ErrorCode::Options => "OPTIONS_ERROR",
            ErrorCode::Unknown => "UNKNOWN_ERROR",
        };

        js_sys::Reflect::set(&js_error, &"code".into(), &JsValue::from_str(code_str)).ok();

        js_error.into()
    }
}
