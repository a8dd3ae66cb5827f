use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced by input parsing and the DOM adapter.
///
/// Ledger operations never fail; everything here comes from the edges.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown category: {0:?}")]
    UnknownCategory(String),
    #[error("Description must not be empty")]
    EmptyDescription,
    #[error("Invalid value: {0:?}")]
    InvalidValue(String),
    #[error("Malformed item id: {0:?}")]
    MalformedItemId(String),
    #[error("No element matches selector {0:?}")]
    MissingElement(String),
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
