use thiserror::Error;
use wasm_bindgen::JsValue;

/// Startup failures. Gameplay itself never errors; these only surface while
/// wiring the game to a page.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element #{0}")]
    MissingElement(&'static str),
    #[error("element #{0} is not an HtmlElement")]
    WrongElementType(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[cfg(feature = "serde_json")]
    #[error("config json: {0}")]
    ConfigJson(#[from] serde_json::Error),
    #[error("dom call failed: {0}")]
    Dom(String),
}

impl From<BootError> for JsValue {
    fn from(err: BootError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<JsValue> for BootError {
    fn from(value: JsValue) -> Self {
        BootError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
