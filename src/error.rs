use std::io::Error as IoError;

use web_sys::wasm_bindgen::JsValue;

/// Error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to retrieve the window.
    #[error("Unable to retrieve window")]
    UnableToRetrieveWindow,

    /// Unable to retrieve the document.
    #[error("Unable to retrieve document")]
    UnableToRetrieveDocument,

    /// Unable to retrieve the body.
    #[error("Unable to retrieve body")]
    UnableToRetrieveBody,

    /// Unable to retrieve an element by its ID.
    #[error("Unable to retrieve element with ID `{0}`")]
    UnableToRetrieveElement(String),

    /// Unable to retrieve the 2D context of a canvas.
    #[error("Unable to retrieve canvas context")]
    UnableToRetrieveCanvasContext,

    /// Unable to cast a JavaScript value to the expected type.
    #[error("Unable to cast to `{0}`")]
    UnableToCast(&'static str),

    /// An exception thrown by a JavaScript call.
    #[error("JavaScript error: {0}")]
    Js(String),

    /// The site configuration could not be parsed.
    #[error("Unable to parse site configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The site configuration was parsed but holds invalid values.
    #[error("Invalid site configuration: {0}")]
    InvalidConfig(String),

    /// A logger was already installed.
    #[error("Logger is already set")]
    LoggerAlreadySet,
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => Self::Js(message),
            None => Self::Js(format!("{value:?}")),
        }
    }
}

impl From<Error> for IoError {
    fn from(error: Error) -> Self {
        IoError::other(error)
    }
}
