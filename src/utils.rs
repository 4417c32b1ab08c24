use web_sys::{js_sys, Document, Window};

use crate::{error::Error, surface::Dimensions};

/// Returns the global window.
pub fn window() -> Result<Window, Error> {
    web_sys::window().ok_or(Error::UnableToRetrieveWindow)
}

/// Returns the document of the global window.
pub fn document() -> Result<Document, Error> {
    window()?.document().ok_or(Error::UnableToRetrieveDocument)
}

/// Returns the size of the viewport, in CSS pixels.
pub fn viewport_size() -> Result<Dimensions, Error> {
    let window = window()?;
    let width = window.inner_width()?.as_f64().unwrap_or_default();
    let height = window.inner_height()?.as_f64().unwrap_or_default();
    Ok(Dimensions::new(width, height))
}

/// Sets the document title.
pub fn set_document_title(title: &str) -> Result<(), Error> {
    document()?.set_title(title);
    Ok(())
}

/// Opens `url` in a new tab, without giving it access to this page.
pub fn open_url(url: &str) -> Result<(), Error> {
    window()?.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")?;
    Ok(())
}

/// Returns a seed for pseudo-random generators.
pub fn random_seed() -> u64 {
    let random = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let now = js_sys::Date::now() as u64;
    (random << 32) ^ now
}
