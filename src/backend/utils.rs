use web_sys::{
    js_sys::{Boolean, Map},
    wasm_bindgen::{JsCast, JsValue},
    CanvasRenderingContext2d, Element, HtmlCanvasElement,
};

use crate::{error::Error, utils::document};

/// Returns the element with the given ID, or the document body.
pub(crate) fn get_element_by_id_or_body(id: Option<&String>) -> Result<Element, Error> {
    let document = document()?;
    match id {
        Some(id) => document
            .get_element_by_id(id)
            .ok_or_else(|| Error::UnableToRetrieveElement(id.clone())),
        None => document
            .body()
            .map(Into::into)
            .ok_or(Error::UnableToRetrieveBody),
    }
}

/// Creates a canvas pinned to the viewport and appends it to `parent`.
pub(crate) fn create_canvas_in_element(
    parent: &Element,
    width: u32,
    height: u32,
    z_index: i32,
) -> Result<HtmlCanvasElement, Error> {
    let canvas = document()?
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::UnableToCast("HtmlCanvasElement"))?;
    canvas.set_width(width);
    canvas.set_height(height);
    canvas.set_attribute("style", &pinned_style(width, height, z_index))?;
    parent.append_child(&canvas)?;
    Ok(canvas)
}

/// Inline style that pins a canvas over the whole viewport.
pub(crate) fn pinned_style(width: u32, height: u32, z_index: i32) -> String {
    format!(
        "position: fixed; top: 0; left: 0; width: {width}px; height: {height}px; z-index: {z_index};"
    )
}

/// Returns a transparent 2D context for the canvas.
pub(crate) fn get_context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, Error> {
    let context_options = Map::new();
    context_options.set(&JsValue::from_str("alpha"), &Boolean::from(JsValue::TRUE));
    canvas
        .get_context_with_context_options("2d", &context_options)?
        .ok_or(Error::UnableToRetrieveCanvasContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| Error::UnableToCast("CanvasRenderingContext2d"))
}
