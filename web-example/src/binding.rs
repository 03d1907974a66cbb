use std::rc::Rc;
use std::sync::Once;

use map_widget::platform::web::{TimeoutScheduler, WebDocument, WebElement};
use map_widget::platform::HostDocument;
use map_widget::{MapWidget, WidgetError, WidgetHost, WidgetState};
use wasm_bindgen::prelude::*;

static SET_UP: Once = Once::new();

fn set_up() {
    SET_UP.call_once(|| {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Couldn't init logger: {err}").into());
        }
    });
}

fn to_js(error: WidgetError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// Map widget attached to an element of the page.
#[wasm_bindgen]
pub struct MapWidgetBinding {
    widget: MapWidget<WebDocument>,
}

#[wasm_bindgen]
impl MapWidgetBinding {
    /// Attaches a widget to the element with the given id.
    ///
    /// Configuration problems do not throw, they are shown in the error panel of the element.
    /// Throws only if the element does not exist.
    pub fn attach(element_id: &str) -> Result<MapWidgetBinding, JsValue> {
        set_up();

        let document = WebDocument::current().map_err(to_js)?;
        let element: WebElement = document.element_by_id(element_id).ok_or_else(|| {
            to_js(WidgetError::Initialization(format!(
                "element `{element_id}` not found"
            )))
        })?;

        let host = WidgetHost::new(Rc::new(document), Rc::new(TimeoutScheduler));
        Ok(Self {
            widget: MapWidget::attach(host, element),
        })
    }

    /// Recomputes the map size after the container was resized.
    #[wasm_bindgen(js_name = invalidateSize)]
    pub fn invalidate_size(&self) {
        self.widget.invalidate_size();
    }

    /// Opens the companion modal.
    #[wasm_bindgen(js_name = openModal)]
    pub fn open_modal(&self) {
        self.widget.open_modal();
    }

    /// Closes the companion modal.
    #[wasm_bindgen(js_name = closeModal)]
    pub fn close_modal(&self) {
        self.widget.close_modal();
    }

    /// Applies or clears the grayscale filter of the tiles.
    #[wasm_bindgen(js_name = setGrayscale)]
    pub fn set_grayscale(&self, enabled: bool) {
        self.widget.set_grayscale(enabled);
    }

    /// Whether the map is displayed.
    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.widget.state() == WidgetState::Ready
    }

    /// Resolved configuration as JSON, or `undefined` if the attributes were invalid or the
    /// configuration could not be serialized.
    pub fn config(&self) -> Option<String> {
        self.widget.config().as_ref().and_then(crate::config_json)
    }

    /// Releases the map. The binding does nothing afterwards.
    pub fn detach(&self) {
        self.widget.detach();
    }
}
