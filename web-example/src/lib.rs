//! Exposes the map widget to the scripts of a web page.
//!
//! ```js
//! import init, { MapWidgetBinding } from "./map_widget_web.js";
//!
//! await init();
//! const widget = MapWidgetBinding.attach("store-map");
//! document.querySelector("#show-details").onclick = () => widget.openModal();
//! ```

#[cfg(target_arch = "wasm32")]
mod binding;

#[cfg(target_arch = "wasm32")]
pub use binding::MapWidgetBinding;

use map_widget::WidgetConfig;

/// Serializes the configuration the way it is handed to page scripts.
///
/// Returns `None` if the configuration cannot be serialized.
pub fn config_json(config: &WidgetConfig) -> Option<String> {
    serde_json::to_string(config)
        .map_err(|err| log::warn!("Failed to serialize the widget configuration: {err}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_uses_camel_case() {
        let mut config = WidgetConfig::new(51.505, -0.09);
        config.modal_id = Some("details".to_string());

        let json = config_json(&config).expect("serializable config");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["latitude"], 51.505);
        assert_eq!(value["zoomLevel"], 13);
        assert_eq!(value["tileLayerKey"], "osm");
        assert_eq!(value["modalId"], "details");
        assert_eq!(value["locale"], "en");
    }
}
