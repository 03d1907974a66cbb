//! Built-in registry of raster tile sources, keyed by the `tile-layer` attribute value.

use std::collections::HashMap;

use crate::error::WidgetError;
use crate::layer::Attribution;
use crate::tile_schema::TileIndex;

/// Key of the registry entry used when the configured key is unknown.
pub const DEFAULT_TILE_LAYER: &str = "osm";

/// Description of a raster tile source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayerDescriptor {
    /// Registry key.
    pub key: &'static str,
    /// URL template with `{z}`, `{x}`, `{y}` placeholders. Optional `{s}` (subdomain), `{r}`
    /// (retina suffix) and `{apikey}` placeholders are also supported.
    pub url_template: &'static str,
    /// Attribution markup that must be displayed together with the tiles.
    pub attribution_text: &'static str,
    /// Link to the terms of the source.
    pub attribution_url: Option<&'static str>,
    /// Highest zoom level the source provides.
    pub max_zoom: u32,
    /// Subdomains substituted for `{s}`.
    pub subdomains: &'static [&'static str],
    /// Whether the source refuses requests without an API key.
    pub requires_api_key: bool,
}

static REGISTRY: &[TileLayerDescriptor] = &[
    TileLayerDescriptor {
        key: "osm",
        url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution_text: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
        attribution_url: Some("https://www.openstreetmap.org/copyright"),
        max_zoom: 19,
        subdomains: &[],
        requires_api_key: false,
    },
    TileLayerDescriptor {
        key: "osm_de",
        url_template: "https://tile.openstreetmap.de/{z}/{x}/{y}.png",
        attribution_text: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
        attribution_url: Some("https://www.openstreetmap.org/copyright"),
        max_zoom: 18,
        subdomains: &[],
        requires_api_key: false,
    },
    TileLayerDescriptor {
        key: "topo",
        url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        attribution_text: "Map data: &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, SRTM | Map style: &copy; <a href=\"https://opentopomap.org\">OpenTopoMap</a> (CC-BY-SA)",
        attribution_url: Some("https://opentopomap.org/about"),
        max_zoom: 17,
        subdomains: &["a", "b", "c"],
        requires_api_key: false,
    },
    TileLayerDescriptor {
        key: "cycle",
        url_template: "https://{s}.tile.thunderforest.com/cycle/{z}/{x}/{y}{r}.png?apikey={apikey}",
        attribution_text: "&copy; <a href=\"https://www.thunderforest.com/\">Thunderforest</a>, &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
        attribution_url: Some("https://www.thunderforest.com/terms/"),
        max_zoom: 22,
        subdomains: &["a", "b", "c"],
        requires_api_key: true,
    },
];

/// Registry entry with the given key, if any.
pub fn lookup(key: &str) -> Option<&'static TileLayerDescriptor> {
    REGISTRY.iter().find(|descriptor| descriptor.key == key)
}

/// Registry entry with the given key, or the default entry if the key is unknown.
pub fn resolve(key: &str) -> &'static TileLayerDescriptor {
    match lookup(key) {
        Some(descriptor) => descriptor,
        None => {
            log::debug!("Unknown tile layer `{key}`, using `{DEFAULT_TILE_LAYER}`");
            default_descriptor()
        }
    }
}

/// The default registry entry.
pub fn default_descriptor() -> &'static TileLayerDescriptor {
    &REGISTRY[0]
}

impl TileLayerDescriptor {
    /// Attribution of the source.
    pub fn attribution(&self) -> Attribution {
        Attribution::new(
            self.attribution_text.to_string(),
            self.attribution_url.map(str::to_string),
        )
    }

    /// URL of the tile with the given index.
    pub fn tile_url(&self, index: TileIndex, api_key: Option<&str>) -> Result<String, WidgetError> {
        let mut vars = HashMap::new();
        vars.insert("z".to_string(), index.z.to_string());
        vars.insert("x".to_string(), index.x.to_string());
        vars.insert("y".to_string(), index.y.to_string());
        vars.insert("r".to_string(), String::new());
        vars.insert("apikey".to_string(), api_key.unwrap_or_default().to_string());

        if !self.subdomains.is_empty() {
            let subdomain =
                self.subdomains[(index.x + index.y).unsigned_abs() as usize % self.subdomains.len()];
            vars.insert("s".to_string(), subdomain.to_string());
        }

        strfmt::strfmt(self.url_template, &vars).map_err(|err| {
            WidgetError::Initialization(format!(
                "invalid url template of the `{}` tile layer: {err}",
                self.key
            ))
        })
    }
}
