//! Typed widget configuration resolved from the string attributes of the host element.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;
use crate::messages::Locale;
use crate::platform::HostElement;
use crate::tile_registry::DEFAULT_TILE_LAYER;

/// Prefix of the configuration attributes on the host element.
pub const ATTRIBUTE_PREFIX: &str = "data-map-widget-";

/// Zoom level used when the `zoom` attribute is absent.
pub const DEFAULT_ZOOM: u32 = 13;

/// Names of the configuration attributes (without [`ATTRIBUTE_PREFIX`]).
pub mod attr {
    /// Latitude of the map center and the marker.
    pub const LATITUDE: &str = "latitude";
    /// Longitude of the map center and the marker.
    pub const LONGITUDE: &str = "longitude";
    /// Initial zoom level.
    pub const ZOOM: &str = "zoom";
    /// Key of the tile registry entry.
    pub const TILE_LAYER: &str = "tile-layer";
    /// Grayscale filter flag.
    pub const GRAYSCALE: &str = "grayscale";
    /// Id of the companion modal dialog.
    pub const MODAL_ID: &str = "modal-id";
    /// Horizontal position of the marker as a fraction of the map width.
    pub const MARKER_OFFSET: &str = "marker-offset";
    /// Custom vector marker flag.
    pub const CUSTOM_MARKER: &str = "custom-marker";
    /// API key for tile sources that need one.
    pub const API_KEY: &str = "api-key";
    /// Language of the error messages.
    pub const LOCALE: &str = "locale";
}

/// Type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Finite floating point number.
    Number,
    /// Integer number.
    Integer,
    /// Flag.
    Boolean,
    /// Arbitrary text.
    Text,
}

/// Parsed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Finite floating point number.
    Number(f64),
    /// Integer number.
    Integer(i64),
    /// Flag.
    Boolean(bool),
    /// Arbitrary text.
    Text(String),
}

impl AttributeValue {
    fn kind(&self) -> AttributeKind {
        match self {
            Self::Number(_) => AttributeKind::Number,
            Self::Integer(_) => AttributeKind::Integer,
            Self::Boolean(_) => AttributeKind::Boolean,
            Self::Text(_) => AttributeKind::Text,
        }
    }
}

/// Declaration of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    name: &'static str,
    kind: AttributeKind,
    default: Option<AttributeValue>,
    required: bool,
}

impl AttributeSpec {
    /// Attribute that must be present.
    pub fn required(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            required: true,
        }
    }

    /// Attribute that may be absent and has no default.
    pub fn optional(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            required: false,
        }
    }

    /// Attribute that takes the given value when absent.
    pub fn with_default(name: &'static str, default: AttributeValue) -> Self {
        Self {
            name,
            kind: default.kind(),
            default: Some(default),
            required: false,
        }
    }

    /// Name of the attribute.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, raw: &str) -> Result<AttributeValue, WidgetError> {
        let trimmed = raw.trim();
        match self.kind {
            AttributeKind::Number => match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(AttributeValue::Number(value)),
                Ok(_) => Err(WidgetError::configuration(
                    self.name,
                    format!("`{raw}` is not a finite number"),
                )),
                Err(_) => Err(WidgetError::configuration(
                    self.name,
                    format!("`{raw}` is not a number"),
                )),
            },
            AttributeKind::Integer => trimmed
                .parse::<i64>()
                .map(AttributeValue::Integer)
                .map_err(|_| {
                    WidgetError::configuration(self.name, format!("`{raw}` is not an integer"))
                }),
            AttributeKind::Boolean => Ok(AttributeValue::Boolean(
                !(trimmed == "false" || trimmed == "0"),
            )),
            AttributeKind::Text => Ok(AttributeValue::Text(raw.to_string())),
        }
    }
}

/// Set of attribute declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeSchema {
    specs: Vec<AttributeSpec>,
}

impl AttributeSchema {
    /// Empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute declaration.
    pub fn with(mut self, spec: AttributeSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Schema of the map widget attributes.
    pub fn widget() -> Self {
        use AttributeKind::*;

        Self::new()
            .with(AttributeSpec::required(attr::LATITUDE, Number))
            .with(AttributeSpec::required(attr::LONGITUDE, Number))
            .with(AttributeSpec::with_default(
                attr::ZOOM,
                AttributeValue::Integer(DEFAULT_ZOOM as i64),
            ))
            .with(AttributeSpec::with_default(
                attr::TILE_LAYER,
                AttributeValue::Text(DEFAULT_TILE_LAYER.to_string()),
            ))
            .with(AttributeSpec::with_default(
                attr::GRAYSCALE,
                AttributeValue::Boolean(false),
            ))
            .with(AttributeSpec::optional(attr::MODAL_ID, Text))
            .with(AttributeSpec::optional(attr::MARKER_OFFSET, Number))
            .with(AttributeSpec::with_default(
                attr::CUSTOM_MARKER,
                AttributeValue::Boolean(false),
            ))
            .with(AttributeSpec::optional(attr::API_KEY, Text))
            .with(AttributeSpec::with_default(
                attr::LOCALE,
                AttributeValue::Text("en".to_string()),
            ))
    }

    /// Attribute declarations in the order they were added.
    pub fn specs(&self) -> &[AttributeSpec] {
        &self.specs
    }
}

/// Source of raw string attributes.
pub trait AttributeSource {
    /// Raw value of the attribute with the given name, if present.
    fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for [(&str, &str)] {
    fn attribute(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }
}

/// Reads `data-map-widget-*` attributes of a host element.
pub struct ElementAttributes<'a, E>(pub &'a E);

impl<E: HostElement> AttributeSource for ElementAttributes<'_, E> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attribute(&format!("{ATTRIBUTE_PREFIX}{name}"))
    }
}

/// Attribute values after parsing and applying defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedAttributes {
    values: HashMap<&'static str, AttributeValue>,
}

impl ResolvedAttributes {
    /// Raw access to a resolved value.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Numeric value of the attribute.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            AttributeValue::Number(v) => Some(*v),
            AttributeValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer value of the attribute.
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            AttributeValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Flag value of the attribute.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            AttributeValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value of the attribute.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            AttributeValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Converts raw attributes into a typed [`WidgetConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    schema: AttributeSchema,
}

impl ConfigResolver {
    /// Creates a resolver for the given schema.
    pub fn new(schema: AttributeSchema) -> Self {
        Self { schema }
    }

    /// Resolver for the standard widget attributes.
    pub fn widget() -> Self {
        Self::new(AttributeSchema::widget())
    }

    /// Parses every declared attribute and applies defaults.
    ///
    /// Numeric values that cannot be parsed and missing required values are errors. Text values
    /// that are empty count as absent.
    pub fn resolve_attributes(
        &self,
        source: &(impl AttributeSource + ?Sized),
    ) -> Result<ResolvedAttributes, WidgetError> {
        let mut values = HashMap::new();
        for spec in &self.schema.specs {
            let raw = source
                .attribute(spec.name)
                .filter(|raw| !(spec.kind == AttributeKind::Text && raw.trim().is_empty()));

            let value = match raw {
                Some(raw) => Some(spec.parse(&raw)?),
                None if spec.required => {
                    return Err(WidgetError::configuration(spec.name, "value is missing"));
                }
                None => spec.default.clone(),
            };

            if let Some(value) = value {
                values.insert(spec.name, value);
            }
        }

        Ok(ResolvedAttributes { values })
    }

    /// Resolves the attributes into a validated widget configuration.
    pub fn resolve(
        &self,
        source: &(impl AttributeSource + ?Sized),
    ) -> Result<WidgetConfig, WidgetError> {
        let resolved = self.resolve_attributes(source)?;
        WidgetConfig::from_resolved(&resolved)
    }
}

fn default_zoom() -> u32 {
    DEFAULT_ZOOM
}

fn default_tile_layer() -> String {
    DEFAULT_TILE_LAYER.to_string()
}

/// Configuration of a map widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Latitude of the map center and the marker.
    pub latitude: f64,
    /// Longitude of the map center and the marker.
    pub longitude: f64,
    /// Initial zoom level.
    #[serde(default = "default_zoom")]
    pub zoom_level: u32,
    /// Key of the tile registry entry.
    #[serde(default = "default_tile_layer")]
    pub tile_layer_key: String,
    /// Whether the tiles are displayed in grayscale.
    #[serde(default)]
    pub grayscale: bool,
    /// Id of the companion modal dialog.
    #[serde(default)]
    pub modal_id: Option<String>,
    /// If set, the marker is shifted to this fraction of the map width.
    #[serde(default)]
    pub marker_offset: Option<f64>,
    /// Whether the marker uses the custom vector icon.
    #[serde(default)]
    pub custom_marker: bool,
    /// API key for tile sources that require one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Language of the error messages.
    #[serde(default)]
    pub locale: Locale,
}

impl WidgetConfig {
    /// Configuration with the given coordinates and default values for everything else.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            zoom_level: DEFAULT_ZOOM,
            tile_layer_key: default_tile_layer(),
            grayscale: false,
            modal_id: None,
            marker_offset: None,
            custom_marker: false,
            api_key: None,
            locale: Locale::default(),
        }
    }

    /// Builds the configuration from resolved attributes.
    pub fn from_resolved(values: &ResolvedAttributes) -> Result<Self, WidgetError> {
        let coordinate = |name: &str| {
            values
                .number(name)
                .ok_or_else(|| WidgetError::configuration(name, "value is missing"))
        };

        let zoom = values.integer(attr::ZOOM).unwrap_or(DEFAULT_ZOOM as i64);
        let zoom_level = u32::try_from(zoom).map_err(|_| {
            WidgetError::configuration(attr::ZOOM, format!("`{zoom}` is not a valid zoom level"))
        })?;

        let config = Self {
            latitude: coordinate(attr::LATITUDE)?,
            longitude: coordinate(attr::LONGITUDE)?,
            zoom_level,
            tile_layer_key: values
                .text(attr::TILE_LAYER)
                .map(str::to_string)
                .unwrap_or_else(default_tile_layer),
            grayscale: values.boolean(attr::GRAYSCALE).unwrap_or_default(),
            modal_id: values.text(attr::MODAL_ID).map(str::to_string),
            marker_offset: values.number(attr::MARKER_OFFSET),
            custom_marker: values.boolean(attr::CUSTOM_MARKER).unwrap_or_default(),
            api_key: values.text(attr::API_KEY).map(str::to_string),
            locale: values
                .text(attr::LOCALE)
                .map(Locale::from_tag)
                .unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants that cannot be expressed by the types.
    ///
    /// Configurations built by [`ConfigResolver`] are always valid; this is useful for
    /// configurations deserialized or built by hand.
    pub fn validate(&self) -> Result<(), WidgetError> {
        if !self.latitude.is_finite() {
            return Err(WidgetError::configuration(
                attr::LATITUDE,
                format!("`{}` is not a finite number", self.latitude),
            ));
        }

        if !self.longitude.is_finite() {
            return Err(WidgetError::configuration(
                attr::LONGITUDE,
                format!("`{}` is not a finite number", self.longitude),
            ));
        }

        if let Some(offset) = self.marker_offset {
            if !(0.0..=1.0).contains(&offset) {
                return Err(WidgetError::configuration(
                    attr::MARKER_OFFSET,
                    format!("`{offset}` is outside of the [0, 1] range"),
                ));
            }
        }

        Ok(())
    }
}
