//! User facing texts of the error panel.

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Language of the texts shown to the user.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// German.
    De,
}

impl Locale {
    /// Parses a language tag such as `de` or `de-AT`. Unknown languages fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        if language.eq_ignore_ascii_case("de") {
            Self::De
        } else {
            Self::En
        }
    }
}

fn is_coordinate(field: &str) -> bool {
    field == "latitude" || field == "longitude"
}

/// Text presented in the error panel for the given error.
pub fn describe(error: &WidgetError, locale: Locale) -> String {
    match (error, locale) {
        (WidgetError::Configuration { field, .. }, Locale::En) if is_coordinate(field) => {
            format!("Invalid coordinates: {field} must be a number.")
        }
        (WidgetError::Configuration { field, .. }, Locale::De) if is_coordinate(field) => {
            let field = if field == "latitude" {
                "Breitengrad"
            } else {
                "Längengrad"
            };
            format!("Ungültige Koordinaten: {field} muss eine Zahl sein.")
        }
        (WidgetError::Configuration { field, reason }, Locale::En) => {
            format!("Invalid map configuration: {field} ({reason}).")
        }
        (WidgetError::Configuration { field, reason }, Locale::De) => {
            format!("Ungültige Kartenkonfiguration: {field} ({reason}).")
        }
        (WidgetError::DependencyMissing(_), Locale::En) => {
            "The map could not be loaded because the mapping engine is unavailable.".to_string()
        }
        (WidgetError::DependencyMissing(_), Locale::De) => {
            "Die Karte konnte nicht geladen werden, da die Kartenbibliothek nicht verfügbar ist."
                .to_string()
        }
        (WidgetError::Initialization(reason), Locale::En) => {
            format!("The map could not be displayed: {reason}")
        }
        (WidgetError::Initialization(reason), Locale::De) => {
            format!("Die Karte konnte nicht angezeigt werden: {reason}")
        }
        (WidgetError::ModalTargetMissing(_), Locale::En) => {
            "The details dialog could not be found.".to_string()
        }
        (WidgetError::ModalTargetMissing(_), Locale::De) => {
            "Der Detaildialog wurde nicht gefunden.".to_string()
        }
    }
}
