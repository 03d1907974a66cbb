//! Error types used by the crate.

use thiserror::Error;

/// Map widget error type.
///
/// None of these errors ever reach the host page: the widget handles them at its boundary by
/// showing the error panel (or, for [`WidgetError::ModalTargetMissing`], by doing nothing).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    /// A configuration attribute is missing or cannot be parsed.
    #[error("invalid value of `{field}`: {reason}")]
    Configuration {
        /// Name of the attribute.
        field: String,
        /// What is wrong with the value.
        reason: String,
    },
    /// The mapping engine is not available.
    #[error("mapping engine is not available: {0}")]
    DependencyMissing(String),
    /// Construction of the map surface failed.
    #[error("failed to initialize the map: {0}")]
    Initialization(String),
    /// The modal dialog referenced by the widget is not in the document.
    #[error("modal element `{0}` not found")]
    ModalTargetMissing(String),
}

impl WidgetError {
    pub(crate) fn configuration(field: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error must be presented to the user.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ModalTargetMissing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let error = WidgetError::configuration("latitude", "`abc` is not a number");
        assert_eq!(
            error.to_string(),
            "invalid value of `latitude`: `abc` is not a number"
        );
    }

    #[test]
    fn modal_errors_are_not_fatal() {
        assert!(!WidgetError::ModalTargetMissing("details".into()).is_fatal());
        assert!(WidgetError::Initialization("boom".into()).is_fatal());
    }
}
