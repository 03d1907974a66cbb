//! Loading indicator and error panel of the widget.

use crate::css;
use crate::platform::HostElement;

/// Shows the widget status through the target elements of the host element.
///
/// All targets are optional. A host page without an error panel still gets the `has-error` class
/// on the host element.
#[derive(Debug, Clone)]
pub struct ErrorPresenter<E: HostElement> {
    host: E,
    loading: Option<E>,
    error_panel: Option<E>,
    error_message: Option<E>,
}

impl<E: HostElement> ErrorPresenter<E> {
    /// Looks up the targets inside the host element.
    pub fn new(host: E) -> Self {
        let loading = host.find_by_attribute(css::TARGET_ATTRIBUTE, css::TARGET_LOADING);
        let error_panel = host.find_by_attribute(css::TARGET_ATTRIBUTE, css::TARGET_ERROR);
        let error_message =
            host.find_by_attribute(css::TARGET_ATTRIBUTE, css::TARGET_ERROR_MESSAGE);

        Self {
            host,
            loading,
            error_panel,
            error_message,
        }
    }

    /// Displays the loading indicator.
    pub fn show_loading(&self) {
        self.host.add_class(css::LOADING);
        if let Some(loading) = &self.loading {
            loading.remove_class(css::HIDDEN);
        }
    }

    /// Hides the loading indicator.
    pub fn hide_loading(&self) {
        self.host.remove_class(css::LOADING);
        if let Some(loading) = &self.loading {
            loading.add_class(css::HIDDEN);
        }
    }

    /// Reveals the error panel with the message and hides the loading indicator.
    pub fn show_error(&self, message: &str) {
        self.hide_loading();
        self.host.add_class(css::HAS_ERROR);

        match (&self.error_message, &self.error_panel) {
            (Some(target), _) => target.set_text(message),
            (None, Some(panel)) => panel.set_text(message),
            (None, None) => log::warn!("No error panel to show the message in: {message}"),
        }

        if let Some(panel) = &self.error_panel {
            panel.remove_class(css::HIDDEN);
        }
    }

    /// Hides the error panel and removes the error state of the host element.
    pub fn clear_error(&self) {
        self.host.remove_class(css::HAS_ERROR);
        if let Some(panel) = &self.error_panel {
            panel.add_class(css::HIDDEN);
        }
    }
}
