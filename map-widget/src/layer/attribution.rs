/// Credit to the source of the displayed data.
///
/// The text may contain HTML markup, as tile providers usually require a link to their terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    text: String,
    url: Option<String>,
}

impl Attribution {
    /// Creates a new `Attribution` with the given text and optional URL.
    pub fn new(text: String, url: Option<String>) -> Self {
        Self { text, url }
    }

    /// Attribution text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// URL with more information about the source, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
