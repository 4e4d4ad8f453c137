use serde::{Deserialize, Serialize};

/// Recipe used when the options leave it unset.
pub const DEFAULT_RECIPE: &str = "phantom-pdf";

/// Template engine used when the options leave it unset.
pub const DEFAULT_ENGINE: &str = "none";

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Portrait pages.
    Portrait,
    /// Landscape pages.
    Landscape,
}

/// Declarative rendering parameters attached to a route group or handler.
///
/// Options are read-only once attached to a request. Unset values are
/// omitted from the request sent to the rendering service, except for the
/// recipe and engine which fall back to [`DEFAULT_RECIPE`] and
/// [`DEFAULT_ENGINE`].
///
/// Options can be built in code or deserialized from configuration using
/// the camelCase keys the rendering service understands:
///
/// ```ignore
/// let options: RenderOptions = serde_json::from_str(r#"{"format": "A4", "waitForJS": true}"#)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub(crate) recipe: Option<String>,
    pub(crate) engine: Option<String>,
    pub(crate) margin: Option<String>,
    pub(crate) header_height: Option<String>,
    pub(crate) header_template: Option<String>,
    pub(crate) footer_height: Option<String>,
    pub(crate) footer_template: Option<String>,
    pub(crate) orientation: Option<Orientation>,
    pub(crate) width: Option<String>,
    pub(crate) height: Option<String>,
    pub(crate) format: Option<String>,
    #[serde(rename = "waitForJS")]
    pub(crate) wait_for_js: bool,
    pub(crate) resource_timeout: Option<u32>,
    #[serde(rename = "blockJavaScript")]
    pub(crate) block_javascript: bool,
    pub(crate) print_delay: Option<u32>,
    pub(crate) content_disposition: Option<String>,
}

impl RenderOptions {
    /// Creates options with every value unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipe (output pipeline) used by the rendering service.
    pub fn recipe(mut self, recipe: impl Into<String>) -> Self {
        self.recipe = Some(recipe.into());
        self
    }

    /// Sets the template engine applied to the captured content.
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    /// Sets the page margin, e.g. `"1cm"`.
    pub fn margin(mut self, margin: impl Into<String>) -> Self {
        self.margin = Some(margin.into());
        self
    }

    /// Sets the height reserved for the page header.
    pub fn header_height(mut self, height: impl Into<String>) -> Self {
        self.header_height = Some(height.into());
        self
    }

    /// Sets the name of the template rendered into the page header.
    pub fn header_template(mut self, name: impl Into<String>) -> Self {
        self.header_template = Some(name.into());
        self
    }

    /// Sets the height reserved for the page footer.
    pub fn footer_height(mut self, height: impl Into<String>) -> Self {
        self.footer_height = Some(height.into());
        self
    }

    /// Sets the name of the template rendered into the page footer.
    pub fn footer_template(mut self, name: impl Into<String>) -> Self {
        self.footer_template = Some(name.into());
        self
    }

    /// Sets the page orientation.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Sets the page width.
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Sets the page height.
    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    /// Sets the paper format, e.g. `"A4"`.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Makes the service wait for the page's scripts to signal completion.
    pub fn wait_for_js(mut self, wait: bool) -> Self {
        self.wait_for_js = wait;
        self
    }

    /// Sets the timeout in milliseconds for loading page resources.
    pub fn resource_timeout(mut self, millis: u32) -> Self {
        self.resource_timeout = Some(millis);
        self
    }

    /// Disables script execution while rendering.
    pub fn block_javascript(mut self, block: bool) -> Self {
        self.block_javascript = block;
        self
    }

    /// Sets a delay in milliseconds before the page is printed.
    pub fn print_delay(mut self, millis: u32) -> Self {
        self.print_delay = Some(millis);
        self
    }

    /// Sets a `Content-Disposition` value that overrides the service's.
    pub fn content_disposition(mut self, value: impl Into<String>) -> Self {
        self.content_disposition = Some(value.into());
        self
    }

    /// Returns the recipe, falling back to [`DEFAULT_RECIPE`].
    pub fn recipe_or_default(&self) -> &str {
        self.recipe.as_deref().unwrap_or(DEFAULT_RECIPE)
    }

    /// Returns the engine, falling back to [`DEFAULT_ENGINE`].
    pub fn engine_or_default(&self) -> &str {
        self.engine.as_deref().unwrap_or(DEFAULT_ENGINE)
    }

    /// Returns the configured `Content-Disposition` override, if any.
    pub fn content_disposition_override(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }
}

/// Handler-scope capability marker.
///
/// A handler enables rendering for its own response by inserting this into
/// the response extensions. It replaces any options configured on the
/// layer for the enclosing route group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnableRender(pub RenderOptions);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_recipe_and_engine() {
        let options = RenderOptions::new();
        assert_eq!(options.recipe_or_default(), "phantom-pdf");
        assert_eq!(options.engine_or_default(), "none");

        let options = RenderOptions::new().recipe("html").engine("handlebars");
        assert_eq!(options.recipe_or_default(), "html");
        assert_eq!(options.engine_or_default(), "handlebars");
    }

    #[test]
    fn test_deserialize_from_declarative_keys() {
        let options: RenderOptions = serde_json::from_str(
            r#"{
                "format": "A4",
                "orientation": "landscape",
                "headerHeight": "2cm",
                "waitForJS": true,
                "blockJavaScript": true,
                "resourceTimeout": 500,
                "contentDisposition": "attachment; filename=report.pdf"
            }"#,
        )
        .unwrap();

        assert_eq!(
            options,
            RenderOptions::new()
                .format("A4")
                .orientation(Orientation::Landscape)
                .header_height("2cm")
                .wait_for_js(true)
                .block_javascript(true)
                .resource_timeout(500)
                .content_disposition("attachment; filename=report.pdf")
        );
    }

    #[test]
    fn test_deserialize_empty_object() {
        let options: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(options.content_disposition_override(), None);
    }

    #[test]
    fn test_content_disposition_override() {
        let options = RenderOptions::new().content_disposition("attachment; filename=report.pdf");
        assert_eq!(
            options.content_disposition_override(),
            Some("attachment; filename=report.pdf")
        );
    }
}
