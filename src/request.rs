use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::options::Orientation;

/// Structured request sent to the rendering service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// The template to render.
    pub template: Template,
    /// Optional data model passed through to the service's template engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Template section of a [`RenderRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Markup to render. Filled from the captured response when unset or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Output pipeline, e.g. `phantom-pdf`.
    pub recipe: String,
    /// Template engine applied to `content`.
    pub engine: String,
    /// Page layout options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phantom: Option<PageOptions>,
}

impl Template {
    /// Returns true when the content is unset or empty.
    pub fn content_is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty)
    }
}

/// Page layout options nested in a [`Template`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOptions {
    /// Page margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    /// Height reserved for the header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_height: Option<String>,
    /// Pre-rendered header markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Height reserved for the footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_height: Option<String>,
    /// Pre-rendered footer markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Page orientation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Page width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Page height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Paper format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Wait for page scripts to signal completion.
    #[serde(default, rename = "waitForJS")]
    pub wait_for_js: bool,
    /// Timeout in milliseconds for loading resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_timeout: Option<u32>,
    /// Disable script execution.
    #[serde(default, rename = "blockJavaScript")]
    pub block_javascript: bool,
    /// Delay in milliseconds before printing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_delay: Option<u32>,
}

/// A loosely-typed object whose fields can be listed and read by name.
///
/// Used for partial render requests whose shape is only known at runtime.
/// Field names are case-sensitive.
pub trait FieldSource: Send + Sync {
    /// Returns the names of all fields present on the object.
    fn field_names(&self) -> Vec<String>;

    /// Returns the value of a field, or `None` if it is absent.
    fn field(&self, name: &str) -> Option<Value>;
}

impl FieldSource for Map<String, Value> {
    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// A render request prepared by the handler before the response completes.
///
/// Handlers place this into the response extensions. The builder keeps
/// everything it carries and only supplies the content when none is set.
#[derive(Clone)]
pub enum PartialRenderRequest {
    /// A fully typed request.
    Typed(RenderRequest),
    /// An object of arbitrary shape with a `template` field.
    Generic(Arc<dyn FieldSource>),
}

impl PartialRenderRequest {
    /// Wraps an arbitrary object as a generic partial request.
    pub fn generic(source: impl FieldSource + 'static) -> Self {
        Self::Generic(Arc::new(source))
    }

    /// Serializes any value into a generic partial request.
    ///
    /// Values that do not serialize to a JSON object yield a source with
    /// no fields.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let map = match serde_json::to_value(value)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self::generic(map))
    }
}

impl From<RenderRequest> for PartialRenderRequest {
    fn from(request: RenderRequest) -> Self {
        Self::Typed(request)
    }
}

impl fmt::Debug for PartialRenderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(request) => f.debug_tuple("Typed").field(request).finish(),
            Self::Generic(source) => f
                .debug_tuple("Generic")
                .field(&source.field_names())
                .finish(),
        }
    }
}

/// The request actually sent to the rendering service.
///
/// Generic partial requests stay generic; callers must accept either shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderPayload {
    /// A typed request.
    Typed(RenderRequest),
    /// A field map copied from a generic partial request.
    Generic(Map<String, Value>),
}

impl RenderPayload {
    /// Returns the template content of the payload, if it is a string.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Typed(request) => request.template.content.as_deref(),
            Self::Generic(map) => map
                .get("template")
                .and_then(|template| template.get("content"))
                .and_then(Value::as_str),
        }
    }

    /// Returns the recipe of the payload, if known.
    pub fn recipe(&self) -> Option<&str> {
        match self {
            Self::Typed(request) => Some(request.template.recipe.as_str()),
            Self::Generic(map) => map
                .get("template")
                .and_then(|template| template.get("recipe"))
                .and_then(Value::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let request = RenderRequest {
            template: Template {
                content: Some("<p>hi</p>".to_owned()),
                recipe: "phantom-pdf".to_owned(),
                engine: "none".to_owned(),
                phantom: Some(PageOptions {
                    header_height: Some("1cm".to_owned()),
                    wait_for_js: true,
                    ..PageOptions::default()
                }),
            },
            data: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "template": {
                    "content": "<p>hi</p>",
                    "recipe": "phantom-pdf",
                    "engine": "none",
                    "phantom": {
                        "headerHeight": "1cm",
                        "waitForJS": true,
                        "blockJavaScript": false
                    }
                }
            })
        );
    }

    #[test]
    fn test_from_serialize_non_object_has_no_fields() {
        let partial = PartialRenderRequest::from_serialize(&"text").unwrap();
        match partial {
            PartialRenderRequest::Generic(source) => assert!(source.field_names().is_empty()),
            PartialRenderRequest::Typed(_) => panic!("Expected generic partial request"),
        }
    }

    #[test]
    fn test_payload_accessors() {
        let mut map = Map::new();
        map.insert(
            "template".to_owned(),
            json!({ "content": "x", "recipe": "html" }),
        );
        let payload = RenderPayload::Generic(map);
        assert_eq!(payload.content(), Some("x"));
        assert_eq!(payload.recipe(), Some("html"));
    }
}
