use serde_json::{Map, Value};
use tracing::warn;

use crate::error::RenderError;
use crate::options::RenderOptions;
use crate::reporting::TemplateRenderer;
use crate::request::{FieldSource, PageOptions, PartialRenderRequest, RenderPayload, RenderRequest, Template};

/// Marker injected before browser tooling scripts.
pub const BROWSER_LINK_START: &str = "<!-- Visual Studio Browser Link -->";

/// Marker injected after browser tooling scripts.
pub const BROWSER_LINK_END: &str = "<!-- End Browser Link -->";

/// Removes the span injected by browser tooling from captured markup.
///
/// The span runs from the first start marker through the end of the first
/// end marker. Text missing either marker, or where the end marker comes
/// before the start marker, is returned unchanged.
pub fn remove_browser_link(content: &str) -> String {
    let (Some(start), Some(end)) = (
        content.find(BROWSER_LINK_START),
        content.find(BROWSER_LINK_END),
    ) else {
        return content.to_owned();
    };

    if end < start {
        return content.to_owned();
    }

    let mut cleaned = String::with_capacity(content.len());
    cleaned.push_str(&content[..start]);
    cleaned.push_str(&content[end + BROWSER_LINK_END.len()..]);
    cleaned
}

/// Builds the payload for the rendering service.
///
/// Content precedence is: content already present on `partial`, then the
/// captured markup. Options only shape requests built from scratch.
pub fn build_request(
    captured: &str,
    options: &RenderOptions,
    partial: Option<&PartialRenderRequest>,
    templates: &dyn TemplateRenderer,
) -> Result<RenderPayload, RenderError> {
    match partial {
        None => fresh_request(captured, options, templates).map(RenderPayload::Typed),
        Some(PartialRenderRequest::Typed(request)) => {
            let mut request = request.clone();
            if request.template.content_is_empty() {
                request.template.content = Some(remove_browser_link(captured));
            }
            Ok(RenderPayload::Typed(request))
        }
        Some(PartialRenderRequest::Generic(source)) => {
            Ok(RenderPayload::Generic(merge_generic(source.as_ref(), captured)))
        }
    }
}

fn fresh_request(
    captured: &str,
    options: &RenderOptions,
    templates: &dyn TemplateRenderer,
) -> Result<RenderRequest, RenderError> {
    let header = render_optional(templates, options.header_template.as_deref())?;
    let footer = render_optional(templates, options.footer_template.as_deref())?;

    Ok(RenderRequest {
        template: Template {
            content: Some(remove_browser_link(captured)),
            recipe: options.recipe_or_default().to_owned(),
            engine: options.engine_or_default().to_owned(),
            phantom: Some(PageOptions {
                margin: options.margin.clone(),
                header_height: options.header_height.clone(),
                header,
                footer_height: options.footer_height.clone(),
                footer,
                orientation: options.orientation,
                width: options.width.clone(),
                height: options.height.clone(),
                format: options.format.clone(),
                wait_for_js: options.wait_for_js,
                resource_timeout: options.resource_timeout,
                block_javascript: options.block_javascript,
                print_delay: options.print_delay,
            }),
        },
        data: None,
    })
}

fn render_optional(
    templates: &dyn TemplateRenderer,
    name: Option<&str>,
) -> Result<Option<String>, RenderError> {
    let Some(name) = name else {
        return Ok(None);
    };

    templates
        .render_template(name)
        .map(Some)
        .map_err(|source| RenderError::Template {
            name: name.to_owned(),
            source,
        })
}

/// Shallow field-by-field copy of a generic partial request.
fn merge_generic(source: &dyn FieldSource, captured: &str) -> Map<String, Value> {
    let mut request = copy_fields(source);

    let mut template = match request.get("template") {
        Some(Value::Object(fields)) => copy_fields(fields),
        None | Some(Value::Null) => Map::new(),
        Some(other) => {
            warn!(template = %other, "partial request template is not an object, replacing it");
            Map::new()
        }
    };

    let has_content = match template.get("content") {
        None | Some(Value::Null) => false,
        Some(Value::String(content)) => !content.is_empty(),
        Some(_) => true,
    };
    if !has_content {
        template.insert(
            "content".to_owned(),
            Value::String(remove_browser_link(captured)),
        );
    }

    request.insert("template".to_owned(), Value::Object(template));
    request
}

fn copy_fields(source: &dyn FieldSource) -> Map<String, Value> {
    source
        .field_names()
        .into_iter()
        .filter_map(|name| source.field(&name).map(|value| (name, value)))
        .collect()
}
