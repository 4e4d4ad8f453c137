//! Document rendering middleware for Tower.
//!
//! This crate provides a Tower layer that captures the HTML produced by a
//! handler, sends it to a remote rendering service together with
//! declarative page options, and answers the client with the rendered
//! document (typically a PDF) instead of the HTML.
//!
//! # Example
//!
//! ```ignore
//! use http_document_render::{HttpReportingService, RenderLayer, RenderOptions};
//! use tower::ServiceBuilder;
//!
//! let reporting = HttpReportingService::new("http://localhost:5488")?;
//! let service = ServiceBuilder::new()
//!     .layer(RenderLayer::new(reporting).enable(RenderOptions::new().format("A4")))
//!     .service(my_service);
//! ```
//!
//! # Enabling Rendering
//!
//! A response is rendered when options are configured on the layer with
//! [`RenderLayer::enable`] (the whole wrapped group) or when the handler
//! inserts [`EnableRender`] into the response extensions. Handler options
//! replace group options as a whole.
//!
//! The middleware will **not** render a response when its extensions carry
//! an [`ExecutionState`] reporting:
//! - an exception that was not handled
//! - a canceled request
//! - an invalid input model
//!
//! # Request Assembly
//!
//! The captured HTML, stripped of browser tooling markers, becomes the
//! template content. A handler may prepare the request itself by inserting
//! a [`PartialRenderRequest`]; content already present there is never
//! replaced.
//!
//! # Response Modifications
//!
//! When a response is rendered:
//! - no byte of the HTML reaches the client
//! - status, headers and `Content-Type` come from the rendering service
//! - `Connection` and `Transfer-Encoding` from the service are dropped
//! - a configured `Content-Disposition` overrides the service's
//! - any failure is returned as the service error, never as the HTML

#![deny(missing_docs)]

mod body;
mod builder;
mod capture;
#[cfg(feature = "client")]
mod client;
mod eligibility;
mod error;
mod future;
mod headers;
mod layer;
mod options;
mod reporting;
mod request;
mod service;
#[cfg(test)]
mod test_body;

pub use body::RenderBody;
pub use builder::{BROWSER_LINK_END, BROWSER_LINK_START, build_request, remove_browser_link};
#[cfg(feature = "client")]
pub use client::{ClientError, HttpReportingService};
pub use eligibility::{Eligibility, ExecutionState, SkipReason, resolve};
pub use error::{BoxError, RenderError};
pub use future::ResponseFuture;
pub use layer::RenderLayer;
pub use options::{DEFAULT_ENGINE, DEFAULT_RECIPE, EnableRender, Orientation, RenderOptions};
pub use reporting::{
    BoxFuture, NoTemplates, RenderResult, ReportingService, TemplateMap, TemplateRenderer,
};
pub use request::{
    FieldSource, PageOptions, PartialRenderRequest, RenderPayload, RenderRequest, Template,
};
pub use service::RenderService;
