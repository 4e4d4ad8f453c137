use bytes::BytesMut;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::response::Parts;

use crate::error::RenderError;
use crate::reporting::RenderResult;

/// Rewrites the response head with the metadata of a rendered document.
///
/// - response-level headers are copied, except `connection` and
///   `transfer-encoding`
/// - content-level headers are copied, with `content_disposition` taking
///   the place of the service's `content-disposition`; it is never added
///   when the service sent none
/// - values of multi-value headers are joined with `;`
/// - `content-type` is set to the document's media type
pub(crate) fn apply_render_result(
    parts: &mut Parts,
    result: &RenderResult,
    content_disposition: Option<&str>,
) -> Result<(), RenderError> {
    // Length of the captured HTML no longer applies
    parts.headers.remove(header::CONTENT_LENGTH);

    for name in result.headers.keys() {
        if is_connection_header(name) {
            continue;
        }
        let value = join_values(&result.headers, name)?;
        parts.headers.insert(name.clone(), value);
    }

    for name in result.content_headers.keys() {
        let value = match content_disposition {
            Some(disposition) if *name == header::CONTENT_DISPOSITION => {
                HeaderValue::from_str(disposition).map_err(|_| RenderError::InvalidHeader {
                    name: name.to_string(),
                })?
            }
            _ => join_values(&result.content_headers, name)?,
        };
        parts.headers.insert(name.clone(), value);
    }

    let content_type = HeaderValue::from_str(&result.media_type)
        .map_err(|_| RenderError::InvalidMediaType(result.media_type.clone()))?;
    parts.headers.insert(header::CONTENT_TYPE, content_type);

    parts.status = result.status;

    Ok(())
}

/// Checks if the header manages the transport connection.
fn is_connection_header(name: &HeaderName) -> bool {
    let name = name.as_str();
    name.eq_ignore_ascii_case("connection") || name.eq_ignore_ascii_case("transfer-encoding")
}

/// Joins every value of a header into a single `;`-separated value.
fn join_values(headers: &HeaderMap, name: &HeaderName) -> Result<HeaderValue, RenderError> {
    let mut values = headers.get_all(name).iter();
    let Some(first) = values.next() else {
        return Ok(HeaderValue::from_static(""));
    };

    let mut joined = BytesMut::from(first.as_bytes());
    for value in values {
        joined.extend_from_slice(b";");
        joined.extend_from_slice(value.as_bytes());
    }

    HeaderValue::from_maybe_shared(joined.freeze()).map_err(|_| RenderError::InvalidHeader {
        name: name.to_string(),
    })
}
