//! Boundary checks shared by the resource handlers.
//!
//! Request-shape validation lives here and in the serde derives on the wire
//! DTOs; nothing below the handlers ever sees a malformed request.

use actix_web::error::JsonPayloadError;
use actix_web::http::header;
use actix_web::{HttpRequest, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::Error;

/// Query parameters accepted by the paged list endpoints.
#[derive(Debug, Default, Clone, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// Page size; defaults to 5 and is clamped server-side.
    pub limit: Option<u32>,
    /// Offset of the first item; defaults to 0.
    pub offset: Option<u32>,
    /// Opaque continuation token; consulted when `offset` is absent.
    pub cursor: Option<String>,
}

impl PageQuery {
    /// Normalise into a [`pagination::PageRequest`].
    ///
    /// # Errors
    /// Rejects continuation tokens this service did not issue.
    pub fn page_request(self) -> Result<pagination::PageRequest, Error> {
        let offset = match (self.offset, self.cursor.as_deref()) {
            (Some(offset), _) => Some(offset),
            (None, Some(token)) => Some(
                pagination::Cursor::decode(token)
                    .map_err(|_| Error::invalid_request("continuation token is malformed"))?
                    .offset(),
            ),
            (None, None) => None,
        };
        Ok(pagination::PageRequest::from_query(self.limit, offset))
    }
}

/// Reject requests whose `Accept` header excludes `application/json`.
///
/// A missing header is treated as acceptance.
///
/// # Errors
/// Returns a 406-mapped error when no acceptable representation exists.
pub fn require_json_accept(req: &HttpRequest) -> Result<(), Error> {
    let Some(accept) = req.headers().get(header::ACCEPT) else {
        return Ok(());
    };
    let value = accept
        .to_str()
        .map_err(|_| Error::not_acceptable("Not Acceptable"))?;
    let acceptable = value.split(',').any(|part| {
        let mime = part.split(';').next().unwrap_or(part).trim();
        matches!(mime, "application/json" | "application/*" | "*/*")
    });
    if acceptable {
        Ok(())
    } else {
        Err(Error::not_acceptable("Not Acceptable"))
    }
}

/// Map JSON body failures onto the boundary's error contract.
///
/// A wrong `Content-Type` is 415; a body that fails to deserialise (missing
/// required attributes, unsupported fields, bad decimal or date text) is 400.
#[must_use]
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::ContentType => {
            Error::unsupported_media_type("Unsupported Media Type").into()
        }
        JsonPayloadError::Deserialize(source) => Error::invalid_request(
            "The request object is missing at least one of the required attributes \
             or carries unsupported ones",
        )
        .with_details(json!({ "reason": source.to_string() }))
        .into(),
        other => Error::invalid_request(other.to_string()).into(),
    }
}

/// JSON extractor configuration applying [`json_error_handler`].
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}
