use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::types::response::{CommonResponse, ResourceResponse};

pub const AUTHN_ERROR: &str = "Authentication failed";
pub const AUTHZ_ERROR: &str = "Authorization failed";
pub const DATABASE_ERROR: &str = "Database error";

/// A wrapper struct for HTTP responses that provides convenient methods
/// for creating common response types
pub struct Response {
    http_response: HttpResponse,
}

impl Response {
    pub fn not_found() -> Self {
        Self::err_response(StatusCode::NOT_FOUND, "Resource not found".to_string())
    }

    pub fn bad_request(message: impl AsRef<str>) -> Self {
        let message = format!("Bad request: {}", message.as_ref());
        Self::err_response(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthenticated(message: impl AsRef<str>) -> Self {
        let message = format!("Unauthenticated: {}", message.as_ref());
        Self::err_response(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl AsRef<str>) -> Self {
        let message = format!("Forbidden: {}", message.as_ref());
        Self::err_response(StatusCode::FORBIDDEN, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::err_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    }

    pub fn conflict(message: impl AsRef<str>) -> Self {
        let message = format!("Conflict: {}", message.as_ref());
        Self::err_response(StatusCode::CONFLICT, message)
    }

    pub fn payload_too_large() -> Self {
        Self::err_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Payload too large".to_string(),
        )
    }

    pub fn error(message: &str) -> Self {
        let message = format!("Server error: {message}");
        Self::err_response(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn json<T: Serialize + DeserializeOwned>(data: T) -> Self {
        Self::resource_response(data)
    }

    /// 201 with a `Location` header pointing at where `data` can be read back.
    pub fn created<T: Serialize + DeserializeOwned>(location: &str, data: T) -> Self {
        let resp = ResourceResponse::<T> {
            code: StatusCode::CREATED.into(),
            message: None,
            data: Some(data),
        };
        Self {
            http_response: HttpResponse::Created()
                .insert_header((LOCATION, location))
                .json(resp),
        }
    }

    fn resource_response<T: Serialize + DeserializeOwned>(rsc: T) -> Self {
        let resp = ResourceResponse::<T> {
            code: StatusCode::OK.into(),
            message: None,
            data: Some(rsc),
        };
        Self {
            http_response: HttpResponse::Ok().json(resp),
        }
    }

    fn err_response(status: StatusCode, message: String) -> Self {
        let resp = CommonResponse {
            code: status.into(),
            message: Some(message),
        };
        Self {
            http_response: HttpResponseBuilder::new(status).json(resp),
        }
    }
}

impl From<Response> for HttpResponse {
    fn from(val: Response) -> Self {
        val.http_response
    }
}
