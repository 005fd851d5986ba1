//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into consistent JSON responses and status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let redacted = self.redacted_for_clients();
        // spec.md §6.1 fixes the 404 body shape to `{"detail": "..."}`
        // literally; every other code uses the general code/message/
        // trace_id envelope.
        if redacted.code() == ErrorCode::NotFound {
            return HttpResponse::build(self.status_code())
                .json(json!({ "detail": redacted.message() }));
        }
        HttpResponse::build(self.status_code()).json(redacted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_codes_to_status() {
        let cases = [
            (Error::invalid_request("bad input"), StatusCode::BAD_REQUEST),
            (Error::not_found("job_not_found"), StatusCode::NOT_FOUND),
            (Error::conflict("quota exceeded"), StatusCode::CONFLICT),
            (
                Error::service_unavailable("circuit open"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected);
        }
    }

    #[actix_web::test]
    async fn not_found_renders_the_spec_detail_shape() {
        use actix_web::body::to_bytes;

        let error = Error::not_found("job_not_found");
        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.expect("body readable");
        let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(parsed, json!({ "detail": "job_not_found" }));
    }

    #[actix_web::test]
    async fn other_codes_keep_the_general_error_envelope() {
        use actix_web::body::to_bytes;

        let error = Error::conflict("quota exceeded");
        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.expect("body readable");
        let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(parsed["code"], "conflict");
        assert_eq!(parsed["message"], "quota exceeded");
    }
}
