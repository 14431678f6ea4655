use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use herd_cache::CacheError;
use serde_json::json;

/// A cache failure surfaced to an HTTP client
///
/// Every kind maps to `500`; the body names the kind so clients and logs can
/// tell a store outage from a failed query.
#[derive(Debug)]
pub struct CacheRejection(pub CacheError);

impl From<CacheError> for CacheRejection {
    fn from(err: CacheError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CacheRejection {
    fn into_response(self) -> Response {
        tracing::error!(
            target: "herd_cache",
            kind = self.0.kind(),
            error = %self.0,
            "request failed"
        );

        let body = json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_a_server_error() {
        let errors = [
            CacheError::StoreUnavailable("refused".into()),
            CacheError::StoreWriteRejected {
                key: "user-key".into(),
                status: "ERR".into(),
            },
            CacheError::Deserialization("eof".into()),
            CacheError::PopulationFailed("boom".into()),
        ];

        for err in errors {
            let response = CacheRejection::from(err).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
