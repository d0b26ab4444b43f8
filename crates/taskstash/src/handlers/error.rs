use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use taskstash_core::resource::ValidationError;
use taskstash_core::storage::{repository_error_to_status_code, RepositoryError};

/// Request-level error wrapper.
///
/// Downcasts decide the response shape: validation failures render as a
/// 400 with the field-error map, repository errors map to their status
/// codes, malformed request bodies render as 400, and anything else is a
/// plain 500.
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(validation) = self.0.downcast_ref::<ValidationError>() {
            return (StatusCode::BAD_REQUEST, Json(validation.clone())).into_response();
        }

        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, self.0.to_string()).into_response();
        }

        if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }

        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error: AppError = RepositoryError::NotFound {
            entity_type: "Task",
            id: "abc".to_string(),
        }
        .into();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error_maps_to_400() {
        let error: AppError = ValidationError::field("title", "This field may not be blank.").into();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_error_maps_to_500() {
        let error: AppError = anyhow::anyhow!("something unexpected").into();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
