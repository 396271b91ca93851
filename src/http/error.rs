//! Classification of failed admin API responses.

use reqwest::StatusCode;

/// Why the admin API refused a request.
#[derive(Debug, PartialEq)]
pub enum ApiError {
    /// Missing or rejected token (HTTP 401)
    Unauthorized(String),
    /// Token lacks admin rights (HTTP 403)
    Forbidden(String),
    /// Unknown package or endpoint (HTTP 404)
    NotFound(String),
    /// Too many requests (HTTP 429)
    RateLimited(String),
    /// Request rejected as invalid (HTTP 400, 409, 422)
    Validation(String),
    /// Other 4xx responses
    Client(String),
    /// 5xx responses
    Server(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => {
                write!(f, "Authentication failed: {}. Check PKGADMIN_TOKEN.", msg)
            }
            ApiError::Forbidden(msg) => {
                write!(f, "Access forbidden: {}. An admin token is required.", msg)
            }
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::RateLimited(msg) => {
                write!(f, "Rate limit exceeded: {}. Try again later.", msg)
            }
            ApiError::Validation(msg) => write!(f, "Request rejected: {}", msg),
            ApiError::Client(msg) => write!(f, "Request error: {}", msg),
            ApiError::Server(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Maps an HTTP status to its error class. `None` for non-error statuses.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        let code = status.as_u16();
        let error = match status {
            StatusCode::UNAUTHORIZED => {
                ApiError::Unauthorized("Invalid or missing authentication token".to_string())
            }
            StatusCode::FORBIDDEN => {
                ApiError::Forbidden("Access to this resource is forbidden".to_string())
            }
            StatusCode::NOT_FOUND => {
                ApiError::NotFound("The requested resource was not found".to_string())
            }
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited("Too many requests".to_string()),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(format!("HTTP {}", code))
            }
            s if s.is_client_error() => ApiError::Client(format!("HTTP {}", code)),
            s if s.is_server_error() => ApiError::Server(format!("HTTP {}", code)),
            _ => return None,
        };
        Some(error)
    }
}

/// Turns an error from `error_for_status()` into an `anyhow::Error`,
/// replacing status errors with their [`ApiError`] class.
pub fn check_status(error: reqwest::Error) -> anyhow::Error {
    match error.status().and_then(ApiError::from_status) {
        Some(api_error) => anyhow::Error::from(api_error),
        None => anyhow::Error::from(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Unauthorized("test".to_string());
        assert!(err.to_string().contains("Authentication"));
        assert!(err.to_string().contains("PKGADMIN_TOKEN"));

        let err = ApiError::Forbidden("test".to_string());
        assert!(err.to_string().contains("forbidden"));

        let err = ApiError::NotFound("test".to_string());
        assert!(err.to_string().contains("Not found"));

        let err = ApiError::Validation("HTTP 422".to_string());
        assert!(err.to_string().contains("HTTP 422"));
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED),
            Some(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN),
            Some(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND),
            Some(ApiError::NotFound(_))
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS),
            Some(ApiError::RateLimited(_))
        ));
        assert_eq!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY),
            Some(ApiError::Validation("HTTP 422".to_string()))
        );
        assert_eq!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT),
            Some(ApiError::Client("HTTP 418".to_string()))
        );
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_GATEWAY),
            Some(ApiError::Server("HTTP 502".to_string()))
        );
        assert_eq!(ApiError::from_status(StatusCode::OK), None);
    }

    #[tokio::test]
    async fn test_check_status_from_response() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(403)
            .create_async()
            .await;

        let response = reqwest::Client::new()
            .get(server.url())
            .send()
            .await
            .unwrap();
        let err = check_status(response.error_for_status().unwrap_err());

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Forbidden(_))
        ));
    }
}
