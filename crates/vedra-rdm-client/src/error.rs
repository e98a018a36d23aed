//! HTTP errors and their mapping onto repository errors

use thiserror::Error;
use vedra_editor::RepositoryError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
    #[error("Timeout")]
    Timeout,
    #[error("Rate limited")]
    RateLimited,
    #[error("Not authorized")]
    Unauthorized,
    #[error("Not found: {what}")]
    NotFound { what: String },
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {message}")]
    ParseError { message: String },
}

impl HttpError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::RequestFailed {
                message: err.to_string(),
            }
        }
    }

    pub(crate) fn parse(err: impl std::fmt::Display) -> Self {
        HttpError::ParseError {
            message: err.to_string(),
        }
    }
}

/// Turn a non-success status into an error; `what` names the resource
pub fn check_status(status: u16, body: &str, what: &str) -> Result<(), HttpError> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(HttpError::Unauthorized),
        404 => Err(HttpError::NotFound {
            what: what.to_string(),
        }),
        429 => Err(HttpError::RateLimited),
        _ => Err(HttpError::Status {
            status,
            body: body.chars().take(500).collect(),
        }),
    }
}

impl From<HttpError> for RepositoryError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::RequestFailed { message } => RepositoryError::RequestFailed(message),
            HttpError::InvalidUrl { url } => {
                RepositoryError::RequestFailed(format!("invalid URL {}", url))
            }
            HttpError::Timeout => RepositoryError::Timeout,
            HttpError::RateLimited => RepositoryError::Status {
                status: 429,
                body: "rate limited".to_string(),
            },
            HttpError::Unauthorized => RepositoryError::Unauthorized,
            HttpError::NotFound { what } => RepositoryError::NotFound(what),
            HttpError::Status { status, body } => RepositoryError::Status { status, body },
            HttpError::ParseError { message } => RepositoryError::Parse(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200, None)]
    #[case(201, None)]
    #[case(401, Some(HttpError::Unauthorized))]
    #[case(403, Some(HttpError::Unauthorized))]
    #[case(404, Some(HttpError::NotFound { what: "record abc".into() }))]
    #[case(429, Some(HttpError::RateLimited))]
    #[case(500, Some(HttpError::Status { status: 500, body: "boom".into() }))]
    fn test_check_status(#[case] status: u16, #[case] expected: Option<HttpError>) {
        assert_eq!(check_status(status, "boom", "record abc").err(), expected);
    }

    #[test]
    fn test_long_bodies_truncated() {
        let body = "x".repeat(2000);
        match check_status(502, &body, "x") {
            Err(HttpError::Status { body, .. }) => assert_eq!(body.len(), 500),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rate_limit_stays_retryable() {
        let err: RepositoryError = HttpError::RateLimited.into();
        assert!(err.is_retryable());
        let err: RepositoryError = HttpError::Unauthorized.into();
        assert!(!err.is_retryable());
        let err: RepositoryError = HttpError::Timeout.into();
        assert_eq!(err, RepositoryError::Timeout);
    }
}
