//! Authentication helper functions shared by middleware and handlers.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::HttpRequest;
use log::warn;

use crate::constants::{CODE_INVALID_TOKEN, ERR_COULD_NOT_VALIDATE, ERR_INVALID_AUTH_HEADER};
use crate::errors::ApiError;
use crate::models::CurrentUser;

use super::RequestExt;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| {
            let (scheme, token) = h.split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_INVALID_AUTH_HEADER))
}

/// Current user or Unauthorized error.
///
/// Use this at the start of any handler behind the AuthMiddleware.
///
/// # Example
/// ```ignore
/// let current = require_user(&req)?;
/// ```
pub fn require_user(req: &HttpRequest) -> Result<CurrentUser, ApiError> {
    req.current_user().ok_or_else(|| {
        warn!("Authenticated route reached without a current user");
        ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_COULD_NOT_VALIDATE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
    }
}
